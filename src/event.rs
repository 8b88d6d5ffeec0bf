use crate::error::{CalviewError, Result};
use chrono::{NaiveDate, NaiveTime};
use crossterm::style::Color;
use serde::Deserialize;

/// A scheduled event shown on the calendar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    pub id: u32,
    pub title: String,
    /// Day of the event as `YYYY-MM-DD`
    pub date: String,
    /// Start time as `HH:MM`
    pub time: String,
    /// Length in minutes
    pub duration: u32,
    pub color: EventColor,
    #[serde(default)]
    pub location: Option<String>,
}

/// Display color of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum EventColor {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Yellow,
    Pink,
    Teal,
    Gray,
    Rgb(u8, u8, u8),
}

impl EventColor {
    pub fn terminal_color(self) -> Color {
        match self {
            EventColor::Blue => Color::Blue,
            EventColor::Green => Color::Green,
            EventColor::Purple => Color::Magenta,
            EventColor::Orange => Color::Rgb { r: 255, g: 165, b: 0 },
            EventColor::Red => Color::Red,
            EventColor::Yellow => Color::Yellow,
            EventColor::Pink => Color::Rgb { r: 255, g: 105, b: 180 },
            EventColor::Teal => Color::DarkCyan,
            EventColor::Gray => Color::Grey,
            EventColor::Rgb(r, g, b) => Color::Rgb { r, g, b },
        }
    }
}

impl TryFrom<String> for EventColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let color = match value.to_ascii_lowercase().as_str() {
            "blue" => EventColor::Blue,
            "green" => EventColor::Green,
            "purple" => EventColor::Purple,
            "orange" => EventColor::Orange,
            "red" => EventColor::Red,
            "yellow" => EventColor::Yellow,
            "pink" => EventColor::Pink,
            "teal" => EventColor::Teal,
            "gray" | "grey" => EventColor::Gray,
            hex if hex.starts_with('#') => parse_hex(hex).ok_or_else(|| format!("invalid hex color '{}'", value))?,
            _ => return Err(format!("unknown color '{}'", value)),
        };
        Ok(color)
    }
}

/// Parse `#rrggbb`
fn parse_hex(hex: &str) -> Option<EventColor> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(EventColor::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Event {
    /// Check a single record. Dates and times must round-trip through their
    /// zero-padded format, since lookups compare the raw strings.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CalviewError::invalid_event(self.id, "title is empty"));
        }

        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| CalviewError::invalid_event(self.id, format!("date '{}': {}", self.date, e)))?;
        if date.format("%Y-%m-%d").to_string() != self.date {
            return Err(CalviewError::invalid_event(
                self.id,
                format!("date '{}' is not zero-padded YYYY-MM-DD", self.date),
            ));
        }

        let time = NaiveTime::parse_from_str(&self.time, "%H:%M")
            .map_err(|e| CalviewError::invalid_event(self.id, format!("time '{}': {}", self.time, e)))?;
        if time.format("%H:%M").to_string() != self.time {
            return Err(CalviewError::invalid_event(
                self.id,
                format!("time '{}' is not zero-padded HH:MM", self.time),
            ));
        }

        if self.duration == 0 {
            return Err(CalviewError::invalid_event(self.id, "duration must be positive"));
        }

        Ok(())
    }
}

/// Built-in events used when no event table is configured
pub fn sample_events() -> Vec<Event> {
    let rows: [(u32, &str, &str, &str, u32, EventColor, Option<&str>); 5] = [
        (1, "Team Meeting", "2025-06-23", "10:00", 60, EventColor::Rgb(0x3B, 0x82, 0xF6), Some("Conference Room A")),
        (2, "Project Review", "2025-06-25", "14:00", 90, EventColor::Rgb(0xEF, 0x44, 0x44), Some("Office")),
        (3, "Client Presentation", "2025-06-27", "09:00", 120, EventColor::Rgb(0x10, 0xB9, 0x81), Some("Zoom")),
        (4, "Design Workshop", "2025-06-23", "15:00", 180, EventColor::Rgb(0xF5, 0x9E, 0x0B), Some("Design Studio")),
        (5, "Code Review", "2025-06-30", "11:00", 45, EventColor::Rgb(0x8B, 0x5C, 0xF6), Some("Dev Room")),
    ];

    rows.into_iter()
        .map(|(id, title, date, time, duration, color, location)| Event {
            id,
            title: title.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            duration,
            color,
            location: location.map(String::from),
        })
        .collect()
}
