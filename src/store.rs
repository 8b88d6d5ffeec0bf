use crate::error::{CalviewError, Result};
use crate::event::Event;
use crate::grid::MonthCursor;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Read-only event table, validated once at load
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new(events: Vec<Event>) -> Result<Self> {
        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.id) {
                return Err(CalviewError::DuplicateEventId(event.id));
            }
            event.validate()?;
        }

        log::debug!("Loaded {} events", events.len());
        Ok(Self { events })
    }

    /// Events whose date string equals `date` exactly, in table order
    pub fn events_for_date(&self, date: &str) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    pub fn count_for_date(&self, date: &str) -> usize {
        self.events.iter().filter(|e| e.date == date).count()
    }

    /// Events falling in the given month of the given year
    pub fn count_in_month(&self, month: MonthCursor) -> usize {
        self.events
            .iter()
            .filter(|e| {
                NaiveDate::parse_from_str(&e.date, "%Y-%m-%d")
                    .is_ok_and(|date| month.contains(date))
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
