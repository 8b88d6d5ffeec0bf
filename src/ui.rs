use crate::app::{App, PopupState};
use crate::event::Event;
use crate::grid::{Cell, MonthCursor, MonthGrid, date_key};
use crate::logging;
use chrono::{Datelike, NaiveDate, Weekday};
use crossterm::{
    cursor, queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};

const CALENDAR_WIDTH: u16 = 30;
const MIN_PANEL_WIDTH: u16 = 25;
const MAX_PANEL_WIDTH: u16 = 46;

const TITLE_ROW: u16 = 0;
const CONTROLS_ROW: u16 = 1;
const WEEKDAY_ROW: u16 = 2;
const GRID_TOP: u16 = 3;
const GRID_LEFT: u16 = 1;
const CELL_WIDTH: u16 = 4;
/// Six weeks is the tallest month
const INFO_ROW: u16 = GRID_TOP + 7;
const TODAY_ROW: u16 = INFO_ROW + 1;
const STATS_ROW: u16 = TODAY_ROW + 1;
const LOG_TOP: u16 = STATS_ROW + 1;
/// Titles listed for the focused day before collapsing into "+N more"
const SUMMARY_TITLES: usize = 3;

/// Clickable controls on `CONTROLS_ROW` as (first column, label)
const PREV_BUTTON: (u16, &str) = (1, "[<]");
const TODAY_BUTTON: (u16, &str) = (6, "[Today]");
const NEXT_BUTTON: (u16, &str) = (15, "[>]");
const CLOSE_LABEL: &str = "[x]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Area of the popup's close control
    fn close_button(&self) -> Rect {
        Rect {
            x: self.x + self.width.saturating_sub(5),
            y: self.y + 1,
            width: CLOSE_LABEL.len() as u16,
            height: 1,
        }
    }
}

/// Terminal dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: u16,
    pub height: u16,
}

impl Screen {
    pub fn current() -> Self {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        Self { width, height }
    }

    /// Popup goes right of the calendar, or below the grid on narrow terminals
    pub fn popup_rect(&self, grid_rows: usize, line_count: usize) -> Rect {
        let right_width = self.width.saturating_sub(CALENDAR_WIDTH + 1);
        let (x, y, width) = if right_width >= MIN_PANEL_WIDTH {
            (CALENDAR_WIDTH + 1, 0, right_width.min(MAX_PANEL_WIDTH))
        } else {
            (0, GRID_TOP + grid_rows as u16 + 1, self.width.min(MAX_PANEL_WIDTH))
        };

        // Leave the two status rows free
        let available = self.height.saturating_sub(2).saturating_sub(y);
        let height = (line_count as u16 + 2).min(available);
        Rect { x, y, width, height }
    }
}

/// What a mouse click landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    PrevMonth,
    NextMonth,
    Today,
    Day(String),
    ClosePopup,
    Popup,
}

pub fn hit_test(grid: &MonthGrid, popup: Option<Rect>, x: u16, y: u16) -> Option<Target> {
    if let Some(rect) = popup {
        if rect.close_button().contains(x, y) {
            return Some(Target::ClosePopup);
        }
        if rect.contains(x, y) {
            return Some(Target::Popup);
        }
    }

    if y == CONTROLS_ROW {
        let on = |(start, label): (u16, &str)| x >= start && x < start + label.len() as u16;
        if on(PREV_BUTTON) {
            return Some(Target::PrevMonth);
        }
        if on(TODAY_BUTTON) {
            return Some(Target::Today);
        }
        if on(NEXT_BUTTON) {
            return Some(Target::NextMonth);
        }
        return None;
    }

    if y < GRID_TOP || x < GRID_LEFT {
        return None;
    }
    let row = (y - GRID_TOP) as usize;
    let col = ((x - GRID_LEFT) / CELL_WIDTH) as usize;
    let day = grid.cell_at(row, col)?.as_day()?;
    Some(Target::Day(day.key.clone()))
}

/// Popup rectangle for the current state, `None` while closed
pub fn popup_area(app: &App, grid: &MonthGrid, screen: Screen) -> Option<Rect> {
    match app.state.popup() {
        PopupState::Open(date) => {
            let lines = popup_lines(date, &app.store.events_for_date(date));
            Some(screen.popup_rect(grid.row_count(), lines.len()))
        }
        PopupState::Closed => None,
    }
}

/// Draw the whole screen from `app`
pub fn render(out: &mut impl Write, app: &App, today: NaiveDate, screen: Screen) -> io::Result<()> {
    let grid = app.grid(today);

    queue!(out, Clear(ClearType::All), cursor::Hide)?;
    render_calendar(out, app, &grid, screen)?;
    render_stats(out, app, grid.cursor, today, screen)?;

    if app.show_logs {
        render_logs(out, screen)?;
    }

    if let Some(rect) = popup_area(app, &grid, screen)
        && let PopupState::Open(date) = app.state.popup()
    {
        let lines = popup_lines(date, &app.store.events_for_date(date));
        render_popup(out, rect, &lines)?;
    }

    render_status(out, screen)?;
    out.flush()
}

fn render_calendar(out: &mut impl Write, app: &App, grid: &MonthGrid, screen: Screen) -> io::Result<()> {
    let month = grid.cursor;
    let first_day = month.first_day();

    // Month header
    queue!(
        out,
        cursor::MoveTo(0, TITLE_ROW),
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold)
    )?;
    let header = format!(
        " {} {}",
        first_day.format("%B").to_string().to_uppercase(),
        month.year()
    );
    write!(out, "{}", truncate_str(&header, CALENDAR_WIDTH as usize))?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;

    queue!(out, cursor::MoveTo(PREV_BUTTON.0, CONTROLS_ROW))?;
    write!(out, "{}", PREV_BUTTON.1)?;
    queue!(out, cursor::MoveTo(TODAY_BUTTON.0, CONTROLS_ROW))?;
    write!(out, "{}", TODAY_BUTTON.1)?;
    queue!(out, cursor::MoveTo(NEXT_BUTTON.0, CONTROLS_ROW))?;
    write!(out, "{}", NEXT_BUTTON.1)?;

    // Weekday header
    queue!(out, cursor::MoveTo(0, WEEKDAY_ROW), SetForegroundColor(Color::DarkGrey))?;
    write!(out, " Su  Mo  Tu  We  Th  Fr  Sa")?;
    queue!(out, ResetColor)?;

    let selected = app.state.selected_date();

    for (row, week) in grid.rows().enumerate() {
        queue!(out, cursor::MoveTo(0, GRID_TOP + row as u16))?;
        write!(out, " ")?;

        for cell in week {
            let day = match cell {
                Cell::Day(day) => day,
                Cell::Empty => {
                    write!(out, "    ")?;
                    continue;
                }
            };

            let is_focused = day.day == app.focus_day;
            let is_selected = selected == Some(day.key.as_str());
            let is_weekend = matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun);

            if is_focused {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            if is_selected {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            if day.is_today {
                queue!(out, SetForegroundColor(Color::Green), SetAttribute(Attribute::Bold))?;
            } else if is_weekend {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
            }

            write!(out, "{:2}{}", day.day, day_marker(app.store.count_for_date(&day.key)))?;

            queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
        }
    }

    // Focused date info
    if let Some(day) = grid.day_cells().find(|d| d.day == app.focus_day) {
        let events = app.store.events_for_date(&day.key);
        let mut info = format!(" {} {}", day.date.format("%a"), day.date.format("%b %d"));
        if !events.is_empty() {
            info.push_str(&format!("  {}: {}", event_count(events.len()), day_summary(&events)));
        }
        queue!(out, cursor::MoveTo(0, INFO_ROW), SetForegroundColor(Color::Yellow))?;
        write!(out, "{}", truncate_str(&info, screen.width as usize))?;
        queue!(out, ResetColor)?;
    }

    Ok(())
}

/// Two-column event marker after the day number: blank, `•`, `•N`, or `•+`
fn day_marker(count: usize) -> String {
    match count {
        0 => "  ".to_string(),
        1 => "\u{2022} ".to_string(),
        2..=9 => format!("\u{2022}{}", count),
        _ => "\u{2022}+".to_string(),
    }
}

/// First few titles of a day, the rest collapsed into "+N more"
fn day_summary(events: &[&Event]) -> String {
    let mut parts: Vec<String> = events
        .iter()
        .take(SUMMARY_TITLES)
        .map(|e| e.title.clone())
        .collect();
    if events.len() > SUMMARY_TITLES {
        parts.push(format!("+{} more", events.len() - SUMMARY_TITLES));
    }
    parts.join(", ")
}

/// Totals shown under the grid. "This month" counts the displayed month of
/// the displayed year.
pub fn stats_line(app: &App, month: MonthCursor, today: NaiveDate) -> String {
    format!(
        " Total Events {}  \u{00B7}  Today's Events {}  \u{00B7}  This Month {}",
        app.store.len(),
        app.store.count_for_date(&date_key(today)),
        app.store.count_in_month(month)
    )
}

fn render_stats(out: &mut impl Write, app: &App, month: MonthCursor, today: NaiveDate, screen: Screen) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, TODAY_ROW), SetForegroundColor(Color::DarkGrey))?;
    write!(out, " Today is {}", today.format("%-m/%-d/%Y"))?;
    queue!(out, ResetColor)?;

    queue!(out, cursor::MoveTo(0, STATS_ROW))?;
    write!(out, "{}", truncate_str(&stats_line(app, month, today), screen.width as usize))?;
    Ok(())
}

/// One line of the detail popup
#[derive(Debug, Clone, PartialEq)]
pub enum PopupLine {
    Heading(String),
    Count(String),
    Separator,
    Title { color: Color, text: String },
    Detail(String),
    Empty,
}

/// Content of the detail popup for `date`
pub fn popup_lines(date: &str, events: &[&Event]) -> Vec<PopupLine> {
    let heading = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => format_long_date(parsed),
        Err(_) => date.to_string(),
    };

    let mut lines = vec![
        PopupLine::Heading(heading),
        PopupLine::Count(event_count(events.len())),
        PopupLine::Separator,
    ];

    if events.is_empty() {
        lines.push(PopupLine::Empty);
    }

    for event in events {
        lines.push(PopupLine::Title {
            color: event.color.terminal_color(),
            text: event.title.clone(),
        });
        lines.push(PopupLine::Detail(format!("{} ({}min)", event.time, event.duration)));
        if let Some(ref location) = event.location {
            lines.push(PopupLine::Detail(format!("@ {}", location)));
        }
    }

    lines
}

fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        date.format("%A"),
        date.format("%B"),
        date.day(),
        date.year()
    )
}

fn event_count(count: usize) -> String {
    if count == 1 {
        "1 event".to_string()
    } else {
        format!("{} events", count)
    }
}

fn render_popup(out: &mut impl Write, rect: Rect, lines: &[PopupLine]) -> io::Result<()> {
    if rect.height < 3 || rect.width < 8 {
        return Ok(());
    }

    let inner = rect.width as usize - 4;
    let horizontal = "\u{2500}".repeat(rect.width as usize - 2);
    let visible = rect.height as usize - 2;

    queue!(out, cursor::MoveTo(rect.x, rect.y))?;
    write!(out, "\u{250C}{}\u{2510}", horizontal)?;

    for (i, line) in lines.iter().take(visible).enumerate() {
        queue!(out, cursor::MoveTo(rect.x, rect.y + 1 + i as u16))?;

        // Last visible row reports what did not fit
        if i + 1 == visible && lines.len() > visible {
            let more = format!("... +{} more", lines.len() - visible + 1);
            queue!(out, SetForegroundColor(Color::DarkGrey))?;
            write!(out, "\u{2502} {:<inner$} \u{2502}", truncate_str(&more, inner))?;
            queue!(out, ResetColor)?;
            break;
        }

        match line {
            PopupLine::Heading(text) => {
                let field = inner.saturating_sub(CLOSE_LABEL.len() + 1);
                write!(out, "\u{2502} ")?;
                queue!(out, SetForegroundColor(Color::Cyan), SetAttribute(Attribute::Bold))?;
                write!(out, "{:<field$}", truncate_str(text, field))?;
                queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
                write!(out, " {} \u{2502}", CLOSE_LABEL)?;
            }
            PopupLine::Count(text) => {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
                write!(out, "\u{2502} {:<inner$} \u{2502}", truncate_str(text, inner))?;
                queue!(out, ResetColor)?;
            }
            PopupLine::Separator => {
                write!(out, "\u{251C}{}\u{2524}", horizontal)?;
            }
            PopupLine::Title { color, text } => {
                let field = inner.saturating_sub(2);
                write!(out, "\u{2502} ")?;
                queue!(out, SetForegroundColor(*color))?;
                write!(out, "\u{25A0} ")?;
                queue!(out, ResetColor, SetAttribute(Attribute::Bold))?;
                write!(out, "{:<field$}", truncate_str(text, field))?;
                queue!(out, SetAttribute(Attribute::Reset))?;
                write!(out, " \u{2502}")?;
            }
            PopupLine::Detail(text) => {
                let field = inner.saturating_sub(2);
                write!(out, "\u{2502}   {:<field$} \u{2502}", truncate_str(text, field))?;
            }
            PopupLine::Empty => {
                queue!(out, SetForegroundColor(Color::DarkGrey))?;
                write!(out, "\u{2502} {:<inner$} \u{2502}", "No events scheduled")?;
                queue!(out, ResetColor)?;
            }
        }
    }

    let bottom = rect.y + 1 + lines.len().min(visible) as u16;
    queue!(out, cursor::MoveTo(rect.x, bottom))?;
    write!(out, "\u{2514}{}\u{2518}", horizontal)?;
    Ok(())
}

fn render_logs(out: &mut impl Write, screen: Screen) -> io::Result<()> {
    let bottom = screen.height.saturating_sub(2);
    if bottom <= LOG_TOP + 1 {
        return Ok(());
    }

    queue!(out, cursor::MoveTo(0, LOG_TOP), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}", "\u{2500}".repeat(screen.width.min(60) as usize))?;

    let rows = (bottom - LOG_TOP - 1) as usize;
    for (i, line) in logging::get_recent_logs(rows).iter().enumerate() {
        queue!(out, cursor::MoveTo(0, LOG_TOP + 1 + i as u16))?;
        write!(out, " {}", truncate_str(line, screen.width.saturating_sub(2) as usize))?;
    }
    queue!(out, ResetColor)?;
    Ok(())
}

fn render_status(out: &mut impl Write, screen: Screen) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, screen.height.saturating_sub(1)),
        SetForegroundColor(Color::DarkGrey)
    )?;
    let controls = " </>:month t:today arrows:move enter:open esc:close L:logs q:quit";
    write!(out, "{}", truncate_str(controls, screen.width as usize))?;
    queue!(out, ResetColor)?;
    Ok(())
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
