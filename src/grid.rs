//! Month grid construction

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Year + month pointer for the displayed month. Always holds a month whose
/// first day and following month are both representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    first: NaiveDate,
    days: u32,
}

impl MonthCursor {
    /// Build a cursor from a year and zero-based month index. Indices outside
    /// `0..12` roll into neighbouring years.
    pub fn from_month_index(year: i32, month_index: i32) -> Option<Self> {
        let year = year.checked_add(month_index.div_euclid(12))?;
        let month = month_index.rem_euclid(12) as u32 + 1;
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        // Day 0 of the next month
        let last = first.checked_add_months(Months::new(1))? - Duration::days(1);
        Some(Self { first, days: last.day() })
    }

    /// Cursor for the month containing `date`
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::from_month_index(date.year(), date.month0() as i32)
    }

    /// Move by `delta` months, `None` when leaving the representable range
    pub fn shift(self, delta: i32) -> Option<Self> {
        let index = self.month0() as i32 + delta;
        Self::from_month_index(self.year(), index)
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// Zero-based month index
    pub fn month0(self) -> u32 {
        self.first.month0()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(self) -> u32 {
        self.days
    }

    /// Weekday of day 1, 0 = Sunday
    pub fn first_weekday(self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Date of `day` within this month
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month0() == self.month0()
    }
}

/// Date key used to match events, `YYYY-MM-DD`
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub key: String,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Day(DayCell),
}

impl Cell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Empty => None,
        }
    }
}

/// Cells of one month: leading placeholders then one cell per day.
/// There is no trailing padding, so the last week may be short.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    pub cells: Vec<Cell>,
}

impl MonthGrid {
    pub fn build(cursor: MonthCursor, today: NaiveDate) -> Self {
        let leading = cursor.first_weekday() as usize;
        let mut cells = Vec::with_capacity(leading + cursor.days_in_month() as usize);
        cells.extend(std::iter::repeat_n(Cell::Empty, leading));

        let mut date = cursor.first_day();
        for day in 1..=cursor.days_in_month() {
            cells.push(Cell::Day(DayCell {
                day,
                date,
                key: date_key(date),
                is_today: date == today,
            }));
            if let Some(next) = date.succ_opt() {
                date = next;
            }
        }

        Self { cursor, cells }
    }

    /// Weeks of 7 cells, Sunday first
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(7)
    }

    pub fn row_count(&self) -> usize {
        self.cells.len().div_ceil(7)
    }

    pub fn day_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().filter_map(Cell::as_day)
    }

    /// Cell at grid position (week row, weekday column)
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        if col >= 7 {
            return None;
        }
        self.cells.get(row * 7 + col)
    }

}
