use crate::event::Event;
use crate::grid::{MonthCursor, MonthGrid, date_key};
use crate::store::EventStore;
use chrono::{Datelike, NaiveDate};

/// Month navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

impl Step {
    fn delta(self) -> i32 {
        match self {
            Step::Prev => -1,
            Step::Next => 1,
        }
    }
}

/// User-initiated change to the view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NavigateMonth(Step),
    GoToToday,
    SelectDay(String),
    CloseModal,
}

/// Detail popup visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState<'a> {
    Closed,
    Open(&'a str),
}

/// Displayed month, selected day and popup flag.
///
/// Fields are private so the popup can only be open while a day is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    current: MonthCursor,
    selected_date: Option<String>,
    modal_open: bool,
}

impl ViewState {
    pub fn new(current: MonthCursor) -> Self {
        Self {
            current,
            selected_date: None,
            modal_open: false,
        }
    }

    pub fn current(&self) -> MonthCursor {
        self.current
    }

    pub fn selected_date(&self) -> Option<&str> {
        self.selected_date.as_deref()
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn popup(&self) -> PopupState<'_> {
        match (&self.selected_date, self.modal_open) {
            (Some(date), true) => PopupState::Open(date),
            _ => PopupState::Closed,
        }
    }

    /// Previous or next month. Stays put at the edge of the representable range.
    pub fn navigate_month(&self, step: Step) -> Self {
        let current = match self.current.shift(step.delta()) {
            Some(cursor) => cursor,
            None => {
                log::warn!("Cannot move {:?} from {}-{:02}", step, self.current.year(), self.current.month0() + 1);
                self.current
            }
        };
        Self {
            current,
            ..self.clone()
        }
    }

    pub fn go_to_today(&self, today: NaiveDate) -> Self {
        Self {
            current: MonthCursor::containing(today).unwrap_or(self.current),
            ..self.clone()
        }
    }

    pub fn select_day(&self, date: impl Into<String>) -> Self {
        Self {
            current: self.current,
            selected_date: Some(date.into()),
            modal_open: true,
        }
    }

    pub fn close_modal(&self) -> Self {
        Self {
            modal_open: false,
            ..self.clone()
        }
    }

    pub fn apply(&self, action: &Action, today: NaiveDate) -> Self {
        match action {
            Action::NavigateMonth(step) => self.navigate_month(*step),
            Action::GoToToday => self.go_to_today(today),
            Action::SelectDay(date) => self.select_day(date.clone()),
            Action::CloseModal => self.close_modal(),
        }
    }
}

/// Application state
pub struct App {
    pub state: ViewState,
    pub store: EventStore,
    /// Day of the displayed month that has keyboard focus
    pub focus_day: u32,
    pub show_logs: bool,
}

impl App {
    pub fn new(store: EventStore, today: NaiveDate) -> Option<Self> {
        let cursor = MonthCursor::containing(today)?;
        Some(Self {
            state: ViewState::new(cursor),
            store,
            focus_day: today.day(),
            show_logs: false,
        })
    }

    /// Replace the view state with the result of `action`. The caller
    /// renders right after, so the screen only ever sees whole states.
    pub fn apply(&mut self, action: Action, today: NaiveDate) {
        log::debug!("Applying {:?}", action);
        let next = self.state.apply(&action, today);

        if next.current() != self.state.current() {
            self.focus_day = if next.current().contains(today) {
                today.day()
            } else {
                self.focus_day.min(next.current().days_in_month())
            };
        } else if action == Action::GoToToday {
            self.focus_day = today.day();
        }

        if let Action::SelectDay(ref date) = action {
            if let Some(day) = focus_for(next.current(), date) {
                self.focus_day = day;
            }
            log::info!("Selected {} ({} events)", date, self.store.events_for_date(date).len());
        }

        self.state = next;
    }

    /// Move keyboard focus by `delta` days, clamped to the displayed month
    pub fn move_focus(&mut self, delta: i32) {
        let days = self.state.current().days_in_month() as i32;
        self.focus_day = (self.focus_day as i32 + delta).clamp(1, days) as u32;
    }

    /// Selection action for the focused day
    pub fn select_focused(&self) -> Option<Action> {
        let date = self.state.current().date(self.focus_day)?;
        Some(Action::SelectDay(date_key(date)))
    }

    pub fn grid(&self, today: NaiveDate) -> MonthGrid {
        MonthGrid::build(self.state.current(), today)
    }

    /// Events of the day shown in the popup, empty while it is closed
    pub fn popup_events(&self) -> Vec<&Event> {
        match self.state.popup() {
            PopupState::Open(date) => self.store.events_for_date(date),
            PopupState::Closed => Vec::new(),
        }
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }
}

/// Day number of `date` if it lies in the `cursor` month
fn focus_for(cursor: MonthCursor, date: &str) -> Option<u32> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    cursor.contains(parsed).then(|| parsed.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::sample_events;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_2025() -> ViewState {
        ViewState::new(MonthCursor::from_month_index(2025, 5).unwrap())
    }

    fn make_app(today: NaiveDate) -> App {
        App::new(EventStore::new(sample_events()).unwrap(), today).unwrap()
    }

    #[test]
    fn test_initial_state_closed() {
        let state = june_2025();
        assert_eq!(state.popup(), PopupState::Closed);
        assert_eq!(state.selected_date(), None);
        assert!(!state.modal_open());
    }

    #[test]
    fn test_navigate_round_trip() {
        for month in -3..15 {
            let state = ViewState::new(MonthCursor::from_month_index(2025, month).unwrap());
            assert_eq!(state.navigate_month(Step::Next).navigate_month(Step::Prev), state);
            assert_eq!(state.navigate_month(Step::Prev).navigate_month(Step::Next), state);
        }
    }

    #[test]
    fn test_navigate_rolls_year() {
        let december = ViewState::new(MonthCursor::from_month_index(2025, 11).unwrap());
        let january = december.navigate_month(Step::Next);
        assert_eq!((january.current().year(), january.current().month0()), (2026, 0));

        let back = january.navigate_month(Step::Prev).navigate_month(Step::Prev);
        assert_eq!((back.current().year(), back.current().month0()), (2025, 10));
    }

    #[test]
    fn test_go_to_today() {
        let state = june_2025().navigate_month(Step::Next).navigate_month(Step::Next);
        let today = state.go_to_today(date(2026, 10, 19));
        assert_eq!((today.current().year(), today.current().month0()), (2026, 9));
    }

    #[test]
    fn test_popup_state_machine() {
        let open = june_2025().select_day("2025-06-23");
        assert_eq!(open.popup(), PopupState::Open("2025-06-23"));

        let switched = open.select_day("2025-06-24");
        assert_eq!(switched.popup(), PopupState::Open("2025-06-24"));

        let closed = switched.close_modal();
        assert_eq!(closed.popup(), PopupState::Closed);
        assert_eq!(closed.selected_date(), Some("2025-06-24"));

        let reopened = closed.select_day("2025-06-25");
        assert_eq!(reopened.popup(), PopupState::Open("2025-06-25"));
    }

    #[test]
    fn test_navigation_keeps_popup_state() {
        let open = june_2025().select_day("2025-06-23");
        let moved = open.navigate_month(Step::Next);
        assert_eq!(moved.popup(), PopupState::Open("2025-06-23"));

        let closed = moved.close_modal().go_to_today(date(2025, 6, 1));
        assert_eq!(closed.popup(), PopupState::Closed);
    }

    #[test]
    fn test_close_without_selection_stays_closed() {
        let state = june_2025().close_modal();
        assert_eq!(state.popup(), PopupState::Closed);
        assert_eq!(state.selected_date(), None);
    }

    #[test]
    fn test_app_apply_select_and_close() {
        let mut app = make_app(date(2025, 6, 10));
        app.apply(Action::SelectDay("2025-06-23".to_string()), date(2025, 6, 10));

        let titles: Vec<_> = app.popup_events().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Team Meeting", "Design Workshop"]);
        assert_eq!(app.focus_day, 23);

        app.apply(Action::CloseModal, date(2025, 6, 10));
        assert!(app.popup_events().is_empty());
        assert_eq!(app.store.events_for_date("2025-06-23").len(), 2);
    }

    #[test]
    fn test_app_focus_clamped_after_navigation() {
        let today = date(2025, 1, 31);
        let mut app = make_app(today);
        assert_eq!(app.focus_day, 31);

        app.apply(Action::NavigateMonth(Step::Next), today);
        assert_eq!(app.focus_day, 28);

        app.apply(Action::NavigateMonth(Step::Prev), today);
        assert_eq!(app.focus_day, 31);
    }

    #[test]
    fn test_app_move_focus_and_select() {
        let today = date(2025, 6, 20);
        let mut app = make_app(today);

        app.move_focus(3);
        assert_eq!(app.focus_day, 23);
        app.move_focus(14);
        assert_eq!(app.focus_day, 30);
        app.move_focus(-100);
        assert_eq!(app.focus_day, 1);

        app.move_focus(22);
        let action = app.select_focused().unwrap();
        assert_eq!(action, Action::SelectDay("2025-06-23".to_string()));
        app.apply(action, today);
        assert_eq!(app.popup_events().len(), 2);
    }

    #[test]
    fn test_app_go_to_today_resets_focus() {
        let today = date(2025, 6, 20);
        let mut app = make_app(today);
        app.move_focus(-5);
        app.apply(Action::GoToToday, today);
        assert_eq!(app.focus_day, 20);
    }
}
