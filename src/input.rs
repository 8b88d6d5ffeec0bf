//! Key and mouse bindings

use crate::app::{Action, Step};
use crate::grid::MonthGrid;
use crate::ui::{self, Rect, Target};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(Action),
    MoveFocus(i32),
    SelectFocused,
    ToggleLogs,
    Redraw,
    Quit,
}

pub fn command_for_key(key: KeyEvent, popup_open: bool) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Char('p') | KeyCode::Char('<') | KeyCode::PageUp => Command::Apply(Action::NavigateMonth(Step::Prev)),
        KeyCode::Char('n') | KeyCode::Char('>') | KeyCode::PageDown => Command::Apply(Action::NavigateMonth(Step::Next)),
        KeyCode::Char('t') => Command::Apply(Action::GoToToday),
        KeyCode::Char('h') | KeyCode::Left => Command::MoveFocus(-1),
        KeyCode::Char('l') | KeyCode::Right => Command::MoveFocus(1),
        KeyCode::Char('k') | KeyCode::Up => Command::MoveFocus(-7),
        KeyCode::Char('j') | KeyCode::Down => Command::MoveFocus(7),
        KeyCode::Enter | KeyCode::Char(' ') => Command::SelectFocused,
        KeyCode::Char('L') => Command::ToggleLogs,
        KeyCode::Esc if popup_open => Command::Apply(Action::CloseModal),
        KeyCode::Esc | KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Left clicks only; everything else is ignored
pub fn command_for_mouse(mouse: MouseEvent, grid: &MonthGrid, popup: Option<Rect>) -> Option<Command> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }

    let action = match ui::hit_test(grid, popup, mouse.column, mouse.row)? {
        Target::PrevMonth => Action::NavigateMonth(Step::Prev),
        Target::NextMonth => Action::NavigateMonth(Step::Next),
        Target::Today => Action::GoToToday,
        Target::Day(date) => Action::SelectDay(date),
        Target::ClosePopup => Action::CloseModal,
        Target::Popup => return None,
    };
    Some(Command::Apply(action))
}
