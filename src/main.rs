mod app;
mod config;
mod error;
mod event;
mod grid;
mod input;
mod logging;
mod store;
mod ui;

use app::App;
use chrono::{Local, NaiveDate};
use config::Config;
use crossterm::{
    cursor,
    event::{self as term_event, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use error::{CalviewError, Result};
use input::Command;
use std::io::{self, Write, stdout};
use ui::Screen;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Config and event validation happen before the terminal is touched
    let config = Config::load()?;
    logging::init(config.log_level()?);

    let store = config.event_store().inspect_err(|e| {
        if e.is_validation() {
            eprintln!("calview: rejected event table from {}", Config::config_path().display());
        }
    })?;
    if store.is_empty() {
        log::warn!("Event table is empty");
    }
    let mut app = App::new(store, local_today())
        .ok_or_else(|| CalviewError::Config("current date is outside the supported range".to_string()))?;
    log::info!("Starting with {} events", app.store.len());

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let result = run(&mut app);

    let restored = restore_terminal(&mut stdout());

    result?;
    restored?;
    Ok(())
}

/// Put the terminal back. Raw mode is dropped before any write so a failed
/// write cannot leave the shell in raw mode.
fn restore_terminal(out: &mut impl Write) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(out, DisableMouseCapture, LeaveAlternateScreen, cursor::Show);
    raw.and(screen)
}

/// Event loop. Every handled input is followed by a full render of the new state.
fn run(app: &mut App) -> Result<()> {
    let mut out = stdout();
    ui::render(&mut out, app, local_today(), Screen::current())?;

    loop {
        let today = local_today();
        let screen = Screen::current();

        let command = match term_event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                input::command_for_key(key, app.state.modal_open())
            }
            Event::Mouse(mouse) => {
                let grid = app.grid(today);
                let popup = ui::popup_area(app, &grid, screen);
                input::command_for_mouse(mouse, &grid, popup)
            }
            Event::Resize(..) => Some(Command::Redraw),
            _ => None,
        };

        let Some(command) = command else {
            continue;
        };

        match command {
            Command::Quit => break,
            Command::Apply(action) => app.apply(action, today),
            Command::MoveFocus(delta) => app.move_focus(delta),
            Command::SelectFocused => {
                if let Some(action) = app.select_focused() {
                    app.apply(action, today);
                }
            }
            Command::ToggleLogs => app.toggle_logs(),
            Command::Redraw => {}
        }

        ui::render(&mut out, app, today, screen)?;
    }

    log::info!("Exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_restore_terminal_leaves_alternate_screen() {
        let mut buf = Vec::new();
        restore_terminal(&mut buf).unwrap();
        let out = String::from_utf8_lossy(&buf);
        assert!(out.contains("\x1b[?1049l"));
        assert!(out.contains("\x1b[?25h"));
    }

    #[test]
    fn test_restore_terminal_reports_write_failure() {
        let err = restore_terminal(&mut BrokenPipe).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
