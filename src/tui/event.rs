//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};
use tokio::sync::mpsc;
use tracing::warn;

use crate::models::{PriceRecord, TokenInfo};

use super::app::{App, Mode};
use super::input::TextInput;

/// Bars moved per scroll step.
const SCROLL_STEP: usize = 5;

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The mouse moved or scrolled.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// Token metadata arrived.
    TokenLoaded(TokenInfo),
    /// A full price history arrived.
    PricesLoaded(Vec<PriceRecord>),
    /// A refresh cycle failed; the previous data stays on screen.
    RefreshFailed(String),

    /// Request to quit the application.
    Quit,
}

/// Actions that require external handling.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// Run a refresh cycle now.
    RefreshNow,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Mouse(mouse))) => {
                    if tx.send(Message::Input(Event::Mouse(mouse))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::TokenLoaded(token) => {
            app.set_token(token);
            None
        }
        Message::PricesLoaded(records) => {
            if let Err(e) = app.apply_prices(&records) {
                warn!(error = %e, "Keeping previous price series");
                app.show_error(e.to_string());
            }
            None
        }
        Message::RefreshFailed(error) => {
            app.show_error(format!("refresh failed: {error}"));
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => {
            handle_mouse(app, mouse);
            None
        }
        Event::Resize(_, _) => {
            app.hover = None;
            None
        }
        Event::Tick => {
            app.clear_stale_errors();
            None
        }
    }
}

/// Tracks the hover position and turns the wheel into horizontal scrolling.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.hover = Some((mouse.column, mouse.row));
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => app.scroll_older(SCROLL_STEP),
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => app.scroll_newer(SCROLL_STEP),
        _ => {}
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Insert => {
            handle_insert_mode(app, key);
            None
        }
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('r') => Some(Action::RefreshNow),

        // Enter a holdings amount
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Enter => {
            app.mode = Mode::Insert;
            None
        }

        // Horizontal scrolling
        KeyCode::Char('h') | KeyCode::Left => {
            app.scroll_older(1);
            None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.scroll_newer(1);
            None
        }
        KeyCode::Char('H') | KeyCode::PageUp => {
            app.scroll_older(SCROLL_STEP);
            None
        }
        KeyCode::Char('L') | KeyCode::PageDown => {
            app.scroll_newer(SCROLL_STEP);
            None
        }
        KeyCode::End | KeyCode::Char('0') => {
            app.scroll_back = 0;
            None
        }

        _ => None,
    }
}

/// Handles keys while typing a holdings amount.
fn handle_insert_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_holdings(),
        KeyCode::Esc => {
            app.holdings_input.clear();
            app.mode = Mode::Normal;
        }
        _ => edit_input(&mut app.holdings_input, key.code),
    }
}

fn edit_input(input: &mut TextInput, code: KeyCode) {
    match code {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => {}
    }
}
