//! Terminal user interface for the token price chart.
//!
//! Provides a Ratatui-based TUI showing the live bar chart, the derived
//! metrics header, a holdings input and the hover tooltip.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
