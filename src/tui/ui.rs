//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::app::App;
use super::components::{footer, metrics_bar, price_chart, status_bar};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Metrics
            Constraint::Min(6),    // Chart
            Constraint::Length(1), // Holdings input / keybindings
        ])
        .split(area);

    status_bar::render(frame, main_layout[0], app);
    metrics_bar::render(frame, main_layout[1], app);
    price_chart::render(frame, main_layout[2], app);
    footer::render(frame, main_layout[3], app);
}
