//! Bottom line: the holdings input while typing, keybindings otherwise.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, Mode};

const PROMPT: &str = " Tokens held: ";

/// Renders the footer line.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    match app.mode {
        Mode::Insert => render_input(frame, area, app),
        Mode::Normal => render_keybindings(frame, area),
    }
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let input = &app.holdings_input;
    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Yellow)),
        Span::raw(input.as_str()),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let before_cursor: String = input.as_str().chars().take(input.cursor()).collect();
    let offset = (PROMPT.width() + before_cursor.width()) as u16;
    frame.set_cursor_position(Position::new(
        area.x + offset.min(area.width.saturating_sub(1)),
        area.y,
    ));
}

fn render_keybindings(frame: &mut Frame, area: Rect) {
    let help = "[a]holdings [r]efresh [h/l]scroll [End]latest [q]quit";

    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
