//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::App;

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (status, status_color) = match (&app.series, &app.error_message) {
        (None, None) => (" Loading ".to_string(), Color::Yellow),
        (None, Some(_)) => (" No Data ".to_string(), Color::Red),
        (Some(series), _) => (format!(" {} pts ", series.len()), Color::Green),
    };

    let refreshed = match app.last_refresh {
        Some(at) => Span::styled(
            format!(" Updated {} ", at.format("%H:%M:%S")),
            Style::default().fg(Color::White),
        ),
        None => Span::styled(" Never updated ", Style::default().fg(Color::DarkGray)),
    };

    let error_span = if let Some(ref error) = app.error_message {
        Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::raw("")
    };

    let contract = format!(" {} ", app.contract);

    let line = Line::from(vec![
        Span::styled(status, Style::default().fg(status_color)),
        Span::raw("│"),
        refreshed,
        Span::raw("│"),
        error_span,
        Span::styled(
            format!(
                "{:>width$}",
                contract,
                width = area.width.saturating_sub(45) as usize
            ),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
