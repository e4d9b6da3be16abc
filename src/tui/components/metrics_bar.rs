//! Header line with the token's derived metrics.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use rust_decimal::Decimal;

use crate::chart::MetricsSnapshot;
use crate::tui::app::App;

/// Renders price, 24h change, market cap and holdings value.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let content = match &app.metrics {
        Some(metrics) => Line::from(metric_spans(metrics, app.held_tokens)),
        None => Line::from(Span::styled(" -- ", Style::default().fg(Color::DarkGray))),
    };

    let para = Paragraph::new(content).style(Style::default().bg(Color::Black));
    frame.render_widget(para, area);
}

fn metric_spans(metrics: &MetricsSnapshot, held_tokens: Decimal) -> Vec<Span<'static>> {
    let label = Style::default().fg(Color::DarkGray);

    let change = match metrics.change_percent {
        Some(pct) => {
            let color = if pct >= Decimal::ZERO {
                Color::Green
            } else {
                Color::Red
            };
            let arrow = if pct >= Decimal::ZERO { "▲" } else { "▼" };
            Span::styled(format!("{arrow} {pct:+.2}% "), Style::default().fg(color))
        }
        None => Span::styled("n/a ", label),
    };

    vec![
        Span::styled(
            format!(" {:.8}$ ", metrics.current_price),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("24h: ", label),
        change,
        Span::styled("MCap: ", label),
        Span::styled(
            format!("{:.2}$ ", metrics.market_cap),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(format!("Holdings ({held_tokens}): "), label),
        Span::styled(
            format!("{:.2}$", metrics.holdings_value),
            Style::default().fg(Color::Yellow),
        ),
    ]
}
