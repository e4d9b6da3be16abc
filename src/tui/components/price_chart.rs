//! Bar chart panel.
//!
//! The layout engine works in pixel-like units. Each terminal cell stands
//! for a `CELL_WIDTH` x `CELL_HEIGHT` block of them, so one bar slot spans
//! three columns and each cell row holds two half-block rows.

use std::ops::Range;

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::chart::adapter::{ChartFrame, format_time_label, y_ticks};
use crate::chart::layout::BAR_WIDTH;
use crate::chart::{BarColor, BarVisual, Chart, TooltipText, position_tooltip, tooltip_text};
use crate::tui::app::App;

/// Horizontal layout units per terminal column.
pub const CELL_WIDTH: f64 = 5.0;

/// Vertical layout units per terminal row.
pub const CELL_HEIGHT: f64 = 10.0;

const UP_COLOR: Color = Color::Rgb(40, 164, 156);
const DOWN_COLOR: Color = Color::Rgb(240, 84, 84);

/// Width of the price axis on the right.
const AXIS_WIDTH: u16 = 14;

const MAX_Y_TICKS: usize = 5;

/// Renders the chart panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let title = match app.chart.chart() {
        Some(chart) if app.scroll_back > 0 => {
            format!(" Price [{} pts, -{}] ", chart.data().len(), app.scroll_back)
        }
        Some(chart) => format!(" Price [{} pts] ", chart.data().len()),
        None => " Price ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(chart) = app.chart.chart().filter(|c| !c.data().is_empty()) else {
        let para = Paragraph::new("No price data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(AXIS_WIDTH)])
        .split(rows[0]);
    let (plot, axis, time_axis) = (columns[0], columns[1], rows[1]);

    let plot_bottom = f64::from(plot.height) * CELL_HEIGHT;
    let chart_frame = chart.draw(0.0, plot_bottom);
    let visible = visible_range(chart.width(), visible_slots(plot.width), app.scroll_back);
    let view_left = visible.start as f64 * BAR_WIDTH;

    paint_bars(
        frame.buffer_mut(),
        plot,
        &chart_frame.bars[visible.clone()],
        view_left,
    );
    render_price_axis(frame, axis, &chart_frame, plot_bottom);
    render_time_axis(frame, time_axis, chart, &chart_frame, visible.clone(), view_left);

    if let Some((column, row)) = app.hover
        && contains(plot, column, row)
    {
        let x = view_left + (f64::from(column - plot.x) + 0.5) * CELL_WIDTH;
        if let Some(index) = chart_frame.geometry.index_at(x, chart.data().len())
            && visible.contains(&index)
            && let Some(text) = tooltip_text(chart.data(), index)
        {
            render_tooltip(frame, area, column, &text);
        }
    }
}

/// Number of whole bar slots that fit in `columns`.
fn visible_slots(columns: u16) -> usize {
    (f64::from(columns) * CELL_WIDTH / BAR_WIDTH) as usize
}

/// Indices on screen: the newest `slots` bars of a chart `chart_width`
/// units wide, shifted back by `scroll_back`.
fn visible_range(chart_width: f64, slots: usize, scroll_back: usize) -> Range<usize> {
    let count = (chart_width / BAR_WIDTH).round() as usize;
    let end = count.saturating_sub(scroll_back.min(count.saturating_sub(1)));
    end.saturating_sub(slots)..end
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Glyph for a cell whose rows run from `cell_top` for one `CELL_HEIGHT`,
/// given a bar covering `upper..=lower`.
fn cell_glyph(cell_top: f64, upper: f64, lower: f64) -> Option<char> {
    let covers = |center: f64| center >= upper && center <= lower;
    let top = covers(cell_top + CELL_HEIGHT * 0.25);
    let bottom = covers(cell_top + CELL_HEIGHT * 0.75);
    match (top, bottom) {
        (true, true) => Some('█'),
        (true, false) => Some('▀'),
        (false, true) => Some('▄'),
        (false, false) => None,
    }
}

fn bar_color(color: BarColor) -> Color {
    match color {
        BarColor::Up => UP_COLOR,
        BarColor::Down => DOWN_COLOR,
    }
}

fn paint_bars(buf: &mut Buffer, plot: Rect, bars: &[BarVisual], view_left: f64) {
    for bar in bars {
        let (upper, lower) = bar.vertical_span();
        let style = Style::default().fg(bar_color(bar.color));

        for column in 0..plot.width {
            let center_x = view_left + (f64::from(column) + 0.5) * CELL_WIDTH;
            if center_x < bar.x || center_x >= bar.x + bar.width {
                continue;
            }
            for row in 0..plot.height {
                let Some(glyph) = cell_glyph(f64::from(row) * CELL_HEIGHT, upper, lower) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((plot.x + column, plot.y + row)) {
                    cell.set_char(glyph).set_style(style);
                }
            }
        }
    }
}

fn render_price_axis(frame: &mut Frame, axis: Rect, chart_frame: &ChartFrame, plot_bottom: f64) {
    let count = MAX_Y_TICKS.min(usize::from(axis.height));
    let style = Style::default().fg(Color::DarkGray);

    for (y, label) in y_ticks(&chart_frame.geometry.scale, 0.0, plot_bottom, count) {
        let row = ((y / CELL_HEIGHT) as u16).min(axis.height.saturating_sub(1));
        let line = Line::from(vec![Span::styled("┤", style), Span::raw(label)]);
        frame.render_widget(
            Paragraph::new(line),
            Rect::new(axis.x, axis.y + row, axis.width, 1),
        );
    }
}

fn render_time_axis(
    frame: &mut Frame,
    area: Rect,
    chart: &Chart,
    chart_frame: &ChartFrame,
    visible: Range<usize>,
    view_left: f64,
) {
    let Some(first) = chart.data().labels.first() else {
        return;
    };
    let label_width = format_time_label(first).width() + 2;
    let bars_per_label = (label_width as f64 * CELL_WIDTH / BAR_WIDTH).ceil() as usize;

    for index in visible.step_by(bars_per_label.max(1)) {
        let left = chart_frame.geometry.center_x(index) - BAR_WIDTH / 2.0 - view_left;
        let column = (left / CELL_WIDTH).round() as u16;
        if usize::from(column) + label_width > usize::from(area.width) {
            break;
        }
        let label = format_time_label(&chart.data().labels[index]);
        frame.render_widget(
            Paragraph::new(label).style(Style::default().fg(Color::DarkGray)),
            Rect::new(area.x + column, area.y, label_width as u16, 1),
        );
    }
}

/// Draws the tooltip box at the anchor for a hover over `column`.
fn render_tooltip(frame: &mut Frame, container: Rect, column: u16, text: &TooltipText) {
    let anchor = position_tooltip(
        f64::from(column) * CELL_WIDTH,
        f64::from(container.bottom()) * CELL_HEIGHT,
    );

    let footer_color = match text.footer.as_deref() {
        Some(f) if f.starts_with('+') => UP_COLOR,
        Some(f) if f.starts_with('-') => DOWN_COLOR,
        _ => Color::Gray,
    };
    let mut lines = vec![
        Line::from(Span::styled(
            text.title.as_str(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            text.body.as_str(),
            Style::default().fg(Color::White),
        )),
    ];
    if let Some(footer) = &text.footer {
        lines.push(Line::from(Span::styled(
            footer.as_str(),
            Style::default().fg(footer_color),
        )));
    }

    let content_width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
    let size = (content_width + 4, lines.len() as u16 + 2);
    let anchor_cell = (
        (anchor.x / CELL_WIDTH) as u16,
        (anchor.y.max(0.0) / CELL_HEIGHT) as u16,
    );
    let rect = tooltip_rect(anchor_cell, size, frame.area());

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        rect,
    );
}

/// Places a `(width, height)` box right of the anchor, flipping left and
/// clamping so it stays within `bounds`.
fn tooltip_rect(anchor: (u16, u16), size: (u16, u16), bounds: Rect) -> Rect {
    let width = size.0.min(bounds.width);
    let height = size.1.min(bounds.height);

    let x = if anchor.0.saturating_add(1).saturating_add(width) <= bounds.right() {
        anchor.0 + 1
    } else {
        anchor.0.saturating_sub(width + 1).max(bounds.x)
    };
    let y = anchor
        .1
        .clamp(bounds.y, bounds.bottom().saturating_sub(height));

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::adapter::display_width;

    #[test]
    fn newest_bars_are_visible_by_default() {
        assert_eq!(visible_range(display_width(100), 20, 0), 80..100);
        assert_eq!(visible_range(display_width(5), 20, 0), 0..5);
        assert_eq!(visible_range(display_width(0), 20, 0), 0..0);
    }

    #[test]
    fn scrolling_back_shifts_the_window() {
        assert_eq!(visible_range(display_width(100), 20, 10), 70..90);
        // Never scrolls past the oldest bar.
        assert_eq!(visible_range(display_width(100), 20, 500), 0..1);
    }

    #[test]
    fn three_columns_per_slot() {
        assert_eq!(visible_slots(60), 20);
        assert_eq!(visible_slots(2), 0);
    }

    #[test]
    fn half_blocks_follow_the_span() {
        assert_eq!(cell_glyph(0.0, 0.0, 10.0), Some('█'));
        assert_eq!(cell_glyph(0.0, 0.0, 4.0), Some('▀'));
        assert_eq!(cell_glyph(0.0, 6.0, 20.0), Some('▄'));
        assert_eq!(cell_glyph(0.0, 11.0, 20.0), None);
    }

    #[test]
    fn zero_height_bar_draws_nothing() {
        assert_eq!(cell_glyph(0.0, 4.0, 4.0), None);
    }

    #[test]
    fn tooltip_flips_left_near_right_edge() {
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(tooltip_rect((10, 5), (20, 5), bounds), Rect::new(11, 5, 20, 5));
        assert_eq!(tooltip_rect((75, 5), (20, 5), bounds), Rect::new(54, 5, 20, 5));
    }

    #[test]
    fn tooltip_stays_inside_vertically() {
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(tooltip_rect((10, 22), (20, 5), bounds).y, 19);
    }

    #[test]
    fn tooltip_anchor_is_ten_rows_above_bottom() {
        let anchor = position_tooltip(12.0 * CELL_WIDTH, 30.0 * CELL_HEIGHT);
        assert_eq!((anchor.y / CELL_HEIGHT) as u16, 20);
    }
}
