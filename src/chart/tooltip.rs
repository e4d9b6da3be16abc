//! Hover tooltip placement and text.

use rust_decimal::Decimal;

use super::adapter::{ChartData, format_time_label};
use super::metrics::percent_change;

/// Distance between the container's bottom edge and the tooltip anchor.
pub const TOOLTIP_BOTTOM_OFFSET: f64 = 100.0;

/// Screen point the tooltip is drawn at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipAnchor {
    pub x: f64,
    pub y: f64,
}

/// Anchors the tooltip at the hover's `x`, pinned a fixed distance above
/// the container's bottom edge whatever the cursor's `y`.
pub fn position_tooltip(hover_x: f64, container_bottom: f64) -> TooltipAnchor {
    TooltipAnchor {
        x: hover_x,
        y: container_bottom - TOOLTIP_BOTTOM_OFFSET,
    }
}

/// Lines shown in the tooltip for one point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipText {
    pub title: String,
    pub body: String,
    /// Change versus the preceding point; absent for the first point.
    pub footer: Option<String>,
}

/// Builds the tooltip for the point at `index`.
pub fn tooltip_text(data: &ChartData, index: usize) -> Option<TooltipText> {
    let label = data.labels.get(index)?;
    let value = *data.values.get(index)?;

    let footer = index
        .checked_sub(1)
        .and_then(|previous| data.values.get(previous))
        .map(|previous| format_change(value, *previous));

    Some(TooltipText {
        title: format_time_label(label),
        body: format!("{value:.8}$"),
        footer,
    })
}

/// `+1.50% (0.01500000$)`; the percent is dropped when `previous` is zero.
fn format_change(value: Decimal, previous: Decimal) -> String {
    let diff = value - previous;
    match percent_change(value, previous) {
        Ok(percent) => {
            let sign = if percent > Decimal::ZERO { "+" } else { "" };
            format!("{sign}{percent:.2}% ({diff:.8}$)")
        }
        Err(_) => format!("({diff:.8}$)"),
    }
}
