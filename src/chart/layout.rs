//! Stacked-bar layout for the price chart.
//!
//! Each bar is placed relative to the one before it: rising prices draw a
//! short segment climbing from the previous bar's top, falling prices draw
//! a tall segment reaching down. The layout is a pure left fold over the
//! value sequence and is recomputed on every draw.
//!
//! Coordinates are in pixel-like units with `y` growing downward.

/// Nominal bar height.
pub const BAR_HEIGHT: f64 = 20.0;

/// Horizontal slot allotted to each bar.
pub const BAR_WIDTH: f64 = 15.0;

/// How far a bar's stacking point sits above its own baseline.
const STACK_OFFSET: f64 = BAR_HEIGHT / 1.5;

/// Empty space left between adjacent bars.
const BAR_GAP: f64 = 2.0;

/// Direction encoded by a bar's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    /// Price rose versus the previous bar, or there is no previous bar.
    Up,
    /// Price was flat or fell.
    Down,
}

/// Geometry of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarVisual {
    pub index: usize,
    pub color: BarColor,
    pub x: f64,
    pub width: f64,
    pub top_y: f64,
    /// May be negative, in which case the bar extends upward from `top_y`.
    pub height: f64,
}

impl BarVisual {
    /// Returns `(upper, lower)` y bounds regardless of the height's sign.
    pub fn vertical_span(&self) -> (f64, f64) {
        let end = self.top_y + self.height;
        (self.top_y.min(end), self.top_y.max(end))
    }
}

/// Linear mapping from price to y coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    min: f64,
    max: f64,
    top: f64,
    bottom: f64,
}

impl ValueScale {
    /// Maps `min..=max` onto `bottom..=top`.
    pub fn new(min: f64, max: f64, top: f64, bottom: f64) -> Self {
        Self {
            min,
            max,
            top,
            bottom,
        }
    }

    /// Fits the scale to `values` with a tenth of the range as headroom on
    /// each side. A flat or empty series gets a symmetric band around its
    /// value.
    pub fn fit(values: &[f64], top: f64, bottom: f64) -> Self {
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        if !min.is_finite() || !max.is_finite() {
            return Self::new(0.0, 1.0, top, bottom);
        }

        let range = max - min;
        let pad = if range > 0.0 {
            range / 10.0
        } else if min != 0.0 {
            min.abs() / 10.0
        } else {
            1.0
        };
        Self::new(min - pad, max + pad, top, bottom)
    }

    /// Plotted y coordinate of `value`.
    pub fn y_for(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return (self.top + self.bottom) / 2.0;
        }
        self.bottom - (value - self.min) / span * (self.bottom - self.top)
    }

    /// Value plotted at `y`; inverse of [`ValueScale::y_for`].
    pub fn value_at(&self, y: f64) -> f64 {
        let height = self.bottom - self.top;
        if height == 0.0 {
            return self.min;
        }
        self.min + (self.bottom - y) / height * (self.max - self.min)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Where the bars sit: category slots along `x`, values along `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    pub left: f64,
    pub slot_width: f64,
    pub scale: ValueScale,
}

impl PlotGeometry {
    pub fn new(left: f64, slot_width: f64, scale: ValueScale) -> Self {
        Self {
            left,
            slot_width,
            scale,
        }
    }

    /// Horizontal centre of the bar at `index`.
    pub fn center_x(&self, index: usize) -> f64 {
        self.left + (index as f64 + 0.5) * self.slot_width
    }

    /// Index of the slot under `x`, if any.
    pub fn index_at(&self, x: f64, count: usize) -> Option<usize> {
        if x < self.left || self.slot_width <= 0.0 {
            return None;
        }
        let index = ((x - self.left) / self.slot_width) as usize;
        (index < count).then_some(index)
    }
}

/// Running state threaded through the layout fold.
#[derive(Debug, Clone, Copy, Default)]
struct LayoutState {
    previous_value: Option<f64>,
    previous_top: Option<f64>,
}

impl LayoutState {
    fn place(self, index: usize, value: f64, geometry: &PlotGeometry) -> (BarVisual, Self) {
        let color = match self.previous_value {
            Some(previous) if value <= previous => BarColor::Down,
            _ => BarColor::Up,
        };

        let new_top = geometry.scale.y_for(value) - BAR_HEIGHT / 2.0;
        let top_y = self.previous_top.unwrap_or(new_top - STACK_OFFSET);

        let stacked = self
            .previous_top
            .map_or(0.0, |previous| new_top - previous + STACK_OFFSET);
        // Rises are capped at the bar height, falls are at least that tall.
        let height = match color {
            BarColor::Up => BAR_HEIGHT.min(stacked),
            BarColor::Down => BAR_HEIGHT.max(stacked),
        };

        let bar = BarVisual {
            index,
            color,
            x: geometry.center_x(index) - geometry.slot_width / 2.0,
            width: geometry.slot_width - BAR_GAP,
            top_y,
            height,
        };
        let next = Self {
            previous_value: Some(value),
            previous_top: Some(new_top),
        };
        (bar, next)
    }
}

/// Lays out one bar per value, in order.
pub fn layout_bars(values: &[f64], geometry: &PlotGeometry) -> Vec<BarVisual> {
    let (bars, _) = values.iter().enumerate().fold(
        (Vec::with_capacity(values.len()), LayoutState::default()),
        |(mut bars, state), (index, value)| {
            let (bar, next) = state.place(index, *value, geometry);
            bars.push(bar);
            (bars, next)
        },
    );
    bars
}
