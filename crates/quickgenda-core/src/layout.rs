//! Layout resolution for cloned template elements.
//!
//! All geometry is in points, using the host's geometric-bounds
//! convention `[top, left, bottom, right]` with `y` growing downwards.
//!
//! # Chair grid
//!
//! One of `columns` / `rows` is authoritative depending on the fill order;
//! the other is derived from the item count:
//!
//! | Order | cols | rows |
//! |-------|------|------|
//! | `row` | `max(1, columns)` | `ceil(total / cols)` |
//! | `col` | `ceil(total / rows)` | `max(1, rows)` |
//!
//! Item `i` lands at `(startX + c·(w + colSpacing), startY + r·(h + rowSpacing))`.
//!
//! # Independent topic rows
//!
//! Row `i` is placed at `baseY + i·(rowHeight + spacing)`; the horizontal
//! position never changes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::settings::{ChairLayoutConfig, FillOrder};

/// Points per millimetre.
pub const PT_PER_MM: f64 = 2.834645669;
/// Points per centimetre.
pub const PT_PER_CM: f64 = 28.34645669;
/// Points per CSS pixel (96 dpi → 72 dpi).
pub const PT_PER_PX: f64 = 0.75;

/// Unit a spacing value is authored in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Pt,
    Mm,
    Cm,
    Px,
}

impl Unit {
    /// Convert `value` in this unit to points.
    pub fn to_points(self, value: f64) -> f64 {
        match self {
            Unit::Pt => value,
            Unit::Mm => value * PT_PER_MM,
            Unit::Cm => value * PT_PER_CM,
            Unit::Px => value * PT_PER_PX,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pt" => Some(Unit::Pt),
            "mm" => Some(Unit::Mm),
            "cm" => Some(Unit::Cm),
            "px" => Some(Unit::Px),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Pt => "pt",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::Px => "px",
        }
    }
}

static VALUE_WITH_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d*(?:\.\d+)?)\s*([a-zA-Z%]*)\s*$").expect("valid pattern")
});

/// Parse strings like `"8pt"`, `"5 mm"` or `"10.5cm"`.
///
/// Unrecognised units fall back to `default_unit`; an unparsable number
/// becomes `0`.
pub fn parse_value_with_unit(text: &str, default_unit: Unit) -> (f64, Unit) {
    let Some(caps) = VALUE_WITH_UNIT.captures(text.trim()) else {
        return (0.0, default_unit);
    };
    let value = caps[1].parse::<f64>().unwrap_or(0.0);
    let unit = match &caps[2] {
        "" => default_unit,
        u => Unit::parse(u).unwrap_or(default_unit),
    };
    (value, unit)
}

/// Format a value rounded to two decimals followed by its unit.
pub fn format_value_with_unit(value: f64, unit: Unit) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}{}", rounded, unit.as_str())
}

/// Geometric bounds `[top, left, bottom, right]` in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Bounds {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.top + dy, self.left + dx, self.bottom + dy, self.right + dx)
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.top.min(other.top),
            self.left.min(other.left),
            self.bottom.max(other.bottom),
            self.right.max(other.right),
        )
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(b: [f64; 4]) -> Self {
        Bounds::new(b[0], b[1], b[2], b[3])
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.top, b.left, b.bottom, b.right]
    }
}

/// Top-left target of a placed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Resolved grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub cols: usize,
    pub rows: usize,
}

impl GridDimensions {
    /// Derive the grid for `total` items.
    pub fn resolve(total: usize, order: FillOrder, columns: u32, rows: u32) -> Self {
        match order {
            FillOrder::Row => {
                let cols = (columns as usize).max(1);
                Self {
                    cols,
                    rows: total.div_ceil(cols),
                }
            }
            FillOrder::Col => {
                let rows = (rows as usize).max(1);
                Self {
                    cols: total.div_ceil(rows),
                    rows,
                }
            }
        }
    }

    /// `(row, col)` of item `index`.
    pub fn cell(&self, index: usize, order: FillOrder) -> (usize, usize) {
        match order {
            FillOrder::Row => (index / self.cols, index % self.cols),
            FillOrder::Col => (index % self.rows, index / self.rows),
        }
    }
}

/// Target top-left corners for `total` chair clones.
///
/// `prototype` is the bounds of the clone root; `page` is the container
/// used for horizontal centering.
pub fn chair_grid_positions(
    total: usize,
    config: &ChairLayoutConfig,
    prototype: Bounds,
    page: Bounds,
) -> Vec<Point> {
    if total == 0 {
        return Vec::new();
    }

    let dims = GridDimensions::resolve(total, config.order, config.columns, config.rows);
    let col_spacing = config.col_spacing_pt();
    let row_spacing = config.row_spacing_pt();
    let w = prototype.width();
    let h = prototype.height();

    let start_x = if config.center_grid {
        centered_start_x(dims.cols.min(total), w, col_spacing, page)
    } else {
        prototype.left
    };
    let start_y = prototype.top;

    (0..total)
        .map(|i| {
            let (r, c) = dims.cell(i, config.order);
            Point {
                x: start_x + c as f64 * (w + col_spacing),
                y: start_y + r as f64 * (h + row_spacing),
            }
        })
        .collect()
}

/// Left edge that centres `items_in_row` cells of width `w` on the page.
pub fn centered_start_x(items_in_row: usize, w: f64, col_spacing: f64, page: Bounds) -> f64 {
    let n = items_in_row as f64;
    let row_width = (n - 1.0).max(0.0) * col_spacing + n * w;
    page.left + (page.width() - row_width) / 2.0
}

/// Vertical offsets for `count` independent topic rows.
pub fn topic_row_offsets(count: usize, base_y: f64, row_height: f64, spacing_pt: f64) -> Vec<f64> {
    (0..count)
        .map(|i| base_y + i as f64 * (row_height + spacing_pt))
        .collect()
}
