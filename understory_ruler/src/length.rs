// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ruler length: how many columns the tick strip must span.
//!
//! The length is always a whole number of decades. It follows the visible
//! viewport when lines wrap, or the longest document line when they do not,
//! and is then clamped so that:
//!
//! - it is never shorter than [`RulerBounds::min_columns`],
//! - it always reaches the guide column (rounded up to the next decade),
//! - it never exceeds [`RulerBounds::max_columns`].
//!
//! ```
//! use understory_ruler::{LengthInputs, RulerBounds, compute_length};
//!
//! let bounds = RulerBounds::default();
//! let inputs = LengthInputs {
//!     word_wrap: false,
//!     viewport_width_px: 0.0,
//!     tick_width_px: 8.0,
//!     max_line_length: 95,
//!     guide_column: 80,
//! };
//! assert_eq!(compute_length(&inputs, &bounds), 100);
//! ```

/// Smallest ruler length, in columns.
pub const MIN_COLUMNS: u32 = 80;

/// Largest ruler length, in columns.
///
/// Longer rulers are clamped; the guide column is clamped to this value too.
pub const MAX_COLUMNS: u32 = 1000;

/// Number of columns covered by one number label block.
pub const DECADE: u32 = 10;

/// Lower and upper bounds on the ruler length.
///
/// Both bounds are multiples of [`DECADE`]. [`RulerBounds::new`] rounds
/// arbitrary values onto that grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RulerBounds {
    min_columns: u32,
    max_columns: u32,
}

impl Default for RulerBounds {
    fn default() -> Self {
        Self {
            min_columns: MIN_COLUMNS,
            max_columns: MAX_COLUMNS,
        }
    }
}

impl RulerBounds {
    /// Creates bounds from arbitrary column counts.
    ///
    /// `min_columns` is rounded up and `max_columns` rounded down to a decade.
    /// The pair is normalized so that `min <= max`, the minimum is at least
    /// one decade, and neither exceeds [`MAX_COLUMNS`].
    #[must_use]
    pub fn new(min_columns: u32, max_columns: u32) -> Self {
        let (lo, hi) = if min_columns <= max_columns {
            (min_columns, max_columns)
        } else {
            (max_columns, min_columns)
        };
        let min_columns = round_up_to_decade(lo.min(MAX_COLUMNS)).max(DECADE);
        let max_columns = (hi.min(MAX_COLUMNS) / DECADE * DECADE).max(min_columns);
        Self {
            min_columns,
            max_columns,
        }
    }

    /// Returns the minimum ruler length.
    #[must_use]
    pub const fn min_columns(&self) -> u32 {
        self.min_columns
    }

    /// Returns the maximum ruler length.
    #[must_use]
    pub const fn max_columns(&self) -> u32 {
        self.max_columns
    }

    /// Clamps a guide column into `[0, max_columns]`.
    #[must_use]
    pub fn clamp_guide(&self, column: i64) -> u32 {
        let clamped = column.clamp(0, i64::from(self.max_columns));
        u32::try_from(clamped).unwrap_or(self.max_columns)
    }
}

/// Inputs to [`compute_length`].
///
/// These are plain copies of what the host editor reported; no validation is
/// assumed. Non-finite or non-positive pixel values are treated as "unknown".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LengthInputs {
    /// Whether the editor currently soft-wraps long lines.
    pub word_wrap: bool,
    /// Width of the editor's text area in pixels.
    pub viewport_width_px: f64,
    /// Measured width of a single tick cell in pixels.
    pub tick_width_px: f64,
    /// Length of the longest document line, in columns.
    pub max_line_length: u32,
    /// Current guide column.
    pub guide_column: u32,
}

/// Rounds `columns` up to the next multiple of [`DECADE`].
#[must_use]
pub const fn round_up_to_decade(columns: u32) -> u32 {
    columns.div_ceil(DECADE).saturating_mul(DECADE)
}

/// Computes the ruler length in columns.
///
/// This is a pure function: it can be called redundantly and always produces
/// a multiple of [`DECADE`] in `[bounds.min_columns(), bounds.max_columns()]`.
#[must_use]
pub fn compute_length(inputs: &LengthInputs, bounds: &RulerBounds) -> u32 {
    let raw = if inputs.word_wrap {
        visible_columns(inputs.viewport_width_px, inputs.tick_width_px)
    } else {
        round_up_to_decade(inputs.max_line_length)
    };

    let mut length = raw.max(bounds.min_columns);
    if length < inputs.guide_column {
        length = round_up_to_decade(inputs.guide_column);
    }
    length.min(bounds.max_columns)
}

/// Number of whole decades that fit the viewport, rounded up, in columns.
fn visible_columns(viewport_width_px: f64, tick_width_px: f64) -> u32 {
    if !tick_width_px.is_finite() || tick_width_px <= 0.0 || !viewport_width_px.is_finite() {
        return 0;
    }
    let decades = libm::ceil(viewport_width_px.max(0.0) / tick_width_px / f64::from(DECADE));
    if decades >= f64::from(u32::MAX / DECADE) {
        return u32::MAX / DECADE * DECADE;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Non-negative and bounded above by the check just before"
    )]
    let decades = decades as u32;
    decades * DECADE
}
