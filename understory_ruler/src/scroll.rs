// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal alignment of the tick strip with the editor's text columns.
//!
//! The strip is translated by a whole-pixel offset so that tick cell `c`
//! sits exactly above text column `c`:
//!
//! ```text
//! offset = gutter + line_padding - ceil(tick_width * 1.5) - scroll_left
//! ```
//!
//! The left filler is `ceil(tick_width * 1.5) - tick_width` wide, which puts
//! the boundary between tick 0 and tick 1 on the boundary between the gutter
//! and the first character.
//!
//! [`StripGeometry`] captures the resulting pixel layout and answers the two
//! questions the rest of the crate needs: which column lies under a given x
//! coordinate, and where a guide line for a column is drawn.

/// Multiple of the tick width between the strip origin and text column one.
///
/// This constant lines the strip up with the host editor's rendering and must
/// not be changed.
pub const COLUMN_ONE_FACTOR: f64 = 1.5;

/// Inputs to [`compute_offset`], in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollInputs {
    /// Width of the editor's gutter (line numbers, fold markers, …).
    pub gutter_width_px: f64,
    /// Left padding of a text line inside the editor.
    pub line_padding_px: f64,
    /// Measured width of one tick cell.
    pub tick_width_px: f64,
    /// Horizontal scroll position of the editor.
    pub scroll_left_px: f64,
}

/// Pixel distance from the strip origin to the left edge of text column one.
#[must_use]
pub fn column_one_inset(tick_width_px: f64) -> f64 {
    libm::ceil(sanitize(tick_width_px) * COLUMN_ONE_FACTOR)
}

/// Computes the strip translation in whole pixels.
///
/// Non-finite inputs are treated as zero.
#[must_use]
pub fn compute_offset(inputs: &ScrollInputs) -> i32 {
    let offset = sanitize(inputs.gutter_width_px) + sanitize(inputs.line_padding_px)
        - column_one_inset(inputs.tick_width_px)
        - sanitize(inputs.scroll_left_px);
    let offset = libm::round(offset).clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Rounded and clamped into i32 range just above"
    )]
    {
        offset as i32
    }
}

/// Where a column hit test landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripHit {
    /// Left of tick zero: on the left filler or beyond.
    BeforeFirst,
    /// Inside the tick cell for this column.
    Column(u32),
    /// Right of the last tick: on the right filler or beyond.
    AfterLast,
}

/// Pixel layout of the tick strip for a given offset, tick width and length.
///
/// All x coordinates share the editor's horizontal coordinate space (the
/// same space the offset is expressed in).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripGeometry {
    /// Strip translation from [`compute_offset`].
    pub offset_px: i32,
    /// Width of one tick cell.
    pub tick_width_px: f64,
    /// Ruler length in columns.
    pub length: u32,
}

impl StripGeometry {
    /// Width of the left filler.
    #[must_use]
    pub fn left_filler_width(&self) -> f64 {
        column_one_inset(self.tick_width_px) - sanitize(self.tick_width_px)
    }

    /// Left edge of the tick cell for `column`.
    #[must_use]
    pub fn tick_start(&self, column: u32) -> f64 {
        f64::from(self.offset_px)
            + self.left_filler_width()
            + f64::from(column) * sanitize(self.tick_width_px)
    }

    /// Horizontal extent `[start, end)` of the tick cell for `column`.
    #[must_use]
    pub fn tick_extent(&self, column: u32) -> (f64, f64) {
        let start = self.tick_start(column);
        (start, start + sanitize(self.tick_width_px))
    }

    /// X coordinate of a guide line placed at `column`.
    ///
    /// This is the right edge of tick cell `column`, i.e. the left edge of
    /// text column `column + 1`.
    #[must_use]
    pub fn guide_x(&self, column: u32) -> f64 {
        f64::from(self.offset_px)
            + column_one_inset(self.tick_width_px)
            + f64::from(column) * sanitize(self.tick_width_px)
    }

    /// Finds the tick cell whose extent contains `x`.
    ///
    /// An unmeasured strip (zero tick width) never contains anything; every
    /// coordinate resolves to [`StripHit::BeforeFirst`].
    #[must_use]
    pub fn hit(&self, x: f64) -> StripHit {
        let width = sanitize(self.tick_width_px);
        if width <= 0.0 || !x.is_finite() {
            return StripHit::BeforeFirst;
        }
        let first = self.tick_start(0);
        if x < first {
            return StripHit::BeforeFirst;
        }
        let index = libm::floor((x - first) / width);
        if index > f64::from(self.length) {
            return StripHit::AfterLast;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Non-negative and at most `length` after the checks above"
        )]
        let column = index as u32;
        StripHit::Column(column)
    }
}

fn sanitize(px: f64) -> f64 {
    if px.is_finite() { px } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_formula_matches_reference_values() {
        let inputs = ScrollInputs {
            gutter_width_px: 30.0,
            line_padding_px: 4.0,
            tick_width_px: 8.0,
            scroll_left_px: 0.0,
        };
        assert_eq!(compute_offset(&inputs), 22);
    }

    #[test]
    fn scrolling_moves_strip_left() {
        let inputs = ScrollInputs {
            gutter_width_px: 30.0,
            line_padding_px: 4.0,
            tick_width_px: 8.0,
            scroll_left_px: 100.0,
        };
        assert_eq!(compute_offset(&inputs), -78);
    }

    #[test]
    fn fractional_tick_width_rounds_inset_up() {
        // ceil(7.2 * 1.5) = ceil(10.8) = 11
        assert_eq!(column_one_inset(7.2), 11.0);
        let inputs = ScrollInputs {
            gutter_width_px: 40.0,
            line_padding_px: 4.0,
            tick_width_px: 7.2,
            scroll_left_px: 0.0,
        };
        assert_eq!(compute_offset(&inputs), 33);
    }

    #[test]
    fn non_finite_inputs_are_ignored() {
        let inputs = ScrollInputs {
            gutter_width_px: f64::NAN,
            line_padding_px: 4.0,
            tick_width_px: f64::INFINITY,
            scroll_left_px: 0.0,
        };
        assert_eq!(compute_offset(&inputs), 4);
    }

    #[test]
    fn tick_one_starts_at_text_column_one() {
        let strip = StripGeometry {
            offset_px: 22,
            tick_width_px: 8.0,
            length: 80,
        };
        // Text starts at gutter + padding = 34.
        assert_eq!(strip.tick_start(1), 34.0);
        assert_eq!(strip.left_filler_width(), 4.0);
        assert_eq!(strip.tick_extent(0), (26.0, 34.0));
        assert_eq!(strip.guide_x(0), 34.0);
        assert_eq!(strip.guide_x(80), 34.0 + 640.0);
    }

    #[test]
    fn hit_resolves_columns_and_fillers() {
        let strip = StripGeometry {
            offset_px: 22,
            tick_width_px: 8.0,
            length: 80,
        };
        assert_eq!(strip.hit(0.0), StripHit::BeforeFirst);
        assert_eq!(strip.hit(25.9), StripHit::BeforeFirst);
        assert_eq!(strip.hit(26.0), StripHit::Column(0));
        assert_eq!(strip.hit(34.0), StripHit::Column(1));
        assert_eq!(strip.hit(41.9), StripHit::Column(1));
        // Tick 80 covers [666, 674).
        assert_eq!(strip.hit(673.0), StripHit::Column(80));
        assert_eq!(strip.hit(674.0), StripHit::AfterLast);
        assert_eq!(strip.hit(f64::NAN), StripHit::BeforeFirst);
    }

    #[test]
    fn unmeasured_strip_has_no_cells() {
        let strip = StripGeometry {
            offset_px: 0,
            tick_width_px: 0.0,
            length: 80,
        };
        assert_eq!(strip.hit(100.0), StripHit::BeforeFirst);
    }
}
