// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation boundary.
//!
//! The engines never draw. They push their results into an
//! [`OverlayRenderer`], which maps them onto whatever the host uses for UI
//! (retained elements, a display list, a terminal row, …). Sequence changes
//! arrive as [`SequenceDelta`]s so a retained renderer only creates or
//! destroys the touched elements.
//!
//! [`HeadlessRenderer`] is a reference implementation that keeps mirrored
//! element counts and a fixed advance-per-font-size ratio. It is useful for
//! hosts that only need the numbers, and for tests.

use crate::prefs::GuideStyle;
use crate::sequence::{SequenceDelta, SequenceEdit, TickSequence};

/// Largest font size used for ruler numbers, in pixels.
pub const MAX_NUMBER_SIZE: f64 = 14.0;

/// Font sizes applied to the two ruler rows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontSizes {
    /// Tick row: same as the editor.
    pub tick_px: f64,
    /// Number row: the editor size, capped at [`MAX_NUMBER_SIZE`].
    pub number_px: f64,
}

impl FontSizes {
    /// Sizes for an editor font of `font_size_px`.
    #[must_use]
    pub fn for_editor(font_size_px: f64) -> Self {
        Self {
            tick_px: font_size_px,
            number_px: font_size_px.min(MAX_NUMBER_SIZE),
        }
    }
}

/// Everything a renderer needs to place the guide line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuidePresentation {
    /// Draw the line at all.
    pub visible: bool,
    /// Column the guide marks.
    pub column: u32,
    /// X coordinate of the line in editor space.
    pub x_px: f64,
    /// `true` while it is being dragged.
    pub dragging: bool,
    /// Stroke.
    pub style: GuideStyle,
}

/// Sink for engine output.
pub trait OverlayRenderer {
    /// Shows or hides the overlay.
    fn set_shown(&mut self, shown: bool);

    /// Whether the overlay is currently shown.
    fn is_shown(&self) -> bool;

    /// Applies font sizes to the tick and number rows.
    fn set_font_sizes(&mut self, sizes: FontSizes);

    /// Measures the rendered width of one tick cell.
    ///
    /// Only called while the overlay is shown; see [`measure_tick_width`].
    fn measure_tick_width(&mut self) -> f64;

    /// Replaces the whole strip. Called once when the ruler is created.
    fn reset_sequence(&mut self, sequence: &TickSequence);

    /// Applies an incremental change. `sequence` is already updated.
    fn apply_sequence(&mut self, sequence: &TickSequence, delta: &SequenceDelta);

    /// Translates the strip horizontally.
    fn set_offset(&mut self, offset_px: i32);

    /// Places the guide line.
    fn set_guide(&mut self, guide: &GuidePresentation);
}

/// Measures the tick width, briefly showing a hidden overlay to do so.
///
/// Prior visibility is restored before returning. Non-finite or negative
/// measurements are reported as zero.
pub fn measure_tick_width<R: OverlayRenderer + ?Sized>(renderer: &mut R) -> f64 {
    let was_shown = renderer.is_shown();
    if !was_shown {
        renderer.set_shown(true);
    }
    let width = renderer.measure_tick_width();
    if !was_shown {
        renderer.set_shown(false);
    }
    if width.is_finite() && width >= 0.0 {
        width
    } else {
        log::warn!("renderer measured tick width {width}, using 0");
        0.0
    }
}

/// Default advance of a monospace glyph relative to its font size.
pub const DEFAULT_ADVANCE_RATIO: f64 = 0.6;

/// Renderer that only tracks state.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessRenderer {
    /// Glyph advance per pixel of font size.
    pub advance_ratio: f64,
    /// Overlay shown.
    pub shown: bool,
    /// Last applied font sizes.
    pub font_sizes: FontSizes,
    /// Last applied offset.
    pub offset_px: i32,
    /// Last applied guide.
    pub guide: Option<GuidePresentation>,
    /// Mirrored tick-slot count, fillers included.
    pub tick_elements: usize,
    /// Mirrored label-slot count, fillers included.
    pub label_elements: usize,
    /// Number of [`OverlayRenderer::measure_tick_width`] calls.
    pub measurements: usize,
    /// Number of [`OverlayRenderer::set_shown`] calls that changed state.
    pub visibility_flips: usize,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_ADVANCE_RATIO)
    }
}

impl HeadlessRenderer {
    /// Creates a hidden renderer with the given advance ratio.
    #[must_use]
    pub fn new(advance_ratio: f64) -> Self {
        Self {
            advance_ratio,
            shown: false,
            font_sizes: FontSizes::default(),
            offset_px: 0,
            guide: None,
            tick_elements: 0,
            label_elements: 0,
            measurements: 0,
            visibility_flips: 0,
        }
    }
}

impl OverlayRenderer for HeadlessRenderer {
    fn set_shown(&mut self, shown: bool) {
        if self.shown != shown {
            self.visibility_flips += 1;
        }
        self.shown = shown;
    }

    fn is_shown(&self) -> bool {
        self.shown
    }

    fn set_font_sizes(&mut self, sizes: FontSizes) {
        self.font_sizes = sizes;
    }

    fn measure_tick_width(&mut self) -> f64 {
        self.measurements += 1;
        if self.shown {
            self.font_sizes.tick_px * self.advance_ratio
        } else {
            // Hidden elements have no layout.
            0.0
        }
    }

    fn reset_sequence(&mut self, sequence: &TickSequence) {
        self.tick_elements = sequence.tick_slots().len();
        self.label_elements = sequence.label_slots().len();
    }

    fn apply_sequence(&mut self, _sequence: &TickSequence, delta: &SequenceDelta) {
        for edit in &delta.edits {
            match edit {
                SequenceEdit::InsertTicks { count, .. } => self.tick_elements += count,
                SequenceEdit::RemoveTicks { range } => self.tick_elements -= range.len(),
                SequenceEdit::InsertLabels { count, .. } => self.label_elements += count,
                SequenceEdit::RemoveLabels { range } => self.label_elements -= range.len(),
                SequenceEdit::Respan { .. } => {}
            }
        }
    }

    fn set_offset(&mut self, offset_px: i32) {
        self.offset_px = offset_px;
    }

    fn set_guide(&mut self, guide: &GuidePresentation) {
        self.guide = Some(*guide);
    }
}
