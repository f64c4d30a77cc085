// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ruler context object.
//!
//! [`ColumnRuler`] owns every engine and drives them through one ordered
//! pipeline:
//!
//! ```text
//! visibility → fonts/measure → length → sequence → offset → guide
//! ```
//!
//! Each stage reads the previous stage's output from the ruler and pushes its
//! own result to the [`OverlayRenderer`]. [`ColumnRuler::refresh`] with
//! `full == false` diffs a fresh [`GeometrySnapshot`] against the cached one
//! and only runs the stages the changed fields feed.

use alloc::string::String;
use core::fmt;

use kurbo::Point;
use ui_events::pointer::{PointerButton, PointerEvent};

use crate::binding::{BindingSlot, RULER_TOPICS, Rebind};
use crate::error::RulerError;
use crate::guide::{GuideController, GuideGesture, GuideOutcome, GuideState, column_from_x};
use crate::host::{EditorEvent, EditorHandle, EditorId, GeometryChanges, GeometrySnapshot};
use crate::length::{LengthInputs, RulerBounds, compute_length};
use crate::prefs::{GuideStyle, RulerPreferences};
use crate::render::{self, FontSizes, GuidePresentation, OverlayRenderer};
use crate::scroll::{ScrollInputs, StripGeometry, compute_offset};
use crate::sequence::TickSequence;
use crate::visibility::{Visibility, VisibilityInputs, VisibilityMachine, VisibilityTransition};

/// The ruler's current rendered configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RulerState {
    /// Ruler length in columns.
    pub length: u32,
    /// Horizontal translation of the strip.
    pub scroll_offset_px: i32,
    /// Measured width of one tick cell.
    pub tick_width_px: f64,
    /// Tick row font size.
    pub font_size_px: f64,
    /// Number row font size.
    pub number_font_size_px: f64,
}

impl RulerState {
    fn seeded(length: u32) -> Self {
        Self {
            length,
            scroll_offset_px: 0,
            tick_width_px: 0.0,
            font_size_px: 0.0,
            number_font_size_px: 0.0,
        }
    }
}

/// Stages selected by a set of geometry changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Stages {
    visibility: bool,
    fonts: bool,
    length: bool,
    offset: bool,
}

impl Stages {
    const ALL: Self = Self {
        visibility: true,
        fonts: true,
        length: true,
        offset: true,
    };

    fn from_changes(changes: GeometryChanges, word_wrap: bool) -> Self {
        let fonts = changes.contains(GeometryChanges::FONT_SIZE);
        let placement = GeometryChanges::GUTTER | GeometryChanges::SCROLL_X;
        let extent = if word_wrap {
            GeometryChanges::VIEWPORT
        } else {
            GeometryChanges::LONGEST_LINE
        };
        Self {
            visibility: changes.contains(GeometryChanges::DOCUMENT_TYPE),
            fonts,
            length: fonts || changes.intersects(GeometryChanges::WORD_WRAP | extent),
            offset: fonts || changes.intersects(placement),
        }
    }
}

/// Column ruler and guide overlay bound to at most one editor.
///
/// All operations are synchronous. Nothing on the event-driven surface
/// returns an error: bad input is clamped or ignored and logged.
pub struct ColumnRuler<E: EditorHandle, R: OverlayRenderer> {
    bounds: RulerBounds,
    enabled: bool,
    guide_color: String,
    guide_style: GuideStyle,
    prefs_revision: u64,
    state: RulerState,
    sequence: TickSequence,
    guide: GuideController,
    visibility: VisibilityMachine,
    binding: BindingSlot<E>,
    snapshot: GeometrySnapshot,
    renderer: R,
}

impl<E: EditorHandle, R: OverlayRenderer> ColumnRuler<E, R> {
    /// Creates an unbound, hidden ruler with default bounds and preferences.
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, RulerBounds::default(), &RulerPreferences::default())
    }

    /// Creates an unbound, hidden ruler.
    ///
    /// The tick sequence is seeded at `bounds.min_columns()` and handed to
    /// the renderer in full; every later change is incremental.
    pub fn with_config(mut renderer: R, bounds: RulerBounds, prefs: &RulerPreferences) -> Self {
        let sequence = TickSequence::new(bounds.min_columns());
        renderer.set_shown(false);
        renderer.reset_sequence(&sequence);
        renderer.set_offset(0);

        let column = bounds.clamp_guide(i64::from(prefs.guide_position));
        let mut ruler = Self {
            bounds,
            enabled: prefs.ruler_enabled,
            guide_color: prefs.guide_color.clone(),
            guide_style: GuideStyle::from_preferences(prefs),
            prefs_revision: 0,
            state: RulerState::seeded(sequence.length()),
            sequence,
            guide: GuideController::new(prefs.guide_enabled, column),
            visibility: VisibilityMachine::new(),
            binding: BindingSlot::new(RULER_TOPICS),
            snapshot: GeometrySnapshot::detached(),
            renderer,
        };
        ruler.update_length();
        ruler.push_guide();
        ruler
    }

    /// Column bounds in effect.
    #[must_use]
    pub fn bounds(&self) -> RulerBounds {
        self.bounds
    }

    /// Current rendered configuration.
    #[must_use]
    pub fn state(&self) -> RulerState {
        self.state
    }

    /// The tick and label sequence.
    #[must_use]
    pub fn sequence(&self) -> &TickSequence {
        &self.sequence
    }

    /// Guide enablement, column and drag flag.
    #[must_use]
    pub fn guide(&self) -> GuideState {
        self.guide.state()
    }

    /// Phase of the pointer gesture on the ruler.
    #[must_use]
    pub fn gesture(&self) -> GuideGesture {
        self.guide.gesture()
    }

    /// Resolved guide style.
    #[must_use]
    pub fn guide_style(&self) -> GuideStyle {
        self.guide_style
    }

    /// Whether the ruler is shown.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility.current()
    }

    /// User enablement.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Geometry last read from the bound editor.
    #[must_use]
    pub fn snapshot(&self) -> GeometrySnapshot {
        self.snapshot
    }

    /// Geometry of the bound editor as of the last refresh.
    ///
    /// # Errors
    ///
    /// Returns [`RulerError::NoActiveEditor`] when no editor is bound.
    pub fn geometry(&self) -> Result<GeometrySnapshot, RulerError> {
        if self.binding.editor().is_none() {
            return Err(RulerError::NoActiveEditor);
        }
        Ok(self.snapshot)
    }

    /// Pixel geometry of the tick strip.
    #[must_use]
    pub fn strip(&self) -> StripGeometry {
        StripGeometry {
            offset_px: self.state.scroll_offset_px,
            tick_width_px: self.state.tick_width_px,
            length: self.sequence.length(),
        }
    }

    /// The bound editor.
    #[must_use]
    pub fn editor(&self) -> Option<&E> {
        self.binding.editor()
    }

    /// Identity of the bound editor.
    #[must_use]
    pub fn editor_id(&self) -> Option<EditorId> {
        self.binding.id()
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably.
    ///
    /// Changes made here are not seen by the engines.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Shows or hides the ruler as far as the user is concerned.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.touch_preferences();
        self.sync_visibility();
    }

    /// Flips [`ColumnRuler::is_enabled`].
    pub fn toggle_enabled(&mut self) {
        self.set_enabled(!self.enabled);
    }

    /// Shows or hides the guide line.
    pub fn set_guide_enabled(&mut self, enabled: bool) {
        if self.guide.set_enabled(enabled) {
            self.touch_preferences();
            self.push_guide();
        }
    }

    /// Flips guide enablement.
    pub fn toggle_guide(&mut self) {
        self.set_guide_enabled(!self.guide.state().enabled);
    }

    /// Moves the guide, clamping into `[0, max_columns]`.
    ///
    /// Returns the column actually used. The ruler grows to keep the guide
    /// in view.
    pub fn set_guide_position(&mut self, column: i64) -> u32 {
        let column = self.clamp_guide(column);
        if self.guide.set_column(column) {
            self.touch_preferences();
            self.update_length();
            self.push_guide();
        }
        column
    }

    /// Binds `editor`, or unbinds with `None`.
    ///
    /// Subscriptions on the previous editor are released before the new one
    /// is subscribed, then every stage is recomputed.
    pub fn set_editor(&mut self, editor: Option<E>) {
        match self.binding.rebind(editor) {
            Rebind::Unchanged => {}
            Rebind::Changed { old, new } => {
                log::debug!("active editor changed: {old:?} -> {new:?}");
                if self.guide.gesture() != GuideGesture::Idle {
                    self.guide.cancel();
                }
                self.refresh(true);
            }
        }
    }

    /// Re-reads editor geometry and updates the overlay.
    ///
    /// With `full == false` only stages fed by changed measurements run. With
    /// no editor bound the ruler hides, the offset resets to zero and the
    /// length falls back to the minimum the guide allows.
    pub fn refresh(&mut self, full: bool) {
        let Some(editor) = self.binding.editor() else {
            log::debug!("{}, refreshing as detached", RulerError::NoActiveEditor);
            self.detach();
            return;
        };
        let snapshot = GeometrySnapshot::capture(editor);
        let stages = if full {
            Stages::ALL
        } else {
            Stages::from_changes(self.snapshot.changes(&snapshot), snapshot.word_wrap)
        };
        self.snapshot = snapshot;
        self.run(stages);
    }

    /// Handles a change notification from the editor identified by `source`.
    ///
    /// Notifications from anything but the bound editor are logged and
    /// dropped.
    pub fn handle_event(&mut self, source: EditorId, event: EditorEvent) {
        if let Err(err) = self.check_source(source) {
            log::warn!("{err} ({event:?})");
            return;
        }
        match event {
            EditorEvent::ThemeChange => self.refresh(true),
            _ => self.refresh(false),
        }
    }

    /// Checks that `source` is the bound editor.
    pub fn check_source(&self, source: EditorId) -> Result<(), RulerError> {
        self.binding.check_source(source).map(|_| ())
    }

    /// Primary-button press on the ruler at `position` (editor space).
    pub fn pointer_down(&mut self, button: PointerButton, position: Point) {
        let column = column_from_x(&self.strip(), position.x);
        let was_dragging = self.guide.state().is_dragging;
        self.guide.pointer_down(button, position, column);
        if was_dragging && !self.guide.state().is_dragging {
            self.push_guide();
        }
    }

    /// Pointer motion while over or captured by the ruler.
    pub fn pointer_move(&mut self, position: Point) {
        let column = column_from_x(&self.strip(), position.x);
        if let GuideOutcome::Moved { column } = self.guide.pointer_move(position, column) {
            log::trace!("guide dragged to column {column}");
            self.touch_preferences();
            self.update_length();
            self.push_guide();
        }
    }

    /// Release. A press that never left its column toggles the guide.
    pub fn pointer_up(&mut self) {
        let was_dragging = self.guide.state().is_dragging;
        let outcome = self.guide.pointer_up();
        if outcome.is_change() {
            self.touch_preferences();
        }
        if outcome.is_change() || was_dragging {
            self.push_guide();
        }
    }

    /// Abandons the gesture without toggling; a dragged column is kept.
    pub fn pointer_cancel(&mut self) {
        let was_dragging = self.guide.state().is_dragging;
        self.guide.cancel();
        if was_dragging {
            self.push_guide();
        }
    }

    /// Routes a `ui-events` pointer event to the gesture handlers.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down(e) => {
                if let Some(button) = e.button {
                    self.pointer_down(button, e.state.logical_point());
                }
            }
            PointerEvent::Move(e) => self.pointer_move(e.current.logical_point()),
            PointerEvent::Up(_) => self.pointer_up(),
            PointerEvent::Cancel(_) => self.pointer_cancel(),
            _ => {}
        }
    }

    /// Current persisted configuration.
    #[must_use]
    pub fn preferences(&self) -> RulerPreferences {
        let guide = self.guide.state();
        RulerPreferences {
            ruler_enabled: self.enabled,
            guide_enabled: guide.enabled,
            guide_position: guide.column,
            guide_color: self.guide_color.clone(),
            guide_line_style: self.guide_style.line_style,
        }
    }

    /// Bumped on every effective preference change, including drags.
    #[must_use]
    pub fn preferences_revision(&self) -> u64 {
        self.prefs_revision
    }

    /// Replaces every preference at once.
    pub fn apply_preferences(&mut self, prefs: &RulerPreferences) {
        let before = self.preferences();
        self.guide_color.clone_from(&prefs.guide_color);
        self.guide_style = GuideStyle::from_preferences(prefs);
        self.guide.set_enabled(prefs.guide_enabled);
        let column = self.clamp_guide(i64::from(prefs.guide_position));
        self.guide.set_column(column);
        self.enabled = prefs.ruler_enabled;
        if self.preferences() != before {
            self.touch_preferences();
        }
        self.update_length();
        self.sync_visibility();
    }

    /// Unbinds, hides the overlay, and drops any gesture in progress.
    ///
    /// Later events are rejected as stale.
    pub fn dispose(&mut self) {
        self.guide.cancel();
        self.binding.rebind(None);
        self.detach();
        log::debug!("ruler disposed");
    }

    fn clamp_guide(&self, column: i64) -> u32 {
        let clamped = self.bounds.clamp_guide(column);
        if i64::from(clamped) != column {
            let err = RulerError::InvalidGuideColumn {
                requested: column,
                clamped,
            };
            log::warn!("{err}");
        }
        clamped
    }

    fn touch_preferences(&mut self) {
        self.prefs_revision += 1;
    }

    fn run(&mut self, mut stages: Stages) {
        if stages.visibility && self.update_visibility() == Some(VisibilityTransition::Shown) {
            stages = Stages::ALL;
        }
        if stages.fonts {
            self.update_fonts();
        }
        if stages.length {
            self.update_length();
        }
        if stages.offset {
            self.update_offset();
        }
        self.push_guide();
    }

    fn detach(&mut self) {
        self.snapshot = GeometrySnapshot::detached();
        self.update_visibility();
        self.set_offset(0);
        self.update_length();
        self.push_guide();
    }

    fn sync_visibility(&mut self) {
        if self.update_visibility() == Some(VisibilityTransition::Shown) {
            self.refresh(true);
        } else {
            self.push_guide();
        }
    }

    fn update_visibility(&mut self) -> Option<VisibilityTransition> {
        let inputs = VisibilityInputs {
            enabled: self.enabled,
            has_editor: self.binding.id().is_some(),
            supports_ruler: self.snapshot.supports_ruler,
        };
        let transition = self.visibility.update(inputs);
        if let Some(transition) = transition {
            log::debug!("ruler {transition:?} ({inputs:?})");
            self.renderer.set_shown(transition == VisibilityTransition::Shown);
        }
        transition
    }

    fn update_fonts(&mut self) {
        let sizes = FontSizes::for_editor(self.snapshot.font_size_px);
        self.state.font_size_px = sizes.tick_px;
        self.state.number_font_size_px = sizes.number_px;
        self.renderer.set_font_sizes(sizes);
        let width = render::measure_tick_width(&mut self.renderer);
        log::debug!(
            "tick width re-measured at {} px font: {} -> {width} px",
            sizes.tick_px,
            self.state.tick_width_px
        );
        self.state.tick_width_px = width;
    }

    fn update_length(&mut self) {
        let inputs = LengthInputs {
            word_wrap: self.snapshot.word_wrap,
            viewport_width_px: self.snapshot.viewport_width_px,
            tick_width_px: self.state.tick_width_px,
            max_line_length: self.snapshot.longest_line,
            guide_column: self.guide.state().column,
        };
        let length = compute_length(&inputs, &self.bounds);
        if length != self.sequence.length() {
            let delta = self.sequence.reconcile(length);
            self.renderer.apply_sequence(&self.sequence, &delta);
        }
        self.state.length = self.sequence.length();
    }

    fn update_offset(&mut self) {
        let offset = compute_offset(&ScrollInputs {
            gutter_width_px: self.snapshot.gutter_width_px,
            line_padding_px: self.snapshot.line_padding_px,
            tick_width_px: self.state.tick_width_px,
            scroll_left_px: self.snapshot.scroll_left_px,
        });
        self.set_offset(offset);
    }

    fn set_offset(&mut self, offset_px: i32) {
        if self.state.scroll_offset_px == offset_px {
            return;
        }
        log::trace!("ruler offset {} -> {offset_px} px", self.state.scroll_offset_px);
        self.state.scroll_offset_px = offset_px;
        self.renderer.set_offset(offset_px);
    }

    fn push_guide(&mut self) {
        let guide = self.guide.state();
        let presentation = GuidePresentation {
            visible: guide.enabled && self.visibility.current().is_visible(),
            column: guide.column,
            x_px: self.strip().guide_x(guide.column),
            dragging: guide.is_dragging,
            style: self.guide_style,
        };
        self.renderer.set_guide(&presentation);
    }
}

impl<E: EditorHandle, R: OverlayRenderer> fmt::Debug for ColumnRuler<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnRuler")
            .field("bounds", &self.bounds)
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .field("guide", &self.guide)
            .field("visibility", &self.visibility)
            .field("binding", &self.binding)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}
