// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column guide state and the click-versus-drag gesture that edits it.
//!
//! ## Gesture
//!
//! ```text
//! Idle --down--> ClickOrDrag --move to another column--> Dragging --up--> Idle
//!                     |
//!                     +--up on the same column (click)--> Idle, toggles `enabled`
//! ```
//!
//! Only the primary button starts a gesture. Pointer positions are resolved to
//! columns by the caller with [`column_from_x`] before they reach the
//! [`GuideController`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use ui_events::pointer::PointerButton;
//! use understory_ruler::{GuideController, GuideOutcome};
//!
//! let mut guide = GuideController::new(false, 80);
//!
//! // Press and release on the same column: a click.
//! guide.pointer_down(PointerButton::Primary, Point::new(100.0, 4.0), 12);
//! assert_eq!(guide.pointer_up(), GuideOutcome::Toggled { enabled: true });
//!
//! // Press, move to another column, release: a drag.
//! guide.pointer_down(PointerButton::Primary, Point::new(100.0, 4.0), 12);
//! assert_eq!(
//!     guide.pointer_move(Point::new(140.0, 4.0), 17),
//!     GuideOutcome::Moved { column: 17 }
//! );
//! assert_eq!(guide.pointer_up(), GuideOutcome::Unchanged);
//! assert_eq!(guide.state().column, 17);
//! assert!(guide.state().enabled);
//! ```

use kurbo::Point;
use ui_events::pointer::PointerButton;

use crate::scroll::{StripGeometry, StripHit};

/// Persistent guide state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GuideState {
    /// Whether the guide line is shown.
    pub enabled: bool,
    /// Column the guide marks, in `[0, MAX_COLUMNS]`.
    pub column: u32,
    /// `true` while a drag gesture is moving the guide.
    pub is_dragging: bool,
}

/// Phase of the pointer gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuideGesture {
    /// No primary button held.
    #[default]
    Idle,
    /// Button held, pointer still on the column it went down on.
    ClickOrDrag {
        /// Column under the pointer at press time.
        down_column: u32,
    },
    /// Pointer left the press column while held.
    Dragging,
}

/// Effect of a pointer event on the guide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideOutcome {
    /// Guide state did not change.
    Unchanged,
    /// A click toggled the guide.
    Toggled {
        /// New enablement.
        enabled: bool,
    },
    /// A drag moved the guide (and enabled it).
    Moved {
        /// New guide column.
        column: u32,
    },
}

impl GuideOutcome {
    /// Returns `true` if the guide state changed.
    #[must_use]
    pub fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Resolves a pointer x coordinate to a guide column.
///
/// The result is always in `[1, length - 1]`: the left filler and tick 0
/// resolve to column 1, the right filler and tick `length` to `length - 1`.
/// The mapping never decreases as `x` increases.
#[must_use]
pub fn column_from_x(strip: &StripGeometry, x: f64) -> u32 {
    let last = strip.length.saturating_sub(1).max(1);
    match strip.hit(x) {
        StripHit::BeforeFirst => 1,
        StripHit::Column(column) => column.clamp(1, last),
        StripHit::AfterLast => last,
    }
}

/// Transient bookkeeping for a press in progress.
#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Point,
    last: Point,
}

/// Owns [`GuideState`] and drives the click/drag gesture.
#[derive(Clone, Debug)]
pub struct GuideController {
    state: GuideState,
    gesture: GuideGesture,
    press: Option<Press>,
}

impl GuideController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(enabled: bool, column: u32) -> Self {
        Self {
            state: GuideState {
                enabled,
                column,
                is_dragging: false,
            },
            gesture: GuideGesture::Idle,
            press: None,
        }
    }

    /// Current guide state.
    #[must_use]
    pub fn state(&self) -> GuideState {
        self.state
    }

    /// Current gesture phase.
    #[must_use]
    pub fn gesture(&self) -> GuideGesture {
        self.gesture
    }

    /// Pointer position at press time, while a gesture is active.
    #[must_use]
    pub fn press_origin(&self) -> Option<Point> {
        self.press.map(|p| p.origin)
    }

    /// Last pointer position seen during the active gesture.
    #[must_use]
    pub fn last_position(&self) -> Option<Point> {
        self.press.map(|p| p.last)
    }

    /// Sets enablement; returns `true` if it changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let changed = self.state.enabled != enabled;
        self.state.enabled = enabled;
        changed
    }

    /// Sets the column; returns `true` if it changed.
    ///
    /// The caller is responsible for clamping.
    pub fn set_column(&mut self, column: u32) -> bool {
        let changed = self.state.column != column;
        self.state.column = column;
        changed
    }

    /// Starts a gesture on `column`.
    ///
    /// Non-primary buttons are ignored entirely. A press never changes the
    /// guide's column or enablement; a drag left over from a lost release is
    /// ended.
    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        position: Point,
        column: u32,
    ) -> GuideOutcome {
        if button != PointerButton::Primary {
            log::trace!("ignoring {button:?} press on ruler");
            return GuideOutcome::Unchanged;
        }
        self.state.is_dragging = false;
        self.gesture = GuideGesture::ClickOrDrag {
            down_column: column,
        };
        self.press = Some(Press {
            origin: position,
            last: position,
        });
        GuideOutcome::Unchanged
    }

    /// Feeds a pointer move resolved to `column`.
    pub fn pointer_move(&mut self, position: Point, column: u32) -> GuideOutcome {
        if let Some(press) = &mut self.press {
            press.last = position;
        }
        match self.gesture {
            GuideGesture::Idle => GuideOutcome::Unchanged,
            GuideGesture::ClickOrDrag { down_column } if down_column == column => {
                GuideOutcome::Unchanged
            }
            GuideGesture::ClickOrDrag { .. } => {
                self.gesture = GuideGesture::Dragging;
                self.state.is_dragging = true;
                self.state.enabled = true;
                self.state.column = column;
                GuideOutcome::Moved { column }
            }
            GuideGesture::Dragging => {
                if self.state.column == column {
                    GuideOutcome::Unchanged
                } else {
                    self.state.column = column;
                    GuideOutcome::Moved { column }
                }
            }
        }
    }

    /// Ends the gesture. A press that never became a drag is a click.
    pub fn pointer_up(&mut self) -> GuideOutcome {
        let outcome = match self.gesture {
            GuideGesture::ClickOrDrag { .. } => {
                self.state.enabled = !self.state.enabled;
                GuideOutcome::Toggled {
                    enabled: self.state.enabled,
                }
            }
            GuideGesture::Idle | GuideGesture::Dragging => GuideOutcome::Unchanged,
        };
        self.reset_gesture();
        outcome
    }

    /// Abandons the gesture without treating it as a click.
    ///
    /// A column already set by dragging is kept.
    pub fn cancel(&mut self) {
        self.reset_gesture();
    }

    fn reset_gesture(&mut self) {
        self.gesture = GuideGesture::Idle;
        self.state.is_dragging = false;
        self.press = None;
    }
}
