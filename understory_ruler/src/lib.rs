// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ruler --heading-base-level=0

//! Understory Ruler: a headless column ruler and column guide for text editors.
//!
//! The ruler is a strip of tick marks and decade numbers drawn above an
//! editor's text, aligned pixel-exactly with its character columns. A single
//! vertical guide line marks a target column (for example 80) and can be
//! toggled by clicking the ruler or moved by dragging across it.
//!
//! This crate contains the engines and the orchestration; it never draws.
//! Hosts implement two narrow traits:
//!
//! - [`EditorHandle`] (and its supertrait [`GeometryProvider`]) to report
//!   measurements and accept subscriptions.
//! - [`OverlayRenderer`] to map the engines' output onto real UI elements.
//!
//! The engines are usable on their own:
//!
//! - [`length`]: how many columns the ruler must span.
//! - [`sequence`]: the tick and label sequence, reconciled incrementally into
//!   a [`SequenceDelta`] of range edits.
//! - [`scroll`]: the strip's pixel offset and per-column geometry.
//! - [`guide`]: hit testing and the click-versus-drag gesture.
//! - [`visibility`]: the show/hide decision.
//!
//! [`ColumnRuler`] ties them into one `length → sequence → offset → guide`
//! pipeline driven by [`ColumnRuler::refresh`], [`ColumnRuler::handle_event`]
//! and the pointer handlers.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use ui_events::pointer::PointerButton;
//! use understory_ruler::{
//!     ColumnRuler, EditorHandle, EditorId, GeometryProvider, HeadlessRenderer,
//!     SubscriptionId, Topics,
//! };
//!
//! struct Editor;
//!
//! impl GeometryProvider for Editor {
//!     fn scroll_position(&self) -> Vec2 { Vec2::ZERO }
//!     fn viewport_width(&self) -> f64 { 800.0 }
//!     fn gutter_width(&self) -> f64 { 30.0 }
//!     fn line_padding(&self) -> f64 { 4.0 }
//!     fn font_size(&self) -> f64 { 12.0 }
//!     fn longest_line_length(&self) -> u32 { 95 }
//!     fn word_wrap_enabled(&self) -> bool { false }
//! }
//!
//! impl EditorHandle for Editor {
//!     fn id(&self) -> EditorId { EditorId(1) }
//!     fn subscribe(&mut self, _: Topics) -> SubscriptionId { SubscriptionId(0) }
//!     fn unsubscribe(&mut self, _: SubscriptionId) {}
//! }
//!
//! let mut ruler = ColumnRuler::new(HeadlessRenderer::default());
//! ruler.set_enabled(true);
//! ruler.set_editor(Some(Editor));
//!
//! assert!(ruler.visibility().is_visible());
//! assert_eq!(ruler.state().length, 100);
//! // 12 px font at 0.6 advance: 30 + 4 - ceil(7.2 * 1.5) = 23.
//! assert_eq!(ruler.state().scroll_offset_px, 23);
//!
//! // Clicking the ruler toggles the guide.
//! let x = ruler.strip().tick_start(40) + 1.0;
//! ruler.pointer_down(PointerButton::Primary, Point::new(x, 4.0));
//! ruler.pointer_up();
//! assert!(ruler.guide().enabled);
//! assert!(ruler.renderer().guide.is_some_and(|g| g.visible));
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards `std` to `kurbo` and `peniko`.
//! - `libm`: float math for `no_std` builds.
//! - `serde`: `Serialize`/`Deserialize` for [`RulerPreferences`] and
//!   [`LineStyle`], with camel-case keys.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod binding;
mod error;
pub mod guide;
pub mod host;
pub mod length;
pub mod prefs;
pub mod render;
mod ruler;
pub mod scroll;
pub mod sequence;
pub mod visibility;

pub use binding::{BindingSlot, EditorBinding, RULER_TOPICS, Rebind};
pub use error::RulerError;
pub use guide::{GuideController, GuideGesture, GuideOutcome, GuideState, column_from_x};
pub use host::{
    EditorEvent, EditorHandle, EditorId, GeometryChanges, GeometryProvider, GeometrySnapshot,
    SubscriptionId, Topics,
};
pub use length::{LengthInputs, MAX_COLUMNS, MIN_COLUMNS, RulerBounds, compute_length};
pub use prefs::{GuideStyle, LineStyle, RulerPreferences};
pub use render::{
    FontSizes, GuidePresentation, HeadlessRenderer, MAX_NUMBER_SIZE, OverlayRenderer,
};
pub use ruler::{ColumnRuler, RulerState};
pub use scroll::{ScrollInputs, StripGeometry, StripHit, compute_offset};
pub use sequence::{SequenceDelta, SequenceEdit, TickCell, TickKind, TickSequence};
pub use visibility::{Visibility, VisibilityMachine};
