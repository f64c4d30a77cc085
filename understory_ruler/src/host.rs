// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow interfaces to the host editor.
//!
//! The ruler never owns the editor. It reads measurements through
//! [`GeometryProvider`] and registers interest in change notifications
//! through [`EditorHandle::subscribe`]. The host forwards each notification
//! to [`ColumnRuler::handle_event`](crate::ColumnRuler::handle_event) tagged
//! with the [`EditorId`] it came from.

use bitflags::bitflags;
use kurbo::Vec2;

/// Stable identity of a host editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(pub u64);

/// Token returned by [`EditorHandle::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

bitflags! {
    /// Change notifications the ruler listens to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Topics: u8 {
        /// Scroll position changed.
        const SCROLL = 1 << 0;
        /// Viewport was resized.
        const RESIZE = 1 << 1;
        /// Editor font size changed.
        const FONT_SIZE = 1 << 2;
        /// Document text changed.
        const TEXT = 1 << 3;
        /// Word-wrap setting changed.
        const WORD_WRAP = 1 << 4;
        /// Theme changed (may affect any measurement).
        const THEME = 1 << 5;
    }
}

/// A change notification from the bound editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorEvent {
    /// See [`Topics::SCROLL`].
    Scroll,
    /// See [`Topics::RESIZE`].
    Resize,
    /// See [`Topics::FONT_SIZE`].
    FontSizeChange,
    /// See [`Topics::TEXT`].
    TextChange,
    /// See [`Topics::WORD_WRAP`].
    WordWrapChange,
    /// See [`Topics::THEME`].
    ThemeChange,
}

impl EditorEvent {
    /// Topic this event is delivered under.
    #[must_use]
    pub fn topic(self) -> Topics {
        match self {
            Self::Scroll => Topics::SCROLL,
            Self::Resize => Topics::RESIZE,
            Self::FontSizeChange => Topics::FONT_SIZE,
            Self::TextChange => Topics::TEXT,
            Self::WordWrapChange => Topics::WORD_WRAP,
            Self::ThemeChange => Topics::THEME,
        }
    }
}

/// Editor-derived measurements. All pixel values are logical pixels.
pub trait GeometryProvider {
    /// Scroll position of the text area.
    fn scroll_position(&self) -> Vec2;

    /// Width of the text area.
    fn viewport_width(&self) -> f64;

    /// Width of the gutter left of the text.
    fn gutter_width(&self) -> f64;

    /// Left padding of each text line.
    fn line_padding(&self) -> f64;

    /// Editor font size.
    fn font_size(&self) -> f64;

    /// Length of the longest line, in columns.
    ///
    /// With word wrap on, implementations report the unwrapped length (for
    /// example by briefly disabling wrap to measure).
    fn longest_line_length(&self) -> u32;

    /// Whether long lines are soft-wrapped.
    fn word_wrap_enabled(&self) -> bool;

    /// Whether the open document can carry a ruler.
    ///
    /// Hosts return `false` for image and other non-text views.
    fn supports_ruler(&self) -> bool {
        true
    }
}

/// A bindable editor.
pub trait EditorHandle: GeometryProvider {
    /// Identity used to reject events from stale bindings.
    fn id(&self) -> EditorId;

    /// Starts forwarding notifications for `topics` to the ruler.
    fn subscribe(&mut self, topics: Topics) -> SubscriptionId;

    /// Stops forwarding for a subscription made by [`EditorHandle::subscribe`].
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}

bitflags! {
    /// Fields that differ between two [`GeometrySnapshot`]s.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GeometryChanges: u8 {
        /// Font size.
        const FONT_SIZE = 1 << 0;
        /// Gutter width or line padding.
        const GUTTER = 1 << 1;
        /// Horizontal scroll.
        const SCROLL_X = 1 << 2;
        /// Word-wrap flag.
        const WORD_WRAP = 1 << 3;
        /// Viewport width.
        const VIEWPORT = 1 << 4;
        /// Longest line.
        const LONGEST_LINE = 1 << 5;
        /// Document type eligibility.
        const DOCUMENT_TYPE = 1 << 6;
    }
}

/// Copy of every measurement the engines read, taken at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometrySnapshot {
    /// Horizontal scroll.
    pub scroll_left_px: f64,
    /// Text area width.
    pub viewport_width_px: f64,
    /// Gutter width.
    pub gutter_width_px: f64,
    /// Line padding.
    pub line_padding_px: f64,
    /// Font size.
    pub font_size_px: f64,
    /// Longest line in columns.
    pub longest_line: u32,
    /// Word-wrap flag.
    pub word_wrap: bool,
    /// Document type eligibility.
    pub supports_ruler: bool,
}

impl Default for GeometrySnapshot {
    fn default() -> Self {
        Self::detached()
    }
}

impl GeometrySnapshot {
    /// Defaults used when no editor is bound.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            scroll_left_px: 0.0,
            viewport_width_px: 0.0,
            gutter_width_px: 0.0,
            line_padding_px: 0.0,
            font_size_px: 0.0,
            longest_line: 0,
            word_wrap: false,
            supports_ruler: false,
        }
    }

    /// Reads every measurement from `provider`.
    ///
    /// Non-finite pixel values are replaced with zero and logged.
    #[must_use]
    pub fn capture<G: GeometryProvider + ?Sized>(provider: &G) -> Self {
        Self {
            scroll_left_px: finite_or_zero("scroll position", provider.scroll_position().x),
            viewport_width_px: finite_or_zero("viewport width", provider.viewport_width()),
            gutter_width_px: finite_or_zero("gutter width", provider.gutter_width()),
            line_padding_px: finite_or_zero("line padding", provider.line_padding()),
            font_size_px: finite_or_zero("font size", provider.font_size()),
            longest_line: provider.longest_line_length(),
            word_wrap: provider.word_wrap_enabled(),
            supports_ruler: provider.supports_ruler(),
        }
    }

    /// Fields of `newer` that differ from `self`.
    #[must_use]
    pub fn changes(&self, newer: &Self) -> GeometryChanges {
        let mut changes = GeometryChanges::empty();
        changes.set(
            GeometryChanges::FONT_SIZE,
            self.font_size_px != newer.font_size_px,
        );
        changes.set(
            GeometryChanges::GUTTER,
            self.gutter_width_px != newer.gutter_width_px
                || self.line_padding_px != newer.line_padding_px,
        );
        changes.set(
            GeometryChanges::SCROLL_X,
            self.scroll_left_px != newer.scroll_left_px,
        );
        changes.set(GeometryChanges::WORD_WRAP, self.word_wrap != newer.word_wrap);
        changes.set(
            GeometryChanges::VIEWPORT,
            self.viewport_width_px != newer.viewport_width_px,
        );
        changes.set(
            GeometryChanges::LONGEST_LINE,
            self.longest_line != newer.longest_line,
        );
        changes.set(
            GeometryChanges::DOCUMENT_TYPE,
            self.supports_ruler != newer.supports_ruler,
        );
        changes
    }
}

fn finite_or_zero(what: &str, px: f64) -> f64 {
    if px.is_finite() {
        px
    } else {
        log::warn!("editor reported non-finite {what} ({px}), using 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl GeometryProvider for Fixed {
        fn scroll_position(&self) -> Vec2 {
            Vec2::new(12.0, 300.0)
        }
        fn viewport_width(&self) -> f64 {
            640.0
        }
        fn gutter_width(&self) -> f64 {
            f64::NAN
        }
        fn line_padding(&self) -> f64 {
            4.0
        }
        fn font_size(&self) -> f64 {
            13.0
        }
        fn longest_line_length(&self) -> u32 {
            72
        }
        fn word_wrap_enabled(&self) -> bool {
            false
        }
    }

    #[test]
    fn capture_reads_provider_and_sanitizes() {
        let snap = GeometrySnapshot::capture(&Fixed);
        assert_eq!(snap.scroll_left_px, 12.0);
        assert_eq!(snap.gutter_width_px, 0.0);
        assert_eq!(snap.longest_line, 72);
        assert!(snap.supports_ruler, "default classifier accepts documents");
    }

    #[test]
    fn changes_flag_each_field() {
        let a = GeometrySnapshot::capture(&Fixed);
        assert!(a.changes(&a).is_empty());

        let b = GeometrySnapshot {
            scroll_left_px: 20.0,
            line_padding_px: 5.0,
            ..a
        };
        assert_eq!(
            a.changes(&b),
            GeometryChanges::SCROLL_X | GeometryChanges::GUTTER
        );

        let c = GeometrySnapshot {
            word_wrap: true,
            supports_ruler: false,
            ..a
        };
        assert_eq!(
            a.changes(&c),
            GeometryChanges::WORD_WRAP | GeometryChanges::DOCUMENT_TYPE
        );
    }

    #[test]
    fn events_map_to_topics() {
        assert_eq!(EditorEvent::Scroll.topic(), Topics::SCROLL);
        assert_eq!(EditorEvent::ThemeChange.topic(), Topics::THEME);
        assert_eq!(Topics::all().iter().count(), 6);
    }
}
