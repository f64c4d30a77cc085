// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User-facing preferences and the guide's visual style.
//!
//! The ruler does not persist anything itself. Hosts load a
//! [`RulerPreferences`] from their own store, hand it to
//! [`ColumnRuler::apply_preferences`](crate::ColumnRuler::apply_preferences),
//! and write [`ColumnRuler::preferences`](crate::ColumnRuler::preferences)
//! back whenever [`ColumnRuler::preferences_revision`](crate::ColumnRuler::preferences_revision)
//! moves. With the `serde` feature the preference types serialize with
//! camel-case keys (`rulerEnabled`, `guidePosition`, …).

use alloc::string::String;

use peniko::Color;
use peniko::color::{Srgb, parse_color};

use crate::error::RulerError;
use crate::length::MIN_COLUMNS;

/// Default guide colour, as a CSS colour string.
pub const DEFAULT_GUIDE_COLOR: &str = "rgba(128, 128, 128, 0.5)";

/// [`DEFAULT_GUIDE_COLOR`] as a constant: mid grey at half opacity.
pub const DEFAULT_GUIDE_RGBA: Color =
    Color::new([128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0, 0.5]);

/// Stroke pattern of the guide line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
}

/// Persisted configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RulerPreferences {
    /// Show the ruler at all.
    pub ruler_enabled: bool,
    /// Show the guide line.
    pub guide_enabled: bool,
    /// Guide column. Clamped into `[0, MAX_COLUMNS]` when applied.
    pub guide_position: u32,
    /// CSS colour of the guide line.
    pub guide_color: String,
    /// Stroke pattern of the guide line.
    pub guide_line_style: LineStyle,
}

impl Default for RulerPreferences {
    fn default() -> Self {
        Self {
            ruler_enabled: false,
            guide_enabled: false,
            guide_position: MIN_COLUMNS,
            guide_color: String::from(DEFAULT_GUIDE_COLOR),
            guide_line_style: LineStyle::Solid,
        }
    }
}

/// Resolved visual style of the guide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideStyle {
    /// Stroke colour.
    pub color: Color,
    /// Stroke pattern.
    pub line_style: LineStyle,
}

impl Default for GuideStyle {
    /// The style [`RulerPreferences::default`] resolves to.
    fn default() -> Self {
        Self::parse(DEFAULT_GUIDE_COLOR, LineStyle::Solid).unwrap_or(Self {
            color: DEFAULT_GUIDE_RGBA,
            line_style: LineStyle::Solid,
        })
    }
}

impl GuideStyle {
    /// Parses a CSS colour string.
    pub fn parse(color: &str, line_style: LineStyle) -> Result<Self, RulerError> {
        let color = parse_color(color.trim())
            .map_err(|_| RulerError::InvalidGuideColor)?
            .to_alpha_color::<Srgb>();
        Ok(Self { color, line_style })
    }

    /// Resolves the style from preferences, falling back to the default colour.
    #[must_use]
    pub fn from_preferences(prefs: &RulerPreferences) -> Self {
        match Self::parse(&prefs.guide_color, prefs.guide_line_style) {
            Ok(style) => style,
            Err(err) => {
                log::warn!("{err}: {:?}, using {DEFAULT_GUIDE_COLOR}", prefs.guide_color);
                Self {
                    line_style: prefs.guide_line_style,
                    ..Self::default()
                }
            }
        }
    }
}
