// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.
//!
//! None of these are fatal. The event-driven surface of
//! [`ColumnRuler`](crate::ColumnRuler) logs them and degrades to a safe
//! visual state; they are only returned from explicit queries.

use core::fmt;

use crate::host::EditorId;

/// Something the ruler could not act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RulerError {
    /// A geometry query was made with no editor bound.
    NoActiveEditor,
    /// A guide column outside `[0, max]` was requested; it was clamped.
    InvalidGuideColumn {
        /// Value the caller asked for.
        requested: i64,
        /// Value that was used instead.
        clamped: u32,
    },
    /// An event referenced an editor other than the bound one.
    StaleBindingAccess {
        /// Currently bound editor, if any.
        bound: Option<EditorId>,
        /// Editor the event came from.
        source: EditorId,
    },
    /// The guide colour string could not be parsed.
    InvalidGuideColor,
}

impl fmt::Display for RulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveEditor => write!(f, "no active editor is bound to the ruler"),
            Self::InvalidGuideColumn { requested, clamped } => {
                write!(f, "guide column {requested} is out of range, clamped to {clamped}")
            }
            Self::StaleBindingAccess {
                bound: Some(bound),
                source,
            } => write!(f, "event from {source:?} ignored, ruler is bound to {bound:?}"),
            Self::StaleBindingAccess {
                bound: None,
                source,
            } => write!(f, "event from {source:?} ignored, ruler is not bound"),
            Self::InvalidGuideColor => write!(f, "guide colour is not a valid CSS colour"),
        }
    }
}

impl core::error::Error for RulerError {}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = RulerError::InvalidGuideColumn {
            requested: 1200,
            clamped: 1000,
        };
        assert_eq!(
            err.to_string(),
            "guide column 1200 is out of range, clamped to 1000"
        );

        let err = RulerError::StaleBindingAccess {
            bound: None,
            source: EditorId(7),
        };
        assert_eq!(err.to_string(), "event from EditorId(7) ignored, ruler is not bound");
    }
}
