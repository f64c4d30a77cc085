// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Show/hide decision for the ruler overlay.

/// Whether the overlay is presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Not presented; engine state is kept for instant resume.
    #[default]
    Hidden,
    /// Presented above the editor.
    Visible,
}

impl Visibility {
    /// Returns `true` for [`Visibility::Visible`].
    #[must_use]
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

/// The three conditions that must all hold for the ruler to show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibilityInputs {
    /// User preference.
    pub enabled: bool,
    /// An editor is bound.
    pub has_editor: bool,
    /// The bound document is text (not an image or other binary view).
    pub supports_ruler: bool,
}

impl VisibilityInputs {
    /// The visibility these inputs call for.
    #[must_use]
    pub fn target(self) -> Visibility {
        if self.enabled && self.has_editor && self.supports_ruler {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// A change of [`Visibility`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityTransition {
    /// `Hidden -> Visible`: callers run the full recompute cascade.
    Shown,
    /// `Visible -> Hidden`: presentation only.
    Hidden,
}

/// Two-state machine over [`VisibilityInputs`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityMachine {
    inputs: VisibilityInputs,
    current: Visibility,
}

impl VisibilityMachine {
    /// Creates a hidden machine with all conditions false.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current visibility.
    #[must_use]
    pub fn current(&self) -> Visibility {
        self.current
    }

    /// Last inputs seen.
    #[must_use]
    pub fn inputs(&self) -> VisibilityInputs {
        self.inputs
    }

    /// Replaces the inputs and reports a transition, if any.
    pub fn update(&mut self, inputs: VisibilityInputs) -> Option<VisibilityTransition> {
        self.inputs = inputs;
        let target = inputs.target();
        if target == self.current {
            return None;
        }
        self.current = target;
        Some(match target {
            Visibility::Visible => VisibilityTransition::Shown,
            Visibility::Hidden => VisibilityTransition::Hidden,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(enabled: bool, has_editor: bool, supports_ruler: bool) -> VisibilityInputs {
        VisibilityInputs {
            enabled,
            has_editor,
            supports_ruler,
        }
    }

    #[test]
    fn visible_only_when_all_conditions_hold() {
        for enabled in [false, true] {
            for has_editor in [false, true] {
                for supports in [false, true] {
                    let expected = enabled && has_editor && supports;
                    assert_eq!(
                        inputs(enabled, has_editor, supports).target().is_visible(),
                        expected
                    );
                }
            }
        }
    }

    #[test]
    fn transitions_are_reported_once() {
        let mut machine = VisibilityMachine::new();
        assert_eq!(machine.current(), Visibility::Hidden);
        assert_eq!(machine.update(inputs(true, true, true)), Some(VisibilityTransition::Shown));
        assert_eq!(machine.update(inputs(true, true, true)), None);
        assert_eq!(
            machine.update(inputs(true, true, false)),
            Some(VisibilityTransition::Hidden)
        );
        assert_eq!(machine.update(inputs(false, true, false)), None);
        assert_eq!(machine.inputs(), inputs(false, true, false));
    }
}
