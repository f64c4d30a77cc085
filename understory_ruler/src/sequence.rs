// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick and number-label sequences that back the ruler strip.
//!
//! Two parallel tracks are maintained:
//!
//! - the **tick track**: `[Left filler, tick 0, tick 1, …, tick N, Right filler]`,
//! - the **label track**: `[Left filler, 10, spacer, 20, spacer, …, N, Right filler]`.
//!
//! Fillers are boundary sentinels, never addressable columns. Growth and
//! shrinkage always happen directly in front of the right filler, so a
//! [`TickSequence::reconcile`] touches only the delta range and reports the
//! exact slot edits it made in a [`SequenceDelta`]. A renderer can replay
//! those edits onto its own element list instead of rebuilding the strip.
//!
//! Label spans are expressed in columns. An interior decade label spans
//! [`INTERIOR_LABEL_SPAN`] columns and is followed by a one-column spacer;
//! the last label spans [`FINAL_LABEL_SPAN`] columns so the right filler has
//! room.
//!
//! ```
//! use understory_ruler::{SequenceEdit, TickSequence};
//!
//! let mut seq = TickSequence::new(80);
//! assert_eq!(seq.tick_count(), 81);
//! assert_eq!(seq.label_count(), 8);
//!
//! let delta = seq.reconcile(100);
//! assert_eq!(seq.tick_count(), 101);
//! assert!(matches!(delta.edits[0], SequenceEdit::Respan { span: 9, .. }));
//! ```

use alloc::vec::Vec;
use core::ops::Range;

use smallvec::SmallVec;

use crate::length::{DECADE, MAX_COLUMNS, round_up_to_decade};

/// Span, in columns, of every decade label except the last.
pub const INTERIOR_LABEL_SPAN: u32 = 9;

/// Span, in columns, of the last decade label.
pub const FINAL_LABEL_SPAN: u32 = 6;

/// Major ticks fall on every multiple of this many columns.
pub const MAJOR_TICK_INTERVAL: u32 = 5;

/// Visual weight of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Tall tick on a multiple of [`MAJOR_TICK_INTERVAL`].
    Major,
    /// Short tick everywhere else.
    Minor,
}

/// One column of the tick track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickCell {
    /// Column index, starting at zero.
    pub index: u32,
    /// Major iff `index % 5 == 0`.
    pub kind: TickKind,
}

impl TickCell {
    /// Creates the tick cell for `index`.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        let kind = if index % MAJOR_TICK_INTERVAL == 0 {
            TickKind::Major
        } else {
            TickKind::Minor
        };
        Self { index, kind }
    }
}

/// Which end of a track a filler anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Filler {
    /// Before column zero.
    Left,
    /// After the last column.
    Right,
}

/// An entry of the tick track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickSlot {
    /// Boundary sentinel.
    Filler(Filler),
    /// A real column.
    Tick(TickCell),
}

/// An entry of the label track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelSlot {
    /// Boundary sentinel.
    Filler(Filler),
    /// Number label for a multiple of ten.
    Decade {
        /// Column the label names.
        column: u32,
        /// Width in columns.
        span: u32,
    },
    /// One-column gap between two adjacent decade labels.
    Spacer,
}

/// Track an edit applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    /// [`TickSlot`]s.
    Ticks,
    /// [`LabelSlot`]s.
    Labels,
}

/// One slot-level edit performed by [`TickSequence::reconcile`].
///
/// Indices are slot indices including the left filler, valid at the moment
/// the edit is applied (edits are listed in application order).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceEdit {
    /// `count` new tick slots were inserted starting at `at`.
    InsertTicks {
        /// First inserted slot.
        at: usize,
        /// Number of inserted slots.
        count: usize,
    },
    /// Tick slots in `range` were removed.
    RemoveTicks {
        /// Removed slots.
        range: Range<usize>,
    },
    /// `count` new label slots were inserted starting at `at`.
    InsertLabels {
        /// First inserted slot.
        at: usize,
        /// Number of inserted slots.
        count: usize,
    },
    /// Label slots in `range` were removed.
    RemoveLabels {
        /// Removed slots.
        range: Range<usize>,
    },
    /// The decade label at `at` now spans `span` columns.
    Respan {
        /// Label slot index.
        at: usize,
        /// New span in columns.
        span: u32,
    },
}

impl SequenceEdit {
    /// Returns the track this edit touches.
    #[must_use]
    pub fn track(&self) -> Track {
        match self {
            Self::InsertTicks { .. } | Self::RemoveTicks { .. } => Track::Ticks,
            Self::InsertLabels { .. } | Self::RemoveLabels { .. } | Self::Respan { .. } => {
                Track::Labels
            }
        }
    }
}

/// Result of a [`TickSequence::reconcile`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceDelta {
    /// Length before the reconcile.
    pub old_length: u32,
    /// Length after the reconcile.
    pub new_length: u32,
    /// Slot edits in application order.
    pub edits: SmallVec<[SequenceEdit; 4]>,
}

impl SequenceDelta {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// Ordered tick and label tracks for a ruler of a given length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickSequence {
    ticks: Vec<TickSlot>,
    labels: Vec<LabelSlot>,
    length: u32,
    revision: u64,
}

impl TickSequence {
    /// Creates the tracks for a ruler of `length` columns.
    ///
    /// `length` is rounded up to a multiple of [`DECADE`], at least one decade
    /// and at most [`MAX_COLUMNS`].
    #[must_use]
    pub fn new(length: u32) -> Self {
        let length = normalize_length(length);
        let mut ticks = Vec::with_capacity(length as usize + 3);
        ticks.push(TickSlot::Filler(Filler::Left));
        ticks.extend((0..=length).map(|c| TickSlot::Tick(TickCell::new(c))));
        ticks.push(TickSlot::Filler(Filler::Right));

        let decades = length / DECADE;
        let mut labels = Vec::with_capacity(decades as usize * 2 + 1);
        labels.push(LabelSlot::Filler(Filler::Left));
        for d in 1..=decades {
            if d > 1 {
                labels.push(LabelSlot::Spacer);
            }
            labels.push(LabelSlot::Decade {
                column: d * DECADE,
                span: label_span(d * DECADE, length),
            });
        }
        labels.push(LabelSlot::Filler(Filler::Right));

        Self {
            ticks,
            labels,
            length,
            revision: 0,
        }
    }

    /// Current length in columns.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Bumps every time a reconcile changes the tracks.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All tick slots, fillers included.
    #[must_use]
    pub fn tick_slots(&self) -> &[TickSlot] {
        &self.ticks
    }

    /// All label slots, fillers included.
    #[must_use]
    pub fn label_slots(&self) -> &[LabelSlot] {
        &self.labels
    }

    /// Number of real tick cells (`length + 1`).
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.ticks.len() - 2
    }

    /// Number of decade labels (`length / 10`).
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|slot| matches!(slot, LabelSlot::Decade { .. }))
            .count()
    }

    /// Real tick cells in column order.
    pub fn ticks(&self) -> impl Iterator<Item = TickCell> + '_ {
        self.ticks.iter().filter_map(|slot| match slot {
            TickSlot::Tick(cell) => Some(*cell),
            TickSlot::Filler(_) => None,
        })
    }

    /// Decade labels as `(column, span)` pairs in column order.
    pub fn labels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.labels.iter().filter_map(|slot| match slot {
            LabelSlot::Decade { column, span } => Some((*column, *span)),
            _ => None,
        })
    }

    /// Returns the tick cell for `column`, if it is within the ruler.
    #[must_use]
    pub fn tick(&self, column: u32) -> Option<TickCell> {
        match self.ticks.get(column as usize + 1) {
            Some(TickSlot::Tick(cell)) => Some(*cell),
            _ => None,
        }
    }

    /// Grows or truncates the tracks to `new_length`, touching only the delta.
    ///
    /// `new_length` is normalized like in [`TickSequence::new`]. Reconciling to
    /// the current length is a no-op and returns an empty delta.
    pub fn reconcile(&mut self, new_length: u32) -> SequenceDelta {
        let old_length = self.length;
        let new_length = normalize_length(new_length);
        let mut delta = SequenceDelta {
            old_length,
            new_length,
            edits: SmallVec::new(),
        };
        if new_length == old_length {
            return delta;
        }

        if new_length > old_length {
            self.append(old_length, new_length, &mut delta);
        } else {
            self.truncate(old_length, new_length, &mut delta);
        }

        self.length = new_length;
        self.revision += 1;
        log::trace!(
            "ruler sequence reconciled {old_length} -> {new_length} ({} edits)",
            delta.edits.len()
        );
        debug_assert!(self.invariants_hold(), "tick sequence invariants violated");
        delta
    }

    fn append(&mut self, old_length: u32, new_length: u32, delta: &mut SequenceDelta) {
        // Labels: the old last label becomes interior, then each new decade is
        // preceded by its spacer.
        let right = self.labels.len() - 1;
        let last = right - 1;
        if let LabelSlot::Decade { span, .. } = &mut self.labels[last] {
            *span = INTERIOR_LABEL_SPAN;
        }
        delta.edits.push(SequenceEdit::Respan {
            at: last,
            span: INTERIOR_LABEL_SPAN,
        });

        let added = ((old_length + DECADE)..=new_length)
            .step_by(DECADE as usize)
            .flat_map(|column| {
                [
                    LabelSlot::Spacer,
                    LabelSlot::Decade {
                        column,
                        span: label_span(column, new_length),
                    },
                ]
            });
        let before = self.labels.len();
        self.labels.splice(right..right, added);
        delta.edits.push(SequenceEdit::InsertLabels {
            at: right,
            count: self.labels.len() - before,
        });

        // Ticks.
        let right = self.ticks.len() - 1;
        let added = ((old_length + 1)..=new_length).map(|c| TickSlot::Tick(TickCell::new(c)));
        let before = self.ticks.len();
        self.ticks.splice(right..right, added);
        delta.edits.push(SequenceEdit::InsertTicks {
            at: right,
            count: self.ticks.len() - before,
        });
    }

    fn truncate(&mut self, old_length: u32, new_length: u32, delta: &mut SequenceDelta) {
        // Labels: every removed decade takes its preceding spacer with it.
        let right = self.labels.len() - 1;
        let removed = ((old_length - new_length) / DECADE) as usize * 2;
        let range = (right - removed)..right;
        self.labels.drain(range.clone());
        delta.edits.push(SequenceEdit::RemoveLabels {
            range: range.clone(),
        });

        let last = range.start - 1;
        if let LabelSlot::Decade { span, .. } = &mut self.labels[last] {
            *span = FINAL_LABEL_SPAN;
        }
        delta.edits.push(SequenceEdit::Respan {
            at: last,
            span: FINAL_LABEL_SPAN,
        });

        // Ticks.
        let right = self.ticks.len() - 1;
        let removed = (old_length - new_length) as usize;
        let range = (right - removed)..right;
        self.ticks.drain(range.clone());
        delta.edits.push(SequenceEdit::RemoveTicks { range });
    }

    /// Checks the structural invariants of both tracks.
    ///
    /// - `length + 1` ticks, tagged by `index % 5`, in column order;
    /// - one decade label per multiple of ten, one spacer between neighbours;
    /// - interior spans of 9, a final span of 6;
    /// - fillers only at both ends.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let ticks_ok = self.ticks.len() == self.length as usize + 3
            && self.ticks.first() == Some(&TickSlot::Filler(Filler::Left))
            && self.ticks.last() == Some(&TickSlot::Filler(Filler::Right))
            && self
                .ticks()
                .enumerate()
                .all(|(i, cell)| cell == TickCell::new(i as u32));

        let decades = (self.length / DECADE) as usize;
        let labels_ok = self.labels.len() == decades * 2 + 1
            && self.labels.first() == Some(&LabelSlot::Filler(Filler::Left))
            && self.labels.last() == Some(&LabelSlot::Filler(Filler::Right))
            && self.labels[1..self.labels.len() - 1]
                .iter()
                .enumerate()
                .all(|(i, slot)| match slot {
                    LabelSlot::Decade { column, span } => {
                        i % 2 == 0
                            && *column == (i as u32 / 2 + 1) * DECADE
                            && *span == label_span(*column, self.length)
                    }
                    LabelSlot::Spacer => i % 2 == 1,
                    LabelSlot::Filler(_) => false,
                });

        ticks_ok && labels_ok
    }
}

impl Default for TickSequence {
    fn default() -> Self {
        Self::new(crate::length::MIN_COLUMNS)
    }
}

fn label_span(column: u32, length: u32) -> u32 {
    if column == length {
        FINAL_LABEL_SPAN
    } else {
        INTERIOR_LABEL_SPAN
    }
}

fn normalize_length(length: u32) -> u32 {
    let normalized = round_up_to_decade(length.min(MAX_COLUMNS)).max(DECADE);
    if normalized != length {
        log::warn!(
            "ruler length {length} is not a multiple of ten in [10, {MAX_COLUMNS}], \
             using {normalized}"
        );
    }
    normalized
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn spacer_count(seq: &TickSequence) -> usize {
        seq.label_slots()
            .iter()
            .filter(|slot| matches!(slot, LabelSlot::Spacer))
            .count()
    }

    #[test]
    fn initial_sequence_matches_length() {
        let seq = TickSequence::new(80);
        assert_eq!(seq.length(), 80);
        assert_eq!(seq.tick_count(), 81);
        assert_eq!(seq.label_count(), 8);
        assert_eq!(spacer_count(&seq), 7);
        assert!(seq.invariants_hold());

        let labels: std::vec::Vec<_> = seq.labels().collect();
        assert_eq!(labels.first(), Some(&(10, INTERIOR_LABEL_SPAN)));
        assert_eq!(labels.last(), Some(&(80, FINAL_LABEL_SPAN)));
    }

    #[test]
    fn tick_kinds_follow_multiples_of_five() {
        let seq = TickSequence::new(20);
        let majors: std::vec::Vec<u32> = seq
            .ticks()
            .filter(|t| t.kind == TickKind::Major)
            .map(|t| t.index)
            .collect();
        assert_eq!(majors, [0, 5, 10, 15, 20]);
        assert_eq!(seq.tick(7).map(|t| t.kind), Some(TickKind::Minor));
        assert_eq!(seq.tick(21), None);
    }

    #[test]
    fn reconcile_same_length_is_noop() {
        let mut seq = TickSequence::new(80);
        let before = seq.clone();
        let delta = seq.reconcile(80);
        assert!(delta.is_empty());
        assert_eq!(seq, before);
        assert_eq!(seq.revision(), 0);
    }

    #[test]
    fn grow_reports_respan_then_inserts() {
        let mut seq = TickSequence::new(80);
        let delta = seq.reconcile(100);

        assert_eq!(delta.old_length, 80);
        assert_eq!(delta.new_length, 100);
        // Left filler + 8 labels + 7 spacers = 16 slots before the right filler.
        assert_eq!(
            delta.edits.as_slice(),
            &[
                SequenceEdit::Respan { at: 15, span: 9 },
                SequenceEdit::InsertLabels { at: 16, count: 4 },
                SequenceEdit::InsertTicks { at: 82, count: 20 },
            ]
        );
        assert_eq!(seq.tick_count(), 101);
        assert_eq!(seq.label_count(), 10);
        assert_eq!(spacer_count(&seq), 9);
        assert_eq!(seq.revision(), 1);
    }

    #[test]
    fn shrink_reports_removals_then_respan() {
        let mut seq = TickSequence::new(100);
        let delta = seq.reconcile(80);
        assert_eq!(
            delta.edits.as_slice(),
            &[
                SequenceEdit::RemoveLabels { range: 16..20 },
                SequenceEdit::Respan { at: 15, span: 6 },
                SequenceEdit::RemoveTicks { range: 82..102 },
            ]
        );
        assert_eq!(seq, {
            let mut fresh = TickSequence::new(80);
            fresh.revision = 1;
            fresh
        });
    }

    #[test]
    fn round_trip_restores_initial_sequence() {
        let initial = TickSequence::new(80);
        let mut seq = initial.clone();
        seq.reconcile(200);
        seq.reconcile(80);
        assert_eq!(seq.tick_slots(), initial.tick_slots());
        assert_eq!(seq.label_slots(), initial.label_slots());
    }

    #[test]
    fn shrink_to_single_decade() {
        let mut seq = TickSequence::new(80);
        seq.reconcile(10);
        assert_eq!(seq.tick_count(), 11);
        assert_eq!(seq.label_count(), 1);
        assert_eq!(spacer_count(&seq), 0);
        assert_eq!(seq.labels().next(), Some((10, FINAL_LABEL_SPAN)));
        assert!(seq.invariants_hold());
    }

    #[test]
    fn odd_lengths_are_normalized() {
        let seq = TickSequence::new(85);
        assert_eq!(seq.length(), 90);
        let seq = TickSequence::new(0);
        assert_eq!(seq.length(), 10);
    }

    #[test]
    fn oversized_lengths_are_capped() {
        let seq = TickSequence::new(u32::MAX);
        assert_eq!(seq.length(), MAX_COLUMNS);
        assert!(seq.invariants_hold());

        let mut seq = TickSequence::new(80);
        let delta = seq.reconcile(5_000);
        assert_eq!(delta.new_length, MAX_COLUMNS);
        assert_eq!(seq.tick_count(), MAX_COLUMNS as usize + 1);
        assert!(seq.invariants_hold());
    }

    #[test]
    fn edit_tracks_are_reported() {
        assert_eq!(
            SequenceEdit::InsertTicks { at: 0, count: 1 }.track(),
            Track::Ticks
        );
        assert_eq!(SequenceEdit::Respan { at: 1, span: 9 }.track(), Track::Labels);
    }

    quickcheck::quickcheck! {
        fn reconcile_keeps_invariants(steps: std::vec::Vec<u8>) -> bool {
            let mut seq = TickSequence::new(80);
            steps.into_iter().all(|step| {
                let target = (u32::from(step) % 100 + 1) * DECADE;
                seq.reconcile(target);
                seq.invariants_hold()
                    && seq.tick_count() == target as usize + 1
                    && seq.label_count() == (target / DECADE) as usize
            })
        }
    }
}
