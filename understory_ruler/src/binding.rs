// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding to the one active editor.
//!
//! An [`EditorBinding`] owns the subscriptions it made and releases them when
//! it is dropped, so a binding can never leave listeners behind. A
//! [`BindingSlot`] holds at most one binding and always releases the old one
//! before subscribing on the new one.

use core::fmt;

use smallvec::SmallVec;

use crate::error::RulerError;
use crate::host::{EditorHandle, EditorId, SubscriptionId, Topics};

/// Topics a ruler subscribes to on every editor it binds.
pub const RULER_TOPICS: Topics = Topics::all();

/// Live subscriptions on one editor.
pub struct EditorBinding<E: EditorHandle> {
    editor: E,
    subscriptions: SmallVec<[SubscriptionId; 6]>,
}

impl<E: EditorHandle> EditorBinding<E> {
    /// Subscribes to each topic in `topics` individually.
    pub fn bind(mut editor: E, topics: Topics) -> Self {
        let subscriptions = topics.iter().map(|topic| editor.subscribe(topic)).collect();
        log::debug!("ruler bound to {:?}", editor.id());
        Self {
            editor,
            subscriptions,
        }
    }

    /// Identity of the bound editor.
    #[must_use]
    pub fn id(&self) -> EditorId {
        self.editor.id()
    }

    /// The bound editor.
    #[must_use]
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Subscriptions still held.
    #[must_use]
    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }

    /// Unsubscribes everything and drops the binding.
    pub fn release(self) {
        drop(self);
    }

    fn unsubscribe_all(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            self.editor.unsubscribe(subscription);
        }
    }
}

impl<E: EditorHandle> Drop for EditorBinding<E> {
    fn drop(&mut self) {
        if !self.subscriptions.is_empty() {
            log::debug!("ruler released {:?}", self.editor.id());
        }
        self.unsubscribe_all();
    }
}

impl<E: EditorHandle> fmt::Debug for EditorBinding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorBinding")
            .field("editor", &self.editor.id())
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

/// Outcome of [`BindingSlot::rebind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rebind {
    /// The requested editor was already bound; nothing happened.
    Unchanged,
    /// The slot now holds a different binding (or none).
    Changed {
        /// Previously bound editor.
        old: Option<EditorId>,
        /// Newly bound editor.
        new: Option<EditorId>,
    },
}

/// Holds at most one [`EditorBinding`].
pub struct BindingSlot<E: EditorHandle> {
    current: Option<EditorBinding<E>>,
    topics: Topics,
}

impl<E: EditorHandle> BindingSlot<E> {
    /// Creates an empty slot that will subscribe to `topics`.
    #[must_use]
    pub fn new(topics: Topics) -> Self {
        Self {
            current: None,
            topics,
        }
    }

    /// The current binding.
    #[must_use]
    pub fn current(&self) -> Option<&EditorBinding<E>> {
        self.current.as_ref()
    }

    /// The bound editor.
    #[must_use]
    pub fn editor(&self) -> Option<&E> {
        self.current.as_ref().map(EditorBinding::editor)
    }

    /// Identity of the bound editor.
    #[must_use]
    pub fn id(&self) -> Option<EditorId> {
        self.current.as_ref().map(EditorBinding::id)
    }

    /// Replaces the binding.
    ///
    /// The old binding is fully released before the new editor sees its
    /// first `subscribe`. Rebinding the already-bound editor is a no-op.
    pub fn rebind(&mut self, editor: Option<E>) -> Rebind {
        let old = self.id();
        let new = editor.as_ref().map(EditorHandle::id);
        if new.is_some() && new == old {
            log::warn!("ruler asked to rebind to the editor it is already bound to ({old:?})");
            return Rebind::Unchanged;
        }
        if let Some(previous) = self.current.take() {
            previous.release();
        }
        self.current = editor.map(|e| EditorBinding::bind(e, self.topics));
        Rebind::Changed { old, new }
    }

    /// Verifies that an event from `source` belongs to the current binding.
    pub fn check_source(&self, source: EditorId) -> Result<&EditorBinding<E>, RulerError> {
        match &self.current {
            Some(binding) if binding.id() == source => Ok(binding),
            _ => Err(RulerError::StaleBindingAccess {
                bound: self.id(),
                source,
            }),
        }
    }
}

impl<E: EditorHandle> fmt::Debug for BindingSlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingSlot")
            .field("current", &self.current)
            .field("topics", &self.topics)
            .finish()
    }
}
