//! Modal window stack.
//!
//! This module provides [`ModalStack`], which tracks the windows that have
//! the modal hint set and decides whether input to a window is blocked.
//!
//! # Usage
//!
//! ```ignore
//! backend.set_modal_hint(dialog, true);
//!
//! if backend.modal_stack().is_blocked(window, |id| backend.is_mapped(id)) {
//!     // Don't deliver input events to this window
//! }
//! ```
//!
//! The stack never owns the windows it lists. Destroying a window removes it.

use casement_core::WindowId;
use casement_core::logging::targets;

/// Windows with the modal hint, most recently pushed first.
#[derive(Debug, Default)]
pub struct ModalStack {
    entries: Vec<WindowId>,
}

impl ModalStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a modal window. It is checked before every earlier entry.
    pub fn push(&mut self, window: WindowId) {
        tracing::debug!(target: targets::MODAL, ?window, "push modal");
        self.entries.insert(0, window);
    }

    /// Remove the first entry for `window`.
    ///
    /// Returns `true` if an entry was removed. Removing a window that is not
    /// on the stack does nothing.
    pub fn remove(&mut self, window: WindowId) -> bool {
        if let Some(pos) = self.entries.iter().position(|entry| *entry == window) {
            tracing::debug!(target: targets::MODAL, ?window, "remove modal");
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if input to `window` is blocked by a modal window.
    ///
    /// The stack is scanned from the most recent entry. Reaching `window`
    /// itself means it is not blocked; otherwise it is blocked if any mapped
    /// modal window was seen.
    pub fn is_blocked<F>(&self, window: WindowId, is_mapped: F) -> bool
    where
        F: Fn(WindowId) -> bool,
    {
        let mut found_any = false;

        for entry in &self.entries {
            if *entry == window {
                return false;
            }
            if is_mapped(*entry) {
                found_any = true;
            }
        }

        found_any
    }

    /// The most recent mapped modal window.
    pub fn current<F>(&self, is_mapped: F) -> Option<WindowId>
    where
        F: Fn(WindowId) -> bool,
    {
        self.entries.iter().copied().find(|entry| is_mapped(*entry))
    }

    /// Check if `window` is on the stack.
    pub fn contains(&self, window: WindowId) -> bool {
        self.entries.contains(&window)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
