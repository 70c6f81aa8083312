//! Native handle to window id mapping.

use std::collections::HashMap;

use casement_core::WindowId;
use casement_core::logging::targets;

use crate::api::NativeHandle;

/// Maps live native window handles to the windows that own them.
///
/// Entries are added once the native window exists and removed when the OS
/// reports it destroyed. A handle is never mapped twice: inserting under a
/// handle that is still registered is refused.
#[derive(Debug, Default)]
pub struct HandleTable {
    entries: HashMap<NativeHandle, WindowId>,
}

impl HandleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `window` under `handle`.
    ///
    /// Returns `false` (and leaves the table unchanged) if the handle is
    /// already mapped.
    pub fn insert(&mut self, handle: NativeHandle, window: WindowId) -> bool {
        if let Some(existing) = self.entries.get(&handle) {
            tracing::warn!(
                target: targets::LIFECYCLE,
                handle = handle.0,
                ?existing,
                ?window,
                "handle already registered"
            );
            return false;
        }
        self.entries.insert(handle, window);
        true
    }

    /// Unregister `handle`. Does nothing if it is not mapped.
    pub fn remove(&mut self, handle: NativeHandle) -> Option<WindowId> {
        self.entries.remove(&handle)
    }

    /// Resolve a handle.
    pub fn lookup(&self, handle: NativeHandle) -> Option<WindowId> {
        self.entries.get(&handle).copied()
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<WindowId> {
        let mut map: SlotMap<WindowId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_insert_lookup_remove() {
        let ids = ids(1);
        let mut table = HandleTable::new();
        let handle = NativeHandle(0x1000);

        assert!(table.insert(handle, ids[0]));
        assert_eq!(table.lookup(handle), Some(ids[0]));

        assert_eq!(table.remove(handle), Some(ids[0]));
        assert_eq!(table.lookup(handle), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_refuses_live_handle() {
        let ids = ids(2);
        let mut table = HandleTable::new();
        let handle = NativeHandle(0x2000);

        assert!(table.insert(handle, ids[0]));
        assert!(!table.insert(handle, ids[1]));
        assert_eq!(table.lookup(handle), Some(ids[0]));

        table.remove(handle);
        assert!(table.insert(handle, ids[1]));
        assert_eq!(table.lookup(handle), Some(ids[1]));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut table = HandleTable::new();
        assert_eq!(table.remove(NativeHandle(7)), None);
        assert_eq!(table.len(), 0);
    }
}
