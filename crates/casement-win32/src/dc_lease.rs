//! Reference-counted device context leases.
//!
//! Several rendering consumers may draw into a window at overlapping times.
//! The lease hands them the same `HDC` and returns it to the OS only when the
//! last one releases it.

use casement_core::logging::targets;

use crate::api::{BitmapHandle, DcHandle, NativeHandle, Win32Api, log_failure};

/// The device context state of one window.
#[derive(Debug, Default)]
pub struct DcLease {
    hdc: Option<DcHandle>,
    count: u32,
    /// The bitmap that was selected before ours, restored on final release.
    saved_bitmap: Option<BitmapHandle>,
}

impl DcLease {
    /// Create an empty lease.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the window's device context.
    ///
    /// The first acquisition asks the OS; later ones reuse the held context.
    /// Returns `None` without counting if the OS refuses.
    pub fn acquire<A: Win32Api>(&mut self, api: &A, handle: NativeHandle) -> Option<DcHandle> {
        let hdc = match self.hdc {
            Some(hdc) => hdc,
            None => {
                let hdc = log_failure(api.get_dc(handle), handle)?;
                self.hdc = Some(hdc);
                hdc
            }
        };

        self.count += 1;
        tracing::trace!(target: targets::DC, handle = handle.0, count = self.count, "acquire dc");
        Some(hdc)
    }

    /// Release one acquisition.
    ///
    /// The last release restores the saved bitmap and returns the context to
    /// the OS. Releasing an unheld lease is a programming error.
    pub fn release<A: Win32Api>(&mut self, api: &A, handle: NativeHandle) {
        debug_assert!(self.count > 0, "device context released more often than acquired");
        if self.count == 0 {
            tracing::error!(target: targets::DC, handle = handle.0, "release of unheld device context");
            return;
        }

        self.count -= 1;
        tracing::trace!(target: targets::DC, handle = handle.0, count = self.count, "release dc");
        if self.count == 0 {
            self.return_to_os(api, handle);
        }
    }

    /// Select `bitmap` into the held context, remembering the previous one.
    ///
    /// Returns `false` if no context is held or the OS refuses.
    pub fn select_bitmap<A: Win32Api>(
        &mut self,
        api: &A,
        handle: NativeHandle,
        bitmap: BitmapHandle,
    ) -> bool {
        let Some(hdc) = self.hdc else {
            return false;
        };
        match log_failure(api.select_bitmap(hdc, bitmap), handle) {
            Some(previous) => {
                if self.saved_bitmap.is_none() {
                    self.saved_bitmap = Some(previous);
                }
                true
            }
            None => false,
        }
    }

    /// Drop every outstanding acquisition, returning the context to the OS.
    pub fn release_all<A: Win32Api>(&mut self, api: &A, handle: NativeHandle) {
        if self.hdc.is_some() {
            tracing::debug!(
                target: targets::DC,
                handle = handle.0,
                count = self.count,
                "dropping outstanding device context"
            );
            self.count = 0;
            self.return_to_os(api, handle);
        }
    }

    fn return_to_os<A: Win32Api>(&mut self, api: &A, handle: NativeHandle) {
        let Some(hdc) = self.hdc.take() else {
            return;
        };
        if let Some(bitmap) = self.saved_bitmap.take() {
            log_failure(api.select_bitmap(hdc, bitmap), handle);
        }
        log_failure(api.release_dc(handle, hdc), handle);
    }

    /// The held context, if any.
    pub fn hdc(&self) -> Option<DcHandle> {
        self.hdc
    }

    /// Number of outstanding acquisitions.
    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockWin32, OsCall};

    #[test]
    fn test_nested_lease_single_os_pair() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        let mut lease = DcLease::new();

        let first = lease.acquire(&api, handle).unwrap();
        let second = lease.acquire(&api, handle).unwrap();
        assert_eq!(first, second);
        assert_eq!(lease.count(), 2);

        lease.release(&api, handle);
        assert_eq!(lease.hdc(), Some(first));
        assert_eq!(api.count_calls(|c| matches!(c, OsCall::ReleaseDc { .. })), 0);

        lease.release(&api, handle);
        assert_eq!(lease.hdc(), None);
        assert_eq!(api.count_calls(|c| matches!(c, OsCall::GetDc(_))), 1);
        assert_eq!(api.count_calls(|c| matches!(c, OsCall::ReleaseDc { .. })), 1);
    }

    #[test]
    fn test_failed_acquire_not_counted() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        api.fail_next("GetDC");
        let mut lease = DcLease::new();

        assert_eq!(lease.acquire(&api, handle), None);
        assert_eq!(lease.count(), 0);
        assert!(lease.acquire(&api, handle).is_some());
        assert_eq!(lease.count(), 1);
    }

    #[test]
    fn test_saved_bitmap_restored_on_release() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        let mut lease = DcLease::new();

        let hdc = lease.acquire(&api, handle).unwrap();
        assert!(lease.select_bitmap(&api, handle, BitmapHandle(0x77)));
        lease.release(&api, handle);

        let restored = api.count_calls(|c| {
            matches!(c, OsCall::SelectBitmap { dc, bitmap } if *dc == hdc && *bitmap != BitmapHandle(0x77))
        });
        assert_eq!(restored, 1);
    }

    #[test]
    fn test_select_without_dc() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        let mut lease = DcLease::new();
        assert!(!lease.select_bitmap(&api, handle, BitmapHandle(1)));
    }
}
