//! Shared setup for the backend integration tests.

#![allow(dead_code)]

use casement_core::{NativeWindowBackend, WindowAttributes, WindowId, WindowType};
use casement_win32::testing::MockWin32;
use casement_win32::{BackendConfig, NativeHandle, Win32Backend};

pub type Backend = Win32Backend<MockWin32>;

/// Route backend logs to the test output. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A backend over a fresh simulation with a single 1920×1080 monitor.
pub fn backend() -> (MockWin32, Backend) {
    backend_with(MockWin32::new())
}

/// A backend over a prepared simulation.
pub fn backend_with(api: MockWin32) -> (MockWin32, Backend) {
    init_tracing();
    let config = BackendConfig::new().with_application_name("Tests");
    let backend = Win32Backend::with_config(api.clone(), config).expect("Failed to create backend");
    (api, backend)
}

/// Create a window of the given type directly under the root.
pub fn create(backend: &mut Backend, window_type: WindowType, width: i32, height: i32) -> WindowId {
    let root = backend.root_window();
    backend
        .create_window(root, &WindowAttributes::new(window_type).with_size(width, height))
        .expect("Failed to create window")
}

/// Create a window under `parent`.
pub fn create_under(backend: &mut Backend, parent: WindowId, attributes: WindowAttributes) -> WindowId {
    backend
        .create_window(parent, &attributes)
        .expect("Failed to create window")
}

pub fn handle(backend: &Backend, window: WindowId) -> NativeHandle {
    backend
        .native_handle(window)
        .expect("window has no native handle")
}
