//! Win32 native window backend for Casement.
//!
//! This crate maps the platform-neutral window model of `casement-core` onto
//! native `HWND`s:
//!
//! - **Handle table**: resolving native handles back to windows
//! - **Class registry**: the four window classes, registered on first use
//! - **Geometry**: client/window/root coordinate translation and gravity
//! - **Lifecycle**: creation, foreign adoption, destruction and reparenting
//! - **State machine**: show/hide, minimize/maximize, fullscreen, placement
//! - **DC leases**: shared, reference-counted device contexts
//! - **Modal stack**: which windows currently block input to others
//! - **Style policy**: decorations, functions and hints to `WS_*` bits
//!
//! All OS access goes through the [`Win32Api`] trait. `SystemWin32` talks to
//! the real windowing system (Windows only); [`testing::MockWin32`]
//! simulates it so the backend runs anywhere.
//!
//! # Example
//!
//! ```
//! use casement_core::{NativeWindowBackend, WindowAttributes, WindowType};
//! use casement_win32::{BackendConfig, Win32Backend};
//! use casement_win32::testing::MockWin32;
//!
//! let config = BackendConfig::new().with_application_name("Demo");
//! let mut backend = Win32Backend::with_config(MockWin32::new(), config).unwrap();
//!
//! let root = backend.root_window();
//! let window = backend
//!     .create_window(root, &WindowAttributes::new(WindowType::Toplevel).with_size(640, 480))
//!     .unwrap();
//! backend.show(window, false);
//!
//! assert!(backend.is_mapped(window));
//! assert_eq!(backend.title(window), Some("Demo"));
//! ```

pub mod api;
mod backend;
pub mod class_registry;
mod config;
pub mod dc_lease;
pub mod decoration;
pub mod geometry;
pub mod handle_table;
mod lifecycle;
pub mod modal;
mod state;
#[cfg(windows)]
mod sys;
pub mod testing;
pub mod window;

pub use api::{
    BitmapHandle, ClassAtom, CursorHandle, DcHandle, ExStyle, IconHandle, MonitorInfo,
    NativeHandle, Notification, OsError, OsResult, ShowCommand, SwpFlags, SysCommand, Win32Api,
    WindowStyle, ZOrder,
};
pub use backend::Win32Backend;
pub use config::{APPLICATION_NAME_VAR, BackendConfig, PLACEHOLDER_TITLE};
pub use modal::ModalStack;
#[cfg(windows)]
pub use sys::SystemWin32;
