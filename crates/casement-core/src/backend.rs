//! The native window backend contract.

use slotmap::new_key_type;

use crate::attributes::WindowAttributes;
use crate::decorations::{Decorations, Functions};
use crate::error::Result;
use crate::event::BackendEvent;
use crate::hints::{GeometryHints, HintFlags};
use crate::state::WindowState;

new_key_type! {
    /// A unique identifier for a window owned by a backend.
    ///
    /// Ids stay valid until the backend reports [`BackendEvent::Destroyed`]
    /// for them. After that every operation on the id is a no-op.
    pub struct WindowId;
}

/// The capability set a native window backend provides.
///
/// One implementation exists per windowing system. All operations are
/// best-effort: OS failures are logged by the backend and the call returns
/// normally. Operations on a destroyed window do nothing.
pub trait NativeWindowBackend {
    /// The root window covering the virtual screen.
    fn root_window(&self) -> WindowId;

    /// Create a native window under `parent`.
    fn create_window(&mut self, parent: WindowId, attributes: &WindowAttributes) -> Result<WindowId>;

    /// Destroy a window and its children.
    fn destroy_window(&mut self, window: WindowId);

    /// Map a window.
    ///
    /// `already_mapped` is set when the widget layer considers the window
    /// mapped already and only wants it raised into view.
    fn show(&mut self, window: WindowId, already_mapped: bool);

    /// Unmap a window.
    fn hide(&mut self, window: WindowId);

    /// Unmap a top-level window.
    fn withdraw(&mut self, window: WindowId);

    /// Move and/or resize a window. The position is ignored unless `with_move` is set.
    fn move_resize(&mut self, window: WindowId, with_move: bool, x: i32, y: i32, width: i32, height: i32);

    /// Set the window title.
    fn set_title(&mut self, window: WindowId, title: &str);

    fn iconify(&mut self, window: WindowId);
    fn deiconify(&mut self, window: WindowId);
    fn maximize(&mut self, window: WindowId);
    fn unmaximize(&mut self, window: WindowId);
    fn fullscreen(&mut self, window: WindowId);
    fn unfullscreen(&mut self, window: WindowId);

    /// Move a window under a new parent at `(x, y)`.
    ///
    /// Returns `true` if the reparent completes asynchronously.
    fn reparent(&mut self, window: WindowId, new_parent: WindowId, x: i32, y: i32) -> bool;

    fn raise(&mut self, window: WindowId);
    fn lower(&mut self, window: WindowId);

    /// Give a window keyboard focus, restoring it if needed.
    fn focus(&mut self, window: WindowId);

    /// Replace the geometry hints.
    fn set_geometry_hints(&mut self, window: WindowId, hints: &GeometryHints, flags: HintFlags);

    /// Override the decorations derived from the type hint.
    fn set_decorations(&mut self, window: WindowId, decorations: Decorations);

    /// Restrict the window-manager functions.
    fn set_functions(&mut self, window: WindowId, functions: Functions);

    /// Make `window` transient for `owner`, or clear the relation with `None`.
    fn set_transient_for(&mut self, window: WindowId, owner: Option<WindowId>);

    /// Add a window to or remove it from the modal stack.
    fn set_modal_hint(&mut self, window: WindowId, modal: bool);

    /// The current state bits, or `None` if the id is unknown.
    fn state(&self, window: WindowId) -> Option<WindowState>;

    /// Drain the queued events.
    fn take_events(&mut self) -> Vec<BackendEvent>;
}
