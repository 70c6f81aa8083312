//! Events a backend reports to the widget layer, and the event mask.

use crate::backend::WindowId;
use crate::state::WindowState;

/// Input and structure events a window asks to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventMask(u32);

impl EventMask {
    pub const EXPOSURE: EventMask = EventMask(1 << 1);
    pub const POINTER_MOTION: EventMask = EventMask(1 << 2);
    pub const BUTTON_PRESS: EventMask = EventMask(1 << 8);
    pub const BUTTON_RELEASE: EventMask = EventMask(1 << 9);
    pub const KEY_PRESS: EventMask = EventMask(1 << 10);
    pub const KEY_RELEASE: EventMask = EventMask(1 << 11);
    pub const ENTER_NOTIFY: EventMask = EventMask(1 << 12);
    pub const LEAVE_NOTIFY: EventMask = EventMask(1 << 13);
    pub const FOCUS_CHANGE: EventMask = EventMask(1 << 14);
    /// Configure, map, unmap and destroy notifications.
    ///
    /// Backends always select this for the native window, whatever the
    /// caller asked for.
    pub const STRUCTURE: EventMask = EventMask(1 << 15);
    pub const PROPERTY_CHANGE: EventMask = EventMask(1 << 16);
    pub const SCROLL: EventMask = EventMask(1 << 21);
}

crate::flag_set_ops!(EventMask, u32);

/// A notification from a backend to the widget layer.
///
/// Backends queue these while handling requests and OS notifications; the
/// widget layer drains them with
/// [`NativeWindowBackend::take_events`](crate::NativeWindowBackend::take_events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendEvent {
    /// The window state bitmask changed.
    StateChanged {
        /// The window whose state changed.
        window: WindowId,
        /// The bits that flipped.
        changed: WindowState,
        /// The state after the change.
        new_state: WindowState,
    },

    /// The OS moved or resized the window.
    ///
    /// Coordinates are relative to the parent window (root-relative for
    /// top-level windows).
    Configure {
        window: WindowId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// The native window is gone; the id is no longer valid.
    Destroyed {
        window: WindowId,
    },

    /// Any cached rendering surface for the window must be recreated.
    SurfaceInvalidated {
        window: WindowId,
    },
}

impl BackendEvent {
    /// The window this event is about.
    pub fn window(&self) -> WindowId {
        match self {
            BackendEvent::StateChanged { window, .. }
            | BackendEvent::Configure { window, .. }
            | BackendEvent::Destroyed { window }
            | BackendEvent::SurfaceInvalidated { window } => *window,
        }
    }
}
