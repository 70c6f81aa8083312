//! Per-window records.

use casement_core::{
    Decorations, EventMask, Functions, GeometryHints, HintFlags, Rect, TypeHint, WindowAttributes,
    WindowId, WindowState, WindowType,
};

use crate::api::{CursorHandle, IconHandle, NativeHandle, WindowStyle};
use crate::dc_lease::DcLease;

/// What a window had before it went fullscreen.
///
/// Exists exactly while the window's state has `FULLSCREEN` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenSnapshot {
    /// Window rectangle in screen coordinates.
    pub rect: Rect,
    /// Style word to restore.
    pub style: WindowStyle,
    /// Hint flags to restore (`MAX_SIZE` is stripped while fullscreen).
    pub hint_flags: HintFlags,
}

/// Backend state of a native window.
#[derive(Debug)]
pub struct WindowImpl {
    /// The native window, once created.
    pub handle: Option<NativeHandle>,
    pub cursor: Option<CursorHandle>,
    /// Icons owned by this window, destroyed when replaced or on destroy.
    pub big_icon: Option<IconHandle>,
    pub small_icon: Option<IconHandle>,
    pub hint_flags: HintFlags,
    pub hints: GeometryHints,
    pub type_hint: TypeHint,
    /// Explicit decorations; `None` derives them from the hints.
    pub decorations: Option<Decorations>,
    /// Explicit functions; `None` leaves the system menu alone.
    pub functions: Option<Functions>,
    /// Not owned: the owner keeps this window in its `transient_children`.
    pub transient_owner: Option<WindowId>,
    pub transient_children: Vec<WindowId>,
    pub override_redirect: bool,
    /// Position the OS assigned on creation, in screen coordinates.
    pub initial_x: i32,
    pub initial_y: i32,
    pub native_event_mask: EventMask,
    pub dc: DcLease,
    pub fullscreen: Option<FullscreenSnapshot>,
    /// Type to restore when a demoted toplevel is reparented back to the root.
    pub toplevel_window_type: Option<WindowType>,
    pub opacity: f64,
}

impl WindowImpl {
    fn new(type_hint: TypeHint, override_redirect: bool) -> Self {
        Self {
            handle: None,
            cursor: None,
            big_icon: None,
            small_icon: None,
            hint_flags: HintFlags::empty(),
            hints: GeometryHints::default(),
            type_hint,
            decorations: None,
            functions: None,
            transient_owner: None,
            transient_children: Vec::new(),
            override_redirect,
            initial_x: 0,
            initial_y: 0,
            native_event_mask: EventMask::empty(),
            dc: DcLease::new(),
            fullscreen: None,
            toplevel_window_type: None,
            opacity: 1.0,
        }
    }
}

/// A window in the backend's hierarchy.
#[derive(Debug)]
pub struct WindowData {
    pub window_type: WindowType,
    /// Position relative to the parent (root coordinates for top-levels).
    pub x: i32,
    pub y: i32,
    /// Client-area size.
    pub width: i32,
    pub height: i32,
    pub state: WindowState,
    pub destroyed: bool,
    /// `None` only for the root window.
    pub parent: Option<WindowId>,
    /// Most recently added first.
    pub children: Vec<WindowId>,
    pub event_mask: EventMask,
    pub input_only: bool,
    pub focus_on_map: bool,
    pub accept_focus: bool,
    pub title: String,
    pub imp: WindowImpl,
}

impl WindowData {
    /// A new, unmapped window described by `attributes`.
    pub fn from_attributes(parent: WindowId, attributes: &WindowAttributes) -> Self {
        let (x, y) = attributes.position();
        let (width, height) = attributes.size();
        Self {
            window_type: attributes.window_type(),
            x,
            y,
            width: width.max(1),
            height: height.max(1),
            state: WindowState::WITHDRAWN,
            destroyed: false,
            parent: Some(parent),
            children: Vec::new(),
            event_mask: attributes.event_mask(),
            input_only: attributes.input_only(),
            focus_on_map: attributes.focus_on_map(),
            accept_focus: attributes.accept_focus(),
            title: String::new(),
            imp: WindowImpl::new(attributes.type_hint(), attributes.override_redirect()),
        }
    }

    /// The root window record.
    pub fn root(handle: NativeHandle, width: i32, height: i32) -> Self {
        let mut imp = WindowImpl::new(TypeHint::Desktop, false);
        imp.handle = Some(handle);
        Self {
            window_type: WindowType::Root,
            x: 0,
            y: 0,
            width,
            height,
            state: WindowState::empty(),
            destroyed: false,
            parent: None,
            children: Vec::new(),
            event_mask: EventMask::STRUCTURE,
            input_only: false,
            focus_on_map: false,
            accept_focus: false,
            title: String::new(),
            imp,
        }
    }

    /// A foreign window adopted at the given geometry.
    pub fn foreign(parent: WindowId, handle: NativeHandle, x: i32, y: i32, width: i32, height: i32) -> Self {
        let mut imp = WindowImpl::new(TypeHint::Normal, false);
        imp.handle = Some(handle);
        Self {
            window_type: WindowType::Foreign,
            x,
            y,
            width,
            height,
            state: WindowState::empty(),
            destroyed: false,
            parent: Some(parent),
            children: Vec::new(),
            event_mask: EventMask::empty(),
            input_only: false,
            focus_on_map: false,
            accept_focus: false,
            title: String::new(),
            imp,
        }
    }

    /// The native handle, unless the window is destroyed or not yet created.
    pub fn live_handle(&self) -> Option<NativeHandle> {
        if self.destroyed { None } else { self.imp.handle }
    }

    /// Check if the window is mapped.
    pub fn is_mapped(&self) -> bool {
        self.state.is_mapped()
    }

    /// Check if the window sits directly under the root and is a top-level type.
    pub fn is_toplevel(&self) -> bool {
        self.window_type.is_toplevel()
    }
}
