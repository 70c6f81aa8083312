//! The backend context.
//!
//! [`Win32Backend`] owns every piece of process-wide state the backend
//! needs: the window arena, the handle table, the class registry and the
//! modal stack. Nothing lives in statics, so several backends (for example,
//! one per test) can coexist.
//!
//! The operations are split by concern:
//!
//! - window lifetime, hierarchy and relationships in `lifecycle.rs`
//! - visibility, state, placement and appearance in `state.rs`
//! - notification handling, device contexts and queries here

use casement_core::logging::{span_names, targets};
use casement_core::{
    BackendEvent, Decorations, EventMask, Functions, GeometryHints, HintFlags,
    NativeWindowBackend, Point, Rect, Result, WindowAttributes, WindowId, WindowState, WindowType,
};
use slotmap::SlotMap;

use crate::api::{
    BitmapHandle, DcHandle, NativeHandle, Notification, Win32Api, log_failure,
};
use crate::class_registry::ClassRegistry;
use crate::config::BackendConfig;
use crate::decoration::StylePolicy;
use crate::geometry;
use crate::handle_table::HandleTable;
use crate::modal::ModalStack;
use crate::window::{FullscreenSnapshot, WindowData};

/// The Win32 native window backend.
///
/// Generic over the OS seam so it runs against the real system
/// ([`SystemWin32`](crate::SystemWin32), Windows only) or the simulation in
/// [`testing`](crate::testing).
pub struct Win32Backend<A: Win32Api> {
    pub(crate) api: A,
    pub(crate) windows: SlotMap<WindowId, WindowData>,
    pub(crate) handles: HandleTable,
    pub(crate) classes: ClassRegistry,
    pub(crate) modal: ModalStack,
    pub(crate) root: WindowId,
    /// Screen to root coordinate offset.
    pub(crate) offset: Point,
    pub(crate) events: Vec<BackendEvent>,
    pub(crate) config: BackendConfig,
}

impl<A: Win32Api> Win32Backend<A> {
    /// Create a backend configured from the process environment.
    pub fn new(api: A) -> Result<Self> {
        Self::with_config(api, BackendConfig::from_env())
    }

    /// Create a backend with an explicit configuration.
    pub fn with_config(api: A, config: BackendConfig) -> Result<Self> {
        let monitors = api.monitors();
        let offset = geometry::root_offset(&monitors);
        let screen = geometry::virtual_screen(&monitors);
        let desktop = api.desktop_window();

        let mut windows = SlotMap::with_key();
        let root = windows.insert(WindowData::root(desktop, screen.width(), screen.height()));
        let mut handles = HandleTable::new();
        handles.insert(desktop, root);

        tracing::debug!(
            target: targets::LIFECYCLE,
            offset_x = offset.x,
            offset_y = offset.y,
            width = screen.width(),
            height = screen.height(),
            "backend initialized"
        );

        Ok(Self {
            api,
            windows,
            handles,
            classes: ClassRegistry::new(),
            modal: ModalStack::new(),
            root,
            offset,
            events: Vec::new(),
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The OS seam.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// The screen to root coordinate offset.
    pub fn root_offset(&self) -> Point {
        self.offset
    }

    /// The record of a window.
    pub fn window_data(&self, window: WindowId) -> Option<&WindowData> {
        self.windows.get(window)
    }

    /// Resolve a native handle to its window.
    pub fn lookup(&self, handle: NativeHandle) -> Option<WindowId> {
        self.handles.lookup(handle)
    }

    /// The native handle of a window.
    pub fn native_handle(&self, window: WindowId) -> Option<NativeHandle> {
        self.windows.get(window).and_then(|data| data.imp.handle)
    }

    pub fn window_type(&self, window: WindowId) -> Option<WindowType> {
        self.windows.get(window).map(|data| data.window_type)
    }

    pub fn parent(&self, window: WindowId) -> Option<WindowId> {
        self.windows.get(window).and_then(|data| data.parent)
    }

    /// Children, most recently added first.
    pub fn children(&self, window: WindowId) -> &[WindowId] {
        self.windows
            .get(window)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn transient_owner(&self, window: WindowId) -> Option<WindowId> {
        self.windows
            .get(window)
            .and_then(|data| data.imp.transient_owner)
    }

    pub fn transient_children(&self, window: WindowId) -> &[WindowId] {
        self.windows
            .get(window)
            .map(|data| data.imp.transient_children.as_slice())
            .unwrap_or(&[])
    }

    /// Events the window asked for at creation.
    pub fn event_mask(&self, window: WindowId) -> Option<EventMask> {
        self.windows.get(window).map(|data| data.event_mask)
    }

    /// Events the native window reports: the requested mask plus structure
    /// events, which the backend always needs.
    pub fn native_event_mask(&self, window: WindowId) -> Option<EventMask> {
        self.windows.get(window).map(|data| data.imp.native_event_mask)
    }

    pub fn is_input_only(&self, window: WindowId) -> bool {
        self.windows.get(window).is_some_and(|data| data.input_only)
    }

    /// The last opacity applied with `set_opacity`, `1.0` by default.
    pub fn opacity(&self, window: WindowId) -> Option<f64> {
        self.windows.get(window).map(|data| data.imp.opacity)
    }

    /// Check if a window is marked destroyed. Unknown ids count as destroyed.
    pub fn is_destroyed(&self, window: WindowId) -> bool {
        self.windows.get(window).is_none_or(|data| data.destroyed)
    }

    /// Check if a window is mapped.
    pub fn is_mapped(&self, window: WindowId) -> bool {
        self.windows.get(window).is_some_and(|data| data.is_mapped())
    }

    /// Cached position and client size `(x, y, width, height)`.
    pub fn geometry(&self, window: WindowId) -> Option<(i32, i32, i32, i32)> {
        self.windows
            .get(window)
            .map(|data| (data.x, data.y, data.width, data.height))
    }

    /// The position the OS picked when the window was created, in screen
    /// coordinates.
    pub fn initial_position(&self, window: WindowId) -> Option<Point> {
        self.windows
            .get(window)
            .map(|data| Point::new(data.imp.initial_x, data.imp.initial_y))
    }

    pub fn hint_flags(&self, window: WindowId) -> Option<HintFlags> {
        self.windows.get(window).map(|data| data.imp.hint_flags)
    }

    /// The fullscreen restore snapshot, present while the window is fullscreen.
    pub fn fullscreen_snapshot(&self, window: WindowId) -> Option<FullscreenSnapshot> {
        self.windows.get(window).and_then(|data| data.imp.fullscreen)
    }

    /// The explicitly set decorations.
    pub fn get_decorations(&self, window: WindowId) -> Option<Decorations> {
        self.windows.get(window).and_then(|data| data.imp.decorations)
    }

    /// The explicitly set functions.
    pub fn get_functions(&self, window: WindowId) -> Option<Functions> {
        self.windows.get(window).and_then(|data| data.imp.functions)
    }

    pub fn title(&self, window: WindowId) -> Option<&str> {
        self.windows.get(window).map(|data| data.title.as_str())
    }

    /// Number of live windows, including the root.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    // =========================================================================
    // Modal queries
    // =========================================================================

    /// The modal stack.
    pub fn modal_stack(&self) -> &ModalStack {
        &self.modal
    }

    /// Check if input to `window` is blocked by a mapped modal window.
    pub fn is_blocked(&self, window: WindowId) -> bool {
        self.modal.is_blocked(window, |id| self.is_mapped(id))
    }

    /// The most recent mapped modal window.
    pub fn current_modal(&self) -> Option<WindowId> {
        self.modal.current(|id| self.is_mapped(id))
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// The native handle of a live (created, not destroyed) window.
    pub(crate) fn live(&self, window: WindowId) -> Option<NativeHandle> {
        self.windows.get(window).and_then(|data| data.live_handle())
    }

    /// Change state bits and report the change.
    pub(crate) fn synthesize_state(&mut self, window: WindowId, unset: WindowState, set: WindowState) {
        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let old = data.state;
        let new = old.transition(unset, set);
        if old == new {
            return;
        }
        data.state = new;

        let changed = WindowState::from_bits(old.bits() ^ new.bits());
        tracing::debug!(
            target: targets::STATE,
            ?window,
            old = old.bits(),
            new = new.bits(),
            "state changed"
        );
        self.events.push(BackendEvent::StateChanged {
            window,
            changed,
            new_state: new,
        });
    }

    /// Run `f` with the style policy inputs of a window.
    pub(crate) fn with_policy<R>(
        &self,
        window: WindowId,
        f: impl FnOnce(&StylePolicy<'_>, bool) -> R,
    ) -> Option<R> {
        let data = self.windows.get(window)?;
        let policy = StylePolicy {
            window_type: data.window_type,
            type_hint: data.imp.type_hint,
            decorations: data.imp.decorations,
            hint_flags: data.imp.hint_flags,
            hints: &data.imp.hints,
        };
        Some(f(&policy, data.state.is_fullscreen()))
    }

    /// Re-derive a window's style bits from its policy inputs.
    pub(crate) fn update_style_bits(&self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        self.with_policy(window, |policy, fullscreen| {
            crate::decoration::update_style_bits(&self.api, handle, policy, fullscreen)
        });
    }

    /// Check if the OS parent of a handle is the desktop.
    pub(crate) fn is_desktop_child(&self, handle: NativeHandle) -> bool {
        self.api.get_parent(handle) == Some(self.api.desktop_window())
    }

    /// A window's client origin relative to its parent, in the coordinates
    /// the window records use (root coordinates for desktop children).
    fn client_position(&self, handle: NativeHandle) -> Option<Point> {
        let screen = log_failure(self.api.client_to_screen(handle, Point::new(0, 0)), handle)?;
        match self.api.get_parent(handle) {
            Some(parent) if parent != self.api.desktop_window() => {
                log_failure(self.api.screen_to_client(parent, screen), handle)
            }
            _ => Some(Point::new(screen.x + self.offset.x, screen.y + self.offset.y)),
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Process queued OS notifications until the queue is empty.
    pub fn process_notifications(&mut self) {
        let _span = tracing::trace_span!(span_names::NOTIFICATIONS).entered();
        loop {
            let notifications = self.api.take_notifications();
            if notifications.is_empty() {
                break;
            }
            for notification in notifications {
                self.handle_notification(notification);
            }
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        let handle = notification.handle();
        let Some(window) = self.handles.lookup(handle) else {
            tracing::trace!(
                target: targets::OS,
                handle = handle.0,
                ?notification,
                "notification for unknown window"
            );
            return;
        };

        match notification {
            Notification::Destroyed(_) => self.destroy_notify(window),
            Notification::Configured(_) => self.configure_notify(window, handle),
            Notification::StateChanged(_) => self.state_notify(window, handle),
        }
    }

    /// The OS moved or resized a window: refresh the cached geometry.
    fn configure_notify(&mut self, window: WindowId, handle: NativeHandle) {
        if self.is_destroyed(window) {
            return;
        }
        let Some(position) = self.client_position(handle) else {
            return;
        };
        let Some(client) = log_failure(self.api.client_rect(handle), handle) else {
            return;
        };

        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let resized = data.width != client.width() || data.height != client.height();
        let moved = data.x != position.x || data.y != position.y;
        if !resized && !moved {
            return;
        }

        data.x = position.x;
        data.y = position.y;
        data.width = client.width();
        data.height = client.height();

        if resized {
            self.events.push(BackendEvent::SurfaceInvalidated { window });
        }
        self.events.push(BackendEvent::Configure {
            window,
            x: position.x,
            y: position.y,
            width: client.width(),
            height: client.height(),
        });
    }

    /// The OS minimized, maximized or restored a window.
    fn state_notify(&mut self, window: WindowId, handle: NativeHandle) {
        if self.is_destroyed(window) {
            return;
        }
        if self.api.is_iconic(handle) {
            self.synthesize_state(window, WindowState::empty(), WindowState::ICONIFIED);
        } else if self.api.is_zoomed(handle) {
            self.synthesize_state(window, WindowState::ICONIFIED, WindowState::MAXIMIZED);
        } else {
            self.synthesize_state(
                window,
                WindowState::ICONIFIED | WindowState::MAXIMIZED,
                WindowState::empty(),
            );
        }
    }

    /// Drain the queued events.
    pub fn take_events(&mut self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Device contexts
    // =========================================================================

    /// Acquire the window's device context for drawing.
    ///
    /// Returns `None` for destroyed windows and when the OS refuses. Every
    /// successful call must be paired with [`release_dc`](Self::release_dc).
    pub fn acquire_dc(&mut self, window: WindowId) -> Option<DcHandle> {
        let handle = self.live(window)?;
        let data = self.windows.get_mut(window)?;
        data.imp.dc.acquire(&self.api, handle)
    }

    /// Release one device context acquisition.
    pub fn release_dc(&mut self, window: WindowId) {
        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let Some(handle) = data.imp.handle else {
            return;
        };
        data.imp.dc.release(&self.api, handle);
    }

    /// Select a bitmap into the held device context. The previously selected
    /// bitmap is restored when the lease ends.
    pub fn select_dc_bitmap(&mut self, window: WindowId, bitmap: BitmapHandle) -> bool {
        let Some(handle) = self.live(window) else {
            return false;
        };
        match self.windows.get_mut(window) {
            Some(data) => data.imp.dc.select_bitmap(&self.api, handle, bitmap),
            None => false,
        }
    }

    /// Outstanding device context acquisitions.
    pub fn dc_count(&self, window: WindowId) -> u32 {
        self.windows
            .get(window)
            .map(|data| data.imp.dc.count())
            .unwrap_or(0)
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Translate a point in a window's client area to root coordinates.
    pub fn root_coords(&self, window: WindowId, x: i32, y: i32) -> Option<Point> {
        let handle = self.live(window)?;
        let screen = log_failure(self.api.client_to_screen(handle, Point::new(x, y)), handle)?;
        Some(Point::new(screen.x + self.offset.x, screen.y + self.offset.y))
    }

    /// The root coordinates of a window's client origin.
    pub fn origin(&self, window: WindowId) -> Option<Point> {
        self.root_coords(window, 0, 0)
    }

    /// The decorated rectangle of the top-level window containing `window`,
    /// in root coordinates.
    pub fn frame_extents(&self, window: WindowId) -> Option<Rect> {
        let mut current = window;
        while let Some(parent) = self.parent(current) {
            if self.parent(parent).is_none() {
                break;
            }
            current = parent;
        }

        let handle = self.live(current)?;
        let rect = log_failure(self.api.window_rect(handle), handle)?;
        Some(rect.offset(self.offset.x, self.offset.y))
    }
}

impl<A: Win32Api> NativeWindowBackend for Win32Backend<A> {
    fn root_window(&self) -> WindowId {
        self.root
    }

    fn create_window(&mut self, parent: WindowId, attributes: &WindowAttributes) -> Result<WindowId> {
        Win32Backend::create_window(self, parent, attributes)
    }

    fn destroy_window(&mut self, window: WindowId) {
        Win32Backend::destroy_window(self, window)
    }

    fn show(&mut self, window: WindowId, already_mapped: bool) {
        Win32Backend::show(self, window, already_mapped)
    }

    fn hide(&mut self, window: WindowId) {
        Win32Backend::hide(self, window)
    }

    fn withdraw(&mut self, window: WindowId) {
        Win32Backend::withdraw(self, window)
    }

    fn move_resize(&mut self, window: WindowId, with_move: bool, x: i32, y: i32, width: i32, height: i32) {
        if with_move {
            Win32Backend::move_resize(self, window, x, y, width, height)
        } else {
            Win32Backend::resize(self, window, width, height)
        }
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        Win32Backend::set_title(self, window, title)
    }

    fn iconify(&mut self, window: WindowId) {
        Win32Backend::iconify(self, window)
    }

    fn deiconify(&mut self, window: WindowId) {
        Win32Backend::deiconify(self, window)
    }

    fn maximize(&mut self, window: WindowId) {
        Win32Backend::maximize(self, window)
    }

    fn unmaximize(&mut self, window: WindowId) {
        Win32Backend::unmaximize(self, window)
    }

    fn fullscreen(&mut self, window: WindowId) {
        Win32Backend::fullscreen(self, window)
    }

    fn unfullscreen(&mut self, window: WindowId) {
        Win32Backend::unfullscreen(self, window)
    }

    fn reparent(&mut self, window: WindowId, new_parent: WindowId, x: i32, y: i32) -> bool {
        Win32Backend::reparent(self, window, new_parent, x, y)
    }

    fn raise(&mut self, window: WindowId) {
        Win32Backend::raise(self, window)
    }

    fn lower(&mut self, window: WindowId) {
        Win32Backend::lower(self, window)
    }

    fn focus(&mut self, window: WindowId) {
        Win32Backend::focus(self, window)
    }

    fn set_geometry_hints(&mut self, window: WindowId, hints: &GeometryHints, flags: HintFlags) {
        Win32Backend::set_geometry_hints(self, window, hints, flags)
    }

    fn set_decorations(&mut self, window: WindowId, decorations: Decorations) {
        Win32Backend::set_decorations(self, window, decorations)
    }

    fn set_functions(&mut self, window: WindowId, functions: Functions) {
        Win32Backend::set_functions(self, window, functions)
    }

    fn set_transient_for(&mut self, window: WindowId, owner: Option<WindowId>) {
        Win32Backend::set_transient_for(self, window, owner)
    }

    fn set_modal_hint(&mut self, window: WindowId, modal: bool) {
        Win32Backend::set_modal_hint(self, window, modal)
    }

    fn state(&self, window: WindowId) -> Option<WindowState> {
        self.windows.get(window).map(|data| data.state)
    }

    fn take_events(&mut self) -> Vec<BackendEvent> {
        Win32Backend::take_events(self)
    }
}
