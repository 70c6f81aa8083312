//! Window lifetime, hierarchy and relationships.
//!
//! Creation goes through the class registry and the OS; destruction is split
//! in two halves. [`Win32Backend::destroy_window`] is the request side: it
//! detaches relationships, marks the subtree destroyed and asks the OS to
//! destroy the native window. [`Win32Backend::destroy_notify`] runs when the
//! OS reports the window gone, and is the only place a window record is
//! released.

use casement_core::logging::{span_names, targets};
use casement_core::{
    BackendError, BackendEvent, EventMask, Point, Rect, Result, TypeHint, WindowAttributes, WindowId,
    WindowState, WindowType,
};

use crate::api::{
    CW_USEDEFAULT, CreateParams, CursorHandle, ExStyle, NativeHandle, ShowCommand, SwpFlags,
    Win32Api, WindowStyle, ZOrder, log_failure,
};
use crate::backend::Win32Backend;
use crate::window::WindowData;

/// Fields where the window record disagrees with the attributes it is being
/// created from. The record wins; the attributes only duplicate it.
pub(crate) fn mismatched_fields(
    data: &WindowData,
    attributes: &WindowAttributes,
) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if data.window_type != attributes.window_type() {
        fields.push("window_type");
    }
    if (data.x, data.y) != attributes.position() {
        fields.push("position");
    }
    if (data.width, data.height) != attributes.size() {
        fields.push("size");
    }
    if data.input_only != attributes.input_only() {
        fields.push("input_only");
    }
    if data.event_mask != attributes.event_mask() {
        fields.push("event_mask");
    }
    if data.imp.type_hint != attributes.type_hint() {
        fields.push("type_hint");
    }
    if data.imp.override_redirect != attributes.override_redirect() {
        fields.push("override_redirect");
    }
    fields
}

/// Style words for a new native window.
pub(crate) fn creation_styles(
    window_type: WindowType,
    type_hint: TypeHint,
    input_only: bool,
    under_root: bool,
    under_foreign: bool,
) -> (WindowStyle, ExStyle) {
    let mut ex_style = if input_only {
        ExStyle::TRANSPARENT
    } else {
        ExStyle::empty()
    };

    let style = match window_type {
        WindowType::Temp => {
            ex_style |= ExStyle::TOOLWINDOW | ExStyle::TOPMOST;
            let base = if under_root {
                WindowStyle::POPUP
            } else {
                WindowStyle::CHILDWINDOW
            };
            base | WindowStyle::CLIPCHILDREN | WindowStyle::CLIPSIBLINGS
        }
        WindowType::Toplevel if under_foreign => {
            WindowStyle::CHILDWINDOW | WindowStyle::CLIPCHILDREN
        }
        WindowType::Toplevel => WindowStyle::OVERLAPPEDWINDOW | WindowStyle::CLIPCHILDREN,
        _ => WindowStyle::CHILDWINDOW | WindowStyle::CLIPCHILDREN | WindowStyle::CLIPSIBLINGS,
    };

    if type_hint == TypeHint::Utility {
        ex_style |= ExStyle::TOOLWINDOW;
    }
    (style, ex_style)
}

impl<A: Win32Api> Win32Backend<A> {
    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a native window under `parent`.
    ///
    /// Children of a foreign window are recorded under the root; only the
    /// native window itself lives inside the foreign one.
    pub fn create_window(
        &mut self,
        parent: WindowId,
        attributes: &WindowAttributes,
    ) -> Result<WindowId> {
        let window_type = attributes.window_type();
        let _span = tracing::debug_span!(span_names::CREATE, %window_type).entered();

        if !window_type.owns_native() {
            return Err(BackendError::CreationFailed(format!(
                "{window_type} windows cannot be created"
            )));
        }

        let real_parent = self.windows.get(parent).ok_or(BackendError::InvalidWindow)?;
        if real_parent.destroyed {
            return Err(BackendError::WindowDestroyed);
        }
        let real_parent_type = real_parent.window_type;

        if window_type == WindowType::Child && real_parent_type == WindowType::Root {
            return Err(BackendError::InvalidParent(
                "child windows cannot be created directly under the root window",
            ));
        }

        let under_foreign = real_parent_type == WindowType::Foreign;
        let logical_parent = if under_foreign { self.root } else { parent };
        if window_type == WindowType::Toplevel && logical_parent != self.root {
            tracing::warn!(
                target: targets::LIFECYCLE,
                ?parent,
                "top-level window created under a non-root parent"
            );
        }

        let mut data = WindowData::from_attributes(logical_parent, attributes);
        data.title = self.config.resolve_title(attributes.title()).to_string();
        data.imp.native_event_mask = EventMask::STRUCTURE | attributes.event_mask();

        let window = self.windows.insert(data);
        if let Some(parent_data) = self.windows.get_mut(logical_parent) {
            parent_data.children.insert(0, window);
        }

        if let Err(err) = self.create_native(window, parent, attributes) {
            self.windows.remove(window);
            if let Some(parent_data) = self.windows.get_mut(logical_parent) {
                parent_data.children.retain(|child| *child != window);
            }
            return Err(err);
        }

        self.process_notifications();
        Ok(window)
    }

    fn create_native(
        &mut self,
        window: WindowId,
        real_parent: WindowId,
        attributes: &WindowAttributes,
    ) -> Result<()> {
        let window_type = attributes.window_type();
        let class = self
            .classes
            .get_class(&self.api, window_type, attributes.type_hint())?;

        let under_root = real_parent == self.root;
        let under_foreign = self.window_type(real_parent) == Some(WindowType::Foreign);
        let real_parent_handle = self
            .native_handle(real_parent)
            .ok_or(BackendError::InvalidWindow)?;

        let (style, ex_style) = creation_styles(
            window_type,
            attributes.type_hint(),
            attributes.input_only(),
            under_root,
            under_foreign,
        );

        let (x, y) = attributes.position();
        let (width, height, title) = {
            let data = self.windows.get(window).ok_or(BackendError::InvalidWindow)?;
            for field in mismatched_fields(data, attributes) {
                tracing::warn!(
                    target: targets::LIFECYCLE,
                    ?window,
                    field,
                    "window record disagrees with the creation attributes"
                );
            }
            (data.width, data.height, data.title.clone())
        };

        // Non-child windows are created with a decorated size; `intended` is
        // where their top-left corner should end up in parent coordinates.
        let (params_rect, intended) = if window_type == WindowType::Child {
            (Rect::from_origin_size(x, y, width, height), None)
        } else {
            let client = Rect::from_origin_size(0, 0, width, height);
            let outer = log_failure(
                self.api.adjust_window_rect(client, style, ex_style),
                real_parent_handle,
            )
            .unwrap_or(client);
            let intended = if under_root {
                Point::new(x - self.offset.x, y - self.offset.y)
            } else {
                Point::new(x, y)
            };
            let origin = if window_type == WindowType::Toplevel && under_root {
                Point::new(CW_USEDEFAULT, CW_USEDEFAULT)
            } else {
                intended
            };
            (
                Rect::from_origin_size(origin.x, origin.y, outer.width(), outer.height()),
                Some(intended),
            )
        };

        let params = CreateParams {
            ex_style,
            class,
            title,
            style,
            x: params_rect.left,
            y: params_rect.top,
            width: params_rect.width(),
            height: params_rect.height(),
            parent: if under_root {
                None
            } else {
                Some(real_parent_handle)
            },
        };

        let outcome = self.api.create_window(&params).map_err(|err| {
            tracing::warn!(target: targets::LIFECYCLE, %err, "native window creation failed");
            BackendError::CreationFailed(err.to_string())
        })?;

        let handle = outcome.handle;
        if let Some(callback_handle) = outcome.callback_handle {
            if callback_handle != handle {
                tracing::warn!(
                    target: targets::LIFECYCLE,
                    returned = handle.0,
                    callback = callback_handle.0,
                    "creation callback saw a different handle"
                );
            }
        }

        // A stale entry means the OS reused the handle of a window whose
        // destruction has not been processed yet.
        if let Some(stale) = self.handles.lookup(handle) {
            tracing::warn!(
                target: targets::LIFECYCLE,
                handle = handle.0,
                ?stale,
                "native handle reused before destroy notification"
            );
            self.destroy_notify(stale);
        }
        self.handles.insert(handle, window);

        let mut initial = Point::new(0, 0);
        if let Some(intended) = intended {
            if let Some(rect) = log_failure(self.api.window_rect(handle), handle) {
                initial = rect.origin();
                let actual = if under_root {
                    Some(rect.origin())
                } else {
                    log_failure(self.api.screen_to_client(real_parent_handle, rect.origin()), handle)
                };
                if actual != Some(intended) {
                    log_failure(
                        self.api.set_window_pos(
                            handle,
                            ZOrder::Top,
                            intended.x,
                            intended.y,
                            0,
                            0,
                            SwpFlags::NOACTIVATE | SwpFlags::NOSIZE | SwpFlags::NOZORDER,
                        ),
                        handle,
                    );
                }
            }
        }

        let cursor = attributes.cursor().map(|raw| CursorHandle(raw.0));
        if let Some(data) = self.windows.get_mut(window) {
            data.imp.handle = Some(handle);
            data.imp.initial_x = initial.x;
            data.imp.initial_y = initial.y;
            data.imp.cursor = cursor;
        }
        if let Some(cursor) = cursor {
            log_failure(self.api.set_cursor(handle, cursor), handle);
        }

        tracing::debug!(
            target: targets::LIFECYCLE,
            ?window,
            handle = handle.0,
            %window_type,
            width,
            height,
            "created native window"
        );
        Ok(())
    }

    /// Wrap a native window created by someone else.
    ///
    /// Adopting the same handle twice returns the existing window.
    pub fn adopt_foreign(&mut self, handle: NativeHandle) -> Option<WindowId> {
        if let Some(existing) = self.handles.lookup(handle) {
            return Some(existing);
        }

        let desktop = self.api.desktop_window();
        let os_parent = self.api.get_parent(handle);
        let parent = os_parent
            .and_then(|parent| self.handles.lookup(parent))
            .filter(|parent| self.window_type(*parent) != Some(WindowType::Foreign))
            .unwrap_or(self.root);

        let client = log_failure(self.api.client_rect(handle), handle)?;
        let screen = log_failure(
            self.api.client_to_screen(handle, client.origin()),
            handle,
        )?;
        let position = match os_parent {
            Some(os_parent) if os_parent != desktop => {
                log_failure(self.api.screen_to_client(os_parent, screen), handle)?
            }
            _ => Point::new(screen.x + self.offset.x, screen.y + self.offset.y),
        };

        let mut data = WindowData::foreign(
            parent,
            handle,
            position.x,
            position.y,
            client.width(),
            client.height(),
        );
        data.event_mask = EventMask::from_bits(u32::MAX);
        if !self.api.is_window_visible(handle) {
            data.state.insert(WindowState::WITHDRAWN);
        }
        if self.api.get_ex_style(handle).contains(ExStyle::TOPMOST) {
            data.state.insert(WindowState::ABOVE);
        }

        let window = self.windows.insert(data);
        if let Some(parent_data) = self.windows.get_mut(parent) {
            parent_data.children.insert(0, window);
        }
        self.handles.insert(handle, window);

        tracing::debug!(
            target: targets::LIFECYCLE,
            ?window,
            handle = handle.0,
            "adopted foreign window"
        );
        Some(window)
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroy a window and its descendants.
    ///
    /// Foreign windows are not destroyed: they are hidden, detached to the
    /// desktop and asked to close, and the backend forgets them right away.
    pub fn destroy_window(&mut self, window: WindowId) {
        let Some(data) = self.windows.get(window) else {
            return;
        };
        if data.destroyed || data.window_type == WindowType::Root {
            return;
        }

        if data.window_type == WindowType::Foreign {
            if let Some(handle) = data.imp.handle {
                self.api.show_window(handle, ShowCommand::Hide);
                log_failure(self.api.set_parent(handle, None), handle);
                log_failure(self.api.post_close(handle), handle);
            }
            self.destroy(window, false, true);
            self.destroy_notify(window);
            return;
        }

        self.destroy(window, false, false);
        self.process_notifications();
    }

    /// Tear down a window and, recursively, its children.
    ///
    /// `recursing` is set for descendants, whose native windows go away with
    /// their ancestor. `foreign_destroy` is set when the native window is
    /// already gone (or not ours), so no OS destroy request is made.
    pub(crate) fn destroy(&mut self, window: WindowId, recursing: bool, foreign_destroy: bool) {
        let _span = tracing::debug_span!(span_names::DESTROY, ?window, recursing).entered();

        if self.modal.remove(window) {
            tracing::debug!(target: targets::MODAL, ?window, "removed destroyed window from modal stack");
        }
        self.detach_transients(window);

        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        if data.destroyed {
            return;
        }
        data.destroyed = true;
        data.state.insert(WindowState::WITHDRAWN);
        let handle = data.imp.handle;
        let children = data.children.clone();
        let parent = data.parent;

        if !recursing && !foreign_destroy {
            if let Some(handle) = handle {
                log_failure(self.api.destroy_window(handle), handle);
            }
        }

        for child in children {
            self.destroy(child, true, foreign_destroy);
        }

        if !recursing {
            if let Some(parent_data) = parent.and_then(|parent| self.windows.get_mut(parent)) {
                parent_data.children.retain(|child| *child != window);
            }
        }

        tracing::debug!(target: targets::LIFECYCLE, ?window, "window destroyed");
    }

    /// Sever the transient relation in both directions.
    fn detach_transients(&mut self, window: WindowId) {
        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let children = std::mem::take(&mut data.imp.transient_children);
        let owner = data.imp.transient_owner.take();

        for child in children {
            if let Some(child_data) = self.windows.get_mut(child) {
                child_data.imp.transient_owner = None;
            }
        }
        if let Some(owner_data) = owner.and_then(|owner| self.windows.get_mut(owner)) {
            owner_data.imp.transient_children.retain(|child| *child != window);
        }
    }

    /// The OS reports a native window gone.
    ///
    /// Windows the backend did not expect to lose are torn down first. This
    /// is the single place where a window leaves the handle table and the
    /// arena.
    pub(crate) fn destroy_notify(&mut self, window: WindowId) {
        let Some(data) = self.windows.get(window) else {
            return;
        };
        if !data.destroyed {
            if data.window_type != WindowType::Foreign {
                tracing::warn!(
                    target: targets::LIFECYCLE,
                    ?window,
                    handle = ?data.imp.handle.map(|h| h.0),
                    "window unexpectedly destroyed"
                );
            }
            self.destroy(window, false, true);
        }

        let Some(mut data) = self.windows.remove(window) else {
            return;
        };
        if let Some(handle) = data.imp.handle {
            if self.handles.lookup(handle) == Some(window) {
                self.handles.remove(handle);
            }
            data.imp.dc.release_all(&self.api, handle);
        }
        let big = data.imp.big_icon.take();
        let small = data.imp.small_icon.take().filter(|icon| Some(*icon) != big);
        for icon in [big, small].into_iter().flatten() {
            log_failure(self.api.destroy_icon(icon), self.api.desktop_window());
        }
        if let Some(parent_data) = data.parent.and_then(|parent| self.windows.get_mut(parent)) {
            parent_data.children.retain(|child| *child != window);
        }

        tracing::debug!(target: targets::LIFECYCLE, ?window, "window released");
        self.events.push(BackendEvent::Destroyed { window });
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Check if `ancestor` is `window` or one of its parents.
    fn is_ancestor_or_self(&self, ancestor: WindowId, window: WindowId) -> bool {
        let mut current = Some(window);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Move a window under a new parent at `(x, y)` in the parent's
    /// coordinates.
    ///
    /// Moving a top-level under another window demotes it to a child;
    /// moving it back to the root restores its type. Always returns `false`:
    /// the move never needs a follow-up from the caller.
    pub fn reparent(&mut self, window: WindowId, new_parent: WindowId, x: i32, y: i32) -> bool {
        if window == self.root {
            tracing::warn!(target: targets::LIFECYCLE, "the root window cannot be reparented");
            return false;
        }
        if !matches!(
            self.window_type(window),
            Some(WindowType::Toplevel | WindowType::Child | WindowType::Temp)
        ) {
            return false;
        }
        let Some(handle) = self.live(window) else {
            return false;
        };
        let Some(parent_data) = self.windows.get(new_parent) else {
            return false;
        };
        if parent_data.destroyed {
            return false;
        }
        if self.is_ancestor_or_self(window, new_parent) {
            tracing::warn!(
                target: targets::LIFECYCLE,
                ?window,
                ?new_parent,
                "cannot reparent a window under itself or its descendant"
            );
            return false;
        }
        let Some(parent_handle) = parent_data.imp.handle else {
            return false;
        };
        let to_root = new_parent == self.root;
        let was_toplevel = self.is_desktop_child(handle);

        let style = self.api.get_style(handle);
        if was_toplevel && !to_root {
            let stripped = WindowStyle::BORDER
                | WindowStyle::THICKFRAME
                | WindowStyle::CAPTION
                | WindowStyle::SYSMENU
                | WindowStyle::MINIMIZEBOX
                | WindowStyle::MAXIMIZEBOX
                | WindowStyle::POPUP;
            let new_style = (style & !stripped) | WindowStyle::CHILD;
            log_failure(self.api.set_style(handle, new_style), handle);
        } else if to_root {
            let new_style = (style & !WindowStyle::CHILD) | WindowStyle::OVERLAPPEDWINDOW;
            log_failure(self.api.set_style(handle, new_style), handle);
        }

        log_failure(
            self.api
                .set_parent(handle, if to_root { None } else { Some(parent_handle) }),
            handle,
        );

        let (width, height) = self
            .windows
            .get(window)
            .map(|data| (data.width, data.height))
            .unwrap_or((1, 1));
        let (move_x, move_y, move_width, move_height) = if to_root {
            let outer = crate::geometry::outer_rect(&self.api, handle, width, height)
                .unwrap_or(Rect::new(0, 0, width, height));
            (x - self.offset.x, y - self.offset.y, outer.width(), outer.height())
        } else {
            (x, y, width, height)
        };
        log_failure(
            self.api
                .move_window(handle, move_x, move_y, move_width, move_height, true),
            handle,
        );

        // Foreign parents hold the native window only.
        let logical_parent = if self.window_type(new_parent) == Some(WindowType::Foreign) {
            self.root
        } else {
            new_parent
        };
        let parent_type = self.window_type(logical_parent);

        let Some(data) = self.windows.get_mut(window) else {
            return false;
        };
        let old_type = data.window_type;
        match parent_type {
            Some(WindowType::Root) => {
                if let Some(restored) = data.imp.toplevel_window_type.take() {
                    data.window_type = restored;
                } else if data.window_type == WindowType::Child {
                    data.window_type = WindowType::Toplevel;
                }
            }
            Some(WindowType::Toplevel | WindowType::Child | WindowType::Temp) => {
                if data.window_type.is_toplevel() {
                    data.imp.toplevel_window_type = Some(data.window_type);
                    data.window_type = WindowType::Child;
                }
            }
            _ => {}
        }
        let new_type = data.window_type;
        let old_parent = data.parent.replace(logical_parent);

        if let Some(old_parent_data) = old_parent.and_then(|parent| self.windows.get_mut(parent)) {
            old_parent_data.children.retain(|child| *child != window);
        }
        if let Some(parent_data) = self.windows.get_mut(logical_parent) {
            parent_data.children.insert(0, window);
        }

        tracing::debug!(
            target: targets::LIFECYCLE,
            ?window,
            ?new_parent,
            %old_type,
            %new_type,
            "reparented window"
        );
        self.process_notifications();
        false
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Make `window` transient for `owner`, or clear the relation.
    ///
    /// Child windows cannot have an owner; the request is ignored for them.
    pub fn set_transient_for(&mut self, window: WindowId, owner: Option<WindowId>) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.window_type(window) == Some(WindowType::Child) {
            return;
        }
        let owner_handle = match owner {
            Some(owner) => match self.live(owner) {
                Some(owner_handle) if owner != window => Some(owner_handle),
                _ => {
                    tracing::warn!(
                        target: targets::LIFECYCLE,
                        ?window,
                        ?owner,
                        "ignoring transient owner that is not a live window"
                    );
                    return;
                }
            },
            None => None,
        };

        let previous = self.windows.get_mut(window).and_then(|data| data.imp.transient_owner.take());
        if let Some(previous_data) = previous.and_then(|previous| self.windows.get_mut(previous)) {
            previous_data.imp.transient_children.retain(|child| *child != window);
        }

        if let Some(owner) = owner {
            if let Some(owner_data) = self.windows.get_mut(owner) {
                owner_data.imp.transient_children.push(window);
            }
            if let Some(data) = self.windows.get_mut(window) {
                data.imp.transient_owner = Some(owner);
            }
        }

        if self.api.get_owner(handle) != owner_handle {
            log_failure(self.api.set_owner(handle, owner_handle), handle);
        }
    }

    /// Mark a window modal (pushing it onto the modal stack and raising it)
    /// or clear the mark.
    pub fn set_modal_hint(&mut self, window: WindowId, modal: bool) {
        if self.live(window).is_none() {
            return;
        }
        if modal {
            self.modal.push(window);
            tracing::debug!(target: targets::MODAL, ?window, depth = self.modal.len(), "modal window pushed");
            self.raise(window);
        } else if self.modal.remove(window) {
            tracing::debug!(target: targets::MODAL, ?window, depth = self.modal.len(), "modal window removed");
        }
    }
}
