//! Visibility, window state, placement and appearance.
//!
//! Unmapped windows only record state changes; they are applied when the
//! window is next shown. Mapped windows ask the OS and learn the outcome
//! from the notifications it queues, which every operation here drains
//! before returning.

use casement_core::logging::targets;
use casement_core::{
    BackendEvent, Decorations, Functions, GeometryHints, HintFlags, Point, Rect, TypeHint,
    WindowId, WindowState, WindowType,
};

use crate::api::{
    CursorHandle, ExStyle, IconHandle, NativeHandle, ShowCommand, SwpFlags, Win32Api, WindowStyle,
    ZOrder, log_failure,
};
use crate::backend::Win32Backend;
use crate::geometry::{adjust_for_gravity, client_to_window_rect, outer_rect};
use crate::window::FullscreenSnapshot;

/// Style bits that mirror the window's OS state rather than its appearance.
const STATE_STYLE_BITS: WindowStyle = WindowStyle::from_bits(
    WindowStyle::VISIBLE.bits() | WindowStyle::MINIMIZE.bits() | WindowStyle::MAXIMIZE.bits(),
);

const ZORDER_ONLY: SwpFlags = SwpFlags::from_bits(
    SwpFlags::NOMOVE.bits() | SwpFlags::NOSIZE.bits() | SwpFlags::NOACTIVATE.bits(),
);

impl<A: Win32Api> Win32Backend<A> {
    // =========================================================================
    // Visibility
    // =========================================================================

    /// Map a window.
    pub fn show(&mut self, window: WindowId, already_mapped: bool) {
        self.show_internal(window, already_mapped, false);
        self.process_notifications();
    }

    fn show_internal(&mut self, window: WindowId, already_mapped: bool, deiconify: bool) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if !already_mapped {
            self.synthesize_state(window, WindowState::WITHDRAWN, WindowState::empty());
        }
        let Some(data) = self.windows.get(window) else {
            return;
        };
        let state = data.state;

        tracing::debug!(
            target: targets::STATE,
            ?window,
            already_mapped,
            deiconify,
            state = state.bits(),
            "show"
        );

        // Showing a withdrawn, iconified window maps it minimized.
        if !deiconify && !already_mapped && state.is_iconified() {
            self.api.show_window(handle, ShowCommand::ShowMinNoActive);
            return;
        }
        if !deiconify && state.is_iconified() {
            return;
        }
        if deiconify && !state.is_iconified() {
            return;
        }
        if !deiconify && !already_mapped && self.api.is_window_visible(handle) {
            return;
        }

        let focus_on_map = !already_mapped && data.focus_on_map;
        let window_type = data.window_type;
        let ex_style = self.api.get_ex_style(handle);

        if ex_style.contains(ExStyle::TRANSPARENT) {
            let mut flags = SwpFlags::SHOWWINDOW
                | SwpFlags::NOREDRAW
                | SwpFlags::NOMOVE
                | SwpFlags::NOSIZE
                | SwpFlags::NOZORDER;
            if window_type == WindowType::Temp || !focus_on_map {
                flags |= SwpFlags::NOACTIVATE;
            }
            log_failure(
                self.api.set_window_pos(handle, ZOrder::Top, 0, 0, 0, 0, flags),
                handle,
            );
            return;
        }

        if !already_mapped && window_type == WindowType::Toplevel {
            self.place_on_first_map(window, handle);
        }

        let visible = self.api.is_window_visible(handle);
        if state.is_fullscreen() {
            self.apply_fullscreen_geometry(handle);
        } else if state.is_maximized() {
            self.api.show_window(handle, ShowCommand::MAXIMIZE);
        } else if state.is_iconified() {
            let command = if focus_on_map {
                ShowCommand::Restore
            } else {
                ShowCommand::ShowNoActivate
            };
            self.api.show_window(handle, command);
        } else if window_type == WindowType::Temp || !focus_on_map {
            let command = if visible {
                ShowCommand::ShowNa
            } else {
                ShowCommand::ShowNoActivate
            };
            self.api.show_window(handle, command);
        } else {
            let command = if visible {
                ShowCommand::Show
            } else {
                ShowCommand::ShowNormal
            };
            self.api.show_window(handle, command);
        }

        let topmost = ex_style.contains(ExStyle::TOPMOST);
        if window_type != WindowType::Temp && state.is_above() != topmost {
            let insert_after = if state.is_above() {
                ZOrder::Topmost
            } else {
                ZOrder::NoTopmost
            };
            log_failure(
                self.api
                    .set_window_pos(handle, insert_after, 0, 0, 0, 0, ZORDER_ONLY),
                handle,
            );
        }
    }

    /// Initial placement of a top-level window, emulating what a window
    /// manager would do, then keep it inside the monitor's work area.
    fn place_on_first_map(&self, window: WindowId, handle: NativeHandle) {
        let Some(data) = self.windows.get(window) else {
            return;
        };
        if data.imp.override_redirect {
            return;
        }

        if !data
            .imp
            .hint_flags
            .intersects(HintFlags::POS | HintFlags::USER_POS)
        {
            let mut target = Point::new(data.imp.initial_x, data.imp.initial_y);
            let center_on = if data.imp.type_hint == TypeHint::Splashscreen {
                Some(self.monitor_rect(handle))
            } else {
                data.imp
                    .transient_owner
                    .filter(|owner| self.is_mapped(*owner))
                    .and_then(|owner| self.decorated_rect(owner))
            };

            if let Some(bounds) = center_on {
                let client = Rect::new(0, 0, data.width, data.height);
                let outer = outer_rect(&self.api, handle, data.width, data.height).unwrap_or(client);
                target = bounds.centered_origin(outer.width(), outer.height());
            }

            log_failure(
                self.api.set_window_pos(
                    handle,
                    ZOrder::Top,
                    target.x,
                    target.y,
                    0,
                    0,
                    SwpFlags::NOACTIVATE | SwpFlags::NOSIZE | SwpFlags::NOZORDER,
                ),
                handle,
            );
        }

        let Some(rect) = log_failure(self.api.window_rect(handle), handle) else {
            return;
        };
        let Some(monitor) = log_failure(self.api.monitor_info(handle), handle) else {
            return;
        };
        let clamped = rect.shifted_inside(&monitor.work);
        if clamped.origin() != rect.origin() {
            log_failure(
                self.api.set_window_pos(
                    handle,
                    ZOrder::Top,
                    clamped.left,
                    clamped.top,
                    0,
                    0,
                    SwpFlags::NOACTIVATE | SwpFlags::NOSIZE | SwpFlags::NOZORDER,
                ),
                handle,
            );
        }
    }

    /// The decorated rectangle of a window, in screen coordinates, from its
    /// cached geometry.
    fn decorated_rect(&self, window: WindowId) -> Option<Rect> {
        let data = self.windows.get(window)?;
        let handle = data.live_handle()?;
        let client = Rect::from_origin_size(
            data.x - self.offset.x,
            data.y - self.offset.y,
            data.width,
            data.height,
        );
        Some(client_to_window_rect(&self.api, handle, client).unwrap_or(client))
    }

    /// The monitor nearest to a window, or the primary screen.
    fn monitor_rect(&self, handle: NativeHandle) -> Rect {
        match log_failure(self.api.monitor_info(handle), handle) {
            Some(info) => info.monitor,
            None => {
                let (width, height) = self.api.primary_screen_size();
                Rect::new(0, 0, width, height)
            }
        }
    }

    /// Unmap a window.
    pub fn hide(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.is_mapped(window) {
            self.synthesize_state(window, WindowState::empty(), WindowState::WITHDRAWN);
        }

        tracing::debug!(target: targets::STATE, ?window, "hide");
        self.api.validate(handle);

        if self.window_type(window) == Some(WindowType::Toplevel) {
            log_failure(self.api.show_owned_popups(handle, false), handle);
        }

        if self.api.get_ex_style(handle).contains(ExStyle::TRANSPARENT) {
            log_failure(
                self.api.set_window_pos(
                    handle,
                    ZOrder::Bottom,
                    0,
                    0,
                    0,
                    0,
                    SwpFlags::HIDEWINDOW
                        | SwpFlags::NOREDRAW
                        | SwpFlags::NOZORDER
                        | SwpFlags::NOMOVE
                        | SwpFlags::NOSIZE,
                ),
                handle,
            );
        } else {
            self.api.show_window(handle, ShowCommand::Hide);
        }
        self.process_notifications();
    }

    /// Unmap a top-level window. Same as [`hide`](Self::hide).
    pub fn withdraw(&mut self, window: WindowId) {
        self.hide(window);
    }

    // =========================================================================
    // Minimize / maximize
    // =========================================================================

    /// Minimize a window without stealing activation from whichever window
    /// had it.
    pub fn iconify(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.is_mapped(window) {
            let previous = self.api.active_window();
            self.api.show_window(handle, ShowCommand::Minimize);
            if let Some(previous) = previous.filter(|previous| *previous != handle) {
                log_failure(self.api.set_active_window(previous), previous);
            }
        } else {
            self.synthesize_state(window, WindowState::empty(), WindowState::ICONIFIED);
        }
        self.process_notifications();
    }

    pub fn deiconify(&mut self, window: WindowId) {
        if self.live(window).is_none() {
            return;
        }
        if self.is_mapped(window) {
            self.show_internal(window, true, true);
        } else {
            self.synthesize_state(window, WindowState::ICONIFIED, WindowState::empty());
        }
        self.process_notifications();
    }

    pub fn maximize(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.is_mapped(window) {
            self.api.show_window(handle, ShowCommand::MAXIMIZE);
        } else {
            self.synthesize_state(window, WindowState::empty(), WindowState::MAXIMIZED);
        }
        self.process_notifications();
    }

    pub fn unmaximize(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.is_mapped(window) {
            self.api.show_window(handle, ShowCommand::Restore);
        } else {
            self.synthesize_state(window, WindowState::MAXIMIZED, WindowState::empty());
        }
        self.process_notifications();
    }

    // =========================================================================
    // Fullscreen
    // =========================================================================

    /// Cover the window's monitor with its client area.
    ///
    /// The current rectangle, style and hint flags are saved and restored by
    /// [`unfullscreen`](Self::unfullscreen). An unmapped window only records
    /// the change; its first show applies the fullscreen geometry.
    pub fn fullscreen(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.windows.get(window).is_none_or(|data| data.state.is_fullscreen()) {
            return;
        }
        let Some(rect) = log_failure(self.api.window_rect(handle), handle) else {
            return;
        };
        let style = self.api.get_style(handle);

        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let hint_flags = data.imp.hint_flags;
        data.imp.hint_flags.remove(HintFlags::MAX_SIZE);
        data.imp.fullscreen = Some(FullscreenSnapshot {
            rect,
            style,
            hint_flags,
        });
        let mapped = data.is_mapped();

        tracing::debug!(target: targets::STATE, ?window, ?rect, "enter fullscreen");
        self.synthesize_state(window, WindowState::empty(), WindowState::FULLSCREEN);
        if mapped {
            self.apply_fullscreen_geometry(handle);
        }
        self.process_notifications();
    }

    fn apply_fullscreen_geometry(&self, handle: NativeHandle) {
        let monitor = self.monitor_rect(handle);
        let style = self.api.get_style(handle);
        log_failure(
            self.api.set_style(
                handle,
                (style & !WindowStyle::OVERLAPPEDWINDOW) | WindowStyle::POPUP,
            ),
            handle,
        );
        log_failure(
            self.api.set_window_pos(
                handle,
                ZOrder::Topmost,
                monitor.left,
                monitor.top,
                monitor.width(),
                monitor.height(),
                SwpFlags::NOCOPYBITS | SwpFlags::SHOWWINDOW,
            ),
            handle,
        );
    }

    /// Leave fullscreen, restoring the saved rectangle, style and hint flags.
    pub fn unfullscreen(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let Some(snapshot) = data.imp.fullscreen.take() else {
            return;
        };
        data.imp.hint_flags = snapshot.hint_flags;
        let mapped = data.is_mapped();

        tracing::debug!(target: targets::STATE, ?window, rect = ?snapshot.rect, "leave fullscreen");
        self.synthesize_state(window, WindowState::FULLSCREEN, WindowState::empty());

        let current = self.api.get_style(handle);
        let style = (snapshot.style & !STATE_STYLE_BITS) | (current & STATE_STYLE_BITS);
        log_failure(self.api.set_style(handle, style), handle);

        let show = if mapped {
            SwpFlags::SHOWWINDOW
        } else {
            SwpFlags::NOACTIVATE
        };
        let rect = snapshot.rect;
        log_failure(
            self.api.set_window_pos(
                handle,
                ZOrder::NoTopmost,
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SwpFlags::NOCOPYBITS | show,
            ),
            handle,
        );

        self.update_style_bits(window);
        self.process_notifications();
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Move a window to `(x, y)`: root coordinates for top-levels, parent
    /// client coordinates for children.
    pub fn move_to(&mut self, window: WindowId, x: i32, y: i32) {
        let Some((handle, width, height)) = self.placeable(window) else {
            return;
        };
        if !self.is_desktop_child(handle) {
            self.move_resize_child(window, handle, x, y, width, height);
        } else {
            let (x, y) = self.gravity_position(window, handle, width, height, x, y).0;
            log_failure(
                self.api.set_window_pos(
                    handle,
                    ZOrder::Top,
                    x - self.offset.x,
                    y - self.offset.y,
                    0,
                    0,
                    SwpFlags::NOACTIVATE | SwpFlags::NOSIZE | SwpFlags::NOZORDER,
                ),
                handle,
            );
        }
        self.process_notifications();
    }

    /// Resize a window's client area. Sizes below 1 are clamped to 1.
    pub fn resize(&mut self, window: WindowId, width: i32, height: i32) {
        let Some((handle, _, _)) = self.placeable(window) else {
            return;
        };
        let (width, height) = (width.max(1), height.max(1));
        if !self.is_desktop_child(handle) {
            let (x, y) = self.geometry(window).map(|(x, y, _, _)| (x, y)).unwrap_or((0, 0));
            self.move_resize_child(window, handle, x, y, width, height);
        } else {
            let client = Rect::new(0, 0, width, height);
            let outer = outer_rect(&self.api, handle, width, height).unwrap_or(client);
            log_failure(
                self.api.set_window_pos(
                    handle,
                    ZOrder::Top,
                    0,
                    0,
                    outer.width(),
                    outer.height(),
                    SwpFlags::NOACTIVATE | SwpFlags::NOMOVE | SwpFlags::NOZORDER,
                ),
                handle,
            );
        }
        self.process_notifications();
    }

    /// Move and resize a window in one step.
    pub fn move_resize(&mut self, window: WindowId, x: i32, y: i32, width: i32, height: i32) {
        let Some((handle, _, _)) = self.placeable(window) else {
            return;
        };
        let (width, height) = (width.max(1), height.max(1));
        if !self.is_desktop_child(handle) {
            self.move_resize_child(window, handle, x, y, width, height);
        } else {
            let ((x, y), outer) = self.gravity_position(window, handle, width, height, x, y);
            log_failure(
                self.api.set_window_pos(
                    handle,
                    ZOrder::Top,
                    x - self.offset.x,
                    y - self.offset.y,
                    outer.width(),
                    outer.height(),
                    SwpFlags::NOACTIVATE | SwpFlags::NOZORDER,
                ),
                handle,
            );
        }
        self.process_notifications();
    }

    /// Handle and client size of a window that may be moved: live and not
    /// fullscreen.
    fn placeable(&self, window: WindowId) -> Option<(NativeHandle, i32, i32)> {
        let data = self.windows.get(window)?;
        let handle = data.live_handle()?;
        if data.state.is_fullscreen() {
            return None;
        }
        Some((handle, data.width, data.height))
    }

    /// The gravity-adjusted position of a top-level window and its outer
    /// rectangle.
    fn gravity_position(
        &self,
        window: WindowId,
        handle: NativeHandle,
        width: i32,
        height: i32,
        x: i32,
        y: i32,
    ) -> ((i32, i32), Rect) {
        let client = Rect::new(0, 0, width, height);
        let outer = outer_rect(&self.api, handle, width, height).unwrap_or(client);
        let position = match self.windows.get(window) {
            Some(data) => adjust_for_gravity(
                outer,
                data.imp.hint_flags,
                &data.imp.hints,
                width,
                height,
                x,
                y,
            ),
            None => (x, y),
        };
        (position, outer)
    }

    /// Place a window that lives inside another window's client area.
    fn move_resize_child(
        &mut self,
        window: WindowId,
        handle: NativeHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let resized = data.width != width || data.height != height;
        data.x = x;
        data.y = y;
        data.width = width;
        data.height = height;
        if resized {
            self.events.push(BackendEvent::SurfaceInvalidated { window });
        }

        tracing::trace!(target: targets::STATE, ?window, x, y, width, height, "move child");
        log_failure(
            self.api.set_window_pos(
                handle,
                ZOrder::Top,
                x,
                y,
                width,
                height,
                SwpFlags::NOACTIVATE | SwpFlags::NOZORDER,
            ),
            handle,
        );
    }

    // =========================================================================
    // Stacking and focus
    // =========================================================================

    /// Bring a window to the top of the stacking order.
    pub fn raise(&mut self, window: WindowId) {
        let Some(data) = self.windows.get(window) else {
            return;
        };
        let Some(handle) = data.live_handle() else {
            return;
        };

        if data.window_type == WindowType::Temp {
            log_failure(
                self.api
                    .set_window_pos(handle, ZOrder::Topmost, 0, 0, 0, 0, ZORDER_ONLY),
                handle,
            );
        } else if data.accept_focus {
            // Focus-stealing prevention refuses this routinely.
            if !self.api.set_foreground_window(handle) {
                tracing::trace!(target: targets::STATE, ?window, "foreground request refused");
                log_failure(
                    self.api
                        .set_window_pos(handle, ZOrder::Top, 0, 0, 0, 0, ZORDER_ONLY),
                    handle,
                );
            }
        } else {
            log_failure(
                self.api
                    .set_window_pos(handle, ZOrder::Top, 0, 0, 0, 0, ZORDER_ONLY),
                handle,
            );
        }
    }

    /// Send a window to the bottom of the stacking order.
    pub fn lower(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        log_failure(
            self.api
                .set_window_pos(handle, ZOrder::Bottom, 0, 0, 0, 0, ZORDER_ONLY),
            handle,
        );
    }

    /// Show a window as its state requires and give it keyboard focus.
    pub fn focus(&mut self, window: WindowId) {
        let Some(handle) = self.live(window) else {
            return;
        };
        let state = self.windows.get(window).map(|data| data.state).unwrap_or_default();

        let command = if state.is_maximized() {
            ShowCommand::ShowMaximized
        } else if state.is_iconified() {
            ShowCommand::Restore
        } else if !self.api.is_window_visible(handle) {
            ShowCommand::ShowNormal
        } else {
            ShowCommand::Show
        };
        self.api.show_window(handle, command);
        log_failure(self.api.set_focus(handle), handle);
        self.process_notifications();
    }

    /// Keep a window above all non-topmost windows.
    pub fn set_keep_above(&mut self, window: WindowId, setting: bool) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.is_mapped(window) {
            let insert_after = if setting {
                ZOrder::Topmost
            } else {
                ZOrder::NoTopmost
            };
            log_failure(
                self.api
                    .set_window_pos(handle, insert_after, 0, 0, 0, 0, ZORDER_ONLY),
                handle,
            );
        }
        if setting {
            self.synthesize_state(window, WindowState::BELOW, WindowState::ABOVE);
        } else {
            self.synthesize_state(window, WindowState::ABOVE, WindowState::empty());
        }
    }

    /// Keep a window below all other windows.
    pub fn set_keep_below(&mut self, window: WindowId, setting: bool) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if self.is_mapped(window) {
            let insert_after = if setting {
                ZOrder::Bottom
            } else {
                ZOrder::NoTopmost
            };
            log_failure(
                self.api
                    .set_window_pos(handle, insert_after, 0, 0, 0, 0, ZORDER_ONLY),
                handle,
            );
        }
        if setting {
            self.synthesize_state(window, WindowState::ABOVE, WindowState::BELOW);
        } else {
            self.synthesize_state(window, WindowState::BELOW, WindowState::empty());
        }
    }

    // =========================================================================
    // Policy inputs
    // =========================================================================

    pub fn set_title(&mut self, window: WindowId, title: &str) {
        let Some(handle) = self.live(window) else {
            return;
        };
        let title = self.config.resolve_title(Some(title)).to_string();
        log_failure(self.api.set_window_text(handle, &title), handle);
        if let Some(data) = self.windows.get_mut(window) {
            data.title = title;
        }
    }

    /// Store size and placement hints and re-derive the decorations.
    pub fn set_geometry_hints(&mut self, window: WindowId, hints: &GeometryHints, flags: HintFlags) {
        if self.is_destroyed(window) {
            return;
        }
        if let Some(data) = self.windows.get_mut(window) {
            data.imp.hints = *hints;
            data.imp.hint_flags = flags;
        }
        self.update_style_bits(window);
        self.process_notifications();
    }

    pub fn set_type_hint(&mut self, window: WindowId, type_hint: TypeHint) {
        if self.is_destroyed(window) {
            return;
        }
        if let Some(data) = self.windows.get_mut(window) {
            data.imp.type_hint = type_hint;
        }
        self.update_style_bits(window);
        self.process_notifications();
    }

    pub fn set_decorations(&mut self, window: WindowId, decorations: Decorations) {
        if self.is_destroyed(window) {
            return;
        }
        if let Some(data) = self.windows.get_mut(window) {
            data.imp.decorations = Some(decorations);
        }
        self.update_style_bits(window);
        self.process_notifications();
    }

    pub fn set_functions(&mut self, window: WindowId, functions: Functions) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if let Some(data) = self.windows.get_mut(window) {
            data.imp.functions = Some(functions);
        }
        crate::decoration::update_system_menu(&self.api, handle, functions);
    }

    // =========================================================================
    // Appearance
    // =========================================================================

    /// Set the window's cursor. The cursor stays owned by the caller.
    pub fn set_cursor(&mut self, window: WindowId, cursor: Option<CursorHandle>) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if let Some(data) = self.windows.get_mut(window) {
            data.imp.cursor = cursor;
        }
        if let Some(cursor) = cursor {
            log_failure(self.api.set_cursor(handle, cursor), handle);
        }
    }

    /// Give the window new icons. The window takes ownership and destroys
    /// the icons it held before.
    pub fn set_icons(&mut self, window: WindowId, big: Option<IconHandle>, small: Option<IconHandle>) {
        let Some(handle) = self.live(window) else {
            return;
        };
        self.api.set_icons(handle, big, small);

        let Some(data) = self.windows.get_mut(window) else {
            return;
        };
        let old_big = std::mem::replace(&mut data.imp.big_icon, big);
        let old_small = std::mem::replace(&mut data.imp.small_icon, small)
            .filter(|icon| Some(*icon) != old_big);
        for icon in [old_big, old_small].into_iter().flatten() {
            if Some(icon) != big && Some(icon) != small {
                log_failure(self.api.destroy_icon(icon), handle);
            }
        }
    }

    /// Make a top-level window translucent. `opacity` is clamped to `0..=1`.
    pub fn set_opacity(&mut self, window: WindowId, opacity: f64) {
        let Some(handle) = self.live(window) else {
            return;
        };
        if !self.windows.get(window).is_some_and(|data| data.is_toplevel()) {
            tracing::warn!(target: targets::STATE, ?window, "opacity set on a non-toplevel window");
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);

        let ex_style = self.api.get_ex_style(handle);
        if !ex_style.contains(ExStyle::LAYERED) {
            log_failure(self.api.set_ex_style(handle, ex_style | ExStyle::LAYERED), handle);
        }
        log_failure(self.api.set_layered_alpha(handle, (opacity * 255.0) as u8), handle);

        if let Some(data) = self.windows.get_mut(window) {
            data.imp.opacity = opacity;
        }
    }
}
