//! In-memory windowing system for tests.
//!
//! [`MockWin32`] implements [`Win32Api`] over a small simulation of the OS
//! window tree: styles, frame sizes, parent/owner links, visibility, the
//! minimized/maximized flags, monitors and device contexts. Every call that
//! changes OS state is recorded as an [`OsCall`], so tests can assert on
//! exactly what the backend asked for (or that it asked for nothing).
//!
//! Frames follow a fixed metric: 8px for `WS_THICKFRAME`, 1px for a plain
//! border, and 23px for a caption.
//!
//! # Example
//!
//! ```
//! use casement_core::{NativeWindowBackend, WindowAttributes, WindowType};
//! use casement_win32::Win32Backend;
//! use casement_win32::testing::{MockWin32, OsCall};
//!
//! let api = MockWin32::new();
//! let mut backend = Win32Backend::new(api.clone()).unwrap();
//! let root = backend.root_window();
//! let window = backend
//!     .create_window(root, &WindowAttributes::new(WindowType::Toplevel).with_size(300, 200))
//!     .unwrap();
//!
//! assert_eq!(api.count_calls(|call| matches!(call, OsCall::CreateWindow(_))), 1);
//! assert!(backend.native_handle(window).is_some());
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use casement_core::{Point, Rect};
use parking_lot::Mutex;

use crate::api::{
    BitmapHandle, CW_USEDEFAULT, ClassAtom, ClassSpec, ClassStyle, CreateOutcome, CreateParams,
    CursorHandle, DcHandle, ExStyle, IconHandle, MonitorInfo, NativeHandle, Notification, OsError,
    OsResult, ShowCommand, SwpFlags, SysCommand, Win32Api, WindowStyle, ZOrder,
};

/// The desktop window of the simulation.
pub const DESKTOP: NativeHandle = NativeHandle(0x10010);

/// `ERROR_INVALID_WINDOW_HANDLE`.
const ERROR_INVALID_WINDOW_HANDLE: u32 = 1400;
/// Error code reported by injected failures.
const ERROR_ACCESS_DENIED: u32 = 5;

const THICK_FRAME: i32 = 8;
const THIN_FRAME: i32 = 1;
const CAPTION_HEIGHT: i32 = 23;

/// A state-changing OS call made through the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsCall {
    RegisterClass {
        name: &'static str,
        style: ClassStyle,
    },
    CopyIcon(IconHandle),
    DestroyIcon(IconHandle),
    CreateWindow(CreateParams),
    DestroyWindow(NativeHandle),
    PostClose(NativeHandle),
    SetParent {
        handle: NativeHandle,
        parent: Option<NativeHandle>,
    },
    SetOwner {
        handle: NativeHandle,
        owner: Option<NativeHandle>,
    },
    SetStyle {
        handle: NativeHandle,
        style: WindowStyle,
    },
    SetExStyle {
        handle: NativeHandle,
        ex_style: ExStyle,
    },
    SetWindowPos {
        handle: NativeHandle,
        insert_after: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: SwpFlags,
    },
    MoveWindow {
        handle: NativeHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ShowWindow {
        handle: NativeHandle,
        command: ShowCommand,
    },
    ShowOwnedPopups {
        handle: NativeHandle,
        show: bool,
    },
    SetActiveWindow(NativeHandle),
    SetForegroundWindow(NativeHandle),
    SetFocus(NativeHandle),
    Validate(NativeHandle),
    SetWindowText {
        handle: NativeHandle,
        text: String,
    },
    SetCursor {
        handle: NativeHandle,
        cursor: CursorHandle,
    },
    SetIcons {
        handle: NativeHandle,
        big: Option<IconHandle>,
        small: Option<IconHandle>,
    },
    EnableSystemMenuItem {
        handle: NativeHandle,
        command: SysCommand,
        enabled: bool,
    },
    SetLayeredAlpha {
        handle: NativeHandle,
        alpha: u8,
    },
    GetDc(NativeHandle),
    ReleaseDc {
        handle: NativeHandle,
        dc: DcHandle,
    },
    SelectBitmap {
        dc: DcHandle,
        bitmap: BitmapHandle,
    },
}

impl OsCall {
    /// The window the call targeted, if it targeted one.
    pub fn handle(&self) -> Option<NativeHandle> {
        match self {
            OsCall::DestroyWindow(handle)
            | OsCall::PostClose(handle)
            | OsCall::SetActiveWindow(handle)
            | OsCall::SetForegroundWindow(handle)
            | OsCall::SetFocus(handle)
            | OsCall::Validate(handle)
            | OsCall::GetDc(handle) => Some(*handle),
            OsCall::SetParent { handle, .. }
            | OsCall::SetOwner { handle, .. }
            | OsCall::SetStyle { handle, .. }
            | OsCall::SetExStyle { handle, .. }
            | OsCall::SetWindowPos { handle, .. }
            | OsCall::MoveWindow { handle, .. }
            | OsCall::ShowWindow { handle, .. }
            | OsCall::ShowOwnedPopups { handle, .. }
            | OsCall::SetWindowText { handle, .. }
            | OsCall::SetCursor { handle, .. }
            | OsCall::SetIcons { handle, .. }
            | OsCall::EnableSystemMenuItem { handle, .. }
            | OsCall::SetLayeredAlpha { handle, .. }
            | OsCall::ReleaseDc { handle, .. } => Some(*handle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct MockWindow {
    parent: NativeHandle,
    owner: Option<NativeHandle>,
    /// Style without the VISIBLE/MINIMIZE/MAXIMIZE state bits.
    style: WindowStyle,
    ex_style: ExStyle,
    /// Window rectangle relative to the parent's client origin.
    rect: Rect,
    /// Rectangle to go back to when a maximized window is restored.
    restore_rect: Rect,
    visible: bool,
    iconic: bool,
    zoomed: bool,
    title: String,
    cursor: Option<CursorHandle>,
    icons: (Option<IconHandle>, Option<IconHandle>),
    disabled_menu_items: HashSet<SysCommand>,
    alpha: Option<u8>,
}

impl MockWindow {
    fn new(parent: NativeHandle, style: WindowStyle, ex_style: ExStyle, rect: Rect) -> Self {
        Self {
            parent,
            owner: None,
            style: style & !(WindowStyle::VISIBLE | WindowStyle::MINIMIZE | WindowStyle::MAXIMIZE),
            ex_style,
            rect,
            restore_rect: rect,
            visible: style.contains(WindowStyle::VISIBLE),
            iconic: false,
            zoomed: false,
            title: String::new(),
            cursor: None,
            icons: (None, None),
            disabled_menu_items: HashSet::new(),
            alpha: None,
        }
    }

    fn full_style(&self) -> WindowStyle {
        let mut style = self.style;
        style.set(WindowStyle::VISIBLE, self.visible);
        style.set(WindowStyle::MINIMIZE, self.iconic);
        style.set(WindowStyle::MAXIMIZE, self.zoomed);
        style
    }
}

#[derive(Debug)]
struct MockState {
    next_handle: usize,
    windows: HashMap<NativeHandle, MockWindow>,
    calls: Vec<OsCall>,
    notifications: Vec<Notification>,
    monitors: Vec<MonitorInfo>,
    default_position: Point,
    failures: Vec<&'static str>,
    drop_shadow: bool,
    executable_icons: (Option<IconHandle>, Option<IconHandle>),
    classes: Vec<ClassSpec>,
    active: Option<NativeHandle>,
    focus: Option<NativeHandle>,
    foreground_allowed: bool,
    callback_handle: Option<NativeHandle>,
    dc_bitmaps: HashMap<DcHandle, BitmapHandle>,
}

impl MockState {
    fn new() -> Self {
        Self {
            next_handle: 0x1000,
            windows: HashMap::new(),
            calls: Vec::new(),
            notifications: Vec::new(),
            monitors: vec![MonitorInfo {
                monitor: Rect::new(0, 0, 1920, 1080),
                work: Rect::new(0, 0, 1920, 1040),
            }],
            default_position: Point::new(26, 26),
            failures: Vec::new(),
            drop_shadow: true,
            executable_icons: (Some(IconHandle(0x40)), Some(IconHandle(0x41))),
            classes: Vec::new(),
            active: None,
            focus: None,
            foreground_allowed: true,
            callback_handle: None,
            dc_bitmaps: HashMap::new(),
        }
    }

    fn alloc(&mut self) -> usize {
        let value = self.next_handle;
        self.next_handle += 4;
        value
    }

    fn check(&mut self, function: &'static str) -> OsResult<()> {
        if let Some(pos) = self.failures.iter().position(|f| *f == function) {
            self.failures.remove(pos);
            return Err(OsError::new(function, ERROR_ACCESS_DENIED));
        }
        Ok(())
    }

    fn window(&self, function: &'static str, handle: NativeHandle) -> OsResult<&MockWindow> {
        self.windows
            .get(&handle)
            .ok_or(OsError::new(function, ERROR_INVALID_WINDOW_HANDLE))
    }

    fn window_mut(&mut self, function: &'static str, handle: NativeHandle) -> OsResult<&mut MockWindow> {
        self.windows
            .get_mut(&handle)
            .ok_or(OsError::new(function, ERROR_INVALID_WINDOW_HANDLE))
    }

    fn insert_window(&mut self, window: MockWindow) -> NativeHandle {
        let handle = NativeHandle(self.alloc());
        self.windows.insert(handle, window);
        handle
    }

    /// Screen position of a window's client origin.
    fn client_origin(&self, handle: NativeHandle) -> Point {
        match self.windows.get(&handle) {
            Some(window) => {
                let rect = self.screen_rect(handle);
                let (left, top, _, _) = frame(window.style, window.ex_style);
                Point::new(rect.left + left, rect.top + top)
            }
            None => Point::new(0, 0),
        }
    }

    /// Window rectangle in screen coordinates.
    fn screen_rect(&self, handle: NativeHandle) -> Rect {
        match self.windows.get(&handle) {
            Some(window) => {
                let origin = self.client_origin(window.parent);
                window.rect.offset(origin.x, origin.y)
            }
            None => self.monitors.first().map(|m| m.monitor).unwrap_or_default(),
        }
    }

    fn visible(&self, handle: NativeHandle) -> bool {
        match self.windows.get(&handle) {
            Some(window) => window.visible && self.visible(window.parent),
            None => handle == DESKTOP,
        }
    }

    /// Remove a window and its descendants, queueing `Destroyed` for each,
    /// parent first.
    fn remove_tree(&mut self, handle: NativeHandle) {
        let mut order = vec![handle];
        let mut index = 0;
        while index < order.len() {
            let current = order[index];
            let mut children: Vec<NativeHandle> = self
                .windows
                .iter()
                .filter(|(_, w)| w.parent == current)
                .map(|(h, _)| *h)
                .collect();
            children.sort_by_key(|h| h.0);
            order.extend(children);
            index += 1;
        }

        for handle in order {
            if self.windows.remove(&handle).is_some() {
                if self.active == Some(handle) {
                    self.active = None;
                }
                if self.focus == Some(handle) {
                    self.focus = None;
                }
                self.notifications.push(Notification::Destroyed(handle));
            }
        }
    }

    fn monitor_for(&self, rect: Rect) -> MonitorInfo {
        let center = Point::new(rect.left + rect.width() / 2, rect.top + rect.height() / 2);
        self.monitors
            .iter()
            .find(|m| m.monitor.contains(center.x, center.y))
            .or_else(|| self.monitors.first())
            .copied()
            .unwrap_or(MonitorInfo {
                monitor: Rect::new(0, 0, 1920, 1080),
                work: Rect::new(0, 0, 1920, 1040),
            })
    }

    fn set_rect(&mut self, handle: NativeHandle, rect: Rect) {
        if let Some(window) = self.windows.get_mut(&handle) {
            if window.rect != rect {
                window.rect = rect;
                self.notifications.push(Notification::Configured(handle));
            }
        }
    }

    fn set_min_max(&mut self, handle: NativeHandle, iconic: bool, zoomed: bool) {
        let work = self.monitor_for(self.screen_rect(handle)).work;
        let Some(window) = self.windows.get_mut(&handle) else {
            return;
        };
        if window.iconic == iconic && window.zoomed == zoomed {
            return;
        }

        let was_zoomed = window.zoomed;
        window.iconic = iconic;
        window.zoomed = zoomed;

        let new_rect = if zoomed && !was_zoomed {
            window.restore_rect = window.rect;
            Some(work)
        } else if !zoomed && was_zoomed {
            Some(window.restore_rect)
        } else {
            None
        };

        self.notifications.push(Notification::StateChanged(handle));
        if let Some(rect) = new_rect {
            self.set_rect(handle, rect);
        }
    }
}

/// Frame insets `(left, top, right, bottom)` for a style.
fn frame(style: WindowStyle, _ex_style: ExStyle) -> (i32, i32, i32, i32) {
    let border = if style.contains(WindowStyle::THICKFRAME) {
        THICK_FRAME
    } else if style.intersects(WindowStyle::CAPTION) {
        THIN_FRAME
    } else {
        0
    };
    let caption = if style.contains(WindowStyle::CAPTION) {
        CAPTION_HEIGHT
    } else {
        0
    };
    (border, border + caption, border, border)
}

/// A simulated windowing system.
///
/// Clones share the same simulation, so a test can keep one clone for
/// inspection while the backend owns another.
#[derive(Debug, Clone)]
pub struct MockWin32 {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockWin32 {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWin32 {
    /// A simulation with one 1920×1080 monitor whose work area leaves 40px
    /// for a task bar at the bottom.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::new())),
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Replace the monitor layout. The first monitor is the primary one.
    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>) {
        self.state.lock().monitors = monitors;
    }

    /// Where `CW_USEDEFAULT` windows are placed.
    pub fn set_default_position(&self, x: i32, y: i32) {
        self.state.lock().default_position = Point::new(x, y);
    }

    /// Make the next call to `function` (by its Win32 name) fail.
    pub fn fail_next(&self, function: &'static str) {
        self.state.lock().failures.push(function);
    }

    pub fn set_drop_shadow_supported(&self, supported: bool) {
        self.state.lock().drop_shadow = supported;
    }

    /// The icons `ExtractIconEx` finds in the executable.
    pub fn set_executable_icons(&self, large: Option<IconHandle>, small: Option<IconHandle>) {
        self.state.lock().executable_icons = (large, small);
    }

    /// Whether `SetForegroundWindow` succeeds.
    pub fn set_foreground_allowed(&self, allowed: bool) {
        self.state.lock().foreground_allowed = allowed;
    }

    /// Report `handle` from the creation callback of the next window instead
    /// of the real one.
    pub fn set_callback_handle(&self, handle: NativeHandle) {
        self.state.lock().callback_handle = Some(handle);
    }

    /// Create a plain overlapped window directly, without recording a call.
    pub fn create_test_window(&self) -> NativeHandle {
        self.create_foreign_window(
            None,
            Rect::from_origin_size(100, 100, 320, 240),
            WindowStyle::OVERLAPPEDWINDOW | WindowStyle::VISIBLE,
            ExStyle::empty(),
        )
    }

    /// Create a window owned by "another program", without recording a call.
    ///
    /// `rect` is the window rectangle relative to the parent's client area.
    pub fn create_foreign_window(
        &self,
        parent: Option<NativeHandle>,
        rect: Rect,
        style: WindowStyle,
        ex_style: ExStyle,
    ) -> NativeHandle {
        let mut state = self.state.lock();
        let window = MockWindow::new(parent.unwrap_or(DESKTOP), style, ex_style, rect);
        state.insert_window(window)
    }

    // =========================================================================
    // External events
    // =========================================================================

    /// Destroy a window the way another program (or the user) would.
    pub fn close_externally(&self, handle: NativeHandle) {
        self.state.lock().remove_tree(handle);
    }

    /// Move/resize a window the way the user would, by dragging its frame.
    pub fn move_externally(&self, handle: NativeHandle, rect: Rect) {
        self.state.lock().set_rect(handle, rect);
    }

    /// Minimize, maximize or restore a window from outside.
    pub fn set_min_max_externally(&self, handle: NativeHandle, iconic: bool, zoomed: bool) {
        self.state.lock().set_min_max(handle, iconic, zoomed);
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<OsCall> {
        self.state.lock().calls.clone()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Count recorded calls matching `predicate`.
    pub fn count_calls<F>(&self, predicate: F) -> usize
    where
        F: Fn(&OsCall) -> bool,
    {
        self.state.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    /// Recorded calls that targeted `handle`.
    pub fn calls_for(&self, handle: NativeHandle) -> Vec<OsCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.handle() == Some(handle))
            .cloned()
            .collect()
    }

    /// Classes registered so far.
    pub fn registered_classes(&self) -> Vec<ClassSpec> {
        self.state.lock().classes.clone()
    }

    /// Check if a window exists.
    pub fn exists(&self, handle: NativeHandle) -> bool {
        self.state.lock().windows.contains_key(&handle)
    }

    pub fn title_of(&self, handle: NativeHandle) -> Option<String> {
        self.state.lock().windows.get(&handle).map(|w| w.title.clone())
    }

    pub fn cursor_of(&self, handle: NativeHandle) -> Option<CursorHandle> {
        self.state.lock().windows.get(&handle).and_then(|w| w.cursor)
    }

    pub fn icons_of(&self, handle: NativeHandle) -> (Option<IconHandle>, Option<IconHandle>) {
        self.state
            .lock()
            .windows
            .get(&handle)
            .map(|w| w.icons)
            .unwrap_or((None, None))
    }

    pub fn alpha_of(&self, handle: NativeHandle) -> Option<u8> {
        self.state.lock().windows.get(&handle).and_then(|w| w.alpha)
    }

    /// Check if a system-menu entry is enabled.
    pub fn menu_item_enabled(&self, handle: NativeHandle, command: SysCommand) -> bool {
        self.state
            .lock()
            .windows
            .get(&handle)
            .is_some_and(|w| !w.disabled_menu_items.contains(&command))
    }

    /// The window with keyboard focus.
    pub fn focused(&self) -> Option<NativeHandle> {
        self.state.lock().focus
    }

    /// Number of device contexts currently handed out.
    pub fn outstanding_dcs(&self) -> usize {
        self.state.lock().dc_bitmaps.len()
    }

    /// Notifications queued and not yet taken.
    pub fn pending_notifications(&self) -> Vec<Notification> {
        self.state.lock().notifications.clone()
    }
}

impl Win32Api for MockWin32 {
    fn module_file_name(&self) -> OsResult<String> {
        self.state.lock().check("GetModuleFileNameW")?;
        Ok("C:\\Program Files\\Demo\\demo.exe".to_string())
    }

    fn extract_icons(&self, _path: &str) -> (Option<IconHandle>, Option<IconHandle>) {
        self.state.lock().executable_icons
    }

    fn load_application_icons(&self) -> (Option<IconHandle>, Option<IconHandle>) {
        (Some(IconHandle(0x10)), Some(IconHandle(0x11)))
    }

    fn load_arrow_cursor(&self) -> OsResult<CursorHandle> {
        self.state.lock().check("LoadCursorW")?;
        Ok(CursorHandle(0x20))
    }

    fn copy_icon(&self, icon: IconHandle) -> OsResult<IconHandle> {
        let mut state = self.state.lock();
        state.check("CopyIcon")?;
        state.calls.push(OsCall::CopyIcon(icon));
        Ok(IconHandle(state.alloc()))
    }

    fn destroy_icon(&self, icon: IconHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("DestroyIcon")?;
        state.calls.push(OsCall::DestroyIcon(icon));
        Ok(())
    }

    fn supports_drop_shadow(&self) -> bool {
        self.state.lock().drop_shadow
    }

    fn register_class(&self, spec: &ClassSpec) -> OsResult<ClassAtom> {
        let mut state = self.state.lock();
        state.check("RegisterClassExW")?;
        state.calls.push(OsCall::RegisterClass {
            name: spec.name,
            style: spec.style,
        });
        state.classes.push(spec.clone());
        Ok(ClassAtom(0xC000 + state.classes.len() as u16))
    }

    fn create_window(&self, params: &CreateParams) -> OsResult<CreateOutcome> {
        let mut state = self.state.lock();
        state.check("CreateWindowExW")?;
        state.calls.push(OsCall::CreateWindow(params.clone()));

        let is_child = params.style.contains(WindowStyle::CHILD);
        let (parent, owner) = if is_child {
            let parent = params.parent.unwrap_or(DESKTOP);
            if parent != DESKTOP {
                state.window("CreateWindowExW", parent)?;
            }
            (parent, None)
        } else {
            (DESKTOP, params.parent)
        };

        let (x, y) = if params.x == CW_USEDEFAULT {
            (state.default_position.x, state.default_position.y)
        } else {
            (params.x, params.y)
        };
        let (width, height) = if params.width == CW_USEDEFAULT {
            (640, 480)
        } else {
            (params.width, params.height)
        };

        let mut window = MockWindow::new(
            parent,
            params.style,
            params.ex_style,
            Rect::from_origin_size(x, y, width, height),
        );
        window.owner = owner;
        window.title = params.title.clone();
        let handle = state.insert_window(window);

        let callback_handle = state.callback_handle.take().or(Some(handle));
        Ok(CreateOutcome {
            handle,
            callback_handle,
        })
    }

    fn destroy_window(&self, handle: NativeHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("DestroyWindow")?;
        state.window("DestroyWindow", handle)?;
        state.calls.push(OsCall::DestroyWindow(handle));
        state.remove_tree(handle);
        Ok(())
    }

    fn post_close(&self, handle: NativeHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("PostMessageW")?;
        state.calls.push(OsCall::PostClose(handle));
        Ok(())
    }

    fn desktop_window(&self) -> NativeHandle {
        DESKTOP
    }

    fn get_parent(&self, handle: NativeHandle) -> Option<NativeHandle> {
        self.state.lock().windows.get(&handle).map(|w| w.parent)
    }

    fn set_parent(&self, handle: NativeHandle, parent: Option<NativeHandle>) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetParent")?;
        state.calls.push(OsCall::SetParent { handle, parent });
        state.window_mut("SetParent", handle)?.parent = parent.unwrap_or(DESKTOP);
        Ok(())
    }

    fn get_owner(&self, handle: NativeHandle) -> Option<NativeHandle> {
        self.state.lock().windows.get(&handle).and_then(|w| w.owner)
    }

    fn set_owner(&self, handle: NativeHandle, owner: Option<NativeHandle>) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetWindowLongPtrW")?;
        state.calls.push(OsCall::SetOwner { handle, owner });
        state.window_mut("SetWindowLongPtrW", handle)?.owner = owner;
        Ok(())
    }

    fn get_style(&self, handle: NativeHandle) -> WindowStyle {
        self.state
            .lock()
            .windows
            .get(&handle)
            .map(|w| w.full_style())
            .unwrap_or_default()
    }

    fn set_style(&self, handle: NativeHandle, style: WindowStyle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetWindowLongPtrW")?;
        state.calls.push(OsCall::SetStyle { handle, style });
        let window = state.window_mut("SetWindowLongPtrW", handle)?;
        window.style = style & !(WindowStyle::VISIBLE | WindowStyle::MINIMIZE | WindowStyle::MAXIMIZE);
        window.visible = style.contains(WindowStyle::VISIBLE);
        Ok(())
    }

    fn get_ex_style(&self, handle: NativeHandle) -> ExStyle {
        self.state
            .lock()
            .windows
            .get(&handle)
            .map(|w| w.ex_style)
            .unwrap_or_default()
    }

    fn set_ex_style(&self, handle: NativeHandle, ex_style: ExStyle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetWindowLongPtrW")?;
        state.calls.push(OsCall::SetExStyle { handle, ex_style });
        let window = state.window_mut("SetWindowLongPtrW", handle)?;
        // Topmost only changes through the z-order.
        let topmost = window.ex_style.contains(ExStyle::TOPMOST);
        window.ex_style = ex_style;
        window.ex_style.set(ExStyle::TOPMOST, topmost);
        Ok(())
    }

    fn client_rect(&self, handle: NativeHandle) -> OsResult<Rect> {
        let mut state = self.state.lock();
        state.check("GetClientRect")?;
        let window = state.window("GetClientRect", handle)?;
        let (left, top, right, bottom) = frame(window.style, window.ex_style);
        Ok(Rect::new(
            0,
            0,
            (window.rect.width() - left - right).max(0),
            (window.rect.height() - top - bottom).max(0),
        ))
    }

    fn window_rect(&self, handle: NativeHandle) -> OsResult<Rect> {
        let mut state = self.state.lock();
        state.check("GetWindowRect")?;
        if handle != DESKTOP {
            state.window("GetWindowRect", handle)?;
        }
        Ok(state.screen_rect(handle))
    }

    fn client_to_screen(&self, handle: NativeHandle, point: Point) -> OsResult<Point> {
        let mut state = self.state.lock();
        state.check("ClientToScreen")?;
        if handle != DESKTOP {
            state.window("ClientToScreen", handle)?;
        }
        let origin = state.client_origin(handle);
        Ok(Point::new(point.x + origin.x, point.y + origin.y))
    }

    fn screen_to_client(&self, handle: NativeHandle, point: Point) -> OsResult<Point> {
        let mut state = self.state.lock();
        state.check("ScreenToClient")?;
        if handle != DESKTOP {
            state.window("ScreenToClient", handle)?;
        }
        let origin = state.client_origin(handle);
        Ok(Point::new(point.x - origin.x, point.y - origin.y))
    }

    fn adjust_window_rect(&self, rect: Rect, style: WindowStyle, ex_style: ExStyle) -> OsResult<Rect> {
        self.state.lock().check("AdjustWindowRectEx")?;
        let (left, top, right, bottom) = frame(style, ex_style);
        Ok(Rect::new(
            rect.left - left,
            rect.top - top,
            rect.right + right,
            rect.bottom + bottom,
        ))
    }

    fn set_window_pos(
        &self,
        handle: NativeHandle,
        insert_after: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: SwpFlags,
    ) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetWindowPos")?;
        state.window("SetWindowPos", handle)?;
        state.calls.push(OsCall::SetWindowPos {
            handle,
            insert_after,
            x,
            y,
            width,
            height,
            flags,
        });

        // Positions are relative to the parent's client area.
        let current = state.window("SetWindowPos", handle)?.rect;
        let mut rect = current;
        if !flags.contains(SwpFlags::NOMOVE) {
            rect = rect.moved_to(x, y);
        }
        if !flags.contains(SwpFlags::NOSIZE) {
            rect = Rect::from_origin_size(rect.left, rect.top, width, height);
        }
        state.set_rect(handle, rect);

        let window = state.window_mut("SetWindowPos", handle)?;
        if !flags.contains(SwpFlags::NOZORDER) {
            match insert_after {
                ZOrder::Topmost => window.ex_style.insert(ExStyle::TOPMOST),
                ZOrder::NoTopmost | ZOrder::Bottom => window.ex_style.remove(ExStyle::TOPMOST),
                ZOrder::Top => {}
            }
        }
        if flags.contains(SwpFlags::SHOWWINDOW) {
            window.visible = true;
        }
        if flags.contains(SwpFlags::HIDEWINDOW) {
            window.visible = false;
        }
        let activate = !flags.contains(SwpFlags::NOACTIVATE) && window.visible;
        if activate {
            state.active = Some(handle);
        }
        Ok(())
    }

    fn move_window(
        &self,
        handle: NativeHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _repaint: bool,
    ) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("MoveWindow")?;
        state.window("MoveWindow", handle)?;
        state.calls.push(OsCall::MoveWindow {
            handle,
            x,
            y,
            width,
            height,
        });
        state.set_rect(handle, Rect::from_origin_size(x, y, width, height));
        Ok(())
    }

    fn monitor_info(&self, handle: NativeHandle) -> OsResult<MonitorInfo> {
        let mut state = self.state.lock();
        state.check("GetMonitorInfoW")?;
        let rect = state.screen_rect(handle);
        Ok(state.monitor_for(rect))
    }

    fn monitors(&self) -> Vec<Rect> {
        self.state.lock().monitors.iter().map(|m| m.monitor).collect()
    }

    fn primary_screen_size(&self) -> (i32, i32) {
        self.state
            .lock()
            .monitors
            .first()
            .map(|m| (m.monitor.width(), m.monitor.height()))
            .unwrap_or((1920, 1080))
    }

    fn show_window(&self, handle: NativeHandle, command: ShowCommand) -> bool {
        let mut state = self.state.lock();
        let Some(window) = state.windows.get(&handle) else {
            return false;
        };
        let was_visible = window.visible;
        let (iconic, zoomed) = (window.iconic, window.zoomed);
        state.calls.push(OsCall::ShowWindow { handle, command });

        let (visible, iconic, zoomed, activate) = match command {
            ShowCommand::Hide => (false, iconic, zoomed, false),
            ShowCommand::ShowNormal | ShowCommand::Restore => {
                if iconic {
                    (true, false, zoomed, true)
                } else {
                    (true, false, false, true)
                }
            }
            ShowCommand::ShowMinimized => (true, true, zoomed, true),
            ShowCommand::ShowMaximized => (true, false, true, true),
            ShowCommand::ShowNoActivate => (true, false, zoomed, false),
            ShowCommand::Show => (true, iconic, zoomed, true),
            ShowCommand::Minimize | ShowCommand::ShowMinNoActive => (true, true, zoomed, false),
            ShowCommand::ShowNa => (true, iconic, zoomed, false),
        };

        if let Some(window) = state.windows.get_mut(&handle) {
            window.visible = visible;
        }
        state.set_min_max(handle, iconic, zoomed);

        if activate {
            state.active = Some(handle);
        } else if command == ShowCommand::Minimize || command == ShowCommand::Hide {
            if state.active == Some(handle) {
                state.active = None;
            }
        }
        was_visible
    }

    fn show_owned_popups(&self, handle: NativeHandle, show: bool) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("ShowOwnedPopups")?;
        state.calls.push(OsCall::ShowOwnedPopups { handle, show });
        Ok(())
    }

    fn is_window_visible(&self, handle: NativeHandle) -> bool {
        self.state.lock().visible(handle)
    }

    fn is_iconic(&self, handle: NativeHandle) -> bool {
        self.state.lock().windows.get(&handle).is_some_and(|w| w.iconic)
    }

    fn is_zoomed(&self, handle: NativeHandle) -> bool {
        self.state.lock().windows.get(&handle).is_some_and(|w| w.zoomed)
    }

    fn active_window(&self) -> Option<NativeHandle> {
        self.state.lock().active
    }

    fn set_active_window(&self, handle: NativeHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetActiveWindow")?;
        state.window("SetActiveWindow", handle)?;
        state.calls.push(OsCall::SetActiveWindow(handle));
        state.active = Some(handle);
        Ok(())
    }

    fn set_foreground_window(&self, handle: NativeHandle) -> bool {
        let mut state = self.state.lock();
        state.calls.push(OsCall::SetForegroundWindow(handle));
        if state.foreground_allowed && state.windows.contains_key(&handle) {
            state.active = Some(handle);
            true
        } else {
            false
        }
    }

    fn set_focus(&self, handle: NativeHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetFocus")?;
        state.window("SetFocus", handle)?;
        state.calls.push(OsCall::SetFocus(handle));
        state.focus = Some(handle);
        Ok(())
    }

    fn validate(&self, handle: NativeHandle) {
        self.state.lock().calls.push(OsCall::Validate(handle));
    }

    fn set_window_text(&self, handle: NativeHandle, text: &str) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetWindowTextW")?;
        state.calls.push(OsCall::SetWindowText {
            handle,
            text: text.to_string(),
        });
        state.window_mut("SetWindowTextW", handle)?.title = text.to_string();
        Ok(())
    }

    fn set_cursor(&self, handle: NativeHandle, cursor: CursorHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetCursor")?;
        state.calls.push(OsCall::SetCursor { handle, cursor });
        state.window_mut("SetCursor", handle)?.cursor = Some(cursor);
        Ok(())
    }

    fn set_icons(&self, handle: NativeHandle, big: Option<IconHandle>, small: Option<IconHandle>) {
        let mut state = self.state.lock();
        state.calls.push(OsCall::SetIcons { handle, big, small });
        if let Some(window) = state.windows.get_mut(&handle) {
            window.icons = (big, small);
        }
    }

    fn enable_system_menu_item(&self, handle: NativeHandle, command: SysCommand, enabled: bool) {
        let mut state = self.state.lock();
        state.calls.push(OsCall::EnableSystemMenuItem {
            handle,
            command,
            enabled,
        });
        if let Some(window) = state.windows.get_mut(&handle) {
            if enabled {
                window.disabled_menu_items.remove(&command);
            } else {
                window.disabled_menu_items.insert(command);
            }
        }
    }

    fn set_layered_alpha(&self, handle: NativeHandle, alpha: u8) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("SetLayeredWindowAttributes")?;
        state.calls.push(OsCall::SetLayeredAlpha { handle, alpha });
        state.window_mut("SetLayeredWindowAttributes", handle)?.alpha = Some(alpha);
        Ok(())
    }

    fn get_dc(&self, handle: NativeHandle) -> OsResult<DcHandle> {
        let mut state = self.state.lock();
        state.check("GetDC")?;
        state.window("GetDC", handle)?;
        state.calls.push(OsCall::GetDc(handle));
        let dc = DcHandle(state.alloc());
        state.dc_bitmaps.insert(dc, BitmapHandle(0xB000));
        Ok(dc)
    }

    fn release_dc(&self, handle: NativeHandle, dc: DcHandle) -> OsResult<()> {
        let mut state = self.state.lock();
        state.check("ReleaseDC")?;
        state.calls.push(OsCall::ReleaseDc { handle, dc });
        state.dc_bitmaps.remove(&dc);
        Ok(())
    }

    fn select_bitmap(&self, dc: DcHandle, bitmap: BitmapHandle) -> OsResult<BitmapHandle> {
        let mut state = self.state.lock();
        state.check("SelectObject")?;
        state.calls.push(OsCall::SelectBitmap { dc, bitmap });
        state
            .dc_bitmaps
            .insert(dc, bitmap)
            .ok_or(OsError::new("SelectObject", 6))
    }

    fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut self.state.lock().notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_metrics() {
        let api = MockWin32::new();
        let rect = api
            .adjust_window_rect(
                Rect::new(0, 0, 400, 300),
                WindowStyle::OVERLAPPEDWINDOW,
                ExStyle::empty(),
            )
            .unwrap();
        assert_eq!(rect, Rect::new(-8, -31, 408, 308));

        let rect = api
            .adjust_window_rect(Rect::new(0, 0, 400, 300), WindowStyle::POPUP, ExStyle::empty())
            .unwrap();
        assert_eq!(rect, Rect::new(0, 0, 400, 300));
    }

    #[test]
    fn test_client_geometry() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        assert_eq!(api.client_rect(handle).unwrap(), Rect::new(0, 0, 304, 201));
        assert_eq!(
            api.client_to_screen(handle, Point::new(0, 0)).unwrap(),
            Point::new(108, 131)
        );

        let child = api.create_foreign_window(
            Some(handle),
            Rect::from_origin_size(10, 20, 50, 50),
            WindowStyle::CHILD | WindowStyle::VISIBLE,
            ExStyle::empty(),
        );
        assert_eq!(api.window_rect(child).unwrap(), Rect::from_origin_size(118, 151, 50, 50));
        assert_eq!(
            api.screen_to_client(handle, Point::new(118, 151)).unwrap(),
            Point::new(10, 20)
        );
    }

    #[test]
    fn test_destroy_cascades_to_children() {
        let api = MockWin32::new();
        let parent = api.create_test_window();
        let child = api.create_foreign_window(
            Some(parent),
            Rect::from_origin_size(0, 0, 10, 10),
            WindowStyle::CHILD,
            ExStyle::empty(),
        );

        api.destroy_window(parent).unwrap();
        assert!(!api.exists(child));
        assert_eq!(
            api.take_notifications(),
            vec![Notification::Destroyed(parent), Notification::Destroyed(child)]
        );
        assert!(api.destroy_window(parent).is_err());
    }

    #[test]
    fn test_maximize_and_restore() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        let before = api.window_rect(handle).unwrap();

        api.show_window(handle, ShowCommand::MAXIMIZE);
        assert!(api.is_zoomed(handle));
        assert_eq!(api.window_rect(handle).unwrap(), Rect::new(0, 0, 1920, 1040));

        api.show_window(handle, ShowCommand::Restore);
        assert!(!api.is_zoomed(handle));
        assert_eq!(api.window_rect(handle).unwrap(), before);
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let api = MockWin32::new();
        let handle = api.create_test_window();
        api.fail_next("GetWindowRect");
        assert!(api.window_rect(handle).is_err());
        assert!(api.window_rect(handle).is_ok());
    }
}
