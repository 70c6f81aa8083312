//! The OS seam.
//!
//! Every request the backend makes of the windowing system goes through
//! [`Win32Api`]. The trait speaks plain Rust values: handles are integer
//! newtypes and the style words carry the real `WS_*`/`WS_EX_*`/`CS_*` bit
//! values, so policy code can be checked against the platform documentation.
//!
//! OS callbacks are never dispatched into the backend while an OS call is in
//! progress. Implementations queue them as [`Notification`]s and the backend
//! drains the queue with [`Win32Api::take_notifications`].

use casement_core::{Point, Rect};
use thiserror::Error;

// ============================================================================
// Handles
// ============================================================================

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, $repr:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub $repr);
    };
}

handle_type!(
    /// A native window handle (`HWND`).
    NativeHandle,
    usize
);
handle_type!(
    /// A device context (`HDC`).
    DcHandle,
    usize
);
handle_type!(
    /// An icon (`HICON`).
    IconHandle,
    usize
);
handle_type!(
    /// A cursor (`HCURSOR`).
    CursorHandle,
    usize
);
handle_type!(
    /// A GDI bitmap (`HBITMAP`).
    BitmapHandle,
    usize
);
handle_type!(
    /// A registered window class.
    ClassAtom,
    u16
);

// ============================================================================
// Style words
// ============================================================================

/// Window style (`WS_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowStyle(u32);

impl WindowStyle {
    pub const OVERLAPPED: WindowStyle = WindowStyle(0x0000_0000);
    pub const POPUP: WindowStyle = WindowStyle(0x8000_0000);
    pub const CHILD: WindowStyle = WindowStyle(0x4000_0000);
    pub const MINIMIZE: WindowStyle = WindowStyle(0x2000_0000);
    pub const VISIBLE: WindowStyle = WindowStyle(0x1000_0000);
    pub const DISABLED: WindowStyle = WindowStyle(0x0800_0000);
    pub const CLIPSIBLINGS: WindowStyle = WindowStyle(0x0400_0000);
    pub const CLIPCHILDREN: WindowStyle = WindowStyle(0x0200_0000);
    pub const MAXIMIZE: WindowStyle = WindowStyle(0x0100_0000);
    pub const BORDER: WindowStyle = WindowStyle(0x0080_0000);
    pub const DLGFRAME: WindowStyle = WindowStyle(0x0040_0000);
    /// `BORDER | DLGFRAME`.
    pub const CAPTION: WindowStyle = WindowStyle(0x00C0_0000);
    pub const SYSMENU: WindowStyle = WindowStyle(0x0008_0000);
    pub const THICKFRAME: WindowStyle = WindowStyle(0x0004_0000);
    pub const MINIMIZEBOX: WindowStyle = WindowStyle(0x0002_0000);
    pub const MAXIMIZEBOX: WindowStyle = WindowStyle(0x0001_0000);
    pub const CHILDWINDOW: WindowStyle = Self::CHILD;
    pub const OVERLAPPEDWINDOW: WindowStyle = WindowStyle(0x00CF_0000);
}

casement_core::flag_set_ops!(WindowStyle, u32);

/// Extended window style (`WS_EX_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExStyle(u32);

impl ExStyle {
    pub const TOPMOST: ExStyle = ExStyle(0x0000_0008);
    pub const TRANSPARENT: ExStyle = ExStyle(0x0000_0020);
    pub const TOOLWINDOW: ExStyle = ExStyle(0x0000_0080);
    pub const APPWINDOW: ExStyle = ExStyle(0x0004_0000);
    pub const LAYERED: ExStyle = ExStyle(0x0008_0000);
    pub const NOACTIVATE: ExStyle = ExStyle(0x0800_0000);
}

casement_core::flag_set_ops!(ExStyle, u32);

/// Window class style (`CS_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClassStyle(u32);

impl ClassStyle {
    pub const VREDRAW: ClassStyle = ClassStyle(0x0001);
    pub const HREDRAW: ClassStyle = ClassStyle(0x0002);
    pub const DBLCLKS: ClassStyle = ClassStyle(0x0008);
    pub const OWNDC: ClassStyle = ClassStyle(0x0020);
    pub const PARENTDC: ClassStyle = ClassStyle(0x0080);
    pub const SAVEBITS: ClassStyle = ClassStyle(0x0800);
    pub const DROPSHADOW: ClassStyle = ClassStyle(0x0002_0000);
}

casement_core::flag_set_ops!(ClassStyle, u32);

/// `SetWindowPos` flags (`SWP_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwpFlags(u32);

impl SwpFlags {
    pub const NOSIZE: SwpFlags = SwpFlags(0x0001);
    pub const NOMOVE: SwpFlags = SwpFlags(0x0002);
    pub const NOZORDER: SwpFlags = SwpFlags(0x0004);
    pub const NOREDRAW: SwpFlags = SwpFlags(0x0008);
    pub const NOACTIVATE: SwpFlags = SwpFlags(0x0010);
    pub const FRAMECHANGED: SwpFlags = SwpFlags(0x0020);
    pub const SHOWWINDOW: SwpFlags = SwpFlags(0x0040);
    pub const HIDEWINDOW: SwpFlags = SwpFlags(0x0080);
    pub const NOCOPYBITS: SwpFlags = SwpFlags(0x0100);
    pub const NOOWNERZORDER: SwpFlags = SwpFlags(0x0200);
    /// Same bit as `NOOWNERZORDER`.
    pub const NOREPOSITION: SwpFlags = SwpFlags(0x0200);
}

casement_core::flag_set_ops!(SwpFlags, u32);

// ============================================================================
// Commands
// ============================================================================

/// The `hWndInsertAfter` argument of `SetWindowPos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZOrder {
    Top,
    Bottom,
    Topmost,
    NoTopmost,
}

/// `ShowWindow` commands (`SW_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowCommand {
    Hide,
    ShowNormal,
    ShowMinimized,
    ShowMaximized,
    ShowNoActivate,
    Show,
    Minimize,
    ShowMinNoActive,
    ShowNa,
    Restore,
}

impl ShowCommand {
    /// `SW_MAXIMIZE` is the same command as `SW_SHOWMAXIMIZED`.
    pub const MAXIMIZE: ShowCommand = ShowCommand::ShowMaximized;

    /// The `SW_*` value.
    pub fn raw(&self) -> i32 {
        match self {
            ShowCommand::Hide => 0,
            ShowCommand::ShowNormal => 1,
            ShowCommand::ShowMinimized => 2,
            ShowCommand::ShowMaximized => 3,
            ShowCommand::ShowNoActivate => 4,
            ShowCommand::Show => 5,
            ShowCommand::Minimize => 6,
            ShowCommand::ShowMinNoActive => 7,
            ShowCommand::ShowNa => 8,
            ShowCommand::Restore => 9,
        }
    }
}

/// System-menu entries (`SC_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SysCommand {
    Size,
    Move,
    Minimize,
    Maximize,
    Close,
}

impl SysCommand {
    /// The `SC_*` value.
    pub fn raw(&self) -> u32 {
        match self {
            SysCommand::Size => 0xF000,
            SysCommand::Move => 0xF010,
            SysCommand::Minimize => 0xF020,
            SysCommand::Maximize => 0xF030,
            SysCommand::Close => 0xF060,
        }
    }
}

// ============================================================================
// Call parameters
// ============================================================================

/// `CW_USEDEFAULT`: let the OS choose the position.
pub const CW_USEDEFAULT: i32 = i32::MIN;

/// Monitor bounds as reported by `GetMonitorInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Full monitor rectangle.
    pub monitor: Rect,
    /// Work area (monitor minus task bars).
    pub work: Rect,
}

/// A window class to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSpec {
    pub name: &'static str,
    pub style: ClassStyle,
    pub icon: Option<IconHandle>,
    pub small_icon: Option<IconHandle>,
    pub cursor: Option<CursorHandle>,
}

/// Arguments for `CreateWindowEx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub ex_style: ExStyle,
    pub class: ClassAtom,
    pub title: String,
    pub style: WindowStyle,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub parent: Option<NativeHandle>,
}

/// The result of `CreateWindowEx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The handle `CreateWindowEx` returned.
    pub handle: NativeHandle,
    /// The handle seen by the window procedure during `WM_NCCREATE`, if any.
    pub callback_handle: Option<NativeHandle>,
}

/// An OS callback recorded for later processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// `WM_DESTROY`: the window is gone.
    Destroyed(NativeHandle),
    /// `WM_WINDOWPOSCHANGED`: the window moved or was resized.
    Configured(NativeHandle),
    /// `WM_SIZE` with a minimize/maximize/restore request.
    StateChanged(NativeHandle),
}

impl Notification {
    /// The window the notification is about.
    pub fn handle(&self) -> NativeHandle {
        match self {
            Notification::Destroyed(handle)
            | Notification::Configured(handle)
            | Notification::StateChanged(handle) => *handle,
        }
    }
}

/// A failed OS call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{function} failed (error {code})")]
pub struct OsError {
    /// The OS function that failed.
    pub function: &'static str,
    /// `GetLastError` at the time of failure.
    pub code: u32,
}

impl OsError {
    /// Create an error for `function` with the given error code.
    pub fn new(function: &'static str, code: u32) -> Self {
        Self { function, code }
    }
}

/// Result type for OS calls.
pub type OsResult<T> = std::result::Result<T, OsError>;

// ============================================================================
// The seam
// ============================================================================

/// The windowing-system calls the backend depends on.
///
/// Method names follow the Win32 functions they wrap. Calls that cannot fail
/// in a meaningful way return plain values; everything else returns
/// [`OsResult`].
pub trait Win32Api {
    // -- process environment --------------------------------------------------

    /// `GetModuleFileName` for the executable.
    fn module_file_name(&self) -> OsResult<String>;

    /// `ExtractIconEx` for the first icon pair of a file: `(large, small)`.
    fn extract_icons(&self, path: &str) -> (Option<IconHandle>, Option<IconHandle>);

    /// The stock application icon pair (`IDI_APPLICATION`): `(large, small)`.
    fn load_application_icons(&self) -> (Option<IconHandle>, Option<IconHandle>);

    /// The stock arrow cursor.
    fn load_arrow_cursor(&self) -> OsResult<CursorHandle>;

    fn copy_icon(&self, icon: IconHandle) -> OsResult<IconHandle>;
    fn destroy_icon(&self, icon: IconHandle) -> OsResult<()>;

    /// Whether `CS_DROPSHADOW` is available.
    fn supports_drop_shadow(&self) -> bool;

    fn register_class(&self, spec: &ClassSpec) -> OsResult<ClassAtom>;

    // -- window lifetime ------------------------------------------------------

    fn create_window(&self, params: &CreateParams) -> OsResult<CreateOutcome>;
    fn destroy_window(&self, handle: NativeHandle) -> OsResult<()>;
    /// `PostMessage(WM_CLOSE)`: ask the owning program to close the window.
    fn post_close(&self, handle: NativeHandle) -> OsResult<()>;
    fn desktop_window(&self) -> NativeHandle;

    /// `GetAncestor(GA_PARENT)`.
    fn get_parent(&self, handle: NativeHandle) -> Option<NativeHandle>;
    fn set_parent(&self, handle: NativeHandle, parent: Option<NativeHandle>) -> OsResult<()>;

    /// `GetWindowLongPtr(GWLP_HWNDPARENT)`.
    fn get_owner(&self, handle: NativeHandle) -> Option<NativeHandle>;
    /// `SetWindowLongPtr(GWLP_HWNDPARENT)`.
    fn set_owner(&self, handle: NativeHandle, owner: Option<NativeHandle>) -> OsResult<()>;

    fn get_style(&self, handle: NativeHandle) -> WindowStyle;
    fn set_style(&self, handle: NativeHandle, style: WindowStyle) -> OsResult<()>;
    fn get_ex_style(&self, handle: NativeHandle) -> ExStyle;
    fn set_ex_style(&self, handle: NativeHandle, ex_style: ExStyle) -> OsResult<()>;

    // -- geometry -------------------------------------------------------------

    fn client_rect(&self, handle: NativeHandle) -> OsResult<Rect>;
    /// Window rectangle in screen coordinates.
    fn window_rect(&self, handle: NativeHandle) -> OsResult<Rect>;
    fn client_to_screen(&self, handle: NativeHandle, point: Point) -> OsResult<Point>;
    fn screen_to_client(&self, handle: NativeHandle, point: Point) -> OsResult<Point>;
    fn adjust_window_rect(&self, rect: Rect, style: WindowStyle, ex_style: ExStyle) -> OsResult<Rect>;

    #[allow(clippy::too_many_arguments)]
    fn set_window_pos(
        &self,
        handle: NativeHandle,
        insert_after: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: SwpFlags,
    ) -> OsResult<()>;

    fn move_window(
        &self,
        handle: NativeHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        repaint: bool,
    ) -> OsResult<()>;

    /// `MonitorFromWindow(MONITOR_DEFAULTTONEAREST)` + `GetMonitorInfo`.
    fn monitor_info(&self, handle: NativeHandle) -> OsResult<MonitorInfo>;
    /// All monitor rectangles.
    fn monitors(&self) -> Vec<Rect>;
    /// `SM_CXSCREEN`/`SM_CYSCREEN`.
    fn primary_screen_size(&self) -> (i32, i32);

    // -- visibility and activation --------------------------------------------

    /// `ShowWindow`; returns whether the window was visible before.
    fn show_window(&self, handle: NativeHandle, command: ShowCommand) -> bool;
    fn show_owned_popups(&self, handle: NativeHandle, show: bool) -> OsResult<()>;
    fn is_window_visible(&self, handle: NativeHandle) -> bool;
    fn is_iconic(&self, handle: NativeHandle) -> bool;
    fn is_zoomed(&self, handle: NativeHandle) -> bool;
    fn active_window(&self) -> Option<NativeHandle>;
    fn set_active_window(&self, handle: NativeHandle) -> OsResult<()>;
    /// `SetForegroundWindow`; fails routinely under focus-stealing prevention.
    fn set_foreground_window(&self, handle: NativeHandle) -> bool;
    fn set_focus(&self, handle: NativeHandle) -> OsResult<()>;
    /// `ValidateRgn(handle, NULL)`: discard the pending update region.
    fn validate(&self, handle: NativeHandle);

    // -- appearance -----------------------------------------------------------

    fn set_window_text(&self, handle: NativeHandle, text: &str) -> OsResult<()>;
    fn set_cursor(&self, handle: NativeHandle, cursor: CursorHandle) -> OsResult<()>;
    /// `WM_SETICON` for both sizes.
    fn set_icons(&self, handle: NativeHandle, big: Option<IconHandle>, small: Option<IconHandle>);
    /// `EnableMenuItem` on the system menu.
    fn enable_system_menu_item(&self, handle: NativeHandle, command: SysCommand, enabled: bool);
    /// `SetLayeredWindowAttributes(LWA_ALPHA)`.
    fn set_layered_alpha(&self, handle: NativeHandle, alpha: u8) -> OsResult<()>;

    // -- drawing --------------------------------------------------------------

    fn get_dc(&self, handle: NativeHandle) -> OsResult<DcHandle>;
    fn release_dc(&self, handle: NativeHandle, dc: DcHandle) -> OsResult<()>;
    /// `SelectObject` for a bitmap; returns the previously selected bitmap.
    fn select_bitmap(&self, dc: DcHandle, bitmap: BitmapHandle) -> OsResult<BitmapHandle>;

    // -- callbacks ------------------------------------------------------------

    /// Drain queued OS callbacks, oldest first.
    fn take_notifications(&self) -> Vec<Notification>;
}

/// Log a failed expected-success OS call and discard the error.
pub(crate) fn log_failure<T>(result: OsResult<T>, handle: NativeHandle) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                target: casement_core::logging::targets::OS,
                handle = handle.0,
                function = err.function,
                code = err.code,
                "OS call failed"
            );
            None
        }
    }
}
