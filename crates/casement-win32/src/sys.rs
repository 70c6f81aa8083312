//! The real windowing system, through the `windows` crate.
//!
//! The window procedure never calls back into the backend. It records what
//! happened in a process-wide queue that [`SystemWin32::take_notifications`]
//! drains.

use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;

use casement_core::{Point, Rect};
use parking_lot::Mutex;
use windows::Win32::Foundation::{
    BOOL, COLORREF, GetLastError, HINSTANCE, HMODULE, HWND, LPARAM, LRESULT, POINT, RECT,
    SetLastError, TRUE, WIN32_ERROR, WPARAM,
};
use windows::Win32::Graphics::Gdi::{
    ClientToScreen, EnumDisplayMonitors, GetDC, GetMonitorInfoW, HBITMAP, HDC, HGDIOBJ, HMONITOR,
    HRGN, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow, ReleaseDC, ScreenToClient,
    SelectObject, ValidateRgn,
};
use windows::Win32::System::LibraryLoader::{GetModuleFileNameW, GetModuleHandleW};
use windows::Win32::UI::Input::KeyboardAndMouse::{GetActiveWindow, SetActiveWindow, SetFocus};
use windows::Win32::UI::Shell::ExtractIconExW;
use windows::Win32::UI::WindowsAndMessaging::{
    AdjustWindowRectEx, CopyIcon, CreateWindowExW, DefWindowProcW, DestroyIcon, DestroyWindow,
    EnableMenuItem, GA_PARENT, GWL_EXSTYLE, GWL_STYLE, GWLP_HWNDPARENT, GetAncestor,
    GetClientRect, GetDesktopWindow, GetSystemMenu, GetSystemMetrics, GetWindowLongPtrW,
    GetWindowLongW, GetWindowRect, HCURSOR, HICON, HMENU, HTCLIENT, HWND_BOTTOM, HWND_NOTOPMOST,
    HWND_TOP, HWND_TOPMOST, ICON_BIG, ICON_SMALL, IDC_ARROW, IDI_APPLICATION, IsIconic,
    IsWindowVisible, IsZoomed, LWA_ALPHA, LoadCursorW, LoadIconW, MF_BYCOMMAND, MF_ENABLED,
    MF_GRAYED, MoveWindow, PostMessageW, RegisterClassExW, SET_WINDOW_POS_FLAGS,
    SHOW_WINDOW_CMD, SIZE_MAXIMIZED, SIZE_MINIMIZED, SIZE_RESTORED, SM_CXSCREEN, SM_CYSCREEN,
    SendMessageW, SetCursor, SetForegroundWindow, SetLayeredWindowAttributes, SetParent,
    SetWindowLongPtrW, SetWindowLongW, SetWindowPos, SetWindowTextW, ShowOwnedPopups, ShowWindow,
    WINDOW_EX_STYLE, WINDOW_STYLE, WM_CLOSE, WM_DESTROY, WM_NCCREATE, WM_SETCURSOR, WM_SETICON,
    WM_SIZE, WM_WINDOWPOSCHANGED, WNDCLASS_STYLES, WNDCLASSEXW,
};
use windows::core::PCWSTR;

use crate::api::{
    BitmapHandle, ClassAtom, ClassSpec, CreateOutcome, CreateParams, CursorHandle, DcHandle,
    ExStyle, IconHandle, MonitorInfo, NativeHandle, Notification, OsError, OsResult, ShowCommand,
    SwpFlags, SysCommand, Win32Api, WindowStyle, ZOrder,
};

/// Callbacks recorded by the window procedure.
static NOTIFICATIONS: Mutex<Vec<Notification>> = Mutex::new(Vec::new());

/// The handle seen by `WM_NCCREATE` during the current `CreateWindowEx`.
static CREATING: Mutex<Option<usize>> = Mutex::new(None);

/// Per-window cursors, applied on `WM_SETCURSOR`.
static CURSORS: Mutex<Vec<(usize, usize)>> = Mutex::new(Vec::new());

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

fn hwnd(handle: NativeHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

fn native(hwnd: HWND) -> NativeHandle {
    NativeHandle(hwnd.0 as usize)
}

fn to_rect(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

fn from_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

fn last_error(function: &'static str) -> OsError {
    OsError::new(function, unsafe { GetLastError() }.0)
}

fn check(ok: BOOL, function: &'static str) -> OsResult<()> {
    if ok.as_bool() {
        Ok(())
    } else {
        Err(last_error(function))
    }
}

fn win<T>(result: windows::core::Result<T>, function: &'static str) -> OsResult<T> {
    result.map_err(|err| OsError::new(function, err.code().0 as u32))
}

fn insert_after(z_order: ZOrder) -> HWND {
    match z_order {
        ZOrder::Top => HWND_TOP,
        ZOrder::Bottom => HWND_BOTTOM,
        ZOrder::Topmost => HWND_TOPMOST,
        ZOrder::NoTopmost => HWND_NOTOPMOST,
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let handle = native(hwnd);
    match msg {
        WM_NCCREATE => {
            *CREATING.lock() = Some(handle.0);
        }
        WM_DESTROY => {
            CURSORS.lock().retain(|(window, _)| *window != handle.0);
            NOTIFICATIONS.lock().push(Notification::Destroyed(handle));
        }
        WM_WINDOWPOSCHANGED => {
            NOTIFICATIONS.lock().push(Notification::Configured(handle));
        }
        WM_SIZE => {
            let kind = wparam.0 as u32;
            if kind == SIZE_MINIMIZED || kind == SIZE_MAXIMIZED || kind == SIZE_RESTORED {
                NOTIFICATIONS.lock().push(Notification::StateChanged(handle));
            }
        }
        WM_SETCURSOR if (lparam.0 & 0xFFFF) as u32 == HTCLIENT => {
            let cursor = CURSORS
                .lock()
                .iter()
                .find(|(window, _)| *window == handle.0)
                .map(|(_, cursor)| *cursor);
            if let Some(cursor) = cursor {
                unsafe { SetCursor(HCURSOR(cursor as *mut c_void)) };
                return LRESULT(1);
            }
        }
        _ => {}
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

unsafe extern "system" fn collect_monitor(
    _monitor: HMONITOR,
    _hdc: HDC,
    rect: *mut RECT,
    data: LPARAM,
) -> BOOL {
    unsafe {
        let monitors = &mut *(data.0 as *mut Vec<Rect>);
        monitors.push(to_rect(*rect));
    }
    TRUE
}

/// [`Win32Api`] over the live windowing system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWin32;

impl SystemWin32 {
    pub fn new() -> Self {
        Self
    }

    fn instance() -> HINSTANCE {
        unsafe { GetModuleHandleW(PCWSTR::null()) }
            .map(|module| HINSTANCE(module.0))
            .unwrap_or_default()
    }
}

impl Win32Api for SystemWin32 {
    fn module_file_name(&self) -> OsResult<String> {
        let mut buffer = [0u16; 1024];
        let len = unsafe { GetModuleFileNameW(HMODULE::default(), &mut buffer) } as usize;
        if len == 0 {
            return Err(last_error("GetModuleFileNameW"));
        }
        Ok(String::from_utf16_lossy(&buffer[..len]))
    }

    fn extract_icons(&self, path: &str) -> (Option<IconHandle>, Option<IconHandle>) {
        let path = to_wide(path);
        let mut large = HICON::default();
        let mut small = HICON::default();
        unsafe {
            ExtractIconExW(
                PCWSTR(path.as_ptr()),
                0,
                Some(&mut large),
                Some(&mut small),
                1,
            );
        }
        let wrap = |icon: HICON| (!icon.is_invalid()).then(|| IconHandle(icon.0 as usize));
        (wrap(large), wrap(small))
    }

    fn load_application_icons(&self) -> (Option<IconHandle>, Option<IconHandle>) {
        match unsafe { LoadIconW(HINSTANCE::default(), IDI_APPLICATION) } {
            Ok(icon) => {
                let icon = IconHandle(icon.0 as usize);
                (Some(icon), Some(icon))
            }
            Err(_) => (None, None),
        }
    }

    fn load_arrow_cursor(&self) -> OsResult<CursorHandle> {
        let cursor = win(unsafe { LoadCursorW(HINSTANCE::default(), IDC_ARROW) }, "LoadCursorW")?;
        Ok(CursorHandle(cursor.0 as usize))
    }

    fn copy_icon(&self, icon: IconHandle) -> OsResult<IconHandle> {
        let copy = win(unsafe { CopyIcon(HICON(icon.0 as *mut c_void)) }, "CopyIcon")?;
        Ok(IconHandle(copy.0 as usize))
    }

    fn destroy_icon(&self, icon: IconHandle) -> OsResult<()> {
        win(unsafe { DestroyIcon(HICON(icon.0 as *mut c_void)) }, "DestroyIcon")
    }

    fn supports_drop_shadow(&self) -> bool {
        true
    }

    fn register_class(&self, spec: &ClassSpec) -> OsResult<ClassAtom> {
        let name = to_wide(spec.name);
        let class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: WNDCLASS_STYLES(spec.style.bits()),
            lpfnWndProc: Some(window_proc),
            hInstance: Self::instance(),
            hIcon: HICON(spec.icon.map_or(std::ptr::null_mut(), |i| i.0 as *mut c_void)),
            hIconSm: HICON(
                spec.small_icon
                    .map_or(std::ptr::null_mut(), |i| i.0 as *mut c_void),
            ),
            hCursor: HCURSOR(spec.cursor.map_or(std::ptr::null_mut(), |c| c.0 as *mut c_void)),
            lpszClassName: PCWSTR(name.as_ptr()),
            ..Default::default()
        };

        let atom = unsafe { RegisterClassExW(&class) };
        if atom == 0 {
            return Err(last_error("RegisterClassExW"));
        }
        Ok(ClassAtom(atom))
    }

    fn create_window(&self, params: &CreateParams) -> OsResult<CreateOutcome> {
        let title = to_wide(&params.title);
        let parent = params.parent.map(hwnd).unwrap_or_default();
        *CREATING.lock() = None;

        let created = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(params.ex_style.bits()),
                // MAKEINTATOM
                PCWSTR(params.class.0 as usize as *const u16),
                PCWSTR(title.as_ptr()),
                WINDOW_STYLE(params.style.bits()),
                params.x,
                params.y,
                params.width,
                params.height,
                parent,
                HMENU::default(),
                Self::instance(),
                None,
            )
        };
        let created = win(created, "CreateWindowExW")?;

        Ok(CreateOutcome {
            handle: native(created),
            callback_handle: CREATING.lock().take().map(NativeHandle),
        })
    }

    fn destroy_window(&self, handle: NativeHandle) -> OsResult<()> {
        win(unsafe { DestroyWindow(hwnd(handle)) }, "DestroyWindow")
    }

    fn post_close(&self, handle: NativeHandle) -> OsResult<()> {
        win(
            unsafe { PostMessageW(hwnd(handle), WM_CLOSE, WPARAM(0), LPARAM(0)) },
            "PostMessageW",
        )
    }

    fn desktop_window(&self) -> NativeHandle {
        native(unsafe { GetDesktopWindow() })
    }

    fn get_parent(&self, handle: NativeHandle) -> Option<NativeHandle> {
        let parent = unsafe { GetAncestor(hwnd(handle), GA_PARENT) };
        (!parent.is_invalid()).then(|| native(parent))
    }

    fn set_parent(&self, handle: NativeHandle, parent: Option<NativeHandle>) -> OsResult<()> {
        let parent = parent.map(hwnd).unwrap_or_default();
        win(unsafe { SetParent(hwnd(handle), parent) }, "SetParent").map(|_| ())
    }

    fn get_owner(&self, handle: NativeHandle) -> Option<NativeHandle> {
        let owner = unsafe { GetWindowLongPtrW(hwnd(handle), GWLP_HWNDPARENT) };
        (owner != 0).then_some(NativeHandle(owner as usize))
    }

    fn set_owner(&self, handle: NativeHandle, owner: Option<NativeHandle>) -> OsResult<()> {
        let owner = owner.map_or(0, |owner| owner.0 as isize);
        unsafe {
            SetLastError(WIN32_ERROR(0));
            if SetWindowLongPtrW(hwnd(handle), GWLP_HWNDPARENT, owner) == 0 && GetLastError().0 != 0
            {
                return Err(last_error("SetWindowLongPtrW"));
            }
        }
        Ok(())
    }

    fn get_style(&self, handle: NativeHandle) -> WindowStyle {
        WindowStyle::from_bits(unsafe { GetWindowLongW(hwnd(handle), GWL_STYLE) } as u32)
    }

    fn set_style(&self, handle: NativeHandle, style: WindowStyle) -> OsResult<()> {
        unsafe {
            SetLastError(WIN32_ERROR(0));
            if SetWindowLongW(hwnd(handle), GWL_STYLE, style.bits() as i32) == 0
                && GetLastError().0 != 0
            {
                return Err(last_error("SetWindowLongW"));
            }
        }
        Ok(())
    }

    fn get_ex_style(&self, handle: NativeHandle) -> ExStyle {
        ExStyle::from_bits(unsafe { GetWindowLongW(hwnd(handle), GWL_EXSTYLE) } as u32)
    }

    fn set_ex_style(&self, handle: NativeHandle, ex_style: ExStyle) -> OsResult<()> {
        unsafe {
            SetLastError(WIN32_ERROR(0));
            if SetWindowLongW(hwnd(handle), GWL_EXSTYLE, ex_style.bits() as i32) == 0
                && GetLastError().0 != 0
            {
                return Err(last_error("SetWindowLongW"));
            }
        }
        Ok(())
    }

    fn client_rect(&self, handle: NativeHandle) -> OsResult<Rect> {
        let mut rect = RECT::default();
        win(unsafe { GetClientRect(hwnd(handle), &mut rect) }, "GetClientRect")?;
        Ok(to_rect(rect))
    }

    fn window_rect(&self, handle: NativeHandle) -> OsResult<Rect> {
        let mut rect = RECT::default();
        win(unsafe { GetWindowRect(hwnd(handle), &mut rect) }, "GetWindowRect")?;
        Ok(to_rect(rect))
    }

    fn client_to_screen(&self, handle: NativeHandle, point: Point) -> OsResult<Point> {
        let mut pt = POINT {
            x: point.x,
            y: point.y,
        };
        check(unsafe { ClientToScreen(hwnd(handle), &mut pt) }, "ClientToScreen")?;
        Ok(Point::new(pt.x, pt.y))
    }

    fn screen_to_client(&self, handle: NativeHandle, point: Point) -> OsResult<Point> {
        let mut pt = POINT {
            x: point.x,
            y: point.y,
        };
        check(unsafe { ScreenToClient(hwnd(handle), &mut pt) }, "ScreenToClient")?;
        Ok(Point::new(pt.x, pt.y))
    }

    fn adjust_window_rect(&self, rect: Rect, style: WindowStyle, ex_style: ExStyle) -> OsResult<Rect> {
        let mut rect = from_rect(rect);
        win(
            unsafe {
                AdjustWindowRectEx(
                    &mut rect,
                    WINDOW_STYLE(style.bits()),
                    BOOL(0),
                    WINDOW_EX_STYLE(ex_style.bits()),
                )
            },
            "AdjustWindowRectEx",
        )?;
        Ok(to_rect(rect))
    }

    fn set_window_pos(
        &self,
        handle: NativeHandle,
        z_order: ZOrder,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        flags: SwpFlags,
    ) -> OsResult<()> {
        win(
            unsafe {
                SetWindowPos(
                    hwnd(handle),
                    insert_after(z_order),
                    x,
                    y,
                    width,
                    height,
                    SET_WINDOW_POS_FLAGS(flags.bits()),
                )
            },
            "SetWindowPos",
        )
    }

    fn move_window(
        &self,
        handle: NativeHandle,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        repaint: bool,
    ) -> OsResult<()> {
        win(
            unsafe { MoveWindow(hwnd(handle), x, y, width, height, BOOL::from(repaint)) },
            "MoveWindow",
        )
    }

    fn monitor_info(&self, handle: NativeHandle) -> OsResult<MonitorInfo> {
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        unsafe {
            let monitor = MonitorFromWindow(hwnd(handle), MONITOR_DEFAULTTONEAREST);
            check(GetMonitorInfoW(monitor, &mut info), "GetMonitorInfoW")?;
        }
        Ok(MonitorInfo {
            monitor: to_rect(info.rcMonitor),
            work: to_rect(info.rcWork),
        })
    }

    fn monitors(&self) -> Vec<Rect> {
        let mut monitors: Vec<Rect> = Vec::new();
        unsafe {
            let _ = EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(collect_monitor),
                LPARAM(&mut monitors as *mut Vec<Rect> as isize),
            );
        }
        monitors
    }

    fn primary_screen_size(&self) -> (i32, i32) {
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }

    fn show_window(&self, handle: NativeHandle, command: ShowCommand) -> bool {
        unsafe { ShowWindow(hwnd(handle), SHOW_WINDOW_CMD(command.raw())) }.as_bool()
    }

    fn show_owned_popups(&self, handle: NativeHandle, show: bool) -> OsResult<()> {
        win(
            unsafe { ShowOwnedPopups(hwnd(handle), BOOL::from(show)) },
            "ShowOwnedPopups",
        )
    }

    fn is_window_visible(&self, handle: NativeHandle) -> bool {
        unsafe { IsWindowVisible(hwnd(handle)) }.as_bool()
    }

    fn is_iconic(&self, handle: NativeHandle) -> bool {
        unsafe { IsIconic(hwnd(handle)) }.as_bool()
    }

    fn is_zoomed(&self, handle: NativeHandle) -> bool {
        unsafe { IsZoomed(hwnd(handle)) }.as_bool()
    }

    fn active_window(&self) -> Option<NativeHandle> {
        let active = unsafe { GetActiveWindow() };
        (!active.is_invalid()).then(|| native(active))
    }

    fn set_active_window(&self, handle: NativeHandle) -> OsResult<()> {
        win(unsafe { SetActiveWindow(hwnd(handle)) }, "SetActiveWindow").map(|_| ())
    }

    fn set_foreground_window(&self, handle: NativeHandle) -> bool {
        unsafe { SetForegroundWindow(hwnd(handle)) }.as_bool()
    }

    fn set_focus(&self, handle: NativeHandle) -> OsResult<()> {
        win(unsafe { SetFocus(hwnd(handle)) }, "SetFocus").map(|_| ())
    }

    fn validate(&self, handle: NativeHandle) {
        unsafe {
            let _ = ValidateRgn(hwnd(handle), HRGN::default());
        }
    }

    fn set_window_text(&self, handle: NativeHandle, text: &str) -> OsResult<()> {
        let text = to_wide(text);
        win(
            unsafe { SetWindowTextW(hwnd(handle), PCWSTR(text.as_ptr())) },
            "SetWindowTextW",
        )
    }

    fn set_cursor(&self, handle: NativeHandle, cursor: CursorHandle) -> OsResult<()> {
        let mut cursors = CURSORS.lock();
        match cursors.iter_mut().find(|(window, _)| *window == handle.0) {
            Some(entry) => entry.1 = cursor.0,
            None => cursors.push((handle.0, cursor.0)),
        }
        Ok(())
    }

    fn set_icons(&self, handle: NativeHandle, big: Option<IconHandle>, small: Option<IconHandle>) {
        let raw = |icon: Option<IconHandle>| LPARAM(icon.map_or(0, |icon| icon.0 as isize));
        unsafe {
            SendMessageW(hwnd(handle), WM_SETICON, WPARAM(ICON_BIG as usize), raw(big));
            SendMessageW(hwnd(handle), WM_SETICON, WPARAM(ICON_SMALL as usize), raw(small));
        }
    }

    fn enable_system_menu_item(&self, handle: NativeHandle, command: SysCommand, enabled: bool) {
        unsafe {
            let menu = GetSystemMenu(hwnd(handle), BOOL(0));
            if menu.is_invalid() {
                return;
            }
            let flags = if enabled { MF_ENABLED } else { MF_GRAYED };
            let _ = EnableMenuItem(menu, command.raw(), MF_BYCOMMAND | flags);
        }
    }

    fn set_layered_alpha(&self, handle: NativeHandle, alpha: u8) -> OsResult<()> {
        win(
            unsafe { SetLayeredWindowAttributes(hwnd(handle), COLORREF(0), alpha, LWA_ALPHA) },
            "SetLayeredWindowAttributes",
        )
    }

    fn get_dc(&self, handle: NativeHandle) -> OsResult<DcHandle> {
        let hdc = unsafe { GetDC(hwnd(handle)) };
        if hdc.is_invalid() {
            return Err(last_error("GetDC"));
        }
        Ok(DcHandle(hdc.0 as usize))
    }

    fn release_dc(&self, handle: NativeHandle, dc: DcHandle) -> OsResult<()> {
        if unsafe { ReleaseDC(hwnd(handle), HDC(dc.0 as *mut c_void)) } == 0 {
            return Err(last_error("ReleaseDC"));
        }
        Ok(())
    }

    fn select_bitmap(&self, dc: DcHandle, bitmap: BitmapHandle) -> OsResult<BitmapHandle> {
        let object = HGDIOBJ(HBITMAP(bitmap.0 as *mut c_void).0);
        let previous = unsafe { SelectObject(HDC(dc.0 as *mut c_void), object) };
        if previous.is_invalid() {
            return Err(last_error("SelectObject"));
        }
        Ok(BitmapHandle(previous.0 as usize))
    }

    fn take_notifications(&self) -> Vec<Notification> {
        std::mem::take(&mut *NOTIFICATIONS.lock())
    }
}
