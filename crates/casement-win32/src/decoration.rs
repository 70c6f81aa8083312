//! Decoration, function and hint policy.
//!
//! Turns the abstract decoration/function/type-hint settings of a window into
//! `WS_*` style bits and system-menu state.

use casement_core::logging::targets;
use casement_core::{Decorations, Functions, GeometryHints, HintFlags, TypeHint, WindowType};

use crate::api::{ExStyle, NativeHandle, SwpFlags, SysCommand, Win32Api, WindowStyle, ZOrder, log_failure};

/// Style bits owned by the decoration policy. Everything else in the style
/// word is left alone when decorations are recomputed.
const DECORATION_BITS: WindowStyle = WindowStyle::from_bits(
    WindowStyle::CAPTION.bits()
        | WindowStyle::THICKFRAME.bits()
        | WindowStyle::SYSMENU.bits()
        | WindowStyle::MINIMIZEBOX.bits()
        | WindowStyle::MAXIMIZEBOX.bits(),
);

/// The policy inputs of one window.
#[derive(Debug, Clone, Copy)]
pub struct StylePolicy<'a> {
    pub window_type: WindowType,
    pub type_hint: TypeHint,
    /// Decorations set explicitly by the application.
    pub decorations: Option<Decorations>,
    pub hint_flags: HintFlags,
    pub hints: &'a GeometryHints,
}

/// The decorations a window should get.
///
/// Explicit decorations win. Otherwise only toplevel windows are decorated,
/// based on their size hints and type hint. `None` means "leave the
/// decoration bits alone".
pub fn effective_decorations(policy: &StylePolicy<'_>) -> Option<Decorations> {
    if let Some(decorations) = policy.decorations {
        return Some(decorations);
    }

    if policy.window_type != WindowType::Toplevel {
        return None;
    }

    let tool_like = matches!(
        policy.type_hint,
        TypeHint::Dialog | TypeHint::Menu | TypeHint::Toolbar
    );

    if policy.hints.is_fixed_size(policy.hint_flags) {
        let mut decorations = Decorations::ALL | Decorations::RESIZEH | Decorations::MAXIMIZE;
        if tool_like {
            decorations |= Decorations::MINIMIZE;
        } else if policy.type_hint == TypeHint::Splashscreen {
            decorations |= Decorations::MENU | Decorations::MINIMIZE;
        }
        return Some(decorations);
    }

    if policy.hint_flags.contains(HintFlags::MAX_SIZE) {
        let mut decorations = Decorations::ALL | Decorations::MAXIMIZE;
        if tool_like {
            decorations |= Decorations::MINIMIZE;
        }
        return Some(decorations);
    }

    match policy.type_hint {
        TypeHint::Dialog | TypeHint::Toolbar | TypeHint::Utility => {
            Some(Decorations::ALL | Decorations::MINIMIZE | Decorations::MAXIMIZE)
        }
        TypeHint::Menu => Some(
            Decorations::ALL | Decorations::RESIZEH | Decorations::MINIMIZE | Decorations::MAXIMIZE,
        ),
        TypeHint::Splashscreen => Some(
            Decorations::ALL
                | Decorations::RESIZEH
                | Decorations::MENU
                | Decorations::MINIMIZE
                | Decorations::MAXIMIZE,
        ),
        TypeHint::Dock | TypeHint::Desktop => None,
        _ => Some(Decorations::ALL),
    }
}

/// The style word for the given decorations, keeping the non-decoration
/// bits of `style`.
pub fn decorated_style(style: WindowStyle, decorations: Decorations) -> WindowStyle {
    let mut style = style & !DECORATION_BITS;
    style.set(WindowStyle::BORDER, decorations.has(Decorations::BORDER));
    style.set(WindowStyle::THICKFRAME, decorations.has(Decorations::RESIZEH));
    if decorations.has(Decorations::TITLE) {
        style.insert(WindowStyle::CAPTION);
    } else if !decorations.has(Decorations::BORDER) {
        style.remove(WindowStyle::CAPTION);
    }
    style.set(WindowStyle::SYSMENU, decorations.has(Decorations::MENU));
    style.set(WindowStyle::MINIMIZEBOX, decorations.has(Decorations::MINIMIZE));
    style.set(WindowStyle::MAXIMIZEBOX, decorations.has(Decorations::MAXIMIZE));
    style
}

/// Re-derive the style words of a window and apply them if they changed.
///
/// The window keeps its client area in place: the frame deltas between the
/// old and new style are applied to the window rectangle. Fullscreen windows
/// are skipped; their style is restored on leaving fullscreen.
pub fn update_style_bits<A: Win32Api>(
    api: &A,
    handle: NativeHandle,
    policy: &StylePolicy<'_>,
    fullscreen: bool,
) {
    if fullscreen {
        return;
    }

    let old_style = api.get_style(handle);
    let old_ex_style = api.get_ex_style(handle);

    let Some(after) = log_failure(api.client_rect(handle), handle) else {
        return;
    };
    let Some(before) = log_failure(api.adjust_window_rect(after, old_style, old_ex_style), handle)
    else {
        return;
    };

    let mut will_be_topmost = old_ex_style.contains(ExStyle::TOPMOST);
    let old_ex_style = old_ex_style & !ExStyle::TOPMOST;

    let mut new_style = old_style;
    let mut new_ex_style = old_ex_style;

    if policy.window_type == WindowType::Temp {
        new_ex_style.insert(ExStyle::TOOLWINDOW);
        will_be_topmost = true;
    } else if policy.type_hint.is_tool() {
        new_ex_style.insert(ExStyle::TOOLWINDOW);
    } else {
        new_ex_style.remove(ExStyle::TOOLWINDOW);
    }

    if let Some(decorations) = effective_decorations(policy) {
        new_style = decorated_style(old_style, decorations);
    }

    if old_style == new_style && old_ex_style == new_ex_style {
        return;
    }

    tracing::debug!(
        target: targets::STYLE,
        handle = handle.0,
        old_style = old_style.bits(),
        new_style = new_style.bits(),
        old_ex_style = old_ex_style.bits(),
        new_ex_style = new_ex_style.bits(),
        "updating style bits"
    );

    if old_style != new_style {
        log_failure(api.set_style(handle, new_style), handle);
    }
    if old_ex_style != new_ex_style {
        log_failure(api.set_ex_style(handle, new_ex_style), handle);
    }

    let Some(after) = log_failure(api.adjust_window_rect(after, new_style, new_ex_style), handle)
    else {
        return;
    };
    let Some(mut rect) = log_failure(api.window_rect(handle), handle) else {
        return;
    };
    // SetWindowPos takes parent client coordinates.
    if let Some(parent) = api.get_parent(handle).filter(|p| *p != api.desktop_window()) {
        let Some(origin) = log_failure(api.screen_to_client(parent, rect.origin()), handle) else {
            return;
        };
        rect = rect.moved_to(origin.x, origin.y);
    }

    let left = rect.left + (after.left - before.left);
    let top = rect.top + (after.top - before.top);
    let right = rect.right + (after.right - before.right);
    let bottom = rect.bottom + (after.bottom - before.bottom);

    log_failure(
        api.set_window_pos(
            handle,
            if will_be_topmost {
                ZOrder::Topmost
            } else {
                ZOrder::NoTopmost
            },
            left,
            top,
            right - left,
            bottom - top,
            SwpFlags::FRAMECHANGED
                | SwpFlags::NOACTIVATE
                | SwpFlags::NOREPOSITION
                | SwpFlags::NOZORDER,
        ),
        handle,
    );
}

/// Enable or disable the system-menu entries for the given functions.
pub fn update_system_menu<A: Win32Api>(api: &A, handle: NativeHandle, functions: Functions) {
    let entries = [
        (Functions::RESIZE, SysCommand::Size),
        (Functions::MOVE, SysCommand::Move),
        (Functions::MINIMIZE, SysCommand::Minimize),
        (Functions::MAXIMIZE, SysCommand::Maximize),
        (Functions::CLOSE, SysCommand::Close),
    ];
    for (function, command) in entries {
        api.enable_system_menu_item(handle, command, functions.has(function));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy<'a>(
        window_type: WindowType,
        type_hint: TypeHint,
        hint_flags: HintFlags,
        hints: &'a GeometryHints,
    ) -> StylePolicy<'a> {
        StylePolicy {
            window_type,
            type_hint,
            decorations: None,
            hint_flags,
            hints,
        }
    }

    #[test]
    fn test_explicit_decorations_win() {
        let hints = GeometryHints::new();
        let mut p = policy(WindowType::Child, TypeHint::Dock, HintFlags::empty(), &hints);
        p.decorations = Some(Decorations::BORDER);
        assert_eq!(effective_decorations(&p), Some(Decorations::BORDER));
    }

    #[test]
    fn test_non_toplevel_undecorated() {
        let hints = GeometryHints::new();
        for window_type in [WindowType::Child, WindowType::Temp, WindowType::Foreign] {
            let p = policy(window_type, TypeHint::Normal, HintFlags::empty(), &hints);
            assert_eq!(effective_decorations(&p), None);
        }
    }

    #[test]
    fn test_decorations_by_type_hint() {
        let hints = GeometryHints::new();
        let cases = [
            (TypeHint::Normal, Some(Decorations::ALL)),
            (
                TypeHint::Dialog,
                Some(Decorations::ALL | Decorations::MINIMIZE | Decorations::MAXIMIZE),
            ),
            (
                TypeHint::Utility,
                Some(Decorations::ALL | Decorations::MINIMIZE | Decorations::MAXIMIZE),
            ),
            (
                TypeHint::Menu,
                Some(
                    Decorations::ALL
                        | Decorations::RESIZEH
                        | Decorations::MINIMIZE
                        | Decorations::MAXIMIZE,
                ),
            ),
            (TypeHint::Dock, None),
            (TypeHint::Desktop, None),
            (TypeHint::Tooltip, Some(Decorations::ALL)),
        ];
        for (type_hint, expected) in cases {
            let p = policy(WindowType::Toplevel, type_hint, HintFlags::empty(), &hints);
            assert_eq!(effective_decorations(&p), expected, "{type_hint:?}");
        }
    }

    #[test]
    fn test_fixed_size_decorations() {
        let hints = GeometryHints::new()
            .with_min_size(300, 200)
            .with_max_size(300, 200);
        let flags = HintFlags::MIN_SIZE | HintFlags::MAX_SIZE;

        let p = policy(WindowType::Toplevel, TypeHint::Normal, flags, &hints);
        assert_eq!(
            effective_decorations(&p),
            Some(Decorations::ALL | Decorations::RESIZEH | Decorations::MAXIMIZE)
        );

        let p = policy(WindowType::Toplevel, TypeHint::Dialog, flags, &hints);
        let decorations = effective_decorations(&p).unwrap();
        assert!(!decorations.has(Decorations::MINIMIZE));
        assert!(!decorations.has(Decorations::RESIZEH));

        let p = policy(WindowType::Toplevel, TypeHint::Splashscreen, flags, &hints);
        let decorations = effective_decorations(&p).unwrap();
        assert!(!decorations.has(Decorations::MENU));
        assert!(decorations.has(Decorations::TITLE));
    }

    #[test]
    fn test_max_size_only_decorations() {
        let hints = GeometryHints::new().with_max_size(800, 600);
        let p = policy(WindowType::Toplevel, TypeHint::Toolbar, HintFlags::MAX_SIZE, &hints);
        assert_eq!(
            effective_decorations(&p),
            Some(Decorations::ALL | Decorations::MAXIMIZE | Decorations::MINIMIZE)
        );
    }

    #[test]
    fn test_decorated_style() {
        let base = WindowStyle::VISIBLE | WindowStyle::CLIPCHILDREN;

        let style = decorated_style(base, Decorations::ALL);
        assert_eq!(style, base | WindowStyle::OVERLAPPEDWINDOW);

        let style = decorated_style(base | WindowStyle::OVERLAPPEDWINDOW, Decorations::empty());
        assert_eq!(style, base);

        let style = decorated_style(base, Decorations::ALL | Decorations::MAXIMIZE | Decorations::RESIZEH);
        assert!(style.contains(WindowStyle::CAPTION | WindowStyle::SYSMENU | WindowStyle::MINIMIZEBOX));
        assert!(!style.intersects(WindowStyle::THICKFRAME | WindowStyle::MAXIMIZEBOX));

        let style = decorated_style(base, Decorations::BORDER);
        assert!(style.contains(WindowStyle::BORDER));
        assert!(!style.contains(WindowStyle::DLGFRAME));
    }
}
