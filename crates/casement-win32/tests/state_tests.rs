//! Tests for visibility, window state, placement and appearance.

mod common;

use casement_core::{
    BackendEvent, Decorations, Functions, GeometryHints, Gravity, HintFlags, NativeWindowBackend,
    Point, Rect, TypeHint, WindowAttributes, WindowState, WindowType,
};
use casement_win32::testing::OsCall;
use casement_win32::{
    BitmapHandle, CursorHandle, ExStyle, IconHandle, PLACEHOLDER_TITLE, ShowCommand, SwpFlags,
    SysCommand, Win32Api, WindowStyle, ZOrder,
};

use common::{backend, create, create_under, handle};

// ============================================================================
// Show / hide
// ============================================================================

#[test]
fn test_show_maps_window() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.take_events();

    backend.show(window, false);

    assert!(backend.is_mapped(window));
    assert!(api.is_window_visible(handle(&backend, window)));
    let events = backend.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        BackendEvent::StateChanged { window: w, changed, .. }
            if *w == window && *changed == WindowState::WITHDRAWN
    )));
}

#[test]
fn test_show_visible_window_again_does_nothing() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.show(window, false);
    api.clear_calls();
    backend.take_events();

    backend.show(window, false);

    assert!(api.calls().is_empty());
    assert!(backend.take_events().is_empty());
}

#[test]
fn test_hide_withdraws_window() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.show(window, false);
    api.clear_calls();

    backend.hide(window);

    assert!(!backend.is_mapped(window));
    assert!(!api.is_window_visible(h));
    let calls = api.calls_for(h);
    assert!(calls.contains(&OsCall::Validate(h)));
    assert!(calls.contains(&OsCall::ShowOwnedPopups {
        handle: h,
        show: false,
    }));
    assert!(calls.contains(&OsCall::ShowWindow {
        handle: h,
        command: ShowCommand::Hide,
    }));
}

#[test]
fn test_input_only_window_shown_without_activation() {
    let (api, mut backend) = backend();
    let host = create(&mut backend, WindowType::Toplevel, 400, 300);
    let window = create_under(
        &mut backend,
        host,
        WindowAttributes::new(WindowType::Child)
            .with_size(50, 50)
            .with_input_only(true)
            .with_focus_on_map(false),
    );
    let h = handle(&backend, window);
    assert!(backend.is_input_only(window));
    assert!(!backend.is_input_only(host));
    api.clear_calls();

    backend.show(window, false);

    let shown = api.calls_for(h).into_iter().any(|call| match call {
        OsCall::SetWindowPos { flags, .. } => {
            flags.contains(SwpFlags::SHOWWINDOW | SwpFlags::NOACTIVATE)
        }
        _ => false,
    });
    assert!(shown);
    assert_eq!(
        api.count_calls(|call| matches!(call, OsCall::ShowWindow { .. })),
        0
    );
}

// ============================================================================
// First-map placement
// ============================================================================

#[test]
fn test_first_map_uses_initial_position() {
    let (api, mut backend) = backend();
    api.set_default_position(200, 150);
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);

    backend.show(window, false);

    let rect = api.window_rect(handle(&backend, window)).unwrap();
    assert_eq!(rect.origin(), Point::new(200, 150));
}

#[test]
fn test_first_map_clamps_to_work_area() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.set_geometry_hints(window, &GeometryHints::new(), HintFlags::POS);
    backend.move_to(window, 1800, 1000);

    backend.show(window, false);

    let rect = api.window_rect(handle(&backend, window)).unwrap();
    assert_eq!(rect, Rect::from_origin_size(1504, 701, 416, 339));
}

#[test]
fn test_transient_centered_on_owner() {
    let (api, mut backend) = backend();
    let owner = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.show(owner, false);
    let dialog = create(&mut backend, WindowType::Toplevel, 200, 100);
    backend.set_transient_for(dialog, Some(owner));

    backend.show(dialog, false);

    let owner_rect = api.window_rect(handle(&backend, owner)).unwrap();
    let dialog_rect = api.window_rect(handle(&backend, dialog)).unwrap();
    assert_eq!(
        dialog_rect.left + dialog_rect.right,
        owner_rect.left + owner_rect.right
    );
    assert_eq!(
        dialog_rect.top + dialog_rect.bottom,
        owner_rect.top + owner_rect.bottom
    );
}

#[test]
fn test_splash_centered_on_monitor() {
    let (api, mut backend) = backend();
    let root = backend.root_window();
    let splash = create_under(
        &mut backend,
        root,
        WindowAttributes::new(WindowType::Toplevel)
            .with_size(400, 300)
            .with_type_hint(TypeHint::Splashscreen),
    );

    backend.show(splash, false);

    let rect = api.window_rect(handle(&backend, splash)).unwrap();
    assert!((rect.left + rect.right - 1920).abs() <= 1);
    assert!((rect.top + rect.bottom - 1080).abs() <= 1);
}

#[test]
fn test_override_redirect_skips_placement() {
    let (api, mut backend) = backend();
    api.set_default_position(200, 150);
    let root = backend.root_window();
    let window = create_under(
        &mut backend,
        root,
        WindowAttributes::new(WindowType::Toplevel)
            .with_position(40, 50)
            .with_size(100, 100)
            .with_override_redirect(true),
    );

    backend.show(window, false);

    let rect = api.window_rect(handle(&backend, window)).unwrap();
    assert_eq!(rect.origin(), Point::new(40, 50));
}

// ============================================================================
// Minimize / maximize
// ============================================================================

#[test]
fn test_unmapped_maximize_applies_on_show() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    api.clear_calls();

    backend.maximize(window);
    assert!(backend.state(window).unwrap().is_maximized());
    assert!(api.calls().is_empty());

    backend.show(window, false);
    assert!(api.is_zoomed(h));
    let state = backend.state(window).unwrap();
    assert!(state.is_maximized());
    assert!(state.is_mapped());
}

#[test]
fn test_unmapped_iconify_shows_minimized() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);

    backend.iconify(window);
    assert!(backend.state(window).unwrap().is_iconified());

    backend.show(window, false);
    assert!(api.calls_for(h).contains(&OsCall::ShowWindow {
        handle: h,
        command: ShowCommand::ShowMinNoActive,
    }));
    assert!(api.is_iconic(h));
    assert!(backend.is_mapped(window));
}

#[test]
fn test_iconify_keeps_other_window_active() {
    let (api, mut backend) = backend();
    let first = create(&mut backend, WindowType::Toplevel, 400, 300);
    let second = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.show(first, false);
    backend.show(second, false);
    let second_handle = handle(&backend, second);
    assert_eq!(api.active_window(), Some(second_handle));

    backend.iconify(first);

    assert!(backend.state(first).unwrap().is_iconified());
    assert_eq!(api.active_window(), Some(second_handle));
    assert!(api.calls().contains(&OsCall::SetActiveWindow(second_handle)));
}

#[test]
fn test_deiconify_restores_window() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.show(window, false);
    backend.iconify(window);
    assert!(api.is_iconic(handle(&backend, window)));

    backend.deiconify(window);

    assert!(!api.is_iconic(handle(&backend, window)));
    assert!(!backend.state(window).unwrap().is_iconified());
}

#[test]
fn test_maximize_and_unmaximize_mapped_window() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.show(window, false);
    let before = api.window_rect(h).unwrap();

    backend.maximize(window);
    assert!(backend.state(window).unwrap().is_maximized());
    assert_eq!(api.window_rect(h).unwrap(), Rect::new(0, 0, 1920, 1040));

    backend.unmaximize(window);
    assert!(!backend.state(window).unwrap().is_maximized());
    assert_eq!(api.window_rect(h).unwrap(), before);
}

#[test]
fn test_external_state_changes_are_reported() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.show(window, false);
    backend.take_events();

    api.set_min_max_externally(h, false, true);
    backend.process_notifications();

    assert!(backend.state(window).unwrap().is_maximized());
    let events = backend.take_events();
    assert!(events.iter().any(|event| matches!(
        event,
        BackendEvent::StateChanged { changed, .. } if *changed == WindowState::MAXIMIZED
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        BackendEvent::Configure { width: 1904, height: 1001, .. }
    )));
    assert!(events.contains(&BackendEvent::SurfaceInvalidated { window }));

    api.set_min_max_externally(h, true, false);
    backend.process_notifications();
    assert!(backend.state(window).unwrap().is_iconified());
}

#[test]
fn test_external_move_updates_geometry() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.take_events();

    api.move_externally(h, Rect::from_origin_size(300, 200, 416, 339));
    backend.process_notifications();

    assert_eq!(backend.geometry(window), Some((308, 231, 400, 300)));
    assert_eq!(
        backend.take_events(),
        vec![BackendEvent::Configure {
            window,
            x: 308,
            y: 231,
            width: 400,
            height: 300,
        }]
    );
}

// ============================================================================
// Fullscreen
// ============================================================================

#[test]
fn test_fullscreen_round_trip_restores_everything() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.set_geometry_hints(
        window,
        &GeometryHints::new().with_max_size(800, 600),
        HintFlags::MAX_SIZE,
    );
    backend.show(window, false);
    let rect = api.window_rect(h).unwrap();
    let style = api.get_style(h);

    backend.fullscreen(window);
    assert!(backend.state(window).unwrap().is_fullscreen());
    assert!(backend.fullscreen_snapshot(window).is_some());
    assert!(!backend.hint_flags(window).unwrap().contains(HintFlags::MAX_SIZE));
    assert_eq!(api.window_rect(h).unwrap(), Rect::new(0, 0, 1920, 1080));
    let fullscreen_style = api.get_style(h);
    assert!(fullscreen_style.contains(WindowStyle::POPUP));
    assert!(!fullscreen_style.intersects(WindowStyle::CAPTION | WindowStyle::THICKFRAME));

    backend.unfullscreen(window);
    assert!(!backend.state(window).unwrap().is_fullscreen());
    assert!(backend.fullscreen_snapshot(window).is_none());
    assert_eq!(backend.hint_flags(window), Some(HintFlags::MAX_SIZE));
    assert_eq!(api.window_rect(h).unwrap(), rect);
    assert_eq!(api.get_style(h), style);
    assert!(!api.get_ex_style(h).contains(ExStyle::TOPMOST));
}

#[test]
fn test_unmapped_fullscreen_applies_on_show() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);

    backend.fullscreen(window);
    assert!(backend.state(window).unwrap().is_fullscreen());
    assert_ne!(api.window_rect(h).unwrap(), Rect::new(0, 0, 1920, 1080));

    backend.show(window, false);
    assert!(api.is_window_visible(h));
    assert_eq!(api.window_rect(h).unwrap(), Rect::new(0, 0, 1920, 1080));
}

#[test]
fn test_fullscreen_window_ignores_placement() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.show(window, false);
    backend.fullscreen(window);
    api.clear_calls();

    backend.move_resize(window, 10, 10, 100, 100);
    backend.move_to(window, 10, 10);
    backend.resize(window, 100, 100);
    backend.fullscreen(window);

    assert!(api.calls().is_empty());
}

// ============================================================================
// Placement
// ============================================================================

#[test]
fn test_move_resize_honors_gravity() {
    for gravity in Gravity::ALL {
        let (api, mut backend) = backend();
        let window = create(&mut backend, WindowType::Toplevel, 400, 300);
        let h = handle(&backend, window);
        backend.set_geometry_hints(
            window,
            &GeometryHints::new().with_gravity(gravity),
            HintFlags::WIN_GRAVITY,
        );

        backend.move_resize(window, 500, 400, 400, 300);

        let rect = api.window_rect(h).unwrap();
        let client = api.client_to_screen(h, Point::new(0, 0)).unwrap();
        match gravity {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => {
                assert_eq!(rect.left, 500, "{gravity:?}")
            }
            Gravity::North | Gravity::Center | Gravity::South => {
                assert_eq!(rect.left + rect.width() / 2, 500 + 200, "{gravity:?}")
            }
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => {
                assert_eq!(rect.right, 500 + 400, "{gravity:?}")
            }
            Gravity::Static => assert_eq!(client.x, 500, "{gravity:?}"),
        }
        match gravity {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => {
                assert_eq!(rect.top, 400, "{gravity:?}")
            }
            Gravity::West | Gravity::Center | Gravity::East => {
                assert_eq!(rect.top + rect.height() / 2, 400 + 150, "{gravity:?}")
            }
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => {
                assert_eq!(rect.bottom, 400 + 300, "{gravity:?}")
            }
            Gravity::Static => assert_eq!(client.y, 400, "{gravity:?}"),
        }
    }
}

#[test]
fn test_resize_clamps_to_one_pixel() {
    let (_api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);

    backend.resize(window, 0, -5);

    let (_, _, width, height) = backend.geometry(window).unwrap();
    assert_eq!((width, height), (1, 1));
}

#[test]
fn test_child_move_resize_updates_cache() {
    let (api, mut backend) = backend();
    let host = create(&mut backend, WindowType::Toplevel, 400, 300);
    let child = create_under(
        &mut backend,
        host,
        WindowAttributes::new(WindowType::Child)
            .with_position(10, 10)
            .with_size(50, 50),
    );
    backend.take_events();

    backend.move_resize(child, 20, 30, 60, 40);

    assert_eq!(backend.geometry(child), Some((20, 30, 60, 40)));
    assert_eq!(
        api.window_rect(handle(&backend, child)).unwrap().width(),
        60
    );
    let events = backend.take_events();
    assert!(events.contains(&BackendEvent::SurfaceInvalidated { window: child }));
}

// ============================================================================
// Stacking and focus
// ============================================================================

#[test]
fn test_raise_falls_back_when_foreground_refused() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.show(window, false);

    api.set_foreground_allowed(false);
    api.clear_calls();
    backend.raise(window);
    let calls = api.calls_for(h);
    assert!(calls.contains(&OsCall::SetForegroundWindow(h)));
    assert!(calls.iter().any(|call| matches!(
        call,
        OsCall::SetWindowPos { insert_after: ZOrder::Top, .. }
    )));

    api.set_foreground_allowed(true);
    api.clear_calls();
    backend.raise(window);
    assert_eq!(api.calls_for(h), vec![OsCall::SetForegroundWindow(h)]);
}

#[test]
fn test_raise_temp_window_makes_it_topmost() {
    let (api, mut backend) = backend();
    let popup = create(&mut backend, WindowType::Temp, 100, 100);
    let h = handle(&backend, popup);
    api.clear_calls();

    backend.raise(popup);

    assert!(api.calls_for(h).iter().any(|call| matches!(
        call,
        OsCall::SetWindowPos { insert_after: ZOrder::Topmost, .. }
    )));
    assert_eq!(
        api.count_calls(|call| matches!(call, OsCall::SetForegroundWindow(_))),
        0
    );
}

#[test]
fn test_keep_above_and_below() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.show(window, false);

    backend.set_keep_above(window, true);
    assert!(backend.state(window).unwrap().is_above());
    assert!(api.get_ex_style(h).contains(ExStyle::TOPMOST));

    backend.set_keep_below(window, true);
    let state = backend.state(window).unwrap();
    assert!(state.is_below());
    assert!(!state.is_above());
    assert!(!api.get_ex_style(h).contains(ExStyle::TOPMOST));
}

#[test]
fn test_keep_above_applied_on_show() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);

    backend.set_keep_above(window, true);
    assert!(!api.get_ex_style(h).contains(ExStyle::TOPMOST));

    backend.show(window, false);
    assert!(api.get_ex_style(h).contains(ExStyle::TOPMOST));
}

#[test]
fn test_focus_shows_and_focuses() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);

    backend.focus(window);

    assert_eq!(api.focused(), Some(h));
    assert!(api.calls_for(h).contains(&OsCall::ShowWindow {
        handle: h,
        command: ShowCommand::ShowNormal,
    }));
}

// ============================================================================
// Policy inputs and appearance
// ============================================================================

#[test]
fn test_set_title_falls_back_to_placeholder() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 100, 100);
    let h = handle(&backend, window);

    backend.set_title(window, "Editor");
    assert_eq!(api.title_of(h).as_deref(), Some("Editor"));

    backend.set_title(window, "");
    assert_eq!(backend.title(window), Some(PLACEHOLDER_TITLE));
    assert_eq!(api.title_of(h).as_deref(), Some(PLACEHOLDER_TITLE));
}

#[test]
fn test_removing_decorations_keeps_client_area() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);
    backend.show(window, false);
    let origin = api.client_to_screen(h, Point::new(0, 0)).unwrap();

    backend.set_decorations(window, Decorations::empty());

    let style = api.get_style(h);
    assert!(!style.intersects(WindowStyle::CAPTION | WindowStyle::THICKFRAME | WindowStyle::SYSMENU));
    assert_eq!(api.client_rect(h).unwrap(), Rect::new(0, 0, 400, 300));
    assert_eq!(api.client_to_screen(h, Point::new(0, 0)).unwrap(), origin);
    assert_eq!(backend.get_decorations(window), Some(Decorations::empty()));
}

#[test]
fn test_fixed_size_hints_drop_resize_frame() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    let h = handle(&backend, window);

    backend.set_geometry_hints(
        window,
        &GeometryHints::new().with_min_size(400, 300).with_max_size(400, 300),
        HintFlags::MIN_SIZE | HintFlags::MAX_SIZE,
    );

    let style = api.get_style(h);
    assert!(!style.contains(WindowStyle::THICKFRAME));
    assert!(!style.contains(WindowStyle::MAXIMIZEBOX));
    assert!(style.contains(WindowStyle::CAPTION));
    assert_eq!(api.client_rect(h).unwrap(), Rect::new(0, 0, 400, 300));
}

#[test]
fn test_utility_hint_uses_tool_window() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    let h = handle(&backend, window);

    backend.set_type_hint(window, TypeHint::Utility);
    assert!(api.get_ex_style(h).contains(ExStyle::TOOLWINDOW));

    backend.set_type_hint(window, TypeHint::Normal);
    assert!(!api.get_ex_style(h).contains(ExStyle::TOOLWINDOW));
}

#[test]
fn test_set_functions_updates_system_menu() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    let h = handle(&backend, window);

    backend.set_functions(window, Functions::CLOSE);

    assert!(api.menu_item_enabled(h, SysCommand::Close));
    assert!(!api.menu_item_enabled(h, SysCommand::Size));
    assert!(!api.menu_item_enabled(h, SysCommand::Maximize));
    assert_eq!(backend.get_functions(window), Some(Functions::CLOSE));

    backend.set_functions(window, Functions::ALL | Functions::MAXIMIZE);
    assert!(api.menu_item_enabled(h, SysCommand::Size));
    assert!(!api.menu_item_enabled(h, SysCommand::Maximize));
}

#[test]
fn test_opacity_applies_to_toplevels_only() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    let h = handle(&backend, window);

    assert_eq!(backend.opacity(window), Some(1.0));
    backend.set_opacity(window, 0.5);
    assert_eq!(api.alpha_of(h), Some(127));
    assert_eq!(backend.opacity(window), Some(0.5));
    assert!(api.get_ex_style(h).contains(ExStyle::LAYERED));

    backend.set_opacity(window, 2.0);
    assert_eq!(api.alpha_of(h), Some(255));
    assert_eq!(backend.opacity(window), Some(1.0));

    let child = create_under(
        &mut backend,
        window,
        WindowAttributes::new(WindowType::Child).with_size(10, 10),
    );
    backend.set_opacity(child, 0.5);
    assert_eq!(api.alpha_of(handle(&backend, child)), None);
}

#[test]
fn test_icons_are_owned_by_the_window() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    let h = handle(&backend, window);

    backend.set_icons(window, Some(IconHandle(0x500)), Some(IconHandle(0x501)));
    backend.set_icons(window, Some(IconHandle(0x600)), Some(IconHandle(0x601)));
    assert_eq!(api.icons_of(h), (Some(IconHandle(0x600)), Some(IconHandle(0x601))));

    let destroyed = |api: &casement_win32::testing::MockWin32, icon: IconHandle| {
        api.count_calls(|call| *call == OsCall::DestroyIcon(icon))
    };
    assert_eq!(destroyed(&api, IconHandle(0x500)), 1);
    assert_eq!(destroyed(&api, IconHandle(0x501)), 1);
    assert_eq!(destroyed(&api, IconHandle(0x600)), 0);

    backend.destroy_window(window);
    assert_eq!(destroyed(&api, IconHandle(0x600)), 1);
    assert_eq!(destroyed(&api, IconHandle(0x601)), 1);

    // One handle in both slots is destroyed once.
    let shared = create(&mut backend, WindowType::Toplevel, 200, 200);
    backend.set_icons(shared, Some(IconHandle(0x700)), Some(IconHandle(0x700)));
    backend.set_icons(shared, Some(IconHandle(0x800)), Some(IconHandle(0x800)));
    assert_eq!(destroyed(&api, IconHandle(0x700)), 1);

    backend.destroy_window(shared);
    assert_eq!(destroyed(&api, IconHandle(0x800)), 1);
}

#[test]
fn test_set_cursor() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    let h = handle(&backend, window);

    backend.set_cursor(window, Some(CursorHandle(0x78)));
    assert_eq!(api.cursor_of(h), Some(CursorHandle(0x78)));
}

// ============================================================================
// Device contexts
// ============================================================================

#[test]
fn test_dc_lease_is_shared_and_counted() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    let h = handle(&backend, window);

    let first = backend.acquire_dc(window).expect("no dc");
    let second = backend.acquire_dc(window).expect("no dc");
    assert_eq!(first, second);
    assert_eq!(backend.dc_count(window), 2);
    assert_eq!(api.count_calls(|call| *call == OsCall::GetDc(h)), 1);

    assert!(backend.select_dc_bitmap(window, BitmapHandle(0xB1)));

    backend.release_dc(window);
    assert_eq!(api.outstanding_dcs(), 1);

    backend.release_dc(window);
    assert_eq!(api.outstanding_dcs(), 0);
    assert_eq!(backend.dc_count(window), 0);
    let calls = api.calls();
    assert!(calls.contains(&OsCall::SelectBitmap {
        dc: first,
        bitmap: BitmapHandle(0xB000),
    }));
    assert_eq!(
        api.count_calls(|call| matches!(call, OsCall::ReleaseDc { .. })),
        1
    );
}

#[test]
fn test_destroy_drops_outstanding_dc() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 200);
    backend.acquire_dc(window).expect("no dc");

    backend.destroy_window(window);

    assert_eq!(api.outstanding_dcs(), 0);
}
