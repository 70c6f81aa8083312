//! Tests for root coordinates with multiple monitors.

mod common;

use casement_core::{NativeWindowBackend, Point, Rect, WindowAttributes, WindowType};
use casement_win32::testing::MockWin32;
use casement_win32::{MonitorInfo, Win32Api};

use common::{Backend, backend, backend_with, create, create_under, handle};

/// The primary monitor plus one to its left, reaching 200px higher.
fn left_monitor_setup() -> (MockWin32, Backend) {
    let api = MockWin32::new();
    api.set_monitors(vec![
        MonitorInfo {
            monitor: Rect::new(0, 0, 1920, 1080),
            work: Rect::new(0, 0, 1920, 1040),
        },
        MonitorInfo {
            monitor: Rect::new(-1280, -200, 0, 824),
            work: Rect::new(-1280, -200, 0, 824),
        },
    ]);
    backend_with(api)
}

#[test]
fn test_root_covers_virtual_screen() {
    let (_api, backend) = left_monitor_setup();

    assert_eq!(backend.root_offset(), Point::new(1280, 200));
    let root = backend.root_window();
    assert_eq!(backend.geometry(root), Some((0, 0, 3200, 1280)));
}

#[test]
fn test_root_coords_of_foreign_window() {
    let (api, mut backend) = left_monitor_setup();
    let foreign = api.create_test_window();
    let window = backend.adopt_foreign(foreign).expect("adopt failed");

    assert_eq!(backend.root_coords(window, 0, 0), Some(Point::new(1388, 331)));
    assert_eq!(backend.origin(window), Some(Point::new(1388, 331)));
    assert_eq!(backend.root_coords(window, 10, 5), Some(Point::new(1398, 336)));
    assert_eq!(
        backend.frame_extents(window),
        Some(Rect::new(1380, 300, 1700, 540))
    );
}

#[test]
fn test_toplevel_position_is_in_root_coordinates() {
    let (api, mut backend) = left_monitor_setup();
    let root = backend.root_window();
    let window = create_under(
        &mut backend,
        root,
        WindowAttributes::new(WindowType::Toplevel)
            .with_position(1380, 250)
            .with_size(400, 300),
    );
    let h = handle(&backend, window);

    assert_eq!(api.window_rect(h).unwrap().origin(), Point::new(100, 50));
    assert_eq!(backend.geometry(window), Some((1388, 281, 400, 300)));

    backend.move_to(window, 1280, 200);
    assert_eq!(api.window_rect(h).unwrap().origin(), Point::new(0, 0));
    assert_eq!(backend.geometry(window), Some((1288, 231, 400, 300)));
}

#[test]
fn test_child_frame_extents_match_toplevel() {
    let (_api, mut backend) = backend();
    let toplevel = create(&mut backend, WindowType::Toplevel, 400, 300);
    let child = create_under(
        &mut backend,
        toplevel,
        WindowAttributes::new(WindowType::Child)
            .with_position(10, 20)
            .with_size(50, 50),
    );
    let grandchild = create_under(
        &mut backend,
        child,
        WindowAttributes::new(WindowType::Child).with_size(5, 5),
    );

    let extents = backend.frame_extents(toplevel);
    assert!(extents.is_some());
    assert_eq!(backend.frame_extents(child), extents);
    assert_eq!(backend.frame_extents(grandchild), extents);
}

#[test]
fn test_child_origin_follows_parent() {
    let (_api, mut backend) = backend();
    let toplevel = create(&mut backend, WindowType::Toplevel, 400, 300);
    let child = create_under(
        &mut backend,
        toplevel,
        WindowAttributes::new(WindowType::Child)
            .with_position(10, 20)
            .with_size(50, 50),
    );
    let parent_origin = backend.origin(toplevel).unwrap();

    assert_eq!(
        backend.origin(child),
        Some(Point::new(parent_origin.x + 10, parent_origin.y + 20))
    );
}

#[test]
fn test_destroyed_window_has_no_coordinates() {
    let (_api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 400, 300);
    backend.destroy_window(window);

    assert_eq!(backend.root_coords(window, 0, 0), None);
    assert_eq!(backend.frame_extents(window), None);
}
