//! Tests for the modal stack as seen through the backend.

mod common;

use casement_core::WindowType;
use casement_win32::testing::OsCall;

use common::{backend, create, handle};

#[test]
fn test_mapped_modal_blocks_other_windows() {
    let (_api, mut backend) = backend();
    let main = create(&mut backend, WindowType::Toplevel, 400, 300);
    let dialog = create(&mut backend, WindowType::Toplevel, 200, 100);
    backend.show(main, false);
    backend.show(dialog, false);

    backend.set_modal_hint(dialog, true);

    assert!(backend.is_blocked(main));
    assert!(!backend.is_blocked(dialog));
    assert_eq!(backend.current_modal(), Some(dialog));

    backend.hide(dialog);
    assert!(!backend.is_blocked(main));
    assert_eq!(backend.current_modal(), None);
    assert!(backend.modal_stack().contains(dialog));
}

#[test]
fn test_unmapped_modal_does_not_block() {
    let (_api, mut backend) = backend();
    let main = create(&mut backend, WindowType::Toplevel, 400, 300);
    let dialog = create(&mut backend, WindowType::Toplevel, 200, 100);
    backend.show(main, false);

    backend.set_modal_hint(dialog, true);

    assert!(!backend.is_blocked(main));
    assert_eq!(backend.current_modal(), None);
}

#[test]
fn test_nested_modals() {
    let (_api, mut backend) = backend();
    let main = create(&mut backend, WindowType::Toplevel, 400, 300);
    let first = create(&mut backend, WindowType::Toplevel, 200, 100);
    let second = create(&mut backend, WindowType::Toplevel, 100, 50);
    for window in [main, first, second] {
        backend.show(window, false);
    }

    backend.set_modal_hint(first, true);
    backend.set_modal_hint(second, true);

    // Windows on the stack are never blocked themselves.
    assert!(backend.is_blocked(main));
    assert!(!backend.is_blocked(first));
    assert!(!backend.is_blocked(second));
    assert_eq!(backend.current_modal(), Some(second));

    backend.set_modal_hint(second, false);
    assert!(backend.is_blocked(second));
    assert!(backend.is_blocked(main));
    assert_eq!(backend.current_modal(), Some(first));
}

#[test]
fn test_destroy_removes_modal_entry() {
    let (_api, mut backend) = backend();
    let main = create(&mut backend, WindowType::Toplevel, 400, 300);
    let dialog = create(&mut backend, WindowType::Toplevel, 200, 100);
    backend.show(main, false);
    backend.show(dialog, false);
    backend.set_modal_hint(dialog, true);

    backend.destroy_window(dialog);

    assert!(backend.modal_stack().is_empty());
    assert!(!backend.is_blocked(main));
}

#[test]
fn test_modal_hint_raises_window() {
    let (api, mut backend) = backend();
    let dialog = create(&mut backend, WindowType::Toplevel, 200, 100);
    let h = handle(&backend, dialog);
    backend.show(dialog, false);
    api.clear_calls();

    backend.set_modal_hint(dialog, true);

    assert_eq!(api.calls_for(h), vec![OsCall::SetForegroundWindow(h)]);
    assert_eq!(backend.modal_stack().len(), 1);
}

#[test]
fn test_clearing_modal_hint_on_plain_window_does_nothing() {
    let (api, mut backend) = backend();
    let window = create(&mut backend, WindowType::Toplevel, 200, 100);
    api.clear_calls();

    backend.set_modal_hint(window, false);

    assert!(backend.modal_stack().is_empty());
    assert!(api.calls().is_empty());
}
