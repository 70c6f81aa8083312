//! Coordinate translation between client, window and root spaces.
//!
//! Three spaces are involved:
//!
//! - **client**: relative to a window's client area
//! - **window/screen**: the OS screen space, where window rectangles include
//!   the decorations
//! - **root**: screen space shifted so the top-left corner of the virtual
//!   screen is `(0, 0)`
//!
//! With monitors left of or above the primary one, screen coordinates go
//! negative; the root offset is what turns them into root coordinates:
//! `root = screen + offset`.

use casement_core::{GeometryHints, Gravity, HintFlags, Point, Rect};

use crate::api::{NativeHandle, OsResult, Win32Api};

/// The offset from screen to root coordinates for a set of monitors.
///
/// # Example
///
/// ```
/// use casement_core::{Point, Rect};
/// use casement_win32::geometry::root_offset;
///
/// let monitors = [
///     Rect::new(0, 0, 1920, 1080),
///     Rect::new(-1280, -200, 0, 824),
/// ];
/// assert_eq!(root_offset(&monitors), Point::new(1280, 200));
/// ```
pub fn root_offset(monitors: &[Rect]) -> Point {
    let left = monitors.iter().map(|m| m.left).min().unwrap_or(0);
    let top = monitors.iter().map(|m| m.top).min().unwrap_or(0);
    Point::new(-left, -top)
}

/// The bounding box of all monitors, in screen coordinates.
pub fn virtual_screen(monitors: &[Rect]) -> Rect {
    monitors
        .iter()
        .copied()
        .reduce(|a, b| {
            Rect::new(
                a.left.min(b.left),
                a.top.min(b.top),
                a.right.max(b.right),
                a.bottom.max(b.bottom),
            )
        })
        .unwrap_or_default()
}

/// Expand a client rectangle to the window rectangle for the window's
/// current style.
pub fn client_to_window_rect<A: Win32Api>(
    api: &A,
    handle: NativeHandle,
    rect: Rect,
) -> OsResult<Rect> {
    api.adjust_window_rect(rect, api.get_style(handle), api.get_ex_style(handle))
}

/// The decorated rectangle of a `width`×`height` client area placed at the
/// origin.
///
/// `left` and `top` come out negative by the frame thickness.
pub fn outer_rect<A: Win32Api>(
    api: &A,
    handle: NativeHandle,
    width: i32,
    height: i32,
) -> OsResult<Rect> {
    client_to_window_rect(api, handle, Rect::new(0, 0, width, height))
}

/// Shift a requested position so the gravity reference point of the window
/// frame lands where the same point of the client box would be.
///
/// `outer` is the decorated rectangle from [`outer_rect`] and `width`/`height`
/// the client size. Without [`HintFlags::WIN_GRAVITY`] the position is
/// returned unchanged.
pub fn adjust_for_gravity(
    outer: Rect,
    flags: HintFlags,
    hints: &GeometryHints,
    width: i32,
    height: i32,
    x: i32,
    y: i32,
) -> (i32, i32) {
    if !flags.contains(HintFlags::WIN_GRAVITY) {
        return (x, y);
    }

    let gravity = hints.win_gravity;
    let mut new_x = x;
    let mut new_y = y;

    match gravity {
        Gravity::North | Gravity::Center | Gravity::South => {
            new_x -= outer.width() / 2;
            new_x += width / 2;
        }
        Gravity::SouthEast | Gravity::East | Gravity::NorthEast => {
            new_x -= outer.width();
            new_x += width;
        }
        Gravity::Static => new_x += outer.left,
        _ => {}
    }

    match gravity {
        Gravity::West | Gravity::Center | Gravity::East => {
            new_y -= outer.height() / 2;
            new_y += height / 2;
        }
        Gravity::SouthWest | Gravity::South | Gravity::SouthEast => {
            new_y -= outer.height();
            new_y += height;
        }
        Gravity::Static => new_y += outer.top,
        _ => {}
    }

    tracing::trace!(
        target: casement_core::logging::targets::STYLE,
        ?gravity,
        x,
        y,
        new_x,
        new_y,
        "gravity adjustment"
    );
    (new_x, new_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 8px frame with a 23px caption.
    const OUTER: Rect = Rect::new(-8, -31, 408, 308);

    fn gravity_hints(gravity: Gravity) -> GeometryHints {
        GeometryHints::new().with_gravity(gravity)
    }

    #[test]
    fn test_gravity_ignored_without_flag() {
        let hints = gravity_hints(Gravity::SouthEast);
        assert_eq!(
            adjust_for_gravity(OUTER, HintFlags::empty(), &hints, 400, 300, 50, 60),
            (50, 60)
        );
    }

    #[test]
    fn test_gravity_north_west_unchanged() {
        let hints = gravity_hints(Gravity::NorthWest);
        assert_eq!(
            adjust_for_gravity(OUTER, HintFlags::WIN_GRAVITY, &hints, 400, 300, 50, 60),
            (50, 60)
        );
    }

    #[test]
    fn test_gravity_south_east() {
        let hints = gravity_hints(Gravity::SouthEast);
        let (x, y) = adjust_for_gravity(OUTER, HintFlags::WIN_GRAVITY, &hints, 400, 300, 50, 60);
        assert_eq!(x + OUTER.width(), 50 + 400);
        assert_eq!(y + OUTER.height(), 60 + 300);
    }

    #[test]
    fn test_gravity_static_places_client() {
        let hints = gravity_hints(Gravity::Static);
        let (x, y) = adjust_for_gravity(OUTER, HintFlags::WIN_GRAVITY, &hints, 400, 300, 50, 60);
        assert_eq!((x, y), (42, 29));
    }

    #[test]
    fn test_virtual_screen() {
        let monitors = [Rect::new(0, 0, 1920, 1080), Rect::new(1920, 100, 3200, 1124)];
        assert_eq!(virtual_screen(&monitors), Rect::new(0, 0, 3200, 1124));
        assert_eq!(root_offset(&monitors), Point::new(0, 0));
        assert_eq!(virtual_screen(&[]), Rect::default());
    }
}
