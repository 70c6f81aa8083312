//! Window creation attributes.
//!
//! This module provides [`WindowAttributes`], the builder the widget layer
//! fills in when it asks a backend for a native window.

use crate::event::EventMask;
use crate::window_type::{TypeHint, WindowType};

/// An opaque native cursor handle.
///
/// The value is whatever the platform uses to identify a cursor (an `HCURSOR`
/// on Windows). Core code never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawCursor(pub usize);

/// Options for creating a native window.
///
/// # Example
///
/// ```
/// use casement_core::{TypeHint, WindowAttributes, WindowType};
///
/// let attributes = WindowAttributes::new(WindowType::Temp)
///     .with_position(40, 60)
///     .with_size(200, 120)
///     .with_type_hint(TypeHint::PopupMenu)
///     .with_override_redirect(true);
///
/// assert_eq!(attributes.position(), (40, 60));
/// assert!(attributes.override_redirect());
/// ```
#[derive(Debug, Clone)]
pub struct WindowAttributes {
    /// Structural window type.
    window_type: WindowType,
    /// Requested position relative to the parent.
    position: (i32, i32),
    /// Requested client size.
    size: (i32, i32),
    /// Window title; `None` falls back to the application name.
    title: Option<String>,
    /// Cursor to apply once the native window exists.
    cursor: Option<RawCursor>,
    /// Window-manager type hint.
    type_hint: TypeHint,
    /// Visual identifier. Accepted for API compatibility, not used.
    visual: Option<u32>,
    /// Whether the window manager should leave this window alone.
    override_redirect: bool,
    /// Events the window wants.
    event_mask: EventMask,
    /// Whether the window is input-only (never drawn).
    input_only: bool,
    /// Whether the window takes focus when first mapped.
    focus_on_map: bool,
    /// Whether the window accepts keyboard focus at all.
    accept_focus: bool,
}

impl WindowAttributes {
    /// Create attributes for a window of the given type.
    ///
    /// The size defaults to 1×1 and the position to the parent's origin.
    pub fn new(window_type: WindowType) -> Self {
        Self {
            window_type,
            position: (0, 0),
            size: (1, 1),
            title: None,
            cursor: None,
            type_hint: TypeHint::Normal,
            visual: None,
            override_redirect: false,
            event_mask: EventMask::empty(),
            input_only: false,
            focus_on_map: true,
            accept_focus: true,
        }
    }

    /// Set the requested position, relative to the parent window.
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    /// Set the requested client-area size.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = (width, height);
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the cursor.
    pub fn with_cursor(mut self, cursor: RawCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Set the type hint.
    pub fn with_type_hint(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = type_hint;
        self
    }

    /// Set the visual.
    pub fn with_visual(mut self, visual: u32) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Set override-redirect.
    ///
    /// Override-redirect windows skip automatic placement on first map.
    pub fn with_override_redirect(mut self, override_redirect: bool) -> Self {
        self.override_redirect = override_redirect;
        self
    }

    /// Set the event mask.
    pub fn with_event_mask(mut self, event_mask: EventMask) -> Self {
        self.event_mask = event_mask;
        self
    }

    /// Make the window input-only.
    pub fn with_input_only(mut self, input_only: bool) -> Self {
        self.input_only = input_only;
        self
    }

    /// Set whether the window takes focus when first mapped.
    pub fn with_focus_on_map(mut self, focus_on_map: bool) -> Self {
        self.focus_on_map = focus_on_map;
        self
    }

    /// Set whether the window accepts keyboard focus.
    pub fn with_accept_focus(mut self, accept_focus: bool) -> Self {
        self.accept_focus = accept_focus;
        self
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the window type.
    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    /// Get the requested position.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    /// Get the requested size.
    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    /// Get the title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Get the cursor.
    pub fn cursor(&self) -> Option<RawCursor> {
        self.cursor
    }

    /// Get the type hint.
    pub fn type_hint(&self) -> TypeHint {
        self.type_hint
    }

    /// Get the visual.
    pub fn visual(&self) -> Option<u32> {
        self.visual
    }

    /// Check if the window is override-redirect.
    pub fn override_redirect(&self) -> bool {
        self.override_redirect
    }

    /// Get the event mask.
    pub fn event_mask(&self) -> EventMask {
        self.event_mask
    }

    /// Check if the window is input-only.
    pub fn input_only(&self) -> bool {
        self.input_only
    }

    /// Check if the window takes focus when first mapped.
    pub fn focus_on_map(&self) -> bool {
        self.focus_on_map
    }

    /// Check if the window accepts keyboard focus.
    pub fn accept_focus(&self) -> bool {
        self.accept_focus
    }
}

impl Default for WindowAttributes {
    fn default() -> Self {
        Self::new(WindowType::Toplevel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_defaults() {
        let attributes = WindowAttributes::default();
        assert_eq!(attributes.window_type(), WindowType::Toplevel);
        assert_eq!(attributes.size(), (1, 1));
        assert_eq!(attributes.title(), None);
        assert!(attributes.focus_on_map());
        assert!(attributes.accept_focus());
        assert!(!attributes.override_redirect());
    }

    #[test]
    fn test_attributes_builder() {
        let attributes = WindowAttributes::new(WindowType::Child)
            .with_position(5, 7)
            .with_size(30, 40)
            .with_cursor(RawCursor(42))
            .with_event_mask(EventMask::EXPOSURE | EventMask::KEY_PRESS)
            .with_focus_on_map(false);

        assert_eq!(attributes.position(), (5, 7));
        assert_eq!(attributes.size(), (30, 40));
        assert_eq!(attributes.cursor(), Some(RawCursor(42)));
        assert!(attributes.event_mask().contains(EventMask::KEY_PRESS));
        assert!(!attributes.focus_on_map());
    }
}
