//! Window type definitions.
//!
//! Two orthogonal classifications describe a window:
//!
//! - [`WindowType`] is structural: where the window sits in the hierarchy and
//!   who owns its native resource.
//! - [`TypeHint`] is advisory: what role the window plays, which drives the
//!   decorations and placement a backend gives it.

/// The structural type of a window.
///
/// # Example
///
/// ```
/// use casement_core::WindowType;
///
/// assert!(WindowType::Toplevel.is_toplevel());
/// assert!(WindowType::Temp.is_toplevel());
/// assert!(!WindowType::Child.is_toplevel());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowType {
    /// The root window covering the whole virtual screen.
    ///
    /// There is exactly one per backend and it has no native window of its own.
    Root,

    /// A top-level window managed and decorated by the OS.
    #[default]
    Toplevel,

    /// A window nested inside another window's client area.
    Child,

    /// An undecorated, typically topmost window (menus, tooltips, popups).
    Temp,

    /// A native window created by someone else and adopted into the hierarchy.
    Foreign,
}

impl WindowType {
    /// Check if this type behaves as a top-level window.
    ///
    /// Child, foreign and root windows are not top-levels.
    pub fn is_toplevel(&self) -> bool {
        matches!(self, WindowType::Toplevel | WindowType::Temp)
    }

    /// Check if the backend owns the native resource for this type.
    pub fn owns_native(&self) -> bool {
        !matches!(self, WindowType::Root | WindowType::Foreign)
    }
}

impl std::fmt::Display for WindowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowType::Root => write!(f, "Root"),
            WindowType::Toplevel => write!(f, "Toplevel"),
            WindowType::Child => write!(f, "Child"),
            WindowType::Temp => write!(f, "Temp"),
            WindowType::Foreign => write!(f, "Foreign"),
        }
    }
}

/// The role a window plays, as a hint to the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeHint {
    /// A normal application window.
    #[default]
    Normal,
    /// A dialog window.
    Dialog,
    /// A torn-off menu.
    Menu,
    /// A torn-off toolbar.
    Toolbar,
    /// A splash screen shown during startup.
    Splashscreen,
    /// A utility window (palette, inspector).
    Utility,
    /// A dock or panel.
    Dock,
    /// A desktop background window.
    Desktop,
    /// A menu dropped down from a menu bar.
    DropdownMenu,
    /// A context menu.
    PopupMenu,
    /// A tooltip.
    Tooltip,
    /// A notification bubble.
    Notification,
    /// A combo box popup.
    Combo,
    /// A drag-and-drop icon.
    Dnd,
}

impl TypeHint {
    /// Check if this hint describes a menu-like popup.
    ///
    /// Temp windows with these hints get a drop shadow.
    pub fn is_menu(&self) -> bool {
        matches!(
            self,
            TypeHint::Menu | TypeHint::DropdownMenu | TypeHint::PopupMenu
        )
    }

    /// Check if this hint asks for a compact tool window frame.
    pub fn is_tool(&self) -> bool {
        matches!(self, TypeHint::Utility)
    }

    /// Check if windows with this hint get any decorations by default.
    pub fn has_decorations(&self) -> bool {
        !matches!(self, TypeHint::Dock | TypeHint::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_type_default() {
        assert_eq!(WindowType::default(), WindowType::Toplevel);
        assert_eq!(TypeHint::default(), TypeHint::Normal);
    }

    #[test]
    fn test_window_type_toplevel() {
        assert!(WindowType::Toplevel.is_toplevel());
        assert!(WindowType::Temp.is_toplevel());
        assert!(!WindowType::Child.is_toplevel());
        assert!(!WindowType::Foreign.is_toplevel());
        assert!(!WindowType::Root.is_toplevel());
    }

    #[test]
    fn test_window_type_owns_native() {
        assert!(WindowType::Toplevel.owns_native());
        assert!(WindowType::Child.owns_native());
        assert!(!WindowType::Foreign.owns_native());
        assert!(!WindowType::Root.owns_native());
    }

    #[test]
    fn test_type_hint_menu() {
        assert!(TypeHint::Menu.is_menu());
        assert!(TypeHint::DropdownMenu.is_menu());
        assert!(TypeHint::PopupMenu.is_menu());
        assert!(!TypeHint::Tooltip.is_menu());
        assert!(!TypeHint::Normal.is_menu());
    }

    #[test]
    fn test_type_hint_decorations() {
        assert!(TypeHint::Normal.has_decorations());
        assert!(TypeHint::Dialog.has_decorations());
        assert!(!TypeHint::Dock.has_decorations());
        assert!(!TypeHint::Desktop.has_decorations());
    }

    #[test]
    fn test_window_type_display() {
        assert_eq!(format!("{}", WindowType::Toplevel), "Toplevel");
        assert_eq!(format!("{}", WindowType::Foreign), "Foreign");
    }
}
