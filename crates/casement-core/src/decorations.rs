//! Decoration and window-manager function sets.
//!
//! Both sets use the same convention for their `ALL` bit: when `ALL` is set,
//! every other bit in the set *removes* that element instead of adding it.
//! `Decorations::ALL | Decorations::MAXIMIZE` therefore means "everything
//! except the maximize button".

/// Window decorations the window manager draws.
///
/// # Example
///
/// ```
/// use casement_core::Decorations;
///
/// let decorations = Decorations::ALL | Decorations::MAXIMIZE;
/// assert!(decorations.has(Decorations::TITLE));
/// assert!(!decorations.has(Decorations::MAXIMIZE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decorations(u32);

impl Decorations {
    /// Every decoration, with the other bits inverted.
    pub const ALL: Decorations = Decorations(1 << 0);
    /// A window border.
    pub const BORDER: Decorations = Decorations(1 << 1);
    /// Resize handles.
    pub const RESIZEH: Decorations = Decorations(1 << 2);
    /// A title bar.
    pub const TITLE: Decorations = Decorations(1 << 3);
    /// A window menu.
    pub const MENU: Decorations = Decorations(1 << 4);
    /// A minimize button.
    pub const MINIMIZE: Decorations = Decorations(1 << 5);
    /// A maximize button.
    pub const MAXIMIZE: Decorations = Decorations(1 << 6);

    /// Check if the given decoration is effectively present.
    ///
    /// Takes the `ALL` inversion into account.
    pub fn has(&self, decoration: Decorations) -> bool {
        self.contains(Self::ALL) ^ self.contains(decoration)
    }
}

crate::flag_set_ops!(Decorations, u32);

/// Window-manager functions available to the user.
///
/// # Example
///
/// ```
/// use casement_core::Functions;
///
/// let functions = Functions::ALL | Functions::CLOSE;
/// assert!(functions.has(Functions::MOVE));
/// assert!(!functions.has(Functions::CLOSE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Functions(u32);

impl Functions {
    /// Every function, with the other bits inverted.
    pub const ALL: Functions = Functions(1 << 0);
    /// Interactive resizing.
    pub const RESIZE: Functions = Functions(1 << 1);
    /// Interactive moving.
    pub const MOVE: Functions = Functions(1 << 2);
    /// Minimizing.
    pub const MINIMIZE: Functions = Functions(1 << 3);
    /// Maximizing.
    pub const MAXIMIZE: Functions = Functions(1 << 4);
    /// Closing.
    pub const CLOSE: Functions = Functions(1 << 5);

    /// Check if the given function is effectively available.
    ///
    /// Takes the `ALL` inversion into account.
    pub fn has(&self, function: Functions) -> bool {
        self.contains(Self::ALL) ^ self.contains(function)
    }
}

impl Default for Functions {
    fn default() -> Self {
        Self::ALL
    }
}

crate::flag_set_ops!(Functions, u32);
