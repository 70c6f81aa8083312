//! Geometry hints.

/// Which fields of a [`GeometryHints`] are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HintFlags(u32);

impl HintFlags {
    /// The program chose the position.
    pub const POS: HintFlags = HintFlags(1 << 0);
    /// `min_width`/`min_height` are set.
    pub const MIN_SIZE: HintFlags = HintFlags(1 << 1);
    /// `max_width`/`max_height` are set.
    pub const MAX_SIZE: HintFlags = HintFlags(1 << 2);
    /// `base_width`/`base_height` are set.
    pub const BASE_SIZE: HintFlags = HintFlags(1 << 3);
    /// `min_aspect`/`max_aspect` are set.
    pub const ASPECT: HintFlags = HintFlags(1 << 4);
    /// `width_inc`/`height_inc` are set.
    pub const RESIZE_INC: HintFlags = HintFlags(1 << 5);
    /// `win_gravity` is set.
    pub const WIN_GRAVITY: HintFlags = HintFlags(1 << 6);
    /// The user chose the position.
    pub const USER_POS: HintFlags = HintFlags(1 << 7);
    /// The user chose the size.
    pub const USER_SIZE: HintFlags = HintFlags(1 << 8);
}

crate::flag_set_ops!(HintFlags, u32);

/// The reference point used when positioning a window.
///
/// With `NorthWest` the requested position is the window's top-left corner,
/// with `SouthEast` its bottom-right corner, and so on. `Static` positions the
/// client area instead of the decorated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
    Static,
}

impl Gravity {
    /// All gravity values, in declaration order.
    pub const ALL: [Gravity; 10] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
        Gravity::Static,
    ];
}

/// Size and placement constraints for a window.
///
/// Only the fields named by the accompanying [`HintFlags`] are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometryHints {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub base_width: i32,
    pub base_height: i32,
    pub width_inc: i32,
    pub height_inc: i32,
    pub min_aspect: f64,
    pub max_aspect: f64,
    pub win_gravity: Gravity,
}

impl GeometryHints {
    /// Create empty hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum size.
    pub fn with_min_size(mut self, width: i32, height: i32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Set the maximum size.
    pub fn with_max_size(mut self, width: i32, height: i32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    /// Set the window gravity.
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.win_gravity = gravity;
        self
    }

    /// Check if the minimum and maximum sizes are both set and equal.
    pub fn is_fixed_size(&self, flags: HintFlags) -> bool {
        flags.contains(HintFlags::MIN_SIZE | HintFlags::MAX_SIZE)
            && self.min_width == self.max_width
            && self.min_height == self.max_height
    }
}
