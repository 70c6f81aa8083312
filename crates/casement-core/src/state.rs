//! Window state bitmask.

/// The state of a window.
///
/// These are largely orthogonal bits rather than a single exclusive state: a
/// window can be iconified and maximized at once (it restores to maximized),
/// and `ABOVE`/`BELOW` are stacking preferences on top of everything else.
///
/// A window is *mapped* exactly when `WITHDRAWN` is clear.
///
/// # Example
///
/// ```
/// use casement_core::WindowState;
///
/// let state = WindowState::ICONIFIED | WindowState::MAXIMIZED;
/// assert!(state.is_mapped());
/// assert!(state.is_iconified());
/// assert!(!WindowState::WITHDRAWN.is_mapped());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowState(u32);

impl WindowState {
    /// The window is not shown.
    pub const WITHDRAWN: WindowState = WindowState(1 << 0);
    /// The window is minimized.
    pub const ICONIFIED: WindowState = WindowState(1 << 1);
    /// The window is maximized.
    pub const MAXIMIZED: WindowState = WindowState(1 << 2);
    /// The window covers its whole monitor without decorations.
    pub const FULLSCREEN: WindowState = WindowState(1 << 4);
    /// The window is kept above other windows.
    pub const ABOVE: WindowState = WindowState(1 << 5);
    /// The window is kept below other windows.
    pub const BELOW: WindowState = WindowState(1 << 6);

    /// Check if the window is mapped (not withdrawn).
    pub fn is_mapped(&self) -> bool {
        !self.contains(Self::WITHDRAWN)
    }

    /// Check if the window is iconified.
    pub fn is_iconified(&self) -> bool {
        self.contains(Self::ICONIFIED)
    }

    /// Check if the window is maximized.
    pub fn is_maximized(&self) -> bool {
        self.contains(Self::MAXIMIZED)
    }

    /// Check if the window is fullscreen.
    pub fn is_fullscreen(&self) -> bool {
        self.contains(Self::FULLSCREEN)
    }

    /// Check if the window is kept above others.
    pub fn is_above(&self) -> bool {
        self.contains(Self::ABOVE)
    }

    /// Check if the window is kept below others.
    pub fn is_below(&self) -> bool {
        self.contains(Self::BELOW)
    }

    /// Compute the state after clearing `unset` and then setting `set`.
    pub fn transition(&self, unset: WindowState, set: WindowState) -> WindowState {
        WindowState((self.0 & !unset.0) | set.0)
    }
}

crate::flag_set_ops!(WindowState, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_mapped_normal() {
        let state = WindowState::default();
        assert!(state.is_mapped());
        assert!(!state.is_iconified());
        assert!(state.is_empty());
    }

    #[test]
    fn test_transition() {
        let state = WindowState::WITHDRAWN | WindowState::ICONIFIED;
        let next = state.transition(WindowState::WITHDRAWN, WindowState::MAXIMIZED);
        assert!(next.is_mapped());
        assert!(next.is_iconified());
        assert!(next.is_maximized());
    }

    #[test]
    fn test_set_and_remove() {
        let mut state = WindowState::empty();
        state.set(WindowState::ABOVE, true);
        assert!(state.is_above());
        state.set(WindowState::ABOVE, false);
        assert!(!state.is_above());
        state.insert(WindowState::FULLSCREEN);
        state.remove(WindowState::FULLSCREEN);
        assert!(!state.is_fullscreen());
    }
}
