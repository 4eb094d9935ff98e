//! Window lifecycle states.

/// Lifecycle state of a [`Window`](crate::runtime::window::Window).
///
/// Semantics:
/// - `None` is the pre-initialization state only; a window never returns to it.
/// - The only legal cycle after initialization is
///   `Hidden -> Showing -> Visible -> Hiding -> Hidden -> ...`.
/// - Destruction leaves the state machine permanently; there is no terminal
///   variant because a destroyed window's scene object no longer exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowState {
    None,
    Hidden,
    Showing,
    Visible,
    Hiding,
}

impl WindowState {
    /// Whether the window belongs in the visible sequence.
    pub fn is_on_screen(self) -> bool {
        matches!(self, WindowState::Showing | WindowState::Visible)
    }

    /// Whether a hide sequence has started or finished.
    pub fn is_off_screen(self) -> bool {
        matches!(self, WindowState::Hiding | WindowState::Hidden)
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self::None
    }
}
