//! The data types representing player input, as delivered by an [`IoSystem`](super::sys::IoSystem).

use super::XY;

/// A key which can be pressed in an [`Action`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Char(char),
    F(u8),
    Escape,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    Tab,
    Enter,
}

/// A mouse button which can be pressed or released in an [`Action`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// A single raw thing the player did, as the IO system saw it.
#[derive(Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Action {
    /// A key was pressed. Modifier keys aren't reported separately; see [`Action::Closed`] for ctrl-C.
    KeyPress { key: Key },
    /// A mouse button was pressed at the given grid position.
    MousePress { pos: XY, button: MouseButton },
    /// A mouse button was released at the given grid position.
    MouseRelease { pos: XY, button: MouseButton },
    /// The display wants to be redrawn, e.g. after a resize, maybe without any player input.
    Redraw,
    /// The player asked the program to end from outside the game, e.g. ctrl-C.
    Closed,
    /// Some input we don't understand, with a description of what it was.
    Unknown(String),
    /// Reading input hit some kind of error, with a description.
    Error(String),
}
