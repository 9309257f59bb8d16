use carousel::{Command, TextDirection};

/// Keys the keyboard helper understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

impl Key {
    /// Parses a DOM-style key name (`"ArrowLeft"`, `"Home"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" | "Left" => Some(Self::ArrowLeft),
            "ArrowRight" | "Right" => Some(Self::ArrowRight),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }
}

/// Maps a key to a movement.
///
/// Arrows move one item in the *visual* direction: under RTL the right arrow goes to the
/// previous item. `Home` / `End` jump to the first / last item.
pub fn command_for_key(key: Key, direction: TextDirection) -> Command {
    match key {
        Key::ArrowRight => direction.resolve(Command::next()),
        Key::ArrowLeft => direction.resolve(Command::prev()),
        Key::Home => Command::first(),
        Key::End => Command::last(),
    }
}
