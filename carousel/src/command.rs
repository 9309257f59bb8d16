//! Movement patterns: `>`, `<`, `>3`, `>>`, `<<`, `=2`, `|>`, `|<`.

use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;

use crate::{Error, TextDirection};

/// The leading token of a movement pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// `=`: jump to an absolute index.
    Absolute,
    /// `>`
    Forward,
    /// `<`
    Backward,
    /// `|`: move by a whole view (`per_view` items).
    Paginate,
}

impl Direction {
    pub fn token(self) -> char {
        match self {
            Self::Absolute => '=',
            Self::Forward => '>',
            Self::Backward => '<',
            Self::Paginate => '|',
        }
    }

    fn from_token(c: char) -> Option<Self> {
        match c {
            '=' => Some(Self::Absolute),
            '>' => Some(Self::Forward),
            '<' => Some(Self::Backward),
            '|' => Some(Self::Paginate),
            _ => None,
        }
    }
}

/// The magnitude part of a movement pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Steps {
    /// A number of steps, or the target index for [`Direction::Absolute`].
    ///
    /// `0` on a relative move means "one step".
    Count(usize),
    /// `>`: all the way to the end, or "forward" for [`Direction::Paginate`].
    ToEnd,
    /// `<`: all the way to the start, or "backward" for [`Direction::Paginate`].
    ToStart,
}

/// A parsed movement pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    pub direction: Direction,
    pub steps: Steps,
}

impl Command {
    pub const fn new(direction: Direction, steps: Steps) -> Self {
        Self { direction, steps }
    }

    /// `>`
    pub const fn next() -> Self {
        Self::new(Direction::Forward, Steps::Count(0))
    }

    /// `<`
    pub const fn prev() -> Self {
        Self::new(Direction::Backward, Steps::Count(0))
    }

    /// `=index`
    pub const fn to(index: usize) -> Self {
        Self::new(Direction::Absolute, Steps::Count(index))
    }

    /// `>>`
    pub const fn last() -> Self {
        Self::new(Direction::Forward, Steps::ToEnd)
    }

    /// `<<`
    pub const fn first() -> Self {
        Self::new(Direction::Backward, Steps::ToStart)
    }

    /// `|>`
    pub const fn next_page() -> Self {
        Self::new(Direction::Paginate, Steps::ToEnd)
    }

    /// `|<`
    pub const fn prev_page() -> Self {
        Self::new(Direction::Paginate, Steps::ToStart)
    }

    /// `true` for `>`, `>n`, `>>` and `|>`.
    pub fn is_forward(&self) -> bool {
        match self.direction {
            Direction::Forward => true,
            Direction::Paginate => self.steps == Steps::ToEnd,
            Direction::Absolute | Direction::Backward => false,
        }
    }

    /// `true` for `<`, `<n`, `<<` and `|<`.
    pub fn is_backward(&self) -> bool {
        match self.direction {
            Direction::Backward => true,
            Direction::Paginate => self.steps == Steps::ToStart,
            Direction::Absolute | Direction::Forward => false,
        }
    }

    /// `=` needs an index, `|` needs `>` or `<`, and `><` / `<>` mean nothing.
    pub fn is_well_formed(&self) -> bool {
        match (self.direction, self.steps) {
            (Direction::Absolute, Steps::Count(_)) => true,
            (Direction::Absolute, _) => false,
            (Direction::Paginate, Steps::Count(_)) => false,
            (Direction::Paginate, _) => true,
            (Direction::Forward, Steps::ToStart) | (Direction::Backward, Steps::ToEnd) => false,
            (Direction::Forward | Direction::Backward, _) => true,
        }
    }

    /// Swaps every `>` for `<` and vice versa. `=` patterns are returned unchanged.
    pub fn mirrored(self) -> Self {
        let direction = match self.direction {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            other => other,
        };
        let steps = match (self.direction, self.steps) {
            (Direction::Absolute, steps) => steps,
            (_, Steps::ToEnd) => Steps::ToStart,
            (_, Steps::ToStart) => Steps::ToEnd,
            (_, steps) => steps,
        };
        Self { direction, steps }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidCommand {
            pattern: pattern.to_string(),
        };

        let mut chars = pattern.chars();
        let direction = chars
            .next()
            .and_then(Direction::from_token)
            .ok_or_else(invalid)?;
        let rest = chars.as_str();

        let steps = match rest {
            "" => Steps::Count(0),
            ">" => Steps::ToEnd,
            "<" => Steps::ToStart,
            digits => Steps::Count(digits.parse().map_err(|_| invalid())?),
        };

        let command = Self { direction, steps };
        if !command.is_well_formed() {
            return Err(invalid());
        }
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.direction.token())?;
        match self.steps {
            Steps::Count(0) if self.direction != Direction::Absolute => Ok(()),
            Steps::Count(n) => write!(f, "{n}"),
            Steps::ToEnd => f.write_str(">"),
            Steps::ToStart => f.write_str("<"),
        }
    }
}

impl TextDirection {
    /// Rewrites a pattern for the writing direction.
    ///
    /// Gesture, keyboard and control collaborators call this before `run` so that "next" always
    /// follows the reading order: under RTL `>` becomes `<` and `|>` becomes `|<`.
    pub fn resolve(self, command: Command) -> Command {
        match self {
            Self::Ltr => command,
            Self::Rtl => command.mirrored(),
        }
    }
}

/// Sub-kinds accepted by [`crate::Carousel::is_offset_toward`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OffsetKind {
    /// The offset run was a `>` move.
    Forward,
    /// The offset run was a `<` move.
    Backward,
    /// The offset run was `|>`.
    PageForward,
    /// The offset run was `|<`.
    PageBackward,
}

impl OffsetKind {
    pub(crate) fn matches(self, command: &Command) -> bool {
        match self {
            Self::Forward => command.direction == Direction::Forward,
            Self::Backward => command.direction == Direction::Backward,
            Self::PageForward => {
                command.direction == Direction::Paginate && command.steps == Steps::ToEnd
            }
            Self::PageBackward => {
                command.direction == Direction::Paginate && command.steps == Steps::ToStart
            }
        }
    }
}
