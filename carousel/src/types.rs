use core::fmt;
use core::str::FromStr;

use alloc::string::ToString;

use crate::Error;

/// Navigation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Kind {
    /// Bounded navigation that stops (or rewinds) at the first/last item.
    #[default]
    Slider,
    /// Looping navigation; the track is padded with clones to fake infinite wraparound.
    Carousel,
}

/// Where the current item sits inside the viewport.
///
/// With `feature = "serde"`, this is `"center"` or a bare slot number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "FocusRepr", into = "FocusRepr"))]
pub enum Focus {
    Center,
    /// Zero-based slot inside the viewport.
    Index(usize),
}

impl Focus {
    /// Numeric focus, with `Center` counting as `0`.
    ///
    /// This is what the bounded length reduction uses.
    pub fn index_or_zero(self) -> usize {
        match self {
            Self::Center => 0,
            Self::Index(i) => i,
        }
    }

    pub fn is_center(self) -> bool {
        matches!(self, Self::Center)
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl FromStr for Focus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("center") {
            return Ok(Self::Center);
        }
        s.parse::<usize>()
            .map(Self::Index)
            .map_err(|_| Error::InvalidFocus {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Center => f.write_str("center"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum FocusRepr {
    Index(usize),
    Name(alloc::string::String),
}

#[cfg(feature = "serde")]
impl TryFrom<FocusRepr> for Focus {
    type Error = Error;

    fn try_from(repr: FocusRepr) -> Result<Self, Self::Error> {
        match repr {
            FocusRepr::Index(i) => Ok(Self::Index(i)),
            FocusRepr::Name(name) => name.parse(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<Focus> for FocusRepr {
    fn from(focus: Focus) -> Self {
        match focus {
            Focus::Center => Self::Name("center".to_string()),
            Focus::Index(i) => Self::Index(i),
        }
    }
}

/// Inset revealing a sliver of the neighbouring items.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Peek {
    Uniform(f32),
    Split { before: f32, after: f32 },
}

impl Peek {
    pub fn before(self) -> f32 {
        match self {
            Self::Uniform(v) => v,
            Self::Split { before, .. } => before,
        }
    }

    pub fn after(self) -> f32 {
        match self {
            Self::Uniform(v) => v,
            Self::Split { after, .. } => after,
        }
    }

    /// Total width taken away from the viewport by the peek on both sides.
    pub fn reductor(self) -> f32 {
        self.before() + self.after()
    }

    pub fn is_zero(self) -> bool {
        self.before() == 0.0 && self.after() == 0.0
    }
}

impl Default for Peek {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

/// Writing direction of the track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

/// How far a completed swipe travels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PerSwipe {
    /// One item per swipe (`>` / `<`).
    #[default]
    One,
    /// A whole view per swipe (`|>` / `|<`).
    Page,
}
