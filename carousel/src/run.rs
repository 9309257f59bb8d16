//! The index state machine.
//!
//! [`Navigator`] is the pure part: given the current index, the settings and the item count it
//! computes where a [`Command`] lands and whether the move overflowed a boundary (an "offset
//! run"). [`crate::Carousel::run`] wraps it with suspension, events and the transition hook.

use crate::{Command, Direction, Settings, Steps};

/// The mutable navigation state owned by a carousel.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationState {
    /// Current zero-based index.
    pub index: usize,
    /// Set when the last run overflowed a boundary; cleared when its transition completes.
    pub offset: bool,
    /// The last accepted movement.
    pub last_move: Option<Command>,
    /// Navigation is suspended (a transition is in flight, or the owner disabled it).
    pub disabled: bool,
}

/// Outcome of [`Navigator::calculate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// The normalised index.
    pub index: usize,
    /// The raw index overflowed a boundary and had to be wrapped, rewound or clamped.
    pub offset: bool,
}

impl Step {
    fn settled(index: usize) -> Self {
        Self {
            index,
            offset: false,
        }
    }
}

/// Boundary policy for one carousel configuration.
#[derive(Clone, Copy, Debug)]
pub struct Navigator<'a> {
    settings: &'a Settings,
    count: usize,
}

impl<'a> Navigator<'a> {
    pub fn new(settings: &'a Settings, count: usize) -> Self {
        Self { settings, count }
    }

    /// Slider + `bound` + a numeric focus: the last page must not show trailing empty space.
    pub fn is_bound(&self) -> bool {
        self.settings.is_slider() && !self.settings.focus_at.is_center() && self.settings.bound
    }

    /// The last index navigation may settle on.
    ///
    /// `count - 1`, reduced by `per_view - 1` and shifted by the focus index when bound. Can be
    /// negative for an empty (or, when bound, too short) collection.
    pub fn last_index(&self) -> i64 {
        let last = widen(self.count) - 1;
        if self.is_bound() {
            let per_view = widen(self.settings.view_size());
            let focus = widen(self.settings.focus_at.index_or_zero());
            return last.saturating_sub(per_view - 1).saturating_add(focus);
        }
        last
    }

    pub fn is_start(&self, index: usize) -> bool {
        index == 0
    }

    pub fn is_end(&self, index: usize) -> bool {
        widen(index) >= self.last_index()
    }

    /// Computes where `command` lands when starting from `index`.
    ///
    /// `command` is expected to be well formed (see [`Command::is_well_formed`]); a malformed
    /// one leaves the index where it is.
    pub fn calculate(&self, index: usize, command: Command) -> Step {
        if self.count == 0 {
            return Step::settled(index);
        }

        match (command.direction, command.steps) {
            // Absolute jumps are not clamped here.
            (Direction::Absolute, Steps::Count(target)) => Step::settled(target),
            (Direction::Forward, Steps::ToEnd) => Step::settled(clamp(self.last_index())),
            (Direction::Backward, Steps::ToStart) => Step::settled(0),
            _ if command.is_forward() => {
                let size = self.view_size(command);
                let raw = self.forward_index(widen(index), size);
                Step {
                    index: self.normalize_forward(index, raw, size),
                    offset: raw > self.last_index(),
                }
            }
            _ if command.is_backward() => {
                let size = self.view_size(command);
                let raw = self.backward_index(widen(index), size);
                Step {
                    index: self.normalize_backward(index, raw, size),
                    offset: raw < 0,
                }
            }
            _ => Step::settled(index),
        }
    }

    fn view_size(&self, command: Command) -> i64 {
        match (command.direction, command.steps) {
            (Direction::Paginate, _) => widen(self.settings.view_size()),
            (_, Steps::Count(n)) => widen(n.max(1)),
            _ => 1,
        }
    }

    fn forward_index(&self, index: i64, size: i64) -> i64 {
        if self.settings.is_carousel() {
            return index.saturating_add(size);
        }
        // Round partial pages up to the next full page.
        index.saturating_add(size - index % size)
    }

    fn normalize_forward(&self, current: usize, raw: i64, size: i64) -> usize {
        let last = self.last_index();
        if raw <= last {
            return clamp(raw);
        }
        if self.settings.is_carousel() {
            return clamp(raw.rem_euclid(widen(self.count)));
        }
        if self.settings.rewind {
            // A bound length is not a page multiple: settle on it before rewinding.
            if self.is_bound() && !self.is_end(current) {
                return clamp(last);
            }
            return 0;
        }
        if self.is_bound() {
            return clamp(last);
        }
        clamp(last.div_euclid(size) * size)
    }

    fn backward_index(&self, index: i64, size: i64) -> i64 {
        if self.settings.is_carousel() {
            return index.saturating_sub(size);
        }
        // Step back from the page containing `index`, so back and forth paging agree.
        let view = index.saturating_add(size - 1).div_euclid(size);
        (view - 1).saturating_mul(size)
    }

    fn normalize_backward(&self, current: usize, raw: i64, size: i64) -> usize {
        if raw >= 0 {
            return clamp(raw);
        }
        if self.settings.is_carousel() {
            return clamp(raw.rem_euclid(widen(self.count)));
        }
        if self.settings.rewind {
            let last = self.last_index();
            if self.is_bound() && self.is_start(current) {
                return clamp(last);
            }
            return clamp(last.div_euclid(size) * size);
        }
        0
    }
}

fn clamp(index: i64) -> usize {
    usize::try_from(index.max(0)).unwrap_or(usize::MAX)
}

/// Step counts past `i64::MAX` saturate, so huge magnitudes still overflow the boundary.
pub(crate) fn widen(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
