use carousel::{Command, PerSwipe, Settings};

/// The kind of pointer driving a swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pointer {
    /// Uses `swipe_threshold`.
    Touch,
    /// Uses `drag_threshold`.
    Mouse,
}

/// What to do when the pointer is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// The swipe went far enough: run this (already direction-resolved) command.
    Run(Command),
    /// Too short or too steep: animate back to the current index.
    SnapBack,
}

/// A single-pointer swipe in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swipe {
    pub start_x: f32,
    pub start_y: f32,
    pub pointer: Pointer,
}

/// Angle of the `(dx, dy)` vector against the horizontal axis, in degrees (`0..=90`).
pub fn swipe_angle(dx: f32, dy: f32) -> f32 {
    let hypotenuse = dx.hypot(dy);
    if hypotenuse == 0.0 {
        return 0.0;
    }
    (dy.abs() / hypotenuse).asin().to_degrees()
}

impl Swipe {
    /// Starts tracking a swipe.
    ///
    /// Returns `None` when swiping is turned off for this pointer kind (its threshold is `None`).
    pub fn begin(x: f32, y: f32, pointer: Pointer, settings: &Settings) -> Option<Self> {
        let swipe = Self {
            start_x: x,
            start_y: y,
            pointer,
        };
        swipe.threshold(settings)?;
        Some(swipe)
    }

    pub fn threshold(&self, settings: &Settings) -> Option<f32> {
        match self.pointer {
            Pointer::Touch => settings.swipe_threshold,
            Pointer::Mouse => settings.drag_threshold,
        }
    }

    pub fn delta(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.start_x, y - self.start_y)
    }

    /// The drag nudge for the pointer at `(x, y)`: the horizontal travel scaled by `touch_ratio`.
    ///
    /// `None` when the gesture is steeper than `touch_angle` (most likely a vertical scroll).
    pub fn nudge(&self, x: f32, y: f32, settings: &Settings) -> Option<f32> {
        let (dx, dy) = self.delta(x, y);
        if swipe_angle(dx, dy) >= settings.touch_angle {
            return None;
        }
        Some(dx * settings.touch_ratio)
    }

    /// Decides the outcome of a swipe released at `(x, y)`.
    ///
    /// Dragging towards the right goes back one item (or one view with [`PerSwipe::Page`]);
    /// the command is resolved for the writing direction.
    pub fn release(&self, x: f32, y: f32, settings: &Settings) -> Release {
        let (dx, dy) = self.delta(x, y);
        let Some(threshold) = self.threshold(settings) else {
            return Release::SnapBack;
        };
        if dx.abs() <= threshold || swipe_angle(dx, dy) >= settings.touch_angle {
            return Release::SnapBack;
        }

        let command = match (dx > 0.0, settings.per_swipe) {
            (true, PerSwipe::One) => Command::prev(),
            (true, PerSwipe::Page) => Command::prev_page(),
            (false, PerSwipe::One) => Command::next(),
            (false, PerSwipe::Page) => Command::next_page(),
        };
        Release::Run(settings.direction.resolve(command))
    }
}
