use alloc::string::String;

use crate::{Error, Focus, Kind, PerSwipe, Peek, TextDirection};

pub const DEFAULT_TIMING_FUNC: &str = "cubic-bezier(0.165, 0.840, 0.440, 1.000)";

/// Configuration for [`crate::Carousel`].
///
/// Fields are public so adapters can tweak a clone and hand it back through
/// `Carousel::set_settings` / `Carousel::update_settings`. `per_view` and `focus_at` have
/// validating setters; writing the fields directly skips that check, and the engine falls back to
/// `per_view = 1` when it sees `0`.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`; missing fields take
/// their default values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    pub kind: Kind,
    /// Index of the item shown first.
    pub start_at: usize,
    /// Number of items visible at once. Must be at least 1.
    pub per_view: usize,
    pub focus_at: Focus,
    /// Space between items, in pixels.
    pub gap: f32,
    /// Stop at the last full page instead of leaving trailing empty space (slider only, and only
    /// when `focus_at` is not `Center`).
    pub bound: bool,
    /// Jump back to the other end when navigating past the first/last item (slider only).
    pub rewind: bool,
    /// Ignore navigation while a transition is running.
    pub wait_for_transition: bool,
    pub peek: Peek,
    pub direction: TextDirection,

    /// Duration of a regular move, in milliseconds.
    pub animation_duration: u64,
    /// Duration of a rewinding move, in milliseconds.
    pub rewind_duration: u64,
    /// Easing part of the transition descriptor (a CSS timing function).
    pub animation_timing_func: String,

    /// Minimum number of times the clone set is repeated in carousel mode.
    pub cloning_ratio: usize,

    /// Multiplier applied to drag distance while swiping.
    pub touch_ratio: f32,
    /// Maximum swipe angle (degrees) still treated as horizontal.
    pub touch_angle: f32,
    /// Minimum touch swipe distance that commits a move. `None` disables touch swiping.
    pub swipe_threshold: Option<f32>,
    /// Minimum mouse drag distance that commits a move. `None` disables mouse dragging.
    pub drag_threshold: Option<f32>,
    pub per_swipe: PerSwipe,

    /// Arrow-key navigation.
    pub keyboard: bool,
    /// Autoplay interval in milliseconds. `None` turns autoplay off.
    pub autoplay: Option<u64>,
    /// Pause autoplay while the pointer hovers the track.
    pub hoverpause: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kind: Kind::Slider,
            start_at: 0,
            per_view: 1,
            focus_at: Focus::Index(0),
            gap: 10.0,
            bound: false,
            rewind: true,
            wait_for_transition: true,
            peek: Peek::Uniform(0.0),
            direction: TextDirection::Ltr,
            animation_duration: 400,
            rewind_duration: 800,
            animation_timing_func: String::from(DEFAULT_TIMING_FUNC),
            cloning_ratio: 1,
            touch_ratio: 0.5,
            touch_angle: 45.0,
            swipe_threshold: Some(80.0),
            drag_threshold: Some(120.0),
            per_swipe: PerSwipe::One,
            keyboard: true,
            autoplay: None,
            hoverpause: true,
        }
    }
}

impl Settings {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn is_carousel(&self) -> bool {
        self.kind == Kind::Carousel
    }

    pub fn is_slider(&self) -> bool {
        self.kind == Kind::Slider
    }

    /// `per_view`, never less than 1.
    pub fn view_size(&self) -> usize {
        self.per_view.max(1)
    }

    pub fn set_per_view(&mut self, per_view: usize) -> Result<(), Error> {
        if per_view == 0 {
            return Err(Error::InvalidPerView);
        }
        self.per_view = per_view;
        Ok(())
    }

    /// Sets the focus from its textual form (`"center"` or an index).
    pub fn set_focus_at(&mut self, focus_at: &str) -> Result<(), Error> {
        self.focus_at = focus_at.parse()?;
        Ok(())
    }

    /// Checks the invariants that the public fields cannot enforce on their own.
    pub fn validate(&self) -> Result<(), Error> {
        if self.per_view == 0 {
            return Err(Error::InvalidPerView);
        }
        Ok(())
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_start_at(mut self, start_at: usize) -> Self {
        self.start_at = start_at;
        self
    }

    /// Sets `per_view`. A `0` is ignored (the previous value is kept).
    pub fn with_per_view(mut self, per_view: usize) -> Self {
        if self.set_per_view(per_view).is_err() {
            cwarn!(per_view, "Settings::with_per_view: ignoring zero per_view");
        }
        self
    }

    pub fn with_focus_at(mut self, focus_at: Focus) -> Self {
        self.focus_at = focus_at;
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_bound(mut self, bound: bool) -> Self {
        self.bound = bound;
        self
    }

    pub fn with_rewind(mut self, rewind: bool) -> Self {
        self.rewind = rewind;
        self
    }

    pub fn with_wait_for_transition(mut self, wait_for_transition: bool) -> Self {
        self.wait_for_transition = wait_for_transition;
        self
    }

    pub fn with_peek(mut self, peek: Peek) -> Self {
        self.peek = peek;
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_animation_duration(mut self, ms: u64) -> Self {
        self.animation_duration = ms;
        self
    }

    pub fn with_rewind_duration(mut self, ms: u64) -> Self {
        self.rewind_duration = ms;
        self
    }

    pub fn with_animation_timing_func(mut self, timing_func: impl Into<String>) -> Self {
        self.animation_timing_func = timing_func.into();
        self
    }

    pub fn with_cloning_ratio(mut self, cloning_ratio: usize) -> Self {
        self.cloning_ratio = cloning_ratio;
        self
    }

    pub fn with_touch_ratio(mut self, touch_ratio: f32) -> Self {
        self.touch_ratio = touch_ratio;
        self
    }

    pub fn with_touch_angle(mut self, touch_angle: f32) -> Self {
        self.touch_angle = touch_angle;
        self
    }

    pub fn with_swipe_threshold(mut self, threshold: Option<f32>) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: Option<f32>) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_per_swipe(mut self, per_swipe: PerSwipe) -> Self {
        self.per_swipe = per_swipe;
        self
    }

    pub fn with_keyboard(mut self, keyboard: bool) -> Self {
        self.keyboard = keyboard;
        self
    }

    pub fn with_autoplay(mut self, interval_ms: Option<u64>) -> Self {
        self.autoplay = interval_ms;
        self
    }

    pub fn with_hoverpause(mut self, hoverpause: bool) -> Self {
        self.hoverpause = hoverpause;
        self
    }
}
