use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use carousel::topics::RUN_AFTER;
use carousel::{Carousel, Command, Error, Extensions, Settings, Subscription};

use crate::{Autoplay, Breakpoints, Key, Pointer, Release, Swipe, command_for_key, topics};

/// A framework-neutral controller that wraps a `carousel::Carousel` and provides common
/// adapter workflows (autoplay, keyboard, swipe, responsive settings).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_size` when the viewport is measured or resized
/// - `on_key` / `on_pointer_*` / `on_hover` when UI events occur
/// - `tick(now_ms)` each frame/timer tick (transition hooks and autoplay)
///
/// Render from `carousel().transform()` and `carousel().transition()`.
pub struct Controller {
    carousel: Carousel,
    base: Settings,
    breakpoints: Breakpoints,
    autoplay: Option<Autoplay>,
    swipe: Option<Swipe>,
    viewport_width: Option<f32>,
    run_settled: Rc<Cell<bool>>,
    subscription: Subscription,
}

impl Controller {
    pub fn new(settings: Settings, count: usize) -> Self {
        Self::from_carousel(Carousel::new(settings, count))
    }

    pub fn from_carousel(carousel: Carousel) -> Self {
        let run_settled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&run_settled);
        let subscription = carousel.on(RUN_AFTER, move |_| flag.set(true));

        let base = carousel.settings();
        Self {
            autoplay: Autoplay::from_settings(&base),
            carousel,
            base,
            breakpoints: Breakpoints::new(),
            swipe: None,
            viewport_width: None,
            run_settled,
            subscription,
        }
    }

    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self.apply_settings();
        self
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Detaches the controller, returning the carousel it drove.
    pub fn into_carousel(self) -> Carousel {
        self.subscription.unsubscribe();
        self.carousel
    }

    /// The settings before breakpoints are applied.
    pub fn base_settings(&self) -> &Settings {
        &self.base
    }

    pub fn autoplay(&self) -> Option<&Autoplay> {
        self.autoplay.as_ref()
    }

    /// Mounts the carousel and starts autoplay (if configured).
    pub fn mount(&mut self, extensions: Extensions, now_ms: u64) -> Vec<Error> {
        let skipped = self.carousel.mount(extensions);
        self.play(now_ms);
        skipped
    }

    /// Updates the base settings and re-applies the matching breakpoint.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut Settings)) {
        f(&mut self.base);
        self.apply_settings();
    }

    pub fn on_viewport_size(&mut self, viewport_width: f32) {
        self.viewport_width = Some(viewport_width);
        self.apply_settings();
    }

    fn apply_settings(&mut self) {
        let width = self.viewport_width.unwrap_or(f32::INFINITY);
        let next = self.breakpoints.resolve(&self.base, width);
        if next != self.carousel.settings() {
            adebug!(
                viewport_width = width,
                breakpoint = ?self.breakpoints.matching(width),
                "Controller: applying settings"
            );
            self.sync_autoplay(&next);
            self.carousel.set_settings(next);
        }
        if let Some(width) = self.viewport_width {
            self.carousel.measure(width);
        }
    }

    fn sync_autoplay(&mut self, settings: &Settings) {
        let Some(interval_ms) = settings.autoplay else {
            self.autoplay = None;
            return;
        };
        match &mut self.autoplay {
            Some(autoplay) => {
                autoplay.interval_ms = interval_ms.max(1);
                autoplay.hoverpause = settings.hoverpause;
            }
            None => {
                let mut autoplay = Autoplay::new(interval_ms, settings.hoverpause);
                if self.carousel.is_mounted() {
                    autoplay.start(self.carousel.now_ms());
                }
                self.autoplay = Some(autoplay);
            }
        }
    }

    /// Advances the controller.
    ///
    /// Fires the carousel's due transition hooks, then steps autoplay if it is due. The autoplay
    /// interval restarts whenever a run completes. Returns the number of hooks fired.
    pub fn tick(&mut self, now_ms: u64) -> usize {
        let fired = self.carousel.tick(now_ms);

        let mut step = false;
        if let Some(autoplay) = &mut self.autoplay {
            if self.run_settled.replace(false) {
                autoplay.restart(now_ms);
            }
            step = autoplay.poll(now_ms);
        }
        if step {
            self.step_autoplay();
        }
        fired
    }

    fn step_autoplay(&self) {
        let command = self.carousel.resolve(Command::next());
        match self.carousel.go(command) {
            Ok(true) => self.carousel.bus().emit(topics::AUTOPLAY),
            Ok(false) | Err(_) => {
                atrace!("autoplay: carousel busy, skipping step");
            }
        }
    }

    /// Starts (or restarts) autoplay. No-op when the settings turn it off.
    pub fn play(&mut self, now_ms: u64) {
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.start(now_ms);
        }
    }

    pub fn pause(&mut self) {
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.stop();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.autoplay.is_some_and(|a| a.is_running())
    }

    pub fn on_hover(&mut self, hovered: bool, now_ms: u64) {
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.set_hovered(hovered, now_ms);
        }
    }

    /// Runs the movement mapped to `key`.
    ///
    /// Returns `Ok(false)` when keyboard navigation is off or the carousel is busy.
    pub fn on_key(&mut self, key: Key) -> Result<bool, Error> {
        let settings = self.carousel.settings();
        if !settings.keyboard {
            return Ok(false);
        }
        self.carousel.go(command_for_key(key, settings.direction))
    }

    /// Starts a swipe. Returns `false` when swiping is off for this pointer kind.
    pub fn on_pointer_down(&mut self, x: f32, y: f32, pointer: Pointer, now_ms: u64) -> bool {
        let Some(swipe) = Swipe::begin(x, y, pointer, &self.carousel.settings()) else {
            return false;
        };
        self.swipe = Some(swipe);
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.set_dragging(true, now_ms);
        }
        self.carousel.bus().emit(topics::SWIPE_START);
        true
    }

    /// Drags the track along with the pointer.
    ///
    /// Returns `false` when no swipe is in progress or the gesture is too steep.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Some(swipe) = self.swipe else {
            return false;
        };
        let Some(nudge) = swipe.nudge(x, y, &self.carousel.settings()) else {
            return false;
        };
        self.carousel.nudge(nudge);
        self.carousel.bus().emit(topics::SWIPE_MOVE);
        true
    }

    /// Ends a swipe: runs the resolved movement, or animates back when the swipe was too
    /// short, too steep, or the carousel was busy.
    ///
    /// Returns `Ok(true)` when a run was performed.
    pub fn on_pointer_up(&mut self, x: f32, y: f32, now_ms: u64) -> Result<bool, Error> {
        let Some(swipe) = self.swipe.take() else {
            return Ok(false);
        };

        let result = match swipe.release(x, y, &self.carousel.settings()) {
            Release::Run(command) => self.carousel.go(command),
            Release::SnapBack => Ok(false),
        };
        if !matches!(result, Ok(true)) {
            self.carousel.snap_back();
        }

        if let Some(autoplay) = &mut self.autoplay {
            autoplay.set_dragging(false, now_ms);
        }
        self.carousel.bus().emit(topics::SWIPE_END);
        result
    }

    /// Abandons a swipe in progress and animates back.
    pub fn on_pointer_cancel(&mut self, now_ms: u64) {
        if self.swipe.take().is_none() {
            return;
        }
        self.carousel.snap_back();
        if let Some(autoplay) = &mut self.autoplay {
            autoplay.set_dragging(false, now_ms);
        }
        self.carousel.bus().emit(topics::SWIPE_END);
    }

    pub fn is_swiping(&self) -> bool {
        self.swipe.is_some()
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("carousel", &self.carousel)
            .field("breakpoints", &self.breakpoints)
            .field("autoplay", &self.autoplay)
            .field("swipe", &self.swipe)
            .field("viewport_width", &self.viewport_width)
            .finish_non_exhaustive()
    }
}
