use carousel::Settings;

/// Interval timer for adapter-driven autoplay.
///
/// The timer only tracks *when* the next `>` is due; the controller performs the run. It pauses
/// while a drag is in progress and, with `hoverpause`, while the pointer hovers the track.
/// Leaving a pause restarts the full interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Autoplay {
    pub interval_ms: u64,
    pub hoverpause: bool,
    started_ms: Option<u64>,
    hovered: bool,
    dragging: bool,
}

impl Autoplay {
    /// A stopped timer. `interval_ms` is at least 1.
    pub fn new(interval_ms: u64, hoverpause: bool) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            hoverpause,
            started_ms: None,
            hovered: false,
            dragging: false,
        }
    }

    /// `None` when the settings turn autoplay off.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        settings
            .autoplay
            .map(|interval_ms| Self::new(interval_ms, settings.hoverpause))
    }

    pub fn start(&mut self, now_ms: u64) {
        self.started_ms = Some(now_ms);
    }

    pub fn stop(&mut self) {
        self.started_ms = None;
    }

    /// Started and not paused.
    pub fn is_running(&self) -> bool {
        self.started_ms.is_some() && !self.is_paused()
    }

    pub fn is_started(&self) -> bool {
        self.started_ms.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.dragging || (self.hoverpause && self.hovered)
    }

    pub fn set_hovered(&mut self, hovered: bool, now_ms: u64) {
        let was_paused = self.is_paused();
        self.hovered = hovered;
        self.resume_if_unpaused(was_paused, now_ms);
    }

    pub fn set_dragging(&mut self, dragging: bool, now_ms: u64) {
        let was_paused = self.is_paused();
        self.dragging = dragging;
        self.resume_if_unpaused(was_paused, now_ms);
    }

    fn resume_if_unpaused(&mut self, was_paused: bool, now_ms: u64) {
        if was_paused && !self.is_paused() {
            self.restart(now_ms);
        }
    }

    /// Restarts the interval from `now_ms` if the timer is started.
    pub fn restart(&mut self, now_ms: u64) {
        if self.started_ms.is_some() {
            self.started_ms = Some(now_ms);
        }
    }

    /// When the next step is due, if the timer is running.
    pub fn due_ms(&self) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        self.started_ms
            .map(|start| start.saturating_add(self.interval_ms))
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.due_ms().is_some_and(|due| now_ms >= due)
    }

    /// Returns `true` (and starts the next interval) when a step is due.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.started_ms = Some(now_ms);
        true
    }
}
