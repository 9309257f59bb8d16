//! Transition descriptor and the fixed-delay completion hook.
//!
//! The engine never observes a real `transitionend`: [`Timers`] fires callbacks once the
//! caller-driven clock (see `Carousel::tick`) has moved past `now + duration`. A callback always
//! fires, whether or not anything was visibly animated.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// The `transition` descriptor applied to the track.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    disabled: bool,
    descriptor: String,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// `"{property} {duration}ms {timing_func}"`, with a zero duration while disabled.
    pub fn compose(&self, property: &str, duration_ms: u64, timing_func: &str) -> String {
        let duration_ms = if self.disabled { 0 } else { duration_ms };
        format!("{property} {duration_ms}ms {timing_func}")
    }

    /// Recomputes and stores the descriptor.
    pub fn set(&mut self, property: &str, duration_ms: u64, timing_func: &str) {
        self.descriptor = self.compose(property, duration_ms, timing_func);
    }

    /// Clears the descriptor.
    pub fn remove(&mut self) {
        self.descriptor.clear();
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

struct Timer {
    due_ms: u64,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// One-shot callbacks keyed by due time.
///
/// Callbacks are never cancelled or coalesced. Ties on the due time fire in scheduling order.
#[derive(Default)]
pub struct Timers {
    now_ms: u64,
    next_seq: u64,
    queue: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest time seen by [`Timers::advance`].
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedules `callback` to fire `delay_ms` after the current time.
    pub fn schedule(&mut self, delay_ms: u64, callback: impl FnOnce() + 'static) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(Timer {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            callback: Box::new(callback),
        });
    }

    /// Moves the clock forward. Going backwards is ignored.
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Removes and returns the earliest callback that is due, if any.
    ///
    /// The caller runs it after releasing any borrow of `self`, so the callback may schedule more.
    pub fn pop_due(&mut self) -> Option<Box<dyn FnOnce()>> {
        let pos = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due_ms <= self.now_ms)
            .min_by_key(|(_, timer)| (timer.due_ms, timer.seq))
            .map(|(pos, _)| pos)?;
        Some(self.queue.remove(pos).callback)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("now_ms", &self.now_ms)
            .field("pending", &self.queue.len())
            .finish()
    }
}
