//! Adapter utilities for the `carousel` crate.
//!
//! The `carousel` crate is UI-agnostic and focuses on navigation state, the translate pipeline
//! and event wiring. This crate provides small, framework-neutral helpers commonly needed by
//! adapters:
//!
//! - A `Controller` that owns a carousel and drives its clock
//! - Autoplay with hover / drag pausing
//! - Keyboard arrow mapping
//! - Single-pointer swipe resolution (drag nudge, thresholds, angle check)
//! - Breakpoint-based settings
//!
//! This crate is intentionally framework-agnostic (no DOM/egui bindings).
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod autoplay;
mod breakpoints;
mod controller;
mod keyboard;
mod swipe;


pub use autoplay::Autoplay;
pub use breakpoints::Breakpoints;
pub use controller::Controller;
pub use keyboard::{Key, command_for_key};
pub use swipe::{Pointer, Release, Swipe, swipe_angle};

/// Topic names published by the adapter on the carousel's bus.
pub mod topics {
    /// An autoplay step was accepted.
    pub const AUTOPLAY: &str = "autoplay";
    pub const SWIPE_START: &str = "swipe.start";
    pub const SWIPE_MOVE: &str = "swipe.move";
    pub const SWIPE_END: &str = "swipe.end";
}
