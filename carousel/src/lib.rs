//! A headless carousel / slider engine.
//!
//! For adapter-level utilities (autoplay, keyboard, swipe, breakpoints), see the
//! `carousel-adapter` crate.
//!
//! This crate focuses on the navigation core: the index state machine that interprets movement
//! patterns (`>`, `<`, `=2`, `>>`, `|>`, ...) and enforces the boundary / wrap-around policy,
//! the ordered transform chain that turns an index into a track translate, a small synchronous
//! event bus with a two-phase component mounter, and a fixed-delay transition hook.
//!
//! It is UI-agnostic. A TUI/GUI/web layer is expected to provide:
//! - the item count
//! - measured geometry (item width, viewport width, gap, clone padding)
//! - a clock (`Carousel::tick(now_ms)`)
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod bus;
mod carousel;
mod command;
mod error;
pub mod mount;
pub mod pipeline;
mod run;
mod settings;
mod sizes;
pub mod topics;
mod transition;
mod types;

#[cfg(test)]
mod tests;

pub use bus::{Event, EventBus, Subscription, Topics};
pub use carousel::{Carousel, Extensions, WeakCarousel};
pub use command::{Command, Direction, OffsetKind, Steps};
pub use error::{Error, Result};
pub use mount::{Component, Components, Factories, Instance};
pub use pipeline::{Pipeline, TransformStage};
pub use run::{NavigationState, Navigator, Step};
pub use settings::{DEFAULT_TIMING_FUNC, Settings};
pub use sizes::{Geometry, clones_per_side};
pub use transition::{Timers, Transition};
pub use types::{Focus, Kind, PerSwipe, Peek, TextDirection};
