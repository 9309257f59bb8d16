use alloc::string::String;

/// Configuration and usage errors reported by the engine.
///
/// None of these are fatal: the carousel logs them (with the `tracing` feature), leaves its state
/// untouched and keeps working. They are returned so callers can react if they want to.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The movement pattern could not be parsed (e.g. `"x"`, `"|3"`, `"=>"`).
    #[error("invalid direction pattern [{pattern}] has been used")]
    InvalidCommand { pattern: String },

    /// `per_view` must be at least 1.
    #[error("`per_view` must be at least 1")]
    InvalidPerView,

    /// An index outside `0..count` was assigned directly.
    #[error("index {index} is out of range for {count} items")]
    IndexOutOfRange { index: usize, count: usize },

    /// A focus position that cannot be parsed.
    #[error("invalid focus position [{value}], expected `center` or an index")]
    InvalidFocus { value: String },

    /// Two component factories were registered under the same name.
    #[error("component [{name}] is already mounted")]
    DuplicateComponent { name: String },

    /// A component factory refused to build its component.
    #[error("component [{name}] could not be created: {reason}")]
    ComponentFactory { name: String, reason: String },

    /// A transform stage produced NaN or an infinite value.
    #[error("transform stage [{stage}] produced a non-finite translate")]
    NonFiniteStage { stage: &'static str },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
