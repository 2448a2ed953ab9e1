use thiserror::Error;

/// Errors raised while constructing agents, engines, or worlds
///
/// Nothing in the step loop itself can fail: blocked moves, unseen states and
/// out-of-order `learn` calls are all ordinary outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid value for `{name}`: {value}. Must be in the interval {interval}.")]
    OutOfRange {
        name: &'static str,
        value: f32,
        interval: &'static str,
    },
    #[error("Position out of bounds: ({0}, {1})")]
    OutOfBounds(i32, i32),
    #[error("Position is blocked: ({0}, {1})")]
    Blocked(i32, i32),
    #[error("Invalid layout: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
