/// The fixed action set
pub mod action;

/// Agent contract and operating modes
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Episode and training loop
pub mod engine;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Reference environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use action::Action;
pub use agent::{Agent, Mode};
pub use engine::{Engine, EngineConfig, EpisodeSummary, Status};
pub use env::{AgentId, Environment};
pub use error::{Error, Result};
