pub mod tabular;

pub use tabular::{QLearner, QLearnerConfig, QTable};
