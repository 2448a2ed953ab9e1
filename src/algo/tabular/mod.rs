pub mod q_learning;
pub mod table;

pub use q_learning::{QLearner, QLearnerConfig};
pub use table::QTable;

/// A trait for state types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Hashable: Copy + Eq + std::hash::Hash {}

impl<T> Hashable for T where T: Copy + Eq + std::hash::Hash {}
