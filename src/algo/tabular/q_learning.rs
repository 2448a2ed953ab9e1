use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use strum::VariantArray;

use crate::{
    action::Action,
    agent::{Agent, Mode},
    error::Result,
    exploration::{Choice, EpsilonGreedy},
    util,
};

use super::{table::greedy, Hashable, QTable};

/// Configuration for the [`QLearner`]
#[derive(Debug, Clone, PartialEq)]
pub struct QLearnerConfig {
    /// Learning rate, in `(0,1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor, in `(0,1]`
    ///
    /// **Default**: `0.9`
    pub gamma: f32,
    /// Initial exploration probability, in `[epsilon_floor,1]`
    ///
    /// **Default**: `1.0`
    pub epsilon: f32,
    /// Lower bound epsilon decays towards, in `[0,1]`
    ///
    /// **Default**: `0.01`
    pub epsilon_floor: f32,
    /// Seed for the exploration RNG. Seeded from system entropy when `None`.
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for QLearnerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 1.0,
            epsilon_floor: 0.01,
            seed: None,
        }
    }
}

/// A Q-learning agent that utilizes a Q-table to learn its environment
///
/// The table persists across episodes for the lifetime of the agent; only the
/// pending transition context is cleared between episodes.
///
/// ### Generics
/// - `S` - The state type, which must be `Copy`, `Eq`, and `Hash` to be used as a table key
#[derive(Debug, Clone)]
pub struct QLearner<S: Hashable> {
    q_table: QTable<S>,
    exploration: EpsilonGreedy,
    alpha: f32, // learning rate
    gamma: f32, // discount factor
    mode: Mode,
    current: Option<S>,
    pending: Option<(S, Action)>,
    rng: StdRng,
}

impl<S: Hashable> QLearner<S> {
    /// Initialize a new `QLearner` with an empty table in [`Mode::Learning`]
    ///
    /// **Errors** if any hyperparameter lies outside its interval
    pub fn new(config: QLearnerConfig) -> Result<Self> {
        util::ensure_unit_open("alpha", config.alpha)?;
        util::ensure_unit_open("gamma", config.gamma)?;
        let exploration = EpsilonGreedy::new(config.epsilon, config.epsilon_floor)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            q_table: QTable::new(),
            exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            mode: Mode::Learning,
            current: None,
            pending: None,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable<S> {
        &self.q_table
    }

    pub fn exploration(&self) -> &EpsilonGreedy {
        &self.exploration
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Greedy action for `state` according to the current table, without side effects
    pub fn policy(&self, state: &S) -> Action {
        self.q_table
            .row(state)
            .map_or(Action::VARIANTS[0], greedy)
    }
}

impl<S: Hashable> Agent<S> for QLearner<S> {
    fn observe(&mut self, state: S) {
        self.q_table.row_mut(state);
        self.current = Some(state);
    }

    fn act(&mut self) -> Option<Action> {
        let state = self.current?;
        let action = match self.exploration.choose(self.mode, &mut self.rng) {
            Choice::Explore => *Action::VARIANTS
                .choose(&mut self.rng)
                .unwrap_or(&Action::VARIANTS[0]),
            Choice::Exploit => greedy(self.q_table.row_mut(state)),
        };

        self.pending = Some((state, action));
        Some(action)
    }

    fn learn(&mut self, reward: f32, next_state: S) {
        let Some((state, action)) = self.pending.take() else {
            return;
        };
        if self.mode == Mode::Test {
            return;
        }

        self.q_table.row_mut(next_state);
        let max_next_q = self.q_table.max_value(&next_state);
        let q_value = &mut self.q_table.row_mut(state)[action.index()];
        *q_value += self.alpha * (reward + self.gamma * max_next_q - *q_value);
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("Switching agent mode from {:?} to {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn decay_epsilon(&mut self, factor: f32) {
        self.exploration.decay(factor);
    }

    fn epsilon(&self) -> Option<f32> {
        Some(self.exploration.epsilon())
    }

    fn start_episode(&mut self) {
        self.current = None;
        self.pending = None;
    }
}
