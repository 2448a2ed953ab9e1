use log::{debug, info, trace, warn};

use crate::{
    action::Action,
    agent::{Agent, Mode},
    env::{AgentId, Environment},
    error::Result,
    util,
};

/// Configuration for the [`Engine`]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Factor applied to every agent's epsilon after each training episode, in `(0,1]`
    ///
    /// **Default**: `0.99`
    pub epsilon_decay: f32,
    /// Step budget of the evaluation episode run by [`Engine::run_test`]
    ///
    /// **Default**: `100`
    pub test_max_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon_decay: 0.99,
            test_max_steps: 100,
        }
    }
}

/// Lifecycle of the current episode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Outcome of a single episode
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EpisodeSummary {
    /// Number of steps executed
    pub steps: u32,
    /// Sum of the rewards earned by all agents
    pub reward: f32,
    /// Whether the episode ended on a terminal state
    pub goal_reached: bool,
    /// Exploration rate of the first agent once the episode is over
    pub epsilon: Option<f32>,
}

/// Drives agents through an environment, one synchronous step at a time
///
/// ### Generics
/// - `E` - The [`Environment`] the agents act in
/// - `A` - The [`Agent`] type. Use `Box<dyn Agent<E::State>>` to mix agent kinds.
pub struct Engine<E, A>
where
    E: Environment,
    A: Agent<E::State>,
{
    env: E,
    agents: Vec<A>,
    config: EngineConfig,
    status: Status,
    summary: EpisodeSummary,
    trajectories: Vec<Vec<E::State>>,
}

impl<E, A> Engine<E, A>
where
    E: Environment,
    E::State: Clone,
    A: Agent<E::State>,
{
    /// Initialize an engine with the default configuration and no agents
    pub fn new(env: E) -> Self {
        Self {
            env,
            agents: Vec::new(),
            config: EngineConfig::default(),
            status: Status::Idle,
            summary: EpisodeSummary::default(),
            trajectories: Vec::new(),
        }
    }

    /// **Errors** if `epsilon_decay` is not in `(0,1]`
    pub fn with_config(env: E, config: EngineConfig) -> Result<Self> {
        util::ensure_unit_open("epsilon_decay", config.epsilon_decay)?;
        Ok(Self {
            config,
            ..Self::new(env)
        })
    }

    /// Register an agent. Agents act in registration order.
    pub fn add_agent(&mut self, agent: A) -> AgentId {
        self.agents.push(agent);
        self.trajectories.push(Vec::new());
        AgentId(self.agents.len() - 1)
    }

    pub fn agent(&self, id: AgentId) -> Option<&A> {
        self.agents.get(id.index())
    }

    pub fn agents(&self) -> &[A] {
        &self.agents
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Summary of the most recent episode
    pub fn last_summary(&self) -> EpisodeSummary {
        self.summary
    }

    /// States visited by `id` during the most recent episode, starting with its initial state
    pub fn trajectory(&self, id: AgentId) -> &[E::State] {
        self.trajectories
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.agents.iter_mut().for_each(|a| a.set_mode(mode));
    }

    /// Run one episode from the environment's current state
    ///
    /// Stops once the environment reports a terminal condition or `max_steps` steps have been executed.
    ///
    /// **Returns** whether the terminal condition was reached
    pub fn run_episode(&mut self, max_steps: u32) -> bool {
        self.status = Status::Running;
        self.summary = EpisodeSummary::default();
        self.agents.iter_mut().for_each(|a| a.start_episode());
        self.trajectories.iter_mut().for_each(|t| t.clear());

        while self.summary.steps < max_steps {
            if self.step() {
                self.summary.goal_reached = true;
                break;
            }
        }

        self.summary.epsilon = self.agents.first().and_then(|a| a.epsilon());
        self.status = Status::Finished;
        debug!(
            "Episode finished after {} steps (goal reached: {}, reward: {:.2})",
            self.summary.steps, self.summary.goal_reached, self.summary.reward
        );
        self.summary.goal_reached
    }

    /// Execute a single step of the observe → act → apply → learn protocol
    ///
    /// Every action is decided before any is applied, so no agent's move is visible to another
    /// agent's decision within the same step.
    ///
    /// **Returns** whether a terminal condition was reached
    fn step(&mut self) -> bool {
        self.env.tick();

        for (i, agent) in self.agents.iter_mut().enumerate() {
            let state = self.env.observe(AgentId(i));
            if self.trajectories[i].is_empty() {
                self.trajectories[i].push(state.clone());
            }
            agent.observe(state);
        }

        let actions: Vec<Option<Action>> = self.agents.iter_mut().map(|a| a.act()).collect();

        let mut terminal = false;
        let mut rewards = Vec::with_capacity(actions.len());
        for (i, action) in actions.into_iter().enumerate() {
            let Some(action) = action else {
                rewards.push(None);
                continue;
            };
            let (reward, done) = self.env.step(action, AgentId(i));
            trace!("Agent {i} took {action} for reward {reward}");
            self.summary.reward += reward;
            terminal |= done;
            rewards.push(Some(reward));
        }

        for (i, (agent, reward)) in self.agents.iter_mut().zip(rewards).enumerate() {
            let next_state = self.env.observe(AgentId(i));
            self.trajectories[i].push(next_state.clone());
            if let Some(reward) = reward {
                agent.learn(reward, next_state);
            }
        }

        self.summary.steps += 1;
        terminal || self.env.is_terminal()
    }

    /// Train all agents for `episodes` episodes, resetting the environment before each one
    /// and decaying exploration after each one
    pub fn run_training(&mut self, episodes: u32, max_steps: u32) -> Vec<EpisodeSummary> {
        self.set_mode(Mode::Learning);
        let decay = self.config.epsilon_decay;

        let mut summaries = Vec::with_capacity(episodes as usize);
        for episode in 0..episodes {
            self.env.reset();
            self.run_episode(max_steps);
            self.agents.iter_mut().for_each(|a| a.decay_epsilon(decay));
            self.summary.epsilon = self.agents.first().and_then(|a| a.epsilon());

            let summary = self.summary;
            info!(
                "Episode {}: {} in {} steps (epsilon: {:.3})",
                episode + 1,
                if summary.goal_reached { "success" } else { "failure" },
                summary.steps,
                summary.epsilon.unwrap_or(0.0)
            );
            summaries.push(summary);
        }

        if summaries.last().is_some_and(|s| !s.goal_reached) {
            warn!("Training ended with a failed episode");
        }
        summaries
    }

    /// Evaluate the learned policy: greedy actions, no updates, a fresh environment
    pub fn run_test(&mut self) -> EpisodeSummary {
        self.set_mode(Mode::Test);
        self.env.reset();
        self.run_episode(self.config.test_max_steps);
        self.summary
    }
}
