use crate::action::Action;

/// Operating mode of an agent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Explore and update the value estimates
    #[default]
    Learning,
    /// Act greedily with a frozen policy
    Test,
}

/// An agent driven by the [`Engine`](crate::engine::Engine) through the
/// observe → act → learn cycle
///
/// ### Generics
/// - `S` - The state type produced by the environment the agent operates in
pub trait Agent<S> {
    /// Record the current state
    fn observe(&mut self, state: S);

    /// Choose an action for the most recently observed state
    ///
    /// **Returns** `None` if no state has been observed yet in this episode
    fn act(&mut self) -> Option<Action>;

    /// Close the loop on the last action with the reward it earned and the state it led to
    fn learn(&mut self, reward: f32, next_state: S);

    /// Switch between learning and evaluation
    fn set_mode(&mut self, mode: Mode);

    fn mode(&self) -> Mode;

    /// Called once per episode by the training driver. Agents that do not explore ignore it.
    fn decay_epsilon(&mut self, _factor: f32) {}

    /// Current exploration rate, if the agent has one
    fn epsilon(&self) -> Option<f32> {
        None
    }

    /// Forget any transition context carried over from a previous episode
    fn start_episode(&mut self) {}
}

impl<S, A: Agent<S> + ?Sized> Agent<S> for Box<A> {
    fn observe(&mut self, state: S) {
        (**self).observe(state)
    }

    fn act(&mut self) -> Option<Action> {
        (**self).act()
    }

    fn learn(&mut self, reward: f32, next_state: S) {
        (**self).learn(reward, next_state)
    }

    fn set_mode(&mut self, mode: Mode) {
        (**self).set_mode(mode)
    }

    fn mode(&self) -> Mode {
        (**self).mode()
    }

    fn decay_epsilon(&mut self, factor: f32) {
        (**self).decay_epsilon(factor)
    }

    fn epsilon(&self) -> Option<f32> {
        (**self).epsilon()
    }

    fn start_episode(&mut self) {
        (**self).start_episode()
    }
}
