use crate::action::Action;

/// A stable handle identifying an agent registered with an [`Engine`](crate::engine::Engine)
///
/// Environments index their per-agent state by this handle rather than by the agent itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub usize);

impl AgentId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Represents a deterministic, discrete world in which one or more agents operate
///
/// The environment owns all of its state. Agents and the engine only ever see it
/// through the operations below.
pub trait Environment {
    /// A representation of the state of the environment visible to an agent
    type State;

    /// Get the current state visible to `agent`
    ///
    /// Agents seen for the first time are placed at the environment's starting state.
    fn observe(&mut self, agent: AgentId) -> Self::State;

    /// Apply `action` on behalf of `agent`
    ///
    /// **Returns** `(reward, terminal)`. The resulting state is available through a
    /// subsequent call to [`observe`](Environment::observe).
    fn step(&mut self, action: Action, agent: AgentId) -> (f32, bool);

    /// Restore episode-start conditions, leaving the static layout untouched
    fn reset(&mut self);

    /// Determine if the terminal condition is met
    fn is_terminal(&self) -> bool;

    /// Advance any dynamics that do not depend on agent actions
    ///
    /// Called once at the beginning of every step. Static worlds leave this as a no-op.
    fn tick(&mut self) {}
}
