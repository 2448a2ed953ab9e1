use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    str::FromStr,
};

use crate::{
    action::Action,
    env::{AgentId, Environment},
    error::{Error, Result},
};

/// Grid coordinates `(x, y)`, with `(0, 0)` in the north-west corner
pub type Pos = (i32, i32);

/// Reward scheme of a [`GridWorld`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rewards {
    /// Reward for an ordinary successful move
    ///
    /// **Default**: `-0.1`
    pub step: f32,
    /// Reward for moving onto the goal
    ///
    /// **Default**: `100.0`
    pub goal: f32,
    /// Reward for bumping into a wall or the edge of the grid
    ///
    /// **Default**: `-1.0`
    pub collision: f32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            step: -0.1,
            goal: 100.0,
            collision: -1.0,
        }
    }
}

const MAZE: &str = "\
########
#S..#..#
###.#.##
#......#
#.####.#
#....#G#
########";

/// A deterministic rectangular grid with static walls and a single goal cell
///
/// Moves that would leave the grid or enter a wall are rejected: the agent stays
/// put and receives the collision penalty.
///
/// Layouts can be parsed from ASCII art, one character per cell:
/// `.` open, `#` wall, `S` start, `G` goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    width: i32,
    height: i32,
    walls: HashSet<Pos>,
    start: Pos,
    goal: Pos,
    rewards: Rewards,
    positions: BTreeMap<AgentId, Pos>,
}

impl GridWorld {
    /// Create an open grid with default rewards
    ///
    /// **Errors** if the grid is empty or too large, `start`/`goal` fall outside it, or
    /// `start` and `goal` coincide
    pub fn new(width: usize, height: usize, start: Pos, goal: Pos) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Layout(format!("grid must not be empty, got {width}x{height}")));
        }
        let dimension = |n: usize| {
            i32::try_from(n)
                .map_err(|_| Error::Layout(format!("grid dimension {n} exceeds {}", i32::MAX)))
        };
        if start == goal {
            return Err(Error::Layout("start and goal must be different cells".into()));
        }
        let world = Self {
            width: dimension(width)?,
            height: dimension(height)?,
            walls: HashSet::new(),
            start,
            goal,
            rewards: Rewards::default(),
            positions: BTreeMap::new(),
        };
        world.check_placeable(start)?;
        world.check_placeable(goal)?;
        Ok(world)
    }

    /// The 10x10 open lighthouse grid: start in the north-west corner, goal in the south-east one
    pub fn lighthouse() -> Self {
        Self {
            width: 10,
            height: 10,
            walls: HashSet::new(),
            start: (0, 0),
            goal: (9, 9),
            rewards: Rewards::default(),
            positions: BTreeMap::new(),
        }
    }

    /// A walled 8x7 maze whose shortest solution takes 9 steps
    pub fn maze() -> Self {
        MAZE.parse::<Self>()
            .expect("Built-in maze layout is valid")
            .with_rewards(Rewards {
                step: -1.0,
                goal: 100.0,
                collision: -5.0,
            })
    }

    /// Block a cell
    ///
    /// **Errors** if `pos` is outside the grid or is the start or goal cell
    pub fn with_wall(mut self, pos: Pos) -> Result<Self> {
        if !self.in_bounds(pos) {
            return Err(Error::OutOfBounds(pos.0, pos.1));
        }
        if pos == self.start || pos == self.goal {
            return Err(Error::Blocked(pos.0, pos.1));
        }
        self.walls.insert(pos);
        Ok(self)
    }

    pub fn with_walls(self, walls: impl IntoIterator<Item = Pos>) -> Result<Self> {
        walls.into_iter().try_fold(self, Self::with_wall)
    }

    pub fn with_rewards(mut self, rewards: Rewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }

    /// Current position of `agent`, `None` if the world has not seen it yet
    pub fn position(&self, agent: AgentId) -> Option<Pos> {
        self.positions.get(&agent).copied()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.0 >= 0 && pos.1 >= 0 && pos.0 < self.width && pos.1 < self.height
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.walls.contains(&pos)
    }

    fn check_placeable(&self, pos: Pos) -> Result<()> {
        if !self.in_bounds(pos) {
            Err(Error::OutOfBounds(pos.0, pos.1))
        } else if self.is_wall(pos) {
            Err(Error::Blocked(pos.0, pos.1))
        } else {
            Ok(())
        }
    }
}

impl Environment for GridWorld {
    type State = Pos;

    fn observe(&mut self, agent: AgentId) -> Self::State {
        *self.positions.entry(agent).or_insert(self.start)
    }

    fn step(&mut self, action: Action, agent: AgentId) -> (f32, bool) {
        let (x, y) = self.observe(agent);
        let (dx, dy) = action.delta();
        let next = (x + dx, y + dy);

        if !self.in_bounds(next) || self.is_wall(next) {
            return (self.rewards.collision, false);
        }

        self.positions.insert(agent, next);
        if next == self.goal {
            (self.rewards.goal, true)
        } else {
            (self.rewards.step, false)
        }
    }

    fn reset(&mut self) {
        let start = self.start;
        self.positions.values_mut().for_each(|p| *p = start);
    }

    fn is_terminal(&self) -> bool {
        self.positions.values().any(|&p| p == self.goal)
    }
}

impl FromStr for GridWorld {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<&str> = s.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect();
        let width = rows.first().map_or(0, |r| r.chars().count());
        if rows.iter().any(|r| r.chars().count() != width) {
            return Err(Error::Layout("rows must all have the same width".into()));
        }

        let mut walls = HashSet::new();
        let (mut start, mut goal) = (None, None);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let pos = (x as i32, y as i32);
                match c {
                    '.' => {}
                    '#' => {
                        walls.insert(pos);
                    }
                    'S' if start.is_none() => start = Some(pos),
                    'G' if goal.is_none() => goal = Some(pos),
                    'S' | 'G' => {
                        return Err(Error::Layout(format!("more than one `{c}` cell")));
                    }
                    _ => {
                        return Err(Error::Layout(format!("unknown cell `{c}` at ({x}, {y})")));
                    }
                }
            }
        }

        let start = start.ok_or_else(|| Error::Layout("missing start cell `S`".into()))?;
        let goal = goal.ok_or_else(|| Error::Layout("missing goal cell `G`".into()))?;
        GridWorld::new(width, rows.len(), start, goal)?.with_walls(walls)
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let occupied: HashSet<&Pos> = self.positions.values().collect();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = (x, y);
                let c = if occupied.contains(&pos) {
                    'A'
                } else if pos == self.goal {
                    'G'
                } else if pos == self.start {
                    'S'
                } else if self.is_wall(pos) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: AgentId = AgentId(0);

    fn open_3x3() -> GridWorld {
        GridWorld::new(3, 3, (0, 0), (2, 2)).unwrap()
    }

    #[test]
    fn grid_actions() {
        let mut env = open_3x3();
        let r = Rewards::default();

        assert_eq!(env.observe(A), (0, 0), "Agents start at the start cell");
        assert_eq!(env.step(Action::East, A), (r.step, false));
        assert_eq!(env.observe(A), (1, 0), "East increases x");
        assert_eq!(env.step(Action::South, A), (r.step, false));
        assert_eq!(env.observe(A), (1, 1), "South increases y");
        assert_eq!(env.step(Action::West, A), (r.step, false));
        assert_eq!(env.step(Action::North, A), (r.step, false));
        assert_eq!(env.observe(A), (0, 0));
    }

    #[test]
    fn boundary_collision() {
        let mut env = open_3x3();
        let (reward, terminal) = env.step(Action::North, A);
        assert_eq!(reward, env.rewards().collision);
        assert!(reward < env.rewards().step, "Collision costs more than a step");
        assert!(!terminal);
        assert_eq!(env.observe(A), (0, 0), "Position unchanged");

        env.step(Action::West, A);
        assert_eq!(env.observe(A), (0, 0));
    }

    #[test]
    fn wall_collision() {
        let mut env = open_3x3().with_wall((1, 0)).unwrap();
        assert_eq!(env.step(Action::East, A), (env.rewards().collision, false));
        assert_eq!(env.observe(A), (0, 0));
        assert_eq!(env.step(Action::South, A), (env.rewards().step, false));
    }

    #[test]
    fn goal_is_terminal() {
        let mut env = open_3x3();
        for action in [Action::East, Action::East, Action::South] {
            env.step(action, A);
            assert!(!env.is_terminal());
        }
        assert_eq!(env.step(Action::South, A), (env.rewards().goal, true));
        assert!(env.is_terminal());
        assert_eq!(env.observe(A), env.goal());
    }

    #[test]
    fn reset_restores_start() {
        let mut env = open_3x3();
        env.step(Action::East, A);
        env.step(Action::South, A);

        env.reset();
        let once = env.clone();
        env.reset();
        assert_eq!(env, once, "Reset is idempotent");
        assert_eq!(env.observe(A), (0, 0));
        assert!(!env.is_terminal());
    }

    #[test]
    fn deterministic_trajectories() {
        let actions = [
            Action::East,
            Action::North,
            Action::South,
            Action::South,
            Action::West,
            Action::East,
            Action::East,
        ];
        let run = || {
            let mut env = open_3x3().with_wall((1, 1)).unwrap();
            actions
                .iter()
                .map(|&a| {
                    let out = env.step(a, A);
                    (out, env.observe(A))
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn agents_tracked_independently() {
        let mut env = open_3x3();
        let b = AgentId(1);
        env.step(Action::East, A);
        assert_eq!(env.position(b), None);
        assert_eq!(env.observe(b), (0, 0), "Second agent starts fresh");
        assert_eq!(env.position(A), Some((1, 0)));
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            GridWorld::new(3, 3, (3, 0), (2, 2)).unwrap_err(),
            Error::OutOfBounds(3, 0)
        );
        assert!(GridWorld::new(0, 3, (0, 0), (0, 0)).is_err());
        assert!(
            matches!(GridWorld::new(3, 3, (1, 1), (1, 1)), Err(Error::Layout(_))),
            "Episodes cannot start on the goal"
        );
        assert!(matches!(
            GridWorld::new(usize::MAX, 1, (0, 0), (1, 0)),
            Err(Error::Layout(_))
        ));
        assert!(matches!(
            "S\nG".parse::<GridWorld>(),
            Ok(env) if env.height() == 2
        ));
        assert_eq!(
            open_3x3().with_wall((2, 2)).unwrap_err(),
            Error::Blocked(2, 2),
            "Goal cannot be walled off"
        );
        assert_eq!(
            open_3x3().with_wall((-1, 0)).unwrap_err(),
            Error::OutOfBounds(-1, 0)
        );
    }

    #[test]
    fn parse_layout() {
        let env: GridWorld = "S.#\n..#\n..G\n".parse().unwrap();
        assert_eq!((env.width(), env.height()), (3, 3));
        assert_eq!(env.start(), (0, 0));
        assert_eq!(env.goal(), (2, 2));
        assert!(env.is_wall((2, 0)) && env.is_wall((2, 1)));
        assert!(!env.is_wall((1, 1)));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!("S..\n..".parse::<GridWorld>(), Err(Error::Layout(_))));
        assert!(matches!("S..\n...".parse::<GridWorld>(), Err(Error::Layout(_))));
        assert!(matches!("SG.\nS..".parse::<GridWorld>(), Err(Error::Layout(_))));
        assert!(matches!("S?G".parse::<GridWorld>(), Err(Error::Layout(_))));
        assert!(matches!("".parse::<GridWorld>(), Err(Error::Layout(_))));
    }

    #[test]
    fn maze_layout() {
        let env = GridWorld::maze();
        assert_eq!((env.width(), env.height()), (8, 7));
        assert_eq!(env.start(), (1, 1));
        assert_eq!(env.goal(), (6, 5));
        assert_eq!(env.rewards().collision, -5.0);
    }

    #[test]
    fn display_layout() {
        let mut env: GridWorld = "S.#\n..G".parse().unwrap();
        assert_eq!(env.to_string(), "S.#\n..G\n");
        env.step(Action::East, A);
        assert_eq!(env.to_string(), "SA#\n..G\n");
    }
}
