use std::{error::Error, thread, time::Duration};

use qgrid::{
    algo::{QLearner, QLearnerConfig},
    gym::GridWorld,
    Engine, EngineConfig, Environment,
};
use tracing_subscriber::EnvFilter;

const NUM_EPISODES: u32 = 1500;
const MAX_STEPS: u32 = 200;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = EngineConfig {
        epsilon_decay: 0.995,
        test_max_steps: MAX_STEPS,
    };
    let mut engine = Engine::with_config(GridWorld::maze(), config)?;
    let id = engine.add_agent(QLearner::new(QLearnerConfig {
        alpha: 0.5,
        ..Default::default()
    })?);

    let summaries = engine.run_training(NUM_EPISODES, MAX_STEPS);
    let solved = summaries.iter().filter(|s| s.goal_reached).count();
    println!("Solved {solved}/{NUM_EPISODES} training episodes");

    let summary = engine.run_test();
    println!(
        "{} after {} steps",
        if summary.goal_reached { "Goal reached" } else { "Gave up" },
        summary.steps
    );

    // Replay the greedy policy on a fresh copy of the maze, one frame per step
    let agent = engine.agent(id).ok_or("agent was registered")?;
    let mut replay = GridWorld::maze();
    for _ in 0..summary.steps {
        let action = agent.policy(&replay.observe(id));
        let (reward, _) = replay.step(action, id);
        println!("\n{action} -> {reward}\n{replay}");
        thread::sleep(Duration::from_millis(200));
    }

    Ok(())
}
