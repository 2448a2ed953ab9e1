use std::{error::Error, fs, path::Path};

use qgrid::{
    algo::{QLearner, QLearnerConfig},
    gym::GridWorld,
    Engine,
};
use tracing_subscriber::EnvFilter;

const NUM_EPISODES: u32 = 200;
const MAX_STEPS: u32 = 100;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = Path::new("demos/lighthouse");
    fs::create_dir_all(path.join("out"))?;
    let mut wtr = csv::Writer::from_path(path.join("out/data.csv"))?;
    wtr.write_record(["episode", "steps", "reward", "epsilon"])?;

    let mut engine = Engine::new(GridWorld::lighthouse());
    let id = engine.add_agent(QLearner::new(QLearnerConfig::default())?);

    for (i, summary) in engine.run_training(NUM_EPISODES, MAX_STEPS).iter().enumerate() {
        wtr.write_record([
            i.to_string(),
            summary.steps.to_string(),
            summary.reward.to_string(),
            summary.epsilon.unwrap_or_default().to_string(),
        ])?;
    }
    wtr.flush()?;

    let summary = engine.run_test();
    println!("Learned path (A = agent, G = lighthouse):");
    println!("{}", engine.env());
    println!("{:?}", engine.trajectory(id));
    if summary.goal_reached {
        println!("Reached the lighthouse in {} steps", summary.steps);
    } else {
        println!("Did not reach the lighthouse in {} steps", summary.steps);
    }

    Ok(())
}
