use std::time::Instant;
use traffic_wave::{Error, Simulation, SimulationConfig};

fn load_config() -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(SimulationConfig::default()),
    }
}

fn run(config: &SimulationConfig) -> Result<Simulation, Error> {
    let mut sim = Simulation::new(config)?;
    sim.run(config.num_steps, config.dt)?;
    Ok(sim)
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            std::process::exit(2);
        }
    };

    println!("Simulating...");
    let start = Instant::now();
    let sim = match run(&config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let blocked = sim.iter_vehicles().filter(|v| v.is_blocked()).count();
    println!(
        "{} steps to t={} in {:?} ({} vehs, {} blocked)",
        sim.frame(),
        sim.time(),
        elapsed,
        sim.iter_vehicles().count(),
        blocked,
    );
    if let Some(lead) = sim.state().lead_vehicle() {
        println!("Lead vehicle {} at {:.2} m, {:.2} m/s", lead.id(), lead.pos(), lead.vel());
    }

    match serde_json::to_string_pretty(&sim.interfaces()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("Failed to encode interfaces: {err}"),
    }
}
