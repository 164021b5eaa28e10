/*
 * Headless Module
 *
 * Runs the simulation without a window for a fixed number of ticks and
 * reports a short summary. Useful for checking a config file or a seed.
 */

use std::fmt;

use crate::driver::Simulation;
use crate::error::Result;
use crate::params::SimulationParams;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub ticks: u64,
    pub fish: usize,
    pub mean_speed: f32,
    pub escaped: usize,
    pub predator_target: Option<usize>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} fish, mean speed {:.3}, {} outside the tank, predator target {:?}",
            self.ticks, self.fish, self.mean_speed, self.escaped, self.predator_target
        )
    }
}

pub fn run(params: SimulationParams, ticks: u64) -> Result<Summary> {
    let mut sim = Simulation::new(params)?;
    for _ in 0..ticks {
        sim.step();
    }
    Ok(summarize(&sim))
}

pub fn summarize(sim: &Simulation) -> Summary {
    let flock = &sim.flock;
    let fish = flock.fish.len();
    let mean_speed = if fish > 0 {
        flock.fish.iter().map(|b| b.velocity.length()).sum::<f32>() / fish as f32
    } else {
        0.0
    };
    let escaped = flock
        .fish
        .iter()
        .filter(|b| !flock.bounds.contains(b.position))
        .count();

    Summary {
        ticks: flock.ticks(),
        fish,
        mean_speed,
        escaped,
        predator_target: flock.predator.as_ref().and_then(|p| p.target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_ticks_and_speed_band() {
        let params = SimulationParams::default();
        let summary = run(params.clone(), 60).unwrap();
        assert_eq!(summary.ticks, 60);
        assert_eq!(summary.fish, params.num_fish);
        assert!(summary.mean_speed >= params.min_speed && summary.mean_speed <= params.max_speed.max);
        assert!(summary.predator_target.unwrap() < params.num_fish);
    }
}
