/*
 * Command Line Module
 *
 * Arguments shared by the windowed viewer and the headless runner. The
 * configuration file is read first, then individual flags override it.
 */

use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::params::{SimulationParams, UpdateMode};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "koi-aquarium", version, about = "Schooling koi and a predator in a 3D tank")]
pub struct Args {
    /// TOML file with simulation parameters (missing keys use defaults)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the random source
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Run this many ticks without a window and print a summary
    #[arg(long, value_name = "TICKS")]
    pub headless: Option<u64>,

    /// Move fish in place instead of reading a per-tick snapshot
    #[arg(long)]
    pub sequential: bool,

    /// Use the spatial grid for neighbor queries
    #[arg(long)]
    pub spatial_grid: bool,
}

impl Args {
    // Resolve the final parameter set from the config file and flags
    pub fn load_params(&self) -> Result<SimulationParams> {
        let mut params = match &self.config {
            Some(path) => SimulationParams::load(path)?,
            None => SimulationParams::default(),
        };

        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if self.sequential {
            params.update_mode = UpdateMode::Sequential;
        }
        if self.spatial_grid {
            params.enable_spatial_grid = true;
        }

        params.validate()?;
        Ok(params)
    }
}
