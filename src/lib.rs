/*
 * Koi Aquarium - Module Definitions
 *
 * This file defines the module structure for the aquarium simulation.
 * The simulation core (boids, flock, predator, bounds, orientation) has no
 * windowing dependencies; the nannou viewer lives behind the `viewer` feature.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidState, Group};
pub use bounds::WorldBounds;
pub use driver::{FixedStep, Simulation};
pub use error::{Result, SimError};
pub use flock::Flock;
pub use orientation::Orientation;
pub use params::{SimulationParams, UpdateMode};
pub use predator::Predator;
pub use spatial_grid::{BruteForce, NeighborQuery, SpatialGrid};

// Define modules
pub mod boid;
pub mod bounds;
pub mod cli;
pub mod debug;
pub mod driver;
pub mod error;
pub mod flock;
pub mod headless;
pub mod orientation;
pub mod params;
pub mod physics;
pub mod predator;
pub mod spatial_grid;

#[cfg(feature = "viewer")]
pub mod app;
#[cfg(feature = "viewer")]
pub mod renderer;
#[cfg(feature = "viewer")]
pub mod ui;
