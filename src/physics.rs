/*
 * Physics Module
 *
 * This module advances the aquarium by one fixed tick. Fish are processed in
 * population order, the predator last. Each fish finds its neighbors, sums its
 * weighted steering forces, integrates its motion and refreshes its facing
 * direction.
 *
 * Two neighbor-state models are supported:
 * - Snapshot: every fish reads the positions/velocities captured before any
 *   fish moved this tick, so the result does not depend on population order.
 * - Sequential: fish are moved in place and later fish see earlier fish at
 *   their new positions.
 * The predator always chases the positions fish have at the end of the tick.
 */

use rand::Rng;

use crate::boid::{Boid, BoidState};
use crate::bounds::WorldBounds;
use crate::params::{SimulationParams, UpdateMode};
use crate::predator::Predator;
use crate::spatial_grid::{BruteForce, NeighborQuery, SpatialGrid};

// Advance every fish and the predator by one step
pub fn tick<R: Rng + ?Sized>(
    school: &mut [Boid],
    predator: Option<&mut Predator>,
    bounds: &WorldBounds,
    params: &SimulationParams,
    mut grid: Option<&mut SpatialGrid>,
    elapsed: f32,
    rng: &mut R,
) {
    let mut states: Vec<BoidState> = school.iter().map(Boid::state).collect();
    if let Some(grid) = grid.as_deref_mut() {
        grid.rebuild(&states);
    }

    // One query with the largest radius; each behavior narrows it to its own
    let radius = params.max_radius();
    let mut neighbors = Vec::new();

    for i in 0..school.len() {
        match grid.as_deref() {
            Some(grid) => grid.neighbors_within(&states, i, radius, &mut neighbors),
            None => BruteForce.neighbors_within(&states, i, radius, &mut neighbors),
        }

        let boid = &mut school[i];
        boid.flock(&states, &neighbors, bounds, params, rng);
        boid.update(params.min_speed, params.max_turn_angle);
        boid.orient(elapsed, params.look_smoothing);

        if params.update_mode == UpdateMode::Sequential {
            let previous = states[i].position;
            states[i] = boid.state();
            if let Some(grid) = grid.as_deref_mut() {
                grid.relocate(i, previous, states[i].position);
            }
        }
    }

    if let Some(predator) = predator {
        let live: Vec<BoidState> = school.iter().map(Boid::state).collect();
        predator.step(&live, bounds, params, elapsed, rng);
    }
}
