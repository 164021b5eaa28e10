/*
 * Flock Module
 *
 * The Flock owns the whole simulated population: the fish (ordered, only ever
 * appended to), the optional predator, the tank bounds and the parameters.
 * It stocks the tank at startup and forwards each tick to the physics module.
 */

use glam::Vec3;
use rand::Rng;

use crate::boid::{Boid, BoidState, Group};
use crate::bounds::WorldBounds;
use crate::error::Result;
use crate::params::SimulationParams;
use crate::physics;
use crate::predator::Predator;
use crate::spatial_grid::SpatialGrid;

// Clearance from the walls when placing fish and the predator
const FISH_WALL_GAP: f32 = 6.0;
const PREDATOR_WALL_GAP: f32 = 10.0;
// Lowest spawn height and gap left below the tank top
const SPAWN_FLOOR: f32 = 2.0;
const FISH_TOP_GAP: f32 = 2.0;
const PREDATOR_TOP_GAP: f32 = 6.0;

pub struct Flock {
    pub fish: Vec<Boid>,
    pub predator: Option<Predator>,
    pub bounds: WorldBounds,
    params: SimulationParams,
    grid: Option<SpatialGrid>,
    ticks: u64,
}

impl Flock {
    // Empty tank; fails if the parameters are inconsistent
    pub fn new(params: SimulationParams) -> Result<Self> {
        params.validate()?;
        let bounds = WorldBounds::from_params(&params);
        let grid = Self::grid_for(&params, &bounds);

        Ok(Self {
            fish: Vec::with_capacity(params.num_fish),
            predator: None,
            bounds,
            params,
            grid,
            ticks: 0,
        })
    }

    // Tank populated according to the parameters
    pub fn stocked<R: Rng + ?Sized>(params: SimulationParams, rng: &mut R) -> Result<Self> {
        let mut flock = Self::new(params)?;
        flock.stock(rng);
        Ok(flock)
    }

    fn grid_for(params: &SimulationParams, bounds: &WorldBounds) -> Option<SpatialGrid> {
        params
            .enable_spatial_grid
            .then(|| SpatialGrid::new(params.max_radius() * params.cell_size_factor, bounds))
    }

    // Replace the population with a freshly randomized one
    pub fn stock<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.fish.clear();
        self.predator = None;
        self.ticks = 0;

        let (lo, hi) = self.spawn_region(FISH_WALL_GAP, FISH_TOP_GAP);
        for i in 0..self.params.num_fish {
            let position = WorldBounds::random_point_in(rng, lo, hi);
            let group = Group::School((i % self.params.group_count) as u32);
            let boid = Boid::spawn(position, group, &self.params, rng).with_phase(i as f32);
            self.fish.push(boid);
        }

        if self.params.predator.enabled {
            let (lo, hi) = self.spawn_region(PREDATOR_WALL_GAP, PREDATOR_TOP_GAP);
            let position = WorldBounds::random_point_in(rng, lo, hi);
            self.predator = Some(Predator::spawn(position, &self.params, rng));
        }

        tracing::info!(
            fish = self.fish.len(),
            groups = self.params.group_count,
            predator = self.predator.is_some(),
            "stocked aquarium"
        );
    }

    fn spawn_region(&self, wall_gap: f32, top_gap: f32) -> (Vec3, Vec3) {
        let half_width = (self.params.world_width - wall_gap) / 2.0;
        let half_depth = (self.params.world_depth - wall_gap) / 2.0;
        (
            Vec3::new(-half_width, SPAWN_FLOOR, -half_depth),
            Vec3::new(half_width, self.params.world_height - top_gap, half_depth),
        )
    }

    // Append a fish to the population, returning its index
    pub fn add_fish(&mut self, boid: Boid) -> usize {
        self.fish.push(boid);
        self.fish.len() - 1
    }

    pub fn set_predator(&mut self, predator: Predator) {
        self.predator = Some(predator);
    }

    // Advance the whole population by one tick
    pub fn tick<R: Rng + ?Sized>(&mut self, elapsed: f32, rng: &mut R) {
        physics::tick(
            &mut self.fish,
            self.predator.as_mut(),
            &self.bounds,
            &self.params,
            self.grid.as_mut(),
            elapsed,
            rng,
        );
        self.ticks += 1;
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    // Swap in new tunables without touching the population
    pub fn set_params(&mut self, params: SimulationParams) -> Result<()> {
        params.validate()?;
        self.bounds = WorldBounds::from_params(&params);
        self.grid = Self::grid_for(&params, &self.bounds);
        self.params = params;
        Ok(())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn states(&self) -> Vec<BoidState> {
        self.fish.iter().map(Boid::state).collect()
    }

    // Every agent, fish first, predator last
    pub fn agents(&self) -> impl Iterator<Item = &Boid> {
        self.fish.iter().chain(self.predator.iter().map(|p| &p.boid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn stocking_assigns_groups_round_robin() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let flock = Flock::stocked(SimulationParams::default(), &mut rng).unwrap();
        assert_eq!(flock.fish.len(), 40);
        for (i, fish) in flock.fish.iter().enumerate() {
            assert_eq!(fish.group(), Group::School((i % 4) as u32));
            assert_eq!(fish.wiggle.phase, i as f32);
        }
        assert!(flock.predator.is_some());
        assert_eq!(flock.agents().count(), 41);
    }

    #[test]
    fn fish_start_inside_the_tank_footprint() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let flock = Flock::stocked(SimulationParams::default(), &mut rng).unwrap();
        for fish in &flock.fish {
            assert!(fish.position.x.abs() <= 97.0);
            assert!(fish.position.z.abs() <= 52.0);
            assert!(fish.position.y >= 2.0 && fish.position.y < 138.0);
        }
    }

    #[test]
    fn invalid_params_fail_fast() {
        let mut params = SimulationParams::default();
        params.group_count = 0;
        assert!(Flock::new(params).is_err());
    }

    #[test]
    fn disabled_predator_is_not_spawned() {
        let mut params = SimulationParams::default();
        params.predator.enabled = false;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut flock = Flock::stocked(params, &mut rng).unwrap();
        flock.tick(0.0, &mut rng);
        assert!(flock.predator.is_none());
        assert_eq!(flock.ticks(), 1);
    }

    #[test]
    fn add_fish_appends() {
        let mut flock = Flock::new(SimulationParams::default()).unwrap();
        let boid = Boid::new(Vec3::new(0.0, 50.0, 0.0), Vec3::X * 0.2, Group::School(0), 0.4, 0.01);
        assert_eq!(flock.add_fish(boid.clone()), 0);
        assert_eq!(flock.add_fish(boid), 1);
    }
}
