/*
 * Predator Module
 *
 * The single predator does not school. It picks a random fish, chases its live
 * position for a few hundred ticks, then picks again. Between re-acquisitions
 * a countdown runs down by one per tick; when it has reached zero the next
 * tick draws a new target and a new countdown.
 */

use glam::Vec3;
use rand::Rng;

use crate::boid::{Boid, BoidState, Group};
use crate::bounds::WorldBounds;
use crate::params::{PredatorParams, SimulationParams};

#[derive(Debug, Clone)]
pub struct Predator {
    pub boid: Boid,
    // Index into the fish population, `None` until a fish exists
    pub target: Option<usize>,
    pub cooldown: i32,
}

impl Predator {
    pub fn new(boid: Boid) -> Self {
        Self {
            boid,
            target: None,
            cooldown: 0,
        }
    }

    // Create the predator with its fixed tunables
    pub fn spawn<R: Rng + ?Sized>(position: Vec3, params: &SimulationParams, rng: &mut R) -> Self {
        let tunables = &params.predator;
        let mut boid = Boid::spawn(position, Group::Predator, params, rng);
        boid.max_speed = tunables.max_speed;
        boid.max_force = tunables.max_force;
        boid.wiggle.freq = tunables.osc_freq;
        boid.wiggle.amp = tunables.osc_amp;
        boid.wiggle.phase = tunables.osc_phase;
        boid.noise_strength = tunables.noise_strength;
        Self::new(boid)
    }

    // Run the countdown, re-acquiring a target once it has expired.
    // Returns true when a new target was drawn this tick.
    pub fn tick_cooldown<R: Rng + ?Sized>(&mut self, school_len: usize, params: &PredatorParams, rng: &mut R) -> bool {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return false;
        }

        self.target = if school_len > 0 {
            Some(rng.gen_range(0..school_len))
        } else {
            None
        };
        self.cooldown = rng.gen_range(params.cooldown_min..params.cooldown_max);
        tracing::debug!(target_index = ?self.target, cooldown = self.cooldown, "predator re-acquired target");
        true
    }

    // Seek force toward the current target, if it exists and is not already reached
    pub fn chase_force(&self, school: &[BoidState], params: &PredatorParams) -> Vec3 {
        let Some(target) = self.target.and_then(|i| school.get(i)) else {
            return Vec3::ZERO;
        };

        if self.boid.position.distance(target.position) > params.chase_threshold {
            self.boid.seek(target.position)
        } else {
            Vec3::ZERO
        }
    }

    // One full predator step: target bookkeeping, forces, motion, orientation
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        school: &[BoidState],
        bounds: &WorldBounds,
        params: &SimulationParams,
        elapsed: f32,
        rng: &mut R,
    ) {
        let tunables = &params.predator;
        self.tick_cooldown(school.len(), tunables, rng);

        let chase = self.chase_force(school, tunables);
        let border = bounds.avoidance(self.boid.position) * tunables.border_weight;
        let noise = self.boid.noise(rng);

        self.boid.apply_force(chase);
        self.boid.apply_force(border);
        self.boid.apply_force(noise);

        self.boid.update(params.min_speed, params.max_turn_angle);
        self.boid.orient(elapsed, params.look_smoothing);
    }

    pub fn target_position(&self, school: &[BoidState]) -> Option<Vec3> {
        self.target.and_then(|i| school.get(i)).map(|s| s.position)
    }
}
