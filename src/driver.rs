/*
 * Frame Driver Module
 *
 * Decouples the simulation from the render loop. Wall-clock frame time is
 * accumulated and released as fixed-size ticks, so the fish move the same way
 * at any frame rate. The Simulation bundles a Flock with the seeded random
 * source and the fixed-step clock; elapsed time handed to the orientation
 * wiggle is derived from the tick count, which keeps runs reproducible.
 */

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::flock::Flock;
use crate::params::SimulationParams;

// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    pub step_size: Duration,
    pub max_steps_per_frame: usize,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(steps_per_second: f32, max_steps_per_frame: usize) -> Self {
        Self {
            step_size: Duration::from_secs_f32(1.0 / steps_per_second),
            max_steps_per_frame: max_steps_per_frame.max(1),
            accumulator: Duration::ZERO,
        }
    }

    // Clock for a parameter set, validating it first
    pub fn new_checked(params: &SimulationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(params.fixed_physics_fps, params.max_steps_per_frame))
    }

    // Add frame time to the accumulator and return how many steps are due
    pub fn advance(&mut self, frame_time: Duration) -> usize {
        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= self.step_size && steps < self.max_steps_per_frame {
            self.accumulator -= self.step_size;
            steps += 1;
        }

        // Too far behind (window dragged, debugger paused): drop the backlog
        if self.accumulator >= self.step_size {
            let step_nanos = self.step_size.as_nanos();
            let backlog = self.accumulator.as_nanos() / step_nanos;
            tracing::warn!(dropped_steps = backlog as u64, "simulation fell behind, skipping steps");
            self.accumulator = Duration::from_nanos((self.accumulator.as_nanos() % step_nanos) as u64);
        }

        steps
    }

    // Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / self.step_size.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

pub struct Simulation {
    pub flock: Flock,
    pub clock: FixedStep,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(params: SimulationParams) -> Result<Self> {
        let clock = FixedStep::new_checked(&params)?;
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let flock = Flock::stocked(params, &mut rng)?;
        Ok(Self { flock, clock, rng })
    }

    // Simulated seconds since stocking
    pub fn elapsed(&self) -> f32 {
        self.flock.ticks() as f32 * self.clock.step_size.as_secs_f32()
    }

    // Run exactly one fixed tick
    pub fn step(&mut self) {
        let elapsed = self.elapsed();
        self.flock.tick(elapsed, &mut self.rng);
    }

    // Run as many ticks as the elapsed frame time allows
    pub fn advance(&mut self, frame_time: Duration) -> usize {
        let steps = self.clock.advance(frame_time);
        for _ in 0..steps {
            self.step();
        }
        if steps > 0 {
            tracing::trace!(steps, ticks = self.flock.ticks(), "advanced simulation");
        }
        steps
    }

    // Restock from the configured seed
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.flock.params().seed);
        self.clock.reset();
        self.flock.stock(&mut self.rng);
    }

    // Apply new tunables; restocks when the population shape changed
    pub fn set_params(&mut self, params: SimulationParams, restock: bool) -> Result<()> {
        let clock = FixedStep::new_checked(&params)?;
        self.flock.set_params(params)?;
        self.clock = clock;
        if restock {
            self.reset();
        }
        Ok(())
    }
}
