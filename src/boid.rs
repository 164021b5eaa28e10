/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior. Every fish (and the
 * predator) is a boid. Schooling fish follow three social rules against the
 * other members of their own group:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * On top of those they avoid the tank walls and jitter a little. Motion is
 * integrated with a cap on how far the heading may turn in a single tick.
 */

use glam::{Quat, Vec3};
use rand::Rng;

use crate::bounds::WorldBounds;
use crate::orientation::{self, Orientation, Wiggle};
use crate::params::SimulationParams;

// Which school a boid swims with. The predator belongs to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    School(u32),
    Predator,
}

// What a boid exposes to its neighbors during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub group: Group,
}

// The individual forces that went into the last flocking step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringForces {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub border: Vec3,
    pub noise: Vec3,
}

#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub max_speed: f32,
    pub max_force: f32,
    pub wiggle: Wiggle,
    pub noise_strength: f32,
    pub last_look_dir: Vec3,
    pub last_forces: SteeringForces,
    group: Group,
    orientation: Orientation,
}

impl Boid {
    pub fn new(position: Vec3, velocity: Vec3, group: Group, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            max_speed,
            max_force,
            wiggle: Wiggle { freq: 1.0, amp: 0.0, phase: 0.0 },
            noise_strength: 0.0,
            last_look_dir: Vec3::X,
            last_forces: SteeringForces::default(),
            group,
            orientation: Orientation::default(),
        }
    }

    // Create a fish with its tunables drawn from the configured bands
    pub fn spawn<R: Rng + ?Sized>(position: Vec3, group: Group, params: &SimulationParams, rng: &mut R) -> Self {
        // Random heading, uniform on the sphere
        let theta = rng.gen_range(0.0..std::f32::consts::TAU);
        let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
        let speed = params.initial_speed.sample(rng);
        let velocity = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos()) * speed;

        let max_speed = params.max_speed.sample(rng);
        let max_force = params.max_force.sample(rng);

        let mut boid = Self::new(position, velocity, group, max_speed, max_force);
        boid.wiggle = Wiggle {
            freq: params.osc_freq.sample(rng),
            amp: params.osc_amp.sample(rng),
            phase: 0.0,
        };
        boid.noise_strength = params.noise_strength.sample(rng);
        boid
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.wiggle.phase = phase;
        self
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    // Smoothed facing direction for renderers
    pub fn facing_direction(&self) -> Vec3 {
        self.last_look_dir
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn state(&self) -> BoidState {
        BoidState {
            position: self.position,
            velocity: self.velocity,
            group: self.group,
        }
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    // Reynolds steering: Steering = Desired - Velocity, limited to max_force
    #[inline]
    fn steer(&self, direction: Vec3) -> Vec3 {
        let desired = direction.normalize_or_zero() * self.max_speed;
        (desired - self.velocity).clamp_length_max(self.max_force)
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation(&self, others: &[BoidState], neighbor_indices: &[usize], perception_radius: f32) -> Vec3 {
        let mut steering = Vec3::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let other = &others[i];
            if other.group != self.group {
                continue;
            }
            let d = self.position.distance(other.position);

            // Coincident neighbors have no direction to flee from
            if d > 0.0 && d < perception_radius {
                // Vector pointing away from neighbor, weighted by distance
                steering += (self.position - other.position).normalize() / d;
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        steering /= count as f32;
        if steering.length_squared() > 0.0 {
            self.steer(steering)
        } else {
            Vec3::ZERO
        }
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment(&self, others: &[BoidState], neighbor_indices: &[usize], perception_radius: f32) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let other = &others[i];
            if other.group == self.group && self.position.distance(other.position) < perception_radius {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        sum /= count as f32;
        if sum.length_squared() > 0.0 {
            self.steer(sum)
        } else {
            Vec3::ZERO
        }
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohesion(&self, others: &[BoidState], neighbor_indices: &[usize], perception_radius: f32) -> Vec3 {
        let mut center = Vec3::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let other = &others[i];
            if other.group == self.group && self.position.distance(other.position) < perception_radius {
                center += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        self.seek(center / count as f32)
    }

    // Steer towards a point at full speed
    pub fn seek(&self, target: Vec3) -> Vec3 {
        let desired = target - self.position;
        if desired.length_squared() > 0.0 {
            self.steer(desired)
        } else {
            Vec3::ZERO
        }
    }

    // Per-axis jitter in [-noise_strength/2, noise_strength/2)
    pub fn noise<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let s = self.noise_strength;
        let x = (rng.gen::<f32>() - 0.5) * s;
        let y = (rng.gen::<f32>() - 0.5) * s;
        let z = (rng.gen::<f32>() - 0.5) * s;
        Vec3::new(x, y, z)
    }

    // Compute the weighted schooling forces and accumulate them
    pub fn flock<R: Rng + ?Sized>(
        &mut self,
        others: &[BoidState],
        neighbor_indices: &[usize],
        bounds: &WorldBounds,
        params: &SimulationParams,
        rng: &mut R,
    ) {
        let forces = SteeringForces {
            separation: self.separation(others, neighbor_indices, params.separation_radius),
            alignment: self.alignment(others, neighbor_indices, params.alignment_radius),
            cohesion: self.cohesion(others, neighbor_indices, params.cohesion_radius),
            border: bounds.avoidance(self.position),
            noise: self.noise(rng),
        };

        self.apply_force(forces.separation * params.separation_weight);
        self.apply_force(forces.alignment * params.alignment_weight);
        self.apply_force(forces.cohesion * params.cohesion_weight);
        self.apply_force(forces.border * params.border_weight);
        self.apply_force(forces.noise * params.noise_weight);

        self.last_forces = forces;
    }

    // Integrate the accumulated acceleration with a limited turn rate
    pub fn update(&mut self, min_speed: f32, max_turn_angle: f32) {
        let desired = self.velocity + self.acceleration;
        let speed = self.velocity.length();

        let mut velocity = if speed > 0.0 {
            let current_dir = self.velocity / speed;
            let new_dir = match desired.try_normalize() {
                Some(desired_dir) => turn_towards(current_dir, desired_dir, max_turn_angle),
                // Forces cancelled the velocity out, keep heading
                None => current_dir,
            };
            // Turning changes heading, not speed
            new_dir * speed
        } else {
            // No heading to turn from
            desired
        };

        // Keep speed within [min_speed, max_speed]
        let len = velocity.length();
        if len > self.max_speed {
            velocity *= self.max_speed / len;
        } else if len < min_speed {
            let dir = velocity
                .try_normalize()
                .or_else(|| self.velocity.try_normalize())
                .unwrap_or(Vec3::X);
            velocity = dir * min_speed;
        }

        self.velocity = velocity;
        self.position += self.velocity;
        self.acceleration = Vec3::ZERO;
    }

    // Refresh the render-facing orientation after motion integration
    pub fn orient(&mut self, elapsed: f32, smoothing: f32) -> Orientation {
        if let Some(orientation) =
            orientation::smooth_heading(self.velocity, elapsed, self.wiggle, smoothing, &mut self.last_look_dir)
        {
            self.orientation = orientation;
        }
        self.orientation
    }
}

// Rotate `current` toward `desired` (both unit length) by at most `max_angle`
pub fn turn_towards(current: Vec3, desired: Vec3, max_angle: f32) -> Vec3 {
    let angle = current.angle_between(desired);
    if !(angle > max_angle) {
        return desired;
    }

    // Anti-parallel directions have no unique axis, any perpendicular one will do
    let axis = current
        .cross(desired)
        .try_normalize()
        .unwrap_or_else(|| current.any_orthonormal_vector());
    Quat::from_axis_angle(axis, max_angle) * current
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f32::consts::PI;

    const MAX_TURN: f32 = PI / 18.0;

    fn fish(x: f32, vx: f32) -> Boid {
        Boid::new(Vec3::new(x, 50.0, 0.0), Vec3::new(vx, 0.0, 0.0), Group::School(0), 0.4, 0.01)
    }

    fn states(boids: &[Boid]) -> Vec<BoidState> {
        boids.iter().map(Boid::state).collect()
    }

    #[test]
    fn separation_points_away_from_close_neighbor() {
        let boids = [fish(0.0, 0.0), fish(1.0, 0.0)];
        let others = states(&boids);
        let left = boids[0].separation(&others, &[1], 75.0);
        let right = boids[1].separation(&others, &[0], 75.0);
        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
        assert!(left.length() <= 0.01 + 1e-6);
    }

    #[test]
    fn separation_without_neighbors_is_zero() {
        let boids = [fish(0.0, 0.3)];
        let others = states(&boids);
        assert_eq!(boids[0].separation(&others, &[], 75.0), Vec3::ZERO);
    }

    #[test]
    fn other_groups_are_ignored() {
        let mut stranger = fish(1.0, 0.3);
        stranger.group = Group::School(1);
        let boids = [fish(0.0, 0.0), stranger];
        let others = states(&boids);
        assert_eq!(boids[0].separation(&others, &[1], 75.0), Vec3::ZERO);
        assert_eq!(boids[0].alignment(&others, &[1], 75.0), Vec3::ZERO);
        assert_eq!(boids[0].cohesion(&others, &[1], 75.0), Vec3::ZERO);
    }

    #[test]
    fn neighbors_beyond_radius_are_ignored() {
        let boids = [fish(0.0, 0.0), fish(100.0, 0.3)];
        let others = states(&boids);
        assert_eq!(boids[0].cohesion(&others, &[1], 50.0), Vec3::ZERO);
        assert_ne!(boids[0].cohesion(&others, &[1], 150.0), Vec3::ZERO);
    }

    #[test]
    fn alignment_steers_toward_neighbor_heading() {
        let mut me = fish(0.0, 0.0);
        me.velocity = Vec3::new(0.0, 0.0, 0.3);
        let boids = [me, fish(5.0, 0.3)];
        let others = states(&boids);
        let force = boids[0].alignment(&others, &[1], 75.0);
        assert!(force.x > 0.0);
        assert!(force.z < 0.0);
    }

    #[test]
    fn alignment_with_still_neighbors_is_zero() {
        let boids = [fish(0.0, 0.3), fish(5.0, 0.0)];
        let others = states(&boids);
        assert_eq!(boids[0].alignment(&others, &[1], 75.0), Vec3::ZERO);
    }

    #[test]
    fn seek_at_target_is_zero() {
        let me = fish(3.0, 0.2);
        assert_eq!(me.seek(me.position), Vec3::ZERO);
        assert!(me.seek(Vec3::new(50.0, 50.0, 0.0)).length() <= me.max_force + 1e-6);
    }

    #[test]
    fn update_limits_turn_rate() {
        let mut me = fish(0.0, 0.3);
        me.apply_force(Vec3::new(-1.0, 1.0, 0.0));
        let before = me.velocity;
        me.update(0.13, MAX_TURN);
        assert!(before.angle_between(me.velocity) <= MAX_TURN + 1e-4);
        assert!((me.velocity.length() - 0.3).abs() < 1e-5);
        assert_eq!(me.acceleration, Vec3::ZERO);
    }

    #[test]
    fn update_turns_around_from_head_on_force() {
        let mut me = fish(0.0, 0.3);
        me.apply_force(Vec3::new(-5.0, 0.0, 0.0));
        me.update(0.13, MAX_TURN);
        let turned = Vec3::X.angle_between(me.velocity);
        assert!((turned - MAX_TURN).abs() < 1e-3);
    }

    #[test]
    fn update_clamps_speed_band() {
        let mut fast = fish(0.0, 2.0);
        fast.update(0.13, MAX_TURN);
        assert!((fast.velocity.length() - 0.4).abs() < 1e-5);

        let mut slow = fish(0.0, 0.01);
        slow.update(0.13, MAX_TURN);
        assert!((slow.velocity.length() - 0.13).abs() < 1e-5);
        assert!(slow.velocity.x > 0.0);
    }

    #[test]
    fn update_from_rest_uses_desired_directly() {
        let mut me = fish(0.0, 0.0);
        me.apply_force(Vec3::new(0.0, 0.2, 0.0));
        me.update(0.13, MAX_TURN);
        assert!((me.velocity - Vec3::new(0.0, 0.2, 0.0)).length() < 1e-6);
        assert!((me.position.y - 50.2).abs() < 1e-5);
    }

    #[test]
    fn update_from_rest_without_force_still_moves() {
        let mut me = fish(0.0, 0.0);
        me.update(0.13, MAX_TURN);
        assert!((me.velocity.length() - 0.13).abs() < 1e-6);
    }

    #[test]
    fn spawn_draws_from_bands() {
        let params = SimulationParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let b = Boid::spawn(Vec3::ZERO, Group::School(2), &params, &mut rng);
            assert!(params.max_speed.contains(b.max_speed));
            assert!(params.max_force.contains(b.max_force));
            assert!(params.osc_freq.contains(b.wiggle.freq));
            assert!(params.noise_strength.contains(b.noise_strength));
            let speed = b.velocity.length();
            assert!(speed >= params.initial_speed.min - 1e-5 && speed <= params.initial_speed.max + 1e-5);
            assert_eq!(b.group(), Group::School(2));
            assert_eq!(b.facing_direction(), Vec3::X);
        }
    }

    #[test]
    fn noise_stays_within_strength() {
        let mut me = fish(0.0, 0.3);
        me.noise_strength = 0.02;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let n = me.noise(&mut rng);
            assert!(n.abs().max_element() <= 0.01);
        }
    }
}
