/*
 * World Bounds Module
 *
 * The tank is an axis-aligned box. Fish are never clamped to it; instead every
 * agent near a face receives a constant push back toward the interior. The push
 * is applied per axis and is deliberately left unclamped so that it can win
 * against the social forces close to the glass.
 */

use glam::Vec3;
use rand::Rng;

use crate::params::SimulationParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
    // Distance from a face at which avoidance starts
    pub margin: f32,
    // Push applied on each axis inside the margin
    pub strength: f32,
}

impl WorldBounds {
    pub fn new(min: Vec3, max: Vec3, margin: f32, strength: f32) -> Self {
        Self { min, max, margin, strength }
    }

    // Swimmable volume of the tank: centered on x/z, from the sand up to the water surface
    pub fn from_params(params: &SimulationParams) -> Self {
        let half_width = params.world_width / 2.0;
        let half_depth = params.world_depth / 2.0;
        Self {
            min: Vec3::new(-half_width, params.floor_height, -half_depth),
            max: Vec3::new(half_width, params.ceiling(), half_depth),
            margin: params.border_margin,
            strength: params.border_strength,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    // Steering away from any face the point is within `margin` of
    pub fn avoidance(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            self.axis_push(position.x, self.min.x, self.max.x),
            self.axis_push(position.y, self.min.y, self.max.y),
            self.axis_push(position.z, self.min.z, self.max.z),
        )
    }

    #[inline]
    fn axis_push(&self, value: f32, low: f32, high: f32) -> f32 {
        if value < low + self.margin {
            self.strength
        } else if value > high - self.margin {
            -self.strength
        } else {
            0.0
        }
    }

    // Uniform point inside the box [lo, hi)
    pub fn random_point_in<R: Rng + ?Sized>(rng: &mut R, lo: Vec3, hi: Vec3) -> Vec3 {
        let mut axis = |a: f32, b: f32| if b > a { rng.gen_range(a..b) } else { a };
        let x = axis(lo.x, hi.x);
        let y = axis(lo.y, hi.y);
        let z = axis(lo.z, hi.z);
        Vec3::new(x, y, z)
    }
}
