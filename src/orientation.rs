/*
 * Orientation Module
 *
 * Turns a boid's velocity into the facing direction a renderer should use.
 * The heading gets a sine wiggle on top (so fish look like they are swimming)
 * and is then smoothed into the boid's `last_look_dir`, which persists across
 * frames. Nothing here feeds back into steering.
 */

use glam::Vec3;

// Below this speed the facing direction is left untouched
pub const MIN_ORIENT_SPEED: f32 = 0.001;

// Lateral/vertical share of the wiggle added to the heading, and its roll share
const WIGGLE_LATERAL: f32 = 0.3;
const WIGGLE_VERTICAL: f32 = 0.1;
const WIGGLE_ROLL: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub facing: Vec3,
    pub roll: f32,
}

impl Default for Orientation {
    fn default() -> Self {
        Self { facing: Vec3::X, roll: 0.0 }
    }
}

// Per-agent swim oscillation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wiggle {
    pub freq: f32,
    pub amp: f32,
    pub phase: f32,
}

impl Wiggle {
    #[inline]
    pub fn offset(&self, elapsed: f32) -> f32 {
        (elapsed * self.freq + self.phase).sin() * self.amp
    }
}

// Advance the smoothed look direction by one frame and return the orientation.
// Returns `None` (and leaves `last_look_dir` alone) when the agent is nearly still.
pub fn smooth_heading(
    velocity: Vec3,
    elapsed: f32,
    wiggle: Wiggle,
    smoothing: f32,
    last_look_dir: &mut Vec3,
) -> Option<Orientation> {
    if velocity.length() <= MIN_ORIENT_SPEED {
        return None;
    }

    let osc = wiggle.offset(elapsed);
    let look = velocity.normalize() + Vec3::new(osc * WIGGLE_LATERAL, osc * WIGGLE_VERTICAL, 0.0);
    *last_look_dir = last_look_dir.lerp(look, smoothing);

    Some(Orientation {
        facing: *last_look_dir,
        roll: osc * WIGGLE_ROLL,
    })
}
