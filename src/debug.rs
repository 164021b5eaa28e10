/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and simulation state to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time
 * - Fixed physics steps run this frame and the leftover step fraction
 * - Predator target and cooldown
 */

use std::time::Duration;

use crate::driver::Simulation;

// Debug information to display
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub physics_updates_per_frame: usize,
    pub interpolation_alpha: f32,
    pub ticks: u64,
    pub predator_target: Option<usize>,
    pub predator_cooldown: i32,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            physics_updates_per_frame: 0,
            interpolation_alpha: 0.0,
            ticks: 0,
            predator_target: None,
            predator_cooldown: 0,
        }
    }
}

impl DebugInfo {
    // Copy the simulation-side counters
    pub fn sync(&mut self, sim: &Simulation) {
        self.ticks = sim.flock.ticks();
        self.interpolation_alpha = sim.clock.alpha();
        match &sim.flock.predator {
            Some(predator) => {
                self.predator_target = predator.target;
                self.predator_cooldown = predator.cooldown;
            }
            None => {
                self.predator_target = None;
                self.predator_cooldown = 0;
            }
        }
    }

    pub fn lines(&self, fish: usize) -> Vec<String> {
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Steps this frame: {}", self.physics_updates_per_frame),
            format!("Step remainder: {:.2}", self.interpolation_alpha),
            format!("Ticks: {}", self.ticks),
            format!("Fish: {}", fish),
            match self.predator_target {
                Some(target) => format!("Predator: fish {} ({} ticks left)", target, self.predator_cooldown),
                None => "Predator: no target".to_string(),
            },
        ]
    }
}
