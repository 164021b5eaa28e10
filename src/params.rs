/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every tunable of
 * the aquarium: tank dimensions, group count, perception radii, behavior
 * weights, speed bands and the predator's tunables. Parameters can be loaded
 * from a TOML file (missing keys fall back to the defaults), are validated
 * before a simulation is built, and a few of them can be adjusted live from
 * the viewer's UI.
 */

use std::f32::consts::PI;
use std::ops::RangeInclusive;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// How fish read their neighbors during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    // Every fish steers against the state captured at the start of the tick
    Snapshot,
    // Fish are moved in place, later fish see earlier fish already moved
    Sequential,
}

// A half-open band [min, max) that per-agent tunables are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    // Draw a value from the band; a degenerate band always yields `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && (value < self.max || (self.min == self.max && value == self.min))
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SimError::InvalidConfig(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(SimError::InvalidConfig(format!(
                "{name}: min {} is greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// Tunables of the single predator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorParams {
    pub enabled: bool,
    pub max_speed: f32,
    pub max_force: f32,
    pub osc_freq: f32,
    pub osc_amp: f32,
    pub osc_phase: f32,
    pub noise_strength: f32,
    pub border_weight: f32,
    // Ticks between target re-acquisitions, drawn from [cooldown_min, cooldown_max)
    pub cooldown_min: i32,
    pub cooldown_max: i32,
    // The chase force is dropped once the target is closer than this
    pub chase_threshold: f32,
}

impl Default for PredatorParams {
    fn default() -> Self {
        Self {
            enabled: true,
            max_speed: 0.38,
            max_force: 0.012,
            osc_freq: 1.1,
            osc_amp: 0.22,
            osc_phase: 999.0,
            noise_strength: 0.008,
            border_weight: 1.7,
            cooldown_min: 240,
            cooldown_max: 420,
            chase_threshold: 0.1,
        }
    }
}

// Parameters for the simulation that can be adjusted via config file or UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    // Tank
    pub world_width: f32,
    pub world_height: f32,
    pub world_depth: f32,
    pub floor_height: f32,
    pub surface_gap: f32,
    pub border_margin: f32,
    pub border_strength: f32,

    // Population
    pub num_fish: usize,
    pub group_count: usize,
    pub seed: u64,

    // Flocking behavior
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub border_weight: f32,
    pub noise_weight: f32,

    // Motion
    pub min_speed: f32,
    pub max_turn_angle: f32,
    pub look_smoothing: f32,
    pub initial_speed: Band,
    pub max_speed: Band,
    pub max_force: Band,
    pub osc_freq: Band,
    pub osc_amp: Band,
    pub noise_strength: Band,

    pub predator: PredatorParams,

    // Tick orchestration
    pub update_mode: UpdateMode,
    pub enable_spatial_grid: bool,
    pub cell_size_factor: f32,
    pub fixed_physics_fps: f32,
    pub max_steps_per_frame: usize,

    // Viewer toggles
    pub show_debug: bool,
    pub pause_simulation: bool,

    // Internal state for tracking changes
    #[serde(skip)]
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of the parameters that shape the population
#[derive(Debug, Clone, PartialEq)]
struct ParamSnapshot {
    num_fish: usize,
    group_count: usize,
    seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            world_width: 200.0,
            world_height: 140.0,
            world_depth: 110.0,
            floor_height: 1.5,
            surface_gap: 7.5,
            border_margin: 30.0,
            border_strength: 0.25,

            num_fish: 40,
            group_count: 4,
            seed: 12345,

            separation_radius: 75.0,
            alignment_radius: 150.0,
            cohesion_radius: 150.0,
            separation_weight: 1.7,
            alignment_weight: 1.0,
            cohesion_weight: 0.9,
            border_weight: 1.5,
            noise_weight: 1.0,

            min_speed: 0.13,
            max_turn_angle: PI / 18.0,
            look_smoothing: 0.18,
            initial_speed: Band::new(0.7, 1.2),
            max_speed: Band::new(0.32, 0.42),
            max_force: Band::new(0.008, 0.012),
            osc_freq: Band::new(1.2, 1.9),
            osc_amp: Band::new(0.18, 0.26),
            noise_strength: Band::new(0.012, 0.020),

            predator: PredatorParams::default(),

            update_mode: UpdateMode::Snapshot,
            enable_spatial_grid: false,
            cell_size_factor: 1.0,
            fixed_physics_fps: 60.0,
            max_steps_per_frame: 5,

            show_debug: false,
            pause_simulation: false,

            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Parse a (possibly partial) TOML document and validate the result
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let params: SimulationParams = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    // Load parameters from a TOML file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let params = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "loaded simulation config");
        Ok(params)
    }

    // Reject configurations that indicate a setup mistake
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        for (name, value) in [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("world_depth", self.world_depth),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }

        for (name, value) in [
            ("separation_radius", self.separation_radius),
            ("alignment_radius", self.alignment_radius),
            ("cohesion_radius", self.cohesion_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }

        if !(self.border_margin.is_finite() && self.border_margin >= 0.0) {
            return invalid(format!("border_margin must be non-negative, got {}", self.border_margin));
        }
        if !self.border_strength.is_finite() {
            return invalid("border_strength must be finite".to_string());
        }
        if self.ceiling() <= self.floor_height {
            return invalid(format!(
                "water column is empty: floor {} is above ceiling {}",
                self.floor_height,
                self.ceiling()
            ));
        }
        // Opposite wall zones must not overlap or the push near one face points outward
        for (name, extent) in [
            ("world_width", self.world_width),
            ("world_depth", self.world_depth),
            ("water column", self.ceiling() - self.floor_height),
        ] {
            if 2.0 * self.border_margin >= extent {
                return invalid(format!(
                    "border_margin {} is too large for {name} {extent}",
                    self.border_margin
                ));
            }
        }
        if self.group_count == 0 {
            return invalid("group_count must be at least 1".to_string());
        }

        if !(self.min_speed.is_finite() && self.min_speed > 0.0) {
            return invalid(format!("min_speed must be positive, got {}", self.min_speed));
        }
        if !(self.max_turn_angle > 0.0 && self.max_turn_angle <= PI) {
            return invalid(format!("max_turn_angle must be in (0, pi], got {}", self.max_turn_angle));
        }
        if !(self.look_smoothing > 0.0 && self.look_smoothing <= 1.0) {
            return invalid(format!("look_smoothing must be in (0, 1], got {}", self.look_smoothing));
        }

        self.initial_speed.validate("initial_speed")?;
        self.max_speed.validate("max_speed")?;
        self.max_force.validate("max_force")?;
        self.osc_freq.validate("osc_freq")?;
        self.osc_amp.validate("osc_amp")?;
        self.noise_strength.validate("noise_strength")?;

        if self.min_speed > self.max_speed.min {
            return invalid(format!(
                "min_speed {} exceeds the lowest max_speed {}",
                self.min_speed, self.max_speed.min
            ));
        }
        if self.max_force.min < 0.0 {
            return invalid("max_force must be non-negative".to_string());
        }

        let predator = &self.predator;
        if self.min_speed > predator.max_speed {
            return invalid(format!(
                "min_speed {} exceeds the predator max_speed {}",
                self.min_speed, predator.max_speed
            ));
        }
        if !(predator.max_force.is_finite() && predator.max_force >= 0.0) {
            return invalid("predator max_force must be non-negative".to_string());
        }
        if predator.cooldown_min <= 0 || predator.cooldown_max <= predator.cooldown_min {
            return invalid(format!(
                "predator cooldown range [{}, {}) is empty or non-positive",
                predator.cooldown_min, predator.cooldown_max
            ));
        }

        if !(self.cell_size_factor.is_finite() && self.cell_size_factor >= 1.0) {
            return invalid(format!(
                "cell_size_factor must be at least 1.0, got {}",
                self.cell_size_factor
            ));
        }
        if !(self.fixed_physics_fps.is_finite() && self.fixed_physics_fps > 0.0) {
            return invalid(format!("fixed_physics_fps must be positive, got {}", self.fixed_physics_fps));
        }
        if self.max_steps_per_frame == 0 {
            return invalid("max_steps_per_frame must be at least 1".to_string());
        }

        Ok(())
    }

    // Top of the swimmable water column
    pub fn ceiling(&self) -> f32 {
        self.world_height - self.surface_gap
    }

    // Largest perception radius, used to size spatial grid cells
    pub fn max_radius(&self) -> f32 {
        self.separation_radius
            .max(self.alignment_radius)
            .max(self.cohesion_radius)
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(ParamSnapshot {
            num_fish: self.num_fish,
            group_count: self.group_count,
            seed: self.seed,
        });
    }

    // Whether the population needs to be restocked since the last snapshot
    pub fn population_changed(&self) -> bool {
        match &self.previous_values {
            Some(prev) => {
                prev.num_fish != self.num_fish
                    || prev.group_count != self.group_count
                    || prev.seed != self.seed
            }
            None => false,
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_num_fish_range() -> RangeInclusive<usize> {
        1..=400
    }

    pub fn get_group_count_range() -> RangeInclusive<usize> {
        1..=8
    }

    pub fn get_weight_range() -> RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn get_radius_range() -> RangeInclusive<f32> {
        5.0..=200.0
    }

    pub fn get_border_strength_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationParams::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let params = SimulationParams::from_toml_str(
            r#"
            num_fish = 12
            update_mode = "sequential"

            [predator]
            cooldown_min = 10
            cooldown_max = 20
            "#,
        )
        .unwrap();

        assert_eq!(params.num_fish, 12);
        assert_eq!(params.update_mode, UpdateMode::Sequential);
        assert_eq!(params.predator.cooldown_min, 10);
        assert_eq!(params.predator.max_speed, PredatorParams::default().max_speed);
        assert_eq!(params.separation_radius, 75.0);
    }

    #[test]
    fn min_speed_above_max_speed_is_rejected() {
        let mut params = SimulationParams::default();
        params.min_speed = 0.5;
        assert!(matches!(params.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn negative_radius_is_rejected() {
        let mut params = SimulationParams::default();
        params.cohesion_radius = -1.0;
        assert!(matches!(params.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn margin_too_large_is_rejected() {
        let mut params = SimulationParams::default();
        params.border_margin = 120.0;
        assert!(matches!(params.validate(), Err(SimError::InvalidConfig(_))));

        // Half the depth exactly: the two wall zones would meet in the middle
        params.border_margin = params.world_depth / 2.0;
        assert!(matches!(params.validate(), Err(SimError::InvalidConfig(_))));

        params.border_margin = 54.0;
        params.world_height = 100.0;
        assert!(matches!(params.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn empty_cooldown_range_is_rejected() {
        let mut params = SimulationParams::default();
        params.predator.cooldown_max = params.predator.cooldown_min;
        assert!(params.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SimulationParams::from_toml_str("num_fish = \"many\"").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn population_change_detection() {
        let mut params = SimulationParams::default();
        assert!(!params.population_changed());
        params.take_snapshot();
        params.separation_weight = 2.0;
        assert!(!params.population_changed());
        params.num_fish += 1;
        assert!(params.population_changed());
    }

    #[test]
    fn degenerate_band_samples_min() {
        let mut rng = rand::thread_rng();
        let band = Band::new(0.5, 0.5);
        assert_eq!(band.sample(&mut rng), 0.5);
        assert!(band.contains(0.5));
    }
}
