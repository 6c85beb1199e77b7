//! Game balance constants and admin overrides
//!
//! Loaded from JSON (missing fields fall back to defaults) and swapped in
//! between rounds. The controller never applies a new tuning mid-round.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::difficulty::DifficultySchedule;
use crate::sim::state::HazardKind;

/// Playfield geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    /// Height of the lethal ground strip at the bottom
    pub ground_height: f32,
    pub flyer_radius: f32,
    /// Flyer lane as a fraction of world width
    pub lane_fraction: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            ground_height: 8.0,
            flyer_radius: FLYER_RADIUS,
            lane_fraction: FLYER_LANE_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Vertical velocity set by a flap (negative = up)
    pub flap_impulse: f32,
    /// World scroll speed before tier scaling (units/s)
    pub base_speed: f32,
    /// Largest dt a tick may integrate
    pub max_dt: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 900.0,
            flap_impulse: -320.0,
            base_speed: 150.0,
            max_dt: MAX_DT,
        }
    }
}

/// Multiplier economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Multiplier at round start
    pub multiplier_start: f64,
    /// Cash-out requires the multiplier to exceed this; `None` disables the gate
    pub cash_out_floor: Option<f64>,
    pub per_clear: f64,
    pub per_quantum: f64,
    pub bonus: f64,
    /// Growth per second at tier speed 1.0
    pub per_second: f64,
    /// Distance units credited per unit of world scroll
    pub distance_scale: f32,
    pub distance_quantum: f32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            multiplier_start: 0.0,
            cash_out_floor: Some(1.0),
            per_clear: 0.03,
            per_quantum: 0.01,
            bonus: 0.15,
            per_second: 0.0015,
            distance_scale: 0.25,
            distance_quantum: DISTANCE_QUANTUM,
        }
    }
}

/// Obstacle pair spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub gap_base: f32,
    /// Smallest playable gap after tier scaling
    pub gap_min: f32,
    /// Seconds between pairs at tier speed 1.0
    pub interval: f32,
    pub width: f32,
    /// Pairs appear this far beyond the right edge
    pub spawn_margin: f32,
    /// Shortest a top or bottom rectangle may be
    pub min_height: f32,
    /// Gap centres stay this far from top and bottom
    pub band_margin: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            gap_base: 120.0,
            gap_min: 90.0,
            interval: 1.4,
            width: 55.0,
            spawn_margin: 50.0,
            min_height: 30.0,
            band_margin: 60.0,
        }
    }
}

/// Hunter and projectile tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    pub throw_min: f32,
    pub throw_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_mult: f32,
    /// Hunter distance behind the flyer lane
    pub hunter_offset: f32,
    /// Fraction of the vertical gap the hunter closes each tick
    pub hunter_follow: f32,
    pub radius: f32,
    /// Prune margin outside the playfield
    pub cull_margin: f32,
    /// Flavours drawn uniformly on each throw
    pub kinds: Vec<HazardKind>,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            throw_min: 1.6,
            throw_max: 3.4,
            speed_min: 160.0,
            speed_max: 240.0,
            speed_mult: 1.0,
            hunter_offset: 180.0,
            hunter_follow: 0.1,
            radius: HAZARD_RADIUS,
            cull_margin: 40.0,
            kinds: vec![
                HazardKind::Boot,
                HazardKind::Hat,
                HazardKind::Pie,
                HazardKind::GoldenEgg,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindTuning {
    /// Countdown range to the very first gust of a round
    pub first_gust_min: f32,
    pub first_gust_max: f32,
    /// Countdown range between gust starts
    pub gap_min: f32,
    pub gap_max: f32,
    pub strength_min: f32,
    pub strength_max: f32,
    pub duration_min: f32,
    pub duration_max: f32,
    /// Fraction of gravity cancelled by a full-strength updraft
    pub lift_factor: f32,
    /// Let side gusts push the flyer off its lane
    pub horizontal: bool,
    /// Horizontal speed of a full-strength side gust
    pub drift_speed: f32,
    /// Exponential decay rate of drift once the gust stops (1/s)
    pub drift_damping: f32,
    /// Max distance from the lane either side
    pub drift_band: f32,
}

impl Default for WindTuning {
    fn default() -> Self {
        Self {
            first_gust_min: 4.0,
            first_gust_max: 7.0,
            gap_min: 4.0,
            gap_max: 8.0,
            strength_min: 0.15,
            strength_max: 0.65,
            duration_min: 1.5,
            duration_max: 3.0,
            lift_factor: 0.65,
            horizontal: false,
            drift_speed: 120.0,
            drift_damping: 3.0,
            drift_band: 60.0,
        }
    }
}

/// Complete balance sheet for a round
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub physics: PhysicsTuning,
    pub scoring: ScoringTuning,
    pub obstacles: ObstacleTuning,
    pub hazards: HazardTuning,
    pub wind: WindTuning,
    pub schedule: DifficultySchedule,
}

impl Tuning {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges and rates that would break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        check_range("hazards.throw", self.hazards.throw_min, self.hazards.throw_max)?;
        check_range("hazards.speed", self.hazards.speed_min, self.hazards.speed_max)?;
        check_range("wind.first_gust", self.wind.first_gust_min, self.wind.first_gust_max)?;
        check_range("wind.gap", self.wind.gap_min, self.wind.gap_max)?;
        check_range("wind.strength", self.wind.strength_min, self.wind.strength_max)?;
        check_range("wind.duration", self.wind.duration_min, self.wind.duration_max)?;
        check_positive("physics.max_dt", self.physics.max_dt)?;
        check_positive("obstacles.interval", self.obstacles.interval)?;
        check_positive("obstacles.width", self.obstacles.width)?;
        check_non_negative("obstacles.min_height", self.obstacles.min_height)?;
        check_positive("world.width", self.world.width)?;
        check_positive("world.height", self.world.height)?;
        check_positive("world.flyer_radius", self.world.flyer_radius)?;
        check_non_negative("hazards.radius", self.hazards.radius)?;
        check_positive("hazards.throw_min", self.hazards.throw_min)?;
        check_positive("wind.gap_min", self.wind.gap_min)?;
        check_positive("scoring.distance_quantum", self.scoring.distance_quantum)?;
        if self.hazards.kinds.is_empty() {
            return Err(TuningError::NoHazardKinds);
        }
        Ok(())
    }

    /// Apply admin panel overrides in place
    pub fn apply(&mut self, overrides: &TuningOverrides) {
        let o = overrides;
        if let Some(v) = o.gravity {
            self.physics.gravity = v;
        }
        if let Some(v) = o.flap_impulse {
            self.physics.flap_impulse = v;
        }
        if let Some(v) = o.base_speed {
            self.physics.base_speed = v;
        }
        if let Some(v) = o.multiplier_per_second {
            self.scoring.per_second = v;
        }
        if let Some(v) = o.multiplier_per_clear {
            self.scoring.per_clear = v;
        }
        if let Some(v) = o.multiplier_per_quantum {
            self.scoring.per_quantum = v;
        }
        if let Some(v) = o.multiplier_bonus {
            self.scoring.bonus = v;
        }
        if let Some(v) = o.gap_base {
            self.obstacles.gap_base = v;
        }
        if let Some(v) = o.pipe_interval {
            self.obstacles.interval = v;
        }
        if let Some(v) = o.throw_min {
            self.hazards.throw_min = v;
        }
        if let Some(v) = o.throw_max {
            self.hazards.throw_max = v;
        }
        if let Some(v) = o.projectile_speed_mult {
            // A blank or zero field means "normal speed"
            self.hazards.speed_mult = if v.is_finite() && v != 0.0 { v } else { 1.0 };
        }
        if let Some(v) = o.wind_power {
            self.schedule.set_wind_power(v);
        }
    }
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min > max {
        return Err(TuningError::InvertedRange { field, min, max });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_nan() || value <= 0.0 {
        return Err(TuningError::NonPositiveFactor { field, value });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_nan() || value < 0.0 {
        return Err(TuningError::NegativeValue { field, value });
    }
    Ok(())
}

/// Admin panel inputs; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningOverrides {
    pub gravity: Option<f32>,
    pub flap_impulse: Option<f32>,
    pub base_speed: Option<f32>,
    pub multiplier_per_second: Option<f64>,
    pub multiplier_per_clear: Option<f64>,
    pub multiplier_per_quantum: Option<f64>,
    pub multiplier_bonus: Option<f64>,
    pub gap_base: Option<f32>,
    pub pipe_interval: Option<f32>,
    pub throw_min: Option<f32>,
    pub throw_max: Option<f32>,
    pub projectile_speed_mult: Option<f32>,
    /// Written into every tier's wind factor
    pub wind_power: Option<f32>,
}
