//! Time-based difficulty schedule
//!
//! A step function over elapsed round time: the active tier is the last
//! entry whose threshold is at or below the elapsed time. No interpolation.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// One row of the difficulty table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Elapsed round time (seconds) at which this tier becomes active
    pub threshold_secs: f32,
    /// World scroll speed factor (also paces obstacle spawns)
    pub speed: f32,
    /// Hazard throw rate factor
    pub throws: f32,
    /// Obstacle gap size factor (lower = tighter)
    pub gap: f32,
    /// Gust strength factor
    pub wind: f32,
    /// Display name for the HUD
    pub label: String,
}

impl Tier {
    fn new(threshold_secs: f32, speed: f32, throws: f32, gap: f32, wind: f32, label: &str) -> Self {
        Self {
            threshold_secs,
            speed,
            throws,
            gap,
            wind,
            label: label.to_string(),
        }
    }
}

/// Ordered difficulty table. Never empty, first threshold is 0, thresholds
/// strictly increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct DifficultySchedule {
    tiers: Vec<Tier>,
}

impl TryFrom<Vec<Tier>> for DifficultySchedule {
    type Error = TuningError;

    fn try_from(tiers: Vec<Tier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<DifficultySchedule> for Vec<Tier> {
    fn from(schedule: DifficultySchedule) -> Self {
        schedule.tiers
    }
}

impl Default for DifficultySchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                Tier::new(0.0, 1.00, 0.80, 1.00, 1.00, "Mild"),
                Tier::new(30.0, 1.20, 1.00, 0.95, 1.10, "Moderate"),
                Tier::new(60.0, 1.40, 1.15, 0.90, 1.25, "Strong"),
                Tier::new(90.0, 1.60, 1.35, 0.85, 1.50, "Chaotic"),
            ],
        }
    }
}

impl DifficultySchedule {
    pub fn new(tiers: Vec<Tier>) -> Result<Self, TuningError> {
        validate(&tiers)?;
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Index of the active tier for `elapsed` seconds
    pub fn tier_index(&self, elapsed: f32) -> usize {
        self.tiers
            .iter()
            .rposition(|t| t.threshold_secs <= elapsed)
            .unwrap_or(0)
    }

    /// Active tier for `elapsed` seconds
    pub fn tier_for(&self, elapsed: f32) -> &Tier {
        &self.tiers[self.tier_index(elapsed)]
    }

    /// Overwrite every tier's wind factor (admin "wind power" knob)
    pub fn set_wind_power(&mut self, power: f32) {
        for tier in &mut self.tiers {
            tier.wind = power;
        }
    }
}

fn validate(tiers: &[Tier]) -> Result<(), TuningError> {
    let first = tiers.first().ok_or(TuningError::EmptySchedule)?;
    if first.threshold_secs != 0.0 {
        return Err(TuningError::FirstTierNotZero(first.threshold_secs));
    }
    for (index, pair) in tiers.windows(2).enumerate() {
        if pair[1].threshold_secs <= pair[0].threshold_secs {
            return Err(TuningError::UnsortedSchedule { index: index + 1 });
        }
    }
    for tier in tiers {
        if tier.speed <= 0.0 {
            return Err(TuningError::NonPositiveFactor {
                field: "tier.speed",
                value: tier.speed,
            });
        }
        if tier.throws <= 0.0 {
            return Err(TuningError::NonPositiveFactor {
                field: "tier.throws",
                value: tier.throws,
            });
        }
    }
    Ok(())
}
