//! Demo pilot
//!
//! Steers toward the centre of the next gap and cashes out at a target
//! multiplier. Used by the headless runner and in tests.

use serde::{Deserialize, Serialize};

use super::state::Round;
use crate::tuning::Tuning;

/// Commands for the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PilotCommand {
    pub flap: bool,
    pub cash_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autopilot {
    /// Cash out once the multiplier reaches this
    pub cash_out_at: f64,
    /// How far below the target the flyer may sink before flapping
    pub slack: f32,
    /// Seconds of look-ahead when checking for the ground
    pub ground_lookahead: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            cash_out_at: 1.05,
            slack: 12.0,
            ground_lookahead: 0.12,
        }
    }
}

impl Autopilot {
    pub fn new(cash_out_at: f64) -> Self {
        Self {
            cash_out_at,
            ..Default::default()
        }
    }

    /// Height the flyer should hold: centre of the nearest gap still ahead
    pub fn target_y(&self, round: &Round, tuning: &Tuning) -> f32 {
        let flyer = &round.flyer;
        round
            .obstacles
            .iter()
            .filter(|p| p.trailing_edge() + flyer.radius > flyer.pos.x)
            .min_by(|a, b| a.x().total_cmp(&b.x()))
            .map(|p| p.gap_center())
            .unwrap_or(tuning.world.height * 0.5)
    }

    pub fn decide(&self, round: &Round, tuning: &Tuning) -> PilotCommand {
        if !round.is_running() {
            return PilotCommand::default();
        }
        let flyer = &round.flyer;
        let target = self.target_y(round, tuning);

        let floor = tuning.world.height - tuning.world.ground_height;
        let predicted = flyer.pos.y + flyer.vel.y * self.ground_lookahead;
        let near_ground = predicted + flyer.radius >= floor;
        let sinking = flyer.vel.y > 0.0 && flyer.pos.y > target + self.slack;

        PilotCommand {
            flap: flyer.alive && (near_ground || sinking),
            cash_out: round.multiplier() >= self.cash_out_at,
        }
    }
}
