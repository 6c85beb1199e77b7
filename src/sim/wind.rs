//! Gust generator
//!
//! Two independent timers: a countdown to the next gust, and the remaining
//! duration of the current one. A gust ending does not schedule the next
//! one, so calm gaps of any length are possible.

use serde::{Deserialize, Serialize};

use super::difficulty::Tier;
use super::rng::RandomSource;
use super::state::GameEvent;
use crate::tuning::WindTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindDirection {
    #[default]
    None,
    Left,
    Right,
    Up,
}

/// Directions a new gust may blow
const GUST_DIRECTIONS: [WindDirection; 3] =
    [WindDirection::Left, WindDirection::Right, WindDirection::Up];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindState {
    pub direction: WindDirection,
    /// 0 = calm, 1 = strongest gust
    pub strength: f32,
    /// Seconds left in the current gust
    pub gust_remaining: f32,
    /// Seconds until the next gust starts
    pub next_gust_in: f32,
}

impl WindState {
    /// No gust; first one scheduled from the opening range
    pub fn calm(cfg: &WindTuning, rng: &mut impl RandomSource) -> Self {
        Self {
            direction: WindDirection::None,
            strength: 0.0,
            gust_remaining: 0.0,
            next_gust_in: rng.range(cfg.first_gust_min, cfg.first_gust_max),
        }
    }

    pub fn is_gusting(&self) -> bool {
        self.strength > 0.0
    }

    /// Advance both timers by `dt`
    pub fn update(
        &mut self,
        dt: f32,
        tier: &Tier,
        cfg: &WindTuning,
        rng: &mut impl RandomSource,
        events: &mut Vec<GameEvent>,
    ) {
        self.gust_remaining -= dt;
        self.next_gust_in -= dt;

        if self.gust_remaining <= 0.0 && self.is_gusting() {
            self.strength = 0.0;
            self.direction = WindDirection::None;
            events.push(GameEvent::GustEnded);
        }

        if self.next_gust_in <= 0.0 {
            self.direction = GUST_DIRECTIONS[rng.index(GUST_DIRECTIONS.len())];
            self.strength =
                (rng.range(cfg.strength_min, cfg.strength_max) * tier.wind).clamp(0.0, 1.0);
            self.gust_remaining = rng.range(cfg.duration_min, cfg.duration_max);
            self.next_gust_in = rng.range(cfg.gap_min, cfg.gap_max);
            log::debug!(
                "Gust {:?} at {:.2} for {:.1}s",
                self.direction,
                self.strength,
                self.gust_remaining
            );
            events.push(GameEvent::GustStarted {
                direction: self.direction,
                strength: self.strength,
            });
        }
    }
}
