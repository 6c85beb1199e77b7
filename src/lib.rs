//! Flappy Fiasco - a flap-and-cash-out wagering arcade game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (physics, spawning, scoring, wind)
//! - `controller`: Round state machine that owns the wager and multiplier
//! - `ledger`: Token balance collaborator
//! - `tuning`: Data-driven game balance and admin overrides

pub mod controller;
pub mod error;
pub mod ledger;
pub mod sim;
pub mod tuning;

pub use controller::RoundController;
pub use error::{RoundError, TuningError};
pub use ledger::{TokenLedger, Wallet};
pub use tuning::{Tuning, TuningOverrides};

/// Game configuration constants
pub mod consts {
    /// Largest time step a single tick may integrate (stalled frames are clamped)
    pub const MAX_DT: f32 = 1.0 / 30.0;
    /// Nominal display refresh step used by the headless runner
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Default playfield dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Flyer defaults
    pub const FLYER_RADIUS: f32 = 14.0;
    /// Flyer lane as a fraction of world width
    pub const FLYER_LANE_FRACTION: f32 = 0.25;

    /// Hazard defaults
    pub const HAZARD_RADIUS: f32 = 10.0;
    /// Projectiles leave the hunter this far in front of its centre
    pub const HAZARD_LAUNCH_OFFSET: f32 = 22.0;

    /// Distance units per multiplier milestone
    pub const DISTANCE_QUANTUM: f32 = 100.0;
}

/// Clamp a frame delta to the simulation cap. Negative or NaN deltas become 0.
#[inline]
pub fn clamp_dt(dt: f32, cap: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.01, consts::MAX_DT), 0.01);
        assert_eq!(clamp_dt(5.0, consts::MAX_DT), consts::MAX_DT);
        assert_eq!(clamp_dt(-1.0, consts::MAX_DT), 0.0);
        assert_eq!(clamp_dt(f32::NAN, consts::MAX_DT), 0.0);
    }
}
