//! Deterministic round simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped time steps only
//! - Injected RNG only
//! - Stable iteration order (entities kept in spawn order)
//! - No rendering, audio, or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod wind;

pub use autopilot::{Autopilot, PilotCommand};
pub use collision::{circle_circle_hit, circle_rect_hit};
pub use difficulty::{DifficultySchedule, Tier};
pub use rng::{RandomSource, RngState, SimRng};
pub use state::{
    Flyer, GameEvent, Hazard, HazardEffect, HazardKind, Hunter, ObstaclePair, Rect, Round,
    RoundOutcome, RoundPhase, Snapshot, TerminalCause,
};
pub use tick::tick;
pub use wind::{WindDirection, WindState};
