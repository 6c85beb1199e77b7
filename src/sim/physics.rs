//! Flyer integration: gravity, flap impulses, wind, play-area bounds

use super::state::{Flyer, TerminalCause};
use super::wind::{WindDirection, WindState};
use crate::tuning::Tuning;

/// Set vertical velocity to the flap impulse. Ignored for a dead flyer.
pub fn flap(flyer: &mut Flyer, impulse: f32) -> bool {
    if !flyer.alive {
        return false;
    }
    flyer.vel.y = impulse;
    true
}

/// Advance the flyer by `dt` (already clamped by the caller).
///
/// Returns a terminal cause when the flyer touches the ground. The ceiling
/// is solid but safe: the flyer is pinned under it with zero vertical speed.
pub fn integrate(
    flyer: &mut Flyer,
    wind: &WindState,
    tuning: &Tuning,
    dt: f32,
) -> Option<TerminalCause> {
    let gravity = tuning.physics.gravity;
    let wind_cfg = &tuning.wind;

    flyer.vel.y += gravity * dt;

    if wind.is_gusting() && wind.direction == WindDirection::Up {
        flyer.vel.y -= gravity * wind_cfg.lift_factor * wind.strength * dt;
    }

    if wind_cfg.horizontal {
        match (wind.is_gusting(), wind.direction) {
            (true, WindDirection::Left) => flyer.vel.x = -wind.strength * wind_cfg.drift_speed,
            (true, WindDirection::Right) => flyer.vel.x = wind.strength * wind_cfg.drift_speed,
            _ => flyer.vel.x *= (-wind_cfg.drift_damping * dt).exp(),
        }
        flyer.pos.x += flyer.vel.x * dt;
        let band = wind_cfg.drift_band;
        flyer.pos.x = flyer.pos.x.min(flyer.lane_x + band).max(flyer.lane_x - band);
    } else {
        flyer.vel.x = 0.0;
        flyer.pos.x = flyer.lane_x;
    }

    flyer.pos.y += flyer.vel.y * dt;

    let floor = tuning.world.height - tuning.world.ground_height;
    if flyer.pos.y + flyer.radius >= floor {
        return Some(TerminalCause::Ground);
    }
    if flyer.pos.y - flyer.radius <= 0.0 {
        flyer.pos.y = flyer.radius;
        flyer.vel.y = 0.0;
    }
    None
}
