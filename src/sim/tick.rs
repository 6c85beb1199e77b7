//! Simulation tick
//!
//! Advances a running round by one clamped time step, in a fixed order:
//! difficulty, wind, spawner, physics, scoring.

use super::collision::score_tick;
use super::physics;
use super::rng::RandomSource;
use super::spawner;
use super::state::{GameEvent, Round, TerminalCause};
use crate::clamp_dt;
use crate::tuning::Tuning;

/// Advance the round by one step. Does nothing unless the round is running.
///
/// `dt` is clamped to the tuning's `max_dt` so a stalled frame can never
/// integrate far enough to tunnel through an obstacle.
pub fn tick(
    round: &mut Round,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !round.is_running() {
        return events;
    }

    let dt = clamp_dt(dt, tuning.physics.max_dt);
    round.elapsed += dt;

    // Re-derived every tick; never carried over stale
    let tier_index = tuning.schedule.tier_index(round.elapsed);
    let tier = tuning.schedule.tier_for(round.elapsed);
    if tier_index != round.tier_index {
        round.tier_index = tier_index;
        log::info!("Difficulty tier {} ({}) at {:.1}s", tier_index, tier.label, round.elapsed);
        events.push(GameEvent::TierChanged {
            index: tier_index,
            label: tier.label.clone(),
        });
    }

    round.wind.update(dt, tier, &tuning.wind, rng, &mut events);

    let scroll = spawner::advance(round, tier, tuning, rng, dt, &mut events);

    if let Some(cause) = physics::integrate(&mut round.flyer, &round.wind, tuning, dt) {
        crash(round, cause, &mut events);
        return events;
    }

    if let Some(cause) = score_tick(round, tier, tuning, scroll, dt, &mut events) {
        crash(round, cause, &mut events);
    }

    events
}

fn crash(round: &mut Round, cause: TerminalCause, events: &mut Vec<GameEvent>) {
    log::info!(
        "Crashed into {} after {:.1}s ({} clears, {:.2}x lost)",
        cause.as_str(),
        round.elapsed,
        round.clears,
        round.multiplier()
    );
    round.terminate(cause);
    events.push(GameEvent::Crashed { cause });
}
