//! Procedural obstacle and hazard generation
//!
//! Two independent timers: obstacle pairs (paced by the tier speed factor)
//! and hunter throws (paced by the tier throw factor). Also scrolls the
//! world and prunes anything that has left the playfield.

use glam::Vec2;

use super::difficulty::Tier;
use super::rng::RandomSource;
use super::state::{GameEvent, Hazard, ObstaclePair, Rect, Round};
use crate::consts::HAZARD_LAUNCH_OFFSET;
use crate::tuning::Tuning;

/// Pairs are dropped once their right edge passes this x
const OBSTACLE_CULL_X: f32 = -10.0;

/// Clamp that tolerates `lo > hi` (admin values can produce that); `lo` wins.
#[inline]
fn soft_clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}

/// Build a new obstacle pair just beyond the right edge
pub fn spawn_obstacle_pair(
    round: &mut Round,
    tier: &Tier,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) {
    let o = &tuning.obstacles;
    let h = tuning.world.height;

    let gap = (o.gap_base * tier.gap).max(o.gap_min);
    let gap_y = rng.range(o.band_margin, h - o.band_margin);
    let top_h = soft_clamp(gap_y - gap / 2.0, o.min_height, h - gap - o.min_height);
    let bottom_y = gap_y + gap / 2.0;
    let bottom_h = soft_clamp(h - bottom_y, o.min_height, h - o.min_height);
    let x = tuning.world.width + o.spawn_margin;

    let pair = ObstaclePair {
        id: round.next_entity_id(),
        top: Rect::new(x, 0.0, o.width, top_h),
        bottom: Rect::new(x, h - bottom_h, o.width, bottom_h),
        passed: false,
    };
    log::debug!("Obstacle {} gap {:.0} at y {:.0}", pair.id, gap, gap_y);
    round.obstacles.push(pair);
}

/// Throw one projectile from the hunter toward the flyer's current position
pub fn throw_hazard(
    round: &mut Round,
    tier: &Tier,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> Hazard {
    let cfg = &tuning.hazards;
    let kind = cfg.kinds[rng.index(cfg.kinds.len())];
    let speed = rng.range(cfg.speed_min, cfg.speed_max) * (0.9 + 0.2 * tier.speed) * cfg.speed_mult;
    let aim = (round.flyer.pos - round.hunter.pos)
        .try_normalize()
        .unwrap_or(Vec2::X);

    let hazard = Hazard {
        id: round.next_entity_id(),
        pos: round.hunter.pos + Vec2::new(HAZARD_LAUNCH_OFFSET, 0.0),
        vel: aim * speed,
        radius: cfg.radius,
        kind,
    };
    round.hazards.push(hazard.clone());
    hazard
}

/// Move the hunter and fire when its timer expires
pub fn update_hunter(
    round: &mut Round,
    tier: &Tier,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let cfg = &tuning.hazards;
    let hunter = &mut round.hunter;
    hunter.pos.x = round.flyer.lane_x - cfg.hunter_offset;
    hunter.pos.y += (round.flyer.pos.y - hunter.pos.y) * cfg.hunter_follow;

    hunter.throw_timer -= dt;
    if hunter.throw_timer <= 0.0 {
        hunter.throw_timer = rng.range(cfg.throw_min, cfg.throw_max) / tier.throws;
        let hazard = throw_hazard(round, tier, tuning, rng);
        log::debug!("Hunter threw {:?} at {:.0} u/s", hazard.kind, hazard.vel.length());
        events.push(GameEvent::HazardThrown { kind: hazard.kind });
    }
}

/// Run spawn timers, scroll the world, prune off-screen entities.
///
/// Returns the distance the world scrolled this tick.
pub fn advance(
    round: &mut Round,
    tier: &Tier,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> f32 {
    round.pipe_timer -= dt;
    if round.pipe_timer <= 0.0 {
        spawn_obstacle_pair(round, tier, tuning, rng);
        round.pipe_timer = tuning.obstacles.interval / tier.speed;
    }

    update_hunter(round, tier, tuning, rng, dt, events);

    let scroll = tuning.physics.base_speed * tier.speed * dt;
    for pair in &mut round.obstacles {
        pair.scroll(scroll);
    }
    for hazard in &mut round.hazards {
        hazard.pos += hazard.vel * dt;
    }

    let margin = tuning.hazards.cull_margin;
    let (w, h) = (tuning.world.width, tuning.world.height);
    round.obstacles.retain(|p| p.trailing_edge() > OBSTACLE_CULL_X);
    round.hazards.retain(|hz| {
        hz.pos.x > -margin && hz.pos.x < w + margin && hz.pos.y > -margin && hz.pos.y < h + margin
    });

    scroll
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::DifficultySchedule;
    use crate::sim::rng::SimRng;
    use crate::sim::rng::tests::FixedRng;
    use crate::sim::state::HazardKind;

    fn running_round(tuning: &Tuning) -> Round {
        Round::running(10, tuning, &mut SimRng::seeded(5))
    }

    #[test]
    fn test_pair_geometry() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let mut round = running_round(&tuning);
        // FixedRng(0.5) puts the gap centre in the middle of the band
        spawn_obstacle_pair(
            &mut round,
            schedule.tier_for(0.0),
            &tuning,
            &mut FixedRng(0.5),
        );

        let pair = &round.obstacles[0];
        let h = tuning.world.height;
        assert_eq!(pair.x(), tuning.world.width + tuning.obstacles.spawn_margin);
        assert_eq!(pair.top.y, 0.0);
        assert!((pair.bottom.y + pair.bottom.h - h).abs() < 1e-3);
        let gap = pair.bottom.y - pair.top.h;
        assert!((gap - tuning.obstacles.gap_base).abs() < 1e-3);
        assert!((pair.gap_center() - h * 0.5).abs() < 1e-3);
        assert!(!pair.passed);
    }

    #[test]
    fn test_gap_shrinks_with_tier_but_respects_floor() {
        let mut tuning = Tuning::default();
        let schedule = DifficultySchedule::default();

        let mut round = running_round(&tuning);
        spawn_obstacle_pair(
            &mut round,
            schedule.tier_for(95.0),
            &tuning,
            &mut FixedRng(0.5),
        );
        let pair = &round.obstacles[0];
        let gap = pair.bottom.y - pair.top.h;
        assert!((gap - tuning.obstacles.gap_base * 0.85).abs() < 1e-3);

        tuning.obstacles.gap_base = 40.0;
        let mut round = running_round(&tuning);
        spawn_obstacle_pair(
            &mut round,
            schedule.tier_for(95.0),
            &tuning,
            &mut FixedRng(0.5),
        );
        let pair = &round.obstacles[0];
        let gap = pair.bottom.y - pair.top.h;
        assert!((gap - tuning.obstacles.gap_min).abs() < 1e-3);
    }

    #[test]
    fn test_throw_aims_at_flyer() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let mut round = running_round(&tuning);
        round.flyer.pos.y = 100.0;
        let hazard = throw_hazard(
            &mut round,
            schedule.tier_for(0.0),
            &tuning,
            &mut FixedRng(0.0),
        );

        let expected_dir = (round.flyer.pos - round.hunter.pos).normalize();
        assert!(hazard.vel.normalize().dot(expected_dir) > 0.9999);
        // Minimum speed at tier speed 1.0
        let expected_speed = tuning.hazards.speed_min * 1.1;
        assert!((hazard.vel.length() - expected_speed).abs() < 1e-2);
        assert_eq!(hazard.kind, HazardKind::Boot);
        assert_eq!(round.hazards.len(), 1);
    }

    #[test]
    fn test_hunter_follows_smoothly() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let mut round = running_round(&tuning);
        round.hunter.throw_timer = 100.0;
        round.hunter.pos.y = 300.0;
        round.flyer.pos.y = 100.0;
        let mut events = Vec::new();
        let tier = schedule.tier_for(0.0);
        update_hunter(
            &mut round,
            tier,
            &tuning,
            &mut FixedRng(0.5),
            0.016,
            &mut events,
        );
        // Closes 10% of the gap, never snaps
        assert!((round.hunter.pos.y - 280.0).abs() < 1e-3);
        assert_eq!(round.hunter.pos.x, round.flyer.lane_x - tuning.hazards.hunter_offset);
        assert!(events.is_empty());
    }

    #[test]
    fn test_throw_timer_scaled_by_tier() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let mut round = running_round(&tuning);
        round.hunter.throw_timer = 0.01;
        let mut events = Vec::new();
        let tier = schedule.tier_for(95.0);
        update_hunter(
            &mut round,
            tier,
            &tuning,
            &mut FixedRng(0.5),
            0.02,
            &mut events,
        );
        let cfg = &tuning.hazards;
        let base = cfg.throw_min + 0.5 * (cfg.throw_max - cfg.throw_min);
        assert!((round.hunter.throw_timer - base / tier.throws).abs() < 1e-4);
        assert!(matches!(events[0], GameEvent::HazardThrown { .. }));
    }

    #[test]
    fn test_advance_scrolls_and_prunes() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let tier = schedule.tier_for(0.0);
        let mut round = running_round(&tuning);
        round.hunter.throw_timer = 100.0;
        let mut events = Vec::new();

        // First tick spawns immediately
        let scroll = advance(
            &mut round,
            tier,
            &tuning,
            &mut FixedRng(0.5),
            0.02,
            &mut events,
        );
        assert_eq!(round.obstacles.len(), 1);
        assert!((scroll - tuning.physics.base_speed * 0.02).abs() < 1e-4);
        assert!((round.pipe_timer - tuning.obstacles.interval).abs() < 1e-4);

        // Push the pair nearly off-screen and a hazard out of bounds
        let dx = round.obstacles[0].x() + tuning.obstacles.width + 9.0;
        round.obstacles[0].scroll(dx);
        round.hazards.push(Hazard {
            id: 99,
            pos: Vec2::new(100.0, -39.0),
            vel: Vec2::new(0.0, -200.0),
            radius: 10.0,
            kind: HazardKind::Pie,
        });
        advance(
            &mut round,
            tier,
            &tuning,
            &mut FixedRng(0.5),
            0.02,
            &mut events,
        );
        assert!(round.obstacles.is_empty());
        assert!(round.hazards.is_empty());
    }

    #[test]
    fn test_pipe_timer_scaled_by_tier_speed() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let tier = schedule.tier_for(95.0);
        let mut round = running_round(&tuning);
        round.hunter.throw_timer = 100.0;
        round.pipe_timer = 0.01;
        let mut events = Vec::new();

        let scroll = advance(
            &mut round,
            tier,
            &tuning,
            &mut FixedRng(0.5),
            0.02,
            &mut events,
        );
        assert_eq!(round.obstacles.len(), 1);
        // Chaotic tier runs at 1.6x: pairs come faster and the world scrolls faster
        assert!((round.pipe_timer - tuning.obstacles.interval / 1.6).abs() < 1e-5);
        assert!((scroll - tuning.physics.base_speed * 1.6 * 0.02).abs() < 1e-4);
    }
}
