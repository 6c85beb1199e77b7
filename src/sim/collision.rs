//! Collision detection and multiplier scoring
//!
//! Runs once per tick after everything has moved. Every multiplier change
//! here is additive and non-negative.

use glam::Vec2;

use super::difficulty::Tier;
use super::state::{GameEvent, HazardEffect, Rect, Round, TerminalCause};
use crate::tuning::Tuning;

/// Circle vs axis-aligned rectangle: clamp the centre into the rectangle and
/// compare squared distances. A negative width or height spans the other way.
#[inline]
pub fn circle_rect_hit(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let a = Vec2::new(rect.x, rect.y);
    let b = Vec2::new(rect.x + rect.w, rect.y + rect.h);
    let nearest = center.max(a.min(b)).min(a.max(b));
    (center - nearest).length_squared() <= radius * radius
}

#[inline]
pub fn circle_circle_hit(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    (a - b).length_squared() <= r * r
}

/// Continuous growth, proportional to dt and tier speed
pub fn apply_time_growth(round: &mut Round, tier: &Tier, tuning: &Tuning, dt: f32) {
    round.add_multiplier(tuning.scoring.per_second * dt as f64 * tier.speed as f64);
}

/// Mark pairs the flyer has got past. Returns the number of new clears.
pub fn detect_clears(round: &mut Round, tuning: &Tuning, events: &mut Vec<GameEvent>) -> u32 {
    let flyer_x = round.flyer.pos.x;
    let mut cleared = 0;
    for pair in round.obstacles.iter_mut().filter(|p| !p.passed) {
        if flyer_x > pair.trailing_edge() {
            pair.passed = true;
            cleared += 1;
        }
    }
    for _ in 0..cleared {
        round.clears += 1;
        round.add_multiplier(tuning.scoring.per_clear);
        events.push(GameEvent::Cleared {
            clears: round.clears,
        });
    }
    cleared
}

/// Accumulate distance and reward every quantum crossed, including several
/// in one tick. Returns the number of quanta rewarded.
pub fn accrue_distance(
    round: &mut Round,
    tuning: &Tuning,
    scroll: f32,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let scoring = &tuning.scoring;
    round.distance += scroll * scoring.distance_scale;
    let steps = (round.distance / scoring.distance_quantum).floor() as u32;
    if steps <= round.distance_steps {
        return 0;
    }
    let gained = steps - round.distance_steps;
    round.add_multiplier(scoring.per_quantum * gained as f64);
    round.distance_steps = steps;
    events.push(GameEvent::DistanceMilestone { steps });
    gained
}

/// Any overlap with an obstacle rectangle is terminal
pub fn check_obstacles(round: &Round) -> Option<TerminalCause> {
    let flyer = &round.flyer;
    round
        .obstacles
        .iter()
        .flat_map(|p| [&p.top, &p.bottom])
        .any(|rect| circle_rect_hit(flyer.pos, flyer.radius, rect))
        .then_some(TerminalCause::Obstacle)
}

/// Resolve flyer contact with projectiles. Bonus projectiles are consumed,
/// harmless ones pass through, lethal ones end the round.
pub fn check_hazards(
    round: &mut Round,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> Option<TerminalCause> {
    let (pos, radius) = (round.flyer.pos, round.flyer.radius);
    let mut bonuses = 0u32;
    let mut lethal = false;

    round.hazards.retain(|hz| {
        if lethal || !circle_circle_hit(pos, radius, hz.pos, hz.radius) {
            return true;
        }
        match hz.kind.effect() {
            HazardEffect::Bonus => {
                bonuses += 1;
                false
            }
            HazardEffect::Harmless => true,
            HazardEffect::Lethal => {
                lethal = true;
                true
            }
        }
    });

    for _ in 0..bonuses {
        round.add_multiplier(tuning.scoring.bonus);
        events.push(GameEvent::BonusCollected {
            amount: tuning.scoring.bonus,
        });
    }

    lethal.then_some(TerminalCause::Hazard)
}

/// Full scoring pass for one tick, in order: time growth, clears, distance,
/// obstacle hits, hazard hits.
pub fn score_tick(
    round: &mut Round,
    tier: &Tier,
    tuning: &Tuning,
    scroll: f32,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> Option<TerminalCause> {
    apply_time_growth(round, tier, tuning, dt);
    detect_clears(round, tuning, events);
    accrue_distance(round, tuning, scroll, events);
    check_obstacles(round).or_else(|| check_hazards(round, tuning, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::DifficultySchedule;
    use crate::sim::rng::SimRng;
    use crate::sim::state::{Hazard, HazardKind, ObstaclePair};

    fn running_round(tuning: &Tuning) -> Round {
        Round::running(10, tuning, &mut SimRng::seeded(11))
    }

    fn pair_at(x: f32) -> ObstaclePair {
        ObstaclePair {
            id: 1,
            top: Rect::new(x, 0.0, 55.0, 200.0),
            bottom: Rect::new(x, 400.0, 55.0, 200.0),
            passed: false,
        }
    }

    fn hazard_at(pos: Vec2, kind: HazardKind) -> Hazard {
        Hazard {
            id: 7,
            pos,
            vel: Vec2::ZERO,
            radius: 10.0,
            kind,
        }
    }

    #[test]
    fn test_circle_rect_hit() {
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);
        // Inside
        assert!(circle_rect_hit(Vec2::new(120.0, 120.0), 5.0, &rect));
        // Touching the left edge
        assert!(circle_rect_hit(Vec2::new(90.0, 120.0), 10.0, &rect));
        // Near a corner but outside the radius
        assert!(!circle_rect_hit(Vec2::new(90.0, 90.0), 10.0, &rect));
        // Far away
        assert!(!circle_rect_hit(Vec2::new(0.0, 0.0), 10.0, &rect));
    }

    #[test]
    fn test_circle_rect_hit_inverted_rect() {
        // Same area as Rect::new(100, 100, 50, 50), described from the far corner
        let rect = Rect::new(150.0, 150.0, -50.0, -50.0);
        assert!(circle_rect_hit(Vec2::new(120.0, 120.0), 5.0, &rect));
        assert!(circle_rect_hit(Vec2::new(90.0, 120.0), 10.0, &rect));
        assert!(!circle_rect_hit(Vec2::new(0.0, 0.0), 10.0, &rect));
    }

    #[test]
    fn test_circle_circle_hit() {
        assert!(circle_circle_hit(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circle_circle_hit(Vec2::ZERO, 5.0, Vec2::new(10.1, 0.0), 5.0));
    }

    #[test]
    fn test_clear_fires_once() {
        let tuning = Tuning::default();
        let mut round = running_round(&tuning);
        round.obstacles.push(pair_at(round.flyer.pos.x - 60.0));
        let mut events = Vec::new();

        assert_eq!(detect_clears(&mut round, &tuning, &mut events), 1);
        assert_eq!(detect_clears(&mut round, &tuning, &mut events), 0);
        assert_eq!(round.clears, 1);
        assert!((round.multiplier() - tuning.scoring.per_clear).abs() < 1e-9);
        assert_eq!(events, vec![GameEvent::Cleared { clears: 1 }]);
    }

    #[test]
    fn test_no_clear_while_overlapping() {
        let tuning = Tuning::default();
        let mut round = running_round(&tuning);
        round.obstacles.push(pair_at(round.flyer.pos.x - 30.0));
        assert_eq!(detect_clears(&mut round, &tuning, &mut Vec::new()), 0);
        assert!(!round.obstacles[0].passed);
    }

    #[test]
    fn test_distance_catch_up_two_quanta() {
        let tuning = Tuning::default();
        let mut round = running_round(&tuning);
        let mut events = Vec::new();
        // 250 distance units in one tick crosses 100 and 200
        let scroll = 250.0 / tuning.scoring.distance_scale;
        let before = round.multiplier();
        assert_eq!(accrue_distance(&mut round, &tuning, scroll, &mut events), 2);
        let gained = round.multiplier() - before;
        assert!((gained - 2.0 * tuning.scoring.per_quantum).abs() < 1e-9);
        assert_eq!(round.distance_steps, 2);

        // Another 40 units: no new quantum
        let scroll = 40.0 / tuning.scoring.distance_scale;
        assert_eq!(accrue_distance(&mut round, &tuning, scroll, &mut events), 0);
        // 20 more crosses 300
        let scroll = 20.0 / tuning.scoring.distance_scale;
        assert_eq!(accrue_distance(&mut round, &tuning, scroll, &mut events), 1);
    }

    #[test]
    fn test_time_growth_scales_with_tier_speed() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let mut slow = running_round(&tuning);
        let mut fast = running_round(&tuning);
        apply_time_growth(&mut slow, schedule.tier_for(0.0), &tuning, 1.0);
        apply_time_growth(&mut fast, schedule.tier_for(95.0), &tuning, 1.0);
        assert!((slow.multiplier() - 0.0015).abs() < 1e-9);
        assert!((fast.multiplier() - 0.0015 * 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_obstacle_hit_is_terminal() {
        let tuning = Tuning::default();
        let mut round = running_round(&tuning);
        round.flyer.pos.y = 190.0;
        round.obstacles.push(pair_at(round.flyer.pos.x - 10.0));
        assert_eq!(check_obstacles(&round), Some(TerminalCause::Obstacle));

        round.flyer.pos.y = 300.0;
        assert_eq!(check_obstacles(&round), None);
    }

    #[test]
    fn test_bonus_hazard_consumed() {
        let tuning = Tuning::default();
        let mut round = running_round(&tuning);
        round.hazards.push(hazard_at(round.flyer.pos, HazardKind::GoldenEgg));
        let mut events = Vec::new();

        assert_eq!(check_hazards(&mut round, &tuning, &mut events), None);
        assert!(round.hazards.is_empty());
        assert!((round.multiplier() - tuning.scoring.bonus).abs() < 1e-9);
        assert_eq!(
            events,
            vec![GameEvent::BonusCollected {
                amount: tuning.scoring.bonus
            }]
        );
    }

    #[test]
    fn test_lethal_and_harmless_hazards() {
        let tuning = Tuning::default();
        let mut round = running_round(&tuning);
        round.hazards.push(hazard_at(round.flyer.pos, HazardKind::Feather));
        assert_eq!(check_hazards(&mut round, &tuning, &mut Vec::new()), None);
        assert_eq!(round.hazards.len(), 1);

        round.hazards.push(hazard_at(round.flyer.pos, HazardKind::Pie));
        assert_eq!(
            check_hazards(&mut round, &tuning, &mut Vec::new()),
            Some(TerminalCause::Hazard)
        );
    }

    #[test]
    fn test_score_tick_never_decreases() {
        let tuning = Tuning::default();
        let schedule = DifficultySchedule::default();
        let mut round = running_round(&tuning);
        let mut last = round.multiplier();
        for i in 0..500 {
            let tier = schedule.tier_for(i as f32 * 0.2);
            score_tick(&mut round, tier, &tuning, 3.0, 1.0 / 60.0, &mut Vec::new());
            assert!(round.multiplier() >= last);
            last = round.multiplier();
        }
    }
}
