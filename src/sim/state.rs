//! Round state and core simulation types
//!
//! Everything a round needs to advance lives in [`Round`]; starting a new
//! round builds a fresh value so no sub-state leaks between rounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::wind::{WindDirection, WindState};
use crate::tuning::Tuning;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No active wager
    #[default]
    Idle,
    /// Simulation advancing, wager at risk
    Running,
    /// Payout fixed, waiting for the next start
    Resolved,
}

/// What ended a round with a crash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalCause {
    Ground,
    Obstacle,
    Hazard,
}

impl TerminalCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalCause::Ground => "ground",
            TerminalCause::Obstacle => "obstacle",
            TerminalCause::Hazard => "hazard",
        }
    }
}

/// How a resolved round ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundOutcome {
    CashedOut { payout: u64, multiplier: f64 },
    Crashed { cause: TerminalCause },
}

impl RoundOutcome {
    pub fn payout(&self) -> u64 {
        match self {
            RoundOutcome::CashedOut { payout, .. } => *payout,
            RoundOutcome::Crashed { .. } => 0,
        }
    }
}

/// The player-piloted entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flyer {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Resting horizontal position
    pub lane_x: f32,
}

impl Flyer {
    /// A flyer centred vertically in its lane
    pub fn centered(tuning: &Tuning) -> Self {
        let lane_x = tuning.world.width * tuning.world.lane_fraction;
        Self {
            pos: Vec2::new(lane_x, tuning.world.height * 0.5),
            vel: Vec2::ZERO,
            radius: tuning.world.flyer_radius,
            alive: true,
            lane_x,
        }
    }
}

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
}

/// Top stalactite and bottom stalagmite sharing one x
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: u32,
    pub top: Rect,
    pub bottom: Rect,
    /// Set once when the flyer gets past the trailing edge
    pub passed: bool,
}

impl ObstaclePair {
    pub fn x(&self) -> f32 {
        self.top.x
    }

    pub fn trailing_edge(&self) -> f32 {
        self.top.right()
    }

    /// Scroll both rectangles left
    pub fn scroll(&mut self, dx: f32) {
        self.top.x -= dx;
        self.bottom.x -= dx;
    }

    /// Vertical centre of the gap
    pub fn gap_center(&self) -> f32 {
        (self.top.y + self.top.h + self.bottom.y) * 0.5
    }
}

/// What touching a hazard does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardEffect {
    /// Decoration; passes through the flyer
    Harmless,
    /// Ends the round
    Lethal,
    /// One-time multiplier bonus, projectile consumed
    Bonus,
}

/// Thrown object flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Boot,
    Hat,
    Pie,
    GoldenEgg,
    Feather,
}

impl HazardKind {
    pub fn effect(&self) -> HazardEffect {
        match self {
            HazardKind::Boot | HazardKind::Hat | HazardKind::Pie => HazardEffect::Lethal,
            HazardKind::GoldenEgg => HazardEffect::Bonus,
            HazardKind::Feather => HazardEffect::Harmless,
        }
    }
}

/// A ballistic projectile (ignores gravity and wind)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub kind: HazardKind,
}

/// Pursuing hazard source that trails the flyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hunter {
    pub pos: Vec2,
    /// Seconds until the next throw
    pub throw_timer: f32,
}

impl Hunter {
    pub fn new(flyer: &Flyer, tuning: &Tuning, rng: &mut impl RandomSource) -> Self {
        Self {
            pos: Vec2::new(flyer.lane_x - tuning.hazards.hunter_offset, flyer.pos.y),
            throw_timer: rng.range(tuning.hazards.throw_min, tuning.hazards.throw_max),
        }
    }
}

/// Things that happened during a tick or command, for audio/HUD glue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { wager: u64 },
    Flapped,
    Cleared { clears: u32 },
    DistanceMilestone { steps: u32 },
    GustStarted { direction: WindDirection, strength: f32 },
    GustEnded,
    HazardThrown { kind: HazardKind },
    BonusCollected { amount: f64 },
    TierChanged { index: usize, label: String },
    CashedOut { payout: u64 },
    Crashed { cause: TerminalCause },
}

/// One round of play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub phase: RoundPhase,
    /// Tokens at risk; fixed for the round
    pub(crate) wager: u64,
    /// Accrued payout multiplier; only grows while running
    pub(crate) multiplier: f64,
    pub outcome: Option<RoundOutcome>,
    /// Seconds since start
    pub elapsed: f32,
    /// Distance units travelled
    pub distance: f32,
    /// Distance quanta already rewarded
    pub distance_steps: u32,
    pub clears: u32,
    /// Active difficulty tier index (re-derived every tick)
    pub tier_index: usize,
    pub flyer: Flyer,
    pub hunter: Hunter,
    pub wind: WindState,
    /// Obstacle pairs, oldest first
    pub obstacles: Vec<ObstaclePair>,
    /// Projectiles in flight, oldest first
    pub hazards: Vec<Hazard>,
    /// Seconds until the next obstacle pair
    pub pipe_timer: f32,
    next_id: u32,
}

impl Round {
    /// An empty round waiting for a wager
    pub fn idle(tuning: &Tuning, rng: &mut impl RandomSource) -> Self {
        let flyer = Flyer::centered(tuning);
        let hunter = Hunter::new(&flyer, tuning, rng);
        Self {
            phase: RoundPhase::Idle,
            wager: 0,
            multiplier: tuning.scoring.multiplier_start,
            outcome: None,
            elapsed: 0.0,
            distance: 0.0,
            distance_steps: 0,
            clears: 0,
            tier_index: 0,
            flyer,
            hunter,
            wind: WindState::calm(&tuning.wind, rng),
            obstacles: Vec::new(),
            hazards: Vec::new(),
            pipe_timer: 0.0,
            next_id: 1,
        }
    }

    /// A freshly reset round with `wager` at stake
    pub fn running(wager: u64, tuning: &Tuning, rng: &mut impl RandomSource) -> Self {
        let mut round = Self::idle(tuning, rng);
        round.wager = wager;
        round.phase = RoundPhase::Running;
        round
    }

    pub fn wager(&self) -> u64 {
        self.wager
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a non-negative increment to the multiplier
    pub(crate) fn add_multiplier(&mut self, amount: f64) {
        if amount > 0.0 {
            self.multiplier += amount;
        }
    }

    /// End the round with a crash. Payout is zero.
    pub(crate) fn terminate(&mut self, cause: TerminalCause) {
        if self.phase != RoundPhase::Running {
            return;
        }
        self.flyer.alive = false;
        self.phase = RoundPhase::Resolved;
        self.outcome = Some(RoundOutcome::Crashed { cause });
    }

    /// Read-only view for drawing
    pub fn snapshot(&self, tuning: &Tuning) -> Snapshot {
        Snapshot {
            phase: self.phase,
            flyer_position: self.flyer.pos,
            flyer_alive: self.flyer.alive,
            hunter_position: self.hunter.pos,
            obstacles: self.obstacles.clone(),
            projectiles: self.hazards.clone(),
            wind: self.wind.clone(),
            multiplier: self.multiplier,
            wager: self.wager,
            distance: self.distance,
            clears: self.clears,
            elapsed: self.elapsed,
            tier_label: tuning.schedule.tier_for(self.elapsed).label.clone(),
            outcome: self.outcome,
        }
    }
}

/// Per-tick view of a round for the renderer/HUD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub flyer_position: Vec2,
    pub flyer_alive: bool,
    pub hunter_position: Vec2,
    pub obstacles: Vec<ObstaclePair>,
    pub projectiles: Vec<Hazard>,
    pub wind: WindState,
    pub multiplier: f64,
    pub wager: u64,
    pub distance: f32,
    pub clears: u32,
    pub elapsed: f32,
    pub tier_label: String,
    pub outcome: Option<RoundOutcome>,
}

impl Snapshot {
    /// Wind arrow for the HUD
    pub fn wind_arrow(&self) -> &'static str {
        match self.wind.direction {
            WindDirection::None => "-",
            WindDirection::Left => "←",
            WindDirection::Right => "→",
            WindDirection::Up => "↑",
        }
    }
}
