//! Round state machine
//!
//! Owns the current [`Round`], the active tuning, the RNG, and the token
//! ledger. Every wager and multiplier mutation goes through here or through
//! the scoring pass that runs inside [`tick`].
//!
//! ```text
//! IDLE --start(wager)--> RUNNING --cash_out()--> RESOLVED --start--> RUNNING
//!                          |                        ^
//!                          +--terminal collision----+
//! ```

use crate::error::RoundError;
use crate::ledger::TokenLedger;
use crate::sim::physics;
use crate::sim::rng::{RandomSource, SimRng};
use crate::sim::state::{GameEvent, Round, RoundOutcome, RoundPhase, Snapshot};
use crate::sim::tick::tick;
use crate::tuning::{Tuning, TuningOverrides};

pub struct RoundController<L: TokenLedger, R: RandomSource = SimRng> {
    ledger: L,
    rng: R,
    /// Tuning the current round runs with
    tuning: Tuning,
    /// Staged tuning, swapped in at the next start
    pending: Option<Tuning>,
    round: Round,
    /// Ledger already credited for the current round
    settled: bool,
    events: Vec<GameEvent>,
}

impl<L: TokenLedger, R: RandomSource> RoundController<L, R> {
    pub fn new(ledger: L, mut rng: R, tuning: Tuning) -> Result<Self, RoundError> {
        tuning.validate()?;
        let round = Round::idle(&tuning, &mut rng);
        Ok(Self {
            ledger,
            rng,
            tuning,
            pending: None,
            round,
            settled: true,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    /// Largest wager the balance allows ("max bet")
    pub fn max_wager(&self) -> u64 {
        self.ledger.balance()
    }

    /// Begin a round. Debits the wager and resets every piece of round state.
    pub fn start(&mut self, wager: u64) -> Result<(), RoundError> {
        if self.round.is_running() {
            return Err(RoundError::RoundInProgress);
        }
        let balance = self.ledger.balance();
        if wager == 0 || wager > balance {
            log::warn!("Rejected wager {wager} (balance {balance})");
            return Err(RoundError::InvalidWager { wager, balance });
        }

        if let Some(tuning) = self.pending.take() {
            log::info!("Applying staged tuning");
            self.tuning = tuning;
        }

        self.ledger.debit(wager);
        self.round = Round::running(wager, &self.tuning, &mut self.rng);
        self.settled = false;
        log::info!(
            "Round started: wager {wager}, balance {}",
            self.ledger.balance()
        );
        self.events.push(GameEvent::RoundStarted { wager });
        Ok(())
    }

    /// Flap the flyer. Returns false when there is nothing to flap.
    pub fn flap(&mut self) -> bool {
        if !self.round.is_running() {
            return false;
        }
        let flapped = physics::flap(&mut self.round.flyer, self.tuning.physics.flap_impulse);
        if flapped {
            self.events.push(GameEvent::Flapped);
        }
        flapped
    }

    /// Redeem the multiplier against the wager.
    ///
    /// `Ok(None)` when no round is running (nothing happens). Rejected with
    /// [`RoundError::CashOutTooEarly`] while the multiplier is at or below
    /// the configured floor; the round keeps running.
    pub fn cash_out(&mut self) -> Result<Option<u64>, RoundError> {
        if !self.round.is_running() {
            return Ok(None);
        }
        let multiplier = self.round.multiplier();
        if let Some(required) = self.tuning.scoring.cash_out_floor
            && multiplier <= required
        {
            return Err(RoundError::CashOutTooEarly {
                multiplier,
                required,
            });
        }

        let payout = payout_for(self.round.wager(), multiplier);
        self.round.phase = RoundPhase::Resolved;
        self.round.outcome = Some(RoundOutcome::CashedOut { payout, multiplier });
        self.settle();
        log::info!(
            "Cashed out at {multiplier:.2}x: payout {payout}, balance {}",
            self.ledger.balance()
        );
        self.events.push(GameEvent::CashedOut { payout });
        Ok(Some(payout))
    }

    /// Advance one display frame. `frame_dt` is clamped inside the tick.
    pub fn update(&mut self, frame_dt: f32) {
        if !self.round.is_running() {
            return;
        }
        let events = tick(&mut self.round, &self.tuning, &mut self.rng, frame_dt);
        self.events.extend(events);
        if self.round.phase == RoundPhase::Resolved {
            self.settle();
        }
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the renderer/HUD
    pub fn snapshot(&self) -> Snapshot {
        self.round.snapshot(&self.tuning)
    }

    /// Stage a new tuning. It takes effect at the next `start`.
    pub fn reconfigure(&mut self, tuning: Tuning) -> Result<(), RoundError> {
        tuning.validate()?;
        self.pending = Some(tuning);
        Ok(())
    }

    /// Apply admin overrides on top of the newest tuning and stage the result
    pub fn apply_overrides(&mut self, overrides: &TuningOverrides) -> Result<(), RoundError> {
        let mut tuning = self.pending.clone().unwrap_or_else(|| self.tuning.clone());
        tuning.apply(overrides);
        self.reconfigure(tuning)
    }

    /// Credit the resolved round's payout, exactly once
    fn settle(&mut self) {
        if self.settled {
            return;
        }
        let payout = self.round.outcome.map(|o| o.payout()).unwrap_or(0);
        self.ledger.credit(payout);
        self.settled = true;
    }
}

/// floor(wager × multiplier), never negative
pub fn payout_for(wager: u64, multiplier: f64) -> u64 {
    (wager as f64 * multiplier.max(0.0)).floor() as u64
}
