//! Error types for rejected commands and bad configuration
//!
//! A crash is not an error: it is a normal round outcome
//! (see [`crate::sim::RoundOutcome::Crashed`]).

use std::fmt;

/// A player command that was rejected. Rejections never touch the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundError {
    /// Wager is zero or larger than the available balance
    InvalidWager { wager: u64, balance: u64 },
    /// `start` while a round is still running
    RoundInProgress,
    /// Cash-out gate not reached yet; the round keeps running
    CashOutTooEarly { multiplier: f64, required: f64 },
    /// Staged tuning failed validation
    InvalidTuning(TuningError),
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::InvalidWager { wager, balance } => {
                write!(f, "invalid wager {wager} (balance {balance})")
            }
            RoundError::RoundInProgress => write!(f, "a round is already running"),
            RoundError::CashOutTooEarly {
                multiplier,
                required,
            } => write!(
                f,
                "cannot cash out at {multiplier:.2}x, multiplier must exceed {required:.2}x"
            ),
            RoundError::InvalidTuning(err) => write!(f, "invalid tuning: {err}"),
        }
    }
}

impl std::error::Error for RoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoundError::InvalidTuning(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TuningError> for RoundError {
    fn from(err: TuningError) -> Self {
        RoundError::InvalidTuning(err)
    }
}

/// Problems with a tuning document or admin override
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// Difficulty table has no tiers
    EmptySchedule,
    /// First tier must start at t = 0
    FirstTierNotZero(f32),
    /// Tier thresholds must be strictly increasing
    UnsortedSchedule { index: usize },
    /// A rate factor that divides a spawn interval must be positive
    NonPositiveFactor { field: &'static str, value: f32 },
    /// A size that may be zero but not negative
    NegativeValue { field: &'static str, value: f32 },
    /// A random range has min > max
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    /// Hazard throw set is empty
    NoHazardKinds,
    /// JSON could not be parsed
    Parse(String),
    /// Tuning file could not be read
    Io(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::EmptySchedule => write!(f, "difficulty schedule is empty"),
            TuningError::FirstTierNotZero(t) => {
                write!(f, "first difficulty tier starts at {t}s, expected 0s")
            }
            TuningError::UnsortedSchedule { index } => {
                write!(f, "difficulty tier {index} does not start after the previous one")
            }
            TuningError::NonPositiveFactor { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            TuningError::NegativeValue { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            TuningError::InvertedRange { field, min, max } => {
                write!(f, "{field} range is inverted ({min} > {max})")
            }
            TuningError::NoHazardKinds => write!(f, "hazard throw set is empty"),
            TuningError::Parse(msg) => write!(f, "parse error: {msg}"),
            TuningError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        TuningError::Io(err.to_string())
    }
}
