//! Token balance collaborator
//!
//! The round controller is the only caller: one debit when a round starts,
//! one credit when it resolves.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Balance a player stakes from
pub trait TokenLedger {
    fn balance(&self) -> u64;
    fn debit(&mut self, amount: u64);
    fn credit(&mut self, amount: u64);
}

/// Starting balance for a new player
pub const DEFAULT_BALANCE: u64 = 100;

/// A single integer balance, persisted as a bare JSON number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wallet {
    balance: u64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Load a saved balance, falling back to the default balance
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(json.trim()) {
                Ok(wallet) => {
                    log::info!("Loaded wallet from {}", path.display());
                    wallet
                }
                Err(e) => {
                    log::warn!("Corrupt wallet at {}: {}; starting fresh", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No wallet at {}, starting with {}", path.display(), DEFAULT_BALANCE);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string(self).map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Wallet saved ({} tokens)", self.balance);
        Ok(())
    }
}

impl TokenLedger for Wallet {
    fn balance(&self) -> u64 {
        self.balance
    }

    /// Never goes below zero
    fn debit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_sub(amount);
    }

    fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_balance() {
        assert_eq!(Wallet::default().balance(), 100);
    }

    #[test]
    fn test_debit_saturates() {
        let mut wallet = Wallet::new(5);
        wallet.debit(10);
        assert_eq!(wallet.balance(), 0);
        wallet.credit(7);
        assert_eq!(wallet.balance(), 7);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let wallet = Wallet::new(42);
        assert_eq!(serde_json::to_string(&wallet).unwrap(), "42");
        let back: Wallet = serde_json::from_str("42").unwrap();
        assert_eq!(back, wallet);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("flappy-wallet-{}.json", std::process::id()));
        Wallet::new(321).save(&path).unwrap();
        assert_eq!(Wallet::load_or_default(&path).balance(), 321);
        let _ = std::fs::remove_file(&path);

        assert_eq!(Wallet::load_or_default(&path).balance(), DEFAULT_BALANCE);
    }
}
