//! JSON file persistence for the ledger state.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::domain::error::PapertraderError;
use crate::domain::ledger::LedgerState;
use crate::ports::state_port::StatePort;

pub struct JsonStateAdapter {
    path: PathBuf,
    starting_balance: f64,
}

impl JsonStateAdapter {
    pub fn new(path: PathBuf, starting_balance: f64) -> Self {
        Self {
            path,
            starting_balance,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn corrupt(&self, reason: String) -> PapertraderError {
        PapertraderError::CorruptState {
            file: self.path.display().to_string(),
            reason,
        }
    }

    /// Reject documents that parse but violate ledger invariants.
    fn validate(&self, state: &LedgerState) -> Result<(), PapertraderError> {
        if state.balance < 0.0 {
            return Err(self.corrupt(format!("negative balance {}", state.balance)));
        }
        for (symbol, lots) in &state.holdings {
            if lots.is_empty() {
                return Err(self.corrupt(format!("empty holding for {symbol}")));
            }
            for lot in lots {
                if lot.quantity <= 0 {
                    return Err(self.corrupt(format!(
                        "non-positive lot quantity {} for {symbol}",
                        lot.quantity
                    )));
                }
                if lot.purchase_price <= 0.0 {
                    return Err(self.corrupt(format!(
                        "non-positive purchase price {} for {symbol}",
                        lot.purchase_price
                    )));
                }
            }
        }
        Ok(())
    }
}

impl StatePort for JsonStateAdapter {
    fn load(&self) -> Result<LedgerState, PapertraderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(LedgerState::new(self.starting_balance));
            }
            Err(e) => return Err(e.into()),
        };

        let state: LedgerState =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        self.validate(&state)?;
        Ok(state)
    }

    fn save(&self, state: &LedgerState) -> Result<(), PapertraderError> {
        let json = serde_json::to_string_pretty(state).map_err(io::Error::other)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
