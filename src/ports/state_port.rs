//! Ledger persistence port trait.

use crate::domain::error::PapertraderError;
use crate::domain::ledger::LedgerState;

/// Whole-document persistence of the ledger: no partial updates.
pub trait StatePort {
    /// Load persisted state. A missing document yields a fresh default
    /// state; a malformed one is `CorruptState` and the caller decides
    /// whether to reset.
    fn load(&self) -> Result<LedgerState, PapertraderError>;

    /// Serialize the entire state, overwriting the previous document.
    fn save(&self, state: &LedgerState) -> Result<(), PapertraderError>;
}
