//! Ledger state: cash balance, holdings, watchlist, transaction log.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::lot::Lot;
use super::transaction::Transaction;

/// The whole session state. Persisted wholesale as one JSON document; the
/// member names and layout match the on-disk schema (`portfolio` maps each
/// symbol to its lots in acquisition order, oldest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    #[serde(rename = "portfolio")]
    pub holdings: HashMap<String, Vec<Lot>>,
    pub transactions: Vec<Transaction>,
    pub balance: f64,
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub watchlist: HashSet<String>,
}

impl LedgerState {
    pub fn new(starting_balance: f64) -> Self {
        LedgerState {
            holdings: HashMap::new(),
            transactions: Vec::new(),
            balance: starting_balance,
            watchlist: HashSet::new(),
        }
    }

    pub fn has_holding(&self, symbol: &str) -> bool {
        self.holdings.contains_key(symbol)
    }

    pub fn lots(&self, symbol: &str) -> Option<&[Lot]> {
        self.holdings.get(symbol).map(Vec::as_slice)
    }

    /// Total shares owned across all lots of a symbol; 0 when not held.
    pub fn total_quantity(&self, symbol: &str) -> i64 {
        self.holdings
            .get(symbol)
            .map(|lots| lots.iter().map(|lot| lot.quantity).sum())
            .unwrap_or(0)
    }

    pub fn record_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Add a symbol to the watchlist. Re-watching is a no-op; returns
    /// whether the symbol was newly added.
    pub fn watch(&mut self, symbol: &str) -> bool {
        self.watchlist.insert(symbol.to_string())
    }

    /// Remove a symbol from the watchlist; returns whether it was present.
    pub fn unwatch(&mut self, symbol: &str) -> bool {
        self.watchlist.remove(symbol)
    }

    pub fn is_watched(&self, symbol: &str) -> bool {
        self.watchlist.contains(symbol)
    }
}
