//! Unrealized profit/loss figures for a holding at a quoted price.

use super::error::PapertraderError;
use super::ledger::LedgerState;

/// Per-lot figures at the quoted price.
#[derive(Debug, Clone, PartialEq)]
pub struct LotValuation {
    pub quantity: i64,
    pub purchase_price: f64,
    pub profit_loss: f64,
}

/// Whole-holding figures at the quoted price.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub symbol: String,
    pub current_price: f64,
    pub lots: Vec<LotValuation>,
    pub total_quantity: i64,
    pub market_value: f64,
    pub total_profit_loss: f64,
}

/// Value a holding at `current_price`. Pure; no state is touched.
pub fn valuation(
    state: &LedgerState,
    symbol: &str,
    current_price: f64,
) -> Result<Valuation, PapertraderError> {
    let Some(lots) = state.lots(symbol) else {
        return Err(PapertraderError::NoSuchHolding {
            symbol: symbol.to_string(),
        });
    };

    let lot_valuations: Vec<LotValuation> = lots
        .iter()
        .map(|lot| LotValuation {
            quantity: lot.quantity,
            purchase_price: lot.purchase_price,
            profit_loss: lot.unrealized_pnl(current_price),
        })
        .collect();

    let total_quantity: i64 = lots.iter().map(|lot| lot.quantity).sum();
    let market_value: f64 = lots.iter().map(|lot| lot.market_value(current_price)).sum();
    let total_profit_loss: f64 = lot_valuations.iter().map(|lv| lv.profit_loss).sum();

    Ok(Valuation {
        symbol: symbol.to_string(),
        current_price,
        lots: lot_valuations,
        total_quantity,
        market_value,
        total_profit_loss,
    })
}
