use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::ledger::{MAX_BORROW_RATIO, MAX_HEALTH_PERCENT};
use crate::model::{MarketSnapshot, PositionLedger, Symbol};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("Market for {symbol} not found")]
    UnknownMarket { symbol: Symbol },

    #[error("Invalid amount {amount}: must be a positive, finite number")]
    InvalidAmount { amount: f64 },

    #[error("Invalid amount `{raw}`: not a number")]
    NotANumber { raw: String },

    #[error("Not enough collateral to borrow {amount} {symbol}")]
    InsufficientCollateral {
        symbol: Symbol,
        amount: f64,
        borrow_value_usd: f64,
        max_borrow_usd: f64,
    },
}

/// Parse a user-entered amount, rejecting anything that is not a positive finite number.
pub fn parse_amount(raw: &str) -> Result<f64, PositionError> {
    let amount: f64 = raw.trim().parse().map_err(|_| PositionError::NotANumber {
        raw: raw.to_string(),
    })?;
    validate_amount(amount)
}

/// Check a user-entered order against the current markets: the symbol first,
/// then the raw amount.
pub fn parse_order(markets: &MarketSnapshot, symbol: &str, raw: &str) -> Result<f64, PositionError> {
    if markets.get(symbol).is_none() {
        return Err(PositionError::UnknownMarket {
            symbol: symbol.to_string(),
        });
    }
    parse_amount(raw)
}

pub fn validate_amount(amount: f64) -> Result<f64, PositionError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(PositionError::InvalidAmount { amount })
    }
}

// ── Receipts and outcomes ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyReceipt {
    pub symbol: Symbol,
    pub amount: f64,
    /// USD credited to collateral at the current price.
    pub collateral_added_usd: f64,
    /// Receipt tokens minted (amount / exchange rate).
    pub derived_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorrowReceipt {
    pub symbol: Symbol,
    pub amount: f64,
    pub borrow_value_usd: f64,
    pub health_factor_percent: f64,
}

/// Result of a sandbox action as shown to the learner. Failures are data, never panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_amount: Option<f64>,
    pub message: String,
}

impl ActionOutcome {
    pub fn failure(err: &PositionError) -> Self {
        ActionOutcome {
            success: false,
            derived_amount: None,
            message: err.to_string(),
        }
    }
}

impl From<&SupplyReceipt> for ActionOutcome {
    fn from(r: &SupplyReceipt) -> Self {
        ActionOutcome {
            success: true,
            derived_amount: Some(r.derived_amount),
            message: format!("Successfully supplied {} {}", r.amount, r.symbol),
        }
    }
}

impl From<&BorrowReceipt> for ActionOutcome {
    fn from(r: &BorrowReceipt) -> Self {
        ActionOutcome {
            success: true,
            derived_amount: None,
            message: format!("Successfully borrowed {} {}", r.amount, r.symbol),
        }
    }
}

// ── Engine ──────────────────────────────────────────────────────────

/// Owns the position ledger and applies supply/borrow actions to it
/// against a market snapshot.
#[derive(Debug, Clone, Default)]
pub struct PositionEngine {
    ledger: PositionLedger,
}

impl PositionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously saved ledger.
    pub fn from_ledger(ledger: PositionLedger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn reset(&mut self) {
        self.ledger = PositionLedger::default();
    }

    /// Supply `amount` of `symbol` as collateral.
    pub fn supply(
        &mut self,
        markets: &MarketSnapshot,
        symbol: &str,
        amount: f64,
    ) -> Result<SupplyReceipt, PositionError> {
        let market = markets
            .get(symbol)
            .ok_or_else(|| PositionError::UnknownMarket {
                symbol: symbol.to_string(),
            })?;
        let amount = validate_amount(amount)?;

        let value_usd = amount * market.price_usd;
        self.ledger.credit_supply(symbol, amount, value_usd);

        Ok(SupplyReceipt {
            symbol: symbol.to_string(),
            amount,
            collateral_added_usd: value_usd,
            derived_amount: market.to_receipt_tokens(amount),
        })
    }

    /// Borrow `amount` of `symbol`. Rejected without touching the ledger when
    /// its USD value exceeds the collateral-backed limit.
    pub fn borrow(
        &mut self,
        markets: &MarketSnapshot,
        symbol: &str,
        amount: f64,
    ) -> Result<BorrowReceipt, PositionError> {
        let market = markets
            .get(symbol)
            .ok_or_else(|| PositionError::UnknownMarket {
                symbol: symbol.to_string(),
            })?;
        let amount = validate_amount(amount)?;

        let borrow_value_usd = amount * market.price_usd;
        let max_borrow_usd = self.ledger.collateral_value_usd() * MAX_BORROW_RATIO;
        if borrow_value_usd > max_borrow_usd {
            return Err(PositionError::InsufficientCollateral {
                symbol: symbol.to_string(),
                amount,
                borrow_value_usd,
                max_borrow_usd,
            });
        }

        self.ledger.credit_borrow(symbol, amount);
        let total_borrowed = total_borrowed_value_usd(&self.ledger, markets);
        let health = health_factor(self.ledger.collateral_value_usd(), total_borrowed);
        self.ledger.set_health_factor(health);

        Ok(BorrowReceipt {
            symbol: symbol.to_string(),
            amount,
            borrow_value_usd,
            health_factor_percent: health,
        })
    }
}

/// Sum of borrowed USD value at current prices. Unpriced assets count as zero
/// and are logged, since that overstates health.
pub fn total_borrowed_value_usd(ledger: &PositionLedger, markets: &MarketSnapshot) -> f64 {
    for symbol in ledger.borrowed_assets().keys() {
        if markets.price(symbol).is_none() {
            warn!(%symbol, "no market price for borrowed asset; valuing it at 0");
        }
    }
    ledger.borrowed_value_usd(markets)
}

/// `collateral / borrowed × 100`, clamped to `[0, 100]`. Full health when nothing is borrowed.
pub fn health_factor(collateral_value_usd: f64, total_borrowed_usd: f64) -> f64 {
    if total_borrowed_usd <= 0.0 {
        return MAX_HEALTH_PERCENT;
    }
    (collateral_value_usd / total_borrowed_usd * 100.0).clamp(0.0, MAX_HEALTH_PERCENT)
}

/// Supply APY (percent) for `symbol`, or 0 when the market is unknown.
pub fn supply_apy(markets: &MarketSnapshot, symbol: &str) -> f64 {
    markets.get(symbol).map_or(0.0, |m| m.supply_apy_percent)
}

/// Borrow APY (percent) for `symbol`, or 0 when the market is unknown.
pub fn borrow_apy(markets: &MarketSnapshot, symbol: &str) -> f64 {
    markets.get(symbol).map_or(0.0, |m| m.borrow_apy_percent)
}
