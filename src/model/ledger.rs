use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::market::{MarketSnapshot, Symbol};

/// Fraction of collateral value that may be borrowed against.
pub const MAX_BORROW_RATIO: f64 = 0.75;

/// Health factor reported when nothing is borrowed.
pub const MAX_HEALTH_PERCENT: f64 = 100.0;

/// Simulated supply/borrow position for one session.
///
/// Fields are read-only outside the crate; the position engine is the only
/// writer, which keeps `collateral_value_usd` in step with `supplied`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionLedger {
    supplied: BTreeMap<Symbol, f64>,
    borrowed: BTreeMap<Symbol, f64>,
    /// Running USD total, credited at the price in effect at each supply.
    collateral_value_usd: f64,
    health_factor_percent: f64,
}

impl Default for PositionLedger {
    fn default() -> Self {
        Self {
            supplied: BTreeMap::new(),
            borrowed: BTreeMap::new(),
            collateral_value_usd: 0.0,
            health_factor_percent: MAX_HEALTH_PERCENT,
        }
    }
}

impl PositionLedger {
    pub fn supplied(&self, symbol: &str) -> f64 {
        self.supplied.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn borrowed(&self, symbol: &str) -> f64 {
        self.borrowed.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn supplied_assets(&self) -> &BTreeMap<Symbol, f64> {
        &self.supplied
    }

    pub fn borrowed_assets(&self) -> &BTreeMap<Symbol, f64> {
        &self.borrowed
    }

    pub fn collateral_value_usd(&self) -> f64 {
        self.collateral_value_usd
    }

    pub fn health_factor_percent(&self) -> f64 {
        self.health_factor_percent
    }

    /// Maximum total borrow value (USD) the collateral supports.
    pub fn borrow_limit_usd(&self) -> f64 {
        self.collateral_value_usd * MAX_BORROW_RATIO
    }

    /// USD value of all borrows at current snapshot prices.
    ///
    /// Assets missing from the snapshot contribute nothing.
    pub fn borrowed_value_usd(&self, markets: &MarketSnapshot) -> f64 {
        self.borrowed
            .iter()
            .map(|(symbol, amount)| amount * markets.price(symbol).unwrap_or(0.0))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.supplied.is_empty() && self.borrowed.is_empty()
    }

    pub(crate) fn credit_supply(&mut self, symbol: &str, amount: f64, value_usd: f64) {
        *self.supplied.entry(symbol.to_string()).or_insert(0.0) += amount;
        self.collateral_value_usd += value_usd;
    }

    pub(crate) fn credit_borrow(&mut self, symbol: &str, amount: f64) {
        *self.borrowed.entry(symbol.to_string()).or_insert(0.0) += amount;
    }

    pub(crate) fn set_health_factor(&mut self, percent: f64) {
        self.health_factor_percent = percent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ledger_is_fully_healthy() {
        let ledger = PositionLedger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.health_factor_percent(), MAX_HEALTH_PERCENT);
        assert_eq!(ledger.borrow_limit_usd(), 0.0);
    }

    #[test]
    fn test_borrowed_value_skips_unpriced_assets() {
        let mut ledger = PositionLedger::default();
        ledger.credit_borrow("DAI", 10.0);
        ledger.credit_borrow("XYZ", 5.0);
        assert_eq!(ledger.borrowed_value_usd(&MarketSnapshot::defaults()), 10.0);
    }
}
