use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset ticker as used by the lending markets (e.g. "DAI", "ETH").
pub type Symbol = String;

/// Receipt-token exchange rate assumed when a source reports none.
pub const DEFAULT_EXCHANGE_RATE: f64 = 0.02;

/// Why a market record was rejected from a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    #[error("Market record has an empty symbol")]
    EmptySymbol,

    #[error("Duplicate market record for `{symbol}`")]
    DuplicateSymbol { symbol: Symbol },

    #[error("Market `{symbol}` has invalid price {value}")]
    InvalidPrice { symbol: Symbol, value: f64 },

    #[error("Market `{symbol}` has invalid {field} {value}")]
    InvalidApy {
        symbol: Symbol,
        field: &'static str,
        value: f64,
    },

    #[error("Market `{symbol}` has borrow APY {borrow} below supply APY {supply}")]
    BorrowBelowSupply {
        symbol: Symbol,
        supply: f64,
        borrow: f64,
    },

    #[error("Market `{symbol}` has collateral factor {value} outside valid range 0.0..=1.0")]
    CollateralFactorOutOfRange { symbol: Symbol, value: f64 },

    #[error("Market `{symbol}` has non-positive exchange rate {value}")]
    NonPositiveExchangeRate { symbol: Symbol, value: f64 },
}

/// Protocol parameters for one supported asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetMarket {
    pub symbol: Symbol,
    /// Display name (e.g. "Dai Stablecoin"). Falls back to the symbol.
    #[serde(default)]
    pub name: String,
    pub price_usd: f64,
    /// Supply APY in percent (2.53 = 2.53%).
    pub supply_apy_percent: f64,
    /// Borrow APY in percent.
    pub borrow_apy_percent: f64,
    /// Fraction (0.0–1.0) of supplied value usable as borrowing power.
    pub collateral_factor: f64,
    /// Underlying units per receipt token.
    pub exchange_rate: f64,
}

impl AssetMarket {
    /// Check a single record, collecting every problem found.
    pub fn validate(&self) -> Vec<MarketError> {
        let mut errors = Vec::new();
        let symbol = self.symbol.clone();

        if self.symbol.trim().is_empty() {
            errors.push(MarketError::EmptySymbol);
        }
        if !self.price_usd.is_finite() || self.price_usd < 0.0 {
            errors.push(MarketError::InvalidPrice {
                symbol: symbol.clone(),
                value: self.price_usd,
            });
        }
        for (field, value) in [
            ("supply APY", self.supply_apy_percent),
            ("borrow APY", self.borrow_apy_percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(MarketError::InvalidApy {
                    symbol: symbol.clone(),
                    field,
                    value,
                });
            }
        }
        if self.borrow_apy_percent < self.supply_apy_percent {
            errors.push(MarketError::BorrowBelowSupply {
                symbol: symbol.clone(),
                supply: self.supply_apy_percent,
                borrow: self.borrow_apy_percent,
            });
        }
        if !(0.0..=1.0).contains(&self.collateral_factor) {
            errors.push(MarketError::CollateralFactorOutOfRange {
                symbol: symbol.clone(),
                value: self.collateral_factor,
            });
        }
        if !self.exchange_rate.is_finite() || self.exchange_rate <= 0.0 {
            errors.push(MarketError::NonPositiveExchangeRate {
                symbol,
                value: self.exchange_rate,
            });
        }

        errors
    }

    /// Receipt tokens minted for `amount` of the underlying asset.
    pub fn to_receipt_tokens(&self, amount: f64) -> f64 {
        amount / self.exchange_rate
    }
}

/// A complete, validated view of every market at one point in time.
///
/// Snapshots are immutable; a refresh builds a new one and swaps it in whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct MarketSnapshot {
    markets: Vec<AssetMarket>,
}

impl MarketSnapshot {
    /// Build a snapshot, rejecting it if any record is invalid.
    pub fn new(markets: Vec<AssetMarket>) -> Result<Self, Vec<MarketError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for market in &markets {
            errors.extend(market.validate());
            if !market.symbol.is_empty() && !seen.insert(market.symbol.as_str()) {
                errors.push(MarketError::DuplicateSymbol {
                    symbol: market.symbol.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(Self { markets })
        } else {
            Err(errors)
        }
    }

    /// Snapshot with no markets; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in table used when no live source is configured.
    pub fn defaults() -> Self {
        Self {
            markets: default_markets(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetMarket> {
        self.markets.iter().find(|m| m.symbol == symbol)
    }

    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(|m| m.price_usd)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetMarket> {
        self.markets.iter()
    }

    pub fn markets(&self) -> &[AssetMarket] {
        &self.markets
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

impl<'de> Deserialize<'de> for MarketSnapshot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            markets: Vec<AssetMarket>,
        }

        let raw = Raw::deserialize(deserializer)?;
        MarketSnapshot::new(raw.markets).map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            serde::de::Error::custom(msgs.join("; "))
        })
    }
}

fn default_markets() -> Vec<AssetMarket> {
    vec![
        AssetMarket {
            symbol: "DAI".into(),
            name: "Dai Stablecoin".into(),
            price_usd: 1.00,
            supply_apy_percent: 2.53,
            borrow_apy_percent: 3.82,
            collateral_factor: 0.75,
            exchange_rate: 0.02,
        },
        AssetMarket {
            symbol: "USDC".into(),
            name: "USD Coin".into(),
            price_usd: 1.00,
            supply_apy_percent: 2.12,
            borrow_apy_percent: 3.45,
            collateral_factor: 0.80,
            exchange_rate: 0.022,
        },
        AssetMarket {
            symbol: "ETH".into(),
            name: "Ethereum".into(),
            price_usd: 3500.00,
            supply_apy_percent: 0.32,
            borrow_apy_percent: 1.25,
            collateral_factor: 0.70,
            exchange_rate: 0.05,
        },
        AssetMarket {
            symbol: "WBTC".into(),
            name: "Wrapped Bitcoin".into(),
            price_usd: 60000.00,
            supply_apy_percent: 0.21,
            borrow_apy_percent: 1.12,
            collateral_factor: 0.65,
            exchange_rate: 0.02,
        },
    ]
}
