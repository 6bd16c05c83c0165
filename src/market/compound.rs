use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::MarketSource;
use crate::model::AssetMarket;
use crate::model::market::DEFAULT_EXCHANGE_RATE;

// ── API response types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CTokenResponse {
    #[serde(rename = "cTokens", alias = "cToken")]
    c_tokens: Option<Vec<CToken>>,
}

/// Compound reports decimals as strings wrapped in `{ "value": "..." }`.
#[derive(Debug, Deserialize, Default)]
struct Precise {
    #[serde(default)]
    value: Option<String>,
}

impl Precise {
    fn as_f64(&self) -> f64 {
        self.value
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize, Default)]
struct Underlying {
    symbol: Option<String>,
    name: Option<String>,
    #[serde(default)]
    price: Precise,
}

#[derive(Debug, Deserialize)]
struct CToken {
    symbol: String,
    #[serde(default)]
    underlying: Underlying,
    #[serde(default)]
    supply_rate: Precise,
    #[serde(default)]
    borrow_rate: Precise,
    #[serde(default)]
    collateral_factor: Precise,
    #[serde(default)]
    exchange_rate: Precise,
}

impl CToken {
    fn into_market(self) -> AssetMarket {
        let symbol = self.underlying.symbol.clone().unwrap_or_else(|| {
            self.symbol
                .strip_prefix('c')
                .unwrap_or(&self.symbol)
                .to_string()
        });
        let exchange_rate = match self.exchange_rate.as_f64() {
            r if r > 0.0 => r,
            _ => DEFAULT_EXCHANGE_RATE,
        };

        AssetMarket {
            name: self.underlying.name.clone().unwrap_or_else(|| symbol.clone()),
            symbol,
            price_usd: self.underlying.price.as_f64(),
            supply_apy_percent: self.supply_rate.as_f64() * 100.0,
            borrow_apy_percent: self.borrow_rate.as_f64() * 100.0,
            collateral_factor: self.collateral_factor.as_f64(),
            exchange_rate,
        }
    }
}

// ── Parsing ──────────────────────────────────────────────────────────

/// Map a Compound `cTokens` API body into market records.
pub fn parse_markets(body: &str) -> Result<Vec<AssetMarket>> {
    let resp: CTokenResponse =
        serde_json::from_str(body).context("parsing Compound cToken response")?;
    let Some(tokens) = resp.c_tokens else {
        bail!("Failed to fetch cToken data: response has no cTokens list");
    };
    Ok(tokens.into_iter().map(CToken::into_market).collect())
}

// ── Source ───────────────────────────────────────────────────────────

/// Live market source backed by a Compound-style HTTP endpoint.
pub struct CompoundSource {
    client: reqwest::Client,
    url: String,
}

impl CompoundSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl MarketSource for CompoundSource {
    fn name(&self) -> &str {
        "compound"
    }

    async fn fetch_markets(&self) -> Result<Vec<AssetMarket>> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("requesting {}", self.url))?
            .error_for_status()?
            .text()
            .await
            .context("reading Compound response body")?;
        parse_markets(&body)
    }
}
