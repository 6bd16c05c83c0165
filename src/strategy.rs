//! Rule-based strategy suggestions built from the current market snapshot.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{AssetMarket, MarketSnapshot};

const STABLECOINS: &[&str] = &["DAI", "USDC"];
const VOLATILE: &[&str] = &["ETH", "WBTC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "full", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "full", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum InvestmentGoal {
    Income,
    Growth,
    Preservation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "full", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum TimeHorizon {
    /// 1-3 months.
    Short,
    /// 3-12 months.
    Medium,
    /// 1+ years.
    Long,
}

macro_rules! parse_choice {
    ($ty:ty, $what:literal, $($text:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    other => Err(format!("Unknown {} `{}`", $what, other)),
                }
            }
        }
    };
}

parse_choice!(RiskTolerance, "risk tolerance", "low" => RiskTolerance::Low, "medium" => RiskTolerance::Medium, "high" => RiskTolerance::High);
parse_choice!(InvestmentGoal, "investment goal", "income" => InvestmentGoal::Income, "growth" => InvestmentGoal::Growth, "preservation" => InvestmentGoal::Preservation);
parse_choice!(TimeHorizon, "time horizon", "short" => TimeHorizon::Short, "medium" => TimeHorizon::Medium, "long" => TimeHorizon::Long);

impl fmt::Display for InvestmentGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InvestmentGoal::Income => "income",
            InvestmentGoal::Growth => "growth",
            InvestmentGoal::Preservation => "capital preservation",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StrategyParameters {
    pub risk_tolerance: RiskTolerance,
    pub investment_goal: InvestmentGoal,
    pub time_horizon: TimeHorizon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub strategy: String,
    pub explanation: String,
    pub steps: Vec<String>,
    pub risks: Vec<String>,
    pub expected_returns: String,
    pub parameters: StrategyParameters,
}

/// The markets a recommendation quotes from.
struct Picks<'a> {
    supply_stable: Option<&'a AssetMarket>,
    supply_volatile: Option<&'a AssetMarket>,
    borrow_stable: Option<&'a AssetMarket>,
}

impl<'a> Picks<'a> {
    fn from(markets: &'a MarketSnapshot) -> Self {
        let stable: Vec<&AssetMarket> = markets.iter().filter(|m| is_one_of(m, STABLECOINS)).collect();
        let volatile: Vec<&AssetMarket> = markets.iter().filter(|m| is_one_of(m, VOLATILE)).collect();
        Picks {
            supply_stable: stable
                .iter()
                .copied()
                .max_by(|a, b| a.supply_apy_percent.total_cmp(&b.supply_apy_percent)),
            supply_volatile: volatile
                .iter()
                .copied()
                .max_by(|a, b| a.supply_apy_percent.total_cmp(&b.supply_apy_percent)),
            borrow_stable: stable
                .iter()
                .copied()
                .min_by(|a, b| a.borrow_apy_percent.total_cmp(&b.borrow_apy_percent)),
        }
    }

    fn stable_symbol(&self) -> &str {
        self.supply_stable.map_or("stablecoins", |m| m.symbol.as_str())
    }

    fn volatile_symbol(&self) -> &str {
        self.supply_volatile.map_or("ETH/WBTC", |m| m.symbol.as_str())
    }

    fn borrow_symbol(&self) -> &str {
        self.borrow_stable.map_or("stablecoins", |m| m.symbol.as_str())
    }

    fn stable_apy(&self, fallback: &str) -> String {
        self.supply_stable
            .map_or(fallback.to_string(), |m| format!("{:.2}", m.supply_apy_percent))
    }

    /// `stable_w × stable supply APY + volatile_w × volatile supply APY - borrow_w × borrow APY`,
    /// or `fallback` when a needed market is missing.
    fn blend(&self, stable_w: f64, volatile_w: f64, borrow_w: f64, fallback: &str) -> String {
        let stable = weighted(self.supply_stable, stable_w, |m| m.supply_apy_percent);
        let volatile = weighted(self.supply_volatile, volatile_w, |m| m.supply_apy_percent);
        let borrow = weighted(self.borrow_stable, borrow_w, |m| m.borrow_apy_percent);
        match (stable, volatile, borrow) {
            (Some(s), Some(v), Some(b)) => format!("{:.2}", s + v - b),
            _ => fallback.to_string(),
        }
    }
}

fn is_one_of(market: &AssetMarket, symbols: &[&str]) -> bool {
    symbols.iter().any(|s| *s == market.symbol)
}

/// A zero weight needs no market.
fn weighted(market: Option<&AssetMarket>, weight: f64, apy: fn(&AssetMarket) -> f64) -> Option<f64> {
    if weight == 0.0 {
        Some(0.0)
    } else {
        market.map(|m| apy(m) * weight)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Build a recommendation for the given risk/goal/horizon from current rates.
pub fn recommend(markets: &MarketSnapshot, parameters: StrategyParameters) -> Recommendation {
    let picks = Picks::from(markets);
    let stable = picks.stable_symbol();
    let volatile = picks.volatile_symbol();
    let borrow = picks.borrow_symbol();

    let (strategy, explanation, steps, risks, expected_returns) =
        match (parameters.risk_tolerance, parameters.investment_goal) {
            (RiskTolerance::Low, goal @ (InvestmentGoal::Income | InvestmentGoal::Preservation)) => (
                "Stablecoin Lending",
                format!(
                    "Based on your low risk tolerance and {goal} goal, we recommend a conservative \
                     stablecoin lending strategy. This approach minimizes volatility while generating steady returns."
                ),
                vec![
                    format!("Supply {stable} to earn {}% APY", picks.stable_apy("~2-3")),
                    "Maintain a healthy buffer and avoid borrowing to eliminate liquidation risk".into(),
                    "Reinvest earned interest periodically to compound returns".into(),
                ],
                strings(&[
                    "Smart contract risk",
                    "Stablecoin depegging risk (minimal)",
                    "Interest rate fluctuations",
                ]),
                format!("{}% APY", picks.stable_apy("2-3")),
            ),
            (RiskTolerance::Low, InvestmentGoal::Growth) => (
                "Conservative Growth",
                "For growth with low risk tolerance, we recommend a primarily stablecoin strategy with a \
                 small allocation to volatile assets. This provides some exposure to upside potential while \
                 maintaining safety."
                    .to_string(),
                vec![
                    format!("Supply 80% {stable} to earn {}% APY", picks.stable_apy("~2-3")),
                    format!("Supply 20% {volatile} for growth potential"),
                    "Avoid borrowing to eliminate liquidation risk".into(),
                ],
                strings(&[
                    "Smart contract risk",
                    "Limited exposure to volatile asset price fluctuations",
                    "Interest rate fluctuations",
                ]),
                format!(
                    "{}% APY plus potential capital appreciation",
                    picks.blend(0.8, 0.2, 0.0, "3-5")
                ),
            ),
            (RiskTolerance::Medium, InvestmentGoal::Income) => (
                "Balanced Lending and Borrowing",
                "For medium risk tolerance with an income goal, we recommend a balanced approach of \
                 supplying stablecoins and borrowing at a conservative ratio to enhance yields."
                    .to_string(),
                vec![
                    format!("Supply {stable} to earn {}% APY", picks.stable_apy("~2-3")),
                    format!("Borrow up to 30% of your collateral value in {borrow}"),
                    "Use borrowed funds to supply more assets, creating a loop that increases returns".into(),
                ],
                strings(&[
                    "Smart contract risk",
                    "Moderate liquidation risk if market conditions change",
                    "Interest rate fluctuations affecting borrow costs",
                ]),
                format!("{}% net APY", picks.blend(1.3, 0.0, 0.3, "4-6")),
            ),
            (RiskTolerance::Medium, InvestmentGoal::Growth) => (
                "Growth-Oriented Portfolio",
                "For growth with medium risk tolerance, we recommend a diversified portfolio with both \
                 stablecoins and volatile assets, plus strategic borrowing."
                    .to_string(),
                vec![
                    format!("Supply 50% {stable} for stability"),
                    format!("Supply 50% {volatile} for growth potential"),
                    format!("Optionally borrow up to 20% of your collateral value in {borrow} to reinvest"),
                ],
                strings(&[
                    "Smart contract risk",
                    "Moderate exposure to volatile asset price fluctuations",
                    "Potential liquidation risk if borrowing",
                ]),
                format!(
                    "{}% APY plus potential capital appreciation",
                    picks.blend(0.5, 0.5, 0.0, "3-8")
                ),
            ),
            (RiskTolerance::Medium, InvestmentGoal::Preservation) => (
                "Diversified Preservation",
                "For capital preservation with medium risk tolerance, we recommend diversifying across \
                 multiple stablecoins with minimal borrowing."
                    .to_string(),
                strings(&[
                    "Diversify across multiple stablecoin markets to reduce platform-specific risk",
                    "Maintain a small portion in volatile assets as a hedge against inflation",
                    "Keep borrowing minimal to reduce liquidation risk",
                ]),
                strings(&[
                    "Smart contract risk across multiple platforms",
                    "Limited exposure to volatile asset price fluctuations",
                    "Stablecoin depegging risk (mitigated through diversification)",
                ]),
                format!("{}% APY with enhanced stability", picks.stable_apy("2-4")),
            ),
            (RiskTolerance::High, InvestmentGoal::Income) => (
                "Leveraged Yield Farming",
                "For high risk tolerance with an income goal, we recommend a leveraged approach to \
                 maximize yield through recursive borrowing and lending."
                    .to_string(),
                vec![
                    format!("Supply {volatile} as collateral"),
                    format!("Borrow up to 50% of your collateral value in {borrow}"),
                    "Supply borrowed assets to earn additional yield, and repeat for multiple loops".into(),
                    "Monitor positions closely to avoid liquidation".into(),
                ],
                strings(&[
                    "High liquidation risk during market volatility",
                    "Smart contract risk",
                    "Interest rate fluctuations affecting profitability",
                    "Complex position management required",
                ]),
                format!("{}% net APY (variable)", picks.blend(2.0, 0.0, 1.0, "8-15")),
            ),
            (RiskTolerance::High, InvestmentGoal::Growth) => (
                "Aggressive Growth Strategy",
                "For maximum growth with high risk tolerance, we recommend focusing on volatile assets \
                 with strategic borrowing to amplify returns."
                    .to_string(),
                vec![
                    format!("Supply {volatile} as primary collateral"),
                    format!("Borrow {borrow} up to 40% of collateral value"),
                    "Use borrowed funds to purchase more volatile assets".into(),
                    "Monitor closely and adjust positions based on market trends".into(),
                ],
                strings(&[
                    "High liquidation risk during market downturns",
                    "Significant exposure to volatile asset price fluctuations",
                    "Smart contract risk",
                    "Requires active management",
                ]),
                "Variable based on market performance, potentially 15%+ APY with price appreciation"
                    .to_string(),
            ),
            (RiskTolerance::High, InvestmentGoal::Preservation) => (
                "Dynamic Hedging Strategy",
                "For capital preservation with high risk tolerance, we recommend a dynamic approach that \
                 adjusts positions based on market conditions."
                    .to_string(),
                strings(&[
                    "Maintain a base of stablecoin deposits for security",
                    "Use a portion of funds for strategic short-term positions",
                    "Implement stop-loss strategies to protect capital",
                    "Rebalance regularly based on market conditions",
                ]),
                strings(&[
                    "Requires active management and market monitoring",
                    "Strategy execution risk",
                    "Smart contract risk",
                    "Moderate liquidation risk",
                ]),
                "Variable based on market conditions, targeting 5-10% while preserving capital".to_string(),
            ),
        };

    Recommendation {
        strategy: strategy.to_string(),
        explanation,
        steps,
        risks,
        expected_returns,
        parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(risk: RiskTolerance, goal: InvestmentGoal) -> StrategyParameters {
        StrategyParameters {
            risk_tolerance: risk,
            investment_goal: goal,
            time_horizon: TimeHorizon::Medium,
        }
    }

    #[test]
    fn test_low_risk_growth_blends_best_rates() {
        let rec = recommend(
            &MarketSnapshot::defaults(),
            params(RiskTolerance::Low, InvestmentGoal::Growth),
        );
        assert_eq!(rec.strategy, "Conservative Growth");
        // 0.8 × 2.53 (DAI) + 0.2 × 0.32 (ETH)
        assert_eq!(rec.expected_returns, "2.09% APY plus potential capital appreciation");
        assert!(rec.steps[1].contains("ETH"));
    }

    #[test]
    fn test_medium_income_nets_cheapest_borrow() {
        let rec = recommend(
            &MarketSnapshot::defaults(),
            params(RiskTolerance::Medium, InvestmentGoal::Income),
        );
        // 1.3 × 2.53 - 0.3 × 3.45 (USDC is the cheaper stablecoin borrow)
        assert_eq!(rec.expected_returns, "2.25% net APY");
        assert!(rec.steps[1].ends_with("USDC"));
    }

    #[test]
    fn test_empty_markets_use_fallback_text() {
        let rec = recommend(
            &MarketSnapshot::empty(),
            params(RiskTolerance::Low, InvestmentGoal::Income),
        );
        assert_eq!(rec.expected_returns, "2-3% APY");
        assert_eq!(rec.steps[0], "Supply stablecoins to earn ~2-3% APY");
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("HIGH".parse::<RiskTolerance>(), Ok(RiskTolerance::High));
        assert!("yolo".parse::<InvestmentGoal>().is_err());
    }
}
