use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::content::ContentSelector;
use crate::engine::{ActionOutcome, AppState, position};
use crate::market::MarketHandle;
use crate::model::{Difficulty, MarketSnapshot, PositionLedger, UserProfile};
use crate::strategy::{self, StrategyParameters};

/// Everything a browser host keeps between calls. The host owns storage;
/// each call takes the session in and hands the updated one back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmSession {
    #[serde(default = "MarketSnapshot::defaults")]
    pub markets: MarketSnapshot,
    #[serde(default)]
    pub ledger: PositionLedger,
    #[serde(default)]
    pub profile: UserProfile,
}

#[derive(Serialize)]
struct ActionResponse {
    outcome: ActionOutcome,
    session: WasmSession,
}

fn error_json(message: String) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(format!("Serialization error: {e}")))
}

fn parse_session(json: &str) -> Result<WasmSession, String> {
    if json.trim().is_empty() {
        return serde_json::from_str("{}").map_err(|e| e.to_string());
    }
    serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))
}

fn simulate(
    session_json: &str,
    symbol: &str,
    amount: &str,
    act: impl FnOnce(&mut AppState, &str, f64) -> ActionOutcome,
) -> String {
    let session = match parse_session(session_json) {
        Ok(s) => s,
        Err(e) => return error_json(e),
    };

    let mut state = AppState::detached(
        MarketHandle::new(session.markets.clone()),
        ContentSelector::new(Vec::new()),
        session.profile,
    )
    .with_ledger(session.ledger);

    let outcome = match position::parse_order(&session.markets, symbol, amount) {
        Ok(amount) => act(&mut state, symbol, amount),
        Err(e) => ActionOutcome::failure(&e),
    };

    to_json(&ActionResponse {
        outcome,
        session: WasmSession {
            markets: session.markets,
            ledger: state.ledger().clone(),
            profile: state.profile().clone(),
        },
    })
}

#[wasm_bindgen]
pub fn simulate_supply(session_json: &str, symbol: &str, amount: &str) -> String {
    simulate(session_json, symbol, amount, AppState::simulate_supply)
}

#[wasm_bindgen]
pub fn simulate_borrow(session_json: &str, symbol: &str, amount: &str) -> String {
    simulate(session_json, symbol, amount, AppState::simulate_borrow)
}

#[wasm_bindgen]
pub fn explain(concept: &str, difficulty: &str) -> String {
    let difficulty: Difficulty = if difficulty.trim().is_empty() {
        Difficulty::default()
    } else {
        match difficulty.parse() {
            Ok(d) => d,
            Err(e) => return error_json(format!("{e}")),
        }
    };
    match ContentSelector::with_defaults() {
        Ok(content) => to_json(&content.explain(concept, difficulty)),
        Err(e) => error_json(format!("{e:#}")),
    }
}

#[wasm_bindgen]
pub fn quiz_for(concept: &str) -> String {
    match ContentSelector::with_defaults() {
        Ok(content) => to_json(&content.quiz_for(concept)),
        Err(e) => error_json(format!("{e:#}")),
    }
}

#[wasm_bindgen]
pub fn default_markets() -> String {
    to_json(&MarketSnapshot::defaults())
}

#[wasm_bindgen]
pub fn recommend_strategy(markets_json: &str, risk: &str, goal: &str, horizon: &str) -> String {
    let markets = if markets_json.trim().is_empty() {
        MarketSnapshot::defaults()
    } else {
        match serde_json::from_str::<MarketSnapshot>(markets_json) {
            Ok(m) => m,
            Err(e) => return error_json(format!("JSON parse error: {e}")),
        }
    };
    let parameters = match (risk.parse(), goal.parse(), horizon.parse()) {
        (Ok(risk_tolerance), Ok(investment_goal), Ok(time_horizon)) => StrategyParameters {
            risk_tolerance,
            investment_goal,
            time_horizon,
        },
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return error_json(e),
    };
    to_json(&strategy::recommend(&markets, parameters))
}
