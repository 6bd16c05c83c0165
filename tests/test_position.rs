use learnfi::engine::position::{self, health_factor};
use learnfi::engine::{PositionEngine, PositionError};
use learnfi::model::{AssetMarket, MarketSnapshot};

// ── Helpers ─────────────────────────────────────────────────────────

fn markets() -> MarketSnapshot {
    MarketSnapshot::defaults()
}

/// Default markets with `symbol` repriced.
fn repriced(symbol: &str, price_usd: f64) -> MarketSnapshot {
    let records: Vec<AssetMarket> = markets()
        .iter()
        .cloned()
        .map(|mut m| {
            if m.symbol == symbol {
                m.price_usd = price_usd;
            }
            m
        })
        .collect();
    MarketSnapshot::new(records).unwrap()
}

/// Default markets without `symbol`.
fn without(symbol: &str) -> MarketSnapshot {
    let records: Vec<AssetMarket> = markets().iter().filter(|m| m.symbol != symbol).cloned().collect();
    MarketSnapshot::new(records).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Supply ──────────────────────────────────────────────────────────

#[test]
fn test_supply_credits_amount_and_collateral() {
    let m = markets();
    let mut engine = PositionEngine::new();

    let cases = [("DAI", 100.0), ("ETH", 0.5), ("USDC", 12.34), ("DAI", 0.001)];
    for (symbol, amount) in cases {
        let supplied_before = engine.ledger().supplied(symbol);
        let collateral_before = engine.ledger().collateral_value_usd();

        let receipt = engine.supply(&m, symbol, amount).unwrap();
        let price = m.price(symbol).unwrap();

        assert!(approx(engine.ledger().supplied(symbol), supplied_before + amount));
        assert!(approx(
            engine.ledger().collateral_value_usd(),
            collateral_before + amount * price
        ));
        assert!(approx(receipt.collateral_added_usd, amount * price));
    }
}

#[test]
fn test_supply_returns_receipt_tokens() {
    let mut engine = PositionEngine::new();
    let receipt = engine.supply(&markets(), "DAI", 100.0).unwrap();
    // Default exchange rate 0.02: 100 DAI mints 5000 receipt tokens.
    assert!(approx(receipt.derived_amount, 5000.0));
}

#[test]
fn test_supply_unknown_symbol_leaves_ledger_unchanged() {
    let mut engine = PositionEngine::new();
    engine.supply(&markets(), "DAI", 10.0).unwrap();
    let before = engine.ledger().clone();

    let err = engine.supply(&markets(), "XYZ", 10.0).unwrap_err();
    assert_eq!(err, PositionError::UnknownMarket { symbol: "XYZ".into() });
    assert_eq!(err.to_string(), "Market for XYZ not found");
    assert_eq!(engine.ledger(), &before);
}

#[test]
fn test_supply_rejects_bad_amounts() {
    let mut engine = PositionEngine::new();
    for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let err = engine.supply(&markets(), "DAI", amount).unwrap_err();
        assert!(matches!(err, PositionError::InvalidAmount { .. }));
    }
    assert!(engine.ledger().is_empty());

    assert!(matches!(
        position::parse_amount("ten"),
        Err(PositionError::NotANumber { .. })
    ));
    assert!(position::parse_amount("-1").is_err());
    assert!(position::parse_amount("0").is_err());
}

#[test]
fn test_order_checks_symbol_before_amount() {
    let m = markets();
    assert_eq!(
        position::parse_order(&m, "XYZ", "abc"),
        Err(PositionError::UnknownMarket { symbol: "XYZ".into() })
    );
    assert!(matches!(
        position::parse_order(&m, "DAI", "abc"),
        Err(PositionError::NotANumber { .. })
    ));
    assert_eq!(position::parse_order(&m, "DAI", " 12.5 "), Ok(12.5));
}

// ── Borrow ──────────────────────────────────────────────────────────

#[test]
fn test_scenario_supply_then_borrow_within_limit() {
    let m = markets();
    let mut engine = PositionEngine::new();

    engine.supply(&m, "DAI", 100.0).unwrap();
    assert!(approx(engine.ledger().collateral_value_usd(), 100.0));

    let receipt = engine.borrow(&m, "DAI", 50.0).unwrap();
    assert!(approx(engine.ledger().borrowed("DAI"), 50.0));
    // 100 / 50 × 100 = 200, clamped.
    assert_eq!(receipt.health_factor_percent, 100.0);
    assert_eq!(engine.ledger().health_factor_percent(), 100.0);
}

#[test]
fn test_scenario_borrow_over_limit_rejected() {
    let m = markets();
    let mut engine = PositionEngine::new();
    engine.supply(&m, "DAI", 100.0).unwrap();
    let before = engine.ledger().clone();

    let err = engine.borrow(&m, "DAI", 80.0).unwrap_err();
    match &err {
        PositionError::InsufficientCollateral {
            borrow_value_usd,
            max_borrow_usd,
            ..
        } => {
            assert!(approx(*borrow_value_usd, 80.0));
            assert!(approx(*max_borrow_usd, 75.0));
        }
        other => panic!("expected InsufficientCollateral, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Not enough collateral to borrow 80 DAI");
    assert_eq!(engine.ledger(), &before);

    // Repeating the rejected borrow is still a no-op.
    assert!(engine.borrow(&m, "DAI", 80.0).is_err());
    assert_eq!(engine.ledger(), &before);
}

#[test]
fn test_borrow_exactly_at_limit_succeeds() {
    let m = markets();
    let mut engine = PositionEngine::new();
    engine.supply(&m, "DAI", 100.0).unwrap();
    assert!(engine.borrow(&m, "DAI", 75.0).is_ok());
}

#[test]
fn test_borrow_guard_checks_each_borrow_alone() {
    let m = markets();
    let mut engine = PositionEngine::new();
    engine.supply(&m, "DAI", 100.0).unwrap();

    // Outstanding debt is not counted against the next borrow.
    assert!(engine.borrow(&m, "DAI", 75.0).is_ok());
    assert!(engine.borrow(&m, "DAI", 75.0).is_ok());
    assert_eq!(engine.ledger().borrowed("DAI"), 150.0);
    assert!(engine.borrow(&m, "DAI", 75.01).is_err());
}

#[test]
fn test_borrow_without_collateral_rejected() {
    let mut engine = PositionEngine::new();
    let err = engine.borrow(&markets(), "USDC", 1.0).unwrap_err();
    assert!(matches!(err, PositionError::InsufficientCollateral { .. }));
    assert!(engine.ledger().is_empty());
}

#[test]
fn test_borrow_guard_never_exceeds_limit() {
    let m = markets();
    let mut engine = PositionEngine::new();
    engine.supply(&m, "ETH", 1.0).unwrap();
    let collateral = engine.ledger().collateral_value_usd();

    for amount in [100.0, 2000.0, 2625.0, 2625.01, 5000.0] {
        let fresh = engine.clone().borrow(&m, "DAI", amount);
        let value = amount * m.price("DAI").unwrap();
        assert_eq!(fresh.is_ok(), value <= 0.75 * collateral, "amount {amount}");
    }
}

#[test]
fn test_health_reprices_all_borrowed_assets() {
    let mut engine = PositionEngine::new();
    engine.supply(&markets(), "ETH", 1.0).unwrap(); // 3500 USD
    engine.borrow(&markets(), "DAI", 2000.0).unwrap();
    assert_eq!(engine.ledger().health_factor_percent(), 100.0);

    // DAI doubles: 2000 × 2 + 1 = 4001 borrowed against 3500.
    engine.borrow(&repriced("DAI", 2.0), "USDC", 1.0).unwrap();
    let expected = 3500.0 / 4001.0 * 100.0;
    assert!(approx(engine.ledger().health_factor_percent(), expected));
}

#[test]
fn test_unpriced_borrowed_asset_counts_as_zero() {
    let mut engine = PositionEngine::new();
    engine.supply(&markets(), "ETH", 1.0).unwrap();
    engine.borrow(&markets(), "DAI", 2000.0).unwrap();
    engine.borrow(&repriced("DAI", 2.0), "USDC", 1.0).unwrap();
    assert!(engine.ledger().health_factor_percent() < 100.0);

    // DAI dropped from the snapshot: only the USDC debt is valued.
    engine.borrow(&without("DAI"), "USDC", 1.0).unwrap();
    assert_eq!(engine.ledger().health_factor_percent(), 100.0);
    assert!(approx(engine.ledger().borrowed_value_usd(&without("DAI")), 2.0));
}

#[test]
fn test_health_factor_always_in_range() {
    for (collateral, borrowed) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1e9), (1e9, 1.0), (75.0, 100.0)] {
        let h = health_factor(collateral, borrowed);
        assert!((0.0..=100.0).contains(&h), "{collateral}/{borrowed} -> {h}");
    }
    assert_eq!(health_factor(123.0, 0.0), 100.0);
}

#[test]
fn test_borrow_limit_helpers() {
    let mut engine = PositionEngine::new();
    engine.supply(&markets(), "USDC", 200.0).unwrap();
    assert!(approx(engine.ledger().borrow_limit_usd(), 150.0));
    engine.borrow(&markets(), "DAI", 40.0).unwrap();
    assert!(approx(engine.ledger().borrowed_value_usd(&markets()), 40.0));
}

// ── APY lookups ─────────────────────────────────────────────────────

#[test]
fn test_apy_lookup_unknown_is_zero() {
    let m = markets();
    assert_eq!(position::supply_apy(&m, "DAI"), 2.53);
    assert_eq!(position::borrow_apy(&m, "ETH"), 1.25);
    assert_eq!(position::supply_apy(&m, "XYZ"), 0.0);
    assert_eq!(position::borrow_apy(&m, ""), 0.0);
    assert_eq!(position::supply_apy(&MarketSnapshot::empty(), "DAI"), 0.0);
}
