use std::sync::{Arc, Mutex};

use learnfi::content::ContentSelector;
use learnfi::engine::AppState;
use learnfi::engine::progression::{SIMULATION_XP, TOPIC_COMPLETION_XP};
use learnfi::market::MarketHandle;
use learnfi::model::{
    Badge, BadgeKind, MarketSnapshot, Quiz, SimulationAction, SourceTag, Topic, UserProfile,
};
use learnfi::store::MemoryStore;

// ── Helpers ─────────────────────────────────────────────────────────

fn detached() -> AppState {
    AppState::detached(
        MarketHandle::default(),
        ContentSelector::with_defaults().unwrap(),
        UserProfile::default(),
    )
}

/// Attach an observer that records every profile it is shown.
fn recording(state: &mut AppState) -> Arc<Mutex<Vec<UserProfile>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    state.observe(move |p: &UserProfile| sink.lock().unwrap().push(p.clone()));
    seen
}

fn banked_quiz(state: &AppState, topic: Topic, index: usize) -> Quiz {
    Quiz {
        question: state.content().question(topic, index).unwrap(),
        topic: Some(topic),
        bank_index: Some(index),
        source: SourceTag::Curated,
    }
}

fn wrong_answer(quiz: &Quiz) -> usize {
    (quiz.question.correct_index + 1) % quiz.question.options.len()
}

// ── Sandbox actions ─────────────────────────────────────────────────

#[test]
fn test_supply_records_history_awards_xp_and_notifies() {
    let mut state = detached();
    let seen = recording(&mut state);

    let outcome = state.simulate_supply("DAI", 100.0);
    assert!(outcome.success);
    assert_eq!(outcome.derived_amount, Some(5000.0));
    assert_eq!(outcome.message, "Successfully supplied 100 DAI");

    let profile = state.profile();
    assert_eq!(profile.experience, SIMULATION_XP);
    assert_eq!(profile.simulation_history.len(), 1);
    let record = &profile.simulation_history[0];
    assert_eq!(record.action, SimulationAction::Supply);
    assert_eq!(record.symbol, "DAI");
    assert_eq!(record.derived_amount, Some(5000.0));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(&seen[0], state.profile());
}

#[test]
fn test_borrow_success_and_rejection() {
    let mut state = detached();
    state.simulate_supply("DAI", 100.0);
    let seen = recording(&mut state);

    let ok = state.simulate_borrow("DAI", 50.0);
    assert!(ok.success);
    assert_eq!(ok.derived_amount, None);
    assert_eq!(state.ledger().health_factor_percent(), 100.0);
    assert_eq!(state.profile().simulation_history.len(), 2);
    assert_eq!(state.profile().simulation_history[1].action, SimulationAction::Borrow);

    let profile_before = state.profile().clone();
    let ledger_before = state.ledger().clone();
    let rejected = state.simulate_borrow("DAI", 80.0);
    assert!(!rejected.success);
    assert_eq!(rejected.message, "Not enough collateral to borrow 80 DAI");
    assert_eq!(state.ledger(), &ledger_before);
    assert_eq!(state.profile(), &profile_before);

    // Only the successful borrow notified.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_unknown_symbol_is_a_failure_value() {
    let mut state = detached();
    let seen = recording(&mut state);

    let outcome = state.simulate_supply("XYZ", 10.0);
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Market for XYZ not found");
    assert!(state.ledger().is_empty());
    assert!(state.profile().simulation_history.is_empty());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_actions_read_the_current_snapshot() {
    let markets = MarketHandle::default();
    let mut state = AppState::detached(
        markets.clone(),
        ContentSelector::with_defaults().unwrap(),
        UserProfile::default(),
    );
    assert_eq!(state.supply_apy("DAI"), 2.53);

    markets.replace(MarketSnapshot::empty());
    assert_eq!(state.supply_apy("DAI"), 0.0);
    assert_eq!(state.borrow_apy("DAI"), 0.0);
    assert!(!state.simulate_supply("DAI", 1.0).success);
}

// ── Learning flow ───────────────────────────────────────────────────

#[test]
fn test_correct_answer_completes_topic_and_awards_badge_once() {
    let mut state = detached();
    let quiz = banked_quiz(&state, Topic::Apy, 0);
    let answer = quiz.question.correct_index;

    let first = state.answer_quiz(&quiz, answer);
    assert!(first.correct);
    assert_eq!(first.explanation, quiz.question.explanation);
    let badge: Badge = first.badge.unwrap();
    assert_eq!(badge.id.as_str(), "quiz_apy");
    assert_eq!(badge.name, "Understanding APY Expert");
    assert_eq!(badge.kind, BadgeKind::Quiz);
    assert!(state.profile().has_completed(Topic::Apy));
    assert_eq!(state.profile().experience, TOPIC_COMPLETION_XP);

    let seen = recording(&mut state);
    for _ in 0..2 {
        let again = state.answer_quiz(&quiz, answer);
        assert!(again.correct);
        assert!(again.badge.is_none());
        assert_eq!(again.level_up, None);
    }
    assert_eq!(state.profile().experience, TOPIC_COMPLETION_XP);
    assert_eq!(state.profile().level, 1);
    assert_eq!(state.profile().badges.len(), 1);
    assert_eq!(state.profile().completed_topics.len(), 1);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_quiz_credits_its_own_topic() {
    let mut state = detached();
    let quiz = banked_quiz(&state, Topic::Governance, 0);

    let result = state.answer_quiz(&quiz, quiz.question.correct_index);
    assert!(result.correct);
    assert!(state.profile().has_completed(Topic::Governance));
    assert!(!state.profile().has_completed(Topic::Apy));
    assert_eq!(result.badge.unwrap().id.as_str(), "quiz_governance");
}

#[test]
fn test_quiz_without_topic_is_graded_only() {
    let mut state = detached();
    let seen = recording(&mut state);
    let quiz = state.quiz_for("Health Factor");
    assert_eq!(quiz.topic, None);

    let result = state.answer_quiz(&quiz, quiz.question.correct_index);
    assert!(result.correct);
    assert!(result.badge.is_none());
    assert_eq!(state.profile(), &UserProfile::default());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_wrong_answer_changes_nothing() {
    let mut state = detached();
    let seen = recording(&mut state);
    let quiz = banked_quiz(&state, Topic::Liquidation, 2);

    let result = state.answer_quiz(&quiz, wrong_answer(&quiz));
    assert!(!result.correct);
    assert!(result.badge.is_none());
    assert_eq!(result.level_up, None);
    assert_eq!(state.profile(), &UserProfile::default());
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_answer_reports_level_up() {
    let mut profile = UserProfile::default();
    profile.experience = 60;
    let mut state = AppState::detached(
        MarketHandle::default(),
        ContentSelector::with_defaults().unwrap(),
        profile,
    );
    let quiz = banked_quiz(&state, Topic::Governance, 1);

    let result = state.answer_quiz(&quiz, quiz.question.correct_index);
    assert_eq!(result.level_up, Some(2));
    assert_eq!(state.profile().level, 2);
    assert_eq!(state.profile().experience, 10);
}

#[test]
fn test_progress_and_explain_through_state() {
    let mut state = detached();
    state.complete_topic(Topic::Ctoken);
    state.complete_topic(Topic::Interest);
    assert_eq!(state.progress_percent(), 20.0);

    let e = state.explain("ctoken", learnfi::model::Difficulty::Intermediate);
    assert_eq!(e.source, SourceTag::Curated);
    let q = state.quiz_for("interest");
    assert_eq!(q.topic, Some(Topic::Interest));
}

#[test]
fn test_award_badge_notifies_only_when_new() {
    let mut state = detached();
    let seen = recording(&mut state);
    assert!(state.award_badge(Badge::for_quiz(Topic::Ctoken)));
    assert!(!state.award_badge(Badge::for_quiz(Topic::Ctoken)));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

// ── Reset ───────────────────────────────────────────────────────────

#[test]
fn test_reset_clears_profile_position_and_store() {
    let store = MemoryStore::new();
    let shared = store.clone();
    let mut state = AppState::new(
        MarketHandle::default(),
        ContentSelector::with_defaults().unwrap(),
        Box::new(store),
    );

    state.simulate_supply("USDC", 20.0);
    state.simulate_borrow("DAI", 10.0);
    assert!(shared.raw().is_some());
    assert!(!state.ledger().is_empty());

    state.reset();
    assert_eq!(state.profile(), &UserProfile::default());
    assert!(state.ledger().is_empty());
    assert_eq!(state.ledger().health_factor_percent(), 100.0);
    assert!(shared.raw().is_none());
}
