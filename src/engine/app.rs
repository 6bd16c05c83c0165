use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::position::{self, ActionOutcome, PositionEngine};
use super::progression;
use crate::content::ContentSelector;
use crate::market::MarketHandle;
use crate::model::{
    Badge, BadgeId, Difficulty, Explanation, MarketSnapshot, PositionLedger, Quiz, SimulationAction,
    SimulationRecord, Topic, UserProfile,
};
use crate::store::ProfileStore;

// ── Change notification ─────────────────────────────────────────────

/// Receives the whole profile after every change.
pub trait ProfileObserver: Send {
    fn profile_changed(&mut self, profile: &UserProfile);

    /// Called when the learner resets their progress.
    fn profile_cleared(&mut self) {}
}

impl<F: FnMut(&UserProfile) + Send> ProfileObserver for F {
    fn profile_changed(&mut self, profile: &UserProfile) {
        self(profile)
    }
}

/// Saves the profile on every change. Failures are logged and dropped;
/// the next change saves the full profile again.
pub struct Persister {
    store: Box<dyn ProfileStore>,
}

impl Persister {
    pub fn new(store: Box<dyn ProfileStore>) -> Self {
        Self { store }
    }
}

impl ProfileObserver for Persister {
    fn profile_changed(&mut self, profile: &UserProfile) {
        if let Err(e) = self.store.save(profile) {
            warn!(error = %e, "failed to save profile");
        }
    }

    fn profile_cleared(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear saved profile");
        }
    }
}

// ── Quiz answers ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub correct: bool,
    pub explanation: String,
    /// Set when this answer earned a new badge.
    pub badge: Option<Badge>,
    /// Set when this answer raised the learner's level.
    pub level_up: Option<u32>,
}

// ── Application state ───────────────────────────────────────────────

/// Everything a learner session touches, passed explicitly to every action.
pub struct AppState {
    markets: MarketHandle,
    position: PositionEngine,
    profile: UserProfile,
    content: ContentSelector,
    observers: Vec<Box<dyn ProfileObserver>>,
}

impl AppState {
    /// Load the saved profile (or start fresh) and persist every later change
    /// back to `store`.
    pub fn new(markets: MarketHandle, content: ContentSelector, store: Box<dyn ProfileStore>) -> Self {
        let profile = match store.load() {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::default(),
            Err(e) => {
                warn!(error = %e, "saved profile unreadable; starting with defaults");
                UserProfile::default()
            }
        };

        let mut state = Self::detached(markets, content, profile);
        state.observe(Persister::new(store));
        state
    }

    /// State without persistence.
    pub fn detached(markets: MarketHandle, content: ContentSelector, profile: UserProfile) -> Self {
        Self {
            markets,
            position: PositionEngine::new(),
            profile,
            content,
            observers: Vec::new(),
        }
    }

    /// Resume a previously saved position.
    pub fn with_ledger(mut self, ledger: PositionLedger) -> Self {
        self.position = PositionEngine::from_ledger(ledger);
        self
    }

    pub fn observe(&mut self, observer: impl ProfileObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn ledger(&self) -> &PositionLedger {
        self.position.ledger()
    }

    pub fn markets(&self) -> Arc<MarketSnapshot> {
        self.markets.snapshot()
    }

    pub fn content(&self) -> &ContentSelector {
        &self.content
    }

    fn commit(&mut self) {
        for observer in &mut self.observers {
            observer.profile_changed(&self.profile);
        }
    }

    // ── Sandbox ─────────────────────────────────────────────────────

    pub fn simulate_supply(&mut self, symbol: &str, amount: f64) -> ActionOutcome {
        let markets = self.markets.snapshot();
        match self.position.supply(&markets, symbol, amount) {
            Ok(receipt) => {
                self.record(SimulationAction::Supply, symbol, amount, Some(receipt.derived_amount));
                ActionOutcome::from(&receipt)
            }
            Err(e) => ActionOutcome::failure(&e),
        }
    }

    pub fn simulate_borrow(&mut self, symbol: &str, amount: f64) -> ActionOutcome {
        let markets = self.markets.snapshot();
        match self.position.borrow(&markets, symbol, amount) {
            Ok(receipt) => {
                self.record(SimulationAction::Borrow, symbol, amount, None);
                ActionOutcome::from(&receipt)
            }
            Err(e) => ActionOutcome::failure(&e),
        }
    }

    fn record(&mut self, action: SimulationAction, symbol: &str, amount: f64, derived_amount: Option<f64>) {
        progression::record_simulation(
            &mut self.profile,
            SimulationRecord {
                action,
                symbol: symbol.to_string(),
                amount,
                derived_amount,
                timestamp: Utc::now(),
            },
        );
        self.commit();
    }

    pub fn supply_apy(&self, symbol: &str) -> f64 {
        position::supply_apy(&self.markets.snapshot(), symbol)
    }

    pub fn borrow_apy(&self, symbol: &str) -> f64 {
        position::borrow_apy(&self.markets.snapshot(), symbol)
    }

    // ── Progression ─────────────────────────────────────────────────

    pub fn add_experience(&mut self, points: u32) -> Option<u32> {
        let level_up = progression::add_experience(&mut self.profile, points);
        self.commit();
        level_up
    }

    /// Returns whether the badge was new.
    pub fn award_badge(&mut self, badge: Badge) -> bool {
        let added = progression::award_badge(&mut self.profile, badge);
        if added {
            self.commit();
        }
        added
    }

    pub fn complete_topic(&mut self, topic: Topic) -> bool {
        let newly = progression::complete_topic(&mut self.profile, topic);
        self.commit();
        newly
    }

    pub fn update_balance(&mut self, symbol: &str, delta: f64) {
        progression::update_balance(&mut self.profile, symbol, delta);
        self.commit();
    }

    pub fn set_username(&mut self, username: &str) {
        self.profile.username = username.trim().to_string();
        self.commit();
    }

    pub fn progress_percent(&self) -> f64 {
        progression::progress_percent(&self.profile)
    }

    // ── Learning ────────────────────────────────────────────────────

    pub fn explain(&self, concept: &str, difficulty: Difficulty) -> Explanation {
        self.content.explain(concept, difficulty)
    }

    pub fn quiz_for(&self, concept: &str) -> Quiz {
        self.content.quiz_for(concept)
    }

    /// Grade an answer. A correct answer to a banked topic question completes
    /// that topic and awards its quiz badge, each only the first time.
    /// Questions without a topic are graded and change nothing.
    pub fn answer_quiz(&mut self, quiz: &Quiz, answer: usize) -> QuizResult {
        let correct = quiz.question.is_correct(answer);
        let mut result = QuizResult {
            correct,
            explanation: quiz.question.explanation.clone(),
            badge: None,
            level_up: None,
        };
        let Some(topic) = quiz.topic.filter(|_| correct) else {
            return result;
        };
        if self.profile.has_completed(topic) && self.profile.has_badge(&BadgeId::for_quiz(topic)) {
            return result;
        }

        let level_before = self.profile.level;
        if !self.profile.has_completed(topic) {
            progression::complete_topic(&mut self.profile, topic);
        }

        let badge = Badge::for_quiz(topic);
        if progression::award_badge(&mut self.profile, badge.clone()) {
            result.badge = Some(badge);
        }
        if self.profile.level > level_before {
            result.level_up = Some(self.profile.level);
        }

        self.commit();
        result
    }

    // ── Reset ───────────────────────────────────────────────────────

    /// Forget all progress and the simulated position.
    pub fn reset(&mut self) {
        self.profile = UserProfile::default();
        self.position.reset();
        for observer in &mut self.observers {
            observer.profile_cleared();
        }
        info!("profile reset");
    }
}
