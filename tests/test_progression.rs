use chrono::Utc;

use learnfi::engine::progression::{self, SIMULATION_XP, TOPIC_COMPLETION_XP};
use learnfi::model::{
    Badge, BadgeId, BadgeKind, SimulationAction, SimulationRecord, Topic, UserProfile,
};

fn badge(id: &str) -> Badge {
    Badge {
        id: BadgeId::new(id).unwrap(),
        name: "First Steps".into(),
        kind: BadgeKind::Achievement,
        description: "Did something".into(),
    }
}

#[test]
fn test_default_profile() {
    let p = UserProfile::default();
    assert_eq!(p.level, 1);
    assert_eq!(p.experience, 0);
    assert!(p.completed_topics.is_empty());
    assert!(p.badges.is_empty());
    assert_eq!(p.balance.get("DAI"), Some(&0.005));
    assert_eq!(p.balance.get("ETH"), Some(&0.001));
    assert_eq!(p.balance.get("USDC"), Some(&10.0));
}

#[test]
fn test_single_level_up_per_call() {
    for (level, start, points) in [(1, 0, 100), (1, 99, 1), (2, 150, 60), (1, 0, 350), (3, 10, 500)] {
        let mut p = UserProfile::default();
        p.level = level;
        p.experience = start;
        let threshold = level * 100;
        let total = start + points;

        let result = progression::add_experience(&mut p, points);

        if total >= threshold {
            assert_eq!(result, Some(level + 1));
            assert_eq!(p.level, level + 1);
            assert_eq!(p.experience, total - threshold);
        } else {
            assert_eq!(result, None);
            assert_eq!(p.level, level);
            assert_eq!(p.experience, total);
        }
    }
}

#[test]
fn test_badge_award_is_idempotent() {
    let mut p = UserProfile::default();
    assert!(progression::award_badge(&mut p, badge("first_steps")));
    assert!(!progression::award_badge(&mut p, badge("first_steps")));
    assert_eq!(p.badges.len(), 1);

    // Same id with different display fields is still a duplicate.
    let mut renamed = badge("first_steps");
    renamed.name = "Other".into();
    assert!(!progression::award_badge(&mut p, renamed));
    assert_eq!(p.badges.len(), 1);

    assert!(progression::award_badge(&mut p, Badge::for_quiz(Topic::Apy)));
    assert_eq!(p.badges.len(), 2);
}

#[test]
fn test_complete_topic_stored_once() {
    let mut p = UserProfile::default();
    assert!(progression::complete_topic(&mut p, Topic::Ctoken));
    assert_eq!(p.experience, TOPIC_COMPLETION_XP);

    assert!(!progression::complete_topic(&mut p, Topic::Ctoken));
    assert_eq!(p.completed_topics.len(), 1);
    // 50 + 50 reaches the level-1 threshold.
    assert_eq!(p.level, 2);
    assert_eq!(p.experience, 0);
}

#[test]
fn test_record_simulation_appends_and_awards() {
    let mut p = UserProfile::default();
    for i in 0..3 {
        progression::record_simulation(
            &mut p,
            SimulationRecord {
                action: SimulationAction::Supply,
                symbol: "DAI".into(),
                amount: i as f64 + 1.0,
                derived_amount: Some(50.0),
                timestamp: Utc::now(),
            },
        );
    }
    assert_eq!(p.simulation_history.len(), 3);
    assert_eq!(p.simulation_history[2].amount, 3.0);
    assert_eq!(p.experience, 3 * SIMULATION_XP);
}

#[test]
fn test_progress_percent_of_ten() {
    let mut p = UserProfile::default();
    assert_eq!(progression::progress_percent(&p), 0.0);
    p.completed_topics.insert(Topic::Apy);
    p.completed_topics.insert(Topic::Interest);
    assert_eq!(progression::progress_percent(&p), 20.0);
    for topic in Topic::ALL {
        p.completed_topics.insert(topic);
    }
    assert_eq!(progression::progress_percent(&p), 60.0);
    assert!(progression::progress_percent(&p) <= 100.0);
}

#[test]
fn test_update_balance_creates_and_adjusts() {
    let mut p = UserProfile::default();
    progression::update_balance(&mut p, "USDC", -2.5);
    progression::update_balance(&mut p, "WBTC", 0.1);
    assert_eq!(p.balance["USDC"], 7.5);
    assert_eq!(p.balance["WBTC"], 0.1);
}

#[test]
fn test_badge_ids_validated() {
    assert!(BadgeId::new("quiz_apy").is_ok());
    assert!(BadgeId::new("").is_err());
    assert!(BadgeId::new("Quiz APY").is_err());
    assert_eq!(BadgeId::for_quiz(Topic::Liquidation).as_str(), "quiz_liquidation");

    let bad: Result<Badge, _> = serde_json::from_str(
        r#"{"id":"Not Valid","name":"x","type":"quiz","description":"y"}"#,
    );
    assert!(bad.is_err());
}
