use tracing::info;

use crate::model::{Badge, SimulationRecord, Topic, UserProfile};

/// Experience awarded for each simulated supply or borrow.
pub const SIMULATION_XP: u32 = 25;
/// Experience awarded for completing a topic.
pub const TOPIC_COMPLETION_XP: u32 = 50;
/// Level `n` is left after `n × XP_PER_LEVEL` experience.
pub const XP_PER_LEVEL: u32 = 100;
/// Denominator for the progress bar.
pub const PROGRESS_TOPIC_COUNT: usize = 10;

/// Add experience. Crossing the threshold raises the level by exactly one and
/// carries the remainder over. Returns the new level on level-up.
pub fn add_experience(profile: &mut UserProfile, points: u32) -> Option<u32> {
    let experience = profile.experience.saturating_add(points);
    let threshold = profile.level_threshold();

    if experience >= threshold {
        profile.level += 1;
        profile.experience = experience - threshold;
        info!(level = profile.level, experience = profile.experience, "level up");
        Some(profile.level)
    } else {
        profile.experience = experience;
        None
    }
}

/// Award a badge unless one with the same id is already held.
pub fn award_badge(profile: &mut UserProfile, badge: Badge) -> bool {
    if profile.has_badge(&badge.id) {
        return false;
    }
    info!(badge = %badge.id, "badge awarded");
    profile.badges.push(badge);
    true
}

/// Mark a topic complete and award topic experience.
///
/// The topic is stored once; the experience is granted on every call.
/// Returns whether the topic was newly completed.
pub fn complete_topic(profile: &mut UserProfile, topic: Topic) -> bool {
    let newly = profile.completed_topics.insert(topic);
    add_experience(profile, TOPIC_COMPLETION_XP);
    newly
}

/// Append to the simulation history and award simulation experience.
pub fn record_simulation(profile: &mut UserProfile, record: SimulationRecord) {
    profile.simulation_history.push(record);
    add_experience(profile, SIMULATION_XP);
}

/// Adjust the display wallet by `delta` (negative to spend).
pub fn update_balance(profile: &mut UserProfile, symbol: &str, delta: f64) {
    *profile.balance.entry(symbol.to_string()).or_insert(0.0) += delta;
}

/// Curriculum progress in percent, capped at 100.
pub fn progress_percent(profile: &UserProfile) -> f64 {
    let pct = profile.completed_topics.len() as f64 / PROGRESS_TOPIC_COUNT as f64 * 100.0;
    pct.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_up_carries_remainder() {
        let mut p = UserProfile::default();
        p.experience = 90;
        assert_eq!(add_experience(&mut p, 25), Some(2));
        assert_eq!(p.experience, 15);
    }

    #[test]
    fn test_single_call_raises_one_level_only() {
        let mut p = UserProfile::default();
        assert_eq!(add_experience(&mut p, 350), Some(2));
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 250);
    }

    #[test]
    fn test_balance_update_creates_entry() {
        let mut p = UserProfile::default();
        update_balance(&mut p, "WBTC", 0.5);
        update_balance(&mut p, "USDC", -2.0);
        assert_eq!(p.balance["WBTC"], 0.5);
        assert_eq!(p.balance["USDC"], 8.0);
    }
}
