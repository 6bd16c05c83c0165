pub mod content;
pub mod ledger;
pub mod market;
pub mod profile;
pub mod topic;

pub use content::{Explanation, Quiz, QuizQuestion, SourceTag};
pub use ledger::PositionLedger;
pub use market::{AssetMarket, MarketSnapshot, Symbol};
pub use profile::{SimulationAction, SimulationRecord, UserProfile};
pub use topic::{Badge, BadgeId, BadgeKind, Difficulty, IdentifierError, Topic};
