pub mod app;
pub mod position;
pub mod progression;

pub use app::{AppState, Persister, ProfileObserver, QuizResult};
pub use position::{ActionOutcome, BorrowReceipt, PositionEngine, PositionError, SupplyReceipt};
