//! Core module - Business logic
//!
//! Persistence and retrieval of question/answer turns as markdown files.

pub mod error;
pub mod heading;
pub mod markdown;
pub mod parser;
pub mod record;
pub mod scanner;
pub mod sources;
pub mod store;
pub mod timestamp;
pub mod writer;

pub use error::{StoreError, StoreResult};
pub use record::{ConversationTurn, Markers, StoredRecord};
pub use scanner::{parse_bound, Bound, DateRange};
pub use store::{list_records, save_turn, HistoryStore};
