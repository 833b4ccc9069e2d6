//! Shared core for the task-management API lambdas: the record/patch model,
//! the store abstraction with its DynamoDB and in-memory implementations,
//! the partial-update engine, and response shaping.

pub mod error;
pub mod record;
pub mod response;
pub mod store;
pub mod update;

pub use error::{Error, Result};
pub use record::{Patch, Record};
pub use store::{DynamoStore, MemoryStore, TaskStore};
pub use update::apply_partial_update;
