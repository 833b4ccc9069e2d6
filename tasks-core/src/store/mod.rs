//! Store abstraction over the task table. Handlers and the update engine
//! only see the trait; `main` decides which implementation to inject.

mod dynamo;
mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{Patch, Record};

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Point lookup by partition key.
    async fn get_task(&self, pk: &str) -> Result<Option<Record>>;

    /// Full scan of the table.
    async fn list_tasks(&self) -> Result<Vec<Record>>;

    /// Unconditional insert or replace.
    async fn put_task(&self, record: &Record) -> Result<()>;

    /// Merge the patch into the record identified by `pk`. Fails with
    /// `Error::NotFound` unless the record exists at write time; existence
    /// is asserted by the store atomically with the write.
    async fn update_task(&self, pk: &str, patch: &Patch) -> Result<()>;

    /// Delete by partition key. Fails with `Error::NotFound` when there
    /// was nothing to delete.
    async fn delete_task(&self, pk: &str) -> Result<()>;
}
