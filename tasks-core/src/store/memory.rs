//! In-memory task store with the same observable semantics as the
//! DynamoDB store. The test double every handler and engine test runs
//! against; also usable as a scratch backend in local tooling.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::record::{Patch, Record};
use crate::store::TaskStore;

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn get_task(&self, pk: &str) -> Result<Option<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        Ok(records.get(pk).cloned())
    }

    async fn list_tasks(&self) -> Result<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        Ok(records.values().cloned().collect())
    }

    async fn put_task(&self, record: &Record) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        records.insert(record.pk.clone(), record.clone());
        Ok(())
    }

    async fn update_task(&self, pk: &str, patch: &Patch) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))?;

        // Existence is re-checked under the write lock, mirroring the
        // conditional write of the DynamoDB store.
        match records.get_mut(pk) {
            Some(record) => {
                for (field, value) in patch.fields() {
                    record.fields.insert(field.clone(), value.clone());
                }
                Ok(())
            }
            None => Err(Error::NotFound {
                pk: pk.to_string(),
            }),
        }
    }

    async fn delete_task(&self, pk: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| Error::store("memory store lock poisoned"))?;
        match records.remove(pk) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound {
                pk: pk.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn put_then_get_returns_the_record() {
        let store = MemoryStore::new();
        store
            .put_task(&record(json!({"pk": "t1", "title": "a"})))
            .await
            .unwrap();

        let found = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(found.fields.get("title"), Some(&json!("a")));
        assert!(store.get_task("t2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_merges_instead_of_replacing() {
        let store = MemoryStore::new();
        store
            .put_task(&record(json!({"pk": "t1", "title": "a", "done": false})))
            .await
            .unwrap();

        let patch = Patch::from_value(json!({"title": "b"})).unwrap();
        store.update_task("t1", &patch).await.unwrap();

        let found = store.get_task("t1").await.unwrap().unwrap();
        assert_eq!(found.fields.get("title"), Some(&json!("b")));
        assert_eq!(found.fields.get("done"), Some(&json!(false)));
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let patch = Patch::from_value(json!({"title": "b"})).unwrap();
        let err = store.update_task("nope", &patch).await.unwrap_err();
        assert_eq!(err, Error::NotFound { pk: "nope".into() });
    }

    #[tokio::test]
    async fn delete_reports_prior_existence() {
        let store = MemoryStore::new();
        store
            .put_task(&record(json!({"pk": "t1", "title": "a"})))
            .await
            .unwrap();

        store.delete_task("t1").await.unwrap();
        let err = store.delete_task("t1").await.unwrap_err();
        assert_eq!(err, Error::NotFound { pk: "t1".into() });
    }

    #[tokio::test]
    async fn list_returns_all_records() {
        let store = MemoryStore::new();
        store
            .put_task(&record(json!({"pk": "t1", "title": "a"})))
            .await
            .unwrap();
        store
            .put_task(&record(json!({"pk": "t2", "title": "b"})))
            .await
            .unwrap();

        let mut pks: Vec<String> = store
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.pk)
            .collect();
        pks.sort();
        assert_eq!(pks, vec!["t1".to_string(), "t2".to_string()]);
    }
}
