//! DynamoDB-backed task store.
//!
//! Patches are translated into `SET` update expressions that route both
//! field names and values through positional placeholders, so raw field
//! names never appear in the expression string and DynamoDB reserved words
//! cannot collide. The write carries an `attribute_exists` condition on the
//! partition key; a record deleted between lookup and write surfaces as
//! `Error::NotFound` rather than a silent insert.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::record::{Patch, Record, PK};
use crate::store::TaskStore;

pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        DynamoStore {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl TaskStore for DynamoStore {
    async fn get_task(&self, pk: &str) -> Result<Option<Record>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(pk.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| Error::store(format!("DynamoDB GetItem failed: {e}")))?;

        Ok(response.item().and_then(item_to_record))
    }

    async fn list_tasks(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let mut request = self.client.scan().table_name(&self.table_name);
            if let Some(key) = last_evaluated_key.take() {
                request = request.set_exclusive_start_key(Some(key));
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::store(format!("DynamoDB Scan failed: {e}")))?;

            for item in response.items() {
                if let Some(record) = item_to_record(item) {
                    records.push(record);
                }
            }

            match response.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    last_evaluated_key = Some(key.clone());
                }
                _ => break,
            }
        }

        Ok(records)
    }

    async fn put_task(&self, record: &Record) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| Error::store(format!("DynamoDB PutItem failed: {e}")))?;

        Ok(())
    }

    async fn update_task(&self, pk: &str, patch: &Patch) -> Result<()> {
        let (expression, mut names, values) = build_update_expression(patch);
        names.insert("#pk".to_string(), PK.to_string());

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(pk.to_string()))
            .update_expression(expression)
            .condition_expression("attribute_exists(#pk)")
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_conditional_check_failed(&e) => Err(Error::NotFound {
                pk: pk.to_string(),
            }),
            Err(e) => Err(Error::store(format!("DynamoDB UpdateItem failed: {e}"))),
        }
    }

    async fn delete_task(&self, pk: &str) -> Result<()> {
        let response = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(PK, AttributeValue::S(pk.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| Error::store(format!("DynamoDB DeleteItem failed: {e}")))?;

        // ALL_OLD comes back empty when no record existed.
        if response.attributes().is_none() {
            return Err(Error::NotFound {
                pk: pk.to_string(),
            });
        }

        Ok(())
    }
}

/// Translate a patch into a `SET` expression with positional placeholders.
/// Every field name becomes `#fN` and every value `:vN`.
fn build_update_expression(
    patch: &Patch,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut parts = Vec::with_capacity(patch.fields().len());
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (i, (field, value)) in patch.fields().iter().enumerate() {
        let name_placeholder = format!("#f{i}");
        let value_placeholder = format!(":v{i}");
        parts.push(format!("{name_placeholder} = {value_placeholder}"));
        names.insert(name_placeholder, field.clone());
        values.insert(value_placeholder, json_to_attr(value));
    }

    (format!("SET {}", parts.join(", ")), names, values)
}

fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => matches!(
            service_err.err(),
            UpdateItemError::ConditionalCheckFailedException(_)
        ),
        _ => false,
    }
}

fn record_to_item(record: &Record) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::with_capacity(record.fields.len() + 1);
    item.insert(PK.to_string(), AttributeValue::S(record.pk.clone()));
    for (field, value) in &record.fields {
        item.insert(field.clone(), json_to_attr(value));
    }
    item
}

/// Items without a string `pk` did not come from this API; they are
/// skipped rather than surfaced as errors.
fn item_to_record(item: &HashMap<String, AttributeValue>) -> Option<Record> {
    let pk = item.get(PK)?.as_s().ok()?.clone();
    let mut fields = Map::new();
    for (name, attr) in item {
        if name == PK {
            continue;
        }
        if let Some(value) = attr_to_json(attr) {
            fields.insert(name.clone(), value);
        }
    }
    Some(Record { pk, fields })
}

fn json_to_attr(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attr).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_attr(v)))
                .collect(),
        ),
    }
}

fn attr_to_json(attr: &AttributeValue) -> Option<Value> {
    match attr {
        AttributeValue::S(s) => Some(Value::String(s.clone())),
        AttributeValue::N(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Some(Value::Number(i.into()))
            } else if let Ok(f) = n.parse::<f64>() {
                serde_json::Number::from_f64(f).map(Value::Number)
            } else {
                None
            }
        }
        AttributeValue::Bool(b) => Some(Value::Bool(*b)),
        AttributeValue::Null(_) => Some(Value::Null),
        AttributeValue::L(list) => Some(Value::Array(
            list.iter().filter_map(attr_to_json).collect(),
        )),
        AttributeValue::M(map) => Some(Value::Object(
            map.iter()
                .filter_map(|(k, v)| attr_to_json(v).map(|value| (k.clone(), value)))
                .collect(),
        )),
        // Binary and set types are not produced by this API.
        _ => None,
    }
}
