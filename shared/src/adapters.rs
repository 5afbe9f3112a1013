use crate::{
    core::{ProcessedReading, ReadingSink},
    error::PersistenceError,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::{types::AttributeValue, Client};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug)]
pub struct DynamoDbReadingSink {
    table_name: String,
    dynamodb_client: Client,
}

impl DynamoDbReadingSink {
    pub fn new(table_name: String, dynamodb_client: Client) -> Self {
        Self {
            table_name,
            dynamodb_client,
        }
    }
}

#[async_trait]
impl ReadingSink for DynamoDbReadingSink {
    async fn put_reading(&self, reading: &ProcessedReading) -> Result<(), PersistenceError> {
        let item = to_item(reading)?;

        // the table is keyed on (id, timestamp); a redelivered reading overwrites itself
        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| PersistenceError::Rejected(format!("Error adding item: {:?}", e)))
    }
}

/// Flattens a processed reading into a DynamoDB item, one attribute per
/// top-level field. Nested objects and arrays become maps and lists.
pub fn to_item(
    reading: &ProcessedReading,
) -> Result<HashMap<String, AttributeValue>, PersistenceError> {
    match serde_json::to_value(reading)? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, to_attribute_value(value)))
            .collect()),
        _ => Err(PersistenceError::NotAnObject),
    }
}

fn to_attribute_value(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => {
            AttributeValue::L(items.into_iter().map(to_attribute_value).collect())
        }
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, to_attribute_value(value)))
                .collect(),
        ),
    }
}
