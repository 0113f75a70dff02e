use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::{Number, Value};
use std::collections::HashMap;

use crate::db::document_store::{Document, DocumentStore, StoreError, UpdateCounts, ID_FIELD};
use crate::db::record_id::RecordId;

/// Documents live in a DynamoDB table named after the collection, keyed by a
/// string `id` attribute. Nested JSON maps onto `M`/`L` attributes.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn key(id: &RecordId) -> HashMap<String, AttributeValue> {
        let mut key = HashMap::new();
        key.insert(ID_FIELD.to_string(), AttributeValue::S(id.to_string()));
        key
    }
}

#[async_trait]
impl DocumentStore for DynamoDbStore {
    async fn insert(&self, collection: &str, id: &RecordId, document: Document) -> Result<(), StoreError> {
        let mut item = to_item(document);
        item.insert(ID_FIELD.to_string(), AttributeValue::S(id.to_string()));

        log::info!("Creating record {} in DynamoDB table '{}'", id, collection);

        match self
            .client
            .put_item()
            .table_name(collection)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID_FIELD)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception())
                {
                    return Err(StoreError::Duplicate(id.to_string()));
                }
                log::error!("DynamoDB put_item failed for record {}: {:?}", id, e);
                Err(StoreError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn find(&self, collection: &str, id: &RecordId) -> Result<Option<Document>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(collection)
            .set_key(Some(Self::key(id)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| StoreError::DynamoDb(e.to_string()))?;

        match result.item {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: &RecordId,
        fields: Document,
    ) -> Result<UpdateCounts, StoreError> {
        if fields.is_empty() {
            return Err(StoreError::InvalidData("No fields to update".to_string()));
        }

        let mut update_expression_parts = Vec::new();
        let mut expression_attribute_names = HashMap::new();
        let mut expression_attribute_values = HashMap::new();

        expression_attribute_names.insert("#id".to_string(), ID_FIELD.to_string());
        for (i, (name, value)) in fields.into_iter().enumerate() {
            update_expression_parts.push(format!("#f{i} = :v{i}"));
            expression_attribute_names.insert(format!("#f{i}"), name);
            expression_attribute_values.insert(format!(":v{i}"), to_attribute(value));
        }

        let update_expression = format!("SET {}", update_expression_parts.join(", "));
        log::debug!("Update expression: {}", update_expression);
        log::debug!("Expression attribute names: {:?}", expression_attribute_names);

        let request = self
            .client
            .update_item()
            .table_name(collection)
            .set_key(Some(Self::key(id)))
            .update_expression(update_expression)
            .condition_expression("attribute_exists(#id)")
            .set_expression_attribute_names(Some(expression_attribute_names))
            .set_expression_attribute_values(Some(expression_attribute_values))
            .return_values(ReturnValue::UpdatedNew);

        match request.send().await {
            Ok(response) => {
                log::debug!("Update response: {:?}", response);
                Ok(UpdateCounts {
                    matched: 1,
                    modified: 1,
                })
            }
            Err(e) => {
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception())
                {
                    log::warn!("No record {} in table '{}' to update", id, collection);
                    return Ok(UpdateCounts::default());
                }

                log::error!("DynamoDB update_item failed for record {}: {:?}", id, e);
                let error_msg = if let Some(service_err) = e.as_service_error() {
                    format!("Service error: {:?}", service_err)
                } else {
                    format!("SDK error: {}", e)
                };
                Err(StoreError::DynamoDb(error_msg))
            }
        }
    }
}

pub fn to_item(document: Document) -> HashMap<String, AttributeValue> {
    document
        .into_iter()
        .map(|(name, value)| (name, to_attribute(value)))
        .collect()
}

pub fn from_item(item: HashMap<String, AttributeValue>) -> Result<Document, StoreError> {
    item.into_iter()
        .map(|(name, value)| Ok((name, from_attribute(value)?)))
        .collect()
}

fn to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => AttributeValue::L(items.into_iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(to_item(map)),
    }
}

fn from_attribute(value: AttributeValue) -> Result<Value, StoreError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(b)),
        AttributeValue::S(s) => Ok(Value::String(s)),
        AttributeValue::N(n) => parse_number(&n),
        AttributeValue::L(items) => items
            .into_iter()
            .map(from_attribute)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => from_item(map).map(Value::Object),
        AttributeValue::Ss(items) => Ok(Value::Array(items.into_iter().map(Value::String).collect())),
        AttributeValue::Ns(items) => items
            .iter()
            .map(|n| parse_number(n))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Err(StoreError::InvalidData(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

fn parse_number(raw: &str) -> Result<Value, StoreError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Number(i.into()));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Value::Number(u.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::InvalidData(format!("Invalid number: {}", raw)))
}
