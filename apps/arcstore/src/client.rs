//! # HTTP Store Adapter
//!
//! A [`StoreClient`] that speaks the wide-column JSON wire protocol
//! (`x-amz-json-1.0` bodies, one POST per operation with a target
//! header) against a DynamoDB-compatible endpoint, typically a local
//! emulator.
//!
//! The adapter sends a static credential-scope header carrying the
//! configured region; local emulators parse the scope out of it and no
//! request signing is performed. Remote `__type` error discriminators
//! map onto the core error taxonomy; everything unrecognized stays a
//! service error and propagates verbatim.

use arcstore_core::{
    ContinuationToken, EdgeRecord, SOURCE_KEY_ATTRIBUTE, ScanPage, StoreClient, StoreError,
    TARGET_KEY_ATTRIBUTE, TableDescription, TableSchema, TableStatus,
};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Wire version prefix of the table service protocol.
const TARGET_PREFIX: &str = "DynamoDB_20120810";

// =============================================================================
// HTTP STORE
// =============================================================================

/// Blocking HTTP client for a wide-column table service endpoint.
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: reqwest::blocking::Client,
    endpoint: String,
    region: String,
}

impl HttpStore {
    /// Create a client for the given endpoint and region.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
            region: region.into(),
        }
    }

    /// POST one operation and decode the JSON response.
    fn call(&self, operation: &str, body: &Value) -> Result<Value, StoreError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("content-type", "application/x-amz-json-1.0")
            .header("x-amz-target", format!("{TARGET_PREFIX}.{operation}"))
            .header("authorization", self.credential_scope())
            .json(body)
            .send()
            .map_err(|e| StoreError::Service(format!("request to {}: {e}", self.endpoint)))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .map_err(|e| StoreError::Service(format!("malformed response body: {e}")))?;

        if status.is_success() {
            Ok(payload)
        } else {
            Err(decode_error(&payload, status.as_u16()))
        }
    }

    /// Credential-scope header local emulators use to pick the region.
    fn credential_scope(&self) -> String {
        format!(
            "AWS4-HMAC-SHA256 Credential=arcstore/19700101/{}/dynamodb/aws4_request, \
             SignedHeaders=content-type;x-amz-target, Signature=unsigned",
            self.region
        )
    }
}

impl StoreClient for HttpStore {
    fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
        let payload = self.call("DescribeTable", &json!({ "TableName": name }))?;
        let table = payload
            .get("Table")
            .ok_or_else(|| StoreError::Service("describe response missing Table".to_string()))?;

        let status = table
            .get("TableStatus")
            .cloned()
            .and_then(|v| serde_json::from_value::<TableStatus>(v).ok())
            .unwrap_or(TableStatus::Unknown);
        let name = table
            .get("TableName")
            .and_then(Value::as_str)
            .unwrap_or(name)
            .to_string();

        Ok(TableDescription { name, status })
    }

    fn create_table(&self, schema: &TableSchema) -> Result<(), StoreError> {
        let body = serde_json::to_value(schema)
            .map_err(|e| StoreError::Service(format!("encode schema: {e}")))?;
        self.call("CreateTable", &body)?;
        Ok(())
    }

    fn delete_table(&self, name: &str) -> Result<(), StoreError> {
        self.call("DeleteTable", &json!({ "TableName": name }))?;
        Ok(())
    }

    fn scan_page(
        &self,
        table: &str,
        limit: u32,
        start: Option<&ContinuationToken>,
    ) -> Result<ScanPage, StoreError> {
        let mut body = json!({ "TableName": table, "Limit": limit });
        if let Some(token) = start {
            let key: Value = serde_json::from_slice(token.as_bytes())
                .map_err(|e| StoreError::Service(format!("malformed continuation token: {e}")))?;
            body["ExclusiveStartKey"] = key;
        }

        let payload = self.call("Scan", &body)?;

        let mut records = Vec::new();
        if let Some(items) = payload.get("Items").and_then(Value::as_array) {
            for item in items {
                records.push(record_from_item(item)?);
            }
        }
        let count = payload
            .get("Count")
            .and_then(Value::as_u64)
            .unwrap_or(records.len() as u64);
        let next = match payload.get("LastEvaluatedKey") {
            Some(key) if !key.is_null() => {
                let bytes = serde_json::to_vec(key).map_err(|e| {
                    StoreError::Service(format!("encode continuation token: {e}"))
                })?;
                Some(ContinuationToken::from_bytes(bytes))
            }
            _ => None,
        };

        Ok(ScanPage {
            records,
            count,
            next,
        })
    }

    fn put_item(&self, table: &str, record: &EdgeRecord) -> Result<(), StoreError> {
        self.call(
            "PutItem",
            &json!({ "TableName": table, "Item": item_from_record(record) }),
        )?;
        Ok(())
    }
}

// =============================================================================
// WIRE CONVERSIONS
// =============================================================================

/// Map a remote error payload onto the core taxonomy.
///
/// `__type` is a fully-qualified discriminator such as
/// `com.amazonaws.dynamodb.v20120810#ResourceNotFoundException`.
fn decode_error(payload: &Value, status: u16) -> StoreError {
    let qualified = payload.get("__type").and_then(Value::as_str).unwrap_or("");
    let name = qualified.rsplit('#').next().unwrap_or(qualified);
    let message = payload
        .get("message")
        .or_else(|| payload.get("Message"))
        .and_then(Value::as_str)
        .unwrap_or("no message");

    match name {
        "ResourceNotFoundException" => StoreError::NotFound(message.to_string()),
        "ResourceInUseException" => StoreError::AlreadyExists(message.to_string()),
        _ => StoreError::Service(format!("{status} {name}: {message}")),
    }
}

/// Encode a record as a wire item: every attribute a `{"S": value}`
/// scalar, the key pair under its reserved column names.
fn item_from_record(record: &EdgeRecord) -> Value {
    let mut item = Map::new();
    item.insert(
        SOURCE_KEY_ATTRIBUTE.to_string(),
        json!({ "S": record.source() }),
    );
    item.insert(
        TARGET_KEY_ATTRIBUTE.to_string(),
        json!({ "S": record.target() }),
    );
    for (key, value) in record.extra() {
        item.insert(key.clone(), json!({ "S": value }));
    }
    Value::Object(item)
}

/// Decode a wire item back into a record.
fn record_from_item(item: &Value) -> Result<EdgeRecord, StoreError> {
    let object = item
        .as_object()
        .ok_or_else(|| StoreError::Service("scan item is not an object".to_string()))?;

    let source = string_attribute(object, SOURCE_KEY_ATTRIBUTE)?;
    let target = string_attribute(object, TARGET_KEY_ATTRIBUTE)?;

    let mut extra = BTreeMap::new();
    for key in object.keys() {
        if key == SOURCE_KEY_ATTRIBUTE || key == TARGET_KEY_ATTRIBUTE {
            continue;
        }
        extra.insert(key.clone(), string_attribute(object, key)?);
    }

    EdgeRecord::from_parts(source, target, extra)
}

fn string_attribute(object: &Map<String, Value>, key: &str) -> Result<String, StoreError> {
    object
        .get(key)
        .and_then(|attribute| attribute.get("S"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            StoreError::Service(format!("attribute '{key}' missing or not a string scalar"))
        })
}

// =============================================================================
// TESTS
// =============================================================================
