//! crates/achameupet_core/src/record.rs
//!
//! Conversion between domain entities and stored documents. The store assigns
//! listing ids, so `id` is stripped from the record on write and re-attached
//! from the document name on read.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::Document;

pub(crate) fn to_record<T: Serialize>(entity: &T) -> ServiceResult<Value> {
    let mut value = serde_json::to_value(entity)
        .map_err(|e| ServiceError::Collaborator(format!("record serialization failed: {e}")))?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

pub(crate) fn from_document<T: DeserializeOwned>(doc: Document) -> ServiceResult<T> {
    let Document { id, mut record } = doc;
    if let Some(map) = record.as_object_mut() {
        map.insert("id".to_string(), Value::String(id.clone()));
    }
    serde_json::from_value(record)
        .map_err(|e| ServiceError::Collaborator(format!("malformed record {id}: {e}")))
}
