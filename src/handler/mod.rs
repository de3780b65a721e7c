pub mod auth_handler;
pub mod bootcamp_handler;
pub mod course_handler;

use bson::Document;
use serde::Serialize;
use serde_json::Value;

use crate::util::error::HandlerError;
use crate::util::json;

/// Client JSON for a stored model
pub(crate) fn model_json<T: Serialize>(value: &T) -> Result<Value, HandlerError> {
    json::to_json(value).map_err(|e| HandlerError::internal(format!("Failed to serialize response: {}", e)))
}

pub(crate) fn documents_json(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(json::document_to_json).collect()
}
