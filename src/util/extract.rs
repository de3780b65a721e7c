use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::util::error::HandlerError;

/// Joins every field error into one message, ordered by field name
pub fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// JSON body that has passed its `validator` rules; every failure is a 400
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return HandlerError::bad_request(format!("Please add a {}", field));
                }

                if error_msg.contains("unknown variant") {
                    return HandlerError::bad_request(
                        error_msg.rsplit(": ").next().unwrap_or("Invalid value").to_string(),
                    );
                }

                if error_msg.contains("invalid type") {
                    return HandlerError::bad_request("Invalid field type in request");
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return HandlerError::bad_request("Missing 'Content-Type: application/json' header");
                }

                HandlerError::bad_request("Invalid request body")
            })?;

        value
            .validate()
            .map_err(|errors| HandlerError::bad_request(format_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
