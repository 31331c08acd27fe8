//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON extractor that runs the payload's `Validate` rules after
/// deserialization. Malformed bodies map to a bad request, rule failures
/// to a validation error.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(flatten_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// One line per failed rule, `field: message`.
fn flatten_errors(errors: &validator::ValidationErrors) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            match &err.message {
                Some(message) => lines.push(format!("{}: {}", field, message)),
                None => lines.push(format!("{}: invalid value", field)),
            }
        }
    }
    lines.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Sample {
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[test]
    fn failed_rules_are_flattened_with_field_names() {
        let sample = Sample {
            email: "nope".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(flatten_errors(&errors), "email: Invalid email format");
    }
}
