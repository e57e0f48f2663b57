use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Shape checks run on a request body right after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), &'static str>;
}

/// JSON body that is deserialized and validated.
///
/// Every failure (missing content type, bad syntax, missing or mistyped
/// field, failed `validate()`) is a 400 `VALIDATION_ERROR`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err| AppError::validation(rejection_message(&err)))?;

        body.validate().map_err(AppError::validation)?;

        Ok(ValidJson(body))
    }
}

fn rejection_message(err: &JsonRejection) -> String {
    match err {
        JsonRejection::JsonDataError(e) => format!("Invalid request body: {}", e.body_text()),
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        JsonRejection::MissingJsonContentType(_) => {
            "Missing Content-Type: application/json header".to_string()
        }
        _ => format!("Failed to read request body: {}", err.body_text()),
    }
}
