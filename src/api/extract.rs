use axum::Json;
use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::server::RouteError;

/// JSON body extractor that checks the payload against its declared shape.
///
/// Every failure (wrong content type, malformed JSON, a non-object body, or fields of the wrong
/// type) is reported as [`RouteError::Validation`] rather than axum's default rejections.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl From<JsonRejection> for RouteError {
    fn from(rejection: JsonRejection) -> Self {
        RouteError::Validation(rejection.body_text())
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RouteError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        if !value.is_object() {
            return Err(RouteError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map(Validated)
            .map_err(|e| RouteError::Validation(e.to_string()))
    }
}
