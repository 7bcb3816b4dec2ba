//! Request body extractor accepting either JSON or URL-encoded forms.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;

use crate::routes::ErrorBody;

/// Deserializes the body as JSON when the request says so, and as
/// `application/x-www-form-urlencoded` otherwise.
///
/// An empty body always decodes as an empty form, so every field of `T`
/// should be optional.
#[derive(Debug, Clone, Default)]
pub struct Payload<T>(pub T);

/// Rejection for a body that cannot be decoded.
#[derive(Debug)]
pub struct PayloadRejection(String);

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        tracing::debug!(reason = %self.0, "rejected request body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(format!("invalid request body: {}", self.0))),
        )
            .into_response()
    }
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = is_json(&req);
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| PayloadRejection(e.body_text()))?;
        decode(&bytes, json).map(Payload).map_err(PayloadRejection)
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().to_ascii_lowercase())
        .is_some_and(|mime| mime == "application/json" || mime.ends_with("+json"))
}

fn decode<T: DeserializeOwned>(bytes: &[u8], json: bool) -> Result<T, String> {
    if json && !bytes.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    } else {
        serde_urlencoded::from_bytes(bytes).map_err(|e| e.to_string())
    }
}
