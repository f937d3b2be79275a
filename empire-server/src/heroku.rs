//! Response helpers compatible with the Heroku Platform API.
//!
//! Errors use the Heroku error format described at
//! <https://devcenter.heroku.com/articles/platform-api-reference#errors>.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use empire_core::events::EventStreamError;
use futures_util::{Stream, StreamExt};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// The Accept header that selects the API version.
pub const ACCEPT_HEADER: &str = "application/vnd.heroku+json; version=3";

/// A Heroku style error body.
///
/// `status` is not serialized; when set it replaces the status the caller
/// would otherwise respond with.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResource {
    pub id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub status: Option<StatusCode>,
}

impl ErrorResource {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            url: None,
            status: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returned when a resource or route does not exist.
    pub fn not_found() -> Self {
        Self::new("not_found", "Request invalid, validate usage and try again")
            .with_status(StatusCode::NOT_FOUND)
    }

    /// Wrap an unexpected error.
    pub fn internal(err: &dyn std::error::Error) -> Self {
        Self::new("internal_error", err.to_string())
    }

    /// Respond with this error, using `status` unless the error carries its
    /// own.
    pub fn respond(self, status: StatusCode) -> Response {
        let status = self.status.unwrap_or(status);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ErrorResource {
    fn into_response(self) -> Response {
        self.respond(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<EventStreamError> for ErrorResource {
    fn from(err: EventStreamError) -> Self {
        tracing::error!(error = %err, "Event stream error");
        Self::internal(&err)
    }
}

/// JSON encode `value`; `None` encodes as an empty object.
pub fn encode<T: Serialize>(value: Option<T>) -> Result<Json<Value>, ErrorResource> {
    match value {
        Some(v) => serde_json::to_value(v)
            .map(Json)
            .map_err(|e| ErrorResource::internal(&e)),
        None => Ok(Json(Value::Object(Default::default()))),
    }
}

/// Respond with 204 and an empty body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// JSON request body extractor.
///
/// Unlike [`Json`] it does not insist on a `Content-Type` header. Any body
/// that fails to decode is rejected with a `bad_request` error.
pub struct Decode<T>(pub T);

impl<T, S> FromRequest<S> for Decode<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ErrorResource;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| bad_request(e.body_text()))?;

        serde_json::from_slice(&body)
            .map(Decode)
            .map_err(|e| bad_request(e.to_string()))
    }
}

fn bad_request(message: String) -> ErrorResource {
    ErrorResource::new("bad_request", message).with_status(StatusCode::BAD_REQUEST)
}

/// Stream `items` to the client as newline delimited JSON.
///
/// Each item is written as soon as the stream yields it. An item that fails
/// to serialize aborts the body.
pub fn stream<S, T>(items: S) -> Response
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + 'static,
{
    let lines = items.map(|item| {
        serde_json::to_vec(&item).map(|mut line| {
            line.push(b'\n');
            line
        })
    });

    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(lines),
    )
        .into_response()
}
