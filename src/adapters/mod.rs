use crate::error::AppError;

pub mod github;
pub mod kv;
pub mod spotify;
pub mod unsplash;

/// Forwards an upstream error body verbatim, as structured JSON when it
/// parses and as a plain string otherwise.
pub(crate) async fn upstream_error(status: u16, response: reqwest::Response) -> AppError {
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
    AppError::Upstream { status, body }
}
