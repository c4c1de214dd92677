/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inline_chart::ChartError;

/// Newtype wrapper to implement `IntoResponse` for `ChartError`, which is
/// foreign to this crate.
#[derive(Debug)]
pub struct ChartResponseError(pub ChartError);

impl ChartResponseError {
  pub fn status(&self) -> StatusCode {
    if self.0.is_caller_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR }
  }
}

impl IntoResponse for ChartResponseError {
  fn into_response(self) -> Response {
    let status = self.status();
    let err = self.0;
    if status.is_server_error() {
      tracing::error!(code = err.code(), error = %err, "chart render failed");
    } else {
      tracing::warn!(code = err.code(), error = %err, "chart render rejected");
    }
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": err.code(),
        "message": err.to_string(),
      }
    });
    (status, axum::Json(body)).into_response()
  }
}

impl From<ChartError> for ChartResponseError {
  fn from(err: ChartError) -> Self {
    Self(err)
  }
}
