use axum::{
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use fieldmark_utils::{ErrorResponse, FieldmarkError};

/// Error returned by handlers; renders as an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError(pub FieldmarkError);

impl<E> From<E> for ApiError
where
    E: Into<FieldmarkError>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.error_code(), "Request failed");
        } else {
            tracing::warn!(error = %self.0, code = self.0.error_code(), "Request rejected");
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}

/// Rewrites plain-text error responses produced outside the handlers
/// (extractor rejections, body limits, timeouts) into JSON error bodies.
pub async fn error_handling_middleware(
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let reason = status.canonical_reason().unwrap_or("Request failed");
    let body = ErrorResponse {
        error: reason.to_string(),
        code: format!("HTTP_{}", status.as_u16()),
        message: reason.to_string(),
        details: None,
    };

    (status, Json(body)).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.as_bytes().starts_with(b"application/json"))
        .unwrap_or(false)
}
