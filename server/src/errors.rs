use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use color_eyre::Report;
use serde_json::json;

/// Error for HTML page handlers. The report is logged, the response is what the visitor sees.
#[derive(Debug)]
pub struct ServerError<R: IntoResponse>(pub(crate) Report, pub(crate) R);

pub type ServerResult<S, F = Response> = Result<S, ServerError<F>>;

impl<R: IntoResponse> IntoResponse for ServerError<R> {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = ?self.0, "Request Error");

        if is_development_mode() {
            let temp_response = self.1.into_response();
            if temp_response.status() == StatusCode::INTERNAL_SERVER_ERROR {
                let error_text = escape_html(&format!("{:?}", self.0));

                let error_html = format!(
                    r#"<!DOCTYPE html>
<html>
<head>
    <title>Development Error - 500</title>
    <style>
        body {{ font-family: monospace; margin: 20px; background: #1a1a1a; color: #fff; }}
        .error-container {{ background: #2d2d2d; padding: 20px; border-radius: 8px; }}
        .error-title {{ color: #ff6b6b; font-size: 24px; margin-bottom: 20px; }}
        .error-details {{ background: #000; padding: 15px; border-radius: 4px; overflow-x: auto; }}
        pre {{ margin: 0; white-space: pre-wrap; word-wrap: break-word; }}
    </style>
</head>
<body>
    <div class="error-container">
        <div class="error-title">Development Mode - Internal Server Error</div>
        <div class="error-details">
            <pre>{}</pre>
        </div>
    </div>
</body>
</html>"#,
                    error_text
                );

                return (StatusCode::INTERNAL_SERVER_ERROR, Html(error_html)).into_response();
            }
            return temp_response;
        }

        self.1.into_response()
    }
}

impl<E> From<E> for ServerError<StatusCode>
where
    E: Into<Report>,
{
    fn from(err: E) -> Self {
        ServerError(err.into(), StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Error for the JSON API. Renders as `{"error": message}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub source: Option<Report>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn with_source(mut self, source: Report) -> Self {
        self.source = Some(source);
        self
    }

    /// Hand the failure to a page handler, keeping status and cause
    pub(crate) fn into_server_error(self) -> ServerError<StatusCode> {
        let report = match self.source {
            Some(source) => source.wrap_err(self.message),
            None => color_eyre::eyre::eyre!(self.message),
        };
        ServerError(report, self.status)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.source {
            Some(source) if self.status.is_server_error() => {
                tracing::error!(error = ?source, status = %self.status, "API Error");
            }
            Some(source) => {
                tracing::warn!(error = ?source, status = %self.status, "API request rejected");
            }
            None => {
                tracing::info!(status = %self.status, message = %self.message, "API request rejected");
            }
        }

        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Attach an HTTP status and public message to a failed result, keeping the cause for the logs.
pub(crate) trait WithApiError<T> {
    fn api_error(self, status: StatusCode, message: &str) -> ApiResult<T>;
}

impl<T, E> WithApiError<T> for Result<T, E>
where
    E: Into<Report>,
{
    fn api_error(self, status: StatusCode, message: &str) -> ApiResult<T> {
        self.map_err(|err| ApiError::new(status, message).with_source(err.into()))
    }
}

fn is_development_mode() -> bool {
    std::env::var("DEVELOPMENT_MODE")
        .map(|v| v == "1")
        .unwrap_or(false)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn api_error_renders_json_body() {
        let response = ApiError::not_found("Product not found.").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Product not found." }));
    }

    #[test]
    fn api_error_keeps_source_for_logging() {
        let result: Result<(), Report> = Err(color_eyre::eyre::eyre!("connection refused"));
        let err = result
            .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch products.")
            .unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to fetch products.");
        assert!(err.source.is_some());
    }

    #[test]
    fn escape_html_escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
