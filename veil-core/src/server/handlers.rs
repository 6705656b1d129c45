//! Request handlers for Veil
//!
//! Provides the [`Handler`] seam that request filters and the file server
//! implement, and the response type they produce.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;

/// Response from a handler
#[derive(Debug)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl HandlerResponse {
    /// Create a simple response with status code
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a response with body
    pub fn with_body(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Some(body.into()),
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Create redirect response
    pub fn redirect(to: &str, status: StatusCode) -> Self {
        Self::status(status).header("Location", to)
    }

    /// Plain-text error response, e.g. `404 not found`
    pub fn error(status: StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or("error").to_lowercase();
        Self::with_body(status, format!("{} {}\n", status.as_u16(), reason))
            .header("Content-Type", "text/plain; charset=utf-8")
    }

    /// Create not found response
    pub fn not_found() -> Self {
        Self::error(StatusCode::NOT_FOUND)
    }

    /// Create method not allowed response
    pub fn method_not_allowed(allow: &str) -> Self {
        Self::with_body(StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed\n")
            .header("Allow", allow)
            .header("Content-Type", "text/plain; charset=utf-8")
    }

    /// Create internal server error response
    pub fn internal_error() -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// A request handler.
///
/// Handlers compose by wrapping: a filter holds its inner handler and either
/// answers itself or forwards the request untouched.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handle a request. Request bodies are never read, so they are erased to `()`.
    async fn handle(&self, req: &Request<()>) -> HandlerResponse;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(&self, req: &Request<()>) -> HandlerResponse {
        (**self).handle(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_response() {
        let response = HandlerResponse::not_found();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.body.is_some());
    }

    #[test]
    fn test_error_response_body() {
        let response = HandlerResponse::error(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body, Some(Bytes::from("500 internal server error\n")));

        let response = HandlerResponse::not_found();
        assert_eq!(response.body, Some(Bytes::from("404 not found\n")));
    }

    #[test]
    fn test_redirect_response() {
        let response = HandlerResponse::redirect("/docs/", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers.get("Location"), Some(&"/docs/".to_string()));
        assert!(response.body.is_none());
    }

    #[test]
    fn test_method_not_allowed_response() {
        let response = HandlerResponse::method_not_allowed("GET, HEAD");
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers.get("Allow"), Some(&"GET, HEAD".to_string()));
    }
}
