//! Unified error handling with Sentry integration.
//!
//! Every failure while serving a feed becomes an `AppError`. The response is
//! always `500` with a plain-text body of the form `Error: <message>`, so a
//! partially built document never reaches the client.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::feed::FeedError;

/// Application-level error type for the feed server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The commerce platform is unreachable or not active.
    #[error("{0}")]
    Bootstrap(#[from] CatalogError),

    /// Feed generation failed.
    #[error("{0}")]
    Feed(#[from] FeedError),
}

impl AppError {
    const fn stage(&self) -> &'static str {
        match self {
            Self::Bootstrap(_) => "bootstrap",
            Self::Feed(_) => "feed",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::with_scope(
            |scope| scope.set_tag("stage", self.stage()),
            || sentry::capture_error(&self),
        );
        tracing::error!(
            error = %self,
            stage = self.stage(),
            sentry_event_id = %event_id,
            "Feed request failed"
        );

        let body = format!("Error: {}", quick_xml::escape::escape(self.to_string()));

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for request processing.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of steps
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("feed", "Rendering feed", Some(&[("categories", "5,shoes")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_text(err: AppError) -> (StatusCode, String, String) {
        let response = err.into_response();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::Bootstrap(CatalogError::CommerceMissing);
        assert_eq!(err.to_string(), "WooCommerce is not installed or not active");
    }

    #[tokio::test]
    async fn test_every_error_is_500_plain_text() {
        let (status, content_type, body) =
            body_text(AppError::Bootstrap(CatalogError::CommerceMissing)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type, "text/plain; charset=utf-8");
        assert_eq!(body, "Error: WooCommerce is not installed or not active");

        let feed = AppError::Feed(FeedError::Categories(CatalogError::Api {
            status: 500,
            message: "db down".to_string(),
        }));
        let (status, _, body) = body_text(feed).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error: Error getting categories: API error: 500 - db down");
    }

    #[tokio::test]
    async fn test_message_is_escaped() {
        let err = AppError::Bootstrap(CatalogError::PlatformUnreachable(
            "<html> & more".to_string(),
        ));
        let (_, _, body) = body_text(err).await;
        assert_eq!(
            body,
            "Error: WordPress REST API is not reachable: &lt;html&gt; &amp; more"
        );
    }
}
