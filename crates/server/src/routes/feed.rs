//! Feed endpoint.

use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{Result, add_breadcrumb};
use crate::feed::{self, FeedQuery, FilterSelection};
use crate::state::AppState;

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Render the YML feed for the request's category selection.
///
/// The platform check runs first on every request until it has succeeded
/// once. The document is built in full before anything is sent.
#[tracing::instrument(skip_all, fields(query = raw.as_deref().unwrap_or_default()))]
pub async fn show(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Result<Response> {
    let query = FeedQuery::parse(raw.as_deref().unwrap_or_default());
    add_breadcrumb(
        "feed",
        "Rendering feed",
        Some(&[
            ("all", query.all.as_deref().unwrap_or_default()),
            ("categories", query.categories.as_deref().unwrap_or_default()),
            (
                "exclude_categories",
                query.exclude_categories.as_deref().unwrap_or_default(),
            ),
        ]),
    );

    state.ensure_platform_ready().await?;

    let selection = FilterSelection::from_query(&query, state.catalog()).await?;
    let generated_at = chrono::Local::now().naive_local();
    let body = feed::render(state.catalog(), &selection, generated_at).await?;

    Ok((
        [
            (header::CONTENT_TYPE, XML_CONTENT_TYPE),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        body,
    )
        .into_response())
}
