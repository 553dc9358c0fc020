/// /api/MovieSearch endpoints
use crate::{
    auth::OptionalAuthUser,
    catalog::movies::StructuredFilters,
    context::AppContext,
    db::models::TitleSummaryRow,
    error::{ApiError, ApiResult},
    pagination::{paginate, PageParams, Paginated},
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build movie search routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/MovieSearch/basic", get(basic_search))
        .route("/api/MovieSearch/structured", get(structured_search))
        .route("/api/MovieSearch/similar/:title_id", get(similar_movies))
}

#[derive(Debug, Deserialize)]
struct BasicSearchQuery {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BasicSearchResponse {
    #[serde(flatten)]
    page: Paginated<TitleSummaryRow>,
    search_query: String,
}

/// Keyword search
async fn basic_search(
    State(ctx): State<AppContext>,
    user: OptionalAuthUser,
    Query(params): Query<BasicSearchQuery>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<BasicSearchResponse>> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("Search query is required".to_string()))?;

    let (total, rows) = ctx
        .movie_search
        .basic_search(query, page, user.user_id())
        .await?;

    Ok(Json(BasicSearchResponse {
        page: paginate(
            "/api/MovieSearch/basic",
            &[("query", query)],
            page,
            total,
            rows,
        ),
        search_query: query.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct StructuredSearchQuery {
    title: Option<String>,
    plot: Option<String>,
    characters: Option<String>,
    person: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredSearchResponse {
    #[serde(flatten)]
    page: Paginated<TitleSummaryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plot_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    characters_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_filter: Option<String>,
}

/// Multi-field search; at least one filter is required
async fn structured_search(
    State(ctx): State<AppContext>,
    user: OptionalAuthUser,
    Query(params): Query<StructuredSearchQuery>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<StructuredSearchResponse>> {
    let filters = StructuredFilters {
        title: params.title,
        plot: params.plot,
        characters: params.characters,
        person: params.person,
    };
    if filters.is_empty() {
        return Err(ApiError::Validation(
            "At least one search parameter is required (title, plot, characters, or person)"
                .to_string(),
        ));
    }

    let (total, rows) = ctx
        .movie_search
        .structured_search(&filters, page, user.user_id())
        .await?;

    let mut extra: Vec<(&str, &str)> = Vec::new();
    for (key, value) in [
        ("title", &filters.title),
        ("plot", &filters.plot),
        ("characters", &filters.characters),
        ("person", &filters.person),
    ] {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            extra.push((key, value));
        }
    }

    Ok(Json(StructuredSearchResponse {
        page: paginate("/api/MovieSearch/structured", &extra, page, total, rows),
        title_filter: filters.title.clone(),
        plot_filter: filters.plot.clone(),
        characters_filter: filters.characters.clone(),
        person_filter: filters.person.clone(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimilarMoviesResponse {
    #[serde(flatten)]
    page: Paginated<TitleSummaryRow>,
    base_title_id: String,
    search_query: String,
}

/// Movies similar to a base title
async fn similar_movies(
    State(ctx): State<AppContext>,
    user: OptionalAuthUser,
    Path(title_id): Path<String>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<SimilarMoviesResponse>> {
    if title_id.trim().is_empty() {
        return Err(ApiError::Validation("Title ID is required".to_string()));
    }

    let (base_title, total, rows) = ctx
        .movie_search
        .similar_movies(&title_id, page, user.user_id())
        .await?;

    let path = format!("/api/MovieSearch/similar/{title_id}");

    Ok(Json(SimilarMoviesResponse {
        page: paginate(&path, &[], page, total, rows),
        base_title_id: title_id,
        search_query: base_title,
    }))
}
