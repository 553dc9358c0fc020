/// /api/ActorController endpoints
use crate::{
    context::AppContext,
    db::models::ActorRow,
    error::{ApiError, ApiResult},
    pagination::{paginate, PageParams, Paginated},
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build actor routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/ActorController/search", get(search_actors))
        .route("/api/ActorController/all", get(list_actors))
        .route("/api/ActorController/coplayers/:actor_id", get(co_players))
        .route("/api/ActorController/popular/:title_id", get(popular_actors))
}

#[derive(Debug, Deserialize)]
struct ActorSearchQuery {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActorSearchResponse {
    #[serde(flatten)]
    page: Paginated<ActorRow>,
    search_query: String,
}

/// Fuzzy actor name search
async fn search_actors(
    State(ctx): State<AppContext>,
    Query(params): Query<ActorSearchQuery>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<ActorSearchResponse>> {
    let query = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("Search query is required".to_string()))?;

    let (total, rows) = ctx.actors.search_actors(query, page).await?;

    Ok(Json(ActorSearchResponse {
        page: paginate(
            "/api/ActorController/search",
            &[("query", query)],
            page,
            total,
            rows,
        ),
        search_query: query.to_string(),
    }))
}

/// Paginated listing of all actors, alphabetical
async fn list_actors(
    State(ctx): State<AppContext>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<ActorSearchResponse>> {
    let (total, rows) = ctx.actors.list_actors(page).await?;

    Ok(Json(ActorSearchResponse {
        page: paginate("/api/ActorController/all", &[], page, total, rows),
        search_query: "All Actors".to_string(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoPlayersResponse {
    #[serde(flatten)]
    page: Paginated<ActorRow>,
    actor_id: String,
    search_query: String,
}

/// Actors who appeared alongside a base actor
async fn co_players(
    State(ctx): State<AppContext>,
    Path(actor_id): Path<String>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<CoPlayersResponse>> {
    if actor_id.trim().is_empty() {
        return Err(ApiError::Validation("Actor ID is required".to_string()));
    }

    let (base_name, total, rows) = ctx.actors.co_players(&actor_id, page).await?;
    let path = format!("/api/ActorController/coplayers/{actor_id}");

    Ok(Json(CoPlayersResponse {
        page: paginate(&path, &[], page, total, rows),
        actor_id,
        search_query: base_name,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PopularActorsResponse {
    #[serde(flatten)]
    page: Paginated<ActorRow>,
    title_id: String,
    search_query: String,
}

/// Most popular cast of a title
async fn popular_actors(
    State(ctx): State<AppContext>,
    Path(title_id): Path<String>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<PopularActorsResponse>> {
    if title_id.trim().is_empty() {
        return Err(ApiError::Validation("Title ID is required".to_string()));
    }

    let (title_name, total, rows) = ctx.actors.popular_actors(&title_id, page).await?;
    let path = format!("/api/ActorController/popular/{title_id}");

    Ok(Json(PopularActorsResponse {
        page: paginate(&path, &[], page, total, rows),
        title_id,
        search_query: title_name,
    }))
}
