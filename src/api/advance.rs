/// /api/AdvanceSearch endpoints
use crate::{
    context::AppContext,
    db::models::{BestMatchRow, ExactMatchRow},
    error::{ApiError, ApiResult},
    pagination::{paginate, PageParams, Paginated},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

/// Build advance search routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/AdvanceSearch/person-words/:actor_id", get(person_words))
        .route(
            "/api/AdvanceSearch/exact-match-titles",
            post(exact_match_titles),
        )
        .route(
            "/api/AdvanceSearch/best-match-titles",
            post(best_match_titles),
        )
        .route(
            "/api/AdvanceSearch/keyword-word-list",
            post(keyword_word_list),
        )
}

const DEFAULT_WORD_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
struct PersonWordsQuery {
    limit: Option<i64>,
}

/// Most frequent words across an actor's titles
async fn person_words(
    State(ctx): State<AppContext>,
    Path(actor_id): Path<String>,
    Query(params): Query<PersonWordsQuery>,
) -> ApiResult<impl IntoResponse> {
    if actor_id.trim().is_empty() {
        return Err(ApiError::Validation("Actor ID is required".to_string()));
    }

    let limit = params.limit.unwrap_or(DEFAULT_WORD_LIMIT).max(1);
    let data = ctx.advance_search.person_words(&actor_id, limit).await?;

    Ok(Json(json!({
        "actorId": actor_id,
        "limit": limit,
        "data": data
    })))
}

/// Keyword match request body for the exact/best match endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchSearchRequest {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(flatten)]
    page: PageParams,
}

impl MatchSearchRequest {
    fn keywords(&self) -> ApiResult<Vec<String>> {
        let keywords: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(ApiError::Validation(
                "Keywords array is required".to_string(),
            ));
        }
        Ok(keywords)
    }
}

/// Titles whose indexed words contain every keyword
async fn exact_match_titles(
    State(ctx): State<AppContext>,
    Json(req): Json<MatchSearchRequest>,
) -> ApiResult<Json<Paginated<ExactMatchRow>>> {
    let keywords = req.keywords()?;
    let (total, rows) = ctx
        .advance_search
        .exact_match_titles(&keywords, req.page)
        .await?;

    Ok(Json(paginate(
        "/api/AdvanceSearch/exact-match-titles",
        &[],
        req.page,
        total,
        rows,
    )))
}

/// Titles ranked by how many keywords they match
async fn best_match_titles(
    State(ctx): State<AppContext>,
    Json(req): Json<MatchSearchRequest>,
) -> ApiResult<Json<Paginated<BestMatchRow>>> {
    let keywords = req.keywords()?;
    let (total, rows) = ctx
        .advance_search
        .best_match_titles(&keywords, req.page)
        .await?;

    Ok(Json(paginate(
        "/api/AdvanceSearch/best-match-titles",
        &[],
        req.page,
        total,
        rows,
    )))
}

/// Words co-occurring with the given keywords. The body is a bare JSON
/// string array.
async fn keyword_word_list(
    State(ctx): State<AppContext>,
    Json(keywords): Json<Vec<String>>,
) -> ApiResult<impl IntoResponse> {
    if keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(ApiError::Validation(
            "Keywords array is required".to_string(),
        ));
    }

    let data = ctx.advance_search.keyword_word_list(&keywords).await?;

    Ok(Json(json!({
        "keywords": keywords,
        "data": data
    })))
}
