/// /api/Title endpoints
use crate::{
    auth::OptionalAuthUser,
    context::AppContext,
    db::models::TitleSummaryRow,
    error::ApiResult,
    pagination::{paginate, PageParams, Paginated},
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

/// Build title routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/Title", get(list_titles))
}

/// Paginated title listing. A bearer token adds the caller's bookmark and
/// rating to each row.
async fn list_titles(
    State(ctx): State<AppContext>,
    user: OptionalAuthUser,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paginated<TitleSummaryRow>>> {
    let (total, rows) = ctx.titles.list_titles(page, user.user_id()).await?;

    Ok(Json(paginate("/api/Title", &[], page, total, rows)))
}
