/// /api/DropDownList endpoints
use crate::{context::AppContext, db::models::ActorDropdownRow, error::ApiResult};
use axum::{extract::State, routing::get, Json, Router};

/// Build dropdown routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/DropDownList/actorList", get(actor_list))
}

/// Flat actor list for UI select widgets
async fn actor_list(State(ctx): State<AppContext>) -> ApiResult<Json<Vec<ActorDropdownRow>>> {
    let actors = ctx.actors.actor_dropdown().await?;
    Ok(Json(actors))
}
