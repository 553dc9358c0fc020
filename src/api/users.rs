/// /api/User endpoints: signup, signin, account deletion, bookmarks, ratings
use crate::{
    auth::AuthUser,
    context::AppContext,
    db::models::{BookmarkRow, RatingRow},
    error::{ApiError, ApiResult},
    pagination::{paginate, PageParams, Paginated},
    users::{AddBookmarkRequest, AddRatingRequest, AuthResponse, SigninRequest, SignupRequest},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

/// Build user routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/User/signup", post(signup))
        .route("/api/User/signin", post(signin))
        .route("/api/User/:user_id", delete(delete_user))
        .route(
            "/api/User/:user_id/bookmarks",
            get(list_bookmarks).post(add_bookmark),
        )
        .route(
            "/api/User/:user_id/bookmarks/:title_id",
            delete(remove_bookmark),
        )
        .route(
            "/api/User/:user_id/ratings",
            get(list_ratings).post(add_or_update_rating),
        )
        .route(
            "/api/User/:user_id/ratings/:title_id",
            delete(remove_rating),
        )
}

/// Register a new user
async fn signup(
    State(ctx): State<AppContext>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = ctx.users.signup(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user
        })),
    ))
}

/// Verify credentials and issue a bearer token
async fn signin(
    State(ctx): State<AppContext>,
    Json(req): Json<SigninRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = ctx.users.signin(req).await?;

    Ok(Json(json!({
        "message": "Sign in successful",
        "data": AuthResponse { user, token }
    })))
}

/// Delete the authenticated user's account
async fn delete_user(
    State(ctx): State<AppContext>,
    Path(user_id): Path<Uuid>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    auth.require_user(user_id)?;

    if !ctx.users.delete_user(user_id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Paginated bookmark listing, newest first
async fn list_bookmarks(
    State(ctx): State<AppContext>,
    Path(user_id): Path<Uuid>,
    auth: AuthUser,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paginated<BookmarkRow>>> {
    auth.require_user(user_id)?;

    let (total, rows) = ctx.users.bookmarks(user_id, page).await?;
    let path = format!("/api/User/{user_id}/bookmarks");

    Ok(Json(paginate(&path, &[], page, total, rows)))
}

/// Add a bookmark for a title
async fn add_bookmark(
    State(ctx): State<AppContext>,
    Path(user_id): Path<Uuid>,
    auth: AuthUser,
    Json(req): Json<AddBookmarkRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_user(user_id)?;

    let bookmark = ctx.users.add_bookmark(user_id, req).await?;

    Ok(Json(json!({
        "message": "Bookmark added successfully",
        "data": bookmark
    })))
}

/// Remove a bookmark
async fn remove_bookmark(
    State(ctx): State<AppContext>,
    Path((user_id, title_id)): Path<(Uuid, String)>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    auth.require_user(user_id)?;

    if !ctx.users.remove_bookmark(user_id, &title_id).await? {
        return Err(ApiError::NotFound(
            "Bookmark not found or already removed".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Bookmark removed successfully" })))
}

/// Paginated rating history, newest first
async fn list_ratings(
    State(ctx): State<AppContext>,
    Path(user_id): Path<Uuid>,
    auth: AuthUser,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<Paginated<RatingRow>>> {
    auth.require_user(user_id)?;

    let (total, rows) = ctx.users.ratings(user_id, page).await?;
    let path = format!("/api/User/{user_id}/ratings");

    Ok(Json(paginate(&path, &[], page, total, rows)))
}

/// Add a rating, or update the existing one for the same title
async fn add_or_update_rating(
    State(ctx): State<AppContext>,
    Path(user_id): Path<Uuid>,
    auth: AuthUser,
    Json(req): Json<AddRatingRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_user(user_id)?;

    let rating = ctx.users.add_or_update_rating(user_id, req).await?;

    Ok(Json(json!({
        "message": "Rating saved successfully",
        "data": rating
    })))
}

/// Remove a rating
async fn remove_rating(
    State(ctx): State<AppContext>,
    Path((user_id, title_id)): Path<(Uuid, String)>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    auth.require_user(user_id)?;

    if !ctx.users.remove_rating(user_id, &title_id).await? {
        return Err(ApiError::NotFound(
            "Rating not found or already removed".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Rating removed successfully" })))
}
