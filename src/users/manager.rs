/// User manager: signup/signin, bookmarks, and rating history
///
/// Rating mutations pair the local row write with the database's
/// `update_title_rating` procedure inside one transaction, so a recompute
/// failure rolls the write back instead of leaving the aggregate stale.
use crate::{
    auth,
    config::ServerConfig,
    db::models::{BookmarkRow, RatingRow, UserRow},
    error::{ApiError, ApiResult},
    pagination::PageParams,
    users::{AddBookmarkRequest, AddRatingRequest, SigninRequest, SignupRequest, UserResponse},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserManager {
    db: PgPool,
    config: Arc<ServerConfig>,
}

impl UserManager {
    pub fn new(db: PgPool, config: Arc<ServerConfig>) -> Self {
        Self { db, config }
    }

    /// Register a new user. Fails on duplicate email or username without
    /// touching the user table.
    pub async fn signup(&self, req: SignupRequest) -> ApiResult<UserResponse> {
        let username = req.username.trim();
        let email = req.email.trim();

        if username.is_empty() {
            return Err(ApiError::Validation("Username is required".to_string()));
        }
        if email.is_empty() {
            return Err(ApiError::Validation("Email is required".to_string()));
        }
        if req.password.trim().is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }

        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1 OR username = $2")
                .bind(email)
                .bind(username)
                .fetch_optional(&self.db)
                .await?;

        if existing.is_some() {
            return Err(ApiError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let digest = auth::hash_password(&req.password)?;

        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (user_id, username, email, password_hash, is_active, created_at)
             VALUES ($1, $2, $3, $4, TRUE, $5)
             RETURNING user_id, username, email, password_hash, is_active, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(&digest)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        tracing::info!("signup: created user {}", row.user_id);

        Ok(UserResponse::from(&row))
    }

    /// Verify credentials and issue a bearer token. Unknown email and
    /// wrong password produce the same error.
    pub async fn signin(&self, req: SigninRequest) -> ApiResult<(UserResponse, String)> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let user: UserRow = sqlx::query_as(
            "SELECT user_id, username, email, password_hash, is_active, created_at
             FROM users WHERE email = $1",
        )
        .bind(req.email.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

        if !user.is_active {
            return Err(ApiError::Validation("Account is not active".to_string()));
        }

        if !auth::verify_password(&req.password, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        let token = auth::issue_token(
            user.user_id,
            &user.username,
            &user.email,
            &self.config.authentication,
        )?;

        Ok((UserResponse::from(&user), token))
    }

    /// Delete a user. Returns false when no such user exists.
    pub async fn delete_user(&self, user_id: Uuid) -> ApiResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Paginated bookmarks, newest first, joined with the title name
    pub async fn bookmarks(
        &self,
        user_id: Uuid,
        page: PageParams,
    ) -> ApiResult<(i64, Vec<BookmarkRow>)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_bookmarks WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        let rows: Vec<BookmarkRow> = sqlx::query_as(
            "SELECT ub.bookmark_id,
                    ub.title_id,
                    COALESCE(t.primary_title, '') AS title_name,
                    ub.bookmarked_at
             FROM user_bookmarks ub
             INNER JOIN titles t ON t.title_id = ub.title_id
             WHERE ub.user_id = $1
             ORDER BY ub.bookmarked_at DESC, ub.title_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }

    /// Add a bookmark. At most one bookmark per (user, title).
    pub async fn add_bookmark(
        &self,
        user_id: Uuid,
        req: AddBookmarkRequest,
    ) -> ApiResult<BookmarkRow> {
        let title_id = req.title_id.trim();
        if title_id.is_empty() {
            return Err(ApiError::Validation("Title ID is required".to_string()));
        }

        let title_name = self.resolve_title_name(title_id).await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT bookmark_id FROM user_bookmarks WHERE user_id = $1 AND title_id = $2",
        )
        .bind(user_id)
        .bind(title_id)
        .fetch_optional(&self.db)
        .await?;

        if existing.is_some() {
            return Err(ApiError::Conflict(
                "Bookmark already exists for this title".to_string(),
            ));
        }

        let (bookmark_id, bookmarked_at): (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO user_bookmarks (user_id, title_id, bookmarked_at)
             VALUES ($1, $2, $3)
             RETURNING bookmark_id, bookmarked_at",
        )
        .bind(user_id)
        .bind(title_id)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(BookmarkRow {
            bookmark_id,
            title_id: title_id.to_string(),
            title_name,
            bookmarked_at,
        })
    }

    /// Remove a bookmark. Returns false when no matching row exists.
    pub async fn remove_bookmark(&self, user_id: Uuid, title_id: &str) -> ApiResult<bool> {
        let result =
            sqlx::query("DELETE FROM user_bookmarks WHERE user_id = $1 AND title_id = $2")
                .bind(user_id)
                .bind(title_id)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Paginated rating history, newest first, joined with the title name
    pub async fn ratings(
        &self,
        user_id: Uuid,
        page: PageParams,
    ) -> ApiResult<(i64, Vec<RatingRow>)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_rating_history WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        let rows: Vec<RatingRow> = sqlx::query_as(
            "SELECT ur.rating_history_id,
                    ur.title_id,
                    COALESCE(t.primary_title, '') AS title_name,
                    ur.rating,
                    ur.rated_at
             FROM user_rating_history ur
             INNER JOIN titles t ON t.title_id = ur.title_id
             WHERE ur.user_id = $1
             ORDER BY ur.rated_at DESC, ur.title_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }

    /// Add or update a rating. An existing (user, title) row is updated in
    /// place with the old value preserved in previous_rating; a fresh row
    /// starts with previous_rating equal to the rating. Either way the
    /// title aggregate is recomputed in the same transaction.
    pub async fn add_or_update_rating(
        &self,
        user_id: Uuid,
        req: AddRatingRequest,
    ) -> ApiResult<RatingRow> {
        let title_id = req.title_id.trim();
        if title_id.is_empty() {
            return Err(ApiError::Validation("Title ID is required".to_string()));
        }
        if !(1..=10).contains(&req.rating) {
            return Err(ApiError::Validation(
                "Rating must be between 1 and 10".to_string(),
            ));
        }

        let title_name = self.resolve_title_name(title_id).await?;

        let mut tx = self.db.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT rating_history_id FROM user_rating_history
             WHERE user_id = $1 AND title_id = $2
             FOR UPDATE",
        )
        .bind(user_id)
        .bind(title_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (rating_history_id, rating, rated_at): (i64, i16, DateTime<Utc>) =
            match existing {
                Some(id) => {
                    let row = sqlx::query_as(
                        "UPDATE user_rating_history
                         SET previous_rating = rating, rating = $1, rated_at = $2
                         WHERE rating_history_id = $3
                         RETURNING rating_history_id, rating, rated_at",
                    )
                    .bind(req.rating)
                    .bind(Utc::now())
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;

                    sqlx::query("CALL update_title_rating($1, $2, 'update')")
                        .bind(title_id)
                        .bind(user_id)
                        .execute(&mut *tx)
                        .await?;

                    row
                }
                None => {
                    let row = sqlx::query_as(
                        "INSERT INTO user_rating_history
                             (user_id, title_id, rating, previous_rating, rated_at)
                         VALUES ($1, $2, $3, $3, $4)
                         RETURNING rating_history_id, rating, rated_at",
                    )
                    .bind(user_id)
                    .bind(title_id)
                    .bind(req.rating)
                    .bind(Utc::now())
                    .fetch_one(&mut *tx)
                    .await?;

                    sqlx::query("CALL update_title_rating($1, $2, 'add')")
                        .bind(title_id)
                        .bind(user_id)
                        .execute(&mut *tx)
                        .await?;

                    row
                }
            };

        tx.commit().await?;

        Ok(RatingRow {
            rating_history_id,
            title_id: title_id.to_string(),
            title_name,
            rating,
            rated_at,
        })
    }

    /// Remove a rating. The recompute runs before the delete, inside the
    /// same transaction: the procedure must still see the row it excludes.
    /// Returns false without any write when no rating exists.
    pub async fn remove_rating(&self, user_id: Uuid, title_id: &str) -> ApiResult<bool> {
        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT rating_history_id FROM user_rating_history
             WHERE user_id = $1 AND title_id = $2",
        )
        .bind(user_id)
        .bind(title_id)
        .fetch_optional(&self.db)
        .await?;

        if existing.is_none() {
            return Ok(false);
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("CALL update_title_rating($1, $2, 'remove')")
            .bind(title_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM user_rating_history WHERE user_id = $1 AND title_id = $2")
            .bind(user_id)
            .bind(title_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn resolve_title_name(&self, title_id: &str) -> ApiResult<String> {
        sqlx::query_scalar("SELECT COALESCE(primary_title, '') FROM titles WHERE title_id = $1")
            .bind(title_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Title not found".to_string()))
    }
}
