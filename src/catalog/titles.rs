/// Title listing
use crate::{
    db::models::TitleSummaryRow,
    error::ApiResult,
    pagination::PageParams,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct TitleManager {
    db: PgPool,
}

impl TitleManager {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Paginated title listing ordered by average rating. A caller id adds
    /// the per-user bookmark/rating overlay; the NULL bind makes both user
    /// joins match nothing for anonymous requests.
    pub async fn list_titles(
        &self,
        page: PageParams,
        user_id: Option<Uuid>,
    ) -> ApiResult<(i64, Vec<TitleSummaryRow>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM titles")
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<TitleSummaryRow> = sqlx::query_as(
            "SELECT t.title_id,
                    t.primary_title,
                    t.title_type,
                    t.genres,
                    COALESCE(tr.average_rating, 0) AS average_rating,
                    COALESCE(tr.num_votes, 0) AS num_votes,
                    ub.bookmark_id,
                    ur.rating AS user_rating
             FROM titles t
             LEFT JOIN title_ratings tr ON tr.title_id = t.title_id
             LEFT JOIN user_bookmarks ub ON ub.title_id = t.title_id AND ub.user_id = $1
             LEFT JOIN user_rating_history ur ON ur.title_id = t.title_id AND ur.user_id = $1
             ORDER BY average_rating DESC, t.title_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }
}
