/// Movie search: keyword search, structured multi-field search, and
/// similar-movie lookup. Ranking comes entirely from the database
/// functions `search_titles`, `structured_string_search`, and
/// `similar_movies`; this manager assembles parameters and paginates.
use crate::{
    db::models::TitleSummaryRow,
    error::{ApiError, ApiResult},
    pagination::PageParams,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Structured search filters. Blank filters are passed to the database
/// function as NULL.
#[derive(Debug, Clone, Default)]
pub struct StructuredFilters {
    pub title: Option<String>,
    pub plot: Option<String>,
    pub characters: Option<String>,
    pub person: Option<String>,
}

impl StructuredFilters {
    fn normalized(&self) -> Self {
        fn opt(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }
        Self {
            title: opt(&self.title),
            plot: opt(&self.plot),
            characters: opt(&self.characters),
            person: opt(&self.person),
        }
    }

    pub fn is_empty(&self) -> bool {
        let n = self.normalized();
        n.title.is_none() && n.plot.is_none() && n.characters.is_none() && n.person.is_none()
    }
}

const PAGE_COLUMNS: &str = "t.title_id,
                    t.primary_title,
                    t.title_type,
                    t.genres,
                    COALESCE(tr.average_rating, 0) AS average_rating,
                    COALESCE(tr.num_votes, 0) AS num_votes,
                    ub.bookmark_id,
                    ur.rating AS user_rating";

pub struct MovieSearchManager {
    db: PgPool,
}

impl MovieSearchManager {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Keyword search over `search_titles`
    pub async fn basic_search(
        &self,
        query: &str,
        page: PageParams,
        user_id: Option<Uuid>,
    ) -> ApiResult<(i64, Vec<TitleSummaryRow>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM search_titles($1)")
            .bind(query)
            .fetch_one(&self.db)
            .await?;

        let sql = format!(
            "SELECT {PAGE_COLUMNS}
             FROM search_titles($1) st
             INNER JOIN titles t ON t.title_id = st.title_id
             LEFT JOIN title_ratings tr ON tr.title_id = t.title_id
             LEFT JOIN user_bookmarks ub ON ub.title_id = t.title_id AND ub.user_id = $2
             LEFT JOIN user_rating_history ur ON ur.title_id = t.title_id AND ur.user_id = $2
             ORDER BY average_rating DESC, t.title_id ASC
             LIMIT $3 OFFSET $4"
        );
        let rows: Vec<TitleSummaryRow> = sqlx::query_as(&sql)
            .bind(query)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.db)
            .await?;

        Ok((total, rows))
    }

    /// Multi-field search over `structured_string_search`
    pub async fn structured_search(
        &self,
        filters: &StructuredFilters,
        page: PageParams,
        user_id: Option<Uuid>,
    ) -> ApiResult<(i64, Vec<TitleSummaryRow>)> {
        let filters = filters.normalized();

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM structured_string_search($1, $2, $3, $4)")
                .bind(&filters.title)
                .bind(&filters.plot)
                .bind(&filters.characters)
                .bind(&filters.person)
                .fetch_one(&self.db)
                .await?;

        let sql = format!(
            "SELECT {PAGE_COLUMNS}
             FROM structured_string_search($1, $2, $3, $4) sss
             INNER JOIN titles t ON t.title_id = sss.title_id
             LEFT JOIN title_ratings tr ON tr.title_id = t.title_id
             LEFT JOIN user_bookmarks ub ON ub.title_id = t.title_id AND ub.user_id = $5
             LEFT JOIN user_rating_history ur ON ur.title_id = t.title_id AND ur.user_id = $5
             ORDER BY average_rating DESC, t.title_id ASC
             LIMIT $6 OFFSET $7"
        );
        let rows: Vec<TitleSummaryRow> = sqlx::query_as(&sql)
            .bind(&filters.title)
            .bind(&filters.plot)
            .bind(&filters.characters)
            .bind(&filters.person)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.db)
            .await?;

        Ok((total, rows))
    }

    /// Similar movies for a base title. Returns the base title's name for
    /// the response header alongside the page.
    pub async fn similar_movies(
        &self,
        title_id: &str,
        page: PageParams,
        user_id: Option<Uuid>,
    ) -> ApiResult<(String, i64, Vec<TitleSummaryRow>)> {
        let base_title: String = sqlx::query_scalar(
            "SELECT COALESCE(primary_title, '') FROM titles WHERE title_id = $1",
        )
        .bind(title_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Title not found".to_string()))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM similar_movies($1)")
            .bind(title_id)
            .fetch_one(&self.db)
            .await?;

        let sql = format!(
            "SELECT {PAGE_COLUMNS}
             FROM similar_movies($1) sm
             INNER JOIN titles t ON t.title_id = sm.title_id
             LEFT JOIN title_ratings tr ON tr.title_id = t.title_id
             LEFT JOIN user_bookmarks ub ON ub.title_id = t.title_id AND ub.user_id = $2
             LEFT JOIN user_rating_history ur ON ur.title_id = t.title_id AND ur.user_id = $2
             ORDER BY average_rating DESC, t.title_id ASC
             LIMIT $3 OFFSET $4"
        );
        let rows: Vec<TitleSummaryRow> = sqlx::query_as(&sql)
            .bind(title_id)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.db)
            .await?;

        Ok((base_title, total, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_normalize_to_none() {
        let filters = StructuredFilters {
            title: Some("  ".to_string()),
            plot: Some("heist".to_string()),
            characters: None,
            person: Some("".to_string()),
        };
        let n = filters.normalized();
        assert!(n.title.is_none());
        assert_eq!(n.plot.as_deref(), Some("heist"));
        assert!(n.person.is_none());
        assert!(!filters.is_empty());
    }

    #[test]
    fn all_blank_filters_are_empty() {
        let filters = StructuredFilters {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(filters.is_empty());
    }
}
