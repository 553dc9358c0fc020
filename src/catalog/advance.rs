/// Advance search: word-frequency and keyword-match lookups backed by the
/// inverted-index functions `person_words`, `exact_match_titles`,
/// `best_match_titles`, and `keyword_word_list`.
use crate::{
    db::models::{BestMatchRow, ExactMatchRow, WordFrequencyRow},
    error::ApiResult,
    pagination::PageParams,
};
use sqlx::PgPool;

pub struct AdvanceSearchManager {
    db: PgPool,
}

impl AdvanceSearchManager {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Most frequent words across the titles an actor appeared in
    pub async fn person_words(
        &self,
        actor_id: &str,
        limit: i64,
    ) -> ApiResult<Vec<WordFrequencyRow>> {
        let rows: Vec<WordFrequencyRow> =
            sqlx::query_as("SELECT word, frequency FROM person_words($1, $2)")
                .bind(actor_id)
                .bind(limit)
                .fetch_all(&self.db)
                .await?;

        Ok(rows)
    }

    /// Titles whose indexed words contain every keyword
    pub async fn exact_match_titles(
        &self,
        keywords: &[String],
        page: PageParams,
    ) -> ApiResult<(i64, Vec<ExactMatchRow>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exact_match_titles($1)")
            .bind(keywords)
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<ExactMatchRow> = sqlx::query_as(
            "SELECT title_id, primary_title
             FROM exact_match_titles($1)
             ORDER BY title_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(keywords)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }

    /// Titles ranked by how many of the keywords they match
    pub async fn best_match_titles(
        &self,
        keywords: &[String],
        page: PageParams,
    ) -> ApiResult<(i64, Vec<BestMatchRow>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM best_match_titles($1)")
            .bind(keywords)
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<BestMatchRow> = sqlx::query_as(
            "SELECT title_id, primary_title, matched_count, matched_words
             FROM best_match_titles($1)
             ORDER BY matched_count DESC, title_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(keywords)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }

    /// Words co-occurring with the given keywords across the index
    pub async fn keyword_word_list(&self, keywords: &[String]) -> ApiResult<Vec<WordFrequencyRow>> {
        let rows: Vec<WordFrequencyRow> =
            sqlx::query_as("SELECT word, frequency FROM keyword_word_list($1)")
                .bind(keywords)
                .fetch_all(&self.db)
                .await?;

        Ok(rows)
    }
}
