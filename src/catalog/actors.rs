/// Actor search, co-player and popular-actor lookups, and listings.
///
/// Fuzzy name matching and the graph-style lookups are the database's
/// `search_names`, `co_players`, and `popular_actors` functions. The
/// weighted-rating refresh that the listing used to trigger per page view
/// now runs from the background job (see `jobs`).
use crate::{
    db::models::{ActorDropdownRow, ActorRow},
    error::{ApiError, ApiResult},
    pagination::PageParams,
};
use sqlx::PgPool;

pub struct ActorManager {
    db: PgPool,
}

impl ActorManager {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fuzzy actor search over `search_names`
    pub async fn search_actors(
        &self,
        query: &str,
        page: PageParams,
    ) -> ApiResult<(i64, Vec<ActorRow>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM search_names($1)")
            .bind(query)
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<ActorRow> = sqlx::query_as(
            "SELECT a.name_id,
                    a.primary_name,
                    a.birth_year,
                    a.death_year,
                    a.primary_profession,
                    COALESCE(ar.weighted_rating, 0) AS weighted_rating,
                    COALESCE(ar.total_votes, 0) AS total_votes,
                    NULL::integer AS frequency
             FROM search_names($1) sn
             INNER JOIN actors a ON a.name_id = sn.name_id
             LEFT JOIN actors_ratings ar ON ar.name_id = a.name_id
             ORDER BY weighted_rating DESC, a.primary_name ASC, a.name_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(query)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }

    /// Actors who appeared alongside a base actor, most frequent first.
    /// Returns the base actor's name for the response header.
    pub async fn co_players(
        &self,
        actor_id: &str,
        page: PageParams,
    ) -> ApiResult<(String, i64, Vec<ActorRow>)> {
        let base_name = self.resolve_actor_name(actor_id).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM co_players($1)")
            .bind(actor_id)
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<ActorRow> = sqlx::query_as(
            "SELECT a.name_id,
                    a.primary_name,
                    a.birth_year,
                    a.death_year,
                    a.primary_profession,
                    COALESCE(ar.weighted_rating, 0) AS weighted_rating,
                    COALESCE(ar.total_votes, 0) AS total_votes,
                    cp.frequency
             FROM co_players($1) cp
             INNER JOIN actors a ON a.name_id = cp.name_id
             LEFT JOIN actors_ratings ar ON ar.name_id = a.name_id
             ORDER BY cp.frequency DESC, ar.weighted_rating DESC NULLS LAST, a.name_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(actor_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((base_name, total, rows))
    }

    /// Most popular cast of a title. Returns the title's name for the
    /// response header.
    pub async fn popular_actors(
        &self,
        title_id: &str,
        page: PageParams,
    ) -> ApiResult<(String, i64, Vec<ActorRow>)> {
        let title_name: String = sqlx::query_scalar(
            "SELECT COALESCE(primary_title, '') FROM titles WHERE title_id = $1",
        )
        .bind(title_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Title not found".to_string()))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM popular_actors($1)")
            .bind(title_id)
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<ActorRow> = sqlx::query_as(
            "SELECT a.name_id,
                    a.primary_name,
                    a.birth_year,
                    a.death_year,
                    a.primary_profession,
                    COALESCE(pa.weighted_rating, 0) AS weighted_rating,
                    COALESCE(ar.total_votes, 0) AS total_votes,
                    NULL::integer AS frequency
             FROM popular_actors($1) pa
             INNER JOIN actors a ON a.name_id = pa.name_id
             LEFT JOIN actors_ratings ar ON ar.name_id = a.name_id
             ORDER BY pa.weighted_rating DESC NULLS LAST, a.primary_name ASC, a.name_id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(title_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((title_name, total, rows))
    }

    /// Plain paginated actor listing, alphabetical
    pub async fn list_actors(&self, page: PageParams) -> ApiResult<(i64, Vec<ActorRow>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM actors")
            .fetch_one(&self.db)
            .await?;

        let rows: Vec<ActorRow> = sqlx::query_as(
            "SELECT a.name_id,
                    a.primary_name,
                    a.birth_year,
                    a.death_year,
                    a.primary_profession,
                    COALESCE(ar.weighted_rating, 0) AS weighted_rating,
                    COALESCE(ar.total_votes, 0) AS total_votes,
                    NULL::integer AS frequency
             FROM actors a
             LEFT JOIN actors_ratings ar ON ar.name_id = a.name_id
             ORDER BY a.primary_name ASC, a.name_id ASC
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        Ok((total, rows))
    }

    /// Flat actor list for UI select widgets
    pub async fn actor_dropdown(&self) -> ApiResult<Vec<ActorDropdownRow>> {
        let rows: Vec<ActorDropdownRow> = sqlx::query_as(
            "SELECT name_id, primary_name
             FROM actors
             ORDER BY primary_name ASC, name_id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Refresh weighted ratings for one batch of actors. Used by the
    /// background job; returns how many actors were touched.
    pub async fn refresh_ratings_batch(&self, limit: i64, offset: i64) -> ApiResult<usize> {
        let ids: Vec<String> =
            sqlx::query_scalar("SELECT name_id FROM actors ORDER BY name_id ASC LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.db)
                .await?;

        for name_id in &ids {
            sqlx::query("SELECT update_actor_ratings($1)")
                .bind(name_id)
                .execute(&self.db)
                .await?;
        }

        Ok(ids.len())
    }

    async fn resolve_actor_name(&self, actor_id: &str) -> ApiResult<String> {
        sqlx::query_scalar("SELECT COALESCE(primary_name, '') FROM actors WHERE name_id = $1")
            .bind(actor_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Actor not found".to_string()))
    }
}
