/// Application context and dependency injection
use crate::{
    catalog::{
        actors::ActorManager, advance::AdvanceSearchManager, movies::MovieSearchManager,
        titles::TitleManager,
    },
    config::ServerConfig,
    db,
    error::ApiResult,
    users::UserManager,
};
use sqlx::PgPool;
use std::sync::Arc;

/// Application context holding configuration and the shared managers
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: PgPool,
    pub users: Arc<UserManager>,
    pub titles: Arc<TitleManager>,
    pub movie_search: Arc<MovieSearchManager>,
    pub actors: Arc<ActorManager>,
    pub advance_search: Arc<AdvanceSearchManager>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        let db = db::create_pool(&config.database).await?;
        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        Ok(Self::with_pool(config, db))
    }

    /// Build a context around an existing pool. Tests use this with a
    /// lazily-connected pool so no live database is required.
    pub fn with_pool(config: ServerConfig, db: PgPool) -> Self {
        let config = Arc::new(config);

        AppContext {
            users: Arc::new(UserManager::new(db.clone(), Arc::clone(&config))),
            titles: Arc::new(TitleManager::new(db.clone())),
            movie_search: Arc::new(MovieSearchManager::new(db.clone())),
            actors: Arc::new(ActorManager::new(db.clone())),
            advance_search: Arc::new(AdvanceSearchManager::new(db.clone())),
            config,
            db,
        }
    }
}
