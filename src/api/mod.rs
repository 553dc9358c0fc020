/// API routes and handlers
pub mod actors;
pub mod advance;
pub mod dropdown;
pub mod middleware;
pub mod movies;
pub mod titles;
pub mod users;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(users::routes())
        .merge(titles::routes())
        .merge(movies::routes())
        .merge(actors::routes())
        .merge(advance::routes())
        .merge(dropdown::routes())
}
