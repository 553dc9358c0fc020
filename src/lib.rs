/// Cinegraph - IMDB-style movie and actor catalog REST API
///
/// Search, browsing, bookmarking, and rating over a PostgreSQL catalog.
/// Ranking and matching live in database functions; this service is the
/// token-authenticated HTTP layer over them.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod jobs;
pub mod pagination;
pub mod server;
pub mod users;
