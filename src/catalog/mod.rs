/// Catalog services: titles, movie search, actors, and advance search.
///
/// Every search operation delegates ranking to a database function and
/// only joins the returned identifier set against the entity tables.
pub mod actors;
pub mod advance;
pub mod movies;
pub mod titles;
