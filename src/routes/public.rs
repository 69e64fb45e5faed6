use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Unauthenticated, read-only endpoints: the role menu the dashboard loads on mount and
/// the movie catalog with its lookup tables.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Banner confirming the API is up.
        .route("/", get(|| async { "MovieFlow API is running" }))
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /api/menu/{role_id}
        // The navigation tree granted to a role.
        .route("/api/menu/{role_id}", get(handlers::menu::get_menu))
        // GET /api/peliculas?category_id=..&classification_id=..&search=..
        .route("/api/peliculas", get(handlers::movies::list_movies))
        .route("/api/peliculas/{id}", get(handlers::movies::get_movie))
        // GET /api/{roles|estados|categorias|clasificaciones}[/{id}]
        // Lookup tables. Static /api routes above take precedence over the catalog segment.
        .route("/api/{catalog}", get(handlers::catalog::list_records))
        .route("/api/{catalog}/{id}", get(handlers::catalog::get_record))
}
