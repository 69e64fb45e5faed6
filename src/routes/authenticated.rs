use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Write access to the movie catalog for any signed-in user. Wrapped by the auth
/// middleware in `create_router`; the handlers also take `AuthUser` themselves.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/me
        // The caller's {id, role_id}.
        .route("/api/me", get(handlers::session::get_me))
        // POST /api/peliculas, PUT/DELETE /api/peliculas/{id}
        .route("/api/peliculas", post(handlers::movies::create_movie))
        .route(
            "/api/peliculas/{id}",
            put(handlers::movies::update_movie).delete(handlers::movies::delete_movie),
        )
        // POST /api/{catalog}, PUT/DELETE /api/{catalog}/{id}
        // Roles and estados additionally demand the admin role inside the handler.
        .route("/api/{catalog}", post(handlers::catalog::create_record))
        .route(
            "/api/{catalog}/{id}",
            put(handlers::catalog::update_record).delete(handlers::catalog::delete_record),
        )
}
