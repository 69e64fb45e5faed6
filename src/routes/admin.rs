use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Admin Router Module
///
/// User administration and menu assignment. Authentication comes from the middleware
/// layer in `create_router`; the admin role check runs inside each handler against
/// `AppConfig::admin_role_id`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /api/usuarios
        .route(
            "/api/usuarios",
            get(handlers::users::list_users).post(handlers::users::register_user),
        )
        // GET/PUT/DELETE /api/usuarios/{id}
        .route(
            "/api/usuarios/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        // GET /api/modulos
        // Every module and submodule, for the assignment screen.
        .route("/api/modulos", get(handlers::assignments::get_module_catalog))
        // POST /api/asignar-menu
        .route("/api/asignar-menu", post(handlers::assignments::assign_menu))
        // GET /api/asignar-menu/{role_id}, DELETE /api/asignar-menu/{assignment_id}
        .route(
            "/api/asignar-menu/{id}",
            get(handlers::assignments::get_assignments)
                .delete(handlers::assignments::revoke_menu),
        )
}
