use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Server side: configuration, persistence, menu resolution and the HTTP surface.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod menu;
pub mod models;
pub mod repository;
pub mod routes;

// Client side: the navigation dashboard that consumes GET /api/menu/{role_id}.
pub mod dashboard;

use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, DataAccessError};
pub use menu::MenuResolver;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document aggregated from the `#[utoipa::path]` handlers and `ToSchema` models,
/// served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::menu::get_menu,
        handlers::session::get_me,
        handlers::catalog::list_records, handlers::catalog::get_record,
        handlers::catalog::create_record, handlers::catalog::update_record,
        handlers::catalog::delete_record,
        handlers::users::list_users, handlers::users::get_user, handlers::users::register_user,
        handlers::users::update_user, handlers::users::delete_user,
        handlers::movies::list_movies, handlers::movies::get_movie,
        handlers::movies::create_movie, handlers::movies::update_movie,
        handlers::movies::delete_movie,
        handlers::assignments::get_module_catalog, handlers::assignments::get_assignments,
        handlers::assignments::assign_menu, handlers::assignments::revoke_menu
    ),
    components(
        schemas(
            models::Module, models::Submodule, models::MenuAssignment, models::AssignMenuRequest,
            models::CatalogRecord, models::CatalogRecordRequest, models::UpdateCatalogRecordRequest,
            models::User, models::CreateUserRequest, models::UpdateUserRequest, models::SessionUser,
            models::Movie, models::CreateMovieRequest, models::UpdateMovieRequest,
        )
    ),
    tags(
        (name = "movieflow", description = "MovieFlow catalog administration API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Persistence behind a trait object (Postgres in production, memory in tests).
    pub repo: RepositoryState,
    /// Immutable configuration loaded at startup.
    pub config: AppConfig,
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Runs the `AuthUser` extractor before the handler; a failed extraction rejects the request
/// (401/500) and the handler never runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the route groups, the auth layer, request correlation, tracing and CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let protected = authenticated::authenticated_routes()
        .merge(admin::admin_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(protected)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span so every log line of a request carries its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
