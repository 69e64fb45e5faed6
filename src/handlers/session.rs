use crate::{auth::AuthUser, models::SessionUser};
use axum::Json;

/// get_me
///
/// [Authenticated Route] Echoes the identity resolved from the request credentials.
/// The dashboard uses it to learn which role's menu to fetch.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current session", body = SessionUser),
        (status = 401, description = "Missing or invalid credentials")
    )
)]
pub async fn get_me(user: AuthUser) -> Json<SessionUser> {
    Json(user.into())
}
