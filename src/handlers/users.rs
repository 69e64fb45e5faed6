use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    models::{CreateUserRequest, UpdateUserRequest, User},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// Every /api/usuarios route is admin-only.

/// list_users
///
/// [Admin Route] Lists every registered user.
#[utoipa::path(
    get,
    path = "/api/usuarios",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    user.require_admin(&state.config)?;
    Ok(Json(state.repo.list_users().await?))
}

/// get_user
///
/// [Admin Route]
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Found", body = User),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<User>, AppError> {
    user.require_admin(&state.config)?;
    state
        .repo
        .get_user(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("user"))
}

/// register_user
///
/// [Admin Route] Backs the `registrar_usuarios` dashboard view. The role (and optional
/// estado) must exist; emails are unique case-insensitively.
#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Registered", body = User),
        (status = 400, description = "Invalid name or email"),
        (status = 409, description = "Duplicate email or unknown role")
    )
)]
pub async fn register_user(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    user.require_admin(&state.config)?;
    payload.validate().map_err(AppError::BadRequest)?;

    let created = state.repo.create_user(payload).await?;
    tracing::info!(
        admin_id = user.id,
        user_id = created.id,
        role_id = created.role_id,
        "user registered"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// update_user
///
/// [Admin Route] Partial update.
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = User),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    user.require_admin(&state.config)?;
    payload.validate().map_err(AppError::BadRequest)?;

    state
        .repo
        .update_user(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("user"))
}

/// delete_user
///
/// [Admin Route] An administrator cannot delete their own account.
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Self-deletion"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    user.require_admin(&state.config)?;
    if id == user.id {
        return Err(AppError::BadRequest(
            "administrators cannot delete their own account".to_string(),
        ));
    }

    if state.repo.delete_user(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("user"))
    }
}
