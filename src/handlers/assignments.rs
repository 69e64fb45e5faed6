use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    menu::MenuResolver,
    models::{AssignMenuRequest, MenuAssignment, Module},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// get_module_catalog
///
/// [Admin Route] Every module with every submodule, granted or not. Backs the
/// `asignacion_de_modulos` dashboard view, which offers these as checkboxes.
#[utoipa::path(
    get,
    path = "/api/modulos",
    responses(
        (status = 200, description = "All modules", body = [Module]),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn get_module_catalog(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Module>>, AppError> {
    user.require_admin(&state.config)?;
    let catalog = MenuResolver::new(state.repo.clone()).catalog().await?;
    Ok(Json(catalog))
}

/// get_assignments
///
/// [Admin Route] Raw grants of one role, in insertion order.
/// The `{id}` segment is a role id on GET and an assignment id on DELETE.
#[utoipa::path(
    get,
    path = "/api/asignar-menu/{id}",
    params(("id" = i32, Path, description = "Role ID")),
    responses((status = 200, description = "Grants", body = [MenuAssignment]))
)]
pub async fn get_assignments(
    user: AuthUser,
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
) -> Result<Json<Vec<MenuAssignment>>, AppError> {
    user.require_admin(&state.config)?;
    Ok(Json(state.repo.get_assignments(role_id).await?))
}

/// assign_menu
///
/// [Admin Route] Grants a module (or one of its submodules) to a role.
/// Duplicates, unknown ids and mismatched module/submodule pairs are refused with 409.
#[utoipa::path(
    post,
    path = "/api/asignar-menu",
    request_body = AssignMenuRequest,
    responses(
        (status = 201, description = "Granted", body = MenuAssignment),
        (status = 409, description = "Duplicate or inconsistent grant")
    )
)]
pub async fn assign_menu(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<AssignMenuRequest>,
) -> Result<(StatusCode, Json<MenuAssignment>), AppError> {
    user.require_admin(&state.config)?;
    let assignment = state.repo.assign_menu(payload).await?;
    tracing::info!(
        admin_id = user.id,
        role_id = assignment.role_id,
        module_id = assignment.module_id,
        submodule_id = ?assignment.submodule_id,
        "menu granted"
    );
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// revoke_menu
///
/// [Admin Route] Removes one grant by its id.
#[utoipa::path(
    delete,
    path = "/api/asignar-menu/{id}",
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Revoked"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn revoke_menu(
    user: AuthUser,
    State(state): State<AppState>,
    Path(assignment_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    user.require_admin(&state.config)?;
    if state.repo.revoke_menu(assignment_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("assignment"))
    }
}
