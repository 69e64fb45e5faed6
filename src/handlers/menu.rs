use crate::{AppState, error::AppError, menu::MenuResolver, models::Module};
use axum::{
    Json,
    extract::{Path, State},
};

/// get_menu
///
/// [Public Route] Returns the full navigation tree granted to `role_id`.
/// No pagination or filtering: the dashboard always renders the whole tree.
/// A role without assignments gets `[]`, not an error.
#[utoipa::path(
    get,
    path = "/api/menu/{role_id}",
    params(("role_id" = i32, Path, description = "Role whose menu is requested")),
    responses(
        (status = 200, description = "Menu tree", body = [Module]),
        (status = 500, description = "Assignment store unavailable")
    )
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
) -> Result<Json<Vec<Module>>, AppError> {
    let tree = MenuResolver::new(state.repo.clone()).resolve(role_id).await?;
    Ok(Json(tree))
}
