use crate::{
    AppState,
    auth::AuthUser,
    error::AppError,
    models::{Catalog, CatalogRecord, CatalogRecordRequest, UpdateCatalogRecordRequest},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// The four lookup tables (roles, estados, categorias, clasificaciones) share these handlers.
// The first path segment after /api selects the table; unknown segments are a 404.

fn parse_catalog(segment: &str) -> Result<Catalog, AppError> {
    segment
        .parse::<Catalog>()
        .map_err(|_| AppError::NotFound("resource"))
}

fn authorize_write(
    user: &AuthUser,
    state: &AppState,
    catalog: Catalog,
) -> Result<(), AppError> {
    if catalog.admin_writes() {
        user.require_admin(&state.config)?;
    }
    Ok(())
}

/// list_records
///
/// [Public Route] Lists every record of a catalog, ordered by id.
#[utoipa::path(
    get,
    path = "/api/{catalog}",
    params(("catalog" = String, Path, description = "roles | estados | categorias | clasificaciones")),
    responses(
        (status = 200, description = "Records", body = [CatalogRecord]),
        (status = 404, description = "Unknown catalog")
    )
)]
pub async fn list_records(
    State(state): State<AppState>,
    Path(catalog): Path<String>,
) -> Result<Json<Vec<CatalogRecord>>, AppError> {
    let catalog = parse_catalog(&catalog)?;
    Ok(Json(state.repo.list_records(catalog).await?))
}

/// get_record
///
/// [Public Route] Fetches one catalog record.
#[utoipa::path(
    get,
    path = "/api/{catalog}/{id}",
    params(
        ("catalog" = String, Path, description = "roles | estados | categorias | clasificaciones"),
        ("id" = i32, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Found", body = CatalogRecord),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_record(
    State(state): State<AppState>,
    Path((catalog, id)): Path<(String, i32)>,
) -> Result<Json<CatalogRecord>, AppError> {
    let catalog = parse_catalog(&catalog)?;
    state
        .repo
        .get_record(catalog, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(catalog.label()))
}

/// create_record
///
/// [Authenticated Route] Adds a record. Roles and estados additionally require the admin role.
/// Duplicate names are rejected with 409.
#[utoipa::path(
    post,
    path = "/api/{catalog}",
    params(("catalog" = String, Path, description = "roles | estados | categorias | clasificaciones")),
    request_body = CatalogRecordRequest,
    responses(
        (status = 201, description = "Created", body = CatalogRecord),
        (status = 400, description = "Blank name"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_record(
    user: AuthUser,
    State(state): State<AppState>,
    Path(catalog): Path<String>,
    Json(payload): Json<CatalogRecordRequest>,
) -> Result<(StatusCode, Json<CatalogRecord>), AppError> {
    let catalog = parse_catalog(&catalog)?;
    authorize_write(&user, &state, catalog)?;
    payload.validate().map_err(AppError::BadRequest)?;

    let record = state.repo.create_record(catalog, payload).await?;
    tracing::info!(catalog = catalog.table(), id = record.id, "catalog record created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// update_record
///
/// [Authenticated Route] Partial update; omitted fields keep their value.
#[utoipa::path(
    put,
    path = "/api/{catalog}/{id}",
    params(
        ("catalog" = String, Path, description = "roles | estados | categorias | clasificaciones"),
        ("id" = i32, Path, description = "Record ID")
    ),
    request_body = UpdateCatalogRecordRequest,
    responses(
        (status = 200, description = "Updated", body = CatalogRecord),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_record(
    user: AuthUser,
    State(state): State<AppState>,
    Path((catalog, id)): Path<(String, i32)>,
    Json(payload): Json<UpdateCatalogRecordRequest>,
) -> Result<Json<CatalogRecord>, AppError> {
    let catalog = parse_catalog(&catalog)?;
    authorize_write(&user, &state, catalog)?;
    payload.validate().map_err(AppError::BadRequest)?;

    state
        .repo
        .update_record(catalog, id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(catalog.label()))
}

/// delete_record
///
/// [Authenticated Route] Removes a record. Records still referenced elsewhere
/// (e.g. a category with movies) are refused with 409.
#[utoipa::path(
    delete,
    path = "/api/{catalog}/{id}",
    params(
        ("catalog" = String, Path, description = "roles | estados | categorias | clasificaciones"),
        ("id" = i32, Path, description = "Record ID")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Still referenced")
    )
)]
pub async fn delete_record(
    user: AuthUser,
    State(state): State<AppState>,
    Path((catalog, id)): Path<(String, i32)>,
) -> Result<StatusCode, AppError> {
    let catalog = parse_catalog(&catalog)?;
    authorize_write(&user, &state, catalog)?;

    if state.repo.delete_record(catalog, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(catalog.label()))
    }
}
