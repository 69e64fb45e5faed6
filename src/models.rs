use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Menu Tree (API Output) ---

/// Module
///
/// A top-level sidebar entry together with the submodules the requesting role may open.
/// Serialized with the `submodulos` key the dashboard frontend expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Module {
    pub id: i32,
    // Machine key, e.g. "usuarios".
    pub name: String,
    // Font Awesome glyph identifier, e.g. "fa-users".
    pub icon: String,
    #[serde(rename = "submodulos")]
    pub submodules: Vec<Submodule>,
}

/// Submodule
///
/// Second-level entry. `name` doubles as the key into the dashboard's view registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Submodule {
    pub id: i32,
    pub name: String,
    pub icon: String,
}

/// MenuRow
///
/// One flattened row of the menu assignment store: a module joined with (optionally) one
/// of its submodules. Rows without a submodule grant the bare module.
#[derive(Debug, Clone, PartialEq, FromRow, Default)]
pub struct MenuRow {
    pub module_id: i32,
    pub module_name: String,
    pub module_icon: String,
    pub module_rank: i32,
    pub submodule_id: Option<i32>,
    pub submodule_name: Option<String>,
    pub submodule_icon: Option<String>,
    pub submodule_rank: Option<i32>,
}

/// MenuAssignment
///
/// A single grant in `asignacion_menu`: role → module, optionally narrowed to one submodule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct MenuAssignment {
    pub id: i32,
    pub role_id: i32,
    pub module_id: i32,
    pub submodule_id: Option<i32>,
}

/// AssignMenuRequest
///
/// Input payload for POST /api/asignar-menu.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AssignMenuRequest {
    pub role_id: i32,
    pub module_id: i32,
    #[serde(default)]
    pub submodule_id: Option<i32>,
}

// --- Lookup Catalogs ---

/// Catalog
///
/// The four lookup tables that share the `{id, name, description}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    Roles,
    Estados,
    Categorias,
    Clasificaciones,
}

impl Catalog {
    pub const ALL: [Catalog; 4] = [
        Catalog::Roles,
        Catalog::Estados,
        Catalog::Categorias,
        Catalog::Clasificaciones,
    ];

    /// Backing table name. Only ever one of these literals, so it is safe to splice into SQL.
    pub fn table(self) -> &'static str {
        match self {
            Catalog::Roles => "roles",
            Catalog::Estados => "estados",
            Catalog::Categorias => "categorias",
            Catalog::Clasificaciones => "clasificaciones",
        }
    }

    /// Singular label used in "not found" messages.
    pub fn label(self) -> &'static str {
        match self {
            Catalog::Roles => "role",
            Catalog::Estados => "estado",
            Catalog::Categorias => "category",
            Catalog::Clasificaciones => "classification",
        }
    }

    /// Roles and estados gate access, so only administrators may change them.
    pub fn admin_writes(self) -> bool {
        matches!(self, Catalog::Roles | Catalog::Estados)
    }
}

impl std::str::FromStr for Catalog {
    type Err = String;

    /// Parses the URL segment used under `/api`, e.g. `categorias`.
    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        Catalog::ALL
            .into_iter()
            .find(|catalog| catalog.table() == segment)
            .ok_or_else(|| format!("unknown catalog '{}'", segment))
    }
}

/// CatalogRecord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CatalogRecord {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// CatalogRecordRequest
///
/// Input payload for creating a catalog record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CatalogRecordRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// UpdateCatalogRecordRequest
///
/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateCatalogRecordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// --- Users ---

/// User
///
/// An administrator account from `usuarios`. `role_id` drives menu resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    pub estado_id: Option<i32>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            role_id: 0,
            estado_id: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// CreateUserRequest
///
/// Input payload for POST /api/usuarios. Credentials are owned by the login service.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role_id: i32,
    #[serde(default)]
    pub estado_id: Option<i32>,
}

/// UpdateUserRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado_id: Option<i32>,
}

/// SessionUser
///
/// The identity the rest of the system cares about: who, and under which role.
/// Returned by GET /api/me and consumed by the dashboard client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SessionUser {
    pub id: i32,
    pub role_id: i32,
}

// --- Movies ---

/// Movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub duration_minutes: Option<i32>,
    #[ts(type = "string | null")]
    pub release_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub classification_id: Option<i32>,
    pub poster_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Default for Movie {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            synopsis: None,
            duration_minutes: None,
            release_date: None,
            category_id: None,
            classification_id: None,
            poster_url: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// MovieFilter
///
/// Query parameters accepted by GET /api/peliculas. Every filter is optional and they combine
/// with AND.
#[derive(Debug, Clone, Serialize, Deserialize, Default, utoipa::IntoParams)]
pub struct MovieFilter {
    /// Only movies in this category.
    pub category_id: Option<i32>,
    /// Only movies with this classification.
    pub classification_id: Option<i32>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

/// CreateMovieRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateMovieRequest {
    pub title: String,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    #[ts(type = "string | null")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub classification_id: Option<i32>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

/// UpdateMovieRequest
///
/// Partial update payload for PUT /api/peliculas/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateMovieRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub release_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

// --- Input Validation ---

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be blank", field));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), String> {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err("email is malformed".to_string()),
    }
}

fn require_positive_duration(value: Option<i32>) -> Result<(), String> {
    match value {
        Some(minutes) if minutes <= 0 => Err("duration_minutes must be positive".to_string()),
        _ => Ok(()),
    }
}

impl CatalogRecordRequest {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)
    }
}

impl UpdateCatalogRecordRequest {
    pub fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) => require_text("name", name),
            None => Ok(()),
        }
    }
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name)?;
        require_email(&self.email)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        Ok(())
    }
}

impl CreateMovieRequest {
    pub fn validate(&self) -> Result<(), String> {
        require_text("title", &self.title)?;
        require_positive_duration(self.duration_minutes)
    }
}

impl UpdateMovieRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        require_positive_duration(self.duration_minutes)
    }
}
