use crate::error::DataAccessError;
use crate::models::{
    AssignMenuRequest, Catalog, CatalogRecord, CatalogRecordRequest, CreateMovieRequest,
    CreateUserRequest, MenuAssignment, MenuRow, Movie, MovieFilter, UpdateCatalogRecordRequest,
    UpdateMovieRequest, UpdateUserRequest, User,
};
use async_trait::async_trait;
use std::sync::Arc;

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

pub type RepoResult<T> = Result<T, DataAccessError>;

/// Repository Trait
///
/// The persistence contract behind every handler. Handlers only see `Arc<dyn Repository>`,
/// so the Postgres implementation and the in-memory one used by tests are interchangeable.
///
/// Lookups that may legitimately miss return `Option`; deletes report whether a row went away.
/// Store failures are always `Err`, never an empty result.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Menu Assignment Store ---
    /// Rows granted to `role_id`, in assignment insertion order.
    async fn get_menu_rows(&self, role_id: i32) -> RepoResult<Vec<MenuRow>>;
    /// Every module joined with every one of its submodules, granted or not.
    async fn get_all_menu_rows(&self) -> RepoResult<Vec<MenuRow>>;
    async fn get_assignments(&self, role_id: i32) -> RepoResult<Vec<MenuAssignment>>;
    /// Fails with `Constraint` on duplicates, unknown ids, or a submodule outside the module.
    async fn assign_menu(&self, req: AssignMenuRequest) -> RepoResult<MenuAssignment>;
    async fn revoke_menu(&self, assignment_id: i32) -> RepoResult<bool>;

    // --- Lookup Catalogs (roles, estados, categorias, clasificaciones) ---
    async fn list_records(&self, catalog: Catalog) -> RepoResult<Vec<CatalogRecord>>;
    async fn get_record(&self, catalog: Catalog, id: i32) -> RepoResult<Option<CatalogRecord>>;
    async fn create_record(
        &self,
        catalog: Catalog,
        req: CatalogRecordRequest,
    ) -> RepoResult<CatalogRecord>;
    async fn update_record(
        &self,
        catalog: Catalog,
        id: i32,
        req: UpdateCatalogRecordRequest,
    ) -> RepoResult<Option<CatalogRecord>>;
    async fn delete_record(&self, catalog: Catalog, id: i32) -> RepoResult<bool>;

    // --- Users ---
    async fn list_users(&self) -> RepoResult<Vec<User>>;
    async fn get_user(&self, id: i32) -> RepoResult<Option<User>>;
    async fn create_user(&self, req: CreateUserRequest) -> RepoResult<User>;
    async fn update_user(&self, id: i32, req: UpdateUserRequest) -> RepoResult<Option<User>>;
    async fn delete_user(&self, id: i32) -> RepoResult<bool>;

    // --- Movies ---
    async fn list_movies(&self, filter: MovieFilter) -> RepoResult<Vec<Movie>>;
    async fn get_movie(&self, id: i32) -> RepoResult<Option<Movie>>;
    async fn create_movie(&self, req: CreateMovieRequest) -> RepoResult<Movie>;
    async fn update_movie(&self, id: i32, req: UpdateMovieRequest) -> RepoResult<Option<Movie>>;
    async fn delete_movie(&self, id: i32) -> RepoResult<bool>;
}

/// RepositoryState
///
/// The shared handle stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;
