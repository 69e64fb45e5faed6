use super::{RepoResult, Repository};
use crate::error::DataAccessError;
use crate::models::{
    AssignMenuRequest, Catalog, CatalogRecord, CatalogRecordRequest, CreateMovieRequest,
    CreateUserRequest, MenuAssignment, MenuRow, Movie, MovieFilter, UpdateCatalogRecordRequest,
    UpdateMovieRequest, UpdateUserRequest, User,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct StoredModule {
    id: i32,
    name: String,
    icon: String,
    rank: i32,
}

#[derive(Debug, Clone)]
struct StoredSubmodule {
    id: i32,
    module_id: i32,
    name: String,
    icon: String,
    rank: i32,
}

#[derive(Default)]
struct Tables {
    modules: Vec<StoredModule>,
    submodules: Vec<StoredSubmodule>,
    assignments: Vec<MenuAssignment>,
    catalogs: HashMap<Catalog, Vec<CatalogRecord>>,
    users: Vec<User>,
    movies: Vec<Movie>,
    next_id: i32,
}

impl Tables {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn records(&self, catalog: Catalog) -> &[CatalogRecord] {
        self.catalogs.get(&catalog).map(Vec::as_slice).unwrap_or(&[])
    }

    fn record_exists(&self, catalog: Catalog, id: i32) -> bool {
        self.records(catalog).iter().any(|r| r.id == id)
    }

    fn menu_row(&self, module: &StoredModule, submodule: Option<&StoredSubmodule>) -> MenuRow {
        MenuRow {
            module_id: module.id,
            module_name: module.name.clone(),
            module_icon: module.icon.clone(),
            module_rank: module.rank,
            submodule_id: submodule.map(|s| s.id),
            submodule_name: submodule.map(|s| s.name.clone()),
            submodule_icon: submodule.map(|s| s.icon.clone()),
            submodule_rank: submodule.map(|s| s.rank),
        }
    }

    /// Mirrors the foreign keys of the Postgres schema.
    fn check_user_refs(&self, role_id: i32, estado_id: Option<i32>) -> RepoResult<()> {
        if !self.record_exists(Catalog::Roles, role_id) {
            return Err(DataAccessError::Constraint(format!("unknown role {}", role_id)));
        }
        if let Some(estado_id) = estado_id {
            if !self.record_exists(Catalog::Estados, estado_id) {
                return Err(DataAccessError::Constraint(format!(
                    "unknown estado {}",
                    estado_id
                )));
            }
        }
        Ok(())
    }

    fn check_movie_refs(
        &self,
        category_id: Option<i32>,
        classification_id: Option<i32>,
    ) -> RepoResult<()> {
        if let Some(id) = category_id {
            if !self.record_exists(Catalog::Categorias, id) {
                return Err(DataAccessError::Constraint(format!("unknown category {}", id)));
            }
        }
        if let Some(id) = classification_id {
            if !self.record_exists(Catalog::Clasificaciones, id) {
                return Err(DataAccessError::Constraint(format!(
                    "unknown classification {}",
                    id
                )));
            }
        }
        Ok(())
    }

    /// True when some other table still points at the catalog record.
    fn record_in_use(&self, catalog: Catalog, id: i32) -> bool {
        match catalog {
            Catalog::Roles => {
                self.users.iter().any(|u| u.role_id == id)
                    || self.assignments.iter().any(|a| a.role_id == id)
            }
            Catalog::Estados => self.users.iter().any(|u| u.estado_id == Some(id)),
            Catalog::Categorias => self.movies.iter().any(|m| m.category_id == Some(id)),
            Catalog::Clasificaciones => self.movies.iter().any(|m| m.classification_id == Some(id)),
        }
    }
}

/// MemoryRepository
///
/// A `Repository` held entirely in process memory. It enforces the same unique and
/// foreign-key rules as the Postgres schema, which makes it a faithful stand-in for handler
/// and router tests. `MemoryRepository::failing()` simulates an unreachable store.
#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    should_fail: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation returns `DataAccessError::Unavailable`.
    pub fn failing() -> Self {
        Self {
            tables: Mutex::default(),
            should_fail: true,
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Tables>> {
        if self.should_fail {
            return Err(DataAccessError::Unavailable(
                "simulated store outage".to_string(),
            ));
        }
        self.tables
            .lock()
            .map_err(|_| DataAccessError::Unavailable("store lock poisoned".to_string()))
    }

    // --- Seeding (menu structure has no HTTP write path) ---

    pub fn insert_module(&self, id: i32, name: &str, icon: &str, rank: i32) -> RepoResult<()> {
        let mut tables = self.lock()?;
        if tables.modules.iter().any(|m| m.id == id || m.name == name) {
            return Err(DataAccessError::Constraint(format!("duplicate module {}", id)));
        }
        tables.modules.push(StoredModule {
            id,
            name: name.to_string(),
            icon: icon.to_string(),
            rank,
        });
        Ok(())
    }

    pub fn insert_submodule(
        &self,
        id: i32,
        module_id: i32,
        name: &str,
        icon: &str,
        rank: i32,
    ) -> RepoResult<()> {
        let mut tables = self.lock()?;
        if !tables.modules.iter().any(|m| m.id == module_id) {
            return Err(DataAccessError::Constraint(format!(
                "unknown module {}",
                module_id
            )));
        }
        if tables.submodules.iter().any(|s| s.id == id || s.name == name) {
            return Err(DataAccessError::Constraint(format!(
                "duplicate submodule {}",
                id
            )));
        }
        tables.submodules.push(StoredSubmodule {
            id,
            module_id,
            name: name.to_string(),
            icon: icon.to_string(),
            rank,
        });
        Ok(())
    }

    /// Inserts a catalog record with a fixed id, e.g. role 2.
    pub fn insert_record(&self, catalog: Catalog, id: i32, name: &str) -> RepoResult<()> {
        let mut tables = self.lock()?;
        if tables.record_exists(catalog, id) {
            return Err(DataAccessError::Constraint(format!(
                "duplicate {} {}",
                catalog.label(),
                id
            )));
        }
        tables.next_id = tables.next_id.max(id);
        tables.catalogs.entry(catalog).or_default().push(CatalogRecord {
            id,
            name: name.to_string(),
            description: None,
        });
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_menu_rows(&self, role_id: i32) -> RepoResult<Vec<MenuRow>> {
        let tables = self.lock()?;
        let rows = tables
            .assignments
            .iter()
            .filter(|a| a.role_id == role_id)
            .filter_map(|a| {
                let module = tables.modules.iter().find(|m| m.id == a.module_id)?;
                let submodule = a
                    .submodule_id
                    .and_then(|sid| tables.submodules.iter().find(|s| s.id == sid));
                Some(tables.menu_row(module, submodule))
            })
            .collect();
        Ok(rows)
    }

    async fn get_all_menu_rows(&self) -> RepoResult<Vec<MenuRow>> {
        let tables = self.lock()?;
        let mut rows = Vec::new();
        for module in &tables.modules {
            let mut children = tables
                .submodules
                .iter()
                .filter(|s| s.module_id == module.id)
                .peekable();
            if children.peek().is_none() {
                rows.push(tables.menu_row(module, None));
            }
            for submodule in children {
                rows.push(tables.menu_row(module, Some(submodule)));
            }
        }
        Ok(rows)
    }

    async fn get_assignments(&self, role_id: i32) -> RepoResult<Vec<MenuAssignment>> {
        let tables = self.lock()?;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.role_id == role_id)
            .cloned()
            .collect())
    }

    async fn assign_menu(&self, req: AssignMenuRequest) -> RepoResult<MenuAssignment> {
        let mut tables = self.lock()?;
        if !tables.record_exists(Catalog::Roles, req.role_id) {
            return Err(DataAccessError::Constraint(format!(
                "unknown role {}",
                req.role_id
            )));
        }
        if !tables.modules.iter().any(|m| m.id == req.module_id) {
            return Err(DataAccessError::Constraint(format!(
                "unknown module {}",
                req.module_id
            )));
        }
        if let Some(sid) = req.submodule_id {
            let belongs = tables
                .submodules
                .iter()
                .any(|s| s.id == sid && s.module_id == req.module_id);
            if !belongs {
                return Err(DataAccessError::Constraint(format!(
                    "submodule {} does not belong to module {}",
                    sid, req.module_id
                )));
            }
        }
        let duplicate = tables.assignments.iter().any(|a| {
            a.role_id == req.role_id
                && a.module_id == req.module_id
                && a.submodule_id == req.submodule_id
        });
        if duplicate {
            return Err(DataAccessError::Constraint("duplicate assignment".to_string()));
        }

        let assignment = MenuAssignment {
            id: tables.allocate_id(),
            role_id: req.role_id,
            module_id: req.module_id,
            submodule_id: req.submodule_id,
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn revoke_menu(&self, assignment_id: i32) -> RepoResult<bool> {
        let mut tables = self.lock()?;
        let before = tables.assignments.len();
        tables.assignments.retain(|a| a.id != assignment_id);
        Ok(tables.assignments.len() < before)
    }

    async fn list_records(&self, catalog: Catalog) -> RepoResult<Vec<CatalogRecord>> {
        let tables = self.lock()?;
        Ok(tables.records(catalog).to_vec())
    }

    async fn get_record(&self, catalog: Catalog, id: i32) -> RepoResult<Option<CatalogRecord>> {
        let tables = self.lock()?;
        Ok(tables.records(catalog).iter().find(|r| r.id == id).cloned())
    }

    async fn create_record(
        &self,
        catalog: Catalog,
        req: CatalogRecordRequest,
    ) -> RepoResult<CatalogRecord> {
        let mut tables = self.lock()?;
        let name = req.name.trim().to_string();
        if tables.records(catalog).iter().any(|r| r.name == name) {
            return Err(DataAccessError::Constraint(format!(
                "duplicate {} name",
                catalog.label()
            )));
        }
        let record = CatalogRecord {
            id: tables.allocate_id(),
            name,
            description: req.description,
        };
        tables.catalogs.entry(catalog).or_default().push(record.clone());
        Ok(record)
    }

    async fn update_record(
        &self,
        catalog: Catalog,
        id: i32,
        req: UpdateCatalogRecordRequest,
    ) -> RepoResult<Option<CatalogRecord>> {
        let mut tables = self.lock()?;
        let name = req.name.map(|name| name.trim().to_string());
        if let Some(name) = &name {
            if tables
                .records(catalog)
                .iter()
                .any(|r| r.id != id && &r.name == name)
            {
                return Err(DataAccessError::Constraint(format!(
                    "duplicate {} name",
                    catalog.label()
                )));
            }
        }
        let Some(record) = tables
            .catalogs
            .get_mut(&catalog)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
        else {
            return Ok(None);
        };
        if let Some(name) = name {
            record.name = name;
        }
        if let Some(description) = req.description {
            record.description = Some(description);
        }
        Ok(Some(record.clone()))
    }

    async fn delete_record(&self, catalog: Catalog, id: i32) -> RepoResult<bool> {
        let mut tables = self.lock()?;
        if !tables.record_exists(catalog, id) {
            return Ok(false);
        }
        if tables.record_in_use(catalog, id) {
            return Err(DataAccessError::Constraint(format!(
                "{} {} is still referenced",
                catalog.label(),
                id
            )));
        }
        if let Some(records) = tables.catalogs.get_mut(&catalog) {
            records.retain(|r| r.id != id);
        }
        Ok(true)
    }

    async fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.lock()?.users.clone())
    }

    async fn get_user(&self, id: i32) -> RepoResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, req: CreateUserRequest) -> RepoResult<User> {
        let mut tables = self.lock()?;
        let email = req.email.trim().to_lowercase();
        if tables.users.iter().any(|u| u.email == email) {
            return Err(DataAccessError::Constraint("duplicate email".to_string()));
        }
        tables.check_user_refs(req.role_id, req.estado_id)?;
        let user = User {
            id: tables.allocate_id(),
            name: req.name.trim().to_string(),
            email,
            role_id: req.role_id,
            estado_id: req.estado_id,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i32, req: UpdateUserRequest) -> RepoResult<Option<User>> {
        let mut tables = self.lock()?;
        let Some(current) = tables.users.iter().find(|u| u.id == id).cloned() else {
            return Ok(None);
        };
        let email = req.email.map(|email| email.trim().to_lowercase());
        if let Some(email) = &email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(DataAccessError::Constraint("duplicate email".to_string()));
            }
        }
        let role_id = req.role_id.unwrap_or(current.role_id);
        let estado_id = req.estado_id.or(current.estado_id);
        tables.check_user_refs(role_id, estado_id)?;

        let updated = User {
            name: req.name.map(|n| n.trim().to_string()).unwrap_or(current.name),
            email: email.unwrap_or(current.email),
            role_id,
            estado_id,
            ..current
        };
        if let Some(slot) = tables.users.iter_mut().find(|u| u.id == id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete_user(&self, id: i32) -> RepoResult<bool> {
        let mut tables = self.lock()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() < before)
    }

    async fn list_movies(&self, filter: MovieFilter) -> RepoResult<Vec<Movie>> {
        let tables = self.lock()?;
        let search = filter
            .search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Ok(tables
            .movies
            .iter()
            .filter(|m| filter.category_id.is_none_or(|id| m.category_id == Some(id)))
            .filter(|m| {
                filter
                    .classification_id
                    .is_none_or(|id| m.classification_id == Some(id))
            })
            .filter(|m| {
                search
                    .as_deref()
                    .is_none_or(|s| m.title.to_lowercase().contains(s))
            })
            .cloned()
            .collect())
    }

    async fn get_movie(&self, id: i32) -> RepoResult<Option<Movie>> {
        Ok(self.lock()?.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn create_movie(&self, req: CreateMovieRequest) -> RepoResult<Movie> {
        let mut tables = self.lock()?;
        tables.check_movie_refs(req.category_id, req.classification_id)?;
        let movie = Movie {
            id: tables.allocate_id(),
            title: req.title.trim().to_string(),
            synopsis: req.synopsis,
            duration_minutes: req.duration_minutes,
            release_date: req.release_date,
            category_id: req.category_id,
            classification_id: req.classification_id,
            poster_url: req.poster_url,
            created_at: Utc::now(),
        };
        tables.movies.push(movie.clone());
        Ok(movie)
    }

    async fn update_movie(&self, id: i32, req: UpdateMovieRequest) -> RepoResult<Option<Movie>> {
        let mut tables = self.lock()?;
        let Some(current) = tables.movies.iter().find(|m| m.id == id).cloned() else {
            return Ok(None);
        };
        let category_id = req.category_id.or(current.category_id);
        let classification_id = req.classification_id.or(current.classification_id);
        tables.check_movie_refs(category_id, classification_id)?;

        let updated = Movie {
            title: req.title.map(|t| t.trim().to_string()).unwrap_or(current.title),
            synopsis: req.synopsis.or(current.synopsis),
            duration_minutes: req.duration_minutes.or(current.duration_minutes),
            release_date: req.release_date.or(current.release_date),
            category_id,
            classification_id,
            poster_url: req.poster_url.or(current.poster_url),
            ..current
        };
        if let Some(slot) = tables.movies.iter_mut().find(|m| m.id == id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete_movie(&self, id: i32) -> RepoResult<bool> {
        let mut tables = self.lock()?;
        let before = tables.movies.len();
        tables.movies.retain(|m| m.id != id);
        Ok(tables.movies.len() < before)
    }
}
