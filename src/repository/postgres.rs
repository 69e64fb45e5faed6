use super::{RepoResult, Repository};
use crate::error::DataAccessError;
use crate::models::{
    AssignMenuRequest, Catalog, CatalogRecord, CatalogRecordRequest, CreateMovieRequest,
    CreateUserRequest, MenuAssignment, MenuRow, Movie, MovieFilter, UpdateCatalogRecordRequest,
    UpdateMovieRequest, UpdateUserRequest, User,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};

const MENU_ROW_COLUMNS: &str = r#"
    m.id AS module_id, m.name AS module_name, m.icon AS module_icon, m.rank AS module_rank,
    s.id AS submodule_id, s.name AS submodule_name, s.icon AS submodule_icon, s.rank AS submodule_rank
"#;

const USER_COLUMNS: &str = "id, name, email, role_id, estado_id, created_at";

const MOVIE_COLUMNS: &str = "id, title, synopsis, duration_minutes, release_date, category_id, classification_id, poster_url, created_at";

/// PostgresRepository
///
/// The production `Repository`, backed by the schema in `migrations/`.
/// Queries are checked at runtime so the crate builds without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- MENU ---

    /// get_menu_rows
    ///
    /// Joins each grant with its module and (optional) submodule. Ordered by assignment id so
    /// the resolver sees insertion order; rank ordering is applied by the resolver itself.
    async fn get_menu_rows(&self, role_id: i32) -> RepoResult<Vec<MenuRow>> {
        let sql = format!(
            r#"SELECT {MENU_ROW_COLUMNS}
               FROM asignacion_menu a
               JOIN modulos m ON m.id = a.module_id
               LEFT JOIN submodulos s ON s.id = a.submodule_id
               WHERE a.role_id = $1
               ORDER BY a.id"#
        );
        sqlx::query_as::<_, MenuRow>(&sql)
            .bind(role_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn get_all_menu_rows(&self) -> RepoResult<Vec<MenuRow>> {
        let sql = format!(
            r#"SELECT {MENU_ROW_COLUMNS}
               FROM modulos m
               LEFT JOIN submodulos s ON s.module_id = m.id
               ORDER BY m.id, s.id"#
        );
        sqlx::query_as::<_, MenuRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn get_assignments(&self, role_id: i32) -> RepoResult<Vec<MenuAssignment>> {
        sqlx::query_as::<_, MenuAssignment>(
            "SELECT id, role_id, module_id, submodule_id FROM asignacion_menu WHERE role_id = $1 ORDER BY id",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DataAccessError::Query)
    }

    /// assign_menu
    ///
    /// The INSERT ... SELECT only produces a row when the submodule (if any) belongs to the
    /// module; otherwise nothing is inserted and the grant is rejected as a constraint error.
    /// Duplicate grants trip the unique index.
    async fn assign_menu(&self, req: AssignMenuRequest) -> RepoResult<MenuAssignment> {
        let inserted = sqlx::query_as::<_, MenuAssignment>(
            r#"INSERT INTO asignacion_menu (role_id, module_id, submodule_id)
               SELECT $1, $2, $3
               WHERE $3::INTEGER IS NULL
                  OR EXISTS (SELECT 1 FROM submodulos WHERE id = $3 AND module_id = $2)
               RETURNING id, role_id, module_id, submodule_id"#,
        )
        .bind(req.role_id)
        .bind(req.module_id)
        .bind(req.submodule_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DataAccessError::classify)?;

        inserted.ok_or_else(|| {
            DataAccessError::Constraint(format!(
                "submodule {:?} does not belong to module {}",
                req.submodule_id, req.module_id
            ))
        })
    }

    async fn revoke_menu(&self, assignment_id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM asignacion_menu WHERE id = $1")
            .bind(assignment_id)
            .execute(&self.pool)
            .await
            .map_err(DataAccessError::Query)?;
        Ok(result.rows_affected() > 0)
    }

    // --- CATALOGS ---

    async fn list_records(&self, catalog: Catalog) -> RepoResult<Vec<CatalogRecord>> {
        let sql = format!(
            "SELECT id, name, description FROM {} ORDER BY id",
            catalog.table()
        );
        sqlx::query_as::<_, CatalogRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn get_record(&self, catalog: Catalog, id: i32) -> RepoResult<Option<CatalogRecord>> {
        let sql = format!(
            "SELECT id, name, description FROM {} WHERE id = $1",
            catalog.table()
        );
        sqlx::query_as::<_, CatalogRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn create_record(
        &self,
        catalog: Catalog,
        req: CatalogRecordRequest,
    ) -> RepoResult<CatalogRecord> {
        let sql = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING id, name, description",
            catalog.table()
        );
        sqlx::query_as::<_, CatalogRecord>(&sql)
            .bind(req.name.trim())
            .bind(req.description)
            .fetch_one(&self.pool)
            .await
            .map_err(DataAccessError::classify)
    }

    /// update_record
    ///
    /// COALESCE keeps the stored value for every field the request leaves out.
    async fn update_record(
        &self,
        catalog: Catalog,
        id: i32,
        req: UpdateCatalogRecordRequest,
    ) -> RepoResult<Option<CatalogRecord>> {
        let sql = format!(
            r#"UPDATE {}
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description)
               WHERE id = $1
               RETURNING id, name, description"#,
            catalog.table()
        );
        sqlx::query_as::<_, CatalogRecord>(&sql)
            .bind(id)
            .bind(req.name.map(|name| name.trim().to_string()))
            .bind(req.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(DataAccessError::classify)
    }

    async fn delete_record(&self, catalog: Catalog, id: i32) -> RepoResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", catalog.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DataAccessError::classify)?;
        Ok(result.rows_affected() > 0)
    }

    // --- USERS ---

    async fn list_users(&self) -> RepoResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM usuarios ORDER BY id");
        sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn get_user(&self, id: i32) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM usuarios WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn create_user(&self, req: CreateUserRequest) -> RepoResult<User> {
        let sql = format!(
            "INSERT INTO usuarios (name, email, role_id, estado_id) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(req.name.trim())
            .bind(req.email.trim().to_lowercase())
            .bind(req.role_id)
            .bind(req.estado_id)
            .fetch_one(&self.pool)
            .await
            .map_err(DataAccessError::classify)
    }

    async fn update_user(&self, id: i32, req: UpdateUserRequest) -> RepoResult<Option<User>> {
        let sql = format!(
            r#"UPDATE usuarios
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   role_id = COALESCE($4, role_id),
                   estado_id = COALESCE($5, estado_id)
               WHERE id = $1
               RETURNING {USER_COLUMNS}"#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(req.name.map(|name| name.trim().to_string()))
            .bind(req.email.map(|email| email.trim().to_lowercase()))
            .bind(req.role_id)
            .bind(req.estado_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DataAccessError::classify)
    }

    async fn delete_user(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DataAccessError::classify)?;
        Ok(result.rows_affected() > 0)
    }

    // --- MOVIES ---

    /// list_movies
    ///
    /// Builds the WHERE clause with QueryBuilder so every filter value is a bound parameter.
    async fn list_movies(&self, filter: MovieFilter) -> RepoResult<Vec<Movie>> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {MOVIE_COLUMNS} FROM peliculas WHERE TRUE"));

        if let Some(category_id) = filter.category_id {
            builder.push(" AND category_id = ");
            builder.push_bind(category_id);
        }

        if let Some(classification_id) = filter.classification_id {
            builder.push(" AND classification_id = ");
            builder.push_bind(classification_id);
        }

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            builder.push(" AND title ILIKE ");
            builder.push_bind(format!("%{}%", search.trim()));
        }

        builder.push(" ORDER BY id");

        builder
            .build_query_as::<Movie>()
            .fetch_all(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn get_movie(&self, id: i32) -> RepoResult<Option<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM peliculas WHERE id = $1");
        sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DataAccessError::Query)
    }

    async fn create_movie(&self, req: CreateMovieRequest) -> RepoResult<Movie> {
        let sql = format!(
            r#"INSERT INTO peliculas
                 (title, synopsis, duration_minutes, release_date, category_id, classification_id, poster_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {MOVIE_COLUMNS}"#
        );
        sqlx::query_as::<_, Movie>(&sql)
            .bind(req.title.trim())
            .bind(req.synopsis)
            .bind(req.duration_minutes)
            .bind(req.release_date)
            .bind(req.category_id)
            .bind(req.classification_id)
            .bind(req.poster_url)
            .fetch_one(&self.pool)
            .await
            .map_err(DataAccessError::classify)
    }

    async fn update_movie(&self, id: i32, req: UpdateMovieRequest) -> RepoResult<Option<Movie>> {
        let sql = format!(
            r#"UPDATE peliculas
               SET title = COALESCE($2, title),
                   synopsis = COALESCE($3, synopsis),
                   duration_minutes = COALESCE($4, duration_minutes),
                   release_date = COALESCE($5, release_date),
                   category_id = COALESCE($6, category_id),
                   classification_id = COALESCE($7, classification_id),
                   poster_url = COALESCE($8, poster_url)
               WHERE id = $1
               RETURNING {MOVIE_COLUMNS}"#
        );
        sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .bind(req.title.map(|title| title.trim().to_string()))
            .bind(req.synopsis)
            .bind(req.duration_minutes)
            .bind(req.release_date)
            .bind(req.category_id)
            .bind(req.classification_id)
            .bind(req.poster_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(DataAccessError::classify)
    }

    async fn delete_movie(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM peliculas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DataAccessError::classify)?;
        Ok(result.rows_affected() > 0)
    }
}
