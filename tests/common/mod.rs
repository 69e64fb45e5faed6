#![allow(dead_code)]

use movieflow::{
    AppConfig, AppState, MemoryRepository,
    models::{AssignMenuRequest, Catalog, CreateUserRequest},
    repository::Repository,
};
use std::sync::Arc;

pub const ADMIN_ROLE: i32 = 1;
pub const EDITOR_ROLE: i32 = 2;

/// Users created by `seeded_repo`.
pub struct Fixture {
    pub repo: Arc<MemoryRepository>,
    pub admin_id: i32,
    pub editor_id: i32,
}

/// The same roles, estados, modules and grants the initial migration installs, plus one
/// administrator and one editor.
pub async fn seeded_repo() -> Fixture {
    let repo = Arc::new(MemoryRepository::new());

    repo.insert_record(Catalog::Roles, ADMIN_ROLE, "administrador").unwrap();
    repo.insert_record(Catalog::Roles, EDITOR_ROLE, "editor").unwrap();
    repo.insert_record(Catalog::Estados, 1, "activo").unwrap();
    repo.insert_record(Catalog::Estados, 2, "inactivo").unwrap();

    repo.insert_module(1, "usuarios", "fa-users", 1).unwrap();
    repo.insert_module(2, "catalogo", "fa-film", 2).unwrap();
    repo.insert_submodule(10, 1, "registrar_usuarios", "fa-user-plus", 1).unwrap();
    repo.insert_submodule(11, 1, "asignacion_de_modulos", "fa-sitemap", 2).unwrap();
    repo.insert_submodule(20, 2, "peliculas", "fa-video", 1).unwrap();
    repo.insert_submodule(21, 2, "categorias", "fa-tags", 2).unwrap();
    repo.insert_submodule(22, 2, "clasificaciones", "fa-layer-group", 3).unwrap();

    for (role_id, module_id, submodule_id) in [
        (ADMIN_ROLE, 1, 10),
        (ADMIN_ROLE, 1, 11),
        (ADMIN_ROLE, 2, 20),
        (ADMIN_ROLE, 2, 21),
        (ADMIN_ROLE, 2, 22),
        (EDITOR_ROLE, 2, 20),
        (EDITOR_ROLE, 2, 21),
        (EDITOR_ROLE, 2, 22),
    ] {
        grant(&repo, role_id, module_id, Some(submodule_id)).await;
    }

    let admin = repo
        .create_user(CreateUserRequest {
            name: "Ada Admin".to_string(),
            email: "ada@movieflow.test".to_string(),
            role_id: ADMIN_ROLE,
            estado_id: Some(1),
        })
        .await
        .unwrap();
    let editor = repo
        .create_user(CreateUserRequest {
            name: "Eddie Editor".to_string(),
            email: "eddie@movieflow.test".to_string(),
            role_id: EDITOR_ROLE,
            estado_id: Some(1),
        })
        .await
        .unwrap();

    Fixture {
        repo,
        admin_id: admin.id,
        editor_id: editor.id,
    }
}

pub async fn grant(repo: &MemoryRepository, role_id: i32, module_id: i32, submodule_id: Option<i32>) {
    repo.assign_menu(AssignMenuRequest {
        role_id,
        module_id,
        submodule_id,
    })
    .await
    .unwrap();
}

pub fn state_with(repo: Arc<MemoryRepository>) -> AppState {
    AppState {
        repo,
        config: AppConfig::default(),
    }
}
