mod common;

use common::{ADMIN_ROLE, EDITOR_ROLE, grant, seeded_repo};
use movieflow::{
    MemoryRepository, MenuResolver,
    error::DataAccessError,
    menu::build_tree,
    models::{Catalog, MenuRow, Module, Submodule},
};
use std::sync::Arc;

fn row(module: (i32, &str, i32), submodule: Option<(i32, &str, i32)>) -> MenuRow {
    MenuRow {
        module_id: module.0,
        module_name: module.1.to_string(),
        module_icon: format!("fa-{}", module.1),
        module_rank: module.2,
        submodule_id: submodule.map(|s| s.0),
        submodule_name: submodule.map(|s| s.1.to_string()),
        submodule_icon: submodule.map(|s| format!("fa-{}", s.1)),
        submodule_rank: submodule.map(|s| s.2),
    }
}

fn names(module: &Module) -> Vec<&str> {
    module.submodules.iter().map(|s| s.name.as_str()).collect()
}

// --- build_tree ---

#[test]
fn test_build_tree_empty_rows() {
    assert!(build_tree(vec![]).is_empty());
}

#[test]
fn test_build_tree_groups_rows_by_module() {
    let tree = build_tree(vec![
        row((1, "usuarios", 1), Some((10, "registrar_usuarios", 1))),
        row((2, "catalogo", 2), Some((20, "peliculas", 1))),
        row((1, "usuarios", 1), Some((11, "asignacion_de_modulos", 2))),
    ]);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].id, 1);
    assert_eq!(names(&tree[0]), vec!["registrar_usuarios", "asignacion_de_modulos"]);
    assert_eq!(tree[1].id, 2);
    assert_eq!(names(&tree[1]), vec!["peliculas"]);
}

#[test]
fn test_build_tree_orders_by_rank_then_insertion() {
    let tree = build_tree(vec![
        row((2, "catalogo", 2), Some((22, "clasificaciones", 3))),
        row((2, "catalogo", 2), Some((21, "categorias", 1))),
        row((2, "catalogo", 2), Some((20, "peliculas", 1))),
        row((1, "usuarios", 1), Some((10, "registrar_usuarios", 1))),
    ]);

    let module_ids: Vec<i32> = tree.iter().map(|m| m.id).collect();
    assert_eq!(module_ids, vec![1, 2], "lower module rank comes first");
    // 21 and 20 share rank 1, so they keep the order they were granted in.
    assert_eq!(names(&tree[1]), vec!["categorias", "peliculas", "clasificaciones"]);
}

#[test]
fn test_build_tree_dedups_submodules_and_keeps_bare_modules() {
    let tree = build_tree(vec![
        row((1, "usuarios", 1), Some((10, "registrar_usuarios", 1))),
        row((1, "usuarios", 1), Some((10, "registrar_usuarios", 1))),
        row((3, "reportes", 3), None),
    ]);

    assert_eq!(tree[0].submodules.len(), 1);
    assert_eq!(
        tree[1],
        Module {
            id: 3,
            name: "reportes".to_string(),
            icon: "fa-reportes".to_string(),
            submodules: vec![],
        }
    );
}

// --- MenuResolver over the memory store ---

#[tokio::test]
async fn test_resolve_role_without_assignments_is_empty() {
    let fixture = seeded_repo().await;
    fixture.repo.insert_record(Catalog::Roles, 9, "invitado").unwrap();

    let resolver = MenuResolver::new(fixture.repo.clone());
    assert!(resolver.resolve(9).await.unwrap().is_empty());
    // Unknown roles are not an error either.
    assert!(resolver.resolve(404).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resolve_admin_sees_every_grant_in_order() {
    let fixture = seeded_repo().await;
    let tree = MenuResolver::new(fixture.repo.clone())
        .resolve(ADMIN_ROLE)
        .await
        .unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].name, "usuarios");
    assert_eq!(names(&tree[0]), vec!["registrar_usuarios", "asignacion_de_modulos"]);
    assert_eq!(tree[1].name, "catalogo");
    assert_eq!(names(&tree[1]), vec!["peliculas", "categorias", "clasificaciones"]);
}

#[tokio::test]
async fn test_resolve_only_granted_submodules() {
    let fixture = seeded_repo().await;
    let tree = MenuResolver::new(fixture.repo.clone())
        .resolve(EDITOR_ROLE)
        .await
        .unwrap();

    assert_eq!(tree.len(), 1, "editor has nothing under usuarios");
    assert_eq!(tree[0].id, 2);
}

#[tokio::test]
async fn test_resolve_single_grant_scenario() {
    let repo = Arc::new(MemoryRepository::new());
    repo.insert_record(Catalog::Roles, 2, "editor").unwrap();
    repo.insert_module(1, "usuarios", "fa-users", 1).unwrap();
    repo.insert_submodule(10, 1, "registrar_usuarios", "fa-user-plus", 1)
        .unwrap();
    repo.insert_submodule(11, 1, "asignacion_de_modulos", "fa-sitemap", 2)
        .unwrap();
    grant(&repo, 2, 1, Some(10)).await;

    let tree = MenuResolver::new(repo).resolve(2).await.unwrap();

    assert_eq!(
        tree,
        vec![Module {
            id: 1,
            name: "usuarios".to_string(),
            icon: "fa-users".to_string(),
            submodules: vec![Submodule {
                id: 10,
                name: "registrar_usuarios".to_string(),
                icon: "fa-user-plus".to_string(),
            }],
        }]
    );

    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json[0]["submodulos"][0]["name"], "registrar_usuarios");
    assert!(json[0].get("rank").is_none(), "rank is not part of the wire format");
}

#[tokio::test]
async fn test_resolve_module_level_grant_has_no_submodules() {
    let fixture = seeded_repo().await;
    fixture.repo.insert_record(Catalog::Roles, 5, "auditor").unwrap();
    grant(&fixture.repo, 5, 1, None).await;

    let tree = MenuResolver::new(fixture.repo.clone()).resolve(5).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert!(tree[0].submodules.is_empty());
}

#[tokio::test]
async fn test_resolve_store_failure_is_an_error() {
    let resolver = MenuResolver::new(Arc::new(MemoryRepository::failing()));
    let result = resolver.resolve(1).await;
    assert!(matches!(result, Err(DataAccessError::Unavailable(_))));
}

#[tokio::test]
async fn test_catalog_lists_every_module_and_submodule() {
    let fixture = seeded_repo().await;
    fixture.repo.insert_module(3, "reportes", "fa-chart-bar", 3).unwrap();

    let catalog = MenuResolver::new(fixture.repo.clone()).catalog().await.unwrap();

    let module_names: Vec<&str> = catalog.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(module_names, vec!["usuarios", "catalogo", "reportes"]);
    assert_eq!(catalog[1].submodules.len(), 3);
    assert!(catalog[2].submodules.is_empty());
}
