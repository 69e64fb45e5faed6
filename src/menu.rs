use crate::error::DataAccessError;
use crate::models::{MenuRow, Module, Submodule};
use crate::repository::RepositoryState;

/// build_tree
///
/// Folds flattened assignment rows into the module tree.
///
/// Modules and submodules first appear in row order (the store returns rows in assignment
/// insertion order), then both levels are stably sorted by their `rank`, so equal ranks keep
/// insertion order. A submodule granted twice is emitted once; a module granted without any
/// submodule shows up with an empty list.
pub fn build_tree(rows: Vec<MenuRow>) -> Vec<Module> {
    let mut ranked: Vec<(i32, Module, Vec<(i32, Submodule)>)> = Vec::new();

    for row in rows {
        let index = match ranked.iter().position(|(_, m, _)| m.id == row.module_id) {
            Some(index) => index,
            None => {
                ranked.push((
                    row.module_rank,
                    Module {
                        id: row.module_id,
                        name: row.module_name,
                        icon: row.module_icon,
                        submodules: Vec::new(),
                    },
                    Vec::new(),
                ));
                ranked.len() - 1
            }
        };

        let Some(submodule_id) = row.submodule_id else {
            continue;
        };
        let children = &mut ranked[index].2;
        if children.iter().any(|(_, s)| s.id == submodule_id) {
            continue;
        }
        children.push((
            row.submodule_rank.unwrap_or_default(),
            Submodule {
                id: submodule_id,
                name: row.submodule_name.unwrap_or_default(),
                icon: row.submodule_icon.unwrap_or_default(),
            },
        ));
    }

    ranked.sort_by_key(|(rank, _, _)| *rank);
    ranked
        .into_iter()
        .map(|(_, mut module, mut children)| {
            children.sort_by_key(|(rank, _)| *rank);
            module.submodules = children.into_iter().map(|(_, s)| s).collect();
            module
        })
        .collect()
}

/// MenuResolver
///
/// Computes the navigation tree a role is allowed to see.
#[derive(Clone)]
pub struct MenuResolver {
    repo: RepositoryState,
}

impl MenuResolver {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// Roles without assignments get an empty tree; only store failures are errors.
    pub async fn resolve(&self, role_id: i32) -> Result<Vec<Module>, DataAccessError> {
        let rows = self.repo.get_menu_rows(role_id).await?;
        let tree = build_tree(rows);
        tracing::debug!(role_id, modules = tree.len(), "resolved menu");
        Ok(tree)
    }

    /// The full module catalog, used by the assignment screen.
    pub async fn catalog(&self) -> Result<Vec<Module>, DataAccessError> {
        let rows = self.repo.get_all_menu_rows().await?;
        Ok(build_tree(rows))
    }
}
