use super::store::{EXPANDED_MODULE_KEY, KeyValueStore, SELECTED_SUBMODULE_KEY};
use crate::models::{Module, Submodule};

/// NavigationState
///
/// Which module is expanded and which of its submodules is selected. A plain value:
/// transitions return a new state and never touch storage; `persist` writes it out.
///
/// At most one module is expanded and at most one submodule selected. Every transition that
/// touches the expanded module drops the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub expanded_module_id: Option<i32>,
    pub selected_submodule_id: Option<i32>,
}

impl NavigationState {
    /// Collapses `module_id` if it is expanded, otherwise expands it in place of any other.
    /// The submodule selection is cleared either way.
    pub fn toggle_module(self, module_id: i32) -> Self {
        let expanded_module_id = if self.expanded_module_id == Some(module_id) {
            None
        } else {
            Some(module_id)
        };
        Self {
            expanded_module_id,
            selected_submodule_id: None,
        }
    }

    /// Membership in the expanded module is not checked here: the sidebar only offers the
    /// expanded module's submodules.
    pub fn select_submodule(self, submodule_id: i32) -> Self {
        Self {
            selected_submodule_id: Some(submodule_id),
            ..self
        }
    }

    pub fn clear() -> Self {
        Self::default()
    }

    /// Reads the persisted ids. Absent or non-integer values count as no selection.
    pub fn restore<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            expanded_module_id: parse_id(store.get(EXPANDED_MODULE_KEY)),
            selected_submodule_id: parse_id(store.get(SELECTED_SUBMODULE_KEY)),
        }
    }

    /// Mirrors the state into storage: set keys for present ids, remove keys for absent ones.
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        write_id(store, EXPANDED_MODULE_KEY, self.expanded_module_id);
        write_id(store, SELECTED_SUBMODULE_KEY, self.selected_submodule_id);
    }

    /// Drops ids that do not exist in `modules`: an unknown expanded module collapses
    /// (losing the selection), and a selection outside the expanded module is cleared.
    pub fn reconcile(self, modules: &[Module]) -> Self {
        let Some(module) = self.expanded_module(modules) else {
            return Self::clear();
        };
        let selection_valid = self
            .selected_submodule_id
            .is_some_and(|id| module.submodules.iter().any(|s| s.id == id));
        Self {
            expanded_module_id: Some(module.id),
            selected_submodule_id: if selection_valid {
                self.selected_submodule_id
            } else {
                None
            },
        }
    }

    pub fn expanded_module<'a>(&self, modules: &'a [Module]) -> Option<&'a Module> {
        let id = self.expanded_module_id?;
        modules.iter().find(|m| m.id == id)
    }

    /// The selected submodule, looked up only within the expanded module.
    pub fn selected_submodule<'a>(&self, modules: &'a [Module]) -> Option<&'a Submodule> {
        let id = self.selected_submodule_id?;
        self.expanded_module(modules)?
            .submodules
            .iter()
            .find(|s| s.id == id)
    }
}

pub(crate) fn parse_id(raw: Option<String>) -> Option<i32> {
    raw?.trim().parse().ok()
}

fn write_id<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, id: Option<i32>) {
    match id {
        Some(id) => store.set(key, &id.to_string()),
        None => store.remove(key),
    }
}
