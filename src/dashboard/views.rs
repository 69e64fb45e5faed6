use std::collections::HashMap;
use std::sync::Arc;

pub const PLACEHOLDER_TEXT: &str = "This view has no content assigned yet.";

/// title_case
///
/// Display form of a machine name: underscores become spaces and the first letter of every
/// word is upper-cased. The rest of each word is left as is.
///
/// `"registrar_usuarios"` → `"Registrar Usuarios"`.
pub fn title_case(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphanumeric() {
            if at_word_start {
                title.extend(ch.to_uppercase());
            } else {
                title.push(ch);
            }
            at_word_start = false;
        } else {
            title.push(ch);
            at_word_start = true;
        }
    }
    title
}

/// Panel
///
/// What a view puts in the content pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub body: Vec<String>,
}

/// SubmoduleView
///
/// A screen reachable from the sidebar. Views receive the acting administrator's id so that
/// whatever they submit can be attributed; `None` means no identity could be established.
pub trait SubmoduleView: Send + Sync {
    fn render(&self, admin_id: Option<i32>) -> Panel;
}

fn admin_line(admin_id: Option<i32>) -> String {
    match admin_id {
        Some(id) => format!("Administrator: {}", id),
        None => "Administrator: unknown".to_string(),
    }
}

/// Form for POST /api/usuarios.
pub struct RegisterUsersView;

impl SubmoduleView for RegisterUsersView {
    fn render(&self, admin_id: Option<i32>) -> Panel {
        Panel {
            title: title_case("registrar_usuarios"),
            body: vec![
                admin_line(admin_id),
                "Fields: name, email, role, estado".to_string(),
                "Submits to POST /api/usuarios".to_string(),
            ],
        }
    }
}

/// Grant editor for POST/DELETE /api/asignar-menu.
pub struct AssignModulesView;

impl SubmoduleView for AssignModulesView {
    fn render(&self, admin_id: Option<i32>) -> Panel {
        Panel {
            title: title_case("asignacion_de_modulos"),
            body: vec![
                admin_line(admin_id),
                "Pick a role, then tick the modules and submodules it may open".to_string(),
                "Catalog from GET /api/modulos, grants via /api/asignar-menu".to_string(),
            ],
        }
    }
}

/// ViewSlot
///
/// Outcome of a registry lookup. `Unmapped` is an ordinary answer, not an error: the
/// submodule exists in the menu but nobody has built its screen yet.
pub enum ViewSlot {
    Mapped(Arc<dyn SubmoduleView>),
    Unmapped { title: String },
}

impl ViewSlot {
    pub fn render(&self, admin_id: Option<i32>) -> Panel {
        match self {
            ViewSlot::Mapped(view) => view.render(admin_id),
            ViewSlot::Unmapped { title } => Panel {
                title: title.clone(),
                body: vec![PLACEHOLDER_TEXT.to_string()],
            },
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, ViewSlot::Mapped(_))
    }
}

/// ViewRegistry
///
/// Static mapping from submodule machine name to view.
#[derive(Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<String, Arc<dyn SubmoduleView>>,
}

impl ViewRegistry {
    /// The views shipped with the dashboard.
    pub fn standard() -> Self {
        Self::default()
            .register("registrar_usuarios", RegisterUsersView)
            .register("asignacion_de_modulos", AssignModulesView)
    }

    pub fn register(mut self, name: &str, view: impl SubmoduleView + 'static) -> Self {
        self.views.insert(name.to_string(), Arc::new(view));
        self
    }

    pub fn resolve(&self, name: &str) -> ViewSlot {
        match self.views.get(name) {
            Some(view) => ViewSlot::Mapped(Arc::clone(view)),
            None => ViewSlot::Unmapped {
                title: title_case(name),
            },
        }
    }
}
