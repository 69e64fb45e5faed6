//! Navigation dashboard.
//!
//! Fetches the role's menu tree from `GET /api/menu/{role_id}`, keeps expand/select state in a
//! `KeyValueStore` so it survives a reload, and maps the selected submodule to a view.

pub mod navigation;
pub mod render;
pub mod session;
pub mod source;
pub mod store;
pub mod views;

pub use navigation::NavigationState;
pub use render::{Content, Screen, SidebarEntry, SidebarLeaf};
pub use session::{AuthContext, StaticSession};
pub use source::{ClientError, HttpMenuSource, MenuSource};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use views::{Panel, SubmoduleView, ViewRegistry, ViewSlot, title_case};

use crate::models::Module;
use std::sync::Arc;
use tokio::task::JoinHandle;

type FetchResult = Result<Vec<Module>, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading { role_id: i32 },
    Ready,
    Error(String),
}

/// FetchTicket
///
/// Identifies one menu fetch. Only the ticket carrying the latest generation may update
/// the dashboard; anything older has been superseded by a role change or a logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub role_id: i32,
    pub generation: u64,
}

/// Dashboard
///
/// Owns the menu, the navigation state and the in-flight fetch. Generic over where state is
/// persisted (`S`) and who is signed in (`A`).
pub struct Dashboard<S: KeyValueStore, A: AuthContext> {
    store: S,
    auth: A,
    source: Arc<dyn MenuSource>,
    registry: ViewRegistry,
    modules: Vec<Module>,
    nav: NavigationState,
    phase: LoadPhase,
    // Role of the most recently requested menu.
    role_id: Option<i32>,
    generation: u64,
    in_flight: Option<(FetchTicket, JoinHandle<FetchResult>)>,
}

impl<S: KeyValueStore, A: AuthContext> Dashboard<S, A> {
    pub fn new(store: S, auth: A, source: Arc<dyn MenuSource>) -> Self {
        Self::with_registry(store, auth, source, ViewRegistry::standard())
    }

    pub fn with_registry(
        store: S,
        auth: A,
        source: Arc<dyn MenuSource>,
        registry: ViewRegistry,
    ) -> Self {
        Self {
            store,
            auth,
            source,
            registry,
            modules: Vec::new(),
            nav: NavigationState::default(),
            phase: LoadPhase::Idle,
            role_id: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn navigation(&self) -> NavigationState {
        self.nav
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn auth(&self) -> &A {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut A {
        &mut self.auth
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight.as_ref().map(|(ticket, _)| *ticket)
    }

    pub fn into_store(self) -> S {
        if let Some((_, handle)) = &self.in_flight {
            handle.abort();
        }
        self.store
    }

    /// First load: reads the session and waits for the menu.
    pub async fn mount(&mut self) {
        self.sync_session();
        self.settle().await;
    }

    /// Brings the dashboard in line with the auth collaborator. Records the signed-in
    /// user's id under `id_admin` and starts a fetch if the role is new. Without a user the
    /// menu is dropped.
    pub fn sync_session(&mut self) {
        match self.auth.user() {
            Some(user) => {
                self.store
                    .set(store::ADMIN_ID_KEY, &user.id.to_string());
                if self.role_id != Some(user.role_id) {
                    self.start_fetch(user.role_id);
                }
            }
            None => {
                self.cancel_in_flight();
                self.reset();
            }
        }
    }

    /// Spawns the fetch for `role_id`, aborting whichever fetch was running.
    pub fn start_fetch(&mut self, role_id: i32) -> FetchTicket {
        self.cancel_in_flight();

        self.generation += 1;
        let ticket = FetchTicket {
            role_id,
            generation: self.generation,
        };

        tracing::debug!(role_id, generation = ticket.generation, "fetching menu");

        let source = Arc::clone(&self.source);
        let handle = tokio::spawn(async move { source.fetch_menu(role_id).await });

        self.in_flight = Some((ticket, handle));
        self.role_id = Some(role_id);
        self.phase = LoadPhase::Loading { role_id };
        ticket
    }

    /// Waits for the in-flight fetch, if any, and applies its result.
    pub async fn settle(&mut self) {
        let Some((ticket, handle)) = self.in_flight.take() else {
            return;
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ClientError::Cancelled),
            Err(e) => Err(ClientError::Task(e.to_string())),
        };

        self.apply(ticket, result);
    }

    /// Applies a fetch result. Returns `false` when the ticket has been superseded, in which
    /// case nothing changes.
    pub fn apply(&mut self, ticket: FetchTicket, result: FetchResult) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                role_id = ticket.role_id,
                generation = ticket.generation,
                current = self.generation,
                "discarding superseded menu fetch"
            );
            return false;
        }

        match result {
            Ok(modules) => {
                self.modules = modules;
                self.phase = LoadPhase::Ready;
                self.restore_navigation();
            }
            Err(e) => {
                tracing::error!(role_id = ticket.role_id, "menu fetch failed: {}", e);
                self.modules.clear();
                self.phase = LoadPhase::Error(e.to_string());
            }
        }
        true
    }

    /// Reloads the persisted navigation and drops ids that the current menu does not have,
    /// from memory and from the store.
    pub fn restore_navigation(&mut self) {
        let restored = NavigationState::restore(&self.store);
        self.nav = restored.reconcile(&self.modules);
        if self.nav != restored {
            tracing::debug!(?restored, kept = ?self.nav, "dropping stale navigation ids");
        }
        self.nav.persist(&mut self.store);
    }

    pub fn toggle_module(&mut self, module_id: i32) {
        self.nav = self.nav.toggle_module(module_id);
        self.nav.persist(&mut self.store);
    }

    pub fn select_submodule(&mut self, submodule_id: i32) {
        self.nav = self.nav.select_submodule(submodule_id);
        self.nav.persist(&mut self.store);
    }

    /// Ends the session: aborts the fetch, wipes the whole store and signs out.
    pub fn logout(&mut self) {
        self.cancel_in_flight();
        // Late results from before the logout must not land.
        self.generation += 1;
        self.store.clear();
        self.auth.logout();
        self.reset();
        tracing::info!("signed out");
    }

    /// Id attributed to actions taken in views: the live session's user, else the last
    /// recorded administrator.
    pub fn admin_identity(&self) -> Option<i32> {
        self.auth
            .user()
            .map(|user| user.id)
            .or_else(|| navigation::parse_id(self.store.get(store::ADMIN_ID_KEY)))
    }

    pub fn render(&self) -> Screen {
        let sidebar = self
            .modules
            .iter()
            .map(|module| {
                let expanded = self.nav.expanded_module_id == Some(module.id);
                let children = if expanded {
                    module
                        .submodules
                        .iter()
                        .map(|sub| SidebarLeaf {
                            id: sub.id,
                            title: title_case(&sub.name),
                            icon: sub.icon.clone(),
                            selected: self.nav.selected_submodule_id == Some(sub.id),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                SidebarEntry {
                    id: module.id,
                    title: title_case(&module.name),
                    icon: module.icon.clone(),
                    expanded,
                    children,
                }
            })
            .collect();

        Screen {
            sidebar,
            content: self.content(),
        }
    }

    fn content(&self) -> Content {
        match &self.phase {
            LoadPhase::Idle => return Content::Welcome,
            LoadPhase::Loading { .. } => return Content::Loading,
            LoadPhase::Error(message) => {
                return Content::Failed {
                    message: message.clone(),
                };
            }
            LoadPhase::Ready => {}
        }

        let Some(submodule) = self.nav.selected_submodule(&self.modules) else {
            return Content::Welcome;
        };

        let slot = self.registry.resolve(&submodule.name);
        let panel = slot.render(self.admin_identity());
        match slot {
            ViewSlot::Mapped(_) => Content::View {
                submodule: submodule.name.clone(),
                panel,
            },
            ViewSlot::Unmapped { .. } => Content::Placeholder(panel),
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some((ticket, handle)) = self.in_flight.take() {
            handle.abort();
            tracing::debug!(
                role_id = ticket.role_id,
                generation = ticket.generation,
                "aborted menu fetch"
            );
        }
    }

    fn reset(&mut self) {
        self.modules.clear();
        self.nav = NavigationState::default();
        self.phase = LoadPhase::Idle;
        self.role_id = None;
    }
}
