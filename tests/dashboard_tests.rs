mod common;

use async_trait::async_trait;
use common::{ADMIN_ROLE, seeded_repo, state_with};
use movieflow::{
    MemoryRepository, create_router,
    dashboard::{
        AuthContext, ClientError, Content, Dashboard, FileStore, HttpMenuSource, KeyValueStore,
        LoadPhase, MemoryStore, MenuSource, NavigationState, Panel, StaticSession,
        SubmoduleView, ViewRegistry, ViewSlot,
        store::{ADMIN_ID_KEY, EXPANDED_MODULE_KEY, SELECTED_SUBMODULE_KEY},
        title_case,
        views::PLACEHOLDER_TEXT,
    },
    models::{Module, SessionUser, Submodule},
};
use serde_json::json;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{net::TcpListener, sync::Notify};

// --- Menu Sources ---

/// Serves canned menus per role and counts calls.
#[derive(Default)]
struct StubSource {
    menus: HashMap<i32, Vec<Module>>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubSource {
    fn with(role_id: i32, menu: Vec<Module>) -> Self {
        let mut source = Self::default();
        source.menus.insert(role_id, menu);
        source
    }
}

#[async_trait]
impl MenuSource for StubSource {
    async fn fetch_menu(&self, role_id: i32) -> Result<Vec<Module>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Status(500));
        }
        Ok(self.menus.get(&role_id).cloned().unwrap_or_default())
    }
}

/// Fetches for `slow_role` park until released; every other role answers at once.
struct GatedSource {
    slow_role: i32,
    gate: Arc<Notify>,
    inner: StubSource,
}

#[async_trait]
impl MenuSource for GatedSource {
    async fn fetch_menu(&self, role_id: i32) -> Result<Vec<Module>, ClientError> {
        if role_id == self.slow_role {
            self.gate.notified().await;
        }
        self.inner.fetch_menu(role_id).await
    }
}

// --- Fixtures ---

fn module(id: i32, name: &str, submodules: &[(i32, &str)]) -> Module {
    Module {
        id,
        name: name.to_string(),
        icon: format!("fa-{}", name),
        submodules: submodules
            .iter()
            .map(|(id, name)| Submodule {
                id: *id,
                name: name.to_string(),
                icon: format!("fa-{}", name),
            })
            .collect(),
    }
}

fn admin_menu() -> Vec<Module> {
    vec![
        module(1, "usuarios", &[(10, "registrar_usuarios"), (11, "asignacion_de_modulos")]),
        module(2, "catalogo", &[(20, "peliculas"), (21, "categorias")]),
        module(5, "reportes", &[(50, "reportes_avanzados")]),
    ]
}

async fn mounted(
    store: MemoryStore,
    source: StubSource,
) -> Dashboard<MemoryStore, StaticSession> {
    let mut dashboard = Dashboard::new(
        store,
        StaticSession::signed_in(1, ADMIN_ROLE),
        Arc::new(source),
    );
    dashboard.mount().await;
    dashboard
}

// --- Navigation ---

#[test]
fn test_toggle_twice_is_identity() {
    let start = NavigationState::default();
    assert_eq!(start.toggle_module(3).toggle_module(3), start);
}

#[test]
fn test_toggle_other_module_drops_selection() {
    let state = NavigationState::default()
        .toggle_module(1)
        .select_submodule(10)
        .toggle_module(2);
    assert_eq!(state.expanded_module_id, Some(2));
    assert_eq!(state.selected_submodule_id, None);
}

#[tokio::test]
async fn test_toggle_twice_restores_memory_and_storage() {
    let mut dashboard = mounted(MemoryStore::new(), StubSource::with(ADMIN_ROLE, admin_menu())).await;
    let nav_before = dashboard.navigation();
    let store_before = dashboard.store().clone();

    dashboard.toggle_module(1);
    assert_eq!(dashboard.store().get(EXPANDED_MODULE_KEY).as_deref(), Some("1"));
    dashboard.toggle_module(1);

    assert_eq!(dashboard.navigation(), nav_before);
    assert_eq!(dashboard.store(), &store_before);
}

#[tokio::test]
async fn test_switching_module_clears_selection_everywhere() {
    let mut dashboard = mounted(MemoryStore::new(), StubSource::with(ADMIN_ROLE, admin_menu())).await;

    dashboard.toggle_module(1);
    dashboard.select_submodule(10);
    assert_eq!(dashboard.store().get(SELECTED_SUBMODULE_KEY).as_deref(), Some("10"));

    dashboard.toggle_module(2);

    assert_eq!(dashboard.navigation().selected_submodule_id, None);
    assert_eq!(dashboard.store().get(SELECTED_SUBMODULE_KEY), None);
    assert_eq!(dashboard.store().get(EXPANDED_MODULE_KEY).as_deref(), Some("2"));
}

#[tokio::test]
async fn test_expanded_module_survives_reload() {
    let mut dashboard = mounted(MemoryStore::new(), StubSource::with(ADMIN_ROLE, admin_menu())).await;
    dashboard.toggle_module(5);
    let store = dashboard.into_store();

    let reloaded = mounted(store, StubSource::with(ADMIN_ROLE, admin_menu())).await;

    assert_eq!(reloaded.navigation().expanded_module_id, Some(5));
    assert_eq!(reloaded.phase(), &LoadPhase::Ready);
}

#[tokio::test]
async fn test_stale_and_malformed_ids_are_dropped() {
    let mut store = MemoryStore::new();
    store.set(EXPANDED_MODULE_KEY, "99");
    store.set(SELECTED_SUBMODULE_KEY, "not-a-number");

    let dashboard = mounted(store, StubSource::with(ADMIN_ROLE, admin_menu())).await;

    assert_eq!(dashboard.navigation(), NavigationState::default());
    assert_eq!(dashboard.store().get(EXPANDED_MODULE_KEY), None);
    assert_eq!(dashboard.store().get(SELECTED_SUBMODULE_KEY), None);
}

#[tokio::test]
async fn test_selection_outside_expanded_module_is_dropped() {
    let mut store = MemoryStore::new();
    store.set(EXPANDED_MODULE_KEY, "1");
    store.set(SELECTED_SUBMODULE_KEY, "20");

    let dashboard = mounted(store, StubSource::with(ADMIN_ROLE, admin_menu())).await;

    assert_eq!(dashboard.navigation().expanded_module_id, Some(1));
    assert_eq!(dashboard.navigation().selected_submodule_id, None);
    assert_eq!(dashboard.store().get(SELECTED_SUBMODULE_KEY), None);
}

// --- Rendering ---

#[tokio::test]
async fn test_single_grant_scenario_mounts_registration_view() {
    let menu: Vec<Module> = serde_json::from_value(json!([{
        "id": 1,
        "name": "usuarios",
        "icon": "fa-users",
        "submodulos": [{ "id": 10, "name": "registrar_usuarios", "icon": "fa-user-plus" }]
    }]))
    .unwrap();

    let mut dashboard = Dashboard::new(
        MemoryStore::new(),
        StaticSession::signed_in(8, 2),
        Arc::new(StubSource::with(2, menu)),
    );
    dashboard.mount().await;
    assert_eq!(dashboard.store().get(ADMIN_ID_KEY).as_deref(), Some("8"));

    let screen = dashboard.render();
    assert_eq!(screen.content, Content::Welcome);
    assert!(screen.sidebar[0].children.is_empty(), "collapsed by default");

    dashboard.toggle_module(1);
    let screen = dashboard.render();
    assert!(screen.sidebar[0].expanded);
    assert_eq!(screen.sidebar[0].title, "Usuarios");
    assert_eq!(screen.sidebar[0].children[0].title, "Registrar Usuarios");

    dashboard.select_submodule(10);
    match dashboard.render().content {
        Content::View { submodule, panel } => {
            assert_eq!(submodule, "registrar_usuarios");
            assert_eq!(panel.title, "Registrar Usuarios");
            assert!(panel.body.contains(&"Administrator: 8".to_string()));
        }
        other => panic!("expected the registration view, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unmapped_submodule_renders_placeholder() {
    let mut dashboard = mounted(MemoryStore::new(), StubSource::with(ADMIN_ROLE, admin_menu())).await;
    dashboard.toggle_module(5);
    dashboard.select_submodule(50);

    let screen = dashboard.render();
    assert_eq!(
        screen.content,
        Content::Placeholder(Panel {
            title: "Reportes Avanzados".to_string(),
            body: vec![PLACEHOLDER_TEXT.to_string()],
        })
    );
    assert!(screen.to_string().contains("This view has no content assigned yet."));
}

#[tokio::test]
async fn test_fetch_failure_shows_error_with_empty_menu() {
    let source = StubSource {
        fail: true,
        ..StubSource::default()
    };
    let dashboard = mounted(MemoryStore::new(), source).await;

    assert!(dashboard.modules().is_empty());
    assert!(matches!(dashboard.phase(), LoadPhase::Error(_)));
    let screen = dashboard.render();
    assert!(matches!(screen.content, Content::Failed { .. }));
    assert!(screen.to_string().contains("status 500"));
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("registrar_usuarios"), "Registrar Usuarios");
    assert_eq!(title_case("asignacion_de_modulos"), "Asignacion De Modulos");
    assert_eq!(title_case("reportes"), "Reportes");
    assert_eq!(title_case(""), "");
}

struct EchoView;

impl SubmoduleView for EchoView {
    fn render(&self, admin_id: Option<i32>) -> Panel {
        Panel {
            title: "Echo".to_string(),
            body: vec![format!("{:?}", admin_id)],
        }
    }
}

#[test]
fn test_registry_lookup() {
    let registry = ViewRegistry::standard().register("peliculas", EchoView);

    assert!(registry.resolve("registrar_usuarios").is_mapped());
    assert!(registry.resolve("asignacion_de_modulos").is_mapped());
    assert_eq!(registry.resolve("peliculas").render(Some(3)).body, vec!["Some(3)"]);

    match registry.resolve("reportes_avanzados") {
        ViewSlot::Unmapped { title } => assert_eq!(title, "Reportes Avanzados"),
        ViewSlot::Mapped(_) => panic!("reportes_avanzados has no view"),
    }
}

// --- Session ---

#[tokio::test]
async fn test_admin_identity_falls_back_to_store() {
    let mut store = MemoryStore::new();
    store.set(ADMIN_ID_KEY, "3");

    let mut dashboard = Dashboard::new(
        store,
        StaticSession::anonymous(),
        Arc::new(StubSource::default()),
    );
    dashboard.mount().await;

    assert_eq!(dashboard.admin_identity(), Some(3));
    assert_eq!(dashboard.phase(), &LoadPhase::Idle);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let mut store = MemoryStore::new();
    store.set("unrelated", "value");
    let mut dashboard = mounted(store, StubSource::with(ADMIN_ROLE, admin_menu())).await;
    dashboard.toggle_module(1);
    dashboard.select_submodule(10);

    dashboard.logout();

    assert!(dashboard.store().is_empty());
    assert_eq!(dashboard.auth().user(), None);
    assert_eq!(dashboard.navigation(), NavigationState::default());
    assert!(dashboard.modules().is_empty());
    assert_eq!(dashboard.phase(), &LoadPhase::Idle);
    assert_eq!(dashboard.admin_identity(), None);
}

// --- Fetch lifecycle ---

#[tokio::test]
async fn test_role_change_discards_superseded_fetch() {
    let gate = Arc::new(Notify::new());
    let mut inner = StubSource::with(1, admin_menu());
    inner.menus.insert(2, vec![module(2, "catalogo", &[(20, "peliculas")])]);
    let source = GatedSource {
        slow_role: 1,
        gate: gate.clone(),
        inner,
    };

    let mut dashboard = Dashboard::new(
        MemoryStore::new(),
        StaticSession::signed_in(1, 1),
        Arc::new(source),
    );

    dashboard.sync_session();
    let stale = dashboard.in_flight().expect("role 1 fetch started");
    assert_eq!(dashboard.phase(), &LoadPhase::Loading { role_id: 1 });

    dashboard
        .auth_mut()
        .switch_user(Some(SessionUser { id: 1, role_id: 2 }));
    dashboard.sync_session();
    let current = dashboard.in_flight().expect("role 2 fetch started");
    assert!(current.generation > stale.generation);

    dashboard.settle().await;
    assert_eq!(dashboard.modules().len(), 1);
    assert_eq!(dashboard.modules()[0].name, "catalogo");

    // A late answer for role 1 changes nothing.
    assert!(!dashboard.apply(stale, Ok(admin_menu())));
    assert_eq!(dashboard.modules()[0].name, "catalogo");
    assert_eq!(dashboard.phase(), &LoadPhase::Ready);
    gate.notify_waiters();
}

#[tokio::test]
async fn test_same_role_does_not_refetch() {
    let source = Arc::new(StubSource::with(ADMIN_ROLE, admin_menu()));
    let mut dashboard = Dashboard::new(
        MemoryStore::new(),
        StaticSession::signed_in(1, ADMIN_ROLE),
        source.clone(),
    );

    dashboard.mount().await;
    dashboard.sync_session();
    dashboard.settle().await;

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_logout_aborts_in_flight_fetch() {
    let gate = Arc::new(Notify::new());
    let source = GatedSource {
        slow_role: 1,
        gate: gate.clone(),
        inner: StubSource::with(1, admin_menu()),
    };
    let mut dashboard = Dashboard::new(
        MemoryStore::new(),
        StaticSession::signed_in(1, 1),
        Arc::new(source),
    );

    dashboard.sync_session();
    let ticket = dashboard.in_flight().expect("fetch started");

    dashboard.logout();
    assert_eq!(dashboard.in_flight(), None);

    assert!(!dashboard.apply(ticket, Ok(admin_menu())));
    assert!(dashboard.modules().is_empty());
}

// --- Stores and sources ---

#[test]
fn test_file_store_persists_between_opens() {
    let path = std::env::temp_dir().join(format!("movieflow-dashboard-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let mut store = FileStore::open(&path);
    store.set(EXPANDED_MODULE_KEY, "2");
    store.set(ADMIN_ID_KEY, "1");
    store.remove(ADMIN_ID_KEY);

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.get(EXPANDED_MODULE_KEY).as_deref(), Some("2"));
    assert_eq!(reopened.get(ADMIN_ID_KEY), None);

    std::fs::write(&path, "{ not json").unwrap();
    let recovered = FileStore::open(&path);
    assert_eq!(recovered.get(EXPANDED_MODULE_KEY), None);

    let _ = std::fs::remove_file(&path);
}

async fn serve(repo: Arc<MemoryRepository>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let router = create_router(state_with(repo));

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_http_source_reads_menu_endpoint() {
    let fixture = seeded_repo().await;
    let address = serve(fixture.repo.clone()).await;

    let source = HttpMenuSource::new(format!("{}/", address));
    let menu = source.fetch_menu(ADMIN_ROLE).await.unwrap();

    assert_eq!(menu.len(), 2);
    assert_eq!(menu[0].submodules[0].name, "registrar_usuarios");
}

#[tokio::test]
async fn test_http_source_reports_status() {
    let address = serve(Arc::new(MemoryRepository::failing())).await;

    let result = HttpMenuSource::new(address).fetch_menu(1).await;
    assert!(matches!(result, Err(ClientError::Status(500))));
}
