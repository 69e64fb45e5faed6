use clap::{Parser, Subcommand};
use movieflow::dashboard::{Dashboard, FileStore, HttpMenuSource, MenuSource, StaticSession};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "dashboard",
    version,
    about = "MovieFlow navigation dashboard: renders the menu assigned to a role"
)]
struct Args {
    /// Base URL of the MovieFlow API
    #[arg(long, env = "MOVIEFLOW_API_URL", default_value = "http://localhost:3001")]
    api_url: String,

    /// Id of the signed-in user
    #[arg(long, requires = "role_id")]
    user_id: Option<i32>,

    /// Role of the signed-in user
    #[arg(long, requires = "user_id")]
    role_id: Option<i32>,

    /// Where navigation state is kept between runs
    #[arg(long, default_value = ".movieflow-dashboard.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the dashboard (default)
    Show,
    /// Expand a module, or collapse it if it is already expanded
    Toggle { module_id: i32 },
    /// Select a submodule of the expanded module
    Select { submodule_id: i32 },
    /// Sign out and wipe the persisted state
    Logout,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movieflow=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let session = match (args.user_id, args.role_id) {
        (Some(user_id), Some(role_id)) => StaticSession::signed_in(user_id, role_id),
        _ => StaticSession::anonymous(),
    };
    let store = FileStore::open(&args.state_file);
    tracing::debug!("navigation state kept in {}", store.path().display());
    let source = Arc::new(HttpMenuSource::new(args.api_url)) as Arc<dyn MenuSource>;

    let mut dashboard = Dashboard::new(store, session, source);
    dashboard.mount().await;

    match args.command.unwrap_or(Command::Show) {
        Command::Show => {}
        Command::Toggle { module_id } => dashboard.toggle_module(module_id),
        Command::Select { submodule_id } => dashboard.select_submodule(submodule_id),
        Command::Logout => {
            dashboard.logout();
            println!("Signed out.");
            return;
        }
    }

    print!("{}", dashboard.render());
}
