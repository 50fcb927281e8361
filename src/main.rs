use agilityctl::{
    api::ApiClient,
    config::AppConfig,
    navigation::{HistoryNavigator, Route},
    openauth::{self, CodeLoginOutcome, GuardDecision, KeyringStore, MemoryStore, RouteGuard, TokenStore},
    toolkit::Notice,
    Error,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum App {
    Acs,
    OpenIam,
}

#[derive(Parser, Debug)]
#[command(name = "agilityctl", about = "OpenAuth session tooling for the ACS and OpenIAM consoles")]
struct Cli {
    /// Which console's built-in configuration to start from.
    #[arg(long, value_enum, default_value = "acs")]
    app: App,

    /// JSON configuration file, replacing the built-in one.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the token in memory for this invocation only, instead of the OS keyring.
    #[arg(long)]
    memory_store: bool,

    /// The page the user is currently on; defaults to the index URL.
    #[arg(long)]
    current_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print where an unauthenticated user is sent.
    LoginUrl,
    /// Run the route guard for a navigation to the named route.
    Guard {
        route: String,
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Exchange an authorization code for a session token.
    CodeLogin { code: String },
    /// Report whether a session token is stored.
    Status,
    /// Forget the stored token.
    SignOut,
    /// Send a GET request through the session interceptors.
    Get {
        path: String,
        /// Query parameters as `key=value`.
        #[arg(short, long = "query")]
        query: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, Error> {
    let config = match (&cli.config, cli.app) {
        (Some(path), _) => AppConfig::from_file(path)?,
        (None, App::Acs) => AppConfig::acs(),
        (None, App::OpenIam) => AppConfig::open_iam(),
    };
    config.with_env_overrides()
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = load_config(&cli)?;
    let store: Arc<dyn TokenStore> = if cli.memory_store {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(KeyringStore::new(&config)?)
    };
    let current_url = cli
        .current_url
        .clone()
        .unwrap_or_else(|| config.index_url.clone());
    let navigator = Arc::new(HistoryNavigator::new(current_url));
    let client = ApiClient::new(config, store, navigator.clone())?;

    match cli.command {
        Command::LoginUrl => {
            println!("{}", openauth::login_navigation(client.config())?);
        }
        Command::Guard { route, path } => {
            let guard = RouteGuard::new(client);
            match guard.before_each(&Route::named(&route, &path)).await? {
                GuardDecision::Proceed => println!("proceed to {route}"),
                GuardDecision::Navigate(navigation) => println!("{navigation}"),
                // Already recorded by the navigator; printed below.
                GuardDecision::Handled(_) => println!("handled by the session interceptors"),
            }
        }
        Command::CodeLogin { code } => match openauth::code_login(&client, &code).await? {
            CodeLoginOutcome::LoggedIn(navigation) => println!("logged in, {navigation}"),
            CodeLoginOutcome::Intercepted(_) => println!("the backend refused the session"),
            CodeLoginOutcome::Rejected => println!("no token was issued for this code"),
        },
        Command::Status => {
            let state = if client.store().get()?.is_some() {
                "present"
            } else {
                "absent"
            };
            println!("{} token: {state}", client.config().app_token_name);
        }
        Command::SignOut => {
            println!("{}", openauth::sign_out(client.config(), client.store())?);
        }
        Command::Get { path, query } => {
            let pairs = parse_query(&query)?;
            let envelope = client.get(&path, &pairs).await?;

            let notice = Notice::from_envelope(&envelope, Notice::DEFAULT_SECONDS);
            println!("{}", serde_json::to_string_pretty(&notice)?);
            println!("{}", serde_json::to_string_pretty(&envelope.data)?);
        }
    }

    // Anything the interceptors asked for along the way.
    for navigation in navigator.take() {
        println!("navigated: {navigation}");
    }
    Ok(())
}

fn parse_query(pairs: &[String]) -> Result<Vec<(&str, &str)>, Error> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| Error::Config(format!("query parameter must be key=value: {pair}")))
        })
        .collect()
}
