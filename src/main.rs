use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use episode_search::{
    build, url_state, ConfigError, HttpBackend, ResultsView, SearchQuery, SearchSession,
    SessionConfig, SessionStatus, FIRST_PAGE_LIMIT, PAGE_SIZE,
};

mod cli;
use cli::display::{self, themed, Accent};
use cli::{BackendArgs, Cli, Commands, UrlCommands};

const LOG_ENV: &str = "EPISODE_SEARCH_LOG";

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// The session ended in an error; the view already explained it.
    #[error("search failed")]
    Search,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            query,
            pages,
            backend,
        } => run_session(&backend, "", Start::Search(query.to_query(), pages)).await,
        Commands::Open {
            query_string,
            backend,
        } => run_session(&backend, &query_string, Start::Restore).await,
        Commands::Url { command } => run_url(command),
        Commands::Request {
            query,
            base_url,
            offset,
        } => {
            let base_url = base_url.unwrap_or_else(|| SessionConfig::default().base_url);
            let limit = if offset.is_some() { PAGE_SIZE } else { FIRST_PAGE_LIMIT };
            println!("{}", build(&query.to_query(), limit, offset).url(&base_url));
            Ok(())
        }
    };

    match result {
        Ok(()) => {}
        Err(CliError::Search) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(args: &BackendArgs) -> Result<SessionConfig, CliError> {
    let config = match &args.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    let mut config = config.apply_env()?;

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }
    config.validate()?;
    Ok(config)
}

/// How a session gets its results.
enum Start {
    /// Search, then load up to this many extra pages.
    Search(SearchQuery, usize),
    /// Run whatever the mounted URL describes.
    Restore,
}

async fn run_session(args: &BackendArgs, url_query: &str, start: Start) -> Result<(), CliError> {
    let config = load_config(args)?;
    let backend = HttpBackend::new(&config.base_url);
    let policy = config.sanitize;
    let mut session = SearchSession::mount(config, backend, url_query);

    match start {
        Start::Search(query, pages) => {
            session.search(query).await;
            for _ in 0..pages {
                if !session.state().can_load_more() {
                    break;
                }
                session.load_more().await;
            }
        }
        Start::Restore => {
            session.restore().await;
        }
    }

    let view = ResultsView::from_state(session.state(), &session.draft().text, policy);
    display::print_view(&view, args.raw_html);

    let location = session.location();
    if !location.is_empty() {
        println!("  {} {}", themed(Accent::Gray, &[], "Share:"), themed(Accent::Blue, &[], &location));
    }
    let status = session.state().status();
    println!("  {}", display::status_badge(status));

    session.teardown();
    match status {
        SessionStatus::Error(_) => Err(CliError::Search),
        _ => Ok(()),
    }
}

fn run_url(command: UrlCommands) -> Result<(), CliError> {
    match command {
        UrlCommands::Encode { query } => {
            let query_string = url_state::encode("", &url_state::to_changes(&query.to_query()));
            println!("{}", url_state::location(&query_string));
        }
        UrlCommands::Decode { query_string } => {
            let query = url_state::decode(&query_string);
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
    }
    Ok(())
}
