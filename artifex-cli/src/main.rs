//! Artifex Table: browse the artwork catalogue page by page and build a
//! selection that spans pages.

mod command;
mod paths;
mod render;

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use artifex_lib::ArticClient;
use artifex_lib::DEFAULT_PAGE_SIZE;
use artifex_lib::DEFAULT_SELECTION_KEY;
use artifex_lib::TableConfig;
use artifex_lib::api::DEFAULT_BASE_URL;
use artifex_lib::api::MemorySource;
use artifex_lib::api::PageSource;
use artifex_lib::error::BulkSelectError;
use artifex_lib::store::InMemoryStorage;
use artifex_lib::store::SelectionStore;
use artifex_lib::store::SqliteStorage;
use artifex_lib::store::StorageBackend;
use artifex_lib::table::TableSession;
use clap::Parser;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use command::Command;

#[derive(Debug, Parser)]
#[command(name = "artifex", version, about = "Paginated artwork table with cross-page selection")]
struct Args {
    /// Rows per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Base URL of the artworks API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Storage key the selection is persisted under
    #[arg(long, default_value = DEFAULT_SELECTION_KEY)]
    key: String,

    /// SQLite file holding the selection (defaults to the user data directory)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep the selection in memory for this session only
    #[arg(long, conflicts_with = "db")]
    no_persist: bool,

    /// Serve this many generated rows instead of calling the API
    #[arg(long, value_name = "ROWS")]
    offline: Option<usize>,

    /// Delay every offline request by this many milliseconds
    #[arg(long, value_name = "MS", requires = "offline")]
    latency_ms: Option<u64>,

    /// Log level written to the log file
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("engine error: {0}")]
    Engine(#[from] artifex_lib::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<artifex_lib::error::ApiError> for CliError {
    fn from(err: artifex_lib::error::ApiError) -> Self {
        Self::Engine(err.into())
    }
}

impl From<artifex_lib::error::StorageError> for CliError {
    fn from(err: artifex_lib::error::StorageError) -> Self {
        Self::Engine(err.into())
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.log_level);

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(e) => eprintln!("Warning: cannot write log file {}: {}", path.display(), e),
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let config = TableConfig::new()
        .with_page_size(args.page_size)
        .with_base_url(args.base_url)
        .with_storage_key(args.key);

    let source: Arc<dyn PageSource> = match args.offline {
        Some(rows) => {
            log::info!("Serving {} generated rows", rows);
            let source = MemorySource::generated(rows, config.page_size);
            Arc::new(match args.latency_ms {
                Some(ms) => source.with_latency(Duration::from_millis(ms)),
                None => source,
            })
        }
        None => Arc::new(ArticClient::from_config(&config)?),
    };

    let backend = open_backend(args.no_persist, args.db).await?;
    let store = SelectionStore::new(backend, config.storage_key.clone());

    let mut session = TableSession::open(source, Some(store)).await;
    redraw(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(cmd) => execute(&mut session, cmd).await,
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}

async fn open_backend(
    no_persist: bool,
    db: Option<PathBuf>,
) -> Result<Arc<dyn StorageBackend>, CliError> {
    if no_persist {
        return Ok(Arc::new(InMemoryStorage::new()));
    }
    let Some(path) = db.or_else(paths::selection_db) else {
        log::warn!("No data directory available, selection will not be persisted");
        return Ok(Arc::new(InMemoryStorage::new()));
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    log::info!("Persisting selection to {}", path.display());
    Ok(Arc::new(SqliteStorage::open(&path).await?))
}

async fn execute(session: &mut TableSession, cmd: Command) {
    match cmd {
        Command::Next => {
            let window = session.window();
            // Unknown totals: let the request decide.
            if window.total_pages > 0 && !window.has_next_page() {
                println!("already on the last page");
                return;
            }
            session.next_page().await;
            redraw(session);
        }
        Command::Prev => {
            if !session.window().has_prev_page() {
                println!("already on the first page");
                return;
            }
            session.prev_page().await;
            redraw(session);
        }
        Command::Goto(page) => {
            session.go_to(page).await;
            redraw(session);
        }
        Command::Reload => {
            session.reload().await;
            redraw(session);
        }
        Command::Toggle(ids) => {
            for id in &ids {
                if session.toggle(id).await.is_none() {
                    println!("row {} is not on this page", id);
                }
            }
            redraw(session);
        }
        Command::Select(input) => {
            session.set_bulk_input(input);
            match session.submit_bulk_input().await {
                Ok(outcome) => {
                    println!(
                        "selected {} rows ({} new, {} pages fetched)",
                        outcome.selected, outcome.newly_selected, outcome.pages_fetched
                    );
                    if outcome.exhausted {
                        println!("only {} rows remain from this page on", outcome.selected);
                    }
                    redraw(session);
                }
                Err(BulkSelectError::InvalidInput(msg)) => println!("{}", msg),
                Err(e) => {
                    println!("{}", e);
                    if e.partial_outcome().is_some() {
                        redraw(session);
                    }
                }
            }
        }
        Command::Clear => {
            session.clear().await;
            redraw(session);
        }
        Command::List => {
            let selection = session.selection();
            if selection.is_empty() {
                println!("nothing selected");
            } else {
                let ids: Vec<String> = selection.ids().map(|id| id.to_string()).collect();
                println!("{} selected: {}", ids.len(), ids.join(", "));
            }
        }
        Command::Show => redraw(session),
        Command::Help => println!("{}", command::HELP),
        Command::Quit => {}
    }
}

fn redraw(session: &TableSession) {
    let view = session.view();
    println!("{}", render::render_table(&view, session.selection().len()));
}
