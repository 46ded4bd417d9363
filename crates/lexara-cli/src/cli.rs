//! CLI definition and command dispatch.
//!
//! Configuration precedence, highest to lowest: CLI flags > config file >
//! built-in defaults. There is no environment-variable layer for this
//! surface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lexara_core::{Engine, SearchMode, SearchOptions};
use lexara_store::HeedStore;

use crate::config::FileConfig;
use crate::http;

const DEFAULT_DATA_DIR: &str = "./data/search.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Lexara - a single-node full-text search engine.
#[derive(Parser, Debug)]
#[command(name = "lexara")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an optional TOML config file (default: ~/.lexara/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the backing store (default: ./data/search.db).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Insert or replace a document.
    Insert {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Search the index.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = true)]
        ranked: bool,
        #[arg(long, value_parser = parse_mode, default_value = "and")]
        mode: SearchMode,
    },
    /// Fetch a single document by id.
    Get {
        #[arg(long)]
        id: String,
    },
    /// Delete a document by id.
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Print index statistics.
    Stats,
}

fn parse_mode(value: &str) -> Result<SearchMode, String> {
    match value {
        "and" => Ok(SearchMode::And),
        "or" => Ok(SearchMode::Or),
        other => Err(format!("unknown mode '{other}', expected 'and' or 'or'")),
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = format!("lexara_core={log_level},lexara_store={log_level},lexara_cli={log_level}");
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let config_path = cli.config.clone().or_else(FileConfig::default_path);
    let file_config = match config_path.as_deref().map(FileConfig::load) {
        Some(Ok(config)) => config,
        Some(Err(e)) => {
            eprintln!("error: failed to read config file: {e}");
            return ExitCode::FAILURE;
        }
        None => FileConfig::default(),
    };

    let data_dir = cli
        .data_dir
        .or(file_config.data_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    match dispatch(cli.command, &data_dir, &file_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command, data_dir: &std::path::Path, file_config: &FileConfig) -> anyhow::Result<()> {
    match command {
        Command::Serve { host, port } => {
            let host = host.or_else(|| file_config.host.clone()).unwrap_or_else(|| DEFAULT_HOST.to_string());
            let port = port.or(file_config.port).unwrap_or(DEFAULT_PORT);

            let store = HeedStore::open(data_dir)?;
            let engine = std::sync::Arc::new(Engine::open(store)?);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(http::serve(engine, &host, port))?;
            Ok(())
        }
        Command::Insert { id, title, content, url } => {
            let engine = open_engine(data_dir)?;
            engine.upsert(lexara_core::Document {
                id,
                title,
                content,
                url,
                metadata: None,
                created_at: 0,
                updated_at: 0,
            })?;
            println!("inserted");
            Ok(())
        }
        Command::Search { query, limit, ranked, mode } => {
            let engine = open_engine(data_dir)?;
            let result = engine.search(
                &query,
                SearchOptions {
                    mode,
                    use_ranking: ranked,
                    limit,
                    offset: 0,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&to_json(&result))?);
            Ok(())
        }
        Command::Get { id } => {
            let engine = open_engine(data_dir)?;
            match engine.get(&id)? {
                Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
                None => println!("not found"),
            }
            Ok(())
        }
        Command::Delete { id } => {
            let engine = open_engine(data_dir)?;
            engine.delete(&id)?;
            println!("deleted");
            Ok(())
        }
        Command::Stats => {
            let engine = open_engine(data_dir)?;
            let stats = engine.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

fn open_engine(data_dir: &std::path::Path) -> anyhow::Result<Engine<HeedStore>> {
    let store = HeedStore::open(data_dir)?;
    Ok(Engine::open(store)?)
}

fn to_json(result: &lexara_core::SearchResponse) -> serde_json::Value {
    serde_json::json!({
        "documents": result.documents,
        "total": result.total,
        "scores": result.scores,
    })
}
