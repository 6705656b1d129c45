//! Veil - a static file server that keeps dotfiles and bare directories private
//!
//! This is the main entry point for the Veil CLI.

mod server;

use clap::{Parser, Subcommand};
use include_dir::{Dir, include_dir};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use veil_core::config::{ConfigLoader, VeilConfig};
use veil_core::server::Handler;
use veil_static::{DirStore, EmbeddedStore, FileStore};

/// Site bundled into the binary, served when no root directory is given
static BUNDLE: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/files");

/// Veil - serve static files without leaking dotfiles or directory listings
#[derive(Parser)]
#[command(name = "veil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve files over HTTP
    Serve {
        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to listen on, e.g. 127.0.0.1:5000 or :8080
        #[arg(long)]
        listen: Option<String>,

        /// Directory to serve instead of the embedded bundle
        #[arg(long)]
        root: Option<PathBuf>,

        /// Skip logging the served tree at startup
        #[arg(long)]
        no_list: bool,
    },

    /// Print the tree of files a store holds
    List {
        /// Directory to list instead of the embedded bundle
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        config: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            listen,
            root,
            no_list,
        } => {
            let mut config = match config {
                Some(path) => ConfigLoader::load(path)?,
                None => VeilConfig::default(),
            };
            if let Some(listen) = listen {
                config.listen = listen;
            }
            if root.is_some() {
                config.root = root;
            }
            if no_list {
                config.list_on_start = false;
            }

            init_tracing(&config.logging.level, cli.verbose);
            tokio::runtime::Runtime::new()?.block_on(run_server(config))?;
        }

        Commands::List { root } => {
            init_tracing("warn", cli.verbose);
            let store = open_store(root.as_deref())?;
            let lines = tokio::runtime::Runtime::new()?.block_on(veil_static::list_tree(&store))?;
            for line in lines {
                println!("{}", line);
            }
        }

        Commands::Validate { config } => {
            init_tracing("warn", cli.verbose);
            match ConfigLoader::load(&config) {
                Ok(c) => {
                    if let Some(root) = &c.root {
                        DirStore::new(root)?;
                    }
                    println!("✅ Configuration '{}' is valid!", config.display());
                }
                Err(e) => {
                    eprintln!("❌ Configuration Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Veil v{}", veil_core::VERSION);
        }
    }

    Ok(())
}

fn init_tracing(level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(level)
        }
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

/// Pick the backing store: a live directory when a root is given, the embedded bundle otherwise
fn open_store(root: Option<&Path>) -> veil_core::Result<Arc<dyn FileStore>> {
    match root {
        Some(root) => {
            let store = DirStore::new(root)?;
            tracing::info!("📁 Serving directory {}", store.root().display());
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("📦 Serving embedded bundle");
            Ok(Arc::new(EmbeddedStore::new(&BUNDLE)))
        }
    }
}

async fn run_server(config: VeilConfig) -> veil_core::Result<()> {
    tracing::info!("🚀 Starting Veil v{}", veil_core::VERSION);

    let store = open_store(config.root.as_deref())?;

    if config.list_on_start {
        match veil_static::list_tree(&store).await {
            Ok(lines) => {
                for line in lines {
                    tracing::info!("  {}", line);
                }
            }
            Err(e) => tracing::warn!("⚠️ Could not list files: {}", e),
        }
    }

    let handler: Arc<dyn Handler> = Arc::new(veil_static::secure_handler(store));
    server::run(&config.listen_addr(), handler).await
}
