use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use xedge_config::WorkflowDocument;
use xedge_fledge::{FledgeClient, FledgeConfig};
use xedge_plugin_registry::{BuiltinCatalog, FsPluginCatalog, PluginCatalog};
use xedge_server::AppState;
use xedge_store::{MemoryStore, SqliteStore, Store};
use xedge_validator::{StandardValidator, ValidationOptions, Validator};

/// XEdge - edge deployment registry and workflow graph service
#[derive(Parser)]
#[command(name = "xedge")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.xedge)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// JSON file holding the plugin catalog (default: builtin catalog)
  #[arg(long, global = true)]
  plugins: Option<PathBuf>,

  /// Only require element ids; skip duplicate, edge and plugin checks
  #[arg(long, global = true)]
  lenient: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Serve the REST API
  Serve(ServeArgs),

  /// Validate a workflow file and print its canonical graph
  Validate {
    /// Path to the workflow file (`-` reads stdin)
    workflow_file: PathBuf,
  },

  /// Print the plugin catalog
  Plugins,
}

#[derive(clap::Args)]
struct ServeArgs {
  /// Address to listen on
  #[arg(long, env = "XEDGE_BIND", default_value = "0.0.0.0:5000")]
  bind: SocketAddr,

  /// Storage backend
  #[arg(long, env = "XEDGE_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
  store: StoreKind,

  /// SQLite database URL (default: sqlite://<data-dir>/xedge.db)
  #[arg(long, env = "DATABASE_URL")]
  database_url: Option<String>,

  /// Per-path timeout when probing a Fledge host, in milliseconds
  #[arg(long, default_value_t = 3000)]
  fledge_timeout_ms: u64,

  /// Fledge path to probe; repeat to probe several in order
  #[arg(long = "fledge-path")]
  fledge_paths: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StoreKind {
  Memory,
  Sqlite,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".xedge"),
  };

  let options = if cli.lenient {
    ValidationOptions::lenient()
  } else {
    ValidationOptions::default()
  };

  let rt = tokio::runtime::Runtime::new()?;
  let catalog = load_catalog(cli.plugins.as_deref());

  match cli.command {
    Some(Commands::Serve(args)) => rt.block_on(serve(args, data_dir, catalog, options)),
    Some(Commands::Validate { workflow_file }) => {
      rt.block_on(validate(workflow_file, catalog, options))
    }
    Some(Commands::Plugins) => rt.block_on(print_plugins(catalog)),
    None => {
      println!("xedge - use --help to see available commands");
      Ok(())
    }
  }
}

fn load_catalog(path: Option<&Path>) -> Arc<dyn PluginCatalog> {
  match path {
    Some(path) => Arc::new(FsPluginCatalog::new(path)),
    None => Arc::new(BuiltinCatalog::new()),
  }
}

async fn open_store(
  kind: StoreKind,
  database_url: Option<String>,
  data_dir: &Path,
) -> Result<Arc<dyn Store>> {
  match kind {
    StoreKind::Memory => {
      info!("using in-memory store");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreKind::Sqlite => {
      let url = match database_url {
        Some(url) => url,
        None => {
          tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;
          format!("sqlite://{}", data_dir.join("xedge.db").display())
        }
      };

      let store = SqliteStore::connect(&url)
        .await
        .with_context(|| format!("failed to open database: {url}"))?;
      Ok(Arc::new(store))
    }
  }
}

async fn serve(
  args: ServeArgs,
  data_dir: PathBuf,
  catalog: Arc<dyn PluginCatalog>,
  options: ValidationOptions,
) -> Result<()> {
  let store = open_store(args.store, args.database_url, &data_dir).await?;

  let mut fledge_config = FledgeConfig {
    timeout: Duration::from_millis(args.fledge_timeout_ms),
    ..FledgeConfig::default()
  };
  if !args.fledge_paths.is_empty() {
    fledge_config.paths = args.fledge_paths;
  }
  let fledge = FledgeClient::new(fledge_config).context("failed to build fledge client")?;

  let state = AppState {
    store,
    validator: Arc::new(StandardValidator::with_options(catalog.clone(), options)),
    catalog,
    fledge,
  };

  xedge_server::serve(args.bind, state)
    .await
    .with_context(|| format!("failed to serve on {}", args.bind))
}

async fn validate(
  workflow_file: PathBuf,
  catalog: Arc<dyn PluginCatalog>,
  options: ValidationOptions,
) -> Result<()> {
  let content = if workflow_file.as_os_str() == "-" {
    read_stdin()?
  } else {
    tokio::fs::read_to_string(&workflow_file)
      .await
      .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?
  };

  let document: WorkflowDocument = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  let validator = StandardValidator::with_options(catalog, options);
  let graph = match validator.validate(&document).await {
    Ok(graph) => graph,
    Err(e) => bail!("invalid workflow: {e}"),
  };

  eprintln!(
    "Workflow is valid: {} nodes, {} edges",
    graph.nodes().len(),
    graph.edges().len()
  );
  println!("{}", serde_json::to_string_pretty(&graph)?);

  Ok(())
}

async fn print_plugins(catalog: Arc<dyn PluginCatalog>) -> Result<()> {
  let plugins = catalog.list().await.context("failed to load plugin catalog")?;
  println!("{}", serde_json::to_string_pretty(&plugins)?);
  Ok(())
}

fn read_stdin() -> Result<String> {
  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read workflow from stdin")?;
  Ok(input)
}
