use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use std::path::{Path, PathBuf};

use adminkit::request_id::HttpLayers;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use users_admin::{config::UsersAdminConfig, UsersAdmin};

mod web;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Blogify Server - admin back-office for the Blogify blog engine
#[derive(Parser)]
#[command(name = "blogify-server")]
#[command(about = "Blogify Server - admin back-office for the Blogify blog engine")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Blogify Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, &args),
    }
}

/// Database settings for this run; `--mock` works without a `database` section.
fn database_config(config: &AppConfig, mock: bool) -> Result<DatabaseConfig> {
    match (&config.database, mock) {
        (Some(db), _) => Ok(db.clone()),
        (None, true) => Ok(DatabaseConfig {
            url: runtime::db::SQLITE_MEMORY_DSN.to_string(),
            max_conns: Some(1),
            busy_timeout_ms: None,
        }),
        (None, false) => Err(anyhow!(
            "database configuration is required (or pass --mock)"
        )),
    }
}

fn users_admin_config(config: &AppConfig) -> Result<UsersAdminConfig> {
    let cfg = if config.modules.contains_key(UsersAdmin::NAME) {
        config.module_config_required(UsersAdmin::NAME)?
    } else {
        UsersAdminConfig::default()
    };
    cfg.validate()?;
    Ok(cfg)
}

fn http_layers(config: &AppConfig) -> HttpLayers {
    let mut layers = HttpLayers::default();
    if let Some(timeout) = config.server.request_timeout() {
        layers.timeout = timeout;
    }
    layers
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let base_dir = PathBuf::from(&config.server.home_dir);
    let db_config = database_config(&config, args.mock)?;
    let dsn = runtime::db::resolve_dsn(&db_config, &base_dir, args.mock)?;
    let db = runtime::db::connect(&dsn, &db_config).await?;
    tracing::info!("Connected to database");

    tracing::info!("Initializing modules...");
    let users_admin = UsersAdmin::default();
    users_admin.migrate(&db).await?;
    users_admin.init(db, users_admin_config(&config)?)?;

    let router = users_admin.register_rest(web::base_router()?)?;
    let router = http_layers(&config).apply(router);

    let addr = config.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(adminkit::shutdown::shutdown_signal())
        .await
        .map_err(|e| anyhow!(e))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    let db_config = database_config(&config, args.mock)?;
    runtime::db::resolve_dsn(&db_config, Path::new(&config.server.home_dir), args.mock)?;
    users_admin_config(&config)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
