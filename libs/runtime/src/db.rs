//! Database bootstrap: DSN normalization and SeaORM connection setup.

use anyhow::{anyhow, Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::config::DatabaseConfig;

/// In-memory SQLite DSN used by `--mock` runs and tests.
pub const SQLITE_MEMORY_DSN: &str = "sqlite::memory:";

const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_MS: u32 = 5000;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    Sqlite,
    Postgres,
}

/// Detect DB backend from URL scheme.
pub fn detect_engine(dsn: &str) -> Result<DbEngine> {
    let raw = dsn.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case(SQLITE_MEMORY_DSN) {
        return Ok(DbEngine::Sqlite);
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok(DbEngine::Sqlite),
        "postgres" | "postgresql" => Ok(DbEngine::Postgres),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps in-memory DSNs as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Adds `mode=rwc` so the file is created on first start.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(SQLITE_MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok(SQLITE_MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create database dir {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) => {
            out.push('?');
            out.push_str(q);
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Resolve the final DSN for a configuration: `mock` forces in-memory SQLite,
/// relative SQLite paths are resolved against `base_dir`.
pub fn resolve_dsn(cfg: &DatabaseConfig, base_dir: &Path, mock: bool) -> Result<String> {
    if mock {
        return Ok(SQLITE_MEMORY_DSN.to_string());
    }

    let dsn = cfg.url.trim().to_owned();
    match detect_engine(&dsn)? {
        DbEngine::Sqlite => absolutize_sqlite_dsn(&dsn, base_dir, true),
        DbEngine::Postgres => Ok(dsn),
    }
}

/// Pool settings for SQLite. The in-memory database lives only as long as
/// its single connection, so that connection is never reaped.
pub fn sqlite_pool_options(cfg: &DatabaseConfig, in_memory: bool) -> SqlitePoolOptions {
    let opts = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);
    if in_memory {
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        opts.max_connections(cfg.max_conns.unwrap_or(DEFAULT_MAX_CONNS))
    }
}

/// Open a SQLite pool with `busy_timeout` and foreign keys set on every connection.
pub async fn connect_sqlite_pool(dsn: &str, cfg: &DatabaseConfig) -> Result<SqlitePool> {
    let busy = Duration::from_millis(u64::from(cfg.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_MS)));
    let conn_opts = SqliteConnectOptions::from_str(dsn)
        .with_context(|| format!("invalid sqlite DSN '{dsn}'"))?
        .busy_timeout(busy)
        .foreign_keys(true);

    sqlite_pool_options(cfg, dsn == SQLITE_MEMORY_DSN)
        .connect_with(conn_opts)
        .await
        .context("failed to open sqlite pool")
}

/// Open a SeaORM connection for the given DSN.
pub async fn connect(dsn: &str, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let engine = detect_engine(dsn)?;
    tracing::info!(engine = ?engine, "Connecting to database");

    match engine {
        DbEngine::Sqlite => {
            let pool = connect_sqlite_pool(dsn, cfg).await?;
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        DbEngine::Postgres => {
            let mut opts = ConnectOptions::new(dsn.to_owned());
            opts.max_connections(cfg.max_conns.unwrap_or(DEFAULT_MAX_CONNS))
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .sqlx_logging(false);
            Database::connect(opts)
                .await
                .context("failed to connect to Postgres database")
        }
    }
}
