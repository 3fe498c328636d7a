//! Process-level runtime pieces shared by the server binary: layered
//! configuration, home directory resolution, logging and database bootstrap.

pub mod config;
pub mod db;
pub mod home_dir;
pub mod logging;

pub use config::{
    default_logging_config, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section,
    ServerConfig,
};
