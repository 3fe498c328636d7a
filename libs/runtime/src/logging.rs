//! Subscriber setup from the `logging` config section.
//!
//! Every key other than `default` names a target prefix (usually a crate,
//! e.g. `users_admin` or `sea_orm`) with its own console level and optional
//! rotating JSON log file. The `default` section covers every target no
//! other section claims.

use crate::config::{LoggingConfig, Section};
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

/// `None` disables output; unknown names fall back to `info`.
fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => None,
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => Some(LevelFilter::INFO),
    }
}

/// `target` is `prefix` itself or one of its submodules.
fn under_prefix(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating files --------

/// Shared handle to one size-rotated log file.
#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotatingFile {
    fn open(path: &Path, max_bytes: usize, max_files: usize) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rotate = FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::MaxFiles(max_files)),
            ContentLimit::BytesSurpassed(max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rotate))))
    }

    fn for_section(name: &str, section: &Section, base_dir: &Path) -> Option<Self> {
        if section.file.trim().is_empty() {
            return None;
        }
        let max_mb = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB);
        let max_bytes = usize::try_from(max_mb * 1024 * 1024).unwrap_or(usize::MAX);
        let max_files = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
        let path = log_path(&section.file, base_dir);

        RotatingFile::open(&path, max_bytes, max_files)
            .map_err(|e| {
                // No subscriber yet; stderr is all there is.
                eprintln!("cannot open log file for '{name}' at {}: {e}", path.display());
            })
            .ok()
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

/// Relative log paths live under the server home directory.
fn log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Writer for one event; `None` swallows the bytes.
struct Sink(Option<RotatingFile>);

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Picks the file of the section owning an event's target.
#[derive(Clone, Default)]
struct FileRoutes {
    fallback: Option<RotatingFile>,
    routes: Vec<(String, RotatingFile)>,
}

impl FileRoutes {
    fn route(&self, target: &str) -> Option<RotatingFile> {
        self.routes
            .iter()
            .find(|(prefix, _)| under_prefix(target, prefix))
            .map(|(_, file)| file.clone())
            .or_else(|| self.fallback.clone())
    }

    fn is_empty(&self) -> bool {
        self.fallback.is_none() && self.routes.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRoutes {
    type Writer = Sink;

    fn make_writer(&'a self) -> Self::Writer {
        Sink(self.fallback.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        Sink(self.route(meta.target()))
    }
}

// -------- plan --------

/// The config split into the catch-all section and the named subsystems.
struct LogPlan<'a> {
    fallback: Option<&'a Section>,
    subsystems: Vec<(&'a str, &'a Section)>,
}

impl<'a> LogPlan<'a> {
    fn new(cfg: &'a LoggingConfig) -> Self {
        let mut subsystems: Vec<_> = cfg
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
            .map(|(name, section)| (name.as_str(), section))
            .collect();
        // Longest prefix first so `users_admin::api` wins over `users_admin`.
        subsystems.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
        Self {
            fallback: cfg.get(DEFAULT_SECTION),
            subsystems,
        }
    }

    fn names(&self) -> Vec<String> {
        self.subsystems.iter().map(|(n, _)| n.to_string()).collect()
    }

    /// Per-subsystem filter using the level `pick` selects from each section.
    fn targets(&self, pick: fn(&Section) -> Option<LevelFilter>) -> Targets {
        self.subsystems
            .iter()
            .filter_map(|(name, section)| pick(section).map(|level| (name.to_string(), level)))
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, level)| {
                t.with_target(name, level)
            })
    }

    fn file_routes(&self, base_dir: &Path) -> FileRoutes {
        FileRoutes {
            fallback: self
                .fallback
                .and_then(|s| RotatingFile::for_section(DEFAULT_SECTION, s, base_dir)),
            routes: self
                .subsystems
                .iter()
                .filter_map(|(name, section)| {
                    RotatingFile::for_section(name, section, base_dir)
                        .map(|file| (name.to_string(), file))
                })
                .collect(),
        }
    }
}

fn console_level(section: &Section) -> Option<LevelFilter> {
    parse_level(&section.console_level)
}

fn file_level(section: &Section) -> Option<LevelFilter> {
    if section.file.trim().is_empty() {
        return None;
    }
    parse_level(&section.file_level)
}

type OutsideFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Events up to `max` whose target belongs to none of `claimed`.
fn outside(claimed: Vec<String>, max: LevelFilter) -> OutsideFilter {
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        !claimed.iter().any(|p| under_prefix(meta.target(), p)) && max >= *meta.level()
    }))
}

// -------- public init --------

/// Install the global subscriber described by `cfg`.
///
/// Relative log file paths are resolved against `base_dir` (the server home
/// directory). `log` records are bridged into `tracing`. Calling this again
/// after a subscriber is installed has no effect.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    use tracing_subscriber::{prelude::*, Layer, Registry};

    let plan = LogPlan::new(cfg);
    let files = plan.file_routes(base_dir);
    let ansi = std::io::stdout().is_terminal();

    let console = || {
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };
    let json_file = || {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(files.clone())
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(console().with_filter(plan.targets(console_level)).boxed());
    if !files.is_empty() {
        layers.push(json_file().with_filter(plan.targets(file_level)).boxed());
    }

    // catch-all for targets no subsystem claims
    if let Some(level) = plan.fallback.and_then(console_level) {
        layers.push(console().with_filter(outside(plan.names(), level)).boxed());
    }
    if let Some(level) = plan
        .fallback
        .filter(|_| files.fallback.is_some())
        .and_then(file_level)
    {
        layers.push(json_file().with_filter(outside(plan.names(), level)).boxed());
    }

    let _ = Registry::default()
        .with(layers)
        .try_init();
}
