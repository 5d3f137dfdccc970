//! # Structured Logging Module
//!
//! Run logging: an append-mode log file named by the input metadata, with an
//! optional stderr mirror for warnings and errors.
//!
//! Text lines carry a local timestamp with UTC offset, the level, the source
//! file and line, and the message. The JSON format emits the same data as one
//! object per line.
//!
//! The file level comes from the run's metadata. `RUST_LOG`, when set, takes
//! precedence with the usual `EnvFilter` directive syntax.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, RunnerError};
use crate::models::LogLevel;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Where and how verbosely a run logs.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub log_path: PathBuf,
    pub log_level: LogLevel,
    pub config: LoggingConfig,
}

/// Keeps the background file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber for a run.
///
/// If a global subscriber is already installed (tests, embedding hosts) the
/// existing one is kept and the call still succeeds.
pub fn init_logging(settings: &LogSettings) -> Result<LoggingGuard> {
    let (directory, file_name) = split_log_path(&settings.log_path)?;
    std::fs::create_dir_all(&directory).map_err(|e| RunnerError::io(&directory, e))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(&directory)
        .map_err(|e| RunnerError::Logging(format!("{}: {e}", settings.log_path.display())))?;
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let level = settings.log_level.as_level_filter();
    let filter = file_filter(level);

    let file_layer = match settings.config.format {
        LogFormat::Text => fmt::layer()
            .with_writer(file_writer)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_ansi(false)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(file_writer)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(filter)
            .boxed(),
    };

    let console_layer = settings.config.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(LevelFilter::WARN.min(level))
    });

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// `RUST_LOG` directives when present, otherwise the run's level.
fn file_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| RunnerError::Logging(format!("log path {} has no file name", path.display())))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}

/// Facts about the process, logged once at startup.
#[derive(Debug, Clone)]
pub struct RunEnvironment {
    pub started_at: DateTime<Local>,
    pub hostname: String,
    pub user: String,
    pub pid: u32,
    pub executable: String,
    pub working_directory: String,
}

impl RunEnvironment {
    pub fn capture() -> Self {
        Self {
            started_at: Local::now(),
            hostname: hostname(),
            user: std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
            executable: std::env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
            working_directory: std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Log the run environment and the effective log settings.
pub fn log_run_environment(input_path: &Path, settings: &LogSettings) {
    let env = RunEnvironment::capture();
    tracing::info!("Logging initialized");
    tracing::info!(
        started_at = %env.started_at.to_rfc3339(),
        hostname = %env.hostname,
        user = %env.user,
        pid = env.pid,
        executable = %env.executable,
        working_directory = %env.working_directory,
        "Run environment"
    );
    tracing::info!(
        input_path = %input_path.display(),
        log_path = %settings.log_path.display(),
        log_level = %settings.log_level,
        "Run settings"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, file) = split_log_path(Path::new("logs/run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(file, PathBuf::from("run.log"));

        let (dir, file) = split_log_path(Path::new("run.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, PathBuf::from("run.log"));

        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_file_filter_defaults_to_run_level() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }
        assert_eq!(
            file_filter(LevelFilter::WARN).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(
            file_filter(LevelFilter::DEBUG).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_run_environment_capture() {
        let before = Local::now();
        let env = RunEnvironment::capture();
        assert!(env.started_at >= before);
        assert_eq!(env.pid, std::process::id());
        assert!(!env.hostname.is_empty());
        assert!(!env.working_directory.is_empty());
    }

    #[test]
    fn test_init_logging_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings {
            log_path: dir.path().join("nested").join("run.log"),
            log_level: LogLevel::Debug,
            config: LoggingConfig::default(),
        };

        let guard = init_logging(&settings).unwrap();
        assert!(dir.path().join("nested").is_dir());
        drop(guard);
    }
}
