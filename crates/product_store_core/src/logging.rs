//! Logging bootstrap for the product store.
//!
//! # Responsibility
//! - Initialize logging exactly once per process, to stderr or rolling files.
//! - Emit stable `event=... module=... status=...` diagnostic lines.
//!
//! # Invariants
//! - Repeated init with the same level and target is a no-op.
//! - Re-initialization with a different level or target is rejected.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecBuilder, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{info, LevelFilter};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "product_store";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    Directory(PathBuf),
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => write!(f, "stderr"),
            Self::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

struct LoggingState {
    level: LevelFilter,
    target: LogTarget,
    _logger: LoggerHandle,
}

/// Initializes logging with `level`, writing rolling files under `log_dir`
/// or plain lines to stderr.
///
/// # Errors
/// - `level` is not a `log` level name (`off|error|warn|info|debug|trace`).
/// - `log_dir` cannot be created.
/// - Logging is already active with a different level or target.
/// - The logger backend fails to start.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), String> {
    let level = level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("unsupported log level `{level}`"))?;
    let target = log_dir.map_or(LogTarget::Stderr, |dir| {
        LogTarget::Directory(dir.to_path_buf())
    });

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = start_logger(level, &target)?;
        info!(
            "event=logging_init module=logging status=ok level={level} target={target} version={}",
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level,
            target: target.clone(),
            _logger: logger,
        })
    })?;

    if state.target != target {
        return Err(format!(
            "logging already writes to `{}`; refusing to switch to `{target}`",
            state.target
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already runs at `{}`; refusing to switch to `{level}`",
            state.level
        ));
    }

    Ok(())
}

/// Returns `(level, target)` once logging is active.
pub fn logging_status() -> Option<(LevelFilter, LogTarget)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.target.clone()))
}

/// Returns `debug` for debug builds and `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LevelFilter, target: &LogTarget) -> Result<LoggerHandle, String> {
    let logger = Logger::with(LogSpecBuilder::new().default(level).build());

    let logger = match target {
        LogTarget::Stderr => logger.log_to_stderr().format(flexi_logger::default_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
    };

    logger
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, LogTarget};
    use log::LevelFilter;

    #[test]
    fn init_logging_rejects_unknown_level_before_starting() {
        let err = init_logging("verbose", None).unwrap_err();
        assert!(err.contains("verbose"));
    }

    #[test]
    fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
        let log_dir = tempfile::tempdir().unwrap();

        init_logging("INFO", Some(log_dir.path())).unwrap();
        init_logging(" info ", Some(log_dir.path())).unwrap();

        let level_error = init_logging("debug", Some(log_dir.path())).unwrap_err();
        assert!(level_error.contains("refusing to switch"));

        let target_error = init_logging("info", None).unwrap_err();
        assert!(target_error.contains("refusing to switch"));

        let (active_level, active_target) = logging_status().unwrap();
        assert_eq!(active_level, LevelFilter::Info);
        assert_eq!(
            active_target,
            LogTarget::Directory(log_dir.path().to_path_buf())
        );
    }
}
