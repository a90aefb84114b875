//! Logger initialization.
//!
//! Both processes log through the `log` facade; this installs `env_logger`
//! with either colored plain lines or one JSON object per line.

use std::io::Write;

use colored::{Color, Colorize};
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

// Dependencies that are chatty at debug level
const QUIET_MODULES: [&str; 4] = ["sqlx", "reqwest", "hyper", "hyper_util"];

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Magenta,
    }
}

/// One log record as a JSON line (without the newline).
fn json_line(record: &Record<'_>, ts_ms: i64) -> String {
    serde_json::json!({
        "ts": ts_ms,
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides the global level and the
/// level for this crate, so `RUST_LOG` stays useful for per-module filtering
/// of dependencies. Those dependencies never log below info unless `level`
/// is stricter.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=sqlx=debug ip_heatmap collect
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Info.min(level));
    }
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(record, chrono::Utc::now().timestamp_millis())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                writeln!(
                    buf,
                    "{} {:<5} {} {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    level.as_str().color(level_color(level)),
                    record.target().dimmed(),
                    record.args()
                )
            });
        }
    }

    builder.try_init()?;
    Ok(())
}
