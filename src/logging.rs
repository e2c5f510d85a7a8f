//! Diagnostic logging setup.
//!
//! Progress for each file goes to stdout through [`output`](crate::output);
//! this module only configures the `log` facade (stderr), used for warnings
//! and for tracing the fit search. `RUST_LOG` refines the chosen level.

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Level used when `--log-level` is not given.
pub const DEFAULT_LEVEL: &str = "warn";

/// Parse a level name, falling back to `warn` for anything unrecognized.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => {
            eprintln!("Invalid log level '{}', using '{}'", level, DEFAULT_LEVEL);
            LevelFilter::Warn
        }
    }
}

/// Initialize logging; `quiet` keeps errors only.
pub fn init_logging(level: &str, quiet: bool) {
    let filter = if quiet {
        LevelFilter::Error
    } else {
        parse_level(level)
    };

    let mut builder = Builder::new();
    builder.filter_level(filter);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{:5} [{}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    // A second init (e.g. in tests) keeps the first logger
    let _ = builder.try_init();
}
