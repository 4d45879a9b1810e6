//! Terminal logging for the `log` facade.

use log::{LevelFilter, SetLoggerError};

/// Map the `-v` count to a level filter.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. Only the first call succeeds.
///
/// `RUST_LOG` is honored for per-module filters; `-v` sets the default level.
pub fn init(verbose: u8) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level_for(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init()
}
