//! Logging setup shared by the scene tools
//!
//! Library code logs through the `log` macros only. Binaries pick a level
//! with [`level_for`] and install `env_logger` with [`init`]; `RUST_LOG`
//! overrides the chosen level when it is set.

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Level for the command line switches
///
/// `quiet` wins over `verbose`.
pub fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, true) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}

/// Install the global logger, writing to stderr
///
/// Scene output may go to stdout, so log lines never do.
pub fn init(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .parse_default_env()
        .init();
}
