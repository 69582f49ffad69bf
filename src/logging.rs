//! Logging setup. Same `env_logger` + `log` pairing the teacher's own
//! `[dependencies.env_logger]` table pulls in, wired to the CLI's `-v`/`-q`
//! counters instead of `RUST_LOG` alone.

use log::LevelFilter;

/// Picks a level from `-v`/`-q` counts: quiet drops to warnings only, each
/// `-v` steps up one level past the default `Info`.
pub fn level_from_verbosity(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8, quiet: bool) {
    let level = level_from_verbosity(verbose, quiet);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
