//! `env_logger` setup for the binary.

use log::LevelFilter;

/// Installs `env_logger` on stderr: debug output with `verbose`, warnings
/// otherwise. `RUST_LOG` overrides the default filter.
pub fn init(verbose: bool) {
    let result = env_logger::Builder::new()
        .filter_level(level_for(verbose))
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
    if let Err(e) = result {
        log::warn!("logger already installed: {e}");
    }
}

fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}
