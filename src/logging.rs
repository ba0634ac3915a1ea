//! Logger setup for the game binary.
//!
//! The game logs through the `log` macros; this module installs `env_logger`
//! behind them. A `RUST_LOG` value in the environment always takes priority
//! over the `--verbose` switch.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level used when `RUST_LOG` is unset.
fn fallback_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Debug } else { LevelFilter::Info }
}

/// Installs the global logger.
///
/// Calling this again is harmless: the first logger stays in place.
pub fn init(verbose: bool) {
    let filter = fallback_level(verbose).to_string();
    let installed = Builder::from_env(Env::default().default_filter_or(filter))
        .format_target(false)
        .try_init()
        .is_ok();
    if installed {
        log::debug!("logger installed, fallback level {}", fallback_level(verbose));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_level_follows_verbose() {
        assert_eq!(fallback_level(true), LevelFilter::Debug);
        assert_eq!(fallback_level(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
