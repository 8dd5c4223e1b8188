//! Utilities: logging setup (verbosity flags -> tracing level, RUST_LOG override).
//!
//! Key items:
//!   derive_level / init_logging

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Map `-v` count and `-q` to a tracing level.
pub fn derive_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the stderr subscriber. `RUST_LOG` directives take precedence over
/// the level derived from flags.
pub fn init_logging(level: Level) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins() {
        assert_eq!(derive_level(2, true), Level::ERROR);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), Level::WARN);
        assert_eq!(derive_level(1, false), Level::DEBUG);
        assert_eq!(derive_level(5, false), Level::TRACE);
    }
}
