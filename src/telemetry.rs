use crate::error::{RankerError, Result};
use tracing_subscriber::EnvFilter;

/// Filter directive for the command-line verbosity flags, if any were given.
pub fn level_for_flags(verbose: u8, quiet: bool) -> Option<&'static str> {
    match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("info"),
        (false, _) => Some("debug"),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|err| {
            RankerError::Telemetry(format!("invalid log level/filter '{level}': {err}"))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|err| RankerError::Telemetry(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_levels() {
        assert_eq!(level_for_flags(0, false), None);
        assert_eq!(level_for_flags(1, false), Some("info"));
        assert_eq!(level_for_flags(3, false), Some("debug"));
        assert_eq!(level_for_flags(0, true), Some("error"));
    }
}
