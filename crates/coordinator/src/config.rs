//! Loading the [ProtocolConfig] from disk.

use crate::{CoordinatorError, CoordinatorResult};
use std::path::Path;
use tracing::debug;
use verdict_primitives::ProtocolConfig;

/// Reads a JSON [ProtocolConfig] from `path` and validates it.
pub fn load_config(path: impl AsRef<Path>) -> CoordinatorResult<ProtocolConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CoordinatorError::ConfigIo(format!("{}: {e}", path.display())))?;
    let config = ProtocolConfig::from_json(&raw)?;
    debug!(target: "coordinator", "Loaded protocol config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod test {
    use super::*;
    use verdict_primitives::ConfigError;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("verdict-{}-{name}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_config() {
        let path = write_temp(
            "valid",
            r#"{
                "genesis": {
                    "hash": "0x0101010101010101010101010101010101010101010101010101010101010101",
                    "state_root": "0x0202020202020202020202020202020202020202020202020202020202020202",
                    "timestamp": 0
                },
                "round_timeout": 600,
                "admin": "0x00000000000000000000000000000000000000ad",
                "proposer": "0x00000000000000000000000000000000000000b0",
                "treasury": "0x00000000000000000000000000000000000000c0"
            }"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.round_timeout, 600);
        assert_eq!(config.challenge_period, ProtocolConfig::default().challenge_period);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_load_config_errors() {
        assert!(matches!(
            load_config("/nonexistent/verdict.json"),
            Err(CoordinatorError::ConfigIo(_))
        ));

        let path = write_temp("invalid", r#"{ "round_timeout": 0 }"#);
        assert!(matches!(load_config(&path), Err(CoordinatorError::Config(ConfigError::ZeroRoundTimeout))));
        std::fs::remove_file(path).unwrap();
    }
}
