//! Game configuration loader.

use std::path::Path;

use hexball_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.quarters == 0 || config.turns_per_quarter == 0 {
            anyhow::bail!("config must play at least one turn per quarter and one quarter");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigLoader::parse("hand_size = 6\n").unwrap();
        assert_eq!(config.hand_size, 6);
        assert_eq!(config.quarters, GameConfig::DEFAULT_QUARTERS);
    }

    #[test]
    fn zero_quarters_are_rejected() {
        assert!(ConfigLoader::parse("quarters = 0\n").is_err());
    }
}
