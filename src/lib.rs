use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

pub mod datasets;

/// Serialized (ron) view of any parameter struct, used for config files
/// and for comparing parameter states.
pub trait Config: Send + Sync {
    fn config(&self) -> Result<String>;
    fn load_config(&mut self, config: &str) -> Result<()>;
}

impl<T: Serialize + DeserializeOwned + Send + Sync> Config for T {
    fn config(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize config")
    }
    fn load_config(&mut self, config: &str) -> Result<()> {
        *self = ron::from_str(config).with_context(|| format!("Failed to load config {}", config))?;
        Ok(())
    }
}
