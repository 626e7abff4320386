//! Initialize the configuration directory: create ~/.leadgate and a default config.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{Config, SourceEntry};

/// Default config written by `leadgate init`: server defaults plus one
/// example source entry to edit.
fn default_config_template() -> Config {
    let mut config = Config::default();
    config.sources.insert(
        "example-site".to_string(),
        SourceEntry {
            api_key: uuid::Uuid::new_v4().simple().to_string(),
            telegram_chats: Vec::new(),
            emails: Vec::new(),
        },
    );
    config
}

/// Create the config directory and a default config file if they do not exist.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        let default_config = serde_json::to_string_pretty(&default_config_template())
            .context("serializing default config")?;
        std::fs::write(config_path, default_config)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    } else {
        log::debug!("config already exists at {}, skipping", config_path.display());
    }

    Ok(config_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn init_writes_a_loadable_config() {
        let dir = std::env::temp_dir().join(format!("leadgate-init-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.json");
        init_config_dir(&path).expect("init");
        let (config, used) = load_config(Some(path.clone())).expect("load");
        assert_eq!(used, path);
        assert!(config.sources.contains_key("example-site"));
        // second run leaves the file in place
        init_config_dir(&path).expect("re-init");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
