use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DEFAULT_AI_URL: &str = "https://api.openai.com/v1/chat/completions";
pub(crate) const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const HISTORY_FILE: &str = "chat_history.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AiConfig {
    pub(crate) url: String,
    pub(crate) model: String,
    pub(crate) api_key: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
    /// `None` leaves the assistant and the import fallback disabled.
    pub(crate) ai: Option<AiConfig>,
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                config.data_dir.display()
            )
        })?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = match non_empty("LEDGERSYNC_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let ai = non_empty("LEDGERSYNC_AI_KEY").map(|api_key| AiConfig {
            url: non_empty("LEDGERSYNC_AI_URL").unwrap_or_else(|| DEFAULT_AI_URL.to_string()),
            model: non_empty("LEDGERSYNC_AI_MODEL")
                .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            api_key,
        });

        Ok(Self { data_dir, ai })
    }

    pub(crate) fn chat_history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "ledgersync", "LedgerSync")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
