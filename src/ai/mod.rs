mod http;

use anyhow::Result;
use std::sync::Arc;

use crate::config::AiConfig;

pub(crate) use http::HttpCompletion;

/// Opaque text completion: one prompt in, one text answer out. Calls may
/// block on network I/O, so implementations must be shareable with a
/// background worker.
pub(crate) trait CompletionService: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Used when no API key is configured.
pub(crate) struct DisabledCompletion;

impl CompletionService for DisabledCompletion {
    fn complete(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("AI assistant is not configured (set LEDGERSYNC_AI_KEY)")
    }
}

/// Build the service described by the configuration.
pub(crate) fn from_config(config: Option<&AiConfig>) -> Result<Arc<dyn CompletionService>> {
    match config {
        Some(ai) => Ok(Arc::new(HttpCompletion::new(ai.clone())?)),
        None => {
            tracing::info!("no AI key configured, fallback import and chat are disabled");
            Ok(Arc::new(DisabledCompletion))
        }
    }
}
