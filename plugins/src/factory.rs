use std::sync::Arc;

use anyhow::{anyhow, Result};

use sheet_analyst_core::agent::AgentService;
use sheet_analyst_core::config::{AppConfig, ENV_API_KEY};

use crate::agent::HttpAgentService;

pub fn build_agent_service(cfg: &AppConfig) -> Result<Arc<dyn AgentService>> {
    if cfg.service.api_key.trim().is_empty() {
        return Err(anyhow!(
            "no API key: pass --api-key, set {} or service.api_key in config.toml",
            ENV_API_KEY
        ));
    }
    let base_url = cfg.service.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(anyhow!(
            "service.base_url must be an http(s) URL, got: {}",
            base_url
        ));
    }
    Ok(Arc::new(HttpAgentService::new(&cfg.service)?))
}
