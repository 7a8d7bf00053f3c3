use std::path::{Path, PathBuf};

use super::types::AppConfig;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ORGANIZATION: &str = "OPENAI_ORG_ID";
pub const ENV_BASE_URL: &str = "SHEET_ANALYST_BASE_URL";
pub const ENV_MODEL: &str = "SHEET_ANALYST_MODEL";

/// Get the default data directory: ~/.sheet-analyst
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".sheet-analyst"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.sheet-analyst/config.toml
    let user_config = get_data_dir()?.join("config.toml");
    // Priority 2: ./config.toml
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_file(&user_config)?
    } else if local_config.exists() {
        load_file(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    expand_paths(&mut cfg);
    Ok(cfg)
}

pub fn load_file(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))
}

/// Environment variables win over file values; blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_blank(ENV_API_KEY) {
        cfg.service.api_key = v;
    }
    if let Some(v) = non_blank(ENV_ORGANIZATION) {
        cfg.service.organization = Some(v);
    }
    if let Some(v) = non_blank(ENV_BASE_URL) {
        cfg.service.base_url = v;
    }
    if let Some(v) = non_blank(ENV_MODEL) {
        cfg.agent.model = v;
    }
}

fn expand_paths(cfg: &mut AppConfig) {
    if let Some(dir) = cfg.output.directory.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
    }
    if let Some(dir) = cfg.logging.directory.as_mut() {
        *dir = shellexpand::tilde(dir.as_str()).into_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = AppConfig::default();
        cfg.service.api_key = "from-file".into();
        apply_env_overrides(
            &mut cfg,
            lookup(&[
                (ENV_API_KEY, "sk-env"),
                (ENV_BASE_URL, "http://localhost:9000/v1"),
                (ENV_MODEL, "gpt-4o-mini"),
                (ENV_ORGANIZATION, "org-1"),
            ]),
        );
        assert_eq!(cfg.service.api_key, "sk-env");
        assert_eq!(cfg.service.base_url, "http://localhost:9000/v1");
        assert_eq!(cfg.agent.model, "gpt-4o-mini");
        assert_eq!(cfg.service.organization.as_deref(), Some("org-1"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.service.api_key = "from-file".into();
        apply_env_overrides(&mut cfg, lookup(&[(ENV_API_KEY, "   ")]));
        assert_eq!(cfg.service.api_key, "from-file");
    }

    #[test]
    fn load_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[polling]\ninterval_ms = \"soon\"\n").unwrap();
        let err = load_file(&path).unwrap_err().to_string();
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn load_file_reads_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[service]\nbase_url = \"http://127.0.0.1:1/v1\"\n[output]\ndirectory = \"out\"\n",
        )
        .unwrap();
        let cfg = load_file(&path).unwrap();
        assert_eq!(cfg.service.base_url, "http://127.0.0.1:1/v1");
        assert_eq!(cfg.output.directory.as_deref(), Some("out"));
    }
}
