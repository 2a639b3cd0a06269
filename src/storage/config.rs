use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::models::settings::DownloaderConfig;

const CONFIG_FILE: &str = "config.json";
const CONFIG_DIR_ENV: &str = "BILIDOWN_CONFIG_DIR";

const ENV_SESSDATA: &str = "BILI_SESSDATA";
const ENV_BILI_JCT: &str = "BILI_JCT";
const ENV_BUVID3: &str = "BILI_BUVID3";

pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join("bilidown"))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE))
}

/// Loads the config from `path` (or the default location), then applies the
/// credential environment variables. A missing default file yields defaults;
/// a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DownloaderConfig> {
    let mut config = match path {
        Some(p) => read_config(p)?,
        None => match default_config_path() {
            Some(p) if p.exists() => read_config(&p)?,
            _ => DownloaderConfig::default(),
        },
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<DownloaderConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn apply_env_overrides(config: &mut DownloaderConfig, var: impl Fn(&str) -> Option<String>) {
    let creds = &mut config.credentials;
    for (key, slot) in [
        (ENV_SESSDATA, &mut creds.sessdata),
        (ENV_BILI_JCT, &mut creds.bili_jct),
        (ENV_BUVID3, &mut creds.buvid3),
    ] {
        if let Some(value) = var(key).filter(|v| !v.is_empty()) {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{"max_duration_secs": 1800, "download_dir": "/tmp/bili", "credentials": {"buvid3": "b"}}"#,
        )
        .unwrap();

        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.max_duration_secs, 1800);
        assert_eq!(loaded.download_dir, PathBuf::from("/tmp/bili"));
        assert_eq!(loaded.credentials.buvid3, "b");
        assert_eq!(loaded.request_timeout_secs, DownloaderConfig::default().request_timeout_secs);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ nope").unwrap();
        assert!(read_config(&path).is_err());
    }

    #[test]
    fn env_overrides_credentials() {
        let mut config = DownloaderConfig::default();
        config.credentials.bili_jct = "from-file".into();
        apply_env_overrides(&mut config, |key| match key {
            ENV_SESSDATA => Some("sess".into()),
            ENV_BILI_JCT => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.credentials.sessdata, "sess");
        assert_eq!(config.credentials.bili_jct, "from-file");
        assert_eq!(config.credentials.buvid3, "");
    }
}
