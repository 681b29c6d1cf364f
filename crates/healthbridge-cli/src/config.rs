// Copyright 2026 HealthBridge Contributors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const APP_NAME: &str = "healthbridge";
const DEFAULT_TIMEOUT: &str = "30s";
const DEFAULT_SEARCH_LATENCY: &str = "1500ms";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub llm: Llm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            llm: Llm::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    /// Simulated directory latency so the loading state is visible.
    pub search_latency: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            search_latency: Some(DEFAULT_SEARCH_LATENCY.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Llm {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Llm {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            base_url: Some(healthbridge_llm::DEFAULT_BASE_URL.to_owned()),
            model: Some(healthbridge_llm::DEFAULT_MODEL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HEALTHBRIDGE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set HEALTHBRIDGE_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        if config.version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = {}",
                config.version,
                path.display(),
                CONFIG_VERSION
            );
        }

        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (name, raw) in [
            ("ui.search_latency", self.ui.search_latency.as_deref()),
            ("llm.timeout", self.llm.timeout.as_deref()),
        ] {
            let Some(raw) = raw else { continue };
            let parsed = parse_duration(raw)?;
            if name == "llm.timeout" && parsed.is_zero() {
                bail!("{name} in {} must be positive, got {raw}", path.display());
            }
        }
        Ok(())
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.enabled.unwrap_or(true)
    }

    pub fn llm_base_url(&self) -> &str {
        self.llm
            .base_url
            .as_deref()
            .unwrap_or(healthbridge_llm::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn llm_model(&self) -> &str {
        self.llm
            .model
            .as_deref()
            .unwrap_or(healthbridge_llm::DEFAULT_MODEL)
    }

    pub fn llm_timeout(&self) -> Result<Duration> {
        parse_duration(self.llm.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn search_latency(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .search_latency
                .as_deref()
                .unwrap_or(DEFAULT_SEARCH_LATENCY),
        )
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# healthbridge config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Simulated provider-directory latency; set to \"0ms\" to disable.\nsearch_latency = \"{}\"\n\n[llm]\nenabled = true\nbase_url = \"{}\"\nmodel = \"{}\"\ntimeout = \"{}\"\n# The bearer credential is read from OPENROUTER_API_KEY or OPENAI_API_KEY.\n",
            path.display(),
            DEFAULT_SEARCH_LATENCY,
            healthbridge_llm::DEFAULT_BASE_URL,
            healthbridge_llm::DEFAULT_MODEL,
            DEFAULT_TIMEOUT,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert!(config.llm_enabled());
        assert_eq!(config.llm_base_url(), "https://openrouter.ai/api/v1");
        assert_eq!(config.search_latency()?, Duration::from_millis(1500));
        Ok(())
    }

    #[test]
    fn populated_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nsearch_latency = \"0ms\"\n[llm]\nenabled = false\nbase_url = \"http://localhost:8080/v1\"\nmodel = \"test-model\"\ntimeout = \"2s\"\n",
        )?;
        let config = Config::load(&path)?;
        assert!(!config.llm_enabled());
        assert_eq!(config.llm_base_url(), "http://localhost:8080/v1");
        assert_eq!(config.llm_model(), "test-model");
        assert_eq!(config.llm_timeout()?, Duration::from_secs(2));
        assert!(config.search_latency()?.is_zero());
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 9\n")?;
        let error = Config::load(&path).expect_err("v9 config should fail");
        assert!(error.to_string().contains("unsupported config version 9"));
        Ok(())
    }

    #[test]
    fn base_url_trims_trailing_slashes() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[llm]\nbase_url = \"https://openrouter.ai/api/v1///\"\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.llm_base_url(), "https://openrouter.ai/api/v1");
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[llm]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("oops").is_err());
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("HEALTHBRIDGE_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("HEALTHBRIDGE_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn example_config_includes_required_sections() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[llm]"));
        assert!(example.contains("OPENROUTER_API_KEY"));
        Ok(())
    }
}
