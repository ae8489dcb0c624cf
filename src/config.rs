use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

pub const DEFAULT_CONFIG_FILE: &str = "oceantea.json";
pub const DEFAULT_BASE_URL: &str = "http://maui.se.informatik.uni-kiel.de:9090/";
pub const DEFAULT_NON_SCALAR_KIND: &str = "adcp";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub non_scalar_kind: Option<String>,
    #[serde(default)]
    pub base_subjects: Option<Vec<String>>,
    #[serde(default)]
    pub unit_overrides: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub base_url: String,
    pub non_scalar_kind: String,
    pub base_subjects: Vec<String>,
    pub unit_overrides: BTreeMap<String, String>,
    pub language: String,
    pub timeout_secs: u64,
}

impl HarvestConfig {
    pub fn timeseries_url(&self) -> String {
        format!("{}/timeseries/", self.base_url)
    }

    pub fn datatypes_url(&self) -> String {
        format!("{}/datatypes/", self.base_url)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.trim_end_matches('/').to_string(),
            non_scalar_kind: DEFAULT_NON_SCALAR_KIND.to_string(),
            base_subjects: default_base_subjects(),
            unit_overrides: default_unit_overrides(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<HarvestConfig, HarvestError> {
        Self::resolve_with_overrides(path, ConfigOverrides::default())
    }

    pub fn resolve_with_overrides(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<HarvestConfig, HarvestError> {
        let mut config = Self::load(path)?;
        if overrides.base_url.is_some() {
            config.base_url = overrides.base_url;
        }
        if overrides.timeout_secs.is_some() {
            config.timeout_secs = overrides.timeout_secs;
        }
        Self::resolve_config(config)
    }

    fn load(path: Option<&str>) -> Result<Config, HarvestError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using built-in configuration");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| HarvestError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| HarvestError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(config: Config) -> Result<HarvestConfig, HarvestError> {
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HarvestError::InvalidConfig(format!(
                "base_url must be an http(s) URL: {base_url}"
            )));
        }

        let non_scalar_kind = config
            .non_scalar_kind
            .unwrap_or_else(|| DEFAULT_NON_SCALAR_KIND.to_string())
            .trim()
            .to_string();
        if non_scalar_kind.is_empty() {
            return Err(HarvestError::InvalidConfig(
                "non_scalar_kind must not be empty".to_string(),
            ));
        }

        let timeout_secs = config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(HarvestError::InvalidConfig(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(HarvestConfig {
            base_url,
            non_scalar_kind,
            base_subjects: config.base_subjects.unwrap_or_else(default_base_subjects),
            unit_overrides: config.unit_overrides.unwrap_or_else(default_unit_overrides),
            language: config
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            timeout_secs,
        })
    }
}

pub fn default_base_subjects() -> Vec<String> {
    vec![
        "MoLab".to_string(),
        "modular ocean laboratory".to_string(),
        "underwater measurement".to_string(),
        "oceanography".to_string(),
    ]
}

pub fn default_unit_overrides() -> BTreeMap<String, String> {
    BTreeMap::from([("potentialDensityAnomaly".to_string(), "kg/m^3".to_string())])
}
