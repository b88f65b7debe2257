use crate::filter::{FilterParseError, FilterSet, parse_filter_set};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid filter set in profile '{profile}': {source}")]
    InvalidFilterSet {
        profile: String,
        #[source]
        source: FilterParseError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    /// Filter set expression applied when no `--filter` is given.
    pub filter_set: Option<String>,
    pub output: OutputRules,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            filter_set: None,
            output: OutputRules::default(),
        }
    }
}

impl SelectorConfig {
    /// Parsed `filter_set`; a missing or blank expression is the empty set.
    pub fn filter_set(&self) -> Result<FilterSet, ConfigError> {
        let Some(expression) = self.filter_set.as_deref() else {
            return Ok(FilterSet::empty());
        };
        parse_filter_set(expression).map_err(|source| ConfigError::InvalidFilterSet {
            profile: self.profile_name.clone(),
            source,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputRules {
    pub show_unselected: bool,
    pub show_ids: bool,
}

impl Default for OutputRules {
    fn default() -> Self {
        Self {
            show_unselected: false,
            show_ids: true,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<SelectorConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SelectorConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    toml::from_str::<SelectorConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })
}

pub fn default_config() -> &'static SelectorConfig {
    static DEFAULT_CONFIG: LazyLock<SelectorConfig> = LazyLock::new(SelectorConfig::default);
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_selects_everything() {
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.profile_name, "base");
        assert!(cfg.filter_set().unwrap().is_empty());
        assert!(cfg.output.show_ids);
        assert!(!cfg.output.show_unselected);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: SelectorConfig = toml::from_str(
            r#"
profile_name = "ci"
filter_set = "Category: Smoke exclude Category: Flaky"
"#,
        )
        .unwrap();
        assert_eq!(cfg.profile_name, "ci");
        assert_eq!(cfg.filter_set().unwrap().len(), 2);
        assert!(cfg.output.show_ids);
    }

    #[test]
    fn test_invalid_filter_set_names_profile() {
        let cfg = SelectorConfig {
            profile_name: "nightly".to_string(),
            filter_set: Some("Name:(".to_string()),
            ..SelectorConfig::default()
        };
        let err = cfg.filter_set().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFilterSet { .. }));
        assert!(err.to_string().contains("nightly"), "message: {err}");
    }
}
