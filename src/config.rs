//! Run configuration.
//!
//! Loaded from `sqlport.toml` in the working directory, else from the user
//! config directory (`<config_dir>/sqlport/config.toml`). Every field has a
//! default, so an absent file is not an error. CLI flags override file
//! values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dialect::{DialectDefinition, LimitStyle};
use crate::error::{ConvertError, ConvertResult};
use crate::transpiler::GeneratorOptions;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "sqlport.toml";

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Source dialect. Only `mysql` is accepted.
    pub source: String,
    /// Target dialect name (`dameng`, `oracle`, `generic`).
    pub target: String,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// JSON-lines diagnostics file.
    pub log_file: Option<PathBuf>,
    pub pretty: bool,
    pub limit_style: LimitStyle,
    /// Worker count; 1 runs sequentially.
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "mysql".to_string(),
            target: "dameng".to_string(),
            input: None,
            output: None,
            log_file: None,
            pretty: true,
            limit_style: LimitStyle::Limit,
            jobs: 1,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the first file found in the
    /// search order, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> ConvertResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::search_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// First existing config file in the search order.
    pub fn search_path() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("sqlport").join("config.toml"))
            .filter(|path| path.is_file())
    }

    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> ConvertResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if !self.source.eq_ignore_ascii_case("mysql") {
            return Err(ConvertError::Config(format!(
                "unsupported source dialect '{}'",
                self.source
            )));
        }
        self.dialect()?;
        if self.jobs == 0 {
            return Err(ConvertError::Config("jobs must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn dialect(&self) -> ConvertResult<Arc<DialectDefinition>> {
        DialectDefinition::by_name(&self.target)
            .ok_or_else(|| ConvertError::Config(format!("unknown target dialect '{}'", self.target)))
    }

    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            pretty: self.pretty,
            limit_style: self.limit_style,
        }
    }

    /// Builder for programmatic configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn target(mut self, name: impl Into<String>) -> Self {
        self.config.target = name.into();
        self
    }

    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = Some(path.into());
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = Some(path.into());
        self
    }

    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn limit_style(mut self, style: LimitStyle) -> Self {
        self.config.limit_style = style;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn build(self) -> ConvertResult<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_file() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.pretty);
        assert_eq!(config.jobs, 1);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
            target = "oracle"
            pretty = false
            limit_style = "top"
            log_file = "convert.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.target, "oracle");
        assert_eq!(config.limit_style, LimitStyle::Top);
        assert_eq!(config.log_file, Some(PathBuf::from("convert.log")));
        assert_eq!(config.dialect().unwrap().name(), "oracle");
        assert!(!config.generator_options().pretty);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_toml(r#"target = "sqlite""#),
            Err(ConvertError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml(r#"source = "postgres""#),
            Err(ConvertError::Config(_))
        ));
        assert!(matches!(Config::from_toml("jobs = 0"), Err(ConvertError::Config(_))));
        assert!(matches!(Config::from_toml("colour = true"), Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = Config::builder().jobs(4).pretty(false).build().unwrap();
        assert_eq!(config.jobs, 4);
        assert!(Config::builder().target("nope").build().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqlport.toml");
        std::fs::write(&path, "jobs = 2\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().jobs, 2);
    }
}
