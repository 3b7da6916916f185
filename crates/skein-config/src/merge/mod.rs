//! Configuration layering, fallback logic, and environment overrides

use crate::toml::{self as skein_toml, SkeinToml};
use crate::{ConfigResult, CONFIG_FILE_NAME};
use camino::{Utf8Path, Utf8PathBuf};
use skein_core::error::SkeinError;
use std::collections::HashMap;
use tracing::debug;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "SKEIN_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Home directory holding `.skein/config.toml`
    home: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Project skein.toml file
    ProjectToml(Utf8PathBuf),
    /// Built-in defaults
    Defaults,
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let home = dirs::home_dir().and_then(|home| Utf8PathBuf::try_from(home).ok());
        Self { cwd, home }
    }

    /// Use a different home directory for the global config
    pub fn with_home(mut self, home: Option<Utf8PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.is_file() {
                return Some(config_path);
            }
            // Move up one directory
            current = dir.parent();
        }

        None
    }

    /// Path of the global configuration file
    pub fn global_config_path(&self) -> Option<Utf8PathBuf> {
        self.home.as_ref().map(|home| home.join(".skein").join("config.toml"))
    }

    /// Load project configuration, falling back to defaults
    pub async fn load_project_config(&self) -> ConfigResult<(SkeinToml, ConfigSource)> {
        match self.resolve_config_path(CONFIG_FILE_NAME) {
            Some(path) => {
                let config = skein_toml::load_from_file(&path).await?;
                Ok((config, ConfigSource::ProjectToml(path)))
            },
            None => Ok((SkeinToml::default(), ConfigSource::Defaults)),
        }
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<SkeinToml>> {
        match self.global_config_path() {
            Some(path) if path.is_file() => Ok(Some(skein_toml::load_from_file(&path).await?)),
            _ => Ok(None),
        }
    }

    /// Load every layer with overrides from the process environment
    pub async fn load(
        &self,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<(SkeinToml, Vec<ConfigSource>)> {
        let env_overrides = ConfigLayering::collect_env_overrides();
        self.load_with(&env_overrides, cli_overrides).await
    }

    /// Load every layer: global, project, environment, then CLI
    pub async fn load_with(
        &self,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<(SkeinToml, Vec<ConfigSource>)> {
        let mut sources = Vec::new();

        let global = match self.global_config_path() {
            Some(path) if path.is_file() => {
                let table = skein_toml::load_table_from_file(&path).await?;
                sources.push(ConfigSource::Global(path));
                Some(table)
            },
            _ => None,
        };

        let project = match self.resolve_config_path(CONFIG_FILE_NAME) {
            Some(path) => {
                let table = skein_toml::load_table_from_file(&path).await?;
                sources.push(ConfigSource::ProjectToml(path));
                Some(table)
            },
            None => None,
        };

        if sources.is_empty() {
            sources.push(ConfigSource::Defaults);
        }
        sources.extend(
            env_overrides
                .keys()
                .filter(|key| env_key_to_field(key).is_some())
                .map(|key| ConfigSource::Environment(key.clone())),
        );
        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let merged = ConfigLayering::merge_configs(global, project, env_overrides, cli_overrides)?;
        debug!(?sources, "Configuration loaded");
        Ok((merged, sources))
    }
}

impl ConfigLayering {
    /// Merge multiple configuration layers.
    ///
    /// Precedence, lowest first: global file, project file, environment, CLI.
    /// File layers merge key by key, so a project file only overrides the
    /// keys it sets.
    pub fn merge_configs(
        global_config: Option<::toml::Table>,
        project_config: Option<::toml::Table>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<SkeinToml> {
        let mut merged = global_config.unwrap_or_default();
        if let Some(project) = project_config {
            merge_tables(&mut merged, project);
        }

        let mut config = skein_toml::from_table(merged)?;

        // Apply environment variable overrides
        for (key, value) in env_overrides {
            match env_key_to_field(key) {
                Some(field) => apply_override(&mut config, field, value, key)?,
                // Unknown environment variable, ignore
                None => debug!(key = %key, "Ignoring unknown environment override"),
            }
        }

        // Apply CLI flag overrides (highest priority)
        for (field, value) in cli_overrides {
            apply_override(&mut config, field, value, field)?;
        }

        skein_toml::validate_config(&config)?;
        Ok(config)
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)).collect()
    }
}

/// Recursively overlay `overlay` onto `base`
fn merge_tables(base: &mut ::toml::Table, overlay: ::toml::Table) {
    for (key, value) in overlay {
        let value = match (base.get_mut(&key), value) {
            (Some(::toml::Value::Table(existing)), ::toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
                continue;
            },
            (_, value) => value,
        };
        base.insert(key, value);
    }
}

fn env_key_to_field(key: &str) -> Option<&'static str> {
    match key {
        "SKEIN_FINGERPRINT_ALGORITHM" => Some("fingerprint.algorithm"),
        "SKEIN_FINGERPRINT_VERBOSE" => Some("fingerprint.verbose"),
        "SKEIN_JOB_JSON_STYLE" => Some("job.json-style"),
        "SKEIN_TABLE_COLUMNS" => Some("table.columns"),
        _ => None,
    }
}

/// Set one dotted configuration field from its string form
fn apply_override(config: &mut SkeinToml, field: &str, value: &str, origin: &str) -> ConfigResult<()> {
    match field {
        "fingerprint.algorithm" => {
            config.fingerprint.algorithm = value.parse().map_err(|e| relabel(e, origin))?;
        },
        "fingerprint.verbose" => {
            config.fingerprint.verbose =
                value.trim().parse().map_err(|e| SkeinError::ConfigValidation {
                    field: origin.to_string(),
                    reason: format!("invalid verbosity '{}': {}", value, e),
                })?;
        },
        "job.json-style" => {
            config.job.json_style = value.parse().map_err(|e| relabel(e, origin))?;
        },
        "table.columns" => {
            config.table.columns = value
                .split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .map(str::to_string)
                .collect();
        },
        _ => {
            return Err(SkeinError::ConfigValidation {
                field: origin.to_string(),
                reason: format!("unknown configuration key '{}'", field),
            });
        },
    }
    Ok(())
}

/// Report a parse failure against the key the user actually set
fn relabel(error: SkeinError, origin: &str) -> SkeinError {
    match error {
        SkeinError::ConfigValidation { reason, .. } => SkeinError::ConfigValidation {
            field: origin.to_string(),
            reason,
        },
        other => other,
    }
}

/// Convert a `std::path::Path` into a UTF-8 path, naming `field` on failure
pub fn utf8_path(path: &std::path::Path, field: &str) -> ConfigResult<Utf8PathBuf> {
    Utf8Path::from_path(path)
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| SkeinError::ConfigValidation {
            field: field.to_string(),
            reason: format!("{} is not valid UTF-8", path.display()),
        })
}
