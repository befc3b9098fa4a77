//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `--config <file>`, else `$XDG_CONFIG_HOME/forestry/forestry.toml`
//! 3. Environment variables: `FORESTRY_*` prefix
//! 4. Command line overrides (applied by the caller)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for forestry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding forest record (`.csv`) and saved forest (`.db`) files
    pub data_dir: PathBuf,
    /// Extension of record files read at startup
    pub import_extension: String,
    /// Extension of saved forest files
    pub store_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            import_extension: "csv".into(),
            store_extension: "db".into(),
        }
    }
}

/// Get the XDG config directory for forestry.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "forestry").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("forestry.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; returns the input unchanged if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Record file for the forest `name`.
    pub fn import_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", name, self.import_extension))
    }

    /// Saved forest file for the forest `name`.
    pub fn store_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", name, self.store_extension))
    }

    /// Expand shell variables and tilde in `data_dir`.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// An explicit `config_file` must exist; the global config file is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("import_extension", defaults.import_extension)
            .map_err(config_err)?
            .set_default("store_extension", defaults.store_extension)
            .map_err(config_err)?;

        match config_file {
            Some(path) => {
                debug!("load: config file {}", path.display());
                builder =
                    builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        debug!("load: global config {}", global_path.display());
                        builder = builder.add_source(
                            File::from(global_path)
                                .format(FileFormat::Toml)
                                .required(false),
                        );
                    }
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("FORESTRY")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        settings.expand_paths();

        Ok(settings)
    }

    /// Replace `data_dir`, expanding `~` and variables.
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        self.data_dir = data_dir.to_path_buf();
        self.expand_paths();
        self
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# forestry configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/forestry/forestry.toml (or --config <file>)
#   Env:  FORESTRY_* environment variables, e.g. FORESTRY_DATA_DIR
#   CLI:  --data-dir

# Directory holding <forest>.csv record files and saved <forest>.db files
# data_dir = "."

# Extension of record files read at startup
# import_extension = "csv"

# Extension of saved forest files
# store_extension = "db"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_default_settings_when_created_then_uses_csv_and_db() {
        let settings = Settings::default();
        assert_eq!(settings.data_dir, PathBuf::from("."));
        assert_eq!(settings.import_extension, "csv");
        assert_eq!(settings.store_extension, "db");
    }

    #[test]
    fn given_settings_when_building_paths_then_joins_name_and_extension() {
        let settings = Settings {
            data_dir: PathBuf::from("/data"),
            ..Settings::default()
        };
        assert_eq!(settings.import_path("Montane"), PathBuf::from("/data/Montane.csv"));
        assert_eq!(settings.store_path("Montane"), PathBuf::from("/data/Montane.db"));
    }

    #[test]
    fn given_tilde_in_data_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/forests"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let data_dir = settings.data_dir.to_string_lossy();
        assert!(
            data_dir.starts_with(&home),
            "data_dir should start with home dir: {}",
            data_dir
        );
        assert!(!data_dir.contains('~'));
    }

    #[test]
    fn given_config_file_when_loading_then_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("forestry.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/srv/forests"
store_extension = "forest"
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).expect("load settings");

        assert_eq!(settings.data_dir, PathBuf::from("/srv/forests"));
        assert_eq!(settings.store_extension, "forest");
        assert_eq!(settings.import_extension, "csv");
    }

    #[test]
    fn given_missing_explicit_config_when_loading_then_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        let result = Settings::load(Some(&path));

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_invalid_toml_when_loading_then_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "data_dir = [unclosed").unwrap();

        let result = Settings::load(Some(&path));

        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_settings_when_to_toml_then_parses_back() {
        let settings = Settings {
            data_dir: PathBuf::from("/tmp/forests"),
            ..Settings::default()
        };
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn given_data_dir_override_when_applied_then_replaces_and_expands() {
        let home = std::env::var("HOME").expect("HOME should be set");
        let settings = Settings::default().with_data_dir(Path::new("~/woods"));
        assert_eq!(settings.data_dir, PathBuf::from(home).join("woods"));
    }
}
