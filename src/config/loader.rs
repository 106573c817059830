//! Layered configuration loading.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `<dir>/default.toml`
//! 3. `<dir>/{environment}.toml`
//! 4. `<dir>/local.toml`
//! 5. an explicit file (`--config` or `SHAREIT_CONFIG_FILE`)
//! 6. `SHAREIT_*` environment variables, `__` separating nested keys
//!
//! Only the explicit file is required to exist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "SHAREIT_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "SHAREIT_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

const ENV_PREFIX: &str = "SHAREIT";

const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
    /// Replaces the process environment as the variable source when set.
    env_overrides: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader driven by `SHAREIT_CONFIG_DIR`, `SHAREIT_CONFIG_FILE` and `SHAREIT_ENV`.
    pub fn new() -> Self {
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
        let config_file = std::env::var(CONFIG_FILE_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            config_dir,
            config_file,
            environment: AppEnvironment::from_env(),
            env_overrides: None,
        }
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(file.into());
        self
    }

    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Use `vars` instead of the process environment for `SHAREIT_*` overrides.
    pub fn with_env_overrides(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Merge all sources, deserialize and validate.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Merge and deserialize without range checks, for callers that apply
    /// further overrides before validating.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let defaults = Config::try_from(&Settings::default())?;
        let mut builder = Config::builder().add_source(defaults);

        for name in [
            "default".to_string(),
            self.environment.as_str().to_string(),
            "local".to_string(),
        ] {
            let path = self.config_dir.join(format!("{}.toml", name));
            builder = add_file_source(builder, &path, false)?;
        }

        if let Some(ref file) = self.config_file {
            builder = add_file_source(builder, file, true)?;
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .source(self.env_overrides.clone()),
        );

        builder.build().map_err(ConfigError::from)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn add_file_source(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if required && !path.is_file() {
        return Err(ConfigError::file_not_found(path.display().to_string()));
    }
    let name = path
        .to_str()
        .ok_or_else(|| ConfigError::ParseError(format!("Non UTF-8 path: {}", path.display())))?;

    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
}
