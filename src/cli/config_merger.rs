//! Applies CLI overrides on top of file and environment configuration.
//!
//! Precedence, highest first: `serve` arguments, global flags, then whatever
//! [`ConfigLoader`] produced.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the layered configuration selected by `--config` and `--env`.
    ///
    /// Validation is deferred to [`merge_cli_args`](Self::merge_cli_args) so
    /// that a CLI override can repair an otherwise invalid file value.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_loader(Self::loader_for(cli))
    }

    pub(crate) fn from_loader(loader: ConfigLoader) -> Result<Self, ConfigError> {
        Ok(Self::new(loader.load_unvalidated()?))
    }

    fn loader_for(cli: &Cli) -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        if let Some(ref path) = cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        loader
    }

    /// Apply overrides and validate the result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, StorageBackend};
    use clap::Parser;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn memory_config() -> Settings {
        let mut config = Settings::default();
        config.database.backend = StorageBackend::Memory;
        config
    }

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(memory_config())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_global_flags() {
        assert_eq!(merge(&["shareit", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["shareit", "--quiet"]).logger.level, "error");
        assert_eq!(merge(&["shareit"]).logger.level, "info");
    }

    #[test]
    fn test_serve_overrides() {
        let settings = merge(&["shareit", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_command_log_level_beats_global_flag() {
        let settings = merge(&["shareit", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(settings.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let cli = Cli::try_parse_from(["shareit"]).unwrap();
        let result = ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_from_loader_then_cli_port_override() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 1234\n[database]\nbackend = \"memory\"\n",
        )
        .unwrap();
        let loader = ConfigLoader::new()
            .with_config_dir(dir.path())
            .with_environment(Environment::Test)
            .with_env_overrides(HashMap::new());

        let merger = ConfigurationMerger::from_loader(loader).unwrap();
        assert_eq!(merger.config().server.port, 1234);

        let cli = Cli::try_parse_from(["shareit", "serve", "--port", "4321"]).unwrap();
        assert_eq!(merger.merge_cli_args(&cli).unwrap().server.port, 4321);
    }
}
