//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ShareIt item-sharing server
#[derive(Parser, Debug)]
#[command(name = "shareit")]
#[command(about = "Item sharing service: users lend items, others request and book them")]
#[command(long_about = "
ShareIt lets users list items they are willing to lend, book items owned by
others, leave comments after a booking ends and post requests for items
nobody offers yet.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    shareit serve

    # Bind to every interface on port 8080
    shareit serve --host 0.0.0.0 --port 8080

    # Use an explicit configuration file
    shareit --config /etc/shareit/shareit.toml serve

    # Check configuration without starting the server
    shareit serve --dry-run
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file layered on top of the config directory
    ///
    /// Example: --config /etc/shareit/production.toml
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SHAREIT_CONFIG_FILE",
        value_parser = super::validation::validate_config_file_path
    )]
    pub config: Option<PathBuf>,

    /// Override environment detection (SHAREIT_ENV)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Examples:
    ///   shareit serve                            # Start with defaults
    ///   shareit serve --host 0.0.0.0 --port 80   # Bind to all interfaces on port 80
    ///   shareit serve --dry-run                  # Validate config without starting
    Serve {
        /// Address to bind to; overrides server.host
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port to listen on; overrides server.port
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// True when running with `serve --dry-run`.
    pub fn is_dry_run(&self) -> bool {
        matches!(self.command, Some(Commands::Serve { dry_run: true, .. }))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
        .to_string()
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["shareit", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["shareit"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.is_dry_run());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_serve_arguments() {
        let cli = Cli::try_parse_from([
            "shareit",
            "--env",
            "prod",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--log-level",
            "warning",
        ])
        .unwrap();

        assert_eq!(cli.env, Some(Environment::Production));
        match cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                dry_run,
            }) => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
                assert_eq!(log_level, Some(LogLevel::Warn));
                assert!(!dry_run);
            }
            None => panic!("expected serve"),
        }
    }

    #[test]
    fn test_dry_run() {
        let cli = Cli::try_parse_from(["shareit", "serve", "--dry-run"]).unwrap();
        assert!(cli.is_dry_run());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let err = Cli::try_parse_from(["shareit", "-v", "-q"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_port_zero_rejected() {
        assert!(Cli::try_parse_from(["shareit", "serve", "--port", "0"]).is_err());
    }
}
