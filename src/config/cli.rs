use crate::config::TomlConfig;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "azba-feed")]
#[command(about = "Serves the RTBA zone activation schedule as JSON")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the schedule page URL")]
    pub source_url: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Listen address, e.g. 0.0.0.0:8080")]
        bind: Option<String>,
    },
    /// Fetch and print the schedule once
    Fetch {
        #[arg(long, help = "Only this zone, e.g. R45S3")]
        zone: Option<String>,

        #[arg(long, help = "Reference instant (RFC 3339), defaults to now")]
        now: Option<DateTime<Utc>>,

        #[arg(long, help = "Parse a saved HTML page instead of fetching")]
        input: Option<PathBuf>,
    },
}

impl CliConfig {
    /// File settings (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.source_url {
            config.source.url = url.clone();
        }
        if let Command::Serve { bind: Some(bind) } = &self.command {
            config.server.bind = bind.clone();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::{DEFAULT_BIND, DEFAULT_SOURCE_URL};
    use chrono::TimeZone;

    #[test]
    fn test_serve_with_bind_override() {
        let cli = CliConfig::try_parse_from(["azba-feed", "serve", "--bind", "127.0.0.1:3000"])
            .unwrap();
        let config = cli.resolve().unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn test_serve_defaults() {
        let cli = CliConfig::try_parse_from(["azba-feed", "serve"]).unwrap();
        assert_eq!(cli.resolve().unwrap().server.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_fetch_arguments() {
        let cli = CliConfig::try_parse_from([
            "azba-feed",
            "fetch",
            "--zone",
            "R45S3",
            "--now",
            "2025-11-17T07:00:00Z",
            "--source-url",
            "http://localhost:9000/schedules",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match &cli.command {
            Command::Fetch { zone, now, input } => {
                assert_eq!(zone.as_deref(), Some("R45S3"));
                assert_eq!(
                    *now,
                    Some(Utc.with_ymd_and_hms(2025, 11, 17, 7, 0, 0).unwrap())
                );
                assert!(input.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(
            cli.resolve().unwrap().source.url,
            "http://localhost:9000/schedules"
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliConfig::try_parse_from(["azba-feed"]).is_err());
    }
}
