use anyhow::Context;
use azba_feed::core::assemble::normalize_zone_filter;
use azba_feed::core::PageSource;
use azba_feed::utils::error::ErrorKind;
use azba_feed::utils::{logger, validation::Validate};
use azba_feed::{
    server, CliConfig, Command, HttpPageSource, ResultDocument, SchedulePipeline, ScheduleEngine,
    ScheduleRequest, StaticPageSource, TomlConfig,
};
use chrono::Utc;
use clap::Parser;

async fn run_once<S: PageSource>(
    source: S,
    config: &TomlConfig,
    request: &ScheduleRequest,
) -> azba_feed::Result<ResultDocument> {
    let engine = ScheduleEngine::new(SchedulePipeline::with_config(source, config));
    engine.run(request).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting azba-feed");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli.resolve().context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    match &cli.command {
        Command::Serve { .. } => server::serve(&config).await?,
        Command::Fetch { zone, now, input } => {
            let request = ScheduleRequest::new(now.unwrap_or_else(Utc::now), zone.as_deref());
            let result = match input {
                Some(path) => run_once(StaticPageSource::from_file(path)?, &config, &request).await,
                None => run_once(HttpPageSource::from_config(&config)?, &config, &request).await,
            };

            match result {
                Ok(document) => {
                    println!("{}", serde_json::to_string_pretty(&document)?);
                    if let Some(name) = zone.as_deref().and_then(normalize_zone_filter) {
                        eprintln!("{}: {}", name, document.indicator_for(&name));
                    }
                }
                Err(e) => {
                    tracing::error!("❌ Fetch failed: {} (Kind: {:?})", e, e.kind());
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                    eprintln!("❌ {}", e);

                    let exit_code = match e.kind() {
                        ErrorKind::FetchFailure => 2,
                        ErrorKind::SectionNotFound => 3,
                        ErrorKind::Configuration | ErrorKind::Internal => 1,
                    };
                    std::process::exit(exit_code);
                }
            }
        }
    }

    Ok(())
}
