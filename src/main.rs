// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_toolset::{
    CommandLineInput, ExportConfig, Exporter, HttpAssetFetcher, NotionHttpClient,
    NotionRepository,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("notion_toolset.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {T} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("failed to initialize logging")?;

    let config = ExportConfig::resolve(cli)?;
    let client = NotionHttpClient::new(&config.api_key)?;
    let repository: Arc<dyn NotionRepository> = Arc::new(client);

    let mut exporter = Exporter::new(
        config,
        repository,
        Arc::new(HttpAssetFetcher::new()),
        tokio::runtime::Handle::current(),
    );
    exporter.validate()?;

    // Workers block on the runtime, so the export runs off the async threads.
    let summary = tokio::task::spawn_blocking(move || exporter.run())
        .await
        .context("export task failed")??;

    if summary.failed > 0 {
        log::warn!(
            "{} of {} pages failed to export; see the log for details",
            summary.failed,
            summary.exported + summary.failed
        );
    }

    Ok(())
}
