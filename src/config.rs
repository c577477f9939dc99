// src/config.rs
use crate::constants::{DEFAULT_EXPORT_SPEED, NOTION_API_KEY_ENV};
use crate::error::AppError;
use crate::transform::MarkdownConfig;
use crate::types::{ApiKey, DatabaseId, PageId};
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Export a single Notion page (URL or ID)
    #[arg(long, conflicts_with = "database", required_unless_present = "database")]
    pub page: Option<String>,

    /// Export every page of a Notion database (URL or ID)
    #[arg(long)]
    pub database: Option<String>,

    /// Output directory for Markdown files (defaults to the current directory for --page)
    #[arg(short = 'd', long)]
    pub directory: Option<PathBuf>,

    /// Output directory for downloaded images
    #[arg(long)]
    pub asset_directory: Option<PathBuf>,

    /// Name exported files after the page title instead of the page ID
    #[arg(long, default_value_t = false)]
    pub use_title_as_filename: bool,

    /// Replace FROM with TO in titles used as filenames
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    pub replace_title: Vec<String>,

    /// Only export database pages edited within the last N days
    #[arg(long)]
    pub lookback_days: Option<u32>,

    /// Raw Notion filter object (JSON) for the database query
    #[arg(long)]
    pub filter: Option<String>,

    /// Requests per second against the Notion API (1 to 3)
    #[arg(long, default_value_t = DEFAULT_EXPORT_SPEED)]
    pub export_speed: f64,

    /// Fetch only the first N database pages
    #[arg(long)]
    pub debug_limit: Option<usize>,

    /// Dump every fetched page and child list as JSON into this directory
    #[arg(long, value_name = "DIR")]
    pub debug_cache: Option<PathBuf>,

    /// Omit the `aliases:` front matter line
    #[arg(long, default_value_t = false)]
    pub no_alias: bool,

    /// Directory of exported notes used to resolve page mentions to aliases
    #[arg(long)]
    pub alias_index: Option<PathBuf>,

    /// Omit page properties from the front matter
    #[arg(long, default_value_t = false)]
    pub no_front_matter: bool,

    /// Comma-separated front matter keys, in output order
    #[arg(long, value_delimiter = ',')]
    pub front_matter: Vec<String>,

    /// Omit the metadata list
    #[arg(long, default_value_t = false)]
    pub no_metadata: bool,

    /// Comma-separated metadata keys, in output order
    #[arg(long, value_delimiter = ',')]
    pub metadata: Vec<String>,

    /// Write the page title as a level-one heading
    #[arg(long, default_value_t = false)]
    pub title_to_h1: bool,

    /// Write select properties as #tags
    #[arg(long, default_value_t = false)]
    pub select_to_tags: bool,

    /// Write plain text without Markdown decoration
    #[arg(long, default_value_t = false)]
    pub plain_text: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CommandLineInput {
    fn markdown_config(&self) -> MarkdownConfig {
        MarkdownConfig {
            suppress_alias_line: self.no_alias,
            alias_index_directory: self.alias_index.clone(),
            suppress_front_matter: self.no_front_matter,
            front_matter_keys: self.front_matter.clone(),
            suppress_metadata: self.no_metadata,
            metadata_keys: self.metadata.clone(),
            title_as_heading: self.title_to_h1,
            select_as_hash_tag: self.select_to_tags,
            plain_text_only: self.plain_text,
        }
    }
}

/// What an export run starts from.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportSource {
    /// One page and the pages it contains.
    Page(PageId),
    Database(DatabaseId),
}

/// Resolved export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub source: ExportSource,
    pub api_key: ApiKey,
    /// Empty until validation fills in the default for single-page exports.
    pub directory: PathBuf,
    pub asset_directory: Option<PathBuf>,
    pub use_title_as_filename: bool,
    pub replace_title: Option<(String, String)>,
    pub lookback_days: Option<u32>,
    pub filter: Option<serde_json::Value>,
    pub export_speed: f64,
    pub debug_limit: Option<usize>,
    /// Where fetched API objects are dumped, if anywhere.
    pub debug_cache: Option<PathBuf>,
    pub markdown: MarkdownConfig,
    pub verbose: bool,
}

impl ExportConfig {
    /// A configuration with every option at its default.
    pub fn new(source: ExportSource, api_key: ApiKey) -> Self {
        Self {
            source,
            api_key,
            directory: PathBuf::new(),
            asset_directory: None,
            use_title_as_filename: false,
            replace_title: None,
            lookback_days: None,
            filter: None,
            export_speed: DEFAULT_EXPORT_SPEED,
            debug_limit: None,
            debug_cache: None,
            markdown: MarkdownConfig::default(),
            verbose: false,
        }
    }

    /// Resolves CLI input against the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key = std::env::var(NOTION_API_KEY_ENV).map_err(|_| {
            AppError::MissingConfiguration(format!(
                "{} environment variable not set",
                NOTION_API_KEY_ENV
            ))
        })?;
        Self::from_input(cli, &api_key)
    }

    fn from_input(cli: CommandLineInput, api_key: &str) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key)?;

        let source = match (&cli.page, &cli.database) {
            (Some(page), None) => ExportSource::Page(PageId::parse(page)?),
            (None, Some(database)) => ExportSource::Database(DatabaseId::parse(database)?),
            _ => {
                return Err(AppError::MissingConfiguration(
                    "exactly one of --page or --database is required".to_string(),
                ))
            }
        };

        let filter = cli
            .filter
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|e| AppError::Validation(format!("--filter is not valid JSON: {}", e)))?;

        let replace_title = match cli.replace_title.as_slice() {
            [from, to] => Some((from.clone(), to.clone())),
            _ => None,
        };

        Ok(Self {
            markdown: cli.markdown_config(),
            source,
            api_key,
            directory: cli.directory.unwrap_or_default(),
            asset_directory: cli.asset_directory,
            use_title_as_filename: cli.use_title_as_filename,
            replace_title,
            lookback_days: cli.lookback_days,
            filter,
            export_speed: cli.export_speed,
            debug_limit: cli.debug_limit,
            debug_cache: cli.debug_cache,
            verbose: cli.verbose,
        })
    }

    pub fn is_single_page(&self) -> bool {
        matches!(self.source, ExportSource::Page(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "secret_abcdefghijklmnopqrstuvwxyz0123456789";

    fn parse(args: &[&str]) -> CommandLineInput {
        CommandLineInput::try_parse_from(std::iter::once("notion-toolset").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_page_source_with_markdown_flags() {
        let cli = parse(&[
            "--page",
            "https://www.notion.so/Trip-550e8400e29b41d4a716446655440000",
            "--no-alias",
            "--front-matter",
            "Status,Tags",
            "--select-to-tags",
        ]);
        let config = ExportConfig::from_input(cli, KEY).unwrap();

        assert_eq!(
            config.source,
            ExportSource::Page(PageId::parse("550e8400e29b41d4a716446655440000").unwrap())
        );
        assert!(config.markdown.suppress_alias_line);
        assert!(config.markdown.select_as_hash_tag);
        assert_eq!(config.markdown.front_matter_keys, vec!["Status", "Tags"]);
        assert_eq!(config.export_speed, DEFAULT_EXPORT_SPEED);
        assert!(config.directory.as_os_str().is_empty());
    }

    #[test]
    fn test_database_source_with_filter_and_replace() {
        let cli = parse(&[
            "--database",
            "550e8400-e29b-41d4-a716-446655440000",
            "--directory",
            "/tmp/out",
            "--replace-title",
            "/",
            "-",
            "--filter",
            r#"{"property": "Done", "checkbox": {"equals": true}}"#,
            "--debug-limit",
            "5",
            "--debug-cache",
            "temp",
        ]);
        let config = ExportConfig::from_input(cli, KEY).unwrap();

        assert!(!config.is_single_page());
        assert_eq!(config.directory, PathBuf::from("/tmp/out"));
        assert_eq!(
            config.replace_title,
            Some(("/".to_string(), "-".to_string()))
        );
        assert_eq!(config.debug_limit, Some(5));
        assert_eq!(config.debug_cache, Some(PathBuf::from("temp")));
        assert_eq!(config.filter.unwrap()["property"], "Done");
    }

    #[test]
    fn test_page_and_database_conflict() {
        let result = CommandLineInput::try_parse_from([
            "notion-toolset",
            "--page",
            "550e8400e29b41d4a716446655440000",
            "--database",
            "550e8400e29b41d4a716446655440000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_is_required() {
        assert!(CommandLineInput::try_parse_from(["notion-toolset"]).is_err());
    }

    #[test]
    fn test_invalid_filter_json() {
        let cli = parse(&[
            "--database",
            "550e8400e29b41d4a716446655440000",
            "--filter",
            "{not json",
        ]);
        let err = ExportConfig::from_input(cli, KEY).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_invalid_api_key() {
        let cli = parse(&["--page", "550e8400e29b41d4a716446655440000"]);
        assert!(ExportConfig::from_input(cli, "not-a-key").is_err());
    }
}
