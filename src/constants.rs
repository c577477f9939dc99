// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Base URL of the public Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Environment variable holding the integration token.
pub const NOTION_API_KEY_ENV: &str = "NOTION_API_KEY";

// ---------------------------------------------------------------------------
// Retry schedule
// ---------------------------------------------------------------------------

pub const RETRY_MAX_ATTEMPTS: u32 = 3;
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_secs(1);
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Export throughput
// ---------------------------------------------------------------------------

/// Requests per second when none (or less than one) is configured.
pub const DEFAULT_EXPORT_SPEED: f64 = 2.8;

/// Notion averages three requests per second per integration.
pub const MAX_EXPORT_SPEED: f64 = 3.0;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One level of nesting below a list item or to-do.
pub const INDENT_UNIT: &str = "  ";

/// Number of worker threads reading files while the alias index is built.
pub const ALIAS_SCAN_WORKERS: usize = 10;

/// Only this many leading lines of an exported file are searched for its alias.
pub const ALIAS_SCAN_LINES: usize = 3;

/// Line prefix declaring a document's alias in its front matter.
pub const ALIAS_MARKER: &str = "aliases: ";

/// Extension of exported documents.
pub const MARKDOWN_EXTENSION: &str = "md";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
