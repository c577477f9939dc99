// src/lib.rs
//! notion-toolset library: exports Notion pages and databases as Markdown.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `FetchError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `ExportConfig`, `MarkdownConfig`
//! - **Domain model**: `Page`, `Block`, `PropertyValue`, etc.
//! - **Domain types**: `ApiKey`, `BlockId`, `PageId`, `RichTextItem`, etc.
//! - **API client**: `NotionRepository`, `NotionHttpClient`
//! - **Transformation**: `Markdown`, `BlockFuture`, `AssetFuture`, `AliasIndex`
//! - **Export**: `Exporter`, `download_asset`, `AssetFetcher`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod export;
pub mod model;
pub mod transform;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, FetchError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig, ExportSource};
pub use crate::transform::MarkdownConfig;

// --- Domain Model ---
pub use crate::model::{Block, BlockCommon, Page, Parent, PropertyValue};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, DatabaseId, DateOrDateTime, DateValue, Link, Mention, PageId,
    PartialUser, RichTextItem, RichTextType, SelectOption,
};

// --- API Client ---
pub use crate::api::{NotionHttpClient, NotionRepository};

// --- Transformation ---
pub use crate::transform::{
    build_alias_index, AliasIndex, AssetFuture, AssetSender, BlockFuture, Markdown, QuerySender,
};

// --- Export ---
pub use crate::export::{
    download_asset, AssetFetcher, ExportSummary, Exporter, HttpAssetFetcher,
};
