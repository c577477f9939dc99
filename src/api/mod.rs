// src/api/mod.rs
//! Notion API interaction: the ability to retrieve content from a workspace.
//!
//! Business logic depends on [`NotionRepository`]; the HTTP client, parsing
//! and pagination live behind it.

pub mod client;
pub mod notion_client_adapter;
mod pagination;
pub mod parser;
mod responses;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::{BlockId, DatabaseId, PageId};

/// The ability to retrieve content from a Notion workspace.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_page(&self, id: &PageId) -> Result<Page, AppError>;

    /// Every child of `parent`, across all result pages.
    async fn retrieve_children(&self, parent: &BlockId) -> Result<Vec<Block>, AppError>;

    /// Runs a database query with the given request body.
    ///
    /// With a `limit` only the first batch is fetched, sized to the limit.
    async fn query_database(
        &self,
        database: &DatabaseId,
        body: serde_json::Value,
        limit: Option<usize>,
    ) -> Result<Vec<Page>, AppError>;
}

pub use client::NotionHttpClient;
pub use pagination::{fetch_all_pages, PaginationResult};
pub use responses::PaginatedResponse;
