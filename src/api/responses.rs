// src/api/responses.rs
//! API response types parsed through notion-client's object definitions.

use serde::{Deserialize, Serialize};

pub use notion_client::objects::{
    block::Block as NotionBlock, error::Error as NotionError, page::Page as NotionPage,
};

/// Generic paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Database query response using notion-client types
pub type QueryDatabaseResponse = PaginatedResponse<NotionPage>;

/// Block children response using notion-client types
pub type RetrieveBlockChildrenResponse = PaginatedResponse<NotionBlock>;

/// Trait for converting notion-client types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, crate::error::AppError>;
}

impl ToDomain<crate::model::Page> for NotionPage {
    fn to_domain(self) -> Result<crate::model::Page, crate::error::AppError> {
        crate::api::notion_client_adapter::convert_page(self)
    }
}

impl ToDomain<crate::model::Block> for NotionBlock {
    fn to_domain(self) -> Result<crate::model::Block, crate::error::AppError> {
        crate::api::notion_client_adapter::convert_block(self)
    }
}

impl<T> PaginatedResponse<T> {
    /// Converts every result, keeping the cursor fields.
    pub fn into_domain<U>(self) -> Result<PaginatedResponse<U>, crate::error::AppError>
    where
        T: ToDomain<U>,
    {
        Ok(PaginatedResponse {
            object: self.object,
            results: self
                .results
                .into_iter()
                .map(ToDomain::to_domain)
                .collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}
