//! Domain model for Notion content consumed by the transformer.

mod block;
pub mod blocks;
pub mod common;
mod property_value;

pub use block::Block;
pub use blocks::*;
pub use common::*;
pub use property_value::PropertyValue;

use crate::types::{concat_plain_text, BlockId, DatabaseId, PageId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A Notion page
///
/// Properties keep the order the API returned them in; exports sort
/// keys themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub url: String,
    pub properties: IndexMap<String, PropertyValue>,
    pub parent: Parent,
    pub archived: bool,
}

impl Page {
    pub fn new(id: PageId, parent: Parent) -> Self {
        Self {
            id,
            url: String::new(),
            properties: IndexMap::new(),
            parent,
            archived: false,
        }
    }

    pub fn with_property(mut self, name: &str, value: PropertyValue) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    /// Plain text of the page's title property, empty when it has none.
    pub fn title(&self) -> String {
        self.properties
            .values()
            .find_map(|value| match value {
                PropertyValue::Title(title) => Some(concat_plain_text(title)),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Rows of a database carry user-defined properties; standalone pages
    /// only have a title.
    pub fn is_database_row(&self) -> bool {
        matches!(self.parent, Parent::Database { .. })
    }
}

/// Parent reference with typed IDs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Parent {
    #[serde(rename = "page_id")]
    Page { page_id: PageId },
    #[serde(rename = "database_id")]
    Database { database_id: DatabaseId },
    #[serde(rename = "block_id")]
    Block { block_id: BlockId },
    #[serde(rename = "workspace")]
    Workspace,
}
