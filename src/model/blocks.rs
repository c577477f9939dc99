use super::common::BlockCommon;
use crate::types::{BlockId, DatabaseId, PageId, RichTextItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Block whose only payload is a run of rich text.
///
/// Shared by paragraphs, headings, list items, toggles, quotes, callouts
/// and templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
}

impl TextBlock {
    pub fn new(id: BlockId, rich_text: Vec<RichTextItem>) -> Self {
        Self {
            common: BlockCommon::new(id),
            rich_text,
        }
    }

    pub fn with_children(mut self) -> Self {
        self.common = self.common.with_children();
        self
    }
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
    pub checked: bool,
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub rich_text: Vec<RichTextItem>,
    /// Notion language name; `None` for plain text.
    pub language: Option<String>,
    pub caption: Vec<RichTextItem>,
}

/// Equation block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationBlock {
    pub common: BlockCommon,
    pub expression: String,
}

/// Where a media block's bytes live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileObject {
    /// Linked from elsewhere on the web; stable URL.
    External { url: String },
    /// Uploaded to Notion; the URL is signed and expires.
    Hosted {
        url: String,
        expiry_time: Option<DateTime<Utc>>,
    },
}

impl FileObject {
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { url } | FileObject::Hosted { url, .. } => url,
        }
    }
}

/// Image, video, file, PDF and audio blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBlock {
    pub common: BlockCommon,
    pub source: FileObject,
    pub caption: Vec<RichTextItem>,
}

/// Bookmark, embed and link preview blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlBlock {
    pub common: BlockCommon,
    pub url: String,
    pub caption: Vec<RichTextItem>,
}

/// Child page and child database blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitledBlock {
    pub common: BlockCommon,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkTarget {
    Page(PageId),
    Database(DatabaseId),
}

/// Link to page block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkToPageBlock {
    pub common: BlockCommon,
    pub target: LinkTarget,
}

/// Table block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// Synced block
///
/// `synced_from` is `None` for the original (source) block and points at
/// the source for every reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedBlock {
    pub common: BlockCommon,
    pub synced_from: Option<BlockId>,
}

/// Dividers, breadcrumbs, tables of contents, column lists and columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EmptyBlock {
    pub common: BlockCommon,
}

/// Unsupported block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}
