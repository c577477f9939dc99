//! Notion block tree to Markdown transformer.
//!
//! The transformer walks a page's blocks depth-first on the calling
//! thread. Child lists and image downloads are requested through
//! crossbeam channels as [`BlockFuture`]s and [`AssetFuture`]s and
//! resolved by workers owned by the caller.

mod alias_index;
mod dispatch;
mod environment;
mod future;
mod markdown;
mod properties;
mod rich_text;

pub use alias_index::{build_alias_index, AliasIndex};
pub use dispatch::{renderer, Render};
pub use environment::{RenderContext, RenderEnv};
pub use future::{AssetFuture, AssetSender, BlockFuture, QuerySender, Resolution};
pub use markdown::Markdown;
pub use rich_text::{write_annotation, write_rich_text};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rendering options for one page.
///
/// The default renders everything: alias line, front matter, metadata
/// and Markdown decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkdownConfig {
    /// Skip the `aliases:` line in the front matter.
    pub suppress_alias_line: bool,
    /// Directory of previously exported documents used to resolve page
    /// mentions into aliases. `None` disables the lookup.
    pub alias_index_directory: Option<PathBuf>,
    pub suppress_front_matter: bool,
    /// Front matter keys in output order; empty selects every structured
    /// property alphabetically.
    pub front_matter_keys: Vec<String>,
    pub suppress_metadata: bool,
    /// Metadata keys in output order; empty selects every free-text or
    /// relation property alphabetically.
    pub metadata_keys: Vec<String>,
    pub title_as_heading: bool,
    /// Write select options as `#tags` and move them out of the front matter.
    pub select_as_hash_tag: bool,
    /// Drop all decoration, links, images and sync markers.
    pub plain_text_only: bool,
}

impl MarkdownConfig {
    /// Settings for exporting a single page as readable prose.
    pub fn single_page() -> Self {
        Self {
            suppress_alias_line: true,
            suppress_front_matter: true,
            suppress_metadata: true,
            title_as_heading: true,
            plain_text_only: true,
            ..Self::default()
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
