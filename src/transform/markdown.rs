use super::alias_index::{build_alias_index, AliasIndex};
use super::dispatch::{renderer, Render};
use super::environment::{RenderContext, RenderEnv};
use super::future::{AssetSender, BlockFuture, QuerySender};
use super::properties::{write_front_matter, write_metadata, write_title};
use super::MarkdownConfig;
use crate::constants::CHARS_PER_BLOCK_ESTIMATE;
use crate::error::FetchError;
use crate::model::{Block, Page, SyncedBlock};
use crate::types::BlockId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

/// Transforms one page and its block tree into Markdown.
///
/// Child lists are requested on the query channel and cached per block id
/// for the lifetime of the transformer, so a block referenced from several
/// places (a synced block's source) is fetched once. One instance must not
/// be shared between threads.
pub struct Markdown {
    config: MarkdownConfig,
    page: Page,
    blocks: Vec<Block>,
    children: RefCell<HashMap<BlockId, Arc<BlockFuture>>>,
    query: Option<QuerySender>,
    assets: Option<AssetSender>,
}

impl Markdown {
    pub fn new(config: MarkdownConfig, page: Page, blocks: Vec<Block>) -> Self {
        Self {
            config,
            page,
            blocks,
            children: RefCell::new(HashMap::new()),
            query: None,
            assets: None,
        }
    }

    /// Channel serviced by workers that fetch the children of a block.
    pub fn with_query_channel(mut self, query: QuerySender) -> Self {
        self.query = Some(query);
        self
    }

    /// Channel serviced by workers that download hosted images.
    pub fn with_asset_channel(mut self, assets: AssetSender) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Seeds the children cache so `block_id` is never requested.
    pub fn with_resolved_children(self, block_id: BlockId, blocks: Vec<Block>) -> Self {
        let future = Arc::new(BlockFuture::resolved(block_id.clone(), blocks));
        self.children.borrow_mut().insert(block_id, future);
        self
    }

    pub fn transform(&self) -> String {
        let mut out = Vec::with_capacity(self.blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
        if let Err(e) = self.transform_out(&mut out) {
            log::error!("Failed to render page {}: {}", self.page.id, e);
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Writes the page into `out`.
    ///
    /// Fetch failures only drop the affected subtree; the error returned
    /// here comes from the sink itself.
    pub fn transform_out(&self, out: &mut dyn io::Write) -> io::Result<()> {
        let aliases = match &self.config.alias_index_directory {
            Some(dir) => build_alias_index(dir),
            None => AliasIndex::new(),
        };
        let ctx = RenderContext::new(out, &self.config, &aliases, self.assets.as_ref());
        let env = RenderEnv::root(&ctx);

        write_front_matter(&env, &self.page)?;
        if self.config.title_as_heading {
            write_title(&env, &self.page)?;
        }
        write_metadata(&env, &self.page)?;

        self.walk(&env, &self.blocks, false)
    }

    /// Renders one sibling list. `lead` separates the first rendered
    /// sibling from a parent line written just above it.
    fn walk<'a>(
        &self,
        env: &RenderEnv<'a, '_>,
        blocks: &'a [Block],
        lead: bool,
    ) -> io::Result<()> {
        // Queue every child list of this level before rendering any of it,
        // so workers fetch ahead of the walker.
        for block in blocks {
            if self.rendered(env, block).is_some() {
                if let Some(key) = children_key(block) {
                    self.request_children(key);
                }
            }
        }

        let mut prev: Option<&'a Block> = None;
        for (index, block) in blocks.iter().enumerate() {
            let Some(render) = self.rendered(env, block).and_then(|r| r.prepare(env)) else {
                continue;
            };

            let children = match children_key(block) {
                Some(key) => match self.children_of(key) {
                    Ok(children) => Some(children),
                    Err(e) => {
                        log::warn!(
                            "Skipping children of {} block {}: {}",
                            block.block_type(),
                            block.id(),
                            e
                        );
                        None
                    }
                },
                None => None,
            };
            // A column is nothing but its children.
            if matches!(render, Render::Container) && children.is_none() {
                continue;
            }

            let separate = match prev {
                Some(prev) => needs_separator(prev, block),
                None => lead,
            };
            if separate {
                env.write("\n")?;
            }

            let mut node_env = env.clone();
            node_env.prev = prev;
            node_env.next = blocks.get(index + 1);
            node_env.index = index;

            render.open(&node_env)?;
            if let Some(children) = &children {
                let child_env = node_env.descend(block, render.indents_children());
                self.walk(&child_env, children, render.separates_children())?;
            }
            render.close(&node_env)?;

            prev = Some(block);
        }
        Ok(())
    }

    fn rendered<'b>(&self, env: &RenderEnv<'_, '_>, block: &'b Block) -> Option<Render<'b>> {
        renderer(block).filter(|render| !(render.is_media() && env.plain_text()))
    }

    /// Enqueues a fetch for `key` unless one already exists.
    fn request_children(&self, key: &BlockId) {
        let mut cache = self.children.borrow_mut();
        if cache.contains_key(key) {
            return;
        }

        let future = Arc::new(BlockFuture::new(key.clone()));
        let sent = match &self.query {
            Some(query) => query.send(Arc::clone(&future)).is_ok(),
            None => false,
        };
        if !sent {
            future.write(Err(FetchError::Disconnected));
        }
        cache.insert(key.clone(), future);
    }

    fn children_of(&self, key: &BlockId) -> Result<Arc<Vec<Block>>, FetchError> {
        self.request_children(key);
        let future = self.children.borrow().get(key).cloned();
        match future {
            Some(future) => future.read(),
            None => Err(FetchError::Disconnected),
        }
    }
}

/// Cache key of the children rendered under `block`.
///
/// A synced reference shows its source's children, so it always reads
/// them through the source id.
fn children_key(block: &Block) -> Option<&BlockId> {
    match block {
        Block::Synced(SyncedBlock {
            synced_from: Some(source),
            ..
        }) => Some(source),
        _ if block.has_children() => Some(block.id()),
        _ => None,
    }
}

/// Blank line between rendered siblings, except inside runs of list
/// items, table rows or synced blocks, and after a table (it already
/// ends with one).
fn needs_separator(prev: &Block, current: &Block) -> bool {
    let contiguous = (prev.is_list_item() && current.is_list_item())
        || (prev.is_table_row() && current.is_table_row())
        || (prev.is_synced() && current.is_synced());
    !contiguous && !matches!(prev, Block::Table(_))
}
