use super::alias_index::AliasIndex;
use super::future::AssetSender;
use super::MarkdownConfig;
use crate::constants::INDENT_UNIT;
use crate::model::Block;
use std::cell::RefCell;
use std::io;

/// State shared by every environment of one transform call.
///
/// Environments copy themselves per recursion level but all write into
/// this one sink. The walker is single-threaded, so a `RefCell` is all
/// the coordination the sink needs.
pub struct RenderContext<'w> {
    sink: RefCell<&'w mut dyn io::Write>,
    pub config: &'w MarkdownConfig,
    pub aliases: &'w AliasIndex,
    pub assets: Option<&'w AssetSender>,
}

impl<'w> RenderContext<'w> {
    pub fn new(
        sink: &'w mut dyn io::Write,
        config: &'w MarkdownConfig,
        aliases: &'w AliasIndex,
        assets: Option<&'w AssetSender>,
    ) -> Self {
        Self {
            sink: RefCell::new(sink),
            config,
            aliases,
            assets,
        }
    }

    pub fn write(&self, text: &str) -> io::Result<()> {
        self.sink.borrow_mut().write_all(text.as_bytes())
    }
}

/// Position of the walker in the tree.
///
/// Cheap to copy: the indent is the only owned field.
#[derive(Clone)]
pub struct RenderEnv<'a, 'w> {
    pub ctx: &'a RenderContext<'w>,
    pub indent: String,
    pub prev: Option<&'a Block>,
    pub parent: Option<&'a Block>,
    pub next: Option<&'a Block>,
    /// Position of the current block among its siblings.
    pub index: usize,
}

impl<'a, 'w> RenderEnv<'a, 'w> {
    pub fn root(ctx: &'a RenderContext<'w>) -> Self {
        Self {
            ctx,
            indent: String::new(),
            prev: None,
            parent: None,
            next: None,
            index: 0,
        }
    }

    /// Environment for the children of `block`.
    ///
    /// Sibling pointers start over; the indent grows by one level when
    /// `indented` is set.
    pub fn descend<'c>(&self, block: &'c Block, indented: bool) -> RenderEnv<'c, 'w>
    where
        'a: 'c,
    {
        let mut indent = self.indent.clone();
        if indented {
            indent.push_str(INDENT_UNIT);
        }
        RenderEnv {
            ctx: self.ctx,
            indent,
            prev: None,
            parent: Some(block),
            next: None,
            index: 0,
        }
    }

    pub fn write(&self, text: &str) -> io::Result<()> {
        self.ctx.write(text)
    }

    pub fn write_indent(&self) -> io::Result<()> {
        if self.indent.is_empty() {
            return Ok(());
        }
        self.ctx.write(&self.indent)
    }

    pub fn config(&self) -> &MarkdownConfig {
        self.ctx.config
    }

    pub fn plain_text(&self) -> bool {
        self.ctx.config.plain_text_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextBlock;
    use crate::types::BlockId;

    #[test]
    fn test_copies_share_the_sink() {
        let config = MarkdownConfig::default();
        let aliases = AliasIndex::new();
        let mut out = Vec::new();
        {
            let ctx = RenderContext::new(&mut out, &config, &aliases, None);
            let root = RenderEnv::root(&ctx);
            let list = Block::BulletedListItem(TextBlock::new(BlockId::new_v4(), vec![]));
            let child = root.descend(&list, true);
            let grandchild = child.descend(&list, false);

            root.write("a").unwrap();
            child.write_indent().unwrap();
            child.write("b").unwrap();
            grandchild.write_indent().unwrap();
            grandchild.write("c").unwrap();

            assert_eq!(root.indent, "");
            assert_eq!(grandchild.indent, "  ");
            assert!(grandchild.parent.is_some_and(|p| p.is_list_item()));
        }
        assert_eq!(String::from_utf8(out).unwrap(), "a  b  c");
    }
}
