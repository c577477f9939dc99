use super::blocks::*;
use super::common::BlockCommon;
use crate::types::{BlockId, PageId};
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Paragraph($pattern) => $result,
            Block::Heading1($pattern) => $result,
            Block::Heading2($pattern) => $result,
            Block::Heading3($pattern) => $result,
            Block::BulletedListItem($pattern) => $result,
            Block::NumberedListItem($pattern) => $result,
            Block::ToDo($pattern) => $result,
            Block::Toggle($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Equation($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::Breadcrumb($pattern) => $result,
            Block::TableOfContents($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Video($pattern) => $result,
            Block::File($pattern) => $result,
            Block::Pdf($pattern) => $result,
            Block::Audio($pattern) => $result,
            Block::Bookmark($pattern) => $result,
            Block::Embed($pattern) => $result,
            Block::ChildPage($pattern) => $result,
            Block::ChildDatabase($pattern) => $result,
            Block::LinkToPage($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableRow($pattern) => $result,
            Block::ColumnList($pattern) => $result,
            Block::Column($pattern) => $result,
            Block::Synced($pattern) => $result,
            Block::Template($pattern) => $result,
            Block::LinkPreview($pattern) => $result,
            Block::Unsupported($pattern) => $result,
        }
    };
}

/// Block represents all possible Notion block types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Toggle(TextBlock),
    Quote(TextBlock),
    Callout(TextBlock),
    Code(CodeBlock),
    Equation(EquationBlock),
    Divider(EmptyBlock),
    Breadcrumb(EmptyBlock),
    TableOfContents(EmptyBlock),
    Image(MediaBlock),
    Video(MediaBlock),
    File(MediaBlock),
    Pdf(MediaBlock),
    Audio(MediaBlock),
    Bookmark(UrlBlock),
    Embed(UrlBlock),
    ChildPage(TitledBlock),
    ChildDatabase(TitledBlock),
    LinkToPage(LinkToPageBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    ColumnList(EmptyBlock),
    Column(EmptyBlock),
    Synced(SyncedBlock),
    Template(TextBlock),
    LinkPreview(UrlBlock),
    Unsupported(UnsupportedBlock),
}

impl Block {
    /// Get the block's ID
    pub fn id(&self) -> &BlockId {
        &self.common().id
    }

    /// Check if block has children
    pub fn has_children(&self) -> bool {
        self.common().has_children
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    /// Bulleted and numbered list items stay visually contiguous.
    pub fn is_list_item(&self) -> bool {
        matches!(self, Block::BulletedListItem(_) | Block::NumberedListItem(_))
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, Block::Synced(_))
    }

    pub fn is_table_row(&self) -> bool {
        matches!(self, Block::TableRow(_))
    }

    /// The page this block opens as a separate document, if any.
    ///
    /// Child pages are their own page; links point at another page.
    pub fn sub_page(&self) -> Option<PageId> {
        match self {
            Block::ChildPage(b) => Some(b.common.id.cast()),
            Block::LinkToPage(LinkToPageBlock {
                target: LinkTarget::Page(page_id),
                ..
            }) => Some(page_id.clone()),
            _ => None,
        }
    }

    /// Get block type name
    pub fn block_type(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::Heading3(_) => "heading_3",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::NumberedListItem(_) => "numbered_list_item",
            Block::ToDo(_) => "to_do",
            Block::Toggle(_) => "toggle",
            Block::Quote(_) => "quote",
            Block::Callout(_) => "callout",
            Block::Code(_) => "code",
            Block::Equation(_) => "equation",
            Block::Divider(_) => "divider",
            Block::Breadcrumb(_) => "breadcrumb",
            Block::TableOfContents(_) => "table_of_contents",
            Block::Image(_) => "image",
            Block::Video(_) => "video",
            Block::File(_) => "file",
            Block::Pdf(_) => "pdf",
            Block::Audio(_) => "audio",
            Block::Bookmark(_) => "bookmark",
            Block::Embed(_) => "embed",
            Block::ChildPage(_) => "child_page",
            Block::ChildDatabase(_) => "child_database",
            Block::LinkToPage(_) => "link_to_page",
            Block::Table(_) => "table",
            Block::TableRow(_) => "table_row",
            Block::ColumnList(_) => "column_list",
            Block::Column(_) => "column",
            Block::Synced(_) => "synced_block",
            Block::Template(_) => "template",
            Block::LinkPreview(_) => "link_preview",
            Block::Unsupported(_) => "unsupported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RichTextItem;

    fn id(n: u32) -> BlockId {
        BlockId::parse(&format!("{:032x}", n)).unwrap()
    }

    #[test]
    fn test_common_accessors() {
        let block = Block::Paragraph(TextBlock::new(id(1), vec![RichTextItem::plain_text("x")]));
        assert_eq!(block.id(), &id(1));
        assert!(!block.has_children());
        assert_eq!(block.block_type(), "paragraph");

        let parent = Block::Toggle(TextBlock::new(id(2), vec![]).with_children());
        assert!(parent.has_children());
    }

    #[test]
    fn test_kind_predicates() {
        let bullet = Block::BulletedListItem(TextBlock::new(id(1), vec![]));
        let numbered = Block::NumberedListItem(TextBlock::new(id(2), vec![]));
        let todo = Block::ToDo(ToDoBlock::default());
        assert!(bullet.is_list_item());
        assert!(numbered.is_list_item());
        assert!(!todo.is_list_item());
    }

    #[test]
    fn test_sub_page() {
        let child = Block::ChildPage(TitledBlock {
            common: BlockCommon::new(id(7)),
            title: "Child".into(),
        });
        assert_eq!(child.sub_page().unwrap().as_str(), id(7).as_str());

        let target: PageId = id(9).cast();
        let link = Block::LinkToPage(LinkToPageBlock {
            common: BlockCommon::new(id(8)),
            target: LinkTarget::Page(target.clone()),
        });
        assert_eq!(link.sub_page(), Some(target));

        let db_link = Block::LinkToPage(LinkToPageBlock {
            common: BlockCommon::new(id(10)),
            target: LinkTarget::Database(id(11).cast()),
        });
        assert_eq!(db_link.sub_page(), None);
    }
}
