use crossbeam::channel;
use notion_toolset::model::{
    SyncedBlock, TableBlock, TableRowBlock, TextBlock, UrlBlock,
};
use notion_toolset::{
    Block, BlockCommon, BlockFuture, BlockId, DatabaseId, Markdown, MarkdownConfig, Page, PageId, Parent,
    PropertyValue, RichTextItem, SelectOption,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn id(n: u32) -> BlockId {
    BlockId::parse(&format!("{:032x}", n)).unwrap()
}

fn text(s: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(s)]
}

fn page() -> Page {
    Page::new(
        PageId::parse("550e8400e29b41d4a716446655440000").unwrap(),
        Parent::Workspace,
    )
}

fn body_only() -> MarkdownConfig {
    MarkdownConfig {
        suppress_alias_line: true,
        suppress_front_matter: true,
        ..MarkdownConfig::default()
    }
}

fn paragraph(n: u32, s: &str) -> Block {
    Block::Paragraph(TextBlock::new(id(n), text(s)))
}

#[test]
fn numbered_items_all_render_as_zero() {
    let blocks = vec![
        Block::NumberedListItem(TextBlock::new(id(1), text("first"))),
        Block::NumberedListItem(TextBlock::new(id(2), text("second"))),
        Block::NumberedListItem(TextBlock::new(id(3), text("third"))),
    ];

    let output = Markdown::new(body_only(), page(), blocks).transform();
    assert_eq!(output, "0. first\n0. second\n0. third\n");
}

#[test]
fn table_rows_get_header_separator_and_trailing_blank_line() {
    let table = Block::Table(TableBlock {
        common: BlockCommon::new(id(1)).with_children(),
        table_width: 3,
        has_column_header: true,
        has_row_header: false,
    });
    let rows = vec![
        Block::TableRow(TableRowBlock {
            common: BlockCommon::new(id(2)),
            cells: vec![text("a"), text("b"), text("c")],
        }),
        Block::TableRow(TableRowBlock {
            common: BlockCommon::new(id(3)),
            cells: vec![text("1"), text("2"), text("3")],
        }),
    ];

    let output = Markdown::new(body_only(), page(), vec![table, paragraph(4, "after")])
        .with_resolved_children(id(1), rows)
        .transform();

    assert_eq!(
        output,
        "| a | b | c |\n| --- | --- | --- |\n| 1 | 2 | 3 |\n\nafter\n"
    );
}

#[test]
fn table_under_list_item_stays_flush_left() {
    let item = Block::BulletedListItem(TextBlock::new(id(1), text("item")).with_children());
    let table = Block::Table(TableBlock {
        common: BlockCommon::new(id(2)).with_children(),
        table_width: 1,
        has_column_header: false,
        has_row_header: false,
    });
    let row = Block::TableRow(TableRowBlock {
        common: BlockCommon::new(id(3)),
        cells: vec![text("cell")],
    });

    let output = Markdown::new(body_only(), page(), vec![item])
        .with_resolved_children(id(1), vec![table])
        .with_resolved_children(id(2), vec![row])
        .transform();
    assert_eq!(output, "- item\n| cell |\n| --- |\n\n");
}

#[test]
fn only_list_ancestors_indent() {
    let list_root = Block::BulletedListItem(TextBlock::new(id(1), text("item")).with_children());
    let plain_root = Block::Toggle(TextBlock::new(id(10), text("toggle")).with_children());

    let nested = |toggle: u32, callout: u32, leaf: u32| {
        vec![
            (
                id(toggle),
                vec![Block::Callout(
                    TextBlock::new(id(callout), text("callout")).with_children(),
                )],
            ),
            (id(callout), vec![paragraph(leaf, "leaf")]),
        ]
    };

    let mut under_list = Markdown::new(body_only(), page(), vec![list_root]).with_resolved_children(
        id(1),
        vec![Block::Toggle(TextBlock::new(id(2), text("toggle")).with_children())],
    );
    for (parent, children) in nested(2, 3, 4) {
        under_list = under_list.with_resolved_children(parent, children);
    }
    assert_eq!(
        under_list.transform(),
        "- item\n  toggle\n\n  > callout\n\n  leaf\n"
    );

    let mut top_level = Markdown::new(body_only(), page(), vec![plain_root]);
    for (parent, children) in nested(10, 11, 12) {
        top_level = top_level.with_resolved_children(parent, children);
    }
    assert_eq!(top_level.transform(), "toggle\n\n> callout\n\nleaf\n");
}

#[test]
fn transform_is_idempotent() {
    let blocks = vec![
        Block::Heading1(TextBlock::new(id(1), text("Plan"))),
        Block::ToDo(notion_toolset::model::ToDoBlock {
            common: BlockCommon::new(id(2)).with_children(),
            rich_text: vec![RichTextItem::plain_text("pack").bold()],
            checked: false,
        }),
        Block::Bookmark(UrlBlock {
            common: BlockCommon::new(id(3)),
            url: "https://example.com".to_string(),
            caption: text("Example"),
        }),
    ];
    let markdown = Markdown::new(body_only(), page(), blocks)
        .with_resolved_children(id(2), vec![paragraph(4, "passport")]);

    let first = markdown.transform();
    let second = markdown.transform();

    assert_eq!(first, second);
    assert_eq!(
        first,
        "## Plan\n\n- [ ] **pack**\n  passport\n\n[Example](https://example.com)\n"
    );
}

#[test]
fn page_mentions_resolve_through_alias_index() {
    let vault = TempDir::new().unwrap();
    fs::write(
        vault.path().join("My Note.md"),
        "---\naliases: abc123\n---\n\nbody\n",
    )
    .unwrap();

    let blocks = vec![Block::Paragraph(TextBlock::new(
        id(1),
        vec![
            RichTextItem::plain_text("see "),
            RichTextItem::page_mention("abc123", "the note"),
        ],
    ))];

    let with_index = MarkdownConfig {
        alias_index_directory: Some(vault.path().to_path_buf()),
        ..body_only()
    };
    let resolved = Markdown::new(with_index, page(), blocks.clone()).transform();
    assert_eq!(resolved, "see [[My Note|the note]]\n");

    let unresolved = Markdown::new(body_only(), page(), blocks).transform();
    assert_eq!(unresolved, "see [[abc123|the note]]\n");
}

#[test]
fn synced_references_to_one_source_fetch_once() {
    let source = id(100);
    let reference = |n: u32| {
        Block::Synced(SyncedBlock {
            common: BlockCommon::new(id(n)).with_children(),
            synced_from: Some(source.clone()),
        })
    };

    let (query_tx, query_rx) = channel::unbounded::<Arc<BlockFuture>>();
    let worker = thread::spawn(move || {
        let mut requests = Vec::new();
        for future in query_rx {
            requests.push(future.block_id.clone());
            future.write(Ok(vec![paragraph(101, "shared")]));
        }
        requests
    });

    let output = {
        let markdown = Markdown::new(body_only(), page(), vec![reference(1), reference(2)])
            .with_query_channel(query_tx);
        markdown.transform()
    };
    let requests = worker.join().unwrap();

    assert_eq!(requests, vec![source.clone()]);
    let tag = format!("<sync sourceID=\"{}\">\n", source);
    assert_eq!(
        output,
        format!("{tag}shared\n</sync>\n{tag}shared\n</sync>\n")
    );
}

#[test]
fn unfetchable_children_are_skipped() {
    let blocks = vec![
        Block::Toggle(TextBlock::new(id(1), text("details")).with_children()),
        paragraph(2, "after"),
    ];

    // No query channel: the toggle renders, its children do not.
    let output = Markdown::new(body_only(), page(), blocks).transform();
    assert_eq!(output, "details\n\nafter\n");
}

#[test]
fn database_row_document() {
    let row = Page::new(
        PageId::parse("550e8400e29b41d4a716446655440000").unwrap(),
        Parent::Database {
            database_id: DatabaseId::parse("11111111222233334444555555555555").unwrap(),
        },
    )
    .with_property("Name", PropertyValue::Title(text("Trip")))
    .with_property(
        "Status",
        PropertyValue::Select(Some(SelectOption::named("Draft"))),
    )
    .with_property("Notes", PropertyValue::RichText(text("pack light")));

    let config = MarkdownConfig {
        title_as_heading: true,
        ..MarkdownConfig::default()
    };
    let blocks = vec![
        paragraph(1, "intro"),
        Block::BulletedListItem(TextBlock::new(id(2), text("a"))),
    ];

    let output = Markdown::new(config, row, blocks).transform();
    assert_eq!(
        output,
        "---\n\
         aliases: 550e8400e29b41d4a716446655440000\n\
         Status: Draft\n\
         ---\n\
         \n\
         # Trip\n\
         \n\
         - Notes: pack light\n\
         \n\
         intro\n\
         \n\
         - a\n"
    );
}
