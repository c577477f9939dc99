// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to our domain model.

use crate::error::{AppError, NotionClientError};
use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{Block, Page, Parent, PropertyValue};
use crate::types::{
    Annotations, BlockId, DatabaseId, DateOrDateTime, DateValue, Link, Mention, PageId,
    PartialUser, RichTextItem, RichTextType, SelectOption,
};
use indexmap::IndexMap;

/// Convert notion-client Page to our domain Page
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<Page, AppError> {
    let id = PageId::parse(&notion_page.id)?;
    let parent = convert_parent(notion_page.parent)?;

    // The API returns properties unordered; exports sort keys themselves.
    let mut properties = IndexMap::new();
    for (name, property) in notion_page.properties {
        match convert_page_property(property) {
            Ok(value) => {
                properties.insert(name, value);
            }
            Err(e) => {
                log::warn!(
                    "Failed to convert page property '{}': {}. Skipping.",
                    name,
                    e
                );
            }
        }
    }

    Ok(Page {
        id,
        url: notion_page.url,
        properties,
        parent,
        archived: notion_page.archived,
    })
}

/// Convert notion-client Block to our domain Block
pub fn convert_block(
    notion_block: notion_client::objects::block::Block,
) -> Result<Block, AppError> {
    let common = convert_block_common(&notion_block)?;

    use notion_client::objects::block::BlockType;

    let text = |common: BlockCommon, rich_text| -> Result<TextBlock, AppError> {
        Ok(TextBlock {
            common,
            rich_text: convert_rich_text_array(rich_text)?,
        })
    };

    match notion_block.block_type {
        BlockType::Paragraph { paragraph } => {
            Ok(Block::Paragraph(text(common, paragraph.rich_text)?))
        }
        BlockType::Heading1 { heading_1 } => Ok(Block::Heading1(text(common, heading_1.rich_text)?)),
        BlockType::Heading2 { heading_2 } => Ok(Block::Heading2(text(common, heading_2.rich_text)?)),
        BlockType::Heading3 { heading_3 } => Ok(Block::Heading3(text(common, heading_3.rich_text)?)),
        BlockType::BulletedListItem { bulleted_list_item } => Ok(Block::BulletedListItem(text(
            common,
            bulleted_list_item.rich_text,
        )?)),
        BlockType::NumberedListItem { numbered_list_item } => Ok(Block::NumberedListItem(text(
            common,
            numbered_list_item.rich_text,
        )?)),
        BlockType::ToDo { to_do } => Ok(Block::ToDo(ToDoBlock {
            common,
            rich_text: convert_rich_text_array(to_do.rich_text)?,
            checked: to_do.checked.unwrap_or(false),
        })),
        BlockType::Toggle { toggle } => Ok(Block::Toggle(text(common, toggle.rich_text)?)),
        BlockType::Quote { quote } => Ok(Block::Quote(text(common, quote.rich_text)?)),
        BlockType::Callout { callout } => Ok(Block::Callout(text(common, callout.rich_text)?)),
        BlockType::Template { template } => Ok(Block::Template(text(common, template.rich_text)?)),

        BlockType::Code { code } => Ok(Block::Code(CodeBlock {
            common,
            rich_text: convert_rich_text_array(code.rich_text)?,
            language: code_language(&code.language),
            caption: convert_rich_text_array(code.caption)?,
        })),

        BlockType::Equation { equation } => Ok(Block::Equation(EquationBlock {
            common,
            expression: equation.expression,
        })),

        BlockType::Divider { .. } => Ok(Block::Divider(EmptyBlock { common })),
        BlockType::Breadcrumb { .. } => Ok(Block::Breadcrumb(EmptyBlock { common })),
        BlockType::TableOfContents { .. } => Ok(Block::TableOfContents(EmptyBlock { common })),
        BlockType::ColumnList { .. } => Ok(Block::ColumnList(EmptyBlock { common })),
        BlockType::Column { .. } => Ok(Block::Column(EmptyBlock { common })),

        BlockType::Image { image } => Ok(Block::Image(MediaBlock {
            common,
            source: convert_file_object(image.file_type),
            caption: Vec::new(), // ImageValue doesn't have caption in this version
        })),

        BlockType::Video { video } => Ok(Block::Video(MediaBlock {
            common,
            source: convert_file_object(video.file_type),
            caption: Vec::new(), // VideoValue doesn't have caption in this version
        })),

        BlockType::File { file } => Ok(Block::File(MediaBlock {
            common,
            source: convert_file_object(file.file_type),
            caption: convert_rich_text_array(file.caption)?,
        })),

        BlockType::Pdf { pdf } => Ok(Block::Pdf(MediaBlock {
            common,
            source: convert_file_object(pdf.file_type),
            caption: convert_rich_text_array(pdf.caption)?,
        })),

        BlockType::Bookmark { bookmark } => Ok(Block::Bookmark(UrlBlock {
            common,
            url: bookmark.url,
            caption: convert_rich_text_array(bookmark.caption)?,
        })),

        BlockType::Embed { embed } => Ok(Block::Embed(UrlBlock {
            common,
            url: embed.url,
            caption: Vec::new(),
        })),

        BlockType::LinkPreview { link_preview } => Ok(Block::LinkPreview(UrlBlock {
            common,
            url: link_preview.url,
            caption: Vec::new(),
        })),

        BlockType::ChildPage { child_page } => Ok(Block::ChildPage(TitledBlock {
            common,
            title: child_page.title,
        })),

        BlockType::ChildDatabase { child_database } => Ok(Block::ChildDatabase(TitledBlock {
            common,
            title: child_database.title,
        })),

        BlockType::LinkToPage { link_to_page } => {
            use notion_client::objects::parent::Parent as NcParent;

            let target = match link_to_page {
                NcParent::PageId { page_id } => LinkTarget::Page(PageId::parse(&page_id)?),
                NcParent::DatabaseId { database_id } => {
                    LinkTarget::Database(DatabaseId::parse(&database_id)?)
                }
                _ => {
                    return Err(NotionClientError::ConversionError {
                        message: "LinkToPage block must point at a page or database".to_string(),
                    }
                    .into())
                }
            };
            Ok(Block::LinkToPage(LinkToPageBlock { common, target }))
        }

        BlockType::Table { table } => Ok(Block::Table(TableBlock {
            common,
            table_width: table.table_width as usize,
            has_column_header: table.has_column_header,
            has_row_header: table.has_row_header,
        })),

        BlockType::TableRow { table_row } => Ok(Block::TableRow(TableRowBlock {
            common,
            cells: table_row
                .cells
                .into_iter()
                .map(convert_rich_text_array)
                .collect::<Result<Vec<_>, _>>()?,
        })),

        BlockType::SyncedBlock { synced_block } => {
            let synced_from = match synced_block.synced_from {
                Some(notion_client::objects::block::SyncedFrom::BlockId { block_id }) => {
                    Some(BlockId::parse(&block_id)?)
                }
                None => None,
            };
            Ok(Block::Synced(SyncedBlock {
                common,
                synced_from,
            }))
        }

        // For truly unsupported types, map to our Unsupported variant
        other => Ok(Block::Unsupported(UnsupportedBlock {
            common,
            block_type: format!("{:?}", other),
        })),
    }
}

/// Notion's language name, `None` for plain text.
fn code_language(language: &notion_client::objects::block::Language) -> Option<String> {
    let name = serde_json::to_value(language)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))?;
    (name != "plain text").then_some(name)
}

/// Convert notion-client Parent to our domain Parent
fn convert_parent(
    notion_parent: notion_client::objects::parent::Parent,
) -> Result<Parent, AppError> {
    use notion_client::objects::parent::Parent as NcParent;

    match notion_parent {
        NcParent::PageId { page_id } => Ok(Parent::Page {
            page_id: PageId::parse(&page_id)?,
        }),
        NcParent::DatabaseId { database_id } => Ok(Parent::Database {
            database_id: DatabaseId::parse(&database_id)?,
        }),
        NcParent::BlockId { block_id } => Ok(Parent::Block {
            block_id: BlockId::parse(&block_id)?,
        }),
        NcParent::Workspace { .. } => Ok(Parent::Workspace),
        _ => Err(NotionClientError::ConversionError {
            message: "Unsupported parent type".to_string(),
        }
        .into()),
    }
}

/// Convert block common fields
fn convert_block_common(
    notion_block: &notion_client::objects::block::Block,
) -> Result<BlockCommon, AppError> {
    let id = BlockId::parse(&notion_block.id.clone().ok_or_else(|| {
        NotionClientError::ConversionError {
            message: "Block missing required ID field".to_string(),
        }
    })?)?;

    Ok(BlockCommon {
        id,
        has_children: notion_block.has_children.unwrap_or(false),
        archived: notion_block.archived.unwrap_or(false),
    })
}

/// Convert array of rich text items
fn convert_rich_text_array(
    rich_texts: Vec<notion_client::objects::rich_text::RichText>,
) -> Result<Vec<RichTextItem>, AppError> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

/// Convert single rich text item
fn convert_rich_text(
    rich_text: notion_client::objects::rich_text::RichText,
) -> Result<RichTextItem, AppError> {
    use notion_client::objects::rich_text::RichText as NcRichText;

    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => Ok(RichTextItem {
            text_type: RichTextType::Text {
                content: text.content,
                link: text.link.map(|link| Link { url: link.url }),
            },
            annotations: convert_annotations(annotations.unwrap_or_default()),
            plain_text: plain_text.unwrap_or_default(),
            href,
        }),

        NcRichText::Mention {
            mention,
            annotations,
            plain_text,
            href,
        } => Ok(RichTextItem {
            text_type: RichTextType::Mention(convert_mention(mention)),
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => Ok(RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        _ => {
            // For unsupported rich text types, create a plain text fallback
            Ok(RichTextItem::plain_text(""))
        }
    }
}

/// Convert annotations
fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
    }
}

/// Mentions this crate has no use for collapse into `Mention::Other`;
/// their plain text still renders.
fn convert_mention(mention: notion_client::objects::rich_text::Mention) -> Mention {
    use notion_client::objects::rich_text::Mention as NcMention;

    match mention {
        NcMention::User { user } => Mention::User {
            id: user.id,
            name: user.name,
        },
        NcMention::Page { page } => Mention::Page { id: page.id },
        NcMention::Database { database } => Mention::Database { id: database.id },
        NcMention::Date { date } => Mention::Date(DateValue {
            start: DateOrDateTime::DateTime(date.start),
            end: date.end.map(DateOrDateTime::DateTime),
            time_zone: date.time_zone,
        }),
        NcMention::LinkPreview { link_preview } => Mention::LinkPreview {
            url: link_preview.url,
        },
        _ => {
            log::debug!("Unsupported mention type encountered, rendering its plain text");
            Mention::Other
        }
    }
}

/// Convert user
fn convert_user(user: notion_client::objects::user::User) -> PartialUser {
    PartialUser {
        id: user.id,
        name: user.name,
    }
}

/// Convert file object from notion-client to our domain type
fn convert_file_object(file: notion_client::objects::file::File) -> FileObject {
    use notion_client::objects::file::File as NcFile;

    match file {
        NcFile::External { external } => FileObject::External { url: external.url },
        NcFile::File { file } => FileObject::Hosted {
            url: file.url,
            expiry_time: Some(file.expiry_time),
        },
    }
}

fn convert_date_or_datetime(value: notion_client::objects::page::DateOrDateTime) -> DateOrDateTime {
    use notion_client::objects::page::DateOrDateTime as NcDate;

    match value {
        NcDate::Date(date) => DateOrDateTime::Date(date),
        NcDate::DateTime(instant) => DateOrDateTime::DateTime(instant),
    }
}

/// A date property without a start is treated as empty.
fn convert_notion_date(d: notion_client::objects::page::DatePropertyValue) -> Option<DateValue> {
    Some(DateValue {
        start: convert_date_or_datetime(d.start?),
        end: d.end.map(convert_date_or_datetime),
        time_zone: d.time_zone,
    })
}

/// Converts a Notion select option to our domain `SelectOption`.
fn convert_select_option(s: notion_client::objects::page::SelectPropertyValue) -> SelectOption {
    SelectOption {
        id: s.id.unwrap_or_default(),
        name: s.name.unwrap_or_default(),
    }
}

/// Convert individual page property.
///
/// Kinds the exporter never writes keep only their type name.
fn convert_page_property(
    property: notion_client::objects::page::PageProperty,
) -> Result<PropertyValue, AppError> {
    use notion_client::objects::page::PageProperty;

    let value = match property {
        PageProperty::Title { title, .. } => PropertyValue::Title(convert_rich_text_array(title)?),
        PageProperty::RichText { rich_text, .. } => {
            PropertyValue::RichText(convert_rich_text_array(rich_text)?)
        }
        PageProperty::Number { number, .. } => {
            PropertyValue::Number(number.and_then(|n| n.as_f64()))
        }
        PageProperty::Checkbox { checkbox, .. } => PropertyValue::Checkbox(Some(checkbox)),
        PageProperty::Url { url, .. } => PropertyValue::Url(url),
        PageProperty::Select { select, .. } => {
            PropertyValue::Select(select.map(convert_select_option))
        }
        PageProperty::MultiSelect { multi_select, .. } => PropertyValue::MultiSelect(Some(
            multi_select
                .into_iter()
                .map(convert_select_option)
                .collect(),
        )),
        PageProperty::Date { date, .. } => {
            PropertyValue::Date(date.and_then(convert_notion_date))
        }
        PageProperty::Relation { relation, .. } => {
            PropertyValue::Relation(relation.into_iter().map(|r| r.id).collect())
        }
        PageProperty::CreatedTime { created_time, .. } => {
            PropertyValue::CreatedTime(Some(created_time))
        }
        PageProperty::CreatedBy { created_by, .. } => {
            PropertyValue::CreatedBy(Some(convert_user(created_by)))
        }
        PageProperty::LastEditedTime {
            last_edited_time, ..
        } => PropertyValue::LastEditedTime(last_edited_time),
        PageProperty::LastEditedBy { last_edited_by, .. } => {
            PropertyValue::LastEditedBy(Some(convert_user(last_edited_by)))
        }
        PageProperty::People { .. } => other("people"),
        PageProperty::Files { .. } => other("files"),
        PageProperty::Email { .. } => other("email"),
        PageProperty::PhoneNumber { .. } => other("phone_number"),
        PageProperty::Formula { .. } => other("formula"),
        PageProperty::Rollup { .. } => other("rollup"),
        PageProperty::Status { .. } => other("status"),
        PageProperty::UniqueID { .. } => other("unique_id"),
        PageProperty::Verification { .. } => other("verification"),
        PageProperty::Button { .. } => other("button"),
    };

    Ok(value)
}

fn other(kind: &str) -> PropertyValue {
    PropertyValue::Other {
        kind: kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::responses::{NotionBlock, NotionPage};

    fn block(json: &str) -> Block {
        let notion_block: NotionBlock = serde_json::from_str(json).unwrap();
        convert_block(notion_block).unwrap()
    }

    #[test]
    fn test_convert_paragraph_with_mention() {
        let converted = block(
            r#"{
                "object": "block",
                "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
                "has_children": false,
                "archived": false,
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [
                        {
                            "type": "text",
                            "text": { "content": "See ", "link": null },
                            "annotations": { "bold": true, "italic": false, "strikethrough": false, "underline": false, "code": false, "color": "default" },
                            "plain_text": "See ",
                            "href": null
                        },
                        {
                            "type": "mention",
                            "mention": { "type": "page", "page": { "id": "3c612f56-fdd0-4a30-a4d6-bda7d7426309" } },
                            "annotations": { "bold": false, "italic": false, "strikethrough": false, "underline": false, "code": false, "color": "default" },
                            "plain_text": "Other page",
                            "href": "https://www.notion.so/3c612f56fdd04a30a4d6bda7d7426309"
                        }
                    ],
                    "color": "default"
                }
            }"#,
        );

        let Block::Paragraph(paragraph) = converted else {
            panic!("expected paragraph, got {:?}", converted);
        };
        assert_eq!(paragraph.rich_text.len(), 2);
        assert!(paragraph.rich_text[0].annotations.bold);
        assert_eq!(
            paragraph.rich_text[1].mentioned_page(),
            Some("3c612f56-fdd0-4a30-a4d6-bda7d7426309")
        );
    }

    #[test]
    fn test_convert_synced_reference() {
        let converted = block(
            r#"{
                "object": "block",
                "id": "c02fc1d3-db8b-45c5-a222-27595b15aea7",
                "has_children": true,
                "archived": false,
                "type": "synced_block",
                "synced_block": {
                    "synced_from": { "type": "block_id", "block_id": "3c612f56-fdd0-4a30-a4d6-bda7d7426309" }
                }
            }"#,
        );

        let Block::Synced(synced) = converted else {
            panic!("expected synced block, got {:?}", converted);
        };
        assert_eq!(
            synced.synced_from.map(|id| id.to_string()),
            Some("3c612f56fdd04a30a4d6bda7d7426309".to_string())
        );
        assert!(synced.common.has_children);
    }

    #[test]
    fn test_convert_database_row() {
        let notion_page: NotionPage = serde_json::from_str(
            r#"{
                "object": "page",
                "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
                "created_time": "2022-03-01T19:05:00.000Z",
                "last_edited_time": "2022-07-06T20:25:00.000Z",
                "created_by": { "object": "user", "id": "ee5f0f84-409a-440f-983a-a5315961c6e4" },
                "last_edited_by": { "object": "user", "id": "0c3e9826-b8f7-4f73-927d-2caaf86f1103" },
                "cover": null,
                "icon": null,
                "parent": { "type": "database_id", "database_id": "d9824bdc-8445-4327-be8b-5b47500af6ce" },
                "archived": false,
                "properties": {
                    "Name": {
                        "id": "title",
                        "type": "title",
                        "title": [
                            {
                                "type": "text",
                                "text": { "content": "Tuscan kale", "link": null },
                                "annotations": { "bold": false, "italic": false, "strikethrough": false, "underline": false, "code": false, "color": "default" },
                                "plain_text": "Tuscan kale",
                                "href": null
                            }
                        ]
                    },
                    "Price": { "id": "BJXS", "type": "number", "number": 2.5 },
                    "In stock": { "id": "%7D%3A%3B", "type": "checkbox", "checkbox": true }
                },
                "url": "https://www.notion.so/Tuscan-kale-598337872cf94fdf8782e53db20768a5"
            }"#,
        )
        .unwrap();

        let page = convert_page(notion_page).unwrap();
        assert!(page.is_database_row());
        assert_eq!(page.title(), "Tuscan kale");
        assert_eq!(
            page.properties.get("Price"),
            Some(&PropertyValue::Number(Some(2.5)))
        );
        assert_eq!(
            page.properties.get("In stock"),
            Some(&PropertyValue::Checkbox(Some(true)))
        );
    }
}
