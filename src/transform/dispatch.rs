//! Block kind to renderer table.
//!
//! [`renderer`] is the single place that decides which block kinds
//! produce Markdown. Kinds without an entry are opaque to the walker:
//! nothing is written for them and their children are never fetched.

use super::environment::RenderEnv;
use super::future::AssetFuture;
use super::rich_text::{write_rich_text, write_run};
use crate::error::FetchError;
use crate::model::*;
use crate::types::{concat_plain_text, BlockId, RichTextItem};
use std::io;
use std::sync::Arc;

/// How one block is written, borrowing its payload.
#[derive(Debug, Clone)]
pub enum Render<'b> {
    Paragraph(&'b [RichTextItem]),
    /// Headings keep only their plain text.
    Heading {
        marker: &'static str,
        text: &'b [RichTextItem],
    },
    /// Bulleted, numbered and to-do items; their children are indented.
    ListItem {
        marker: &'static str,
        text: &'b [RichTextItem],
    },
    Toggle(&'b [RichTextItem]),
    /// Callouts and quotes.
    Quote(&'b [RichTextItem]),
    Code(&'b CodeBlock),
    Image(&'b MediaBlock),
    /// A hosted image whose download finished, linked by its local path.
    DownloadedImage {
        image: &'b MediaBlock,
        path: String,
    },
    Video(&'b MediaBlock),
    Bookmark(&'b UrlBlock),
    Equation(&'b str),
    Divider,
    /// Column lists and columns only pass their children through.
    Container,
    Table,
    TableRow(&'b TableRowBlock),
    SyncedSource(&'b BlockId),
    SyncedReference(&'b BlockId),
}

/// Looks up the renderer for a block, `None` for kinds that are skipped.
pub fn renderer(block: &Block) -> Option<Render<'_>> {
    let render = match block {
        Block::Paragraph(b) => Render::Paragraph(&b.rich_text),
        Block::Heading1(b) => Render::Heading {
            marker: "## ",
            text: &b.rich_text,
        },
        Block::Heading2(b) => Render::Heading {
            marker: "### ",
            text: &b.rich_text,
        },
        Block::Heading3(b) => Render::Heading {
            marker: "#### ",
            text: &b.rich_text,
        },
        Block::BulletedListItem(b) => Render::ListItem {
            marker: "- ",
            text: &b.rich_text,
        },
        // Every item is numbered `0.`; Markdown viewers renumber the list.
        Block::NumberedListItem(b) => Render::ListItem {
            marker: "0. ",
            text: &b.rich_text,
        },
        Block::ToDo(b) => Render::ListItem {
            marker: if b.checked { "- [x] " } else { "- [ ] " },
            text: &b.rich_text,
        },
        Block::Toggle(b) => Render::Toggle(&b.rich_text),
        Block::Quote(b) | Block::Callout(b) => Render::Quote(&b.rich_text),
        Block::Code(b) => Render::Code(b),
        Block::Image(b) => Render::Image(b),
        Block::Video(b) => Render::Video(b),
        Block::Bookmark(b) => Render::Bookmark(b),
        Block::Equation(b) => Render::Equation(&b.expression),
        Block::Divider(_) => Render::Divider,
        Block::ColumnList(_) | Block::Column(_) => Render::Container,
        Block::Table(_) => Render::Table,
        Block::TableRow(b) => Render::TableRow(b),
        Block::Synced(SyncedBlock {
            synced_from: Some(source),
            ..
        }) => Render::SyncedReference(source),
        Block::Synced(b) => Render::SyncedSource(&b.common.id),
        Block::LinkPreview(_)
        | Block::LinkToPage(_)
        | Block::Embed(_)
        | Block::File(_)
        | Block::Pdf(_)
        | Block::Audio(_)
        | Block::Template(_)
        | Block::TableOfContents(_)
        | Block::Breadcrumb(_)
        | Block::ChildPage(_)
        | Block::ChildDatabase(_)
        | Block::Unsupported(_) => return None,
    };
    Some(render)
}

impl<'b> Render<'b> {
    /// Children of list items and to-dos are nested one level deeper.
    pub fn indents_children(&self) -> bool {
        matches!(self, Render::ListItem { .. })
    }

    /// Whether a blank line goes between the block's own line and its
    /// first child. List items stay contiguous with their children, and
    /// blocks that write no line of their own add nothing.
    pub fn separates_children(&self) -> bool {
        !matches!(
            self,
            Render::ListItem { .. }
                | Render::Container
                | Render::Table
                | Render::TableRow(_)
                | Render::SyncedSource(_)
                | Render::SyncedReference(_)
        )
    }

    /// Media and links that plain-text output leaves out.
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            Render::Image(_)
                | Render::DownloadedImage { .. }
                | Render::Video(_)
                | Render::Bookmark(_)
        )
    }

    /// Settles everything the block waits on before anything is written.
    ///
    /// A hosted image is downloaded through the asset channel when there
    /// is one. `None` means the block renders as nothing, so the walker
    /// neither separates it nor treats it as the previous sibling.
    pub fn prepare(self, env: &RenderEnv<'_, '_>) -> Option<Render<'b>> {
        let image = match self {
            Render::Image(image) => image,
            other => return Some(other),
        };
        match (&image.source, env.ctx.assets) {
            (FileObject::Hosted { url, .. }, Some(assets)) => {
                let asset = Arc::new(AssetFuture::new(image.common.id.clone(), url));
                if assets.send(Arc::clone(&asset)).is_err() {
                    asset.write(Err(FetchError::Disconnected));
                }
                match asset.read() {
                    Ok(path) => Some(Render::DownloadedImage { image, path }),
                    Err(e) => {
                        log::warn!("Skipping image {}: {}", image.common.id, e);
                        None
                    }
                }
            }
            _ => Some(Render::Image(image)),
        }
    }

    /// Writes everything that comes before the block's children.
    pub fn open(&self, env: &RenderEnv<'_, '_>) -> io::Result<()> {
        match *self {
            Render::Paragraph(text) | Render::Toggle(text) => {
                env.write_indent()?;
                write_rich_text(env, text)?;
                env.write("\n")
            }
            Render::Heading { marker, text } => {
                env.write_indent()?;
                env.write(marker)?;
                env.write(&concat_plain_text(text))?;
                env.write("\n")
            }
            Render::ListItem { marker, text } => {
                env.write_indent()?;
                env.write(marker)?;
                write_rich_text(env, text)?;
                env.write("\n")
            }
            Render::Quote(text) => {
                env.write_indent()?;
                env.write("> ")?;
                write_rich_text(env, text)?;
                env.write("\n")
            }
            Render::Code(code) => write_code(env, code),
            Render::Image(image) => write_image(env, image, image.source.url()),
            Render::DownloadedImage { image, ref path } => write_image(env, image, path),
            Render::Video(video) => {
                env.write_indent()?;
                env.write("[")?;
                env.write(&concat_plain_text(&video.caption))?;
                env.write("](")?;
                env.write(video.source.url())?;
                env.write(")\n")
            }
            Render::Bookmark(bookmark) => {
                env.write_indent()?;
                if bookmark.caption.is_empty() {
                    env.write(&bookmark.url)?;
                } else {
                    env.write("[")?;
                    env.write(&concat_plain_text(&bookmark.caption))?;
                    env.write("](")?;
                    env.write(&bookmark.url)?;
                    env.write(")")?;
                }
                env.write("\n")
            }
            Render::Equation(expression) => {
                env.write_indent()?;
                env.write("$$\n")?;
                env.write(expression)?;
                env.write("\n$$\n")
            }
            Render::Divider => {
                env.write_indent()?;
                env.write("---\n")
            }
            Render::Container | Render::Table => Ok(()),
            Render::TableRow(row) => write_table_row(env, row),
            Render::SyncedSource(id) => write_sync_tag(env, "ID", id),
            Render::SyncedReference(source) => write_sync_tag(env, "sourceID", source),
        }
    }

    /// Writes everything that comes after the block's children.
    pub fn close(&self, env: &RenderEnv<'_, '_>) -> io::Result<()> {
        match self {
            Render::Table => env.write("\n"),
            Render::SyncedSource(_) | Render::SyncedReference(_) if !env.plain_text() => {
                env.write_indent()?;
                env.write("</sync>\n")
            }
            _ => Ok(()),
        }
    }
}

fn write_code(env: &RenderEnv<'_, '_>, code: &CodeBlock) -> io::Result<()> {
    env.write_indent()?;
    env.write("```")?;
    if let Some(language) = &code.language {
        env.write(" ")?;
        env.write(language)?;
    }
    env.write("\n")?;
    env.write(&concat_plain_text(&code.rich_text))?;
    env.write("\n```\n")
}

fn write_image(env: &RenderEnv<'_, '_>, image: &MediaBlock, target: &str) -> io::Result<()> {
    env.write_indent()?;
    env.write("![")?;
    env.write(&concat_plain_text(&image.caption))?;
    env.write("](")?;
    env.write(target)?;
    env.write(")\n")
}

/// One `| a | b |` line. The first row of a table is followed by the
/// header separator.
///
/// Rows are written flush left even under a list item; nested tables
/// have always been exported unindented.
fn write_table_row(env: &RenderEnv<'_, '_>, row: &TableRowBlock) -> io::Result<()> {
    for cell in &row.cells {
        env.write("| ")?;
        for run in cell {
            write_run(env, run, &run.plain_text.replace('\n', "<br>"))?;
        }
        env.write(" ")?;
    }
    env.write("|\n")?;

    if env.index == 0 {
        for _ in &row.cells {
            env.write("| --- ")?;
        }
        env.write("|\n")?;
    }
    Ok(())
}

fn write_sync_tag(env: &RenderEnv<'_, '_>, attribute: &str, id: &BlockId) -> io::Result<()> {
    if env.plain_text() {
        return Ok(());
    }
    env.write_indent()?;
    env.write(&format!("<sync {}=\"{}\">\n", attribute, id))
}
