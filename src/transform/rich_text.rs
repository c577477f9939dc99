//! Inline runs: style delimiters and links around plain text.

use super::environment::RenderEnv;
use crate::types::RichTextItem;
use std::io;

/// Writes each run with its decoration.
pub fn write_rich_text(env: &RenderEnv<'_, '_>, runs: &[RichTextItem]) -> io::Result<()> {
    for run in runs {
        write_run(env, run, &run.plain_text)?;
    }
    Ok(())
}

/// Writes `text` wrapped in the decoration of `run`.
pub(crate) fn write_run(env: &RenderEnv<'_, '_>, run: &RichTextItem, text: &str) -> io::Result<()> {
    write_annotation(env, run, true)?;
    env.write(text)?;
    write_annotation(env, run, false)
}

/// Writes the opening (`prefix`) or closing decoration of a run.
///
/// Only the first set flag out of bold, italic, strikethrough and code
/// produces a delimiter; combined styles are not nested. A page mention
/// becomes a `[[alias|...]]` reference, any other run with an `href` a
/// Markdown link. Plain-text mode writes nothing.
pub fn write_annotation(env: &RenderEnv<'_, '_>, run: &RichTextItem, prefix: bool) -> io::Result<()> {
    if env.plain_text() {
        return Ok(());
    }

    let annotations = &run.annotations;
    let delimiter = if annotations.bold {
        "**"
    } else if annotations.italic {
        "_"
    } else if annotations.strikethrough {
        "~"
    } else if annotations.code {
        "`"
    } else {
        ""
    };
    if !delimiter.is_empty() {
        env.write(delimiter)?;
    }

    if let Some(page_id) = run.mentioned_page() {
        if prefix {
            env.write("[[")?;
            env.write(&env.ctx.aliases.alias_or_id(page_id))?;
            env.write("|")?;
        } else {
            env.write("]]")?;
        }
    } else if let Some(href) = run.href.as_deref().filter(|href| !href.is_empty()) {
        if prefix {
            env.write("[")?;
        } else {
            env.write("](")?;
            env.write(href)?;
            env.write(")")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{AliasIndex, MarkdownConfig, RenderContext};

    fn render(config: &MarkdownConfig, aliases: &AliasIndex, runs: &[RichTextItem]) -> String {
        let mut out = Vec::new();
        {
            let ctx = RenderContext::new(&mut out, config, aliases, None);
            write_rich_text(&RenderEnv::root(&ctx), runs).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_delimiter_priority() {
        let config = MarkdownConfig::default();
        let aliases = AliasIndex::new();
        let runs = vec![
            RichTextItem::plain_text("a").bold().italic().code(),
            RichTextItem::plain_text(" b").italic().strikethrough(),
            RichTextItem::plain_text(" c").strikethrough(),
            RichTextItem::plain_text(" d").code(),
        ];
        insta::assert_snapshot!(render(&config, &aliases, &runs), @"**a**_ b_~ c~` d`");
    }

    #[test]
    fn test_mention_resolves_through_alias_index() {
        let config = MarkdownConfig::default();
        let aliases: AliasIndex = [("abc123", "My Note")].into_iter().collect();
        let runs = vec![RichTextItem::page_mention("abc123", "see this")];
        assert_eq!(render(&config, &aliases, &runs), "[[My Note|see this]]");

        let empty = AliasIndex::new();
        assert_eq!(render(&config, &empty, &runs), "[[abc123|see this]]");
    }

    #[test]
    fn test_external_link() {
        let config = MarkdownConfig::default();
        let aliases = AliasIndex::new();
        let runs = vec![RichTextItem::plain_text("docs").with_href("https://example.com")];
        assert_eq!(
            render(&config, &aliases, &runs),
            "[docs](https://example.com)"
        );
    }

    #[test]
    fn test_delimiter_precedes_link_on_both_sides() {
        let config = MarkdownConfig::default();
        let aliases = AliasIndex::new();
        let runs = vec![RichTextItem::plain_text("docs")
            .with_href("https://example.com")
            .bold()];
        assert_eq!(
            render(&config, &aliases, &runs),
            "**[docs**](https://example.com)"
        );
    }

    #[test]
    fn test_plain_text_mode_drops_decoration() {
        let config = MarkdownConfig {
            plain_text_only: true,
            ..MarkdownConfig::default()
        };
        let aliases: AliasIndex = [("abc123", "My Note")].into_iter().collect();
        let runs = vec![
            RichTextItem::plain_text("bold ").bold(),
            RichTextItem::page_mention("abc123", "mention"),
        ];
        assert_eq!(render(&config, &aliases, &runs), "bold mention");
    }
}
