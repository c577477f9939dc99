//! Page header: front matter, title heading and metadata bullets.

use super::environment::RenderEnv;
use super::rich_text::write_rich_text;
use super::MarkdownConfig;
use crate::constants::{ALIAS_MARKER, INDENT_UNIT};
use crate::model::{Page, PropertyValue};
use crate::types::{concat_plain_text, simple_id, SelectOption};
use chrono::SecondsFormat;
use std::io;

/// Structured properties go to the front matter, free text and
/// relations to the metadata bullets. Select options move to the
/// metadata when they are rendered as tags.
fn is_front_matter_type(value: &PropertyValue, config: &MarkdownConfig) -> bool {
    match value {
        PropertyValue::RichText(_) | PropertyValue::Relation(_) => false,
        PropertyValue::Select(_) | PropertyValue::MultiSelect(_) => !config.select_as_hash_tag,
        _ => true,
    }
}

fn has_writer(value: &PropertyValue) -> bool {
    !matches!(value, PropertyValue::Other { .. })
}

/// Configured keys in their given order, else every matching key sorted.
fn selected_keys(
    page: &Page,
    configured: &[String],
    include: impl Fn(&PropertyValue) -> bool,
) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    let mut keys: Vec<String> = page
        .properties
        .iter()
        .filter(|(_, value)| include(value))
        .map(|(key, _)| key.clone())
        .collect();
    keys.sort();
    keys
}

pub fn write_front_matter(env: &RenderEnv<'_, '_>, page: &Page) -> io::Result<()> {
    let config = env.config();
    if config.suppress_front_matter && config.suppress_alias_line {
        return Ok(());
    }

    env.write("---\n")?;

    if !config.suppress_alias_line {
        env.write(ALIAS_MARKER)?;
        env.write(page.id.as_str())?;
        env.write("\n")?;
    }

    if !config.suppress_front_matter && page.is_database_row() {
        let keys = selected_keys(page, &config.front_matter_keys, |value| {
            is_front_matter_type(value, config)
        });
        for key in &keys {
            let Some(value) = page.properties.get(key) else {
                log::debug!("page {} has no property {:?}", page.id, key);
                continue;
            };
            if !has_writer(value) {
                continue;
            }
            if config.title_as_heading && matches!(value, PropertyValue::Title(_)) {
                continue;
            }
            env.write(key)?;
            env.write(": ")?;
            write_property(env, value)?;
        }
    }

    env.write("---\n\n")
}

pub fn write_title(env: &RenderEnv<'_, '_>, page: &Page) -> io::Result<()> {
    env.write("# ")?;
    env.write(&page.title())?;
    env.write("\n\n")
}

pub fn write_metadata(env: &RenderEnv<'_, '_>, page: &Page) -> io::Result<()> {
    let config = env.config();
    if config.suppress_metadata || !page.is_database_row() {
        return Ok(());
    }

    let keys = selected_keys(page, &config.metadata_keys, |value| {
        !is_front_matter_type(value, config)
    });
    for key in &keys {
        let Some(value) = page.properties.get(key).filter(|v| has_writer(v)) else {
            continue;
        };
        env.write("- ")?;
        env.write(key)?;
        env.write(": ")?;
        write_property(env, value)?;
    }

    if !keys.is_empty() {
        env.write("\n")?;
    }
    Ok(())
}

/// Writes one property value followed by a newline.
///
/// Lists (multi-select, date range, relations) start on the next line as
/// indented bullets. Missing values leave the value empty.
pub fn write_property(env: &RenderEnv<'_, '_>, value: &PropertyValue) -> io::Result<()> {
    let tag = if env.config().select_as_hash_tag { "#" } else { "" };
    match value {
        PropertyValue::Title(title) => env.write(&concat_plain_text(title))?,
        PropertyValue::RichText(runs) => write_rich_text(env, runs)?,
        PropertyValue::Number(number) => {
            if let Some(number) = number {
                env.write(&format!("{:.2}", number))?;
            }
        }
        PropertyValue::Select(option) => {
            if let Some(SelectOption { name, .. }) = option {
                env.write(tag)?;
                env.write(name)?;
            }
        }
        PropertyValue::MultiSelect(options) => {
            for option in options.iter().flatten() {
                env.write("\n")?;
                env.write(INDENT_UNIT)?;
                env.write("- ")?;
                env.write(tag)?;
                env.write(&option.name)?;
            }
        }
        PropertyValue::Date(date) => {
            if let Some(date) = date {
                env.write("\n")?;
                env.write(INDENT_UNIT)?;
                env.write("- ")?;
                env.write(&date.start.to_string())?;
                if let Some(end) = &date.end {
                    env.write("\n")?;
                    env.write(INDENT_UNIT)?;
                    env.write("- ")?;
                    env.write(&end.to_string())?;
                }
            }
        }
        PropertyValue::Checkbox(checked) => {
            if let Some(checked) = checked {
                env.write(if *checked { "true" } else { "false" })?;
            }
        }
        PropertyValue::Url(url) => {
            if let Some(url) = url {
                env.write(url)?;
            }
        }
        PropertyValue::Relation(ids) => {
            for id in ids {
                env.write("\n")?;
                env.write(INDENT_UNIT)?;
                env.write("- [[")?;
                env.write(&simple_id(id))?;
                env.write("]]")?;
            }
        }
        PropertyValue::CreatedTime(time) | PropertyValue::LastEditedTime(time) => {
            if let Some(time) = time {
                env.write(&time.to_rfc3339_opts(SecondsFormat::Secs, true))?;
            }
        }
        PropertyValue::CreatedBy(user) | PropertyValue::LastEditedBy(user) => {
            if let Some(user) = user {
                env.write(user.display_name())?;
            }
        }
        PropertyValue::Other { .. } => {}
    }
    env.write("\n")
}
