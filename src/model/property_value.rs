use crate::types::{DateValue, PartialUser, RichTextItem, SelectOption};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A database page property value.
///
/// Values are optional wherever the API may send `null`, so a malformed
/// row renders as an empty value instead of failing the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Number(Option<f64>),
    Select(Option<SelectOption>),
    MultiSelect(Option<Vec<SelectOption>>),
    Date(Option<DateValue>),
    Checkbox(Option<bool>),
    Url(Option<String>),
    /// Related page IDs as returned by the API.
    Relation(Vec<String>),
    CreatedTime(Option<DateTime<Utc>>),
    CreatedBy(Option<PartialUser>),
    LastEditedTime(Option<DateTime<Utc>>),
    LastEditedBy(Option<PartialUser>),
    /// People, files, formulas, rollups and every other kind the exporter
    /// does not write.
    Other { kind: String },
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Number(_) => "number",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Date(_) => "date",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::CreatedTime(_) => "created_time",
            PropertyValue::CreatedBy(_) => "created_by",
            PropertyValue::LastEditedTime(_) => "last_edited_time",
            PropertyValue::LastEditedBy(_) => "last_edited_by",
            PropertyValue::Other { kind } => kind,
        }
    }
}
