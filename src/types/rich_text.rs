use super::DateValue;
use serde::{Deserialize, Serialize};

/// The kind of rich text content: a typed vocabulary replacing stringly-typed dispatch.
///
/// Each variant carries its specific data, making invalid states
/// unrepresentable: you can't have a "mention" type with no mention data,
/// or an "equation" type with no expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention(Mention),
    Equation { expression: String },
}

/// One run of inline text with its styling.
///
/// `plain_text` is what gets written; the annotation flags and link
/// targets only decide the decoration around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item: the most common rich text variant.
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// A mention of another page, displayed as `text`.
    pub fn page_mention(page_id: &str, text: &str) -> Self {
        Self {
            text_type: RichTextType::Mention(Mention::Page {
                id: page_id.to_string(),
            }),
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: Some(format!("https://www.notion.so/{}", super::simple_id(page_id))),
        }
    }

    pub fn with_href(mut self, href: &str) -> Self {
        if let RichTextType::Text { link, .. } = &mut self.text_type {
            *link = Some(Link {
                url: href.to_string(),
            });
        }
        self.href = Some(href.to_string());
        self
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn bold(self) -> Self {
        let annotations = Annotations {
            bold: true,
            ..self.annotations.clone()
        };
        self.with_annotations(annotations)
    }

    pub fn italic(self) -> Self {
        let annotations = Annotations {
            italic: true,
            ..self.annotations.clone()
        };
        self.with_annotations(annotations)
    }

    pub fn strikethrough(self) -> Self {
        let annotations = Annotations {
            strikethrough: true,
            ..self.annotations.clone()
        };
        self.with_annotations(annotations)
    }

    pub fn code(self) -> Self {
        let annotations = Annotations {
            code: true,
            ..self.annotations.clone()
        };
        self.with_annotations(annotations)
    }

    /// The page this run mentions, if it is a page mention.
    pub fn mentioned_page(&self) -> Option<&str> {
        match &self.text_type {
            RichTextType::Mention(Mention::Page { id }) => Some(id),
            _ => None,
        }
    }
}

/// Concatenates the plain text of every run, dropping all styling.
pub fn concat_plain_text(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// Inline references embedded in rich text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mention {
    Page { id: String },
    Database { id: String },
    User { id: String, name: Option<String> },
    Date(DateValue),
    LinkPreview { url: String },
    /// A mention kind this crate does not model; rendered through its plain text.
    Other,
}
