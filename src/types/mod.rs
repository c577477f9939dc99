//! Domain vocabulary shared by the API adapter, the transformer and the exporter.

use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;
mod values;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;
pub use values::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid export speed: {0}")]
    InvalidExportSpeed(f64),
}
