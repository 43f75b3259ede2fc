use thiserror::Error;

/// Errors from generating a synthetic object
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("'{key}' is not a synthetic object")]
    NotSynthetic { key: String },

    #[error("Failed to render synthetic object: {0}")]
    Render(#[from] quick_xml::DeError),
}
