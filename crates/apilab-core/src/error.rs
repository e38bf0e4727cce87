use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to access storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Button not found: {0}")]
    ButtonNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid button: {0}")]
    Validation(#[from] crate::validate::ValidationErrors),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, Error>;
