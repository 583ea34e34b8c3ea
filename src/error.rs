use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CV could not be loaded; nothing has been drawn.
    #[error("CV data not available: {0}")]
    DataUnavailable(String),

    #[error("invalid CV data: {0}")]
    InvalidCv(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unusable image: {0}")]
    Image(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
