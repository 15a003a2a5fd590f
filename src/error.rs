use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A caller broke a contract: out-of-range rating, negative or non-finite
    /// geometry, zero-sized image, missing required field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidInput(msg.into())
}
