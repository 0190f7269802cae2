/// Result alias that carries the custom [`VisualiserError`] type.
pub type Result<T> = std::result::Result<T, VisualiserError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum VisualiserError {
    /// Free-form failure that does not fit one of the more specific variants.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// No registered algorithm answers to the requested name.
    #[error("unknown sorting algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// Settings that cannot be corrected without asking the user again.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    /// Rendering surface failure.
    #[error("display error: {0}")]
    Display(String),
    /// Audio backend failure.
    #[error("audio error: {0}")]
    Audio(String),
}

impl VisualiserError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for VisualiserError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for VisualiserError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
