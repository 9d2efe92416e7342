use thiserror::Error;

/// Where a failure originated, independent of its message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected locally before any request was made
    Validation,
    /// The request never produced a response
    Transport,
    /// The server answered with a non-2xx status
    Server,
    /// The server answered 2xx but the body was not the expected JSON
    MalformedResponse,
    /// Well-formed response carrying an unusable identifier
    InvalidIdentifier,
    /// Local file access
    Io,
}

#[derive(Error, Debug)]
pub enum WasherError {
    #[error("File size exceeds {}MB limit", .limit / 1024 / 1024)]
    FileTooLarge { size: u64, limit: u64 },

    #[error("File information missing. Please upload the file again.")]
    MissingFileInfo,

    #[error("The current file cannot be washed. Please upload a file first.")]
    WashUnavailable,

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Cancelled(String),

    #[error("{0}")]
    Server(String),

    #[error("Failed to parse response")]
    MalformedResponse,

    #[error("Invalid file ID received from server")]
    InvalidFileId,

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl WasherError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WasherError::FileTooLarge { .. }
            | WasherError::MissingFileInfo
            | WasherError::WashUnavailable => ErrorCategory::Validation,
            WasherError::Network(_) | WasherError::Cancelled(_) => ErrorCategory::Transport,
            WasherError::Server(_) => ErrorCategory::Server,
            WasherError::MalformedResponse => ErrorCategory::MalformedResponse,
            WasherError::InvalidFileId => ErrorCategory::InvalidIdentifier,
            WasherError::Io(_) => ErrorCategory::Io,
        }
    }

    /// Text shown in the blocking alert.
    /// The size check reads as a plain notice; everything else is prefixed.
    pub fn alert_message(&self) -> String {
        match self {
            WasherError::FileTooLarge { .. } => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}
