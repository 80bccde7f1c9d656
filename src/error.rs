use thiserror::Error;

/// What kind of entity an invalid reference pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Notebook,
    Sheet,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Notebook => write!(f, "notebook"),
            Self::Sheet => write!(f, "sheet"),
        }
    }
}

/// Errors raised by key-value storage back ends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage rejected the write: {0}")]
    Rejected(String),
}

/// Errors that can occur anywhere in the whiteboard core.
///
/// None of these are fatal to a session: the drawing surface stays usable
/// even when every persistence call fails.
#[derive(Debug, Error)]
pub enum WhiteboardError {
    #[error("no {kind} with id {id:?}")]
    InvalidReference { kind: EntityKind, id: String },

    #[error("failed to decode sheet snapshot: {0}")]
    DecodeFailure(String),

    #[error("failed to encode surface: {0}")]
    EncodeFailure(String),

    #[error("failed to write document: {0}")]
    PersistenceWriteFailure(String),

    #[error("failed to read document: {0}")]
    PersistenceReadFailure(String),

    #[error("invalid colour {0:?}")]
    InvalidColor(String),
}

impl WhiteboardError {
    pub fn notebook(id: &str) -> Self {
        Self::InvalidReference {
            kind: EntityKind::Notebook,
            id: id.to_owned(),
        }
    }

    pub fn sheet(id: &str) -> Self {
        Self::InvalidReference {
            kind: EntityKind::Sheet,
            id: id.to_owned(),
        }
    }
}

impl From<image::ImageError> for WhiteboardError {
    fn from(error: image::ImageError) -> Self {
        Self::DecodeFailure(error.to_string())
    }
}

impl From<base64::DecodeError> for WhiteboardError {
    fn from(error: base64::DecodeError) -> Self {
        Self::DecodeFailure(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WhiteboardError>;
