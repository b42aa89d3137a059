use fcss::CompileError;
use thiserror::Error;

/// A write rejected by an external store.
///
/// The engine never retries; retry policy belongs to the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreWriteError {
    #[error("settings storage is not available")]
    Unavailable,

    #[error("store rejected write to {key}: {reason}")]
    Rejected { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum FontsError {
    #[error("Store write failed: {0}")]
    StoreWrite(#[from] StoreWriteError),

    #[error("Style compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Document {0} is not tracked")]
    UnknownDocument(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, FontsError>;
