use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Style compile error: {0}")]
    Compile(#[from] fcss::CompileError),

    #[error(transparent)]
    Fonts(#[from] fontsync::FontsError),
}

pub type Result<T> = std::result::Result<T, Error>;
