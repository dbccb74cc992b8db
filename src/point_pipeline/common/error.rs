use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read depth frame: {0}")]
    Read(String),

    #[error("Failed to decode depth frame: {0}")]
    Decode(String),

    #[error("Depth frame has no pixels: width={width}, height={height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("No depth frame has been ingested for this sensor")]
    NoFrame,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestionError>;
