use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankerError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("unknown item kind: {0}")]
    UnknownKind(String),

    #[error("unknown sub-parameter for {kind}: {name}")]
    UnknownSubParameter { kind: String, name: String },

    #[error("invalid rating: {0}")]
    InvalidRating(String),

    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("store io error at {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store format error at {}: {detail}", path.display())]
    StoreFormat { path: PathBuf, detail: String },

    #[error("parameter extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RankerError>;
