use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("All fields required!")]
    MissingFields,
    #[error("no event at position {0}")]
    NoSuchPosition(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value under `{key}` is not a valid event list: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
