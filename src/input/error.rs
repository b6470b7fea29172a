use thiserror::Error;

/// Why a route could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("route source {name} is unreachable: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed route JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed route CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("row {row}: invalid {field} value {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: invalid timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    #[error("unknown route format")]
    UnknownFormat,
}
