use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum HarvestError {
    #[error("malformed reference timestamp '{value}' for series {station}/{data_type}: {reason}")]
    #[diagnostic(help("OceanTEA reference timestamps must be ISO-8601 instants, e.g. 2012-06-01T00:00:01Z"))]
    MalformedTimestamp {
        station: String,
        data_type: String,
        value: String,
        reason: String,
    },

    #[error("OceanTEA request failed: {0}")]
    OceanTeaHttp(String),

    #[error("OceanTEA returned status {status}: {message}")]
    OceanTeaStatus { status: u16, message: String },

    #[error("failed to decode OceanTEA response: {0}")]
    ResponseParse(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
