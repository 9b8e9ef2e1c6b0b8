use thiserror::Error;

/// Custom error types for braw2ilpd
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output resolution failed: {0}")]
    OutputResolution(String),

    #[error("Atomic write failed: {0}")]
    AtomicWrite(String),

    #[error("Attribute query failed: {0}")]
    AttributeQuery(String),

    #[error("Attribute dump tool failed: {0}")]
    DumpTool(String),

    #[error("Malformed attribute dump: {0}")]
    DumpFormat(String),
}

/// Result type for braw2ilpd operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
