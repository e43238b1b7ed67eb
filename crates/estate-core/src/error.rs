use thiserror::Error;

// ---------------------------------------------------------------------------
// StoreError — failure taxonomy at the store boundary
// ---------------------------------------------------------------------------

/// Failures a `ReportStore` implementation can surface. `Unavailable` means
/// the store could not be reached at all; `Query` means the store rejected
/// the read or returned rows the adapter could not decode.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

// ---------------------------------------------------------------------------
// EstateError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EstateError {
    #[error("invalid date '{0}': expected RFC 3339 or YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid property type: {0}")]
    InvalidPropertyType(String),

    #[error("invalid property status: {0}")]
    InvalidPropertyStatus(String),

    #[error("invalid task category: {0}")]
    InvalidTaskCategory(String),

    #[error("invalid task status: {0}")]
    InvalidTaskStatus(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl From<StoreError> for EstateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => EstateError::StoreUnavailable(msg),
            StoreError::Query(msg) => EstateError::Query(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, EstateError>;
