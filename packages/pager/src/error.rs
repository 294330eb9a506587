use crate::source::SourceError;
use thiserror::Error;

pub type PagerResult<T> = core::result::Result<T, PagerError>;

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("Unknown ordering selector: {0:?}")]
    InvalidOrder(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Requested page size of {requested} exceeds the maximum of {max}")]
    PageSizeExceeded { requested: u64, max: u64 },
    #[error("Row has no usable value for field {0:?}")]
    MissingField(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
