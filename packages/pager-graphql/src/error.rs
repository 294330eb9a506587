use async_graphql::{Error, ErrorExtensions};
use pager::PagerError;

/// Machine-readable code set on the `code` extension of field errors.
pub fn error_code(e: &PagerError) -> &'static str {
    match e {
        PagerError::InvalidOrder(_) => "INVALID_ORDER",
        PagerError::InvalidCursor(_) => "INVALID_CURSOR",
        PagerError::Source(_) => "SOURCE_ERROR",
        PagerError::PageSizeExceeded { .. } => "PAGE_SIZE_EXCEEDED",
        PagerError::MissingField(_) => "MISSING_FIELD",
        PagerError::InvalidArgument(_) => "INVALID_ARGUMENT",
    }
}

/// Surface a pager error as a GraphQL field error.
pub fn field_error(e: PagerError) -> Error {
    let code = error_code(&e);
    Error::new(e.to_string()).extend_with(|_, ext| ext.set("code", code))
}
