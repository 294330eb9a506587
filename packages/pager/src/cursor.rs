//! Opaque cursors identifying a row's position in one ordering.
//!
//! A cursor carries the row's values for every field of the ordering
//! (key included), the selector name, and a format version. The payload is
//! `bincode`-serialized and hex-encoded. Cursors are opaque, not signed.

use crate::{
    error::{PagerError, PagerResult},
    order::OrderSpec,
    value::{FieldValue, Fields},
};
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CURSOR_VERSION: u8 = 1;

/// Fixed-width integers, and no bytes allowed past the payload.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cursor {
    fn from(cursor: String) -> Self {
        Self(cursor)
    }
}

impl From<&str> for Cursor {
    fn from(cursor: &str) -> Self {
        Self(cursor.to_string())
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    version: u8,
    selector: String,
    values: Vec<FieldValue>,
}

/// Encode the position of `row` under `spec`.
pub fn encode<R: Fields + ?Sized>(row: &R, spec: &OrderSpec) -> PagerResult<Cursor> {
    let values = spec
        .fields()
        .iter()
        .map(|field| match row.field(&field.name) {
            Some(value) if value.kind() == field.kind => Ok(value),
            _ => Err(PagerError::MissingField(field.name.clone())),
        })
        .collect::<PagerResult<Vec<_>>>()?;

    let payload = CursorPayload {
        version: CURSOR_VERSION,
        selector: spec.selector().to_string(),
        values,
    };
    let bytes = codec()
        .serialize(&payload)
        .map_err(|e| PagerError::InvalidCursor(e.to_string()))?;

    Ok(Cursor(hex::encode(bytes)))
}

/// Decode the anchor values carried by `cursor`, checking that it was
/// produced under `spec`.
pub fn decode(cursor: &Cursor, spec: &OrderSpec) -> PagerResult<Vec<FieldValue>> {
    let bytes = hex::decode(cursor.as_str())
        .map_err(|e| PagerError::InvalidCursor(format!("Not a cursor: {e}")))?;
    let payload: CursorPayload = codec()
        .deserialize(&bytes)
        .map_err(|e| PagerError::InvalidCursor(format!("Not a cursor: {e}")))?;

    if payload.version != CURSOR_VERSION {
        return Err(PagerError::InvalidCursor(format!(
            "Unsupported cursor version {}",
            payload.version
        )));
    }

    if payload.selector != spec.selector() {
        return Err(PagerError::InvalidCursor(format!(
            "Cursor was issued for ordering {:?}, not {:?}",
            payload.selector,
            spec.selector()
        )));
    }

    if payload.values.len() != spec.fields().len() {
        return Err(PagerError::InvalidCursor(format!(
            "Expected {} values, found {}",
            spec.fields().len(),
            payload.values.len()
        )));
    }

    for (value, field) in payload.values.iter().zip(spec.fields()) {
        if value.kind() != field.kind {
            return Err(PagerError::InvalidCursor(format!(
                "Expected a {} value for {:?}, found {}",
                field.kind,
                field.name,
                value.kind()
            )));
        }
    }

    Ok(payload.values)
}
