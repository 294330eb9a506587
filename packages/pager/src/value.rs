use crate::error::{PagerError, PagerResult};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use strum::{AsRefStr, EnumString};

/// The kind of a [`FieldValue`], as declared for an ordering or filter column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FieldKind {
    Int,
    String,
    Boolean,
    Timestamp,
}

/// A typed scalar read from a row.
///
/// Values of the same kind are totally ordered. Values of different kinds
/// do not compare.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValue {
    Int(i64),
    String(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldKind {
    /// Parse `input` as a value of this kind. Timestamps are RFC 3339.
    pub fn parse_value(self, input: &str) -> PagerResult<FieldValue> {
        let invalid =
            || PagerError::InvalidArgument(format!("{input:?} is not a valid {self}"));
        Ok(match self {
            Self::Int => FieldValue::Int(input.parse().map_err(|_| invalid())?),
            Self::String => FieldValue::String(input.to_string()),
            Self::Boolean => FieldValue::Boolean(input.parse().map_err(|_| invalid())?),
            Self::Timestamp => FieldValue::Timestamp(
                DateTime::parse_from_rfc3339(input)
                    .map_err(|_| invalid())?
                    .with_timezone(&Utc),
            ),
        })
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Int(_) => FieldKind::Int,
            Self::String(_) => FieldKind::String,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Timestamp(_) => FieldKind::Timestamp,
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.partial_cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Read access to the named fields of a row.
pub trait Fields {
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl<T: Fields + ?Sized> Fields for &T {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

/// A row as an insertion-ordered map of column name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.0.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Fields for Record {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.0.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_values_of_the_same_kind_are_ordered() {
        assert!(FieldValue::from(1) < FieldValue::from(2));
        assert!(FieldValue::from("a") < FieldValue::from("b"));
        assert!(FieldValue::from(false) < FieldValue::from(true));

        let earlier = Utc.with_ymd_and_hms(2015, 11, 17, 3, 23, 15).unwrap();
        let later = Utc.with_ymd_and_hms(2015, 11, 17, 3, 23, 55).unwrap();
        assert!(FieldValue::from(earlier) < FieldValue::from(later));
    }

    #[test]
    fn test_values_of_different_kinds_do_not_compare() {
        assert_eq!(FieldValue::from(1).partial_cmp(&FieldValue::from("1")), None);
    }

    #[test]
    fn test_field_kind_parses_case_insensitively() {
        assert_eq!(FieldKind::from_str("timestamp").unwrap(), FieldKind::Timestamp);
        assert_eq!(FieldKind::from_str("INT").unwrap(), FieldKind::Int);
        assert!(FieldKind::from_str("float").is_err());
        assert_eq!(FieldKind::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_parse_value_follows_the_kind() {
        assert_eq!(FieldKind::Int.parse_value("42").unwrap(), FieldValue::Int(42));
        assert_eq!(
            FieldKind::String.parse_value("42").unwrap(),
            FieldValue::String("42".to_string())
        );
        assert_eq!(
            FieldKind::Boolean.parse_value("true").unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            FieldKind::Timestamp
                .parse_value("2015-11-17T04:23:15+01:00")
                .unwrap(),
            FieldValue::Timestamp(Utc.with_ymd_and_hms(2015, 11, 17, 3, 23, 15).unwrap())
        );
        assert!(matches!(
            FieldKind::Int.parse_value("abc"),
            Err(PagerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_record_preserves_column_order() {
        let record = Record::new()
            .with("id", 3)
            .with("name", "write docs")
            .with("done", false);

        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["id", "name", "done"]);
        assert_eq!(record.field("id"), Some(FieldValue::Int(3)));
        assert_eq!(record.field("missing"), None);
    }
}
