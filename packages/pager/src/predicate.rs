//! Boolean predicates over row fields, and the seek predicate that selects
//! the rows strictly after or before an anchor position.

use crate::{
    order::{Direction, OrderSpec},
    value::{FieldValue, Fields},
};
use std::cmp::Ordering;

/// Represents an operation through which rows can be included or excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Comparison(Comparison),
    LogicOp(LogicOp),
}

/// Represents an operation in which a row's field is compared against a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equals(String, FieldValue),
    Greater(String, FieldValue),
    Less(String, FieldValue),
}

/// Represents filters evaluated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicOp {
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Comparison(Comparison::Equals(field.into(), value.into()))
    }

    pub fn greater(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Comparison(Comparison::Greater(field.into(), value.into()))
    }

    pub fn less(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Comparison(Comparison::Less(field.into(), value.into()))
    }

    /// Conjunction of `filters`, flattening a single operand.
    pub fn all(mut filters: Vec<Filter>) -> Self {
        if filters.len() == 1 {
            filters.remove(0)
        } else {
            Self::LogicOp(LogicOp::And(filters))
        }
    }

    /// Disjunction of `filters`, flattening a single operand.
    pub fn any(mut filters: Vec<Filter>) -> Self {
        if filters.len() == 1 {
            filters.remove(0)
        } else {
            Self::LogicOp(LogicOp::Or(filters))
        }
    }

    /// Conjunction of whichever of the optional filters are present.
    pub fn conjoin(filters: impl IntoIterator<Item = Option<Filter>>) -> Option<Self> {
        let filters = filters.into_iter().flatten().collect::<Vec<_>>();
        match filters.is_empty() {
            true => None,
            false => Some(Self::all(filters)),
        }
    }

    /// Evaluate the filter against a row. Comparisons against a missing
    /// field, or a value of another kind, do not match.
    pub fn matches<R: Fields + ?Sized>(&self, row: &R) -> bool {
        match self {
            Self::Comparison(c) => {
                let (field, value, expected) = match c {
                    Comparison::Equals(f, v) => (f, v, Ordering::Equal),
                    Comparison::Greater(f, v) => (f, v, Ordering::Greater),
                    Comparison::Less(f, v) => (f, v, Ordering::Less),
                };
                row.field(field)
                    .and_then(|actual| actual.partial_cmp(value))
                    .map(|ord| ord == expected)
                    .unwrap_or(false)
            }
            Self::LogicOp(LogicOp::And(filters)) => filters.iter().all(|f| f.matches(row)),
            Self::LogicOp(LogicOp::Or(filters)) => filters.iter().any(|f| f.matches(row)),
        }
    }
}

/// Which side of the anchor a seek predicate selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    After,
    Before,
}

/// Build the predicate selecting rows strictly after (or before) `anchor`
/// under `spec`.
///
/// For fields `f_1..f_n` with anchor values `v_1..v_n` this is the
/// lexicographic expansion
/// `OR_i ( AND_{j<i} f_j = v_j AND f_i op_i v_i )`, where `op_i` is `>` for
/// ascending fields seeking after (and descending fields seeking before),
/// `<` otherwise. The anchor row need not still exist.
pub fn seek_predicate(
    spec: &OrderSpec,
    anchor: Option<&[FieldValue]>,
    direction: SeekDirection,
) -> Option<Filter> {
    let anchor = anchor?;

    let branches = spec
        .fields()
        .iter()
        .zip(anchor)
        .enumerate()
        .map(|(i, (field, value))| {
            let mut terms = spec
                .fields()
                .iter()
                .zip(anchor)
                .take(i)
                .map(|(f, v)| Filter::equals(f.name.clone(), v.clone()))
                .collect::<Vec<_>>();

            let comparison = match (direction, field.direction) {
                (SeekDirection::After, Direction::Asc)
                | (SeekDirection::Before, Direction::Desc) => {
                    Filter::greater(field.name.clone(), value.clone())
                }
                _ => Filter::less(field.name.clone(), value.clone()),
            };
            terms.push(comparison);

            Filter::all(terms)
        })
        .collect::<Vec<_>>();

    match branches.is_empty() {
        true => None,
        false => Some(Filter::any(branches)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        order::{OrderBy, OrderField},
        value::{FieldKind, Record},
    };
    use pretty_assertions::assert_eq;

    fn spec() -> OrderSpec {
        OrderBy::new("id", FieldKind::Int)
            .selector(
                "PRIORITY",
                vec![
                    OrderField::desc("priority", FieldKind::Int),
                    OrderField::asc("name", FieldKind::String),
                ],
            )
            .resolve(Some("PRIORITY"))
            .unwrap()
    }

    #[test]
    fn test_no_anchor_is_the_identity() {
        assert_eq!(seek_predicate(&spec(), None, SeekDirection::After), None);
    }

    #[test]
    fn test_seek_after_expands_lexicographically() {
        let anchor = vec![FieldValue::from(5), FieldValue::from("m"), FieldValue::from(3)];
        let predicate = seek_predicate(&spec(), Some(&anchor), SeekDirection::After);

        assert_eq!(
            predicate,
            Some(Filter::any(vec![
                Filter::less("priority", 5),
                Filter::all(vec![
                    Filter::equals("priority", 5),
                    Filter::greater("name", "m"),
                ]),
                Filter::all(vec![
                    Filter::equals("priority", 5),
                    Filter::equals("name", "m"),
                    Filter::greater("id", 3),
                ]),
            ]))
        );
    }

    #[test]
    fn test_seek_before_flips_operators() {
        let anchor = vec![FieldValue::from(5), FieldValue::from("m"), FieldValue::from(3)];
        let predicate =
            seek_predicate(&spec(), Some(&anchor), SeekDirection::Before).unwrap();

        let row = |priority: i64, name: &str, id: i64| {
            Record::new()
                .with("priority", priority)
                .with("name", name)
                .with("id", id)
        };

        assert!(predicate.matches(&row(6, "z", 9)));
        assert!(predicate.matches(&row(5, "a", 9)));
        assert!(predicate.matches(&row(5, "m", 2)));
        assert!(!predicate.matches(&row(5, "m", 3)));
        assert!(!predicate.matches(&row(5, "m", 4)));
        assert!(!predicate.matches(&row(4, "a", 1)));
    }

    #[test]
    fn test_seek_after_and_before_partition_the_rows() {
        let spec = spec();
        let anchor_row = Record::new().with("priority", 2).with("name", "c").with("id", 5);
        let anchor = vec![FieldValue::from(2), FieldValue::from("c"), FieldValue::from(5)];
        let after = seek_predicate(&spec, Some(&anchor), SeekDirection::After).unwrap();
        let before = seek_predicate(&spec, Some(&anchor), SeekDirection::Before).unwrap();

        for priority in 1..=3 {
            for name in ["b", "c", "d"] {
                for id in 4..=6 {
                    let row = Record::new()
                        .with("priority", priority)
                        .with("name", name)
                        .with("id", id);
                    let expected = spec.compare(&row, &anchor_row);
                    assert_eq!(after.matches(&row), expected == Ordering::Greater);
                    assert_eq!(before.matches(&row), expected == Ordering::Less);
                }
            }
        }
    }

    #[test]
    fn test_filter_matches_ignores_mismatched_kinds() {
        let row = Record::new().with("id", 3);
        assert!(!Filter::equals("id", "3").matches(&row));
        assert!(!Filter::greater("missing", 1).matches(&row));
        assert!(Filter::conjoin([None, Some(Filter::equals("id", 3))])
            .unwrap()
            .matches(&row));
        assert_eq!(Filter::conjoin([None, None]), None);
    }
}
