//! Ordering selectors and the total orders they resolve to.

use crate::{
    error::{PagerError, PagerResult},
    value::{FieldKind, Fields},
};
use indexmap::IndexMap;
use pager_lib::config::RelationConfig;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap, str::FromStr};
use strum::{AsRefStr, EnumString};
use tracing::debug;

/// Selector name used when a request names no ordering and none is declared
/// as the default. Cannot collide with a GraphQL enum value.
pub const KEY_SELECTOR: &str = "@key";

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
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderField {
    pub name: String,
    pub kind: FieldKind,
    pub direction: Direction,
}

impl OrderField {
    pub fn new(name: impl Into<String>, kind: FieldKind, direction: Direction) -> Self {
        Self {
            name: name.into(),
            kind,
            direction,
        }
    }

    pub fn asc(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, Direction::Asc)
    }

    pub fn desc(name: impl Into<String>, kind: FieldKind) -> Self {
        Self::new(name, kind, Direction::Desc)
    }
}

/// A resolved, total ordering. The last field is always the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    selector: String,
    fields: Vec<OrderField>,
}

impl OrderSpec {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn fields(&self) -> &[OrderField] {
        &self.fields
    }

    /// The same fields with every direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| OrderField::new(f.name.clone(), f.kind, f.direction.reversed()))
                .collect(),
        }
    }

    /// Compare two rows lexicographically under this ordering.
    ///
    /// A missing value sorts before any present one. Values of mismatched
    /// kinds compare equal.
    pub fn compare<R: Fields + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        for field in &self.fields {
            let (left, right) = (a.field(&field.name), b.field(&field.name));
            let ord = match (left, right) {
                (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
                (l, r) => l.is_some().cmp(&r.is_some()),
            };
            let ord = match field.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// The ordering selectors declared for an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    key: OrderField,
    selectors: IndexMap<String, Vec<OrderField>>,
    default: Option<String>,
}

impl OrderBy {
    /// Start from the entity's unique key field.
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: OrderField::asc(key, kind),
            selectors: IndexMap::new(),
            default: None,
        }
    }

    pub fn selector(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = OrderField>,
    ) -> Self {
        self.selectors
            .insert(name.into(), fields.into_iter().collect());
        self
    }

    pub fn default_selector(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    pub fn key(&self) -> &OrderField {
        &self.key
    }

    /// Declared selector names, in declaration order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selectors.keys().map(String::as_str)
    }

    /// Resolve a selector token into a total ordering.
    ///
    /// With no token the default selector is used; with no default either,
    /// rows are ordered by the key alone under [`KEY_SELECTOR`].
    pub fn resolve(&self, token: Option<&str>) -> PagerResult<OrderSpec> {
        let name = match token.or(self.default.as_deref()) {
            Some(name) => name,
            None => {
                return Ok(OrderSpec {
                    selector: KEY_SELECTOR.to_string(),
                    fields: vec![self.key.clone()],
                })
            }
        };

        let declared = self
            .selectors
            .get(name)
            .ok_or_else(|| PagerError::InvalidOrder(name.to_string()))?;

        let mut fields = Vec::with_capacity(declared.len() + 1);
        for field in declared {
            fields.push(field.clone());
            // Nothing after the key can break a tie.
            if field.name == self.key.name {
                break;
            }
        }
        if fields.last().map(|f| f.name != self.key.name).unwrap_or(true) {
            fields.push(self.key.clone());
        }

        debug!(selector = name, fields = fields.len(), "Resolved ordering");

        Ok(OrderSpec {
            selector: name.to_string(),
            fields,
        })
    }
}

impl TryFrom<&RelationConfig> for OrderBy {
    type Error = PagerError;

    fn try_from(config: &RelationConfig) -> PagerResult<Self> {
        let kinds = config
            .columns
            .iter()
            .map(|c| {
                FieldKind::from_str(&c.kind)
                    .map(|kind| (c.name.as_str(), kind))
                    .map_err(|_| {
                        PagerError::InvalidArgument(format!(
                            "Column {:?} has unsupported kind {:?}",
                            c.name, c.kind
                        ))
                    })
            })
            .collect::<PagerResult<HashMap<_, _>>>()?;

        let kind_of = |name: &str| {
            kinds.get(name).copied().ok_or_else(|| {
                PagerError::InvalidArgument(format!(
                    "Relation {:?} declares no column {name:?}",
                    config.name
                ))
            })
        };

        let mut order_by = OrderBy::new(
            config.primary_key.clone(),
            kind_of(&config.primary_key)?,
        );

        for selector in &config.order_by {
            let fields = selector
                .fields
                .iter()
                .map(|f| {
                    let direction = Direction::from_str(&f.direction).map_err(|_| {
                        PagerError::InvalidArgument(format!(
                            "Unknown direction {:?} for {:?}",
                            f.direction, f.field
                        ))
                    })?;
                    Ok(OrderField::new(f.field.clone(), kind_of(&f.field)?, direction))
                })
                .collect::<PagerResult<Vec<_>>>()?;
            order_by = order_by.selector(selector.name.clone(), fields);
        }

        if let Some(default) = &config.default_order {
            if !order_by.selectors.contains_key(default) {
                return Err(PagerError::InvalidOrder(default.clone()));
            }
            order_by = order_by.default_selector(default.clone());
        }

        Ok(order_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use assert_matches::assert_matches;
    use pager_lib::config::{ColumnConfig, OrderFieldConfig, OrderSelectorConfig};
    use pretty_assertions::assert_eq;

    fn tasks() -> OrderBy {
        OrderBy::new("id", FieldKind::Int)
            .selector("ID", vec![OrderField::asc("id", FieldKind::Int)])
            .selector(
                "LATEST",
                vec![OrderField::desc("created_at", FieldKind::Timestamp)],
            )
            .selector(
                "NAME_THEN_ID_THEN_DONE",
                vec![
                    OrderField::asc("name", FieldKind::String),
                    OrderField::desc("id", FieldKind::Int),
                    OrderField::asc("done", FieldKind::Boolean),
                ],
            )
    }

    #[test]
    fn test_resolve_appends_key_as_tie_breaker() {
        let spec = tasks().resolve(Some("LATEST")).unwrap();
        assert_eq!(spec.selector(), "LATEST");
        assert_eq!(
            spec.fields(),
            &[
                OrderField::desc("created_at", FieldKind::Timestamp),
                OrderField::asc("id", FieldKind::Int),
            ]
        );
    }

    #[test]
    fn test_resolve_does_not_duplicate_declared_key() {
        let spec = tasks().resolve(Some("ID")).unwrap();
        assert_eq!(spec.fields(), &[OrderField::asc("id", FieldKind::Int)]);
    }

    #[test]
    fn test_resolve_drops_fields_after_key() {
        let spec = tasks().resolve(Some("NAME_THEN_ID_THEN_DONE")).unwrap();
        assert_eq!(
            spec.fields(),
            &[
                OrderField::asc("name", FieldKind::String),
                OrderField::desc("id", FieldKind::Int),
            ]
        );
    }

    #[test]
    fn test_resolve_unknown_selector() {
        assert_matches!(
            tasks().resolve(Some("OLDEST")),
            Err(PagerError::InvalidOrder(name)) if name == "OLDEST"
        );
    }

    #[test]
    fn test_resolve_without_token() {
        let spec = tasks().resolve(None).unwrap();
        assert_eq!(spec.selector(), KEY_SELECTOR);
        assert_eq!(spec.fields(), &[OrderField::asc("id", FieldKind::Int)]);

        let spec = tasks().default_selector("LATEST").resolve(None).unwrap();
        assert_eq!(spec.selector(), "LATEST");
    }

    #[test]
    fn test_reversed_flips_every_direction() {
        let spec = tasks().resolve(Some("LATEST")).unwrap().reversed();
        assert_eq!(
            spec.fields(),
            &[
                OrderField::asc("created_at", FieldKind::Timestamp),
                OrderField::desc("id", FieldKind::Int),
            ]
        );
    }

    #[test]
    fn test_compare_uses_key_to_break_ties() {
        let spec = tasks().resolve(Some("NAME_THEN_ID_THEN_DONE")).unwrap();
        let a = Record::new().with("id", 1).with("name", "same");
        let b = Record::new().with("id", 2).with("name", "same");
        let c = Record::new().with("id", 0).with("name", "later");

        assert_eq!(spec.compare(&a, &b), Ordering::Greater);
        assert_eq!(spec.compare(&b, &a), Ordering::Less);
        assert_eq!(spec.compare(&c, &a), Ordering::Less);
        assert_eq!(spec.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_order_by_from_relation_config() {
        let config = RelationConfig {
            name: "tasks".to_string(),
            table: "tasks".to_string(),
            primary_key: "id".to_string(),
            foreign_key: "user_id".to_string(),
            source_key: "id".to_string(),
            columns: vec![
                ColumnConfig {
                    name: "id".to_string(),
                    kind: "int".to_string(),
                },
                ColumnConfig {
                    name: "created_at".to_string(),
                    kind: "timestamp".to_string(),
                },
            ],
            order_by: vec![OrderSelectorConfig {
                name: "LATEST".to_string(),
                fields: vec![OrderFieldConfig {
                    field: "created_at".to_string(),
                    direction: "desc".to_string(),
                }],
            }],
            default_order: Some("LATEST".to_string()),
        };

        let order_by = OrderBy::try_from(&config).unwrap();
        assert_eq!(order_by.key(), &OrderField::asc("id", FieldKind::Int));
        assert_eq!(order_by.selectors().collect::<Vec<_>>(), vec!["LATEST"]);
        assert_eq!(order_by.resolve(None).unwrap().selector(), "LATEST");

        let mut broken = config.clone();
        broken.order_by[0].fields[0].field = "updated_at".to_string();
        assert_matches!(
            OrderBy::try_from(&broken),
            Err(PagerError::InvalidArgument(_))
        );

        let mut broken = config;
        broken.default_order = Some("OLDEST".to_string());
        assert_matches!(OrderBy::try_from(&broken), Err(PagerError::InvalidOrder(_)));
    }
}
