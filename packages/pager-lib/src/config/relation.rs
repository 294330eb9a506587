use crate::{
    config::{Env, PagerConfigResult},
    defaults,
    utils::{is_opt_env_var, trim_opt_env_key},
};
use serde::Deserialize;

/// A one-to-many association exposed as a paginated connection.
///
/// ```yaml
/// relations:
///   - name: tasks
///     table: tasks
///     foreign_key: user_id
///     columns:
///       - { name: id, kind: int }
///       - { name: user_id, kind: int }
///       - { name: created_at, kind: timestamp }
///     order_by:
///       - name: LATEST
///         fields:
///           - { field: created_at, direction: desc }
/// ```
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct RelationConfig {
    /// Name used to select the relation from the command line.
    pub name: String,

    /// Table (optionally schema-qualified) holding the related rows.
    pub table: String,

    /// Unique column used as the final tie-breaker of every ordering.
    #[serde(default = "primary_key")]
    pub primary_key: String,

    /// Column referencing the parent entity. Its declared kind is the kind
    /// of the parent key.
    pub foreign_key: String,

    /// Parent field the foreign key refers to.
    #[serde(default = "primary_key")]
    pub source_key: String,

    pub columns: Vec<ColumnConfig>,

    /// Ordering selectors, in declaration order.
    #[serde(default)]
    pub order_by: Vec<OrderSelectorConfig>,

    /// Selector used when the request names none.
    pub default_order: Option<String>,
}

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct ColumnConfig {
    pub name: String,
    /// One of `int`, `string`, `boolean`, `timestamp`.
    pub kind: String,
}

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct OrderSelectorConfig {
    pub name: String,
    pub fields: Vec<OrderFieldConfig>,
}

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct OrderFieldConfig {
    pub field: String,
    /// `asc` or `desc`.
    #[serde(default = "order_direction")]
    pub direction: String,
}

fn primary_key() -> String {
    defaults::PRIMARY_KEY.to_string()
}

fn order_direction() -> String {
    defaults::ORDER_DIRECTION.to_string()
}

impl Env for RelationConfig {
    fn inject_opt_env_vars(&mut self) -> PagerConfigResult<()> {
        if is_opt_env_var(&self.table) {
            self.table = std::env::var(trim_opt_env_key(&self.table))?;
        }
        Ok(())
    }
}
