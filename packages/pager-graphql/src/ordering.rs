//! `async_graphql::dynamic` extensions for handling connection ordering.

use async_graphql::dynamic::{Enum, Field, InputValue, TypeRef};
use extension_trait::extension_trait;
use pager::OrderBy;

#[extension_trait]
pub impl TypeRefOrderingExt for TypeRef {
    fn connection_order(node_name: impl Into<String>) -> String {
        format!("{}ConnectionOrder", node_name.into())
    }
}

#[extension_trait]
pub impl EnumOrderingExt for Enum {
    /// One enum value per declared ordering selector.
    fn new_connection_order(node_name: impl Into<String>, order_by: &OrderBy) -> Self {
        order_by
            .selectors()
            .fold(Self::new(TypeRef::connection_order(node_name)), |e, name| {
                e.item(name)
            })
    }
}

#[extension_trait]
pub impl FieldOrderingExt for Field {
    /// Add ordering arguments to a field.
    fn ordering_arguments(self, node_name: impl Into<String>) -> Self {
        let order_name = TypeRef::connection_order(node_name);
        self.argument(InputValue::new("orderBy", TypeRef::named(order_name)))
    }
}
