//! `async_graphql::dynamic` extensions for handling GraphQL edges.
//! See: https://relay.dev/graphql/connections.htm#sec-Edge-Types.Fields

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, Object, TypeRef};
use extension_trait::extension_trait;
use pager::{Edge, Record};

#[extension_trait]
pub impl TypeRefEdgeExt for TypeRef {
    fn edge(node_name: impl Into<String>) -> String {
        format!("{}Edge", node_name.into())
    }
}

#[extension_trait]
pub impl ObjectEdgeExt for Object {
    fn new_edge(node_name: impl Into<String>) -> Self {
        let node_name = node_name.into();
        Self::new(TypeRef::edge(node_name.clone()))
            .field(Field::new(
                "node",
                TypeRef::named_nn(node_name),
                |ctx| {
                    FieldFuture::new(async move {
                        let edge = ctx.parent_value.try_downcast_ref::<Edge<Record>>()?;
                        Ok(Some(FieldValue::owned_any(edge.node.clone())))
                    })
                },
            ))
            .field(Field::new(
                "cursor",
                TypeRef::named_nn(TypeRef::STRING),
                |ctx| {
                    FieldFuture::new(async move {
                        let edge = ctx.parent_value.try_downcast_ref::<Edge<Record>>()?;
                        Ok(Some(FieldValue::value(edge.cursor.to_string())))
                    })
                },
            ))
    }
}
