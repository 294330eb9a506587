//! `async_graphql::dynamic` extensions for handling GraphQL connections.
//! See: https://graphql.org/learn/pagination/#end-of-list-counts-and-connections
//! See: https://relay.dev/graphql/connections.htm#sec-Connection-Types

use crate::{
    edge::*, error::field_error, ordering::*, paging::*,
};
use async_graphql::dynamic::{
    Enum, Field, FieldFuture, FieldValue, Object, SchemaBuilder, TypeRef,
};
use extension_trait::extension_trait;
use pager::{Connection, HasMany, Record, RowSource};
use std::sync::Arc;
use tracing::debug;

/// An association of `Record` children paginated through a row source.
pub type RecordAssociation = HasMany<dyn RowSource<Row = Record>>;

#[extension_trait]
pub impl TypeRefConnectionExt for TypeRef {
    fn connection(node_name: impl Into<String>) -> String {
        format!("{}Connection", node_name.into())
    }
}

/// A resolved page, kept with what `totalCount` needs to count lazily.
struct ResolvedConnection {
    connection: Connection<Record>,
    parent: Record,
    association: Arc<RecordAssociation>,
}

#[extension_trait]
pub impl ObjectConnectionExt for Object {
    fn new_connection(node_name: impl Into<String>) -> Self {
        let node_name = node_name.into();
        Self::new(TypeRef::connection(node_name.clone()))
            .field(Field::new(
                "totalCount",
                TypeRef::named_nn(TypeRef::INT),
                |ctx| {
                    FieldFuture::new(async move {
                        let resolved =
                            ctx.parent_value.try_downcast_ref::<ResolvedConnection>()?;
                        let count = resolved
                            .association
                            .total_count(&resolved.parent)
                            .await
                            .map_err(field_error)?;
                        Ok(Some(FieldValue::value(count)))
                    })
                },
            ))
            .field(Field::new(
                "nodes",
                TypeRef::named_nn_list_nn(node_name.clone()),
                |ctx| {
                    FieldFuture::new(async move {
                        let resolved =
                            ctx.parent_value.try_downcast_ref::<ResolvedConnection>()?;
                        let nodes = resolved
                            .connection
                            .nodes()
                            .map(|node| FieldValue::owned_any(node.clone()))
                            .collect::<Vec<_>>();
                        Ok(Some(FieldValue::list(nodes)))
                    })
                },
            ))
            .field(Field::new(
                "edges",
                TypeRef::named_nn_list_nn(TypeRef::edge(node_name)),
                |ctx| {
                    FieldFuture::new(async move {
                        let resolved =
                            ctx.parent_value.try_downcast_ref::<ResolvedConnection>()?;
                        let edges = resolved
                            .connection
                            .edges
                            .iter()
                            .map(|edge| FieldValue::owned_any(edge.clone()))
                            .collect::<Vec<_>>();
                        Ok(Some(FieldValue::list(edges)))
                    })
                },
            ))
            .field(Field::new(
                "pageInfo",
                TypeRef::named_nn(TypeRef::PAGE_INFO),
                |ctx| {
                    FieldFuture::new(async move {
                        let resolved =
                            ctx.parent_value.try_downcast_ref::<ResolvedConnection>()?;
                        Ok(Some(FieldValue::owned_any(
                            resolved.connection.page_info.clone(),
                        )))
                    })
                },
            ))
    }
}

#[extension_trait]
pub impl FieldConnectionExt for Field {
    fn connection_arguments(self, node_name: impl Into<String>, ordered: bool) -> Self {
        let field = self.paging_arguments();
        match ordered {
            true => field.ordering_arguments(node_name),
            false => field,
        }
    }
}

/// The GraphQL surface of one paginated association: the
/// `<Node>Connection`, `<Node>Edge` and `<Node>ConnectionOrder` types, and
/// the field resolving a page against a `Record` parent.
#[derive(Clone)]
pub struct ConnectionType {
    node_name: String,
    association: Arc<RecordAssociation>,
}

impl ConnectionType {
    pub fn new(node_name: impl Into<String>, association: RecordAssociation) -> Self {
        Self {
            node_name: node_name.into(),
            association: Arc::new(association),
        }
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    fn ordered(&self) -> bool {
        self.association.order_by().selectors().next().is_some()
    }

    /// Register the connection, edge and ordering types.
    pub fn register(&self, schema: SchemaBuilder) -> SchemaBuilder {
        let schema = schema
            .register(Object::new_connection(self.node_name.clone()))
            .register(Object::new_edge(self.node_name.clone()));
        match self.ordered() {
            true => schema.register(Enum::new_connection_order(
                self.node_name.clone(),
                self.association.order_by(),
            )),
            false => schema,
        }
    }

    /// A field resolving one page of the parent `Record`'s children.
    pub fn field(&self, name: impl Into<String>) -> Field {
        let association = self.association.clone();
        Field::new(
            name,
            TypeRef::named_nn(TypeRef::connection(self.node_name.clone())),
            move |ctx| {
                let association = association.clone();
                FieldFuture::new(async move {
                    let parent = ctx.parent_value.try_downcast_ref::<Record>()?;
                    let args = pagination_args(&ctx.args)?;
                    debug!(?args, "Resolving connection");

                    let connection = association
                        .paginate(parent, &args)
                        .await
                        .map_err(field_error)?;

                    Ok(Some(FieldValue::owned_any(ResolvedConnection {
                        connection,
                        parent: parent.clone(),
                        association,
                    })))
                })
            },
        )
        .connection_arguments(self.node_name.clone(), self.ordered())
    }
}

#[extension_trait]
pub impl SchemaBuilderConnectionExt for SchemaBuilder {
    fn register_connection(self, connection: &ConnectionType) -> Self {
        connection.register(self)
    }
}
