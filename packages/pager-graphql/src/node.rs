//! `async_graphql::dynamic` extensions exposing [`Record`]s as objects.

use async_graphql::{
    dynamic::{Field, FieldFuture, FieldValue, Object, TypeRef},
    Value,
};
use extension_trait::extension_trait;
use pager::{FieldKind, Record};

/// GraphQL scalar used for a column kind. Timestamps are RFC 3339 strings.
pub fn scalar_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Int => TypeRef::INT,
        FieldKind::String | FieldKind::Timestamp => TypeRef::STRING,
        FieldKind::Boolean => TypeRef::BOOLEAN,
    }
}

pub fn scalar_value(value: &pager::FieldValue) -> Value {
    match value {
        pager::FieldValue::Int(i) => Value::from(*i),
        pager::FieldValue::String(s) => Value::from(s.clone()),
        pager::FieldValue::Boolean(b) => Value::from(*b),
        pager::FieldValue::Timestamp(t) => Value::from(t.to_rfc3339()),
    }
}

#[extension_trait]
pub impl ObjectNodeExt for Object {
    /// An object with one nullable scalar field per column, resolved from a
    /// [`Record`] parent value.
    fn new_record_node<C: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (C, FieldKind)>,
    ) -> Self {
        columns
            .into_iter()
            .fold(Self::new(name), |object, (column, kind)| {
                let column = column.into();
                object.field(Field::new(
                    column.clone(),
                    TypeRef::named(scalar_type(kind)),
                    move |ctx| {
                        let column = column.clone();
                        FieldFuture::new(async move {
                            let record = ctx.parent_value.try_downcast_ref::<Record>()?;
                            Ok(record
                                .get(&column)
                                .map(|value| FieldValue::value(scalar_value(value))))
                        })
                    },
                ))
            })
    }
}
