//! `async_graphql::dynamic` extensions for handling pagination.
//! See: https://graphql.org/learn/pagination/

use crate::error::field_error;
use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Object, ObjectAccessor, SchemaBuilder,
    TypeRef, ValueAccessor,
};
use extension_trait::extension_trait;
use pager::{Cursor, PageInfo, PagerError, PagerResult, PaginationArgs};

#[extension_trait]
pub impl TypeRefPagingExt for TypeRef {
    const PAGE_INFO: &'static str = "PageInfo";
}

fn page_info_field(
    name: &str,
    ty: TypeRef,
    read: fn(&PageInfo) -> Option<async_graphql::Value>,
) -> Field {
    Field::new(name, ty, move |ctx| {
        FieldFuture::new(async move {
            let page_info = ctx.parent_value.try_downcast_ref::<PageInfo>()?;
            Ok(read(page_info).map(FieldValue::value))
        })
    })
}

#[extension_trait]
pub impl SchemaBuilderPagingExt for SchemaBuilder {
    fn register_paging_types(self) -> Self {
        // PageInfo
        // See: https://relay.dev/graphql/connections.htm#sec-PageInfo
        let page_info_object = Object::new(TypeRef::PAGE_INFO)
            .field(page_info_field(
                "hasNextPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                |p| Some(p.has_next_page.into()),
            ))
            .field(page_info_field(
                "hasPreviousPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                |p| Some(p.has_previous_page.into()),
            ))
            .field(page_info_field(
                "startCursor",
                TypeRef::named(TypeRef::STRING),
                |p| p.start_cursor.as_ref().map(|c| c.to_string().into()),
            ))
            .field(page_info_field(
                "endCursor",
                TypeRef::named(TypeRef::STRING),
                |p| p.end_cursor.as_ref().map(|c| c.to_string().into()),
            ));
        self.register(page_info_object)
    }
}

#[extension_trait]
pub impl FieldPagingExt for Field {
    /// Add pagination arguments to a field.
    /// See: https://relay.dev/graphql/connections.htm#sec-Arguments
    fn paging_arguments(self) -> Self {
        // Forward pagination arguments
        self.argument(
            InputValue::new("first", TypeRef::named(TypeRef::INT)).description(
                "Paginate forward, returning the given amount of edges at most.",
            ),
        )
        .argument(
            InputValue::new("after", TypeRef::named(TypeRef::STRING))
                .description("Return edges after the given cursor."),
        )
        // Backward pagination arguments
        .argument(
            InputValue::new("last", TypeRef::named(TypeRef::INT)).description(
                "Paginate backward, returning the given amount of edges at most.",
            ),
        )
        .argument(
            InputValue::new("before", TypeRef::named(TypeRef::STRING))
                .description("Return edges before the given cursor."),
        )
    }
}

fn present<'a>(args: &'a ObjectAccessor<'_>, name: &str) -> Option<ValueAccessor<'a>> {
    args.get(name).filter(|value| !value.is_null())
}

fn count_argument(args: &ObjectAccessor<'_>, name: &str) -> PagerResult<Option<u64>> {
    present(args, name)
        .map(|value| {
            let count = value
                .i64()
                .map_err(|_| PagerError::InvalidArgument(format!("`{name}` must be an integer")))?;
            u64::try_from(count).map_err(|_| {
                PagerError::InvalidArgument(format!("`{name}` must not be negative, got {count}"))
            })
        })
        .transpose()
}

fn cursor_argument(args: &ObjectAccessor<'_>, name: &str) -> PagerResult<Option<Cursor>> {
    present(args, name)
        .map(|value| {
            value
                .string()
                .map(Cursor::from)
                .map_err(|_| PagerError::InvalidArgument(format!("`{name}` must be a string")))
        })
        .transpose()
}

/// Read the connection arguments of a field.
pub fn pagination_args(args: &ObjectAccessor<'_>) -> async_graphql::Result<PaginationArgs> {
    let read = || -> PagerResult<PaginationArgs> {
        let order_by = present(args, "orderBy")
            .map(|value| {
                value.enum_name().map(str::to_string).map_err(|_| {
                    PagerError::InvalidArgument("`orderBy` must be an ordering".to_string())
                })
            })
            .transpose()?;

        Ok(PaginationArgs {
            first: count_argument(args, "first")?,
            after: cursor_argument(args, "after")?,
            last: count_argument(args, "last")?,
            before: cursor_argument(args, "before")?,
            order_by,
        })
    };
    read().map_err(field_error)
}
