//! Rendering of filters, orderings and limits to parameterized Postgres SQL.
//!
//! Identifiers are always quoted; values are always bound, never inlined.

use pager::{Comparison, Direction, FieldValue, Filter, LogicOp, OrderSpec, SliceQuery};
use sqlx::{Postgres, QueryBuilder};

/// Quote an identifier, splitting a schema-qualified name on `.`.
pub fn quote_ident(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Int(i) => builder.push_bind(*i),
        FieldValue::String(s) => builder.push_bind(s.clone()),
        FieldValue::Boolean(b) => builder.push_bind(*b),
        FieldValue::Timestamp(t) => builder.push_bind(*t),
    };
}

/// Append `filter` as a boolean SQL expression.
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::Comparison(c) => {
            let (field, op, value) = match c {
                Comparison::Equals(field, value) => (field, "=", value),
                Comparison::Greater(field, value) => (field, ">", value),
                Comparison::Less(field, value) => (field, "<", value),
            };
            builder.push(format!("{} {op} ", quote_ident(field)));
            push_value(builder, value);
        }
        Filter::LogicOp(lo) => {
            let (filters, joiner, empty) = match lo {
                LogicOp::And(filters) => (filters, " AND ", "TRUE"),
                LogicOp::Or(filters) => (filters, " OR ", "FALSE"),
            };
            if filters.is_empty() {
                builder.push(empty);
                return;
            }
            builder.push("(");
            for (i, f) in filters.iter().enumerate() {
                if i > 0 {
                    builder.push(joiner);
                }
                push_filter(builder, f);
            }
            builder.push(")");
        }
    }
}

/// Render `spec` as the body of an `ORDER BY` clause.
pub fn order_clause(spec: &OrderSpec) -> String {
    spec.fields()
        .iter()
        .map(|f| {
            let direction = match f.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            format!("{} {direction}", quote_ident(&f.name))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the single bounded `SELECT` for a slice.
pub fn select_query<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a str>,
    query: &SliceQuery,
) -> QueryBuilder<'static, Postgres> {
    let columns = columns
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ");

    let mut builder =
        QueryBuilder::new(format!("SELECT {columns} FROM {}", quote_ident(table)));

    if let Some(filter) = &query.filter {
        builder.push(" WHERE ");
        push_filter(&mut builder, filter);
    }

    builder.push(format!(" ORDER BY {}", order_clause(&query.effective_order())));

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }

    builder
}

/// Build the `COUNT(*)` over the rows matching `filter`.
pub fn count_query(table: &str, filter: Option<&Filter>) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", quote_ident(table)));
    if let Some(filter) = filter {
        builder.push(" WHERE ");
        push_filter(&mut builder, filter);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use pager::{
        predicate::seek_predicate, FetchDirection, FieldKind, OrderBy, OrderField,
        SeekDirection,
    };
    use pretty_assertions::assert_eq;

    fn latest() -> OrderSpec {
        OrderBy::new("id", FieldKind::Int)
            .selector(
                "LATEST",
                vec![OrderField::desc("created_at", FieldKind::Timestamp)],
            )
            .resolve(Some("LATEST"))
            .unwrap()
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("tasks"), "\"tasks\"");
        assert_eq!(quote_ident("app.tasks"), "\"app\".\"tasks\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(order_clause(&latest()), "\"created_at\" DESC, \"id\" ASC");
        assert_eq!(
            order_clause(&latest().reversed()),
            "\"created_at\" ASC, \"id\" DESC"
        );
    }

    #[test]
    fn test_seek_predicate_is_rendered_with_binds() {
        let spec = latest();
        let anchor = vec![
            FieldValue::Timestamp(chrono::Utc::now()),
            FieldValue::Int(7),
        ];
        let filter = Filter::conjoin([
            Some(Filter::equals("user_id", 1)),
            seek_predicate(&spec, Some(&anchor), SeekDirection::After),
        ]);

        let query = SliceQuery {
            order: spec,
            direction: FetchDirection::Forward,
            filter,
            limit: Some(4),
        };
        let builder = select_query("tasks", ["id", "name", "created_at"], &query);

        assert_eq!(
            builder.sql(),
            "SELECT \"id\", \"name\", \"created_at\" FROM \"tasks\" \
             WHERE (\"user_id\" = $1 AND (\"created_at\" < $2 OR (\"created_at\" = $3 AND \"id\" > $4))) \
             ORDER BY \"created_at\" DESC, \"id\" ASC LIMIT $5"
        );
    }

    #[test]
    fn test_backward_slice_reverses_order() {
        let query = SliceQuery {
            order: latest(),
            direction: FetchDirection::Backward,
            filter: None,
            limit: Some(4),
        };
        let builder = select_query("tasks", ["id"], &query);

        assert_eq!(
            builder.sql(),
            "SELECT \"id\" FROM \"tasks\" ORDER BY \"created_at\" ASC, \"id\" DESC LIMIT $1"
        );
    }

    #[test]
    fn test_count_query() {
        let filter = Filter::equals("user_id", 1);
        assert_eq!(
            count_query("tasks", Some(&filter)).sql(),
            "SELECT COUNT(*) FROM \"tasks\" WHERE \"user_id\" = $1"
        );
        assert_eq!(count_query("tasks", None).sql(), "SELECT COUNT(*) FROM \"tasks\"");
    }
}
