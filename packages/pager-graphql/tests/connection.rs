use async_graphql::{
    dynamic::{Field, FieldFuture, FieldValue, InputValue, Object, Schema, TypeRef},
    Request,
};
use pager::{
    FieldKind, HasMany, MemorySource, OrderBy, OrderField, Record, RowSource,
};
use pager_graphql::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

const TASK_COLUMNS: [(&str, FieldKind); 3] = [
    ("id", FieldKind::Int),
    ("name", FieldKind::String),
    ("createdAt", FieldKind::Timestamp),
];

fn tasks() -> Vec<Record> {
    // Nine tasks for user 1, created five seconds apart, oldest first.
    (1..=9)
        .map(|id: i64| {
            let created_at = format!("2015-11-17T03:23:{:02}Z", 10 + id * 5);
            Record::new()
                .with("id", id)
                .with("userId", 1)
                .with("name", format!("task {id}"))
                .with("createdAt", created_at.parse::<chrono::DateTime<chrono::Utc>>().unwrap())
        })
        .collect()
}

fn schema() -> Schema {
    let source: Arc<dyn RowSource<Row = Record>> = Arc::new(MemorySource::new(tasks()));
    let order_by = OrderBy::new("id", FieldKind::Int)
        .selector("ID", vec![OrderField::asc("id", FieldKind::Int)])
        .selector(
            "LATEST",
            vec![OrderField::desc("createdAt", FieldKind::Timestamp)],
        );
    let user_tasks = ConnectionType::new("Task", HasMany::new(source, "userId", order_by));

    let user = Object::new_record_node("User", [("id", FieldKind::Int)])
        .field(user_tasks.field("tasks"));
    let task = Object::new_record_node("Task", TASK_COLUMNS);

    let query = Object::new("Query").field(
        Field::new("user", TypeRef::named("User"), |ctx| {
            FieldFuture::new(async move {
                let id = ctx.args.try_get("id")?.i64()?;
                Ok(Some(FieldValue::owned_any(Record::new().with("id", id))))
            })
        })
        .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::INT))),
    );

    Schema::build("Query", None, None)
        .register_paging_types()
        .register_connection(&user_tasks)
        .register(task)
        .register(user)
        .register(query)
        .finish()
        .unwrap()
}

async fn execute(schema: &Schema, query: String) -> Value {
    let response = schema.execute(Request::new(query)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

fn code_of(response: &async_graphql::Response) -> Value {
    serde_json::to_value(&response.errors[0]).unwrap()["extensions"]["code"].clone()
}

fn task_ids(data: &Value) -> Vec<i64> {
    data["user"]["tasks"]["edges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|edge| edge["node"]["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_in_query_slicing_with_first_and_order_by() {
    let schema = schema();
    let query = |after: Option<&str>| {
        let after = after
            .map(|cursor| format!("after: \"{cursor}\", "))
            .unwrap_or_default();
        format!(
            r#"{{
                user(id: 1) {{
                    tasks(first: 3, {after}orderBy: LATEST) {{
                        edges {{ cursor node {{ id name }} }}
                        pageInfo {{ hasNextPage endCursor }}
                    }}
                }}
            }}"#
        )
    };

    let first = execute(&schema, query(None)).await;
    assert_eq!(task_ids(&first), vec![9, 8, 7]);
    assert_eq!(first["user"]["tasks"]["pageInfo"]["hasNextPage"], json!(true));

    let end_cursor = first["user"]["tasks"]["pageInfo"]["endCursor"]
        .as_str()
        .unwrap()
        .to_string();
    let next = execute(&schema, query(Some(&end_cursor))).await;
    assert_eq!(task_ids(&next), vec![6, 5, 4]);
    assert_eq!(next["user"]["tasks"]["pageInfo"]["hasNextPage"], json!(true));

    let third_cursor = next["user"]["tasks"]["edges"][2]["cursor"]
        .as_str()
        .unwrap()
        .to_string();
    let last = execute(&schema, query(Some(&third_cursor))).await;
    assert_eq!(task_ids(&last), vec![3, 2, 1]);
    assert_eq!(last["user"]["tasks"]["pageInfo"]["hasNextPage"], json!(false));
}

#[tokio::test]
async fn test_reverse_pagination_with_last_and_order_by() {
    let schema = schema();
    let query = |before: Option<&str>| {
        let before = before
            .map(|cursor| format!("before: \"{cursor}\", "))
            .unwrap_or_default();
        format!(
            r#"{{
                user(id: 1) {{
                    tasks(last: 3, {before}orderBy: LATEST) {{
                        edges {{ cursor node {{ id name }} }}
                        pageInfo {{ hasPreviousPage startCursor }}
                    }}
                }}
            }}"#
        )
    };

    let first = execute(&schema, query(None)).await;
    assert_eq!(task_ids(&first), vec![3, 2, 1]);
    assert_eq!(
        first["user"]["tasks"]["pageInfo"]["hasPreviousPage"],
        json!(true)
    );

    let start_cursor = first["user"]["tasks"]["pageInfo"]["startCursor"]
        .as_str()
        .unwrap()
        .to_string();
    let next = execute(&schema, query(Some(&start_cursor))).await;
    assert_eq!(task_ids(&next), vec![6, 5, 4]);
    assert_eq!(
        next["user"]["tasks"]["pageInfo"]["hasPreviousPage"],
        json!(true)
    );

    let first_cursor = next["user"]["tasks"]["edges"][0]["cursor"]
        .as_str()
        .unwrap()
        .to_string();
    let last = execute(&schema, query(Some(&first_cursor))).await;
    assert_eq!(task_ids(&last), vec![9, 8, 7]);
    assert_eq!(
        last["user"]["tasks"]["pageInfo"]["hasPreviousPage"],
        json!(false)
    );
}

#[tokio::test]
async fn test_nodes_and_total_count() {
    let schema = schema();
    let data = execute(
        &schema,
        r#"{
            user(id: 1) {
                tasks(first: 2, orderBy: ID) {
                    totalCount
                    nodes { id name createdAt }
                }
            }
        }"#
        .to_string(),
    )
    .await;

    assert_eq!(
        data,
        json!({
            "user": {
                "tasks": {
                    "totalCount": 9,
                    "nodes": [
                        { "id": 1, "name": "task 1", "createdAt": "2015-11-17T03:23:15+00:00" },
                        { "id": 2, "name": "task 2", "createdAt": "2015-11-17T03:23:20+00:00" },
                    ]
                }
            }
        })
    );
}

#[tokio::test]
async fn test_invalid_arguments_are_field_errors() {
    let schema = schema();

    let response = schema
        .execute(Request::new(
            r#"{ user(id: 1) { tasks(first: -1) { totalCount } } }"#,
        ))
        .await;
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("must not be negative"));
    assert_eq!(code_of(&response), json!("INVALID_ARGUMENT"));

    let response = schema
        .execute(Request::new(
            r#"{ user(id: 1) { tasks(first: 3, after: "zz", orderBy: ID) { totalCount } } }"#,
        ))
        .await;
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.starts_with("Invalid cursor"));
    assert_eq!(code_of(&response), json!("INVALID_CURSOR"));

    let response = schema
        .execute(Request::new(
            r#"{ user(id: 1) { tasks(first: 1000) { totalCount } } }"#,
        ))
        .await;
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("exceeds the maximum"));
    assert_eq!(code_of(&response), json!("PAGE_SIZE_EXCEEDED"));
}

#[tokio::test]
async fn test_connection_types_are_exposed() {
    let sdl = schema().sdl();

    assert!(sdl.contains("type TaskConnection"));
    assert!(sdl.contains("type TaskEdge"));
    assert!(sdl.contains("enum TaskConnectionOrder"));
    assert!(sdl.contains("type PageInfo"));
}
