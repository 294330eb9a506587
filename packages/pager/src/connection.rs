//! The Relay connection envelope.
//! See: https://relay.dev/graphql/connections.htm

use crate::cursor::Cursor;
use serde::{Deserialize, Serialize};

/// Caller-supplied pagination arguments.
/// See: https://relay.dev/graphql/connections.htm#sec-Arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationArgs {
    pub first: Option<u64>,
    pub after: Option<Cursor>,
    pub last: Option<u64>,
    pub before: Option<Cursor>,
    pub order_by: Option<String>,
}

impl PaginationArgs {
    pub fn first(count: u64) -> Self {
        Self {
            first: Some(count),
            ..Self::default()
        }
    }

    pub fn last(count: u64) -> Self {
        Self {
            last: Some(count),
            ..Self::default()
        }
    }

    pub fn after(mut self, cursor: impl Into<Cursor>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn before(mut self, cursor: impl Into<Cursor>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    pub fn order_by(mut self, selector: impl Into<String>) -> Self {
        self.order_by = Some(selector.into());
        self
    }
}

/// See: https://relay.dev/graphql/connections.htm#sec-PageInfo
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub cursor: Cursor,
    pub node: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Convert every node, keeping cursors and page info.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge {
                    cursor: edge.cursor,
                    node: f(edge.node),
                })
                .collect(),
            page_info: self.page_info,
        }
    }
}
