//! `async_graphql::dynamic` extensions exposing pager connections.
//! See: https://relay.dev/graphql/connections.htm

mod connection;
mod edge;
mod error;
mod node;
mod ordering;
mod paging;

pub use connection::*;
pub use edge::*;
pub use error::*;
pub use node::*;
pub use ordering::*;
pub use paging::*;
