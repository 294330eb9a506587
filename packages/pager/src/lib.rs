//! # pager
//!
//! Cursor-based ("Relay connection") pagination over ordered, relationally
//! stored collections.
//!
//! A request names an ordering selector and a window (`first`/`after`,
//! `last`/`before`). The engine resolves the selector into a total
//! [`OrderSpec`], decodes the anchor cursors into seek predicates, asks a
//! [`RowSource`] for one bounded slice, and assembles the [`Connection`]
//! envelope. Page existence is derived by fetching one row more than asked
//! for; no count query is ever issued for it.

#![deny(unused_crate_dependencies)]

pub mod assembler;
pub mod association;
pub mod connection;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod order;
pub mod predicate;
pub mod slicer;
pub mod source;
pub mod value;

pub use crate::{
    association::HasMany,
    connection::{Connection, Edge, PageInfo, PaginationArgs},
    cursor::Cursor,
    error::{PagerError, PagerResult},
    memory::MemorySource,
    order::{Direction, OrderBy, OrderField, OrderSpec},
    predicate::{Comparison, Filter, LogicOp, SeekDirection},
    slicer::{PagingLimits, Slice},
    source::{FetchDirection, RowSource, SliceQuery, SourceError},
    value::{FieldKind, FieldValue, Fields, Record},
};

