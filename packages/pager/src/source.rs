//! The capability the engine needs from a backing store.

use crate::{order::OrderSpec, predicate::Filter, value::Fields};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Which way a [`SliceQuery`] walks its ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    Forward,
    Backward,
}

/// A single bounded read handed to a [`RowSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceQuery {
    /// The ordering as presented to the caller.
    pub order: OrderSpec,
    pub direction: FetchDirection,
    pub filter: Option<Filter>,
    pub limit: Option<u64>,
}

impl SliceQuery {
    /// The ordering the source must actually apply.
    ///
    /// Backward fetches read the reversed ordering so the rows nearest the
    /// anchor come first; the engine restores forward order afterwards.
    pub fn effective_order(&self) -> OrderSpec {
        match self.direction {
            FetchDirection::Forward => self.order.clone(),
            FetchDirection::Backward => self.order.reversed(),
        }
    }
}

/// A store able to produce ordered, filtered, bounded slices of rows.
#[async_trait]
pub trait RowSource: Send + Sync {
    type Row: Fields + Send + Sync;

    /// Return at most `query.limit` rows matching `query.filter`, ordered by
    /// `query.effective_order()`.
    async fn fetch(&self, query: &SliceQuery) -> SourceResult<Vec<Self::Row>>;

    /// Count the rows matching `filter`.
    async fn count(&self, filter: Option<&Filter>) -> SourceResult<u64>;
}
