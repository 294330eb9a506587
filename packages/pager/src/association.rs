//! Pagination of a parent's children across a one-to-many association.

use crate::{
    assembler::assemble,
    connection::{Connection, PaginationArgs},
    error::{PagerError, PagerResult},
    order::OrderBy,
    predicate::Filter,
    slicer::{slice, PagingLimits},
    source::RowSource,
    value::Fields,
};
use pager_lib::{config::RelationConfig, defaults};
use std::sync::Arc;
use tracing::debug;

/// A one-to-many association: each child row references its parent through
/// `foreign_key`, matched against the parent's `source_key`.
pub struct HasMany<S: ?Sized> {
    source: Arc<S>,
    foreign_key: String,
    source_key: String,
    order_by: OrderBy,
    limits: PagingLimits,
}

impl<S: ?Sized> Clone for HasMany<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            foreign_key: self.foreign_key.clone(),
            source_key: self.source_key.clone(),
            order_by: self.order_by.clone(),
            limits: self.limits,
        }
    }
}

impl<S> HasMany<S>
where
    S: RowSource + ?Sized,
{
    pub fn new(source: Arc<S>, foreign_key: impl Into<String>, order_by: OrderBy) -> Self {
        Self {
            source,
            foreign_key: foreign_key.into(),
            source_key: defaults::PRIMARY_KEY.to_string(),
            order_by,
            limits: PagingLimits::default(),
        }
    }

    /// Build the association declared by a relation config.
    pub fn from_config(source: Arc<S>, config: &RelationConfig) -> PagerResult<Self> {
        let order_by = OrderBy::try_from(config)?;
        Ok(Self::new(source, config.foreign_key.clone(), order_by)
            .source_key(config.source_key.clone()))
    }

    /// The parent field the foreign key refers to. Defaults to `id`.
    pub fn source_key(mut self, source_key: impl Into<String>) -> Self {
        self.source_key = source_key.into();
        self
    }

    pub fn limits(mut self, limits: PagingLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn order_by(&self) -> &OrderBy {
        &self.order_by
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    fn scope<P: Fields + ?Sized>(&self, parent: &P) -> PagerResult<Filter> {
        let key = parent
            .field(&self.source_key)
            .ok_or_else(|| PagerError::MissingField(self.source_key.clone()))?;
        Ok(Filter::equals(self.foreign_key.clone(), key))
    }

    /// Fetch one page of `parent`'s children.
    pub async fn paginate<P>(
        &self,
        parent: &P,
        args: &PaginationArgs,
    ) -> PagerResult<Connection<S::Row>>
    where
        P: Fields + Sync + ?Sized,
    {
        let scope = self.scope(parent)?;
        let spec = self.order_by.resolve(args.order_by.as_deref())?;

        debug!(
            foreign_key = %self.foreign_key,
            selector = spec.selector(),
            "Paginating association"
        );

        let slice = slice(&*self.source, Some(scope), &spec, args, &self.limits).await?;
        assemble(slice, &spec)
    }

    /// Count all of `parent`'s children, independent of any page.
    pub async fn total_count<P>(&self, parent: &P) -> PagerResult<u64>
    where
        P: Fields + Sync + ?Sized,
    {
        let scope = self.scope(parent)?;
        Ok(self.source.count(Some(&scope)).await?)
    }
}
