use crate::{
    predicate::Filter,
    source::{RowSource, SliceQuery, SourceResult},
    value::Fields,
};
use async_trait::async_trait;

/// A [`RowSource`] over rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource<R> {
    rows: Vec<R>,
}

impl<R> MemorySource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }
}

impl<R> FromIterator<R> for MemorySource<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl<R> RowSource for MemorySource<R>
where
    R: Fields + Clone + Send + Sync,
{
    type Row = R;

    async fn fetch(&self, query: &SliceQuery) -> SourceResult<Vec<R>> {
        let order = query.effective_order();
        let mut rows = self
            .rows
            .iter()
            .filter(|row| query.filter.as_ref().map_or(true, |f| f.matches(*row)))
            .cloned()
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| order.compare(a, b));
        if let Some(limit) = query.limit {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn count(&self, filter: Option<&Filter>) -> SourceResult<u64> {
        let count = self
            .rows
            .iter()
            .filter(|row| filter.map_or(true, |f| f.matches(*row)))
            .count();
        Ok(count as u64)
    }
}
