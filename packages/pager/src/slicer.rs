//! Translate pagination arguments into one bounded fetch.

use crate::{
    connection::PaginationArgs,
    cursor,
    error::{PagerError, PagerResult},
    order::OrderSpec,
    predicate::{seek_predicate, Filter, SeekDirection},
    source::{FetchDirection, RowSource, SliceQuery},
};
use pager_lib::{config::PagingConfig, defaults};
use tracing::debug;

/// Page size bounds applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingLimits {
    pub default_page_size: u64,
    pub max_page_size: Option<u64>,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            default_page_size: defaults::DEFAULT_PAGE_SIZE,
            max_page_size: Some(defaults::MAX_PAGE_SIZE),
        }
    }
}

impl From<&PagingConfig> for PagingLimits {
    fn from(config: &PagingConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

impl PagingLimits {
    fn check(&self, requested: Option<u64>) -> PagerResult<()> {
        match (requested, self.max_page_size) {
            (Some(requested), Some(max)) if requested > max => {
                Err(PagerError::PageSizeExceeded { requested, max })
            }
            _ => Ok(()),
        }
    }
}

/// Rows of one page, in forward order, with page existence flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<R> {
    pub rows: Vec<R>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

fn to_len(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}

/// Fetch the page of `source` described by `args` under `spec`.
///
/// `scope` restricts the rows considered (e.g. to one parent's children).
/// When both `first` and `last` are given, `first` bounds the fetch and
/// `last` keeps only the tail of that window.
pub async fn slice<S>(
    source: &S,
    scope: Option<Filter>,
    spec: &OrderSpec,
    args: &PaginationArgs,
    limits: &PagingLimits,
) -> PagerResult<Slice<S::Row>>
where
    S: RowSource + ?Sized,
{
    limits.check(args.first)?;
    limits.check(args.last)?;

    let after = args
        .after
        .as_ref()
        .map(|c| cursor::decode(c, spec))
        .transpose()?;
    let before = args
        .before
        .as_ref()
        .map(|c| cursor::decode(c, spec))
        .transpose()?;

    let filter = Filter::conjoin([
        scope,
        seek_predicate(spec, after.as_deref(), SeekDirection::After),
        seek_predicate(spec, before.as_deref(), SeekDirection::Before),
    ]);

    let forward = match (args.first, args.last) {
        (Some(first), _) => Some(first),
        (None, Some(_)) => None,
        (None, None) => Some(limits.default_page_size),
    };

    match forward {
        Some(first) => {
            let query = SliceQuery {
                order: spec.clone(),
                direction: FetchDirection::Forward,
                filter,
                limit: Some(first.saturating_add(1)),
            };
            debug!(selector = spec.selector(), first, "Fetching forward slice");

            let mut rows = source.fetch(&query).await?;
            let has_next_page = rows.len() > to_len(first);
            rows.truncate(to_len(first));

            let mut has_previous_page = after.is_some() && !rows.is_empty();
            if let Some(last) = args.last.map(to_len) {
                if rows.len() > last {
                    rows.drain(..rows.len() - last);
                    has_previous_page = true;
                }
            }

            Ok(Slice {
                rows,
                has_next_page,
                has_previous_page,
            })
        }
        None => {
            let last = args.last.unwrap_or(limits.default_page_size);
            let query = SliceQuery {
                order: spec.clone(),
                direction: FetchDirection::Backward,
                filter,
                limit: Some(last.saturating_add(1)),
            };
            debug!(selector = spec.selector(), last, "Fetching backward slice");

            let mut rows = source.fetch(&query).await?;
            let has_previous_page = rows.len() > to_len(last);
            rows.truncate(to_len(last));
            rows.reverse();

            let has_next_page = before.is_some() && !rows.is_empty();

            Ok(Slice {
                rows,
                has_next_page,
                has_previous_page,
            })
        }
    }
}
