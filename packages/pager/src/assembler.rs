use crate::{
    connection::{Connection, Edge, PageInfo},
    cursor,
    error::PagerResult,
    order::OrderSpec,
    slicer::Slice,
    value::Fields,
};

/// Build the connection envelope for a fetched slice.
pub fn assemble<R: Fields>(slice: Slice<R>, spec: &OrderSpec) -> PagerResult<Connection<R>> {
    let edges = slice
        .rows
        .into_iter()
        .map(|node| {
            Ok(Edge {
                cursor: cursor::encode(&node, spec)?,
                node,
            })
        })
        .collect::<PagerResult<Vec<_>>>()?;

    let page_info = PageInfo {
        has_next_page: slice.has_next_page,
        has_previous_page: slice.has_previous_page,
        start_cursor: edges.first().map(|edge| edge.cursor.clone()),
        end_cursor: edges.last().map(|edge| edge.cursor.clone()),
    };

    Ok(Connection { edges, page_info })
}
