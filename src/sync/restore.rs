//! Query to state: restoration.

use crate::query::{
    ITEMS_PER_PAGE_KEY, PAGE_KEY, QueryMap, SORT_BY_KEY, SORT_ORDER_KEY, TAB_KEY,
    filter_query_key,
};
use crate::state::{FilterValue, PageParam, SortOrder, SortSpec, TableState};

/// Merges the query into `state`.
///
/// The query is authoritative only for keys it carries. A filter key is
/// restored whenever it is present, even with an empty value; the sort pair,
/// pagination and tab are restored only when non-empty. Nothing is cleared by
/// omission.
pub(crate) fn restore_from_query(state: &mut TableState, query: &QueryMap) {
    let restored: Vec<(String, FilterValue)> = state
        .filters
        .kinds()
        .filter_map(|(key, kind)| {
            query
                .get(&filter_query_key(key))
                .map(|value| (key.to_owned(), kind.coerce(value)))
        })
        .collect();
    for (key, value) in restored {
        state.filters.set(&key, value);
    }

    if let (Some(key), Some(order)) = (query.non_empty(SORT_BY_KEY), query.non_empty(SORT_ORDER_KEY))
    {
        state.sort_by = SortSpec::single(key, SortOrder::new(order));
    }

    if let Some(page) = query.non_empty(PAGE_KEY) {
        state.pagination.page = Some(PageParam::parse(page));
    }
    if let Some(items_per_page) = query.non_empty(ITEMS_PER_PAGE_KEY) {
        state.pagination.items_per_page = Some(PageParam::parse(items_per_page));
    }

    if let Some(tab) = query.non_empty(TAB_KEY) {
        state.active_tab = Some(tab.to_owned());
    }
}
