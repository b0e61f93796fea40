//! State to query: projection.

use crate::query::{
    ITEMS_PER_PAGE_KEY, PAGE_KEY, QueryMap, SORT_BY_KEY, SORT_ORDER_KEY, TAB_KEY,
    filter_query_key,
};
use crate::state::{PageParam, TableState};

/// Computes the query `state` proposes, starting from `current`.
///
/// Keys owned by other features are carried over untouched. `page` and
/// `itemsPerPage` are written when truthy but never removed, so a stale value
/// stays in the query when the state clears it.
pub(crate) fn project_to_query(state: &TableState, current: &QueryMap) -> QueryMap {
    let mut next = current.clone();

    for (key, value) in state.filters.iter() {
        let query_key = filter_query_key(key);
        match value.to_query_value() {
            Some(projected) => next.insert(query_key, projected),
            None => {
                next.remove(&query_key);
            }
        }
    }

    if let Some(sort) = state.sort_by.first() {
        next.insert(SORT_BY_KEY, sort.key.as_str());
        next.insert(SORT_ORDER_KEY, sort.order.as_str());
    } else {
        next.remove(SORT_BY_KEY);
        next.remove(SORT_ORDER_KEY);
    }

    if let Some(page) = truthy(state.pagination.page.as_ref()) {
        next.insert(PAGE_KEY, page.to_string());
    }
    if let Some(items_per_page) = truthy(state.pagination.items_per_page.as_ref()) {
        next.insert(ITEMS_PER_PAGE_KEY, items_per_page.to_string());
    }

    match state.active_tab.as_deref().filter(|tab| !tab.is_empty()) {
        Some(tab) => next.insert(TAB_KEY, tab),
        None => {
            next.remove(TAB_KEY);
        }
    }

    next
}

fn truthy(param: Option<&PageParam>) -> Option<&PageParam> {
    param.filter(|value| value.is_truthy())
}
