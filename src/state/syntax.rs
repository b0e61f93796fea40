//! Text syntax for filter templates and filter assignments.
//!
//! Entries are comma separated:
//!
//! - `name=value` declares a scalar filter (`name` alone starts it empty)
//! - `name?=true` declares a boolean filter (`name?` starts it `false`)
//! - `name[]=a|b` declares a sequence filter (`name[]` starts it empty)
//!
//! Assignments use `name=value` and are interpreted with the kind the
//! template declared: sequence values split on `|`, boolean values are
//! `true` only for the literal `true`.

use super::filters::{FilterKind, FilterState, FilterTemplate, FilterValue};
use crate::error::QuerySyncError;

const SEQUENCE_SEPARATOR: char = '|';

/// Parses a filter template.
///
/// # Errors
///
/// Returns [`QuerySyncError::InvalidFilterSpec`] when an entry has no name.
pub fn parse_template(input: &str) -> Result<FilterTemplate, QuerySyncError> {
    let mut template = FilterTemplate::new();
    for entry in entries(input) {
        let (name, value) = parse_template_entry(entry)?;
        template = template.with(name, value);
    }
    Ok(template)
}

/// Parses filter assignments against the live filter state.
///
/// # Errors
///
/// Returns [`QuerySyncError::InvalidAssignment`] for entries without `=`
/// and [`QuerySyncError::UnknownFilter`] for keys the template does not
/// declare.
pub fn parse_assignments(
    input: &str,
    filters: &FilterState,
) -> Result<Vec<(String, FilterValue)>, QuerySyncError> {
    entries(input)
        .map(|entry| parse_assignment(entry, filters))
        .collect()
}

fn entries(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

fn parse_assignment(
    entry: &str,
    filters: &FilterState,
) -> Result<(String, FilterValue), QuerySyncError> {
    let (name, raw) = entry
        .split_once('=')
        .ok_or_else(|| QuerySyncError::InvalidAssignment {
            entry: entry.to_owned(),
        })?;
    let key = name.trim();
    let kind = filters
        .kind(key)
        .ok_or_else(|| QuerySyncError::UnknownFilter {
            key: key.to_owned(),
        })?;
    Ok((key.to_owned(), value_for_kind(kind, raw)))
}

fn parse_template_entry(entry: &str) -> Result<(&str, FilterValue), QuerySyncError> {
    let (head, raw) = match entry.split_once('=') {
        Some((head, raw)) => (head.trim(), Some(raw)),
        None => (entry, None),
    };

    let (name, value) = if let Some(name) = head.strip_suffix("[]") {
        (name, value_for_kind(FilterKind::Sequence, raw.unwrap_or_default()))
    } else if let Some(name) = head.strip_suffix('?') {
        (name, value_for_kind(FilterKind::Boolean, raw.unwrap_or_default()))
    } else {
        (head, raw.map_or(FilterValue::Null, FilterValue::from))
    };

    if name.is_empty() {
        return Err(QuerySyncError::InvalidFilterSpec {
            entry: entry.to_owned(),
        });
    }
    Ok((name, value))
}

fn value_for_kind(kind: FilterKind, raw: &str) -> FilterValue {
    match kind {
        FilterKind::Scalar => FilterValue::from(raw),
        FilterKind::Boolean => FilterValue::Flag(raw.trim() == "true"),
        FilterKind::Sequence => FilterValue::List(
            raw.split(SEQUENCE_SEPARATOR)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        ),
    }
}
