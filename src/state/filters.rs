//! Filter template, filter values and per-kind coercion.
//!
//! The template captured at activation decides, for every filter key, how
//! its query counterpart is parsed back. Coercion is total: any query value
//! produces a typed [`FilterValue`] for every [`FilterKind`].

use indexmap::IndexMap;

use crate::query::QueryValue;

/// How a filter key's query value is interpreted on restoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// A free-form string.
    Scalar,
    /// `true` iff the query carries the literal `"true"`.
    Boolean,
    /// An ordered list of strings, written as repeated pairs.
    Sequence,
}

impl FilterKind {
    /// Coerces a query value into this kind.
    ///
    /// A scalar query value is wrapped for sequence filters. Boolean filters
    /// degrade to `false` for anything other than a single `"true"`. Scalar
    /// filters keep the first value when the query repeats the key.
    #[must_use]
    pub fn coerce(self, value: &QueryValue) -> FilterValue {
        match (self, value) {
            (Self::Sequence, QueryValue::Single(single)) => FilterValue::List(vec![single.clone()]),
            (Self::Sequence, QueryValue::Multiple(values)) => FilterValue::List(values.clone()),
            (Self::Boolean, QueryValue::Single(single)) => FilterValue::Flag(single == "true"),
            (Self::Boolean, QueryValue::Multiple(_)) => FilterValue::Flag(false),
            (Self::Scalar, _) => FilterValue::Text(value.first().unwrap_or_default().to_owned()),
        }
    }
}

/// The value held by a single filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    /// No value; never written to the query.
    #[default]
    Null,
    /// A boolean toggle.
    Flag(bool),
    /// A string value; omitted from the query when empty.
    Text(String),
    /// A list of values; omitted from the query when empty.
    List(Vec<String>),
}

impl FilterValue {
    /// The kind a template value of this shape declares.
    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::List(_) => FilterKind::Sequence,
            Self::Flag(_) => FilterKind::Boolean,
            Self::Null | Self::Text(_) => FilterKind::Scalar,
        }
    }

    /// Projects the value into its query form, or `None` when it is empty.
    #[must_use]
    pub fn to_query_value(&self) -> Option<QueryValue> {
        match self {
            Self::Null => None,
            Self::Flag(flag) => Some(QueryValue::Single(flag.to_string())),
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(QueryValue::Single(text.clone())),
            Self::List(values) if values.is_empty() => None,
            Self::List(values) => Some(QueryValue::Multiple(values.clone())),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(ToOwned::to_owned).collect())
    }
}

/// Caller-supplied initial filters whose value shapes fix each key's kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterTemplate {
    defaults: IndexMap<String, FilterValue>,
}

impl FilterTemplate {
    /// Creates an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a filter with its initial value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Returns the declared kind for a key.
    #[must_use]
    pub fn kind_of(&self, key: &str) -> Option<FilterKind> {
        self.defaults.get(key).map(FilterValue::kind)
    }

    /// Number of declared filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defaults.len()
    }

    /// Returns true when no filters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }

    /// Iterates declared keys with their initial values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.defaults.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for FilterTemplate
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |template, (key, value)| template.with(key, value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilterSlot {
    kind: FilterKind,
    value: FilterValue,
}

/// Live filter values whose key set is fixed by the template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    slots: IndexMap<String, FilterSlot>,
}

impl FilterState {
    /// Seeds the live state from a template.
    #[must_use]
    pub fn from_template(template: &FilterTemplate) -> Self {
        let slots = template
            .iter()
            .map(|(key, value)| {
                let slot = FilterSlot {
                    kind: value.kind(),
                    value: value.clone(),
                };
                (key.to_owned(), slot)
            })
            .collect();
        Self { slots }
    }

    /// Returns the current value of a filter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Returns the declared kind of a filter.
    #[must_use]
    pub fn kind(&self, key: &str) -> Option<FilterKind> {
        self.slots.get(key).map(|slot| slot.kind)
    }

    /// Replaces the value of a declared filter.
    ///
    /// Keys the template did not declare are ignored and `false` is returned.
    pub fn set(&mut self, key: &str, value: impl Into<FilterValue>) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            tracing::warn!("ignoring undeclared filter '{key}'");
            return false;
        };
        slot.value = value.into();
        true
    }

    /// Iterates filters in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.as_str(), &slot.value))
    }

    /// Iterates filter keys with their declared kinds.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, FilterKind)> {
        self.slots.iter().map(|(key, slot)| (key.as_str(), slot.kind))
    }
}
