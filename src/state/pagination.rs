//! Pagination parameters.
//!
//! Page values arrive either from callers as numbers or from the query as
//! strings. Strings that are a canonical non-zero decimal number are stored
//! as numbers; anything else is kept verbatim so it is written back
//! unchanged. A query `page=0` therefore stays `Raw("0")`, which is truthy:
//! only a numeric zero set by the caller is dropped from the query.

use std::fmt;

/// A page or page-size value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageParam {
    /// A numeric value.
    Number(u64),
    /// A non-numeric value carried by the query.
    Raw(String),
}

impl PageParam {
    /// Parses a query value without ever failing.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(number) if number != 0 && number.to_string() == raw => Self::Number(number),
            _ => Self::Raw(raw.to_owned()),
        }
    }

    /// Whether the value is written to the query: zero and empty are not.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        match self {
            Self::Number(number) => *number != 0,
            Self::Raw(raw) => !raw.is_empty(),
        }
    }

    /// Returns the numeric value when there is one.
    #[must_use]
    pub const fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for PageParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<u64> for PageParam {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// Current page and page size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pagination {
    /// One-based page index.
    pub page: Option<PageParam>,
    /// Number of rows per page.
    pub items_per_page: Option<PageParam>,
}

impl Pagination {
    /// Creates pagination with both values set.
    #[must_use]
    pub const fn new(page: u64, items_per_page: u64) -> Self {
        Self {
            page: Some(PageParam::Number(page)),
            items_per_page: Some(PageParam::Number(items_per_page)),
        }
    }

    /// The numeric page, if set and numeric.
    #[must_use]
    pub fn page_number(&self) -> Option<u64> {
        self.page.as_ref().and_then(PageParam::as_number)
    }

    /// The numeric page size, if set and numeric.
    #[must_use]
    pub fn items_per_page_number(&self) -> Option<u64> {
        self.items_per_page.as_ref().and_then(PageParam::as_number)
    }
}
