//! Path and query parsing shared by the resource modules.
//!
//! Raw strings are accepted so a malformed number yields our own 400 body
//! instead of the framework's rejection text.

use std::str::FromStr;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::error::ApiError;
use crate::shared::{Page, PageRequest};

/// Numeric resource id from the path.
pub fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ApiError::bad_request("invalid id"))
}

/// Blank or absent means "not given".
pub fn parse_optional<T: FromStr>(raw: Option<&str>, name: &str) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("invalid {}", name))),
    }
}

pub fn page_request(offset: Option<&str>, limit: Option<&str>) -> Result<PageRequest, ApiError> {
    let offset = parse_optional::<i64>(offset, "offset")?.unwrap_or(0);
    let limit = parse_optional::<i64>(limit, "limit")?.unwrap_or(0);
    Ok(PageRequest::clamped(offset, limit))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Items to skip (default 0)
    pub offset: Option<String>,
    /// Page size, 1..=100 (default 10)
    pub limit: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        page_request(self.offset.as_deref(), self.limit.as_deref())
    }
}

/// List envelope; `offset`/`limit` echo the effective window.
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl<T> PageResponse<T> {
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let has_more = page.has_more();
        let page = page.map(f);
        Self {
            data: page.data,
            total: page.total,
            offset: page.offset,
            limit: page.limit,
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("abc").unwrap_err().message, "invalid id");
        assert_eq!(parse_id("-1").unwrap_err().message, "invalid id");
    }

    #[test]
    fn pagination_defaults_and_errors() {
        assert_eq!(page_request(None, None).unwrap(), PageRequest::default());
        assert_eq!(page_request(Some(""), Some(" ")).unwrap(), PageRequest::default());
        assert_eq!(
            page_request(Some("-3"), Some("500")).unwrap(),
            PageRequest { offset: 0, limit: 100 }
        );
        assert_eq!(page_request(Some("x"), None).unwrap_err().message, "invalid offset");
        assert_eq!(page_request(None, Some("1.5")).unwrap_err().message, "invalid limit");
    }
}
