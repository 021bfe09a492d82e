use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Raw pagination parameters as they arrive on the query string.
///
/// Fields stay as strings so a malformed value surfaces as a validation
/// failure with a problem body instead of a framework-level rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    InvalidPage(String),
    InvalidLimit(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::InvalidPage(raw) => write!(f, "page must be an integer >= 1, got '{}'", raw),
            PageError::InvalidLimit(raw) => {
                write!(f, "limit must be an integer between 1 and {}, got '{}'", MAX_LIMIT, raw)
            }
        }
    }
}

impl std::error::Error for PageError {}

impl PageQuery {
    /// Validate page >= 1 (default 1) and 1 <= limit <= 100 (default 10).
    pub fn validate(&self) -> Result<Page, PageError> {
        let page = match self.page.as_deref() {
            None => DEFAULT_PAGE,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| PageError::InvalidPage(raw.to_string()))?,
        };

        let limit = match self.limit.as_deref() {
            None => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=MAX_LIMIT).contains(l))
                .ok_or_else(|| PageError::InvalidLimit(raw.to_string()))?,
        };

        Ok(Page { page, limit })
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        ((self.page - 1) * self.limit) as i64
    }
}

/// Self/next/prev links for a paginated collection.
#[derive(Debug, Clone, Serialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl PageLinks {
    /// Build links from the total row count: next only while more rows
    /// remain past this page, prev only past page 1.
    pub fn build(base_url: &str, page: &Page, total: i64) -> Self {
        let link = |p: u32| format!("{}?page={}&limit={}", base_url, p, page.limit);

        let next = if page.offset() + (page.limit as i64) < total {
            Some(link(page.page + 1))
        } else {
            None
        };
        let prev = if page.page > 1 { Some(link(page.page - 1)) } else { None };

        Self {
            self_link: link(page.page),
            next,
            prev,
        }
    }

    /// Append extra query parameters (e.g. search filters) to every link.
    pub fn with_query(mut self, extra: &str) -> Self {
        if extra.is_empty() {
            return self;
        }
        self.self_link = format!("{}&{}", self.self_link, extra);
        self.next = self.next.map(|l| format!("{}&{}", l, extra));
        self.prev = self.prev.map(|l| format!("{}&{}", l, extra));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn defaults_apply_when_absent() {
        let page = query(None, None).validate().unwrap();
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(query(Some("0"), None).validate().is_err());
        assert!(query(Some("abc"), None).validate().is_err());
        assert!(query(None, Some("0")).validate().is_err());
        assert!(query(None, Some("101")).validate().is_err());
        assert!(query(None, Some("-5")).validate().is_err());
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let page = query(Some("3"), Some("25")).validate().unwrap();
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn link_matrix_for_25_rows_limit_10() {
        let p1 = Page { page: 1, limit: 10 };
        let links = PageLinks::build("http://host/api/stations", &p1, 25);
        assert_eq!(links.self_link, "http://host/api/stations?page=1&limit=10");
        assert_eq!(links.next.as_deref(), Some("http://host/api/stations?page=2&limit=10"));
        assert!(links.prev.is_none());

        let p3 = Page { page: 3, limit: 10 };
        let links = PageLinks::build("http://host/api/stations", &p3, 25);
        assert!(links.next.is_none());
        assert_eq!(links.prev.as_deref(), Some("http://host/api/stations?page=2&limit=10"));
    }

    #[test]
    fn exact_boundary_has_no_next() {
        let p2 = Page { page: 2, limit: 10 };
        let links = PageLinks::build("http://host/api/trips", &p2, 20);
        assert!(links.next.is_none());
        assert!(links.prev.is_some());
    }

    #[test]
    fn extra_query_is_appended_to_every_link() {
        let p2 = Page { page: 2, limit: 10 };
        let links = PageLinks::build("http://host/api/trips", &p2, 30)
            .with_query("origin=a&destination=b");
        assert!(links.self_link.ends_with("&origin=a&destination=b"));
        assert!(links.next.unwrap().ends_with("&origin=a&destination=b"));
        assert!(links.prev.unwrap().ends_with("&origin=a&destination=b"));
    }
}
