//! Offset pagination for list endpoints (`?page=&limit=`).

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Raw query-string arguments. Unparseable values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageArgs {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated page/limit with the derived SQL offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl PageArgs {
    pub fn validate(&self) -> Page {
        let page = parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Page { page, limit }
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n > 0)
}

/// Pagination block returned alongside list results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(page: Page, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page.limit - 1) / page.limit
        };
        Self {
            total,
            page: page.page,
            limit: page.limit,
            total_pages,
        }
    }
}
