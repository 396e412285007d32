use serde::Deserialize;

use super::parse_int_prefix;

pub const DEFAULT_PAGE: &str = "1";
pub const DEFAULT_LIMIT: &str = "10";
pub const MAX_LIMIT: i64 = 100;

pub const ERR_PAGE: &str = "Page must be a positive number";
pub const ERR_LIMIT: &str = "Limit must be between 1 and 100";

/// `?page=&limit=` as raw strings; parsing happens in the validator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Outcome of pagination validation. The parsed numbers are kept even when
/// out of range; they are `None` only when the input was not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCheck {
    pub errors: Vec<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PaginationQuery {
    /// Build from raw query pairs. A key given more than once is ambiguous
    /// and reads as not a number.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let pick = |key: &str| {
            let mut values = pairs.iter().filter(|(k, _)| k == key).map(|(_, v)| v);
            match (values.next(), values.next()) {
                (Some(v), None) => Some(v.clone()),
                (Some(_), Some(_)) => Some(String::new()),
                (None, _) => None,
            }
        };

        Self {
            page: pick("page"),
            limit: pick("limit"),
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`; zero when there is nothing to show
    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + self.limit - 1) / self.limit
    }
}

impl PaginationCheck {
    pub fn into_request(self) -> Result<PageRequest, Vec<String>> {
        match (self.page, self.limit) {
            (Some(page), Some(limit)) if self.errors.is_empty() => Ok(PageRequest { page, limit }),
            _ => Err(self.errors),
        }
    }
}

pub fn validate_pagination(page: Option<&str>, limit: Option<&str>) -> PaginationCheck {
    let page = parse_int_prefix(page.unwrap_or(DEFAULT_PAGE));
    let limit = parse_int_prefix(limit.unwrap_or(DEFAULT_LIMIT));

    let mut errors = Vec::new();

    if page.map_or(true, |p| p < 1) {
        errors.push(ERR_PAGE.to_string());
    }

    if limit.map_or(true, |l| !(1..=MAX_LIMIT).contains(&l)) {
        errors.push(ERR_LIMIT.to_string());
    }

    PaginationCheck { errors, page, limit }
}
