use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 100;
/// Largest offset the database drivers accept (they bind offsets as `i64`).
pub const MAX_SKIP: u64 = i64::MAX as u64;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
        }
    }

    /// Returns `(skip, limit)` with defaults applied and both values clamped.
    pub fn normalize(&self) -> (u64, u64) {
        let skip = self.skip.unwrap_or(0).min(MAX_SKIP);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (skip, limit)
    }
}

// Query structs keep the pagination fields inline: serde_urlencoded cannot
// deserialize numbers through `#[serde(flatten)]`.

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuItemQuery {
    /// Number of items to skip, default 0.
    pub skip: Option<u64>,
    /// Page size, default 100, at most 100.
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub available: Option<bool>,
}

impl MenuItemQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Number of orders to skip, default 0.
    pub skip: Option<u64>,
    /// Page size, default 100, at most 100.
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub table_number: Option<i32>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_hundred() {
        assert_eq!(Pagination::default().normalize(), (0, 100));
    }

    #[test]
    fn clamps_limit() {
        assert_eq!(Pagination::new(5, 0).normalize(), (5, 1));
        assert_eq!(Pagination::new(0, 10_000).normalize(), (0, MAX_LIMIT));
    }

    #[test]
    fn caps_skip_at_i64_max() {
        assert_eq!(Pagination::new(u64::MAX, 10).normalize(), (i64::MAX as u64, 10));
        assert_eq!(Pagination::new(MAX_SKIP, 10).normalize(), (MAX_SKIP, 10));
    }
}
