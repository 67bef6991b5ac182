//! Offset pagination for list endpoints.

use crate::config::CommunityConfig;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Page size when the client sends no `limit`, unless configured otherwise.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page a client may ask for, unless configured otherwise.
pub const MAX_LIMIT: i64 = 100;

/// `?offset=&limit=` query parameters. Out-of-range values are clamped rather than rejected.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    /// Rows to skip; negative values count as 0
    #[param(default = 0, minimum = 0)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub offset: Option<i64>,

    /// Page size, clamped to 1..=100
    #[param(default = 10, minimum = 1, maximum = 100)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub limit: Option<i64>,
}

impl Pagination {
    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Limit using the deployment's configured page sizes.
    pub fn limit_for(&self, config: &CommunityConfig) -> i64 {
        self.limit.unwrap_or(config.default_page_size).clamp(1, config.max_page_size)
    }
}
