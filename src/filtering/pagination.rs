use crate::config::QueryConfig;

/// Largest offset or limit a database driver binds; drivers take signed 64-bit.
pub const MAX_WINDOW: u64 = i64::MAX.unsigned_abs();

/// A bounded read window: skip `offset` rows, return at most `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Map a 1-based page and a page size to an offset/limit pair.
    ///
    /// An absent or zero page is page 1. An absent page size takes the
    /// configured default; any size is clamped into `1..=max_page_size`.
    /// Offsets past [`MAX_WINDOW`] stop there, which reads as an empty page.
    #[must_use]
    pub fn from_page(page: Option<u64>, page_size: Option<u64>, config: &QueryConfig) -> Self {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let max = config.max_page_size.clamp(1, MAX_WINDOW);
        let limit = page_size.unwrap_or(config.default_page_size).clamp(1, max);
        Self {
            offset: (page - 1).saturating_mul(limit).min(MAX_WINDOW),
            limit,
        }
    }

    #[must_use]
    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_pages(total_count, self.limit)
    }
}

/// `ceil(total_count / limit)`; zero rows is zero pages.
#[must_use]
pub fn total_pages(total_count: u64, limit: u64) -> u64 {
    total_count.div_ceil(limit.max(1))
}
