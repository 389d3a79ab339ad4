use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Page-number pagination: `page` is 1-based, `limit` is the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64, max_limit: u64) -> Self {
        let limit = match limit {
            Some(0) | None => default_limit,
            Some(limit) => limit.min(max_limit),
        };

        Self {
            page: page.unwrap_or(1).max(1),
            limit,
        }
    }

    /// Saturates, so an absurd page number lands past the end.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Requesting a page past the last one is a not-found, except for the
    /// first page which is always valid.
    pub fn check(&self, count: u64) -> crate::Result<()> {
        if self.page > 1 && self.offset() >= count {
            return Err(crate::Error::NotFound);
        }

        Ok(())
    }

    pub fn has_next(&self, count: u64) -> bool {
        self.page.saturating_mul(self.limit) < count
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
