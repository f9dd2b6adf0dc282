use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::TableError;

/// Which slice of the filtered collection to show.
///
/// Deserialization goes through `PageSpec::new`, so a zero page size or page
/// number is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageSpec")]
pub struct PageSpec {
    pub page_size: usize,
    pub current_page: usize,
}

impl PageSpec {
    pub fn new(page_size: usize, current_page: usize) -> Result<Self, TableError> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        if current_page == 0 {
            return Err(TableError::InvalidPage(current_page));
        }
        Ok(Self {
            page_size,
            current_page,
        })
    }

    /// Page 1 of the given size.
    pub fn first(page_size: usize) -> Result<Self, TableError> {
        Self::new(page_size, 1)
    }

    pub fn total_pages(&self, total_count: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total_count.div_ceil(self.page_size)
    }

    /// Index range of the current page, cut to `total_count`. Empty when the
    /// page lies beyond the data.
    pub fn range(&self, total_count: usize) -> Range<usize> {
        let start = self.current_page.saturating_sub(1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size);
        start.min(total_count)..end.min(total_count)
    }

    /// Bring `current_page` back into `[1, total_pages]`.
    pub fn clamped(&self, total_count: usize) -> Self {
        let last = self.total_pages(total_count).max(1);
        Self {
            page_size: self.page_size,
            current_page: self.current_page.clamp(1, last),
        }
    }
}

#[derive(Deserialize)]
struct RawPageSpec {
    page_size: usize,
    current_page: usize,
}

impl TryFrom<RawPageSpec> for PageSpec {
    type Error = TableError;

    fn try_from(raw: RawPageSpec) -> Result<Self, Self::Error> {
        Self::new(raw.page_size, raw.current_page)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page_size: 10,
            current_page: 1,
        }
    }
}

/// One rendered page plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<R> {
    pub page_items: Vec<R>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl<R> TablePage<R> {
    pub fn map<U>(self, f: impl FnMut(R) -> U) -> TablePage<U> {
        TablePage {
            page_items: self.page_items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}
