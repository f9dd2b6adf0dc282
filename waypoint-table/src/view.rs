use serde::{Deserialize, Serialize};

use crate::filter::{FilterSpec, FilterValue};
use crate::page::PageSpec;
use crate::sort::SortSpec;
use crate::TableError;

/// Everything a table view needs to derive its visible rows.
///
/// Transitions return a new state. Any change to filters or sorting goes
/// back to page 1 so the user never lands on a page that no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub sort: SortSpec,
    #[serde(default)]
    pub page: PageSpec,
}

impl ViewState {
    pub fn new(filters: FilterSpec, sort: SortSpec, page: PageSpec) -> Self {
        Self { filters, sort, page }
    }

    fn first_page(mut self) -> Self {
        self.page.current_page = 1;
        self
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.filters.search = Some(search.into());
        next.first_page()
    }

    /// Unknown facet names leave the filters as they are.
    pub fn with_facet(&self, name: &str, value: impl Into<FilterValue>) -> Self {
        let mut next = self.clone();
        next.filters.set_facet(name, value);
        next.first_page()
    }

    pub fn with_sort(&self, sort: SortSpec) -> Self {
        let mut next = self.clone();
        next.sort = sort;
        next.first_page()
    }

    pub fn with_sort_toggled(&self, column: &str) -> Self {
        self.with_sort(self.sort.toggled(column))
    }

    pub fn with_page(&self, current_page: usize) -> Result<Self, TableError> {
        let mut next = self.clone();
        next.page = PageSpec::new(self.page.page_size, current_page)?;
        Ok(next)
    }

    pub fn with_page_size(&self, page_size: usize) -> Result<Self, TableError> {
        let mut next = self.clone();
        next.page = PageSpec::first(page_size)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page_three() -> ViewState {
        let filters = FilterSpec::new().with_facet("status", "status", "all");
        ViewState::new(filters, SortSpec::none(), PageSpec::new(10, 3).unwrap())
    }

    #[test]
    fn test_filter_and_sort_changes_reset_page() {
        let state = on_page_three();
        assert_eq!(state.with_search("gala").page.current_page, 1);
        assert_eq!(state.with_facet("status", "open").page.current_page, 1);
        assert_eq!(state.with_sort_toggled("name").page.current_page, 1);
        // the original is untouched
        assert_eq!(state.page.current_page, 3);
    }

    #[test]
    fn test_page_transitions() {
        let state = on_page_three();
        assert_eq!(state.with_page(2).unwrap().page.current_page, 2);
        assert_eq!(state.with_page(0), Err(TableError::InvalidPage(0)));

        let resized = state.with_page_size(25).unwrap();
        assert_eq!(resized.page, PageSpec::new(25, 1).unwrap());
    }
}
