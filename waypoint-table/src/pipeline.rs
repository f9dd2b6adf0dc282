use std::collections::HashSet;

use crate::filter::FilterSpec;
use crate::page::{PageSpec, TablePage};
use crate::row::Tabular;
use crate::sort::{sort_rows, ColumnKind, SortSpec};
use crate::view::ViewState;

/// Order of the filtered rows before any column sort applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseOrder {
    #[default]
    AsFetched,
    /// Most recent first, for collections the backend returns oldest first.
    Reversed,
}

/// Per-entity pipeline settings.
#[derive(Debug, Clone, Default)]
pub struct TableConfig {
    pub numeric_columns: HashSet<String>,
    pub base_order: BaseOrder,
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_base_order(mut self, base_order: BaseOrder) -> Self {
        self.base_order = base_order;
        self
    }

    pub fn column_kind(&self, column: &str) -> ColumnKind {
        if self.numeric_columns.contains(column) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}

/// Filter, order and slice an in-memory collection. The input is never
/// mutated; pages borrow from it.
#[derive(Debug, Clone, Default)]
pub struct TablePipeline {
    config: TableConfig,
}

impl TablePipeline {
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Filtered rows in display order (base order, then the column sort).
    pub fn arrange<'a, T: Tabular>(
        &self,
        records: &'a [T],
        filters: &FilterSpec,
        sort: &SortSpec,
    ) -> Vec<&'a T> {
        let mut rows = filters.apply(records);

        if self.config.base_order == BaseOrder::Reversed {
            rows.reverse();
        }

        if let Some(column) = sort.column.as_deref() {
            sort_rows(&mut rows, column, self.config.column_kind(column), sort.direction);
        }

        rows
    }

    pub fn paginate<'a, T: Tabular>(
        &self,
        records: &'a [T],
        filters: &FilterSpec,
        sort: &SortSpec,
        page: &PageSpec,
    ) -> TablePage<&'a T> {
        let rows = self.arrange(records, filters, sort);
        let total_count = rows.len();
        let range = page.range(total_count);

        TablePage {
            page_items: rows[range].to_vec(),
            total_count,
            total_pages: page.total_pages(total_count),
            current_page: page.current_page,
            page_size: page.page_size,
        }
    }

    pub fn run<'a, T: Tabular>(&self, records: &'a [T], view: &ViewState) -> TablePage<&'a T> {
        self.paginate(records, &view.filters, &view.sort, &view.page)
    }
}

/// Pipeline with every column compared as text and rows kept in fetch order.
pub fn paginate<'a, T: Tabular>(
    records: &'a [T],
    filters: &FilterSpec,
    sort: &SortSpec,
    page: &PageSpec,
) -> TablePage<&'a T> {
    TablePipeline::default().paginate(records, filters, sort, page)
}
