pub mod row;
pub mod filter;
pub mod sort;
pub mod page;
pub mod view;
pub mod pipeline;

pub use row::Tabular;
pub use filter::{FacetFilter, FilterSpec, FilterValue};
pub use sort::{ColumnKind, SortDirection, SortSpec};
pub use page::{PageSpec, TablePage};
pub use view::ViewState;
pub use pipeline::{paginate, BaseOrder, TableConfig, TablePipeline};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    #[error("Page numbers start at 1, got {0}")]
    InvalidPage(usize),
}
