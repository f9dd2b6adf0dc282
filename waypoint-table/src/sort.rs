use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::row::Tabular;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// How a column compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Case-insensitive lexicographic on the stringified value.
    Text,
    /// Numeric; null and non-numeric cells count as zero.
    Numeric,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: Some(column.into()),
            direction: SortDirection::Desc,
        }
    }

    /// Header-click behaviour: the same column flips direction, a new column
    /// starts ascending.
    pub fn toggled(&self, column: &str) -> Self {
        match &self.column {
            Some(current) if current == column => Self {
                column: Some(column.to_string()),
                direction: self.direction.reversed(),
            },
            _ => Self::asc(column),
        }
    }
}

pub fn compare_cells<T: Tabular>(a: &T, b: &T, column: &str, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Numeric => a.cell_number(column).total_cmp(&b.cell_number(column)),
        ColumnKind::Text => a
            .cell_text(column)
            .to_lowercase()
            .cmp(&b.cell_text(column).to_lowercase()),
    }
}

/// Stable in-place sort of borrowed rows.
pub fn sort_rows<T: Tabular>(rows: &mut [&T], column: &str, kind: ColumnKind, direction: SortDirection) {
    rows.sort_by(|a, b| direction.apply(compare_cells(*a, *b, column, kind)));
}
