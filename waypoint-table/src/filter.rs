use serde::{Deserialize, Serialize};

use crate::row::Tabular;

/// Value of one facet filter. `"all"` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterValue {
    #[default]
    All,
    Equals(String),
}

impl FilterValue {
    pub fn is_all(&self) -> bool {
        matches!(self, FilterValue::All)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            FilterValue::All
        } else {
            FilterValue::Equals(value)
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::from(value.to_string())
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::All => "all".to_string(),
            FilterValue::Equals(v) => v,
        }
    }
}

/// A named equality constraint on one field, e.g. filter `status` on field
/// `booking_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilter {
    pub name: String,
    pub field: String,
    #[serde(default)]
    pub value: FilterValue,
}

impl FacetFilter {
    pub fn matches<T: Tabular>(&self, row: &T) -> bool {
        match &self.value {
            FilterValue::All => true,
            FilterValue::Equals(expected) => {
                row.cell_text(&self.field).to_lowercase() == expected.to_lowercase()
            }
        }
    }
}

/// Free-text search plus any number of facet filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub facets: Vec<FacetFilter>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_facet(
        mut self,
        name: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        let name = name.into();
        let value = value.into();
        match self.facets.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                existing.field = field.into();
                existing.value = value;
            }
            None => self.facets.push(FacetFilter {
                name,
                field: field.into(),
                value,
            }),
        }
        self
    }

    /// Change the value of an already declared facet. Returns false for an
    /// unknown facet name.
    pub fn set_facet(&mut self, name: &str, value: impl Into<FilterValue>) -> bool {
        match self.facets.iter_mut().find(|f| f.name == name) {
            Some(facet) => {
                facet.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn facet(&self, name: &str) -> Option<&FacetFilter> {
        self.facets.iter().find(|f| f.name == name)
    }

    /// Lowercased search needle, `None` when the search box is empty.
    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// True if no filter constrains the collection.
    pub fn is_unconstrained(&self) -> bool {
        self.needle().is_none() && self.facets.iter().all(|f| f.value.is_all())
    }

    pub fn matches<T: Tabular>(&self, row: &T) -> bool {
        if let Some(needle) = self.needle() {
            if !row.any_cell_contains(&needle) {
                return false;
            }
        }
        self.facets.iter().all(|facet| facet.matches(row))
    }

    /// Rows passing every active filter, in input order.
    pub fn apply<'a, T: Tabular>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}
