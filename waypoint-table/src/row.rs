use waypoint_shared::{stringify, Record};

/// Row types the table pipeline can filter and sort.
pub trait Tabular {
    /// Stringified cell, `""` when absent or null.
    fn cell_text(&self, field: &str) -> String;

    /// Numeric cell, `0.0` when absent, null or non-numeric.
    fn cell_number(&self, field: &str) -> f64;

    /// True if any cell contains `needle`, compared case-insensitively.
    /// `needle` is already lowercase.
    fn any_cell_contains(&self, needle: &str) -> bool;
}

impl Tabular for Record {
    fn cell_text(&self, field: &str) -> String {
        self.text(field)
    }

    fn cell_number(&self, field: &str) -> f64 {
        self.number(field)
    }

    fn any_cell_contains(&self, needle: &str) -> bool {
        self.values()
            .any(|value| stringify(value).to_lowercase().contains(needle))
    }
}
