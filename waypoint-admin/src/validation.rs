use serde::Serialize;
use serde_json::Value;
use std::fmt;
use waypoint_core::ColumnUpdate;
use waypoint_shared::{dates, Record};

use crate::entities::EntitySchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Per-field problems found before a write is issued.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First message recorded for `field`.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed ({})", parts.join("; "))
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

fn check_formats(schema: &EntitySchema, record: &Record, errors: &mut ValidationErrors) {
    for field in schema.date_columns {
        let text = record.text(field);
        if !text.trim().is_empty() && dates::parse_any(&text).is_err() {
            errors.push(*field, "must be a date like 06-May-2025");
        }
    }

    for field in schema.numeric_columns {
        match record.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.trim().is_empty() => {}
            Some(value) if is_numeric(value) => {}
            Some(_) => errors.push(*field, "must be a number"),
        }
    }
}

/// Required fields must be non-blank. Date and numeric columns are checked
/// only when a value is present.
pub fn validate_record(schema: &EntitySchema, record: &Record) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for field in schema.required_fields {
        if record.text(field).trim().is_empty() {
            errors.push(*field, "is required");
        }
    }
    check_formats(schema, record, &mut errors);

    errors.into_result()
}

/// Same rules as `validate_record`, restricted to the columns being set.
pub fn validate_updates(schema: &EntitySchema, updates: &[ColumnUpdate]) -> Result<(), ValidationErrors> {
    let record = updates
        .iter()
        .fold(Record::new(), |record, u| record.with(u.column.clone(), u.value.clone()));
    let mut errors = ValidationErrors::new();

    for field in schema.required_fields.iter().filter(|f| record.contains(f)) {
        if record.text(field).trim().is_empty() {
            errors.push(*field, "is required");
        }
    }
    check_formats(schema, &record, &mut errors);

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityKind;
    use serde_json::json;

    fn hotel() -> Record {
        Record::new()
            .with("hotel_id", "h-1")
            .with("hotel_name", "Yas Hotel")
            .with("city", "Abu Dhabi")
            .with("star_rating", 5)
    }

    #[test]
    fn test_valid_record() {
        assert!(validate_record(EntityKind::Hotels.schema(), &hotel()).is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let record = hotel().with("city", "  ");
        let errors = validate_record(EntityKind::Hotels.schema(), &record).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.for_field("city"), Some("is required"));
    }

    #[test]
    fn test_numeric_columns() {
        let schema = EntityKind::Hotels.schema();
        assert!(validate_record(schema, &hotel().with("room_count", "120")).is_ok());
        assert!(validate_record(schema, &hotel().with("room_count", json!(null))).is_ok());

        let errors = validate_record(schema, &hotel().with("star_rating", "five")).unwrap_err();
        assert_eq!(errors.for_field("star_rating"), Some("must be a number"));
    }

    #[test]
    fn test_date_columns_accept_both_representations() {
        let schema = EntityKind::Events.schema();
        let event = Record::new()
            .with("event_name", "Abu Dhabi Grand Prix")
            .with("sport", "F1")
            .with("event_start_date", "5-Dec-2025")
            .with("event_end_date", "2025-12-07");
        assert!(validate_record(schema, &event).is_ok());

        let errors = validate_record(schema, &event.with("event_end_date", "next week")).unwrap_err();
        assert!(errors.for_field("event_end_date").is_some());
        assert!(errors.to_string().contains("event_end_date"));
    }

    #[test]
    fn test_updates_check_only_the_columns_set() {
        let schema = EntityKind::Bookings.schema();
        assert!(validate_updates(schema, &[ColumnUpdate::new("status", "cancelled")]).is_ok());
        assert!(validate_updates(schema, &[ColumnUpdate::new("event_date", "2025-12-05")]).is_ok());

        let errors = validate_updates(
            schema,
            &[
                ColumnUpdate::new("total_cost", "lots"),
                ColumnUpdate::new("booker_email", " "),
                ColumnUpdate::new("booking_date", "someday"),
            ],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.for_field("booker_email"), Some("is required"));
        assert_eq!(errors.for_field("total_cost"), Some("must be a number"));
        assert!(errors.for_field("booking_date").is_some());
    }
}
