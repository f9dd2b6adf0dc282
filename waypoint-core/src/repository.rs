use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use waypoint_shared::Record;

use crate::CoreResult;

/// Where an entity collection lives on the backend and which field identifies
/// its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub collection: &'a str,
    pub id_field: &'a str,
}

impl<'a> Endpoint<'a> {
    pub const fn new(collection: &'a str, id_field: &'a str) -> Self {
        Self { collection, id_field }
    }

    /// `/<entity>`
    pub fn list_path(&self) -> String {
        format!("/{}", self.collection)
    }

    /// `/<entity>/<idField>/<id>`
    pub fn item_path(&self, id: &str) -> String {
        format!(
            "/{}/{}/{}",
            self.collection,
            self.id_field,
            urlencoding::encode(id)
        )
    }

    /// `/<entity>/<idField>/<id>/bulk`
    pub fn bulk_path(&self, id: &str) -> String {
        format!("{}/bulk", self.item_path(id))
    }
}

/// Body of a field update: `{ "column": ..., "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnUpdate {
    pub column: String,
    pub value: serde_json::Value,
}

impl ColumnUpdate {
    pub fn new(column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// REST access to one back-office entity collection.
#[async_trait]
pub trait EntityClient: Send + Sync {
    /// GET the whole collection.
    async fn list(&self, endpoint: Endpoint<'_>) -> CoreResult<Vec<Record>>;

    /// POST a new record. The caller has already assigned its id.
    async fn create(&self, endpoint: Endpoint<'_>, record: &Record) -> CoreResult<()>;

    /// PUT a single field.
    async fn update_field(
        &self,
        endpoint: Endpoint<'_>,
        id: &str,
        update: &ColumnUpdate,
    ) -> CoreResult<()>;

    /// PUT several fields in one request.
    async fn update_fields(
        &self,
        endpoint: Endpoint<'_>,
        id: &str,
        updates: &[ColumnUpdate],
    ) -> CoreResult<()>;

    async fn delete(&self, endpoint: Endpoint<'_>, id: &str) -> CoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let endpoint = Endpoint::new("bookings", "booking_id");
        assert_eq!(endpoint.list_path(), "/bookings");
        assert_eq!(endpoint.item_path("b-1"), "/bookings/booking_id/b-1");
        assert_eq!(endpoint.bulk_path("b-1"), "/bookings/booking_id/b-1/bulk");
    }

    #[test]
    fn test_item_path_escapes_id() {
        let endpoint = Endpoint::new("users", "user_id");
        assert_eq!(endpoint.item_path("a b/c"), "/users/user_id/a%20b%2Fc");
    }

    #[test]
    fn test_column_update_body() {
        let update = ColumnUpdate::new("status", "confirmed");
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({ "column": "status", "value": "confirmed" }));
    }
}
