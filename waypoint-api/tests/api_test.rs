use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use waypoint_api::{app, AppState, TableSettings};
use waypoint_core::{
    AccessToken, ColumnUpdate, CoreError, CoreResult, EntityClient, Endpoint, LowFareSearchRequest,
    LowFareSearchResponse, OfferSource,
};
use waypoint_shared::Record;

// ============================================================================
// In-memory collaborators
// ============================================================================

#[derive(Default)]
struct MemoryBackend {
    rows: Mutex<Vec<Record>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryBackend {
    fn seeded(rows: Vec<Record>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn patch(&self, endpoint: Endpoint<'_>, id: &str, updates: &[ColumnUpdate]) -> CoreResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id(endpoint.id_field).as_deref() == Some(id))
            .ok_or_else(|| CoreError::RemoteStatus { status: 404, body: id.to_string() })?;
        for u in updates {
            row.insert(u.column.clone(), u.value.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl EntityClient for MemoryBackend {
    async fn list(&self, endpoint: Endpoint<'_>) -> CoreResult<Vec<Record>> {
        self.log(format!("GET {}", endpoint.list_path()));
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn create(&self, endpoint: Endpoint<'_>, record: &Record) -> CoreResult<()> {
        self.log(format!("POST {}", endpoint.list_path()));
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn update_field(&self, endpoint: Endpoint<'_>, id: &str, update: &ColumnUpdate) -> CoreResult<()> {
        self.log(format!("PUT {}", endpoint.item_path(id)));
        self.patch(endpoint, id, std::slice::from_ref(update))
    }

    async fn update_fields(&self, endpoint: Endpoint<'_>, id: &str, updates: &[ColumnUpdate]) -> CoreResult<()> {
        self.log(format!("PUT {}", endpoint.bulk_path(id)));
        self.patch(endpoint, id, updates)
    }

    async fn delete(&self, endpoint: Endpoint<'_>, id: &str) -> CoreResult<()> {
        self.log(format!("DELETE {}", endpoint.item_path(id)));
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id(endpoint.id_field).as_deref() != Some(id));
        if rows.len() == before {
            return Err(CoreError::RemoteStatus { status: 404, body: id.to_string() });
        }
        Ok(())
    }
}

struct FixedOffers;

fn flight(airline: &str, dep: &str, arr: &str, duration: &str) -> Value {
    json!({
        "Departure": { "Airport": "LHR", "Time": dep },
        "Arrival": { "Airport": "DXB", "Time": arr },
        "MarketingAirlineId": airline,
        "FlightDuration": duration
    })
}

fn low_fare_payload() -> Value {
    json!({
        "Recommendations": [
            { "Id": "R1", "RouteIds": ["G1R1", "G2R1"], "Total": 300.0, "Currency": "USD", "FareFamilyIds": ["ECO"] },
            { "Id": "R2", "RouteIds": ["G1R2", "G2R2"], "Total": 550.0, "Currency": "USD", "FareFamilyIds": ["BUS"] },
            { "Id": "R3", "RouteIds": ["G1R3", "G2R3"], "Total": 420.0, "Currency": "USD", "FareFamilyIds": ["ECO"] }
        ],
        "Routes": {
            "G1R1": { "FlightIds": ["F1"] }, "G2R1": { "FlightIds": ["F2"] },
            "G1R2": { "FlightIds": ["F3"] }, "G2R2": { "FlightIds": ["F4"] },
            "G1R3": { "FlightIds": ["F5"] }, "G2R3": { "FlightIds": ["F6"] }
        },
        "Flights": {
            "F1": flight("BA", "2025-11-28T08:00:00", "2025-11-28T18:00:00", "07:00"),
            "F2": flight("LH", "2025-12-02T18:00:00", "2025-12-02T23:00:00", "08:00"),
            "F3": flight("LH", "2025-11-28T06:30:00", "2025-11-28T16:00:00", "06:30"),
            "F4": flight("AF", "2025-12-02T21:15:00", "2025-12-03T05:00:00", "07:45"),
            "F5": flight("AF", "2025-11-28T13:45:00", "2025-11-28T23:30:00", "9:45"),
            "F6": flight("AF", "2025-12-02T07:05:00", "2025-12-02T12:00:00", "07:55")
        },
        "Airlines": { "BA": { "Name": "British Airways" } },
        "FareFamilies": { "ECO": { "Name": "Economy" }, "BUS": { "Name": "Business" } }
    })
}

#[async_trait]
impl OfferSource for FixedOffers {
    async fn issue_token(&self) -> CoreResult<AccessToken> {
        Ok(AccessToken::bearer("test-token"))
    }

    async fn low_fare_search(
        &self,
        _token: &AccessToken,
        _request: &LowFareSearchRequest,
    ) -> CoreResult<LowFareSearchResponse> {
        serde_json::from_value(low_fare_payload()).map_err(|e| CoreError::DecodeError(e.to_string()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn router(backend: Arc<MemoryBackend>) -> Router {
    app(AppState {
        entities: backend,
        offers: Arc::new(FixedOffers),
        tables: TableSettings::default(),
    })
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn user(i: usize, role: &str) -> Record {
    Record::new()
        .with("user_id", format!("u{:02}", i))
        .with("email", format!("user{:02}@example.com", i))
        .with("first_name", format!("Name{:02}", 22 - i))
        .with("last_name", "Tester")
        .with("role", role)
}

fn booking(id: &str) -> Record {
    Record::new()
        .with("booking_id", id)
        .with("booking_ref", format!("REF-{}", id))
        .with("event_name", "Abu Dhabi Grand Prix")
        .with("booker_name", "Sam Lee")
        .with("booker_email", "sam@example.com")
        .with("status", "pending")
        .with("booking_date", "6-May-2025")
}

fn names(body: &Value, field: &str) -> Vec<String> {
    body["page_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r[field].as_str().unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// Tables
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(router(MemoryBackend::seeded(vec![])), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_list_pages_sorted_rows() {
    let rows: Vec<Record> = (0..23).map(|i| user(i, "agent")).collect();
    let backend = MemoryBackend::seeded(rows);

    let (status, body) = send(
        router(backend.clone()),
        "GET",
        "/v1/tables/users?status=all&sort=first_name&direction=asc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 23);
    assert_eq!(body["total_pages"], 3);
    let first = names(&body, "first_name");
    assert_eq!(first.len(), 10);
    assert_eq!(first[0], "Name00");
    assert!(first.windows(2).all(|w| w[0] <= w[1]));

    let (_, last) = send(
        router(backend),
        "GET",
        "/v1/tables/users?sort=first_name&page=3",
        None,
    )
    .await;
    assert_eq!(names(&last, "first_name"), vec!["Name20", "Name21", "Name22"]);
}

#[tokio::test]
async fn test_search_and_facet_combine() {
    let backend = MemoryBackend::seeded(vec![
        user(1, "admin").with("last_name", "Alpha"),
        user(2, "agent").with("last_name", "Beta"),
        user(3, "agent").with("last_name", "Alpha"),
    ]);

    let (_, body) = send(router(backend), "GET", "/v1/tables/users?search=alpha&role=Agent", None).await;
    assert_eq!(names(&body, "user_id"), vec!["u03"]);
}

#[tokio::test]
async fn test_unknown_entity_and_facet() {
    let backend = MemoryBackend::seeded(vec![]);
    let (status, body) = send(router(backend.clone()), "GET", "/v1/tables/flights", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("flights"));

    let (status, _) = send(router(backend), "GET", "/v1/tables/users?colour=red", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bookings_newest_first() {
    let backend = MemoryBackend::seeded(vec![booking("b1"), booking("b2"), booking("b3")]);
    let (_, body) = send(router(backend), "GET", "/v1/tables/bookings", None).await;
    assert_eq!(names(&body, "booking_id"), vec!["b3", "b2", "b1"]);
}

#[tokio::test]
async fn test_create_then_patch_then_delete() {
    let backend = MemoryBackend::seeded(vec![]);

    let draft = json!({
        "booking_ref": "REF-9",
        "event_name": "Monaco Grand Prix",
        "booker_name": "Ari Cole",
        "booker_email": "ari@example.com",
        "booking_date": "2025-05-24"
    });
    let (status, created) = send(router(backend.clone()), "POST", "/v1/tables/bookings", Some(draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["booking_date"], "24-May-2025");
    let id = created["booking_id"].as_str().unwrap().to_string();

    let (status, patched) = send(
        router(backend.clone()),
        "PATCH",
        &format!("/v1/tables/bookings/{}", id),
        Some(json!({ "status": "paid", "booking_date": "24-May-2025" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["updated"], json!([{ "column": "status", "value": "paid" }]));

    let (status, _) = send(router(backend.clone()), "DELETE", &format!("/v1/tables/bookings/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let calls = backend.calls();
    assert!(calls.contains(&"POST /bookings".to_string()));
    assert!(calls.contains(&format!("PUT /bookings/booking_id/{}", id)));
    assert!(calls.contains(&format!("DELETE /bookings/booking_id/{}", id)));
    assert!(backend.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_validation_error() {
    let backend = MemoryBackend::seeded(vec![]);
    let (status, body) = send(
        router(backend.clone()),
        "POST",
        "/v1/tables/users",
        Some(json!({ "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"first_name"));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_bulk_delete_partial_failure() {
    let backend = MemoryBackend::seeded(vec![booking("b1"), booking("b2")]);
    let (status, report) = send(
        router(backend.clone()),
        "POST",
        "/v1/tables/bookings/bulk-delete",
        Some(json!({ "ids": ["b1", "missing", "b2"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["succeeded"], json!(["b1", "b2"]));
    assert_eq!(report["failed"][0]["id"], "missing");
    assert!(backend.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_update() {
    let backend = MemoryBackend::seeded(vec![booking("b1"), booking("b2")]);
    let (status, report) = send(
        router(backend.clone()),
        "POST",
        "/v1/tables/bookings/bulk-update",
        Some(json!({
            "ids": ["b1", "b2"],
            "updates": [{ "column": "status", "value": "cancelled" }, { "column": "notes", "value": "weather" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["failed"], json!([]));
    assert!(backend.calls().contains(&"PUT /bookings/booking_id/b1/bulk".to_string()));

    let (status, _) = send(
        router(backend),
        "POST",
        "/v1/tables/bookings/bulk-update",
        Some(json!({ "ids": ["b1"], "updates": [{ "column": "booking_id", "value": "x" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_update_validation_error() {
    let backend = MemoryBackend::seeded(vec![booking("b1")]);
    let (status, body) = send(
        router(backend.clone()),
        "POST",
        "/v1/tables/bookings/bulk-update",
        Some(json!({
            "ids": ["b1"],
            "updates": [{ "column": "total_cost", "value": "lots" }, { "column": "booker_email", "value": "" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"total_cost"));
    assert!(fields.contains(&"booker_email"));
    assert!(backend.calls().is_empty());
}

// ============================================================================
// Offers
// ============================================================================

fn search_body(extra: Value) -> Value {
    let mut body = json!({
        "query": { "Origin": "LHR", "Destination": "DXB", "DepartureDate": "2025-11-28", "ReturnDate": "2025-12-02" }
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    body
}

fn offer_ids(body: &Value) -> Vec<String> {
    body["offers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_offer_search_defaults() {
    let (status, body) = send(
        router(MemoryBackend::seeded(vec![])),
        "POST",
        "/v1/offers/search",
        Some(search_body(json!({}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ranges"]["price"], json!({ "min": 300.0, "max": 550.0 }));
    assert_eq!(offer_ids(&body), vec!["R1", "R3", "R2"]);
    assert_eq!(body["offers"][0]["display_price"], "$300.00");
    assert!(body["result"]["Recommendations"].is_array());
}

#[tokio::test]
async fn test_offer_filter_by_airline() {
    let (_, searched) = send(
        router(MemoryBackend::seeded(vec![])),
        "POST",
        "/v1/offers/search",
        Some(search_body(json!({}))),
    )
    .await;

    let mut selection = searched["selection"].clone();
    selection["airlines"] = json!(["BA"]);

    let (status, body) = send(
        router(MemoryBackend::seeded(vec![])),
        "POST",
        "/v1/offers/filter",
        Some(search_body(json!({
            "result": searched["result"].clone(),
            "selection": selection,
            "sort": { "key": "price", "direction": "desc" }
        }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(offer_ids(&body), vec!["R1"]);
    assert!(body.get("result").is_none());
}
