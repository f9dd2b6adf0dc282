use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Low-fare search response
//
// Recommendations point at routes, routes list flight segments, and every
// segment lives once in the flat `Flights` dictionary.
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LowFareSearchResponse {
    #[serde(default)]
    pub recommendations: Vec<RecommendationDto>,
    #[serde(default)]
    pub routes: HashMap<String, RouteDto>,
    #[serde(default)]
    pub flights: HashMap<String, FlightDto>,
    #[serde(default)]
    pub airlines: HashMap<String, AirlineDto>,
    #[serde(default)]
    pub cabins: HashMap<String, CabinDto>,
    #[serde(default)]
    pub fare_families: HashMap<String, FareFamilyDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecommendationDto {
    pub id: String,
    /// Outbound first, inbound second.
    #[serde(default)]
    pub route_ids: Vec<String>,
    pub total: f64,
    #[serde(default)]
    pub fare: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub fee: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub fare_family_ids: Vec<String>,
    #[serde(default)]
    pub ticketing_deadline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteDto {
    pub flight_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlightDto {
    #[serde(default)]
    pub flight_number: Option<String>,
    pub departure: FlightPointDto,
    pub arrival: FlightPointDto,
    pub marketing_airline_id: String,
    #[serde(default)]
    pub operating_airline_id: Option<String>,
    /// `HH:MM`
    pub flight_duration: String,
    #[serde(default)]
    pub cabin_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlightPointDto {
    pub airport: String,
    pub time: NaiveDateTime,
    #[serde(default)]
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AirlineDto {
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CabinDto {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FareFamilyDto {
    pub name: String,
    #[serde(default)]
    pub cabin_id: Option<String>,
}
