use std::collections::HashMap;
use tracing::debug;
use waypoint_core::LowFareSearchResponse;

use crate::models::{FlightRef, Journey, Recommendation, ResolvedOffer, RouteRef, Segment};

/// Lookup tables for one search result: routes to their segment refs, refs to
/// segments, plus display names for airlines and fare families.
#[derive(Debug, Clone, Default)]
pub struct FlightIndex {
    routes: HashMap<RouteRef, Vec<FlightRef>>,
    flights: HashMap<FlightRef, Segment>,
    airlines: HashMap<String, String>,
    fare_families: HashMap<String, String>,
}

impl FlightIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_response(response: &LowFareSearchResponse) -> Self {
        let routes = response
            .routes
            .iter()
            .map(|(id, route)| {
                let refs = route.flight_ids.iter().map(FlightRef::new).collect();
                (RouteRef::new(id.clone()), refs)
            })
            .collect();

        let flights = response
            .flights
            .iter()
            .map(|(id, dto)| {
                let flight_ref = FlightRef::new(id.clone());
                (flight_ref.clone(), Segment::from_dto(flight_ref, dto))
            })
            .collect();

        let airlines = response
            .airlines
            .iter()
            .map(|(code, a)| (code.clone(), a.name.clone()))
            .collect();

        let fare_families = response
            .fare_families
            .iter()
            .map(|(id, f)| (id.clone(), f.name.clone()))
            .collect();

        Self {
            routes,
            flights,
            airlines,
            fare_families,
        }
    }

    pub fn insert_route(&mut self, route: RouteRef, flights: Vec<FlightRef>) {
        self.routes.insert(route, flights);
    }

    pub fn insert_segment(&mut self, segment: Segment) {
        self.flights.insert(segment.flight_ref.clone(), segment);
    }

    pub fn insert_airline(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.airlines.insert(code.into(), name.into());
    }

    pub fn insert_fare_family(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.fare_families.insert(id.into(), name.into());
    }

    pub fn segment(&self, flight: &FlightRef) -> Option<&Segment> {
        self.flights.get(flight)
    }

    pub fn airline_name(&self, code: &str) -> Option<&str> {
        self.airlines.get(code).map(String::as_str)
    }

    pub fn fare_family_name(&self, id: &str) -> Option<&str> {
        self.fare_families.get(id).map(String::as_str)
    }

    /// Resolve a route into its segments. `None` if the route is unknown,
    /// empty, or any of its segments is missing.
    pub fn journey<'a>(&'a self, route: &'a RouteRef) -> Option<Journey<'a>> {
        let refs = self.routes.get(route)?;
        if refs.is_empty() {
            return None;
        }
        let segments = refs
            .iter()
            .map(|r| self.flights.get(r))
            .collect::<Option<Vec<_>>>()?;
        Some(Journey { route, segments })
    }

    /// Resolve both routes of a recommendation. Gaps in the data are not
    /// errors; the recommendation simply has nothing to show.
    pub fn resolve<'a>(&'a self, recommendation: &'a Recommendation) -> Option<ResolvedOffer<'a>> {
        let outbound = recommendation.outbound.as_ref().and_then(|r| self.journey(r));
        let inbound = recommendation.inbound.as_ref().and_then(|r| self.journey(r));

        match (outbound, inbound) {
            (Some(outbound), Some(inbound)) => Some(ResolvedOffer {
                recommendation,
                outbound,
                inbound,
            }),
            _ => {
                debug!("Skipping recommendation {}: unresolved route", recommendation.id);
                None
            }
        }
    }

    /// Every resolvable recommendation, in input order.
    pub fn resolve_all<'a>(&'a self, recommendations: &'a [Recommendation]) -> Vec<ResolvedOffer<'a>> {
        recommendations.iter().filter_map(|r| self.resolve(r)).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_three_segment_layover() {
        let (index, recs) = three_offers();
        let offer = index.resolve(&recs[1]).unwrap();
        assert_eq!(offer.outbound.segments.len(), 3);
        assert_eq!(offer.outbound.stops(), 2);
        assert_eq!(offer.outbound.max_layover(), 90);
        assert_eq!(offer.inbound.max_layover(), 0);
        assert_eq!(offer.max_layover(), 90);
    }

    #[test]
    fn test_departure_minute_uses_first_segment() {
        let (index, recs) = three_offers();
        let offer = index.resolve(&recs[1]).unwrap();
        assert_eq!(offer.outbound.departure_minute(), 6 * 60 + 30);
        assert_eq!(offer.inbound.departure_minute(), 21 * 60 + 15);
    }

    #[test]
    fn test_unresolvable_recommendations_are_skipped() {
        let (mut index, mut recs) = three_offers();
        recs.push(recommendation("R4", "G1R1", "G2R9", 100.0, "ECO"));
        index.insert_route(RouteRef::new("G1R5"), vec![FlightRef::new("F1"), FlightRef::new("F404")]);
        recs.push(recommendation("R5", "G1R5", "G2R1", 100.0, "ECO"));
        let mut one_way = recommendation("R6", "G1R1", "G2R1", 100.0, "ECO");
        one_way.inbound = None;
        recs.push(one_way);

        let resolved = index.resolve_all(&recs);
        let ids: Vec<&str> = resolved.iter().map(|o| o.recommendation.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2", "R3"]);
    }

    #[test]
    fn test_from_response() {
        let json = r#"
            {
                "Recommendations": [
                    { "Id": "R1", "RouteIds": ["G1R1", "G2R1"], "Total": 199.99, "FareFamilyIds": ["ECO"] }
                ],
                "Routes": {
                    "G1R1": { "FlightIds": ["F1"] },
                    "G2R1": { "FlightIds": ["F2"] }
                },
                "Flights": {
                    "F1": {
                        "Departure": { "Airport": "LHR", "Time": "2025-11-28T08:30:00" },
                        "Arrival": { "Airport": "CDG", "Time": "2025-11-28T10:45:00" },
                        "MarketingAirlineId": "BA",
                        "FlightDuration": "01:15"
                    },
                    "F2": {
                        "Departure": { "Airport": "CDG", "Time": "2025-12-01T17:00:00" },
                        "Arrival": { "Airport": "LHR", "Time": "2025-12-01T17:20:00" },
                        "MarketingAirlineId": "AF",
                        "FlightDuration": "01:20"
                    }
                },
                "Airlines": { "BA": { "Name": "British Airways" } },
                "FareFamilies": { "ECO": { "Name": "Economy Light" } }
            }
        "#;
        let response: LowFareSearchResponse = serde_json::from_str(json).unwrap();
        let index = FlightIndex::from_response(&response);
        let rec = Recommendation::from(&response.recommendations[0]);

        let offer = index.resolve(&rec).expect("both routes resolve");
        assert_eq!(offer.outbound.first().marketing_airline_id, "BA");
        assert_eq!(offer.inbound.departure_minute(), 17 * 60);
        assert_eq!(index.airline_name("BA"), Some("British Airways"));
        assert_eq!(index.fare_family_name("ECO"), Some("Economy Light"));
    }
}
