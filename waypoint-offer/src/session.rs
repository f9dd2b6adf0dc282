use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;
use waypoint_core::{LowFareSearchRequest, LowFareSearchResponse, OfferSource};
use waypoint_shared::currency::format_price;

use crate::filter::{filter_resolved, OfferSelection, OfferSort};
use crate::index::FlightIndex;
use crate::models::{Journey, Recommendation, ResolvedOffer};
use crate::ranges::{derive_ranges, OfferRanges};
use crate::OfferError;

/// The result set of one low-fare search. A new search builds a new session;
/// nothing carries over.
#[derive(Debug, Clone)]
pub struct OfferSearch {
    request: LowFareSearchRequest,
    response: LowFareSearchResponse,
    index: FlightIndex,
    recommendations: Vec<Recommendation>,
    ranges: OfferRanges,
}

impl OfferSearch {
    pub fn from_response(request: LowFareSearchRequest, response: LowFareSearchResponse) -> Self {
        let index = FlightIndex::from_response(&response);
        let recommendations: Vec<Recommendation> =
            response.recommendations.iter().map(Recommendation::from).collect();
        let ranges = derive_ranges(&recommendations, &index);

        Self {
            request,
            response,
            index,
            recommendations,
            ranges,
        }
    }

    /// Token issuance followed by the search itself.
    pub async fn run(source: &dyn OfferSource, request: LowFareSearchRequest) -> Result<Self, OfferError> {
        let token = source.issue_token().await.map_err(OfferError::Token)?;
        if token.access_token.is_blank() {
            return Err(OfferError::EmptyToken);
        }

        info!(
            "Searching fares {} -> {} on {}",
            request.origin, request.destination, request.departure_date
        );
        let response = source.low_fare_search(&token, &request).await?;
        let search = Self::from_response(request, response);
        info!(
            "Search returned {} recommendations, {} resolvable",
            search.recommendations.len(),
            search.index.resolve_all(&search.recommendations).len()
        );
        Ok(search)
    }

    pub fn request(&self) -> &LowFareSearchRequest {
        &self.request
    }

    /// The upstream payload the session was built from.
    pub fn response(&self) -> &LowFareSearchResponse {
        &self.response
    }

    pub fn index(&self) -> &FlightIndex {
        &self.index
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn ranges(&self) -> &OfferRanges {
        &self.ranges
    }

    pub fn default_selection(&self) -> OfferSelection {
        OfferSelection::from_ranges(&self.ranges)
    }

    /// Airline and fare-family choices present in the resolvable offers.
    pub fn facets(&self) -> OfferFacets {
        let mut airlines = BTreeMap::new();
        let mut cabins = BTreeMap::new();

        for offer in self.index.resolve_all(&self.recommendations) {
            for segment in offer.outbound.segments.iter().chain(offer.inbound.segments.iter()) {
                let code = segment.marketing_airline_id.clone();
                let name = self.index.airline_name(&code).unwrap_or(&code).to_string();
                airlines.insert(code, name);
            }
            if let Some(family) = offer.recommendation.primary_fare_family() {
                let name = self.index.fare_family_name(family).unwrap_or(family).to_string();
                cabins.insert(family.to_string(), name);
            }
        }

        OfferFacets {
            airlines: airlines.into_iter().map(|(code, name)| FacetOption { code, name }).collect(),
            cabins: cabins.into_iter().map(|(code, name)| FacetOption { code, name }).collect(),
        }
    }

    pub fn filter(&self, selection: &OfferSelection, sort: &OfferSort) -> Vec<OfferSummary> {
        filter_resolved(&self.recommendations, &self.index, selection, sort)
            .iter()
            .map(|offer| OfferSummary::build(offer, &self.index))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfferFacets {
    pub airlines: Vec<FacetOption>,
    pub cabins: Vec<FacetOption>,
}

/// Display-ready view of one route.
#[derive(Debug, Clone, Serialize)]
pub struct JourneySummary {
    pub route: String,
    pub airline: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub stops: usize,
    pub max_layover_minutes: u32,
    pub flight_numbers: Vec<String>,
}

impl JourneySummary {
    fn build(journey: &Journey<'_>, index: &FlightIndex) -> Self {
        let first = journey.first();
        let last = journey.last();
        Self {
            route: journey.route.to_string(),
            airline: index
                .airline_name(&first.marketing_airline_id)
                .unwrap_or(&first.marketing_airline_id)
                .to_string(),
            from: first.departure.airport.clone(),
            to: last.arrival.airport.clone(),
            departure: first.departure.time.format("%Y-%m-%d %H:%M").to_string(),
            arrival: last.arrival.time.format("%Y-%m-%d %H:%M").to_string(),
            duration: first.flight_duration.clone(),
            stops: journey.stops(),
            max_layover_minutes: journey.max_layover(),
            flight_numbers: journey
                .segments
                .iter()
                .filter_map(|s| s.flight_number.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferSummary {
    pub id: String,
    pub total: f64,
    pub currency: Option<String>,
    pub display_price: String,
    pub fare_family: Option<String>,
    pub ticketing_deadline: Option<String>,
    pub outbound: JourneySummary,
    pub inbound: JourneySummary,
}

impl OfferSummary {
    fn build(offer: &ResolvedOffer<'_>, index: &FlightIndex) -> Self {
        let rec = offer.recommendation;
        let currency = rec.currency.clone();
        Self {
            id: rec.id.clone(),
            total: rec.total,
            display_price: format_price(rec.total, currency.as_deref().unwrap_or("")),
            currency,
            fare_family: rec.primary_fare_family().map(str::to_string),
            ticketing_deadline: rec.ticketing_deadline.clone(),
            outbound: JourneySummary::build(&offer.outbound, index),
            inbound: JourneySummary::build(&offer.inbound, index),
        }
    }
}
