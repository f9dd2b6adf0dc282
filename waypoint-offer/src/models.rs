use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_core::lowfare::{FlightDto, FlightPointDto, RecommendationDto};

/// Key of a route in the search response's route dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteRef(String);

/// Key of a flight segment in the search response's flight dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightRef(String);

impl RouteRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FlightRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FlightRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Departure or arrival end of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub airport: String,
    pub time: NaiveDateTime,
    pub terminal: Option<String>,
}

impl Stop {
    /// Minutes since local midnight.
    pub fn minute_of_day(&self) -> u32 {
        self.time.hour() * 60 + self.time.minute()
    }
}

impl From<&FlightPointDto> for Stop {
    fn from(dto: &FlightPointDto) -> Self {
        Self {
            airport: dto.airport.clone(),
            time: dto.time,
            terminal: dto.terminal.clone(),
        }
    }
}

/// One flight leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub flight_ref: FlightRef,
    pub flight_number: Option<String>,
    pub departure: Stop,
    pub arrival: Stop,
    pub marketing_airline_id: String,
    pub operating_airline_id: Option<String>,
    /// `HH:MM` as sent by the provider.
    pub flight_duration: String,
    pub cabin_id: Option<String>,
}

impl Segment {
    pub fn from_dto(flight_ref: FlightRef, dto: &FlightDto) -> Self {
        Self {
            flight_ref,
            flight_number: dto.flight_number.clone(),
            departure: Stop::from(&dto.departure),
            arrival: Stop::from(&dto.arrival),
            marketing_airline_id: dto.marketing_airline_id.clone(),
            operating_airline_id: dto.operating_airline_id.clone(),
            flight_duration: dto.flight_duration.clone(),
            cabin_id: dto.cabin_id.clone(),
        }
    }

    /// Minutes between this segment's arrival and `next`'s departure. A
    /// next departure before this arrival counts as no wait.
    pub fn layover_until(&self, next: &Segment) -> u32 {
        let gap = (next.departure.time - self.arrival.time).num_minutes();
        gap.clamp(0, u32::MAX as i64) as u32
    }
}

/// A priced offer: an outbound and an inbound route plus amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub outbound: Option<RouteRef>,
    pub inbound: Option<RouteRef>,
    pub total: f64,
    pub fare: f64,
    pub tax: f64,
    pub fee: f64,
    pub currency: Option<String>,
    pub fare_family_ids: Vec<String>,
    pub ticketing_deadline: Option<String>,
}

impl Recommendation {
    /// The fare family the cabin facet filters on.
    pub fn primary_fare_family(&self) -> Option<&str> {
        self.fare_family_ids.first().map(String::as_str)
    }
}

impl From<&RecommendationDto> for Recommendation {
    fn from(dto: &RecommendationDto) -> Self {
        let mut routes = dto.route_ids.iter().map(RouteRef::new);
        Self {
            id: dto.id.clone(),
            outbound: routes.next(),
            inbound: routes.next(),
            total: dto.total,
            fare: dto.fare,
            tax: dto.tax,
            fee: dto.fee,
            currency: dto.currency.clone(),
            fare_family_ids: dto.fare_family_ids.clone(),
            ticketing_deadline: dto.ticketing_deadline.clone(),
        }
    }
}

/// A route with every segment resolved, in flying order.
#[derive(Debug, Clone)]
pub struct Journey<'a> {
    pub route: &'a RouteRef,
    pub segments: Vec<&'a Segment>,
}

impl<'a> Journey<'a> {
    /// Always present: journeys are only built from non-empty routes.
    pub fn first(&self) -> &'a Segment {
        self.segments[0]
    }

    pub fn last(&self) -> &'a Segment {
        self.segments[self.segments.len() - 1]
    }

    pub fn departure_minute(&self) -> u32 {
        self.first().departure.minute_of_day()
    }

    /// Longest wait between consecutive segments, 0 for a direct flight.
    pub fn max_layover(&self) -> u32 {
        self.segments
            .windows(2)
            .map(|pair| pair[0].layover_until(pair[1]))
            .max()
            .unwrap_or(0)
    }

    pub fn stops(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn operated_by_any(&self, airlines: &std::collections::BTreeSet<String>) -> bool {
        self.segments
            .iter()
            .any(|s| airlines.contains(&s.marketing_airline_id))
    }
}

/// A recommendation whose both routes resolved.
#[derive(Debug, Clone)]
pub struct ResolvedOffer<'a> {
    pub recommendation: &'a Recommendation,
    pub outbound: Journey<'a>,
    pub inbound: Journey<'a>,
}

impl<'a> ResolvedOffer<'a> {
    pub fn price(&self) -> f64 {
        self.recommendation.total
    }

    /// The longer of the two routes' maximum layovers.
    pub fn max_layover(&self) -> u32 {
        self.outbound.max_layover().max(self.inbound.max_layover())
    }
}
