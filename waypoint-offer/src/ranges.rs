use serde::{Deserialize, Serialize};

use crate::index::FlightIndex;
use crate::models::{Recommendation, ResolvedOffer};

/// Inclusive `[min, max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn point(value: T) -> Self {
        Self { min: value, max: value }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    fn widen(self, value: T) -> Self {
        Self {
            min: if value < self.min { value } else { self.min },
            max: if value > self.max { value } else { self.max },
        }
    }
}

/// Slider bounds for one result set. Times are minutes since midnight of the
/// first segment's departure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferRanges {
    pub price: Bounds<f64>,
    pub layover: Bounds<u32>,
    pub outbound_time: Bounds<u32>,
    pub inbound_time: Bounds<u32>,
}

impl OfferRanges {
    fn seed(offer: &ResolvedOffer<'_>) -> Self {
        Self {
            price: Bounds::point(sanitize(offer.price())),
            layover: Bounds::point(offer.max_layover()),
            outbound_time: Bounds::point(offer.outbound.departure_minute()),
            inbound_time: Bounds::point(offer.inbound.departure_minute()),
        }
    }

    fn widen(self, offer: &ResolvedOffer<'_>) -> Self {
        Self {
            price: self.price.widen(sanitize(offer.price())),
            layover: self.layover.widen(offer.max_layover()),
            outbound_time: self.outbound_time.widen(offer.outbound.departure_minute()),
            inbound_time: self.inbound_time.widen(offer.inbound.departure_minute()),
        }
    }
}

fn sanitize(price: f64) -> f64 {
    if price.is_finite() {
        price
    } else {
        0.0
    }
}

/// Global min/max of price, layover and departure times across every
/// resolvable recommendation. An empty (or fully unresolvable) set yields
/// all-zero bounds.
pub fn derive_ranges(recommendations: &[Recommendation], index: &FlightIndex) -> OfferRanges {
    index
        .resolve_all(recommendations)
        .iter()
        .fold(None, |acc: Option<OfferRanges>, offer| {
            Some(match acc {
                None => OfferRanges::seed(offer),
                Some(ranges) => ranges.widen(offer),
            })
        })
        .unwrap_or_default()
}
