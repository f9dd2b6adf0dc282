use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use waypoint_table::SortDirection;

use crate::index::FlightIndex;
use crate::models::{Recommendation, ResolvedOffer};
use crate::ranges::{Bounds, OfferRanges};

/// What the user picked in the filter panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferSelection {
    /// Marketing airline codes; empty means any.
    #[serde(default)]
    pub airlines: BTreeSet<String>,
    /// Fare family ids; empty means any.
    #[serde(default)]
    pub cabins: BTreeSet<String>,
    pub price: Bounds<f64>,
    /// Selected layover ceiling in minutes.
    pub max_layover: u32,
    /// Largest layover present in the result set. The ceiling only filters
    /// once it is pulled below this.
    pub layover_limit: u32,
    pub outbound_time: Bounds<u32>,
    pub inbound_time: Bounds<u32>,
}

impl OfferSelection {
    /// A selection spanning the full ranges, which every resolvable offer passes.
    pub fn from_ranges(ranges: &OfferRanges) -> Self {
        Self {
            airlines: BTreeSet::new(),
            cabins: BTreeSet::new(),
            price: ranges.price,
            max_layover: ranges.layover.max,
            layover_limit: ranges.layover.max,
            outbound_time: ranges.outbound_time,
            inbound_time: ranges.inbound_time,
        }
    }

    pub fn with_airlines<I, S>(mut self, airlines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.airlines = airlines.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cabins<I, S>(mut self, cabins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cabins = cabins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price(mut self, min: f64, max: f64) -> Self {
        self.price = Bounds::new(min, max);
        self
    }

    pub fn with_max_layover(mut self, minutes: u32) -> Self {
        self.max_layover = minutes;
        self
    }

    pub fn with_outbound_time(mut self, from: u32, to: u32) -> Self {
        self.outbound_time = Bounds::new(from, to);
        self
    }

    pub fn with_inbound_time(mut self, from: u32, to: u32) -> Self {
        self.inbound_time = Bounds::new(from, to);
        self
    }

    pub fn matches(&self, offer: &ResolvedOffer<'_>) -> bool {
        if !self.airlines.is_empty()
            && !offer.outbound.operated_by_any(&self.airlines)
            && !offer.inbound.operated_by_any(&self.airlines)
        {
            return false;
        }

        if !self.cabins.is_empty() {
            match offer.recommendation.primary_fare_family() {
                Some(family) if self.cabins.contains(family) => {}
                _ => return false,
            }
        }

        if !self.price.contains(offer.price()) {
            return false;
        }

        if self.max_layover < self.layover_limit && offer.max_layover() > self.max_layover {
            return false;
        }

        self.outbound_time.contains(offer.outbound.departure_minute())
            && self.inbound_time.contains(offer.inbound.departure_minute())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferSortKey {
    #[default]
    Price,
    /// Outbound first segment's `HH:MM` duration, compared as text, so
    /// `"9:45"` sorts after `"10:30"`.
    Duration,
    /// Outbound first segment's departure timestamp.
    Departure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSort {
    #[serde(default)]
    pub key: OfferSortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl OfferSort {
    pub fn new(key: OfferSortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Clicking the active key flips direction; another key starts ascending.
    pub fn toggled(&self, key: OfferSortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.reversed())
        } else {
            Self::new(key, SortDirection::Asc)
        }
    }

    fn compare(&self, a: &ResolvedOffer<'_>, b: &ResolvedOffer<'_>) -> Ordering {
        let ordering = match self.key {
            OfferSortKey::Price => a.price().total_cmp(&b.price()),
            OfferSortKey::Duration => a
                .outbound
                .first()
                .flight_duration
                .cmp(&b.outbound.first().flight_duration),
            OfferSortKey::Departure => a
                .outbound
                .first()
                .departure
                .time
                .cmp(&b.outbound.first().departure.time),
        };
        self.direction.apply(ordering)
    }
}

/// Resolved offers passing `selection`, stably ordered by `sort`.
pub fn filter_resolved<'a>(
    recommendations: &'a [Recommendation],
    index: &'a FlightIndex,
    selection: &OfferSelection,
    sort: &OfferSort,
) -> Vec<ResolvedOffer<'a>> {
    let mut offers: Vec<ResolvedOffer<'a>> = index
        .resolve_all(recommendations)
        .into_iter()
        .filter(|offer| selection.matches(offer))
        .collect();
    offers.sort_by(|a, b| sort.compare(a, b));
    offers
}

/// Same as [`filter_resolved`], returning the recommendations themselves.
pub fn filter_and_sort<'a>(
    recommendations: &'a [Recommendation],
    index: &'a FlightIndex,
    selection: &OfferSelection,
    sort: &OfferSort,
) -> Vec<&'a Recommendation> {
    filter_resolved(recommendations, index, selection, sort)
        .into_iter()
        .map(|offer| offer.recommendation)
        .collect()
}
