pub mod models;
pub mod index;
pub mod ranges;
pub mod filter;
pub mod session;

pub use models::{FlightRef, Journey, Recommendation, ResolvedOffer, RouteRef, Segment, Stop};
pub use index::FlightIndex;
pub use ranges::{derive_ranges, Bounds, OfferRanges};
pub use filter::{filter_and_sort, OfferSelection, OfferSort, OfferSortKey};
pub use session::{OfferFacets, OfferSearch, OfferSummary};

use waypoint_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("Token issuance failed: {0}")]
    Token(CoreError),

    #[error("Upstream issued an empty access token")]
    EmptyToken,

    #[error("Low-fare search failed: {0}")]
    Search(#[from] CoreError),
}
