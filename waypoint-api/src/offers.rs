use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use waypoint_core::{LowFareSearchRequest, LowFareSearchResponse};
use waypoint_offer::{OfferFacets, OfferRanges, OfferSearch, OfferSelection, OfferSort, OfferSummary};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchOffersRequest {
    pub query: LowFareSearchRequest,
    #[serde(default)]
    pub selection: Option<OfferSelection>,
    #[serde(default)]
    pub sort: OfferSort,
}

/// Re-filter a result set returned by an earlier search without calling the
/// provider again.
#[derive(Debug, Deserialize)]
pub struct FilterOffersRequest {
    pub query: LowFareSearchRequest,
    pub result: LowFareSearchResponse,
    #[serde(default)]
    pub selection: Option<OfferSelection>,
    #[serde(default)]
    pub sort: OfferSort,
}

#[derive(Debug, Serialize)]
pub struct OffersResponse {
    pub ranges: OfferRanges,
    pub facets: OfferFacets,
    pub selection: OfferSelection,
    pub sort: OfferSort,
    pub total: usize,
    pub offers: Vec<OfferSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<LowFareSearchResponse>,
}

impl OffersResponse {
    fn build(search: &OfferSearch, selection: Option<OfferSelection>, sort: OfferSort) -> Self {
        // The layover ceiling only binds below the derived maximum of this
        // result set, whatever the client echoed back.
        let selection = match selection {
            Some(mut selection) => {
                selection.layover_limit = search.ranges().layover.max;
                selection
            }
            None => search.default_selection(),
        };
        let offers = search.filter(&selection, &sort);

        Self {
            ranges: *search.ranges(),
            facets: search.facets(),
            total: offers.len(),
            selection,
            sort,
            offers,
            result: None,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/offers/search", post(search_offers))
        .route("/v1/offers/filter", post(filter_offers))
}

/// POST /v1/offers/search
pub async fn search_offers(
    State(state): State<AppState>,
    Json(req): Json<SearchOffersRequest>,
) -> Result<Json<OffersResponse>, AppError> {
    let search = OfferSearch::run(state.offers.as_ref(), req.query).await?;
    let mut response = OffersResponse::build(&search, req.selection, req.sort);
    info!("Returning {} of {} offers", response.total, search.recommendations().len());
    response.result = Some(search.response().clone());
    Ok(Json(response))
}

/// POST /v1/offers/filter
pub async fn filter_offers(Json(req): Json<FilterOffersRequest>) -> Result<Json<OffersResponse>, AppError> {
    let search = OfferSearch::from_response(req.query, req.result);
    Ok(Json(OffersResponse::build(&search, req.selection, req.sort)))
}
