use async_trait::async_trait;

use crate::lowfare::LowFareSearchResponse;
use crate::search::{AccessToken, LowFareSearchRequest};
use crate::CoreResult;

/// Upstream flight-offer provider.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Obtain a bearer token for subsequent searches.
    async fn issue_token(&self) -> CoreResult<AccessToken>;

    /// Run a low-fare search and return the raw recommendation graph.
    async fn low_fare_search(
        &self,
        token: &AccessToken,
        request: &LowFareSearchRequest,
    ) -> CoreResult<LowFareSearchResponse>;
}
