pub mod repository;
pub mod search;
pub mod lowfare;
pub mod supplier;

pub use repository::{ColumnUpdate, EntityClient, Endpoint};
pub use search::{AccessToken, LowFareSearchRequest};
pub use lowfare::LowFareSearchResponse;
pub use supplier::OfferSource;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Upstream returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },
    #[error("Malformed upstream payload: {0}")]
    DecodeError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
