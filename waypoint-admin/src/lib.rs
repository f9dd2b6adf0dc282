pub mod entities;
pub mod validation;
pub mod changes;
pub mod bulk;
pub mod cancel;
pub mod reconcile;
pub mod table;

pub use entities::{EntityKind, EntitySchema, Facet};
pub use validation::{validate_record, validate_updates, FieldError, ValidationErrors};
pub use changes::{diff_record, ChangeSet};
pub use bulk::{run_with_concurrency, BulkFailure, BulkReport};
pub use cancel::{CancellationToken, FetchSequence, FetchTicket};
pub use reconcile::{Reconciler, Speculation};
pub use table::EntityTable;

use waypoint_core::CoreError;
use waypoint_table::TableError;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unknown filter '{0}'")]
    UnknownFacet(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("The identity column '{0}' cannot be updated")]
    IdentityUpdate(String),

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Fetch was cancelled or superseded")]
    Cancelled,

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Remote(#[from] CoreError),
}
