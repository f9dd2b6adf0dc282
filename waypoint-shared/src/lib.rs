pub mod models;
pub mod dates;
pub mod currency;
pub mod secret;

pub use models::record::{stringify, Record};
pub use secret::Masked;
