//! client-core: Shared infrastructure for the pantry client SDK.
pub mod config;
pub mod error;
pub mod observability;

pub use error::{ApiError, ErrorBody};
pub use serde;
pub use serde_json;
pub use tracing;
