//! Request and response data transfer objects

pub mod claims;
pub mod ai;
pub mod tunnel;
pub mod analytics;
pub mod envelope;

pub use envelope::ApiResponse;
