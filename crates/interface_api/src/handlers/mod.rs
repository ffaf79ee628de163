//! Request handlers, one module per route group

pub mod root;
pub mod health;
pub mod claims;
pub mod ai;
pub mod tunnel;
pub mod analytics;
