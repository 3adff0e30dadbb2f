//! Portal Client
//!
//! Typed HTTP client for the Krishi Suraksha backend. Every endpoint has an
//! explicit schema in [`schema`]; responses that do not match are reported
//! as `Error::Decode` instead of reaching the views half-parsed.

pub mod client;
pub mod schema;

pub use client::{HttpPortalClient, PortalService};
pub use schema::{Resource, StatusFilter};
