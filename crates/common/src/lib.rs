//! Shared domain types for the Krishi Suraksha admin portal

pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{
    Claim, ClaimDecision, ClaimStatus, DecisionKind, Farm, FarmStatus, Officer,
};
