//! Krishi Suraksha Admin Portal
//!
//! Officer-facing portal for the crop insurance backend: verify newly
//! registered farms and approve or reject calamity claims flagged for review.
//!
//! ## Architecture
//!
//! ```text
//! Portal ── guard ── SessionContext ── SessionStore (user.json)
//!   │
//!   ├── FarmVerification ─┐
//!   ├── ClaimsDashboard ──┼── ListView ── PortalService (HTTP client)
//!   └── DecisionWorkflow ─┘
//! ```
//!
//! Views never patch rows locally. After a write succeeds the affected list
//! is fetched again, so what the officer sees is always what the backend holds.

pub mod audit;
pub mod claims;
pub mod config;
pub mod decision;
pub mod farms;
pub mod guard;
pub mod list_view;
pub mod portal;
pub mod render;
pub mod session;

#[cfg(test)]
mod testing;

pub use audit::{AuditAction, AuditEntry, AuditSink, MemoryAuditSink, TracingAuditSink};
pub use claims::{ClaimsDashboard, DashboardSummary};
pub use config::Config;
pub use decision::{ClaimContext, DecisionWorkflow, Submitted, WorkflowState};
pub use farms::FarmVerification;
pub use guard::{authorize, resolve, Access, Route};
pub use list_view::{ListState, ListView, Listing};
pub use portal::Portal;
pub use session::{SessionContext, SessionStore};
