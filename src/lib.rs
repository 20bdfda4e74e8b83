//! Lead routing, scoring, and conversion core.
//!
//! The crate owns the decision logic of the CRM lead pipeline: condition-based
//! routing rules that pick an owner for an inbound lead, a weighted scoring
//! model that grades lead quality, and the conversion pipeline that promotes a
//! qualified lead into linked contact, account, and opportunity records. All
//! presentation and storage concerns stay outside; persistence is reached only
//! through the injected [`workflows::crm::leads::CollectionStore`] seam.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
