//! Lead routing, scoring, and conversion.
//!
//! Everything here is driven synchronously by user actions in the host UI:
//! intake and import feed the routing engine, score edits feed the scoring
//! model, and an explicit convert action runs the conversion pipeline. The
//! record collections, rules included, are reached only through the injected
//! [`CollectionStore`] seam.

pub mod conversion;
pub mod domain;
pub mod routing;
pub mod scoring;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use conversion::{ConversionError, ConversionPipeline, ConversionStep};
pub use domain::{
    Account, AccountId, AccountPayload, CategoryScore, Condition, ConditionField,
    ConditionOperator, Contact, ContactId, ContactPayload, ConversionRequest, ConversionResult,
    Lead, LeadDraft, LeadId, LeadStatus, Opportunity, OpportunityId, OpportunityPayload,
    RoutingRule, RuleId,
};
pub use routing::{evaluate, FieldValue, RoutingEngine};
pub use scoring::{
    classify, compute_total, delta, validate_breakdown, ScoreBreakdownError, ScoreTier,
};
pub use service::{ImportSummary, LeadService, LeadServiceError, RuleDraft, RuleValidationError};
pub use storage::{CollectionStore, Notice, NoticeKind, Notifier, StorageError};
