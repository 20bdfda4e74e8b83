use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Condition, Lead, LeadDraft, LeadId, LeadStatus, RoutingRule, RuleId};
use super::routing::RoutingEngine;
use super::scoring::{self, ScoreBreakdownError};
use super::storage::{CollectionStore, Notice, Notifier, StorageError};
use super::CategoryScore;

/// Write-time validation failures for routing rules. Evaluation never sees a
/// rule these would reject.
#[derive(Debug, thiserror::Error)]
pub enum RuleValidationError {
    #[error("rule name must not be blank")]
    EmptyName,
    #[error("rule must assign to an owner")]
    EmptyAssignee,
    #[error("a rule named '{0}' already exists")]
    DuplicateName(String),
    #[error("rule has no valid conditions")]
    NoValidConditions,
    #[error("rule '{0}' not found")]
    RuleNotFound(RuleId),
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Rule(#[from] RuleValidationError),
    #[error(transparent)]
    Score(#[from] ScoreBreakdownError),
    #[error("lead '{0}' not found")]
    LeadNotFound(LeadId),
}

/// Inbound shape for creating or updating a routing rule.
#[derive(Debug, Clone, Default)]
pub struct RuleDraft {
    /// Present when updating an existing rule.
    pub id: Option<RuleId>,
    pub name: String,
    pub description: String,
    pub conditions: Vec<Condition>,
    pub assign_to: String,
    pub priority: i32,
    pub is_active: bool,
    pub actor: String,
}

/// Outcome of a bulk lead import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub auto_assigned: usize,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RULE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

fn next_rule_id() -> RuleId {
    let id = RULE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RuleId(format!("rule-{id:06}"))
}

/// Service composing the routing engine, scoring model, and rule validation
/// over the injected collection store.
pub struct LeadService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    auto_assign: bool,
}

impl<S, N> LeadService<S, N>
where
    S: CollectionStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            auto_assign: true,
        }
    }

    /// Honor the host's `LEAD_AUTO_ASSIGN` switch; when off, inbound leads
    /// stay unassigned regardless of matching rules.
    pub fn with_auto_assign(mut self, auto_assign: bool) -> Self {
        self.auto_assign = auto_assign;
        self
    }

    /// Register one inbound lead. Routing runs only when the intake form did
    /// not pick an owner manually.
    pub fn create_lead(&self, draft: LeadDraft) -> Result<Lead, LeadServiceError> {
        let engine = RoutingEngine::new(self.store.read_rules()?);
        let mut leads = self.store.read_leads()?;

        let lead = self.admit(draft, &engine);
        leads.push(lead.clone());
        self.store.write_leads(leads)?;

        Ok(lead)
    }

    /// Register a batch of pre-parsed lead records with a single
    /// read-modify-write of the leads collection.
    pub fn import_leads(&self, drafts: Vec<LeadDraft>) -> Result<ImportSummary, LeadServiceError> {
        let engine = RoutingEngine::new(self.store.read_rules()?);
        let mut leads = self.store.read_leads()?;

        let mut summary = ImportSummary {
            imported: 0,
            auto_assigned: 0,
        };
        for draft in drafts {
            let manual = draft.assigned_to.is_some();
            let lead = self.admit(draft, &engine);
            if !manual && lead.assigned_to.is_some() {
                summary.auto_assigned += 1;
            }
            summary.imported += 1;
            leads.push(lead);
        }
        self.store.write_leads(leads)?;

        self.notifier.notify(Notice::success(format!(
            "Imported {} lead(s), {} auto-assigned",
            summary.imported, summary.auto_assigned
        )));
        Ok(summary)
    }

    fn admit(&self, draft: LeadDraft, engine: &RoutingEngine) -> Lead {
        let mut lead = lead_from_draft(next_lead_id(), draft);
        if lead.assigned_to.is_none() && self.auto_assign {
            if let Some(owner) = engine.assign(&lead).map(str::to_string) {
                info!(lead = %lead.id, owner = %owner, "routing assigned lead");
                lead.assigned_to = Some(owner);
            }
        }
        lead
    }

    /// Create or update a routing rule, rejecting drafts the engine must
    /// never see: blank name or assignee, duplicate names, and rules whose
    /// conditions all have blank values.
    pub fn save_rule(&self, draft: RuleDraft) -> Result<RoutingRule, LeadServiceError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(RuleValidationError::EmptyName.into());
        }
        if draft.assign_to.trim().is_empty() {
            return Err(RuleValidationError::EmptyAssignee.into());
        }

        let conditions: Vec<Condition> = draft
            .conditions
            .into_iter()
            .filter(|condition| !condition.value.trim().is_empty())
            .collect();
        if conditions.is_empty() {
            return Err(RuleValidationError::NoValidConditions.into());
        }

        let mut rules = self.store.read_rules()?;
        let duplicate = rules.iter().any(|existing| {
            existing.name.eq_ignore_ascii_case(&name)
                && draft.id.as_ref() != Some(&existing.id)
        });
        if duplicate {
            return Err(RuleValidationError::DuplicateName(name).into());
        }

        let now = Utc::now();
        let rule = match draft.id {
            Some(id) => {
                let existing = rules
                    .iter_mut()
                    .find(|rule| rule.id == id)
                    .ok_or(RuleValidationError::RuleNotFound(id))?;
                existing.name = name;
                existing.description = draft.description;
                existing.conditions = conditions;
                existing.assign_to = draft.assign_to;
                existing.priority = draft.priority;
                existing.is_active = draft.is_active;
                existing.updated_at = Some(now);
                existing.updated_by = Some(draft.actor);
                existing.clone()
            }
            None => {
                let rule = RoutingRule {
                    id: next_rule_id(),
                    name,
                    description: draft.description,
                    conditions,
                    assign_to: draft.assign_to,
                    priority: draft.priority,
                    is_active: draft.is_active,
                    created_at: now,
                    created_by: draft.actor,
                    updated_at: None,
                    updated_by: None,
                };
                rules.push(rule.clone());
                rule
            }
        };
        self.store.write_rules(rules)?;

        debug!(rule = %rule.name, priority = rule.priority, "routing rule saved");
        Ok(rule)
    }

    /// Persist a user-adjusted score breakdown as the lead's total score.
    pub fn update_score(
        &self,
        lead_id: &LeadId,
        breakdown: &[CategoryScore],
    ) -> Result<Lead, LeadServiceError> {
        scoring::validate_breakdown(breakdown)?;
        let total = scoring::compute_total(breakdown);

        let mut leads = self.store.read_leads()?;
        let lead = leads
            .iter_mut()
            .find(|lead| &lead.id == lead_id)
            .ok_or_else(|| LeadServiceError::LeadNotFound(lead_id.clone()))?;

        let trend = scoring::delta(total, lead.score);
        lead.score = total;
        let updated = lead.clone();
        self.store.write_leads(leads)?;

        info!(
            lead = %lead_id,
            total,
            tier = scoring::classify(total).label(),
            trend,
            "lead score updated"
        );
        Ok(updated)
    }

    /// Diagnostic: every active rule that would fully match the lead, in
    /// evaluation order.
    pub fn preview_routing(&self, lead: &Lead) -> Result<Vec<RoutingRule>, LeadServiceError> {
        let engine = RoutingEngine::new(self.store.read_rules()?);
        Ok(engine
            .matching_rules(lead)
            .into_iter()
            .cloned()
            .collect())
    }
}

fn lead_from_draft(id: LeadId, draft: LeadDraft) -> Lead {
    Lead {
        id,
        first_name: draft.first_name,
        last_name: draft.last_name,
        email: draft.email,
        phone: draft.phone,
        company: draft.company,
        city: draft.city,
        state: draft.state,
        country: draft.country,
        source: draft.source,
        industry: draft.industry,
        budget: draft.budget,
        score: draft.score,
        status: LeadStatus::New,
        assigned_to: draft.assigned_to,
        is_converted: false,
        created_at: Utc::now(),
        converted_at: None,
        converted_to_contact_id: None,
        converted_to_account_id: None,
        converted_to_opportunity_id: None,
        conversion_type: None,
    }
}
