use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{
    Account, AccountId, Contact, ContactId, ConversionRequest, ConversionResult, Lead, LeadId,
    LeadStatus, Opportunity, OpportunityId,
};
use super::storage::{CollectionStore, Notice, Notifier, StorageError};

/// Which part of the conversion sequence a persistence failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStep {
    Contact,
    Account,
    Opportunity,
    Lead,
}

impl ConversionStep {
    pub const fn label(self) -> &'static str {
        match self {
            ConversionStep::Contact => "contact",
            ConversionStep::Account => "account",
            ConversionStep::Opportunity => "opportunity",
            ConversionStep::Lead => "lead",
        }
    }
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised by the conversion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("lead '{0}' not found")]
    LeadNotFound(LeadId),
    #[error("lead '{0}' is already converted")]
    AlreadyConverted(LeadId),
    #[error("conversion request does not ask for any entity")]
    NothingRequested,
    #[error("an opportunity requires both an account and a contact")]
    MissingOpportunityRelations,
    #[error("conversion step '{step}' failed: {source}")]
    StepFailed {
        step: ConversionStep,
        #[source]
        source: StorageError,
    },
}

static CONTACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static OPPORTUNITY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_contact_id() -> ContactId {
    let id = CONTACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContactId(format!("contact-{id:06}"))
}

fn next_account_id() -> AccountId {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccountId(format!("account-{id:06}"))
}

fn next_opportunity_id() -> OpportunityId {
    let id = OPPORTUNITY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OpportunityId(format!("opportunity-{id:06}"))
}

fn persisted<T>(step: ConversionStep, result: Result<T, StorageError>) -> Result<T, ConversionError> {
    result.map_err(|source| ConversionError::StepFailed { step, source })
}

/// Promotes a qualified lead into linked downstream entities and moves the
/// lead to its terminal state.
///
/// The sequence is contact, account, opportunity, then the lead update. Each
/// entity write lands before the next step runs and nothing is rolled back on
/// a later failure: a failed opportunity precondition leaves contact and
/// account records behind while the lead stays unconverted. That partial-write
/// behavior is an observed contract of the surrounding product and is kept
/// until product decides otherwise.
pub struct ConversionPipeline<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> ConversionPipeline<S, N>
where
    S: CollectionStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    /// Run a conversion request against one lead. Emits a success or failure
    /// notice either way; the result carries the created identities.
    pub fn convert(
        &self,
        lead_id: &LeadId,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        match self.run(lead_id, &request) {
            Ok(result) => {
                info!(lead = %result.lead_id, kinds = %result.conversion_type, "lead converted");
                self.notifier.notify(Notice::success(format!(
                    "Lead {} converted ({})",
                    result.lead_id, result.conversion_type
                )));
                Ok(result)
            }
            Err(error) => {
                self.notifier
                    .notify(Notice::failure(format!("Conversion failed: {error}")));
                Err(error)
            }
        }
    }

    fn run(
        &self,
        lead_id: &LeadId,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        if request.is_empty() {
            return Err(ConversionError::NothingRequested);
        }

        let mut leads = persisted(ConversionStep::Lead, self.store.read_leads())?;
        let position = leads
            .iter()
            .position(|lead| &lead.id == lead_id)
            .ok_or_else(|| ConversionError::LeadNotFound(lead_id.clone()))?;
        let lead = leads[position].clone();

        if lead.is_converted || lead.status.is_terminal() {
            return Err(ConversionError::AlreadyConverted(lead.id));
        }

        let now = Utc::now();
        let mut created_kinds: Vec<&'static str> = Vec::new();

        // Step 1: contact, seeded from the lead with per-field overrides.
        let mut created_contact_id: Option<ContactId> = None;
        if let Some(payload) = &request.contact {
            let contact = Contact {
                id: next_contact_id(),
                lead_id: lead.id.clone(),
                first_name: payload
                    .first_name
                    .clone()
                    .unwrap_or_else(|| lead.first_name.clone()),
                last_name: payload
                    .last_name
                    .clone()
                    .unwrap_or_else(|| lead.last_name.clone()),
                email: payload.email.clone().unwrap_or_else(|| lead.email.clone()),
                phone: payload.phone.clone().unwrap_or_else(|| lead.phone.clone()),
                title: payload.title.clone().unwrap_or_default(),
                account_id: None,
                created_at: now,
            };

            let mut contacts = persisted(ConversionStep::Contact, self.store.read_contacts())?;
            contacts.push(contact.clone());
            persisted(ConversionStep::Contact, self.store.write_contacts(contacts))?;
            debug!(lead = %lead.id, contact = %contact.id, "conversion created contact");
            created_contact_id = Some(contact.id);
            created_kinds.push("contact");
        }

        // Step 2: account, wired to the step-1 contact when one exists.
        let mut created_account_id: Option<AccountId> = None;
        if let Some(payload) = &request.account {
            let account = Account {
                id: next_account_id(),
                name: payload
                    .name
                    .clone()
                    .unwrap_or_else(|| lead.company.clone()),
                industry: payload
                    .industry
                    .clone()
                    .unwrap_or_else(|| lead.industry.clone()),
                website: payload.website.clone(),
                primary_contact_id: created_contact_id.clone(),
                contact_ids: created_contact_id.iter().cloned().collect(),
                opportunity_ids: Vec::new(),
                created_at: now,
            };

            let mut accounts = persisted(ConversionStep::Account, self.store.read_accounts())?;
            accounts.push(account.clone());
            persisted(ConversionStep::Account, self.store.write_accounts(accounts))?;

            if let Some(contact_id) = &created_contact_id {
                let mut contacts = persisted(ConversionStep::Account, self.store.read_contacts())?;
                if let Some(contact) = contacts.iter_mut().find(|contact| &contact.id == contact_id)
                {
                    contact.account_id = Some(account.id.clone());
                }
                persisted(ConversionStep::Account, self.store.write_contacts(contacts))?;
            }

            debug!(lead = %lead.id, account = %account.id, "conversion created account");
            created_account_id = Some(account.id);
            created_kinds.push("account");
        }

        // Steps 3-4: opportunity, anchored to an account and a contact from
        // this call or from a prior partial conversion carried on the lead.
        let mut created_opportunity_id: Option<OpportunityId> = None;
        if let Some(payload) = &request.opportunity {
            let account_ref = created_account_id
                .clone()
                .or_else(|| lead.converted_to_account_id.clone());
            let contact_ref = created_contact_id
                .clone()
                .or_else(|| lead.converted_to_contact_id.clone());

            let (Some(account_id), Some(contact_id)) = (account_ref, contact_ref) else {
                return Err(ConversionError::MissingOpportunityRelations);
            };

            let opportunity = Opportunity {
                id: next_opportunity_id(),
                name: payload
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{} - Opportunity", lead.company)),
                stage: payload
                    .stage
                    .clone()
                    .unwrap_or_else(|| "prospecting".to_string()),
                amount: payload.amount.unwrap_or(lead.budget),
                close_date: payload.close_date,
                account_id: account_id.clone(),
                contact_id,
                created_at: now,
            };

            let mut opportunities =
                persisted(ConversionStep::Opportunity, self.store.read_opportunities())?;
            opportunities.push(opportunity.clone());
            persisted(
                ConversionStep::Opportunity,
                self.store.write_opportunities(opportunities),
            )?;

            let mut accounts =
                persisted(ConversionStep::Opportunity, self.store.read_accounts())?;
            if let Some(account) = accounts.iter_mut().find(|account| account.id == account_id) {
                account.opportunity_ids.push(opportunity.id.clone());
            }
            persisted(
                ConversionStep::Opportunity,
                self.store.write_accounts(accounts),
            )?;

            debug!(lead = %lead.id, opportunity = %opportunity.id, "conversion created opportunity");
            created_opportunity_id = Some(opportunity.id);
            created_kinds.push("opportunity");
        }

        // Step 5: terminal lead transition, only once every requested step
        // has landed.
        let conversion_type = created_kinds.join("+");
        let updated = Lead {
            status: LeadStatus::Converted,
            is_converted: true,
            converted_at: Some(now),
            converted_to_contact_id: created_contact_id
                .clone()
                .or(lead.converted_to_contact_id.clone()),
            converted_to_account_id: created_account_id
                .clone()
                .or(lead.converted_to_account_id.clone()),
            converted_to_opportunity_id: created_opportunity_id.clone(),
            conversion_type: Some(conversion_type.clone()),
            ..lead
        };
        let lead_id = updated.id.clone();
        leads[position] = updated;
        persisted(ConversionStep::Lead, self.store.write_leads(leads))?;

        Ok(ConversionResult {
            lead_id,
            contact_id: created_contact_id,
            account_id: created_account_id,
            opportunity_id: created_opportunity_id,
            conversion_type,
        })
    }
}
