use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::workflows::crm::leads::conversion::ConversionPipeline;
use crate::workflows::crm::leads::domain::{
    Account, Condition, ConditionField, ConditionOperator, Contact, Lead, LeadId, LeadStatus,
    Opportunity, RoutingRule, RuleId,
};
use crate::workflows::crm::leads::service::LeadService;
use crate::workflows::crm::leads::storage::{
    CollectionStore, Notice, Notifier, StorageError,
};

pub(super) fn lead(id: &str) -> Lead {
    Lead {
        id: LeadId(id.to_string()),
        first_name: "Dana".to_string(),
        last_name: "Whitfield".to_string(),
        email: "dana.whitfield@example.com".to_string(),
        phone: "555-0142".to_string(),
        company: "Whitfield Logistics".to_string(),
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        country: "USA".to_string(),
        source: "Website".to_string(),
        industry: "Logistics".to_string(),
        budget: 50_000.0,
        score: 0,
        status: LeadStatus::New,
        assigned_to: None,
        is_converted: false,
        created_at: Utc::now(),
        converted_at: None,
        converted_to_contact_id: None,
        converted_to_account_id: None,
        converted_to_opportunity_id: None,
        conversion_type: None,
    }
}

pub(super) fn condition(
    field: ConditionField,
    operator: ConditionOperator,
    value: &str,
) -> Condition {
    Condition {
        field,
        operator,
        value: value.to_string(),
    }
}

pub(super) fn rule(
    id: &str,
    priority: i32,
    conditions: Vec<Condition>,
    assign_to: &str,
) -> RoutingRule {
    RoutingRule {
        id: RuleId(id.to_string()),
        name: format!("rule {id}"),
        description: String::new(),
        conditions,
        assign_to: assign_to.to_string(),
        priority,
        is_active: true,
        created_at: Utc::now(),
        created_by: "admin".to_string(),
        updated_at: None,
        updated_by: None,
    }
}

/// In-memory stand-in for the host's key-value collections.
#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) leads: Mutex<Vec<Lead>>,
    pub(super) contacts: Mutex<Vec<Contact>>,
    pub(super) accounts: Mutex<Vec<Account>>,
    pub(super) opportunities: Mutex<Vec<Opportunity>>,
    pub(super) rules: Mutex<Vec<RoutingRule>>,
}

impl MemoryStore {
    pub(super) fn with_leads(leads: Vec<Lead>) -> Self {
        let store = Self::default();
        *store.leads.lock().expect("store mutex poisoned") = leads;
        store
    }

    pub(super) fn seed_rules(&self, rules: Vec<RoutingRule>) {
        *self.rules.lock().expect("store mutex poisoned") = rules;
    }

    pub(super) fn leads(&self) -> Vec<Lead> {
        self.leads.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn contacts(&self) -> Vec<Contact> {
        self.contacts.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn opportunities(&self) -> Vec<Opportunity> {
        self.opportunities.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn rules(&self) -> Vec<RoutingRule> {
        self.rules.lock().expect("store mutex poisoned").clone()
    }
}

impl CollectionStore for MemoryStore {
    fn read_leads(&self) -> Result<Vec<Lead>, StorageError> {
        Ok(self.leads())
    }

    fn write_leads(&self, leads: Vec<Lead>) -> Result<(), StorageError> {
        *self.leads.lock().expect("store mutex poisoned") = leads;
        Ok(())
    }

    fn read_contacts(&self) -> Result<Vec<Contact>, StorageError> {
        Ok(self.contacts())
    }

    fn write_contacts(&self, contacts: Vec<Contact>) -> Result<(), StorageError> {
        *self.contacts.lock().expect("store mutex poisoned") = contacts;
        Ok(())
    }

    fn read_accounts(&self) -> Result<Vec<Account>, StorageError> {
        Ok(self.accounts())
    }

    fn write_accounts(&self, accounts: Vec<Account>) -> Result<(), StorageError> {
        *self.accounts.lock().expect("store mutex poisoned") = accounts;
        Ok(())
    }

    fn read_opportunities(&self) -> Result<Vec<Opportunity>, StorageError> {
        Ok(self.opportunities())
    }

    fn write_opportunities(&self, opportunities: Vec<Opportunity>) -> Result<(), StorageError> {
        *self.opportunities.lock().expect("store mutex poisoned") = opportunities;
        Ok(())
    }

    fn read_rules(&self) -> Result<Vec<RoutingRule>, StorageError> {
        Ok(self.rules())
    }

    fn write_rules(&self, rules: Vec<RoutingRule>) -> Result<(), StorageError> {
        *self.rules.lock().expect("store mutex poisoned") = rules;
        Ok(())
    }
}

/// Delegates to an inner `MemoryStore` but fails writes to one collection,
/// for step-failure injection.
pub(super) struct FailingStore {
    pub(super) inner: MemoryStore,
    fail_writes_to: &'static str,
}

impl FailingStore {
    pub(super) fn failing_writes_to(inner: MemoryStore, collection: &'static str) -> Self {
        Self {
            inner,
            fail_writes_to: collection,
        }
    }

    fn check(&self, collection: &'static str) -> Result<(), StorageError> {
        if self.fail_writes_to == collection {
            return Err(StorageError::Unavailable {
                collection,
                detail: "write rejected by test".to_string(),
            });
        }
        Ok(())
    }
}

impl CollectionStore for FailingStore {
    fn read_leads(&self) -> Result<Vec<Lead>, StorageError> {
        self.inner.read_leads()
    }

    fn write_leads(&self, leads: Vec<Lead>) -> Result<(), StorageError> {
        self.check("leads")?;
        self.inner.write_leads(leads)
    }

    fn read_contacts(&self) -> Result<Vec<Contact>, StorageError> {
        self.inner.read_contacts()
    }

    fn write_contacts(&self, contacts: Vec<Contact>) -> Result<(), StorageError> {
        self.check("contacts")?;
        self.inner.write_contacts(contacts)
    }

    fn read_accounts(&self) -> Result<Vec<Account>, StorageError> {
        self.inner.read_accounts()
    }

    fn write_accounts(&self, accounts: Vec<Account>) -> Result<(), StorageError> {
        self.check("accounts")?;
        self.inner.write_accounts(accounts)
    }

    fn read_opportunities(&self) -> Result<Vec<Opportunity>, StorageError> {
        self.inner.read_opportunities()
    }

    fn write_opportunities(&self, opportunities: Vec<Opportunity>) -> Result<(), StorageError> {
        self.check("opportunities")?;
        self.inner.write_opportunities(opportunities)
    }

    fn read_rules(&self) -> Result<Vec<RoutingRule>, StorageError> {
        self.inner.read_rules()
    }

    fn write_rules(&self, rules: Vec<RoutingRule>) -> Result<(), StorageError> {
        self.check("rules")?;
        self.inner.write_rules(rules)
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
    }
}

pub(super) fn pipeline<S: CollectionStore + 'static>(
    store: Arc<S>,
) -> (ConversionPipeline<S, MemoryNotifier>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::default());
    (ConversionPipeline::new(store, notifier.clone()), notifier)
}

pub(super) fn service(
    store: Arc<MemoryStore>,
) -> (LeadService<MemoryStore, MemoryNotifier>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::default());
    (LeadService::new(store, notifier.clone()), notifier)
}
