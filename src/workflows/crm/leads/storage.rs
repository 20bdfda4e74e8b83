use super::domain::{Account, Contact, Lead, Opportunity, RoutingRule};

/// Storage seam over the host's key-value collections. The backing store only
/// offers read-all/write-all per collection; there is no partial update and no
/// locking, so the last writer wins. Components receive this by injection and
/// never reach a process-wide store directly.
pub trait CollectionStore: Send + Sync {
    fn read_leads(&self) -> Result<Vec<Lead>, StorageError>;
    fn write_leads(&self, leads: Vec<Lead>) -> Result<(), StorageError>;

    fn read_contacts(&self) -> Result<Vec<Contact>, StorageError>;
    fn write_contacts(&self, contacts: Vec<Contact>) -> Result<(), StorageError>;

    fn read_accounts(&self) -> Result<Vec<Account>, StorageError>;
    fn write_accounts(&self, accounts: Vec<Account>) -> Result<(), StorageError>;

    fn read_opportunities(&self) -> Result<Vec<Opportunity>, StorageError>;
    fn write_opportunities(&self, opportunities: Vec<Opportunity>) -> Result<(), StorageError>;

    fn read_rules(&self) -> Result<Vec<RoutingRule>, StorageError>;
    fn write_rules(&self, rules: Vec<RoutingRule>) -> Result<(), StorageError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("collection '{collection}' unavailable: {detail}")]
    Unavailable {
        collection: &'static str,
        detail: String,
    },
    #[error("collection '{collection}' holds malformed records: {detail}")]
    Corrupt {
        collection: &'static str,
        detail: String,
    },
}

/// Severity tag for a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// User-visible message emitted by the core; the surrounding UI renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

/// Fire-and-forget notification hook; the core never consumes a result from
/// it.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
