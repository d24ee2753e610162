use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Contact, ContactPayload, ValidationError};

/// Errors surfaced by a [`ContactStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier is not in the store's id format
    #[error("Cast to UUID failed for value \"{0}\"")]
    MalformedId(String),
    /// The contact fields broke a validation rule
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Any other failure reported by the backend
    #[error("storage backend error: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Parse a path identifier into the store's id type
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}

/// Persistence for the phonebook
///
/// Implementations own id parsing and field validation: callers hand over
/// raw path ids and request payloads.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts in creation order
    async fn list(&self) -> Result<Vec<Contact>, StoreError>;

    /// Number of stored contacts
    async fn count(&self) -> Result<usize, StoreError>;

    /// Look up one contact; `Ok(None)` when the id is well-formed but absent
    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError>;

    /// Validate and insert a new contact under a freshly assigned id
    async fn create(&self, payload: ContactPayload) -> Result<Contact, StoreError>;

    /// Validate and replace name and number of an existing contact
    ///
    /// Returns `Ok(None)` when no contact has this id.
    async fn update(&self, id: &str, payload: ContactPayload)
    -> Result<Option<Contact>, StoreError>;

    /// Remove a contact. Removing an absent id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// In-process store used for local development and tests
#[derive(Default)]
pub struct MemoryStore {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        Ok(self.contacts.read().await.clone())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.contacts.read().await.len())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Contact>, StoreError> {
        let id = parse_id(id)?.to_string();
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, payload: ContactPayload) -> Result<Contact, StoreError> {
        let fields = payload.validate()?;
        let contact = fields.into_contact(Uuid::new_v4().to_string());
        self.contacts.write().await.push(contact.clone());
        tracing::debug!("Created contact with id: {}", contact.id);
        Ok(contact)
    }

    async fn update(
        &self,
        id: &str,
        payload: ContactPayload,
    ) -> Result<Option<Contact>, StoreError> {
        let id = parse_id(id)?.to_string();
        let fields = payload.validate()?;

        let mut contacts = self.contacts.write().await;
        match contacts.iter_mut().find(|c| c.id == id) {
            Some(existing) => {
                existing.name = fields.name;
                existing.number = fields.number;
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?.to_string();
        self.contacts.write().await.retain(|c| c.id != id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
