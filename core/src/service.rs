//! Client use-case service.
//!
//! Every operation forwards to the persistence gateway unchanged; this is the
//! seam the HTTP layer talks to so it never touches storage directly.

use std::sync::Arc;

use crate::error::StoreError;
use crate::model::{Client, ClientDraft, ClientId};
use crate::store::ClientStore;

pub struct ClientService<S: ClientStore + ?Sized = dyn ClientStore> {
    store: Arc<S>,
}

impl<S: ClientStore + ?Sized> Clone for ClientService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ClientStore + ?Sized> ClientService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        self.store.list()
    }

    pub fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        self.store.get(id)
    }

    pub fn add_client(&self, draft: ClientDraft) -> Result<Client, StoreError> {
        self.store.create(draft)
    }

    /// Returns whether a client with `id` existed and was replaced.
    pub fn update_client(&self, id: ClientId, draft: &ClientDraft) -> Result<bool, StoreError> {
        self.store.update(id, draft)
    }

    /// Returns whether a client with `id` existed and was removed.
    pub fn delete_client(&self, id: ClientId) -> Result<bool, StoreError> {
        self.store.delete(id)
    }
}
