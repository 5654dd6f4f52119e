//! Top-level identity service: owns the local identifier and the single-flight
//! guard around its creation.

use std::sync::Arc;

use did_core::{Identifier, IdentifierDocument, Repository, Resolver, Result};
use did_sidetree::{reconstruct_document, IdentifierCreator, Registrar, IDENTIFIER_SECRET_KEY_NAME};
use keystore::{CryptoOperations, CryptoProvider};
use tokio::sync::Mutex;

/// Manages the local identifier: loads it from the repository when one exists,
/// creates it exactly once when none does, and fronts registration and
/// resolution for it.
pub struct IdentityManager<P, R>
where
    P: CryptoProvider,
    R: Repository,
{
    repository: Arc<R>,
    creator: IdentifierCreator<P, R>,
    persona_id: String,
    // Single-flight guard and cache. The lock is held for the whole lookup or
    // creation, so concurrent first callers await the in-flight result rather
    // than generating a second identifier. A failed creation releases the
    // slot for the next caller to retry.
    state: Mutex<Option<Identifier>>,
}

impl<P, R> IdentityManager<P, R>
where
    P: CryptoProvider,
    R: Repository,
{
    /// Create an identity manager. `network` selects the DID method network
    /// segment; `None` targets mainnet.
    pub fn new(
        crypto: Arc<CryptoOperations<P>>,
        repository: Arc<R>,
        persona_id: &str,
        network: Option<String>,
    ) -> Self {
        Self {
            creator: IdentifierCreator::new(crypto, Arc::clone(&repository), network),
            repository,
            persona_id: persona_id.to_string(),
            state: Mutex::new(None),
        }
    }

    /// The local identifier. Loads the well-known record from the repository
    /// when one exists; otherwise creates and persists one. Idempotent: later
    /// calls return the same record without generating keys.
    ///
    /// # Errors
    ///
    /// * `Err::IdentifierCreator` - A fresh creation attempt failed; nothing
    ///   was persisted and a later call may retry.
    pub async fn get_or_create_identifier(&self) -> Result<Identifier> {
        let mut state = self.state.lock().await;
        if let Some(identifier) = state.as_ref() {
            return Ok(identifier.clone());
        }
        if let Some(found) = self.repository.query_by_name(IDENTIFIER_SECRET_KEY_NAME).await? {
            tracing::debug!("identifier found, de-serializing");
            *state = Some(found.clone());
            return Ok(found);
        }
        tracing::debug!("no identifier found, creating a new DID");
        let created = self.creator.create(&self.persona_id, None).await?;
        *state = Some(created.clone());
        Ok(created)
    }

    /// Submit the local identifier's create operation through the given
    /// registrar, anchoring it.
    ///
    /// # Errors
    ///
    /// * `Err::Registration` / `Err::Timeout` / `Err::Network` - The
    ///   registrar rejected the operation or could not be reached.
    pub async fn register(&self, registrar: &impl Registrar) -> Result<IdentifierDocument> {
        let identifier = self.get_or_create_identifier().await?;
        let initial_state = reconstruct_document(&identifier.did)?;
        registrar.register(&initial_state.registration, &identifier.signature_key_ref).await
    }

    /// Resolve a DID to its document through the given resolver.
    ///
    /// # Errors
    ///
    /// * `Err::NotFound` / `Err::Resolution` - The DID has no document or the
    ///   resolver failed.
    pub async fn resolve(&self, resolver: &impl Resolver, did: &str) -> Result<IdentifierDocument> {
        Ok(resolver.resolve(did).await?.document)
    }
}
