//! Creates identifiers: generates the key material and create-operation
//! payload for a persona, assembles the self-certifying long-form DID and
//! persists the resulting record.

use std::sync::Arc;

use did_core::error::Err;
use did_core::{
    hashing, tracerr, Identifier, IdentifierDocument, Repository, Result, Service, DID_CONTEXT,
};
use keystore::{CryptoOperations, CryptoProvider};

use crate::payload::{compute_unique_suffix, SidetreePayloadGenerator};
use crate::{
    IDENTIFIER_SECRET_KEY_NAME, INITIAL_STATE_PARAM, METHOD_NAME, RECOVERY_KEY_REFERENCE,
    SIGNATURE_KEY_REFERENCE,
};

/// Creates and persists identifiers.
pub struct IdentifierCreator<P, R>
where
    P: CryptoProvider,
    R: Repository,
{
    crypto: Arc<CryptoOperations<P>>,
    repository: Arc<R>,
    network: Option<String>,
}

impl<P, R> IdentifierCreator<P, R>
where
    P: CryptoProvider,
    R: Repository,
{
    /// Create an identifier creator. `network` selects the method network
    /// segment of produced DIDs (`did:ion:<network>:...`); `None` targets
    /// mainnet.
    pub fn new(crypto: Arc<CryptoOperations<P>>, repository: Arc<R>, network: Option<String>) -> Self {
        Self {
            crypto,
            repository,
            network,
        }
    }

    /// Create a new identifier for the given persona: generate keys and the
    /// create-operation payload, build the long-form DID, persist the record
    /// and return it. On failure nothing is persisted.
    ///
    /// # Errors
    ///
    /// * `Err::IdentifierCreator` - Wraps whatever downstream failure ended
    ///   the attempt.
    pub async fn create(
        &self,
        persona_id: &str,
        services: Option<&[Service]>,
    ) -> Result<Identifier> {
        match self.build(persona_id, services).await {
            Ok(identifier) => Ok(identifier),
            Err(e) => tracerr!(Err::IdentifierCreator, "Unable to create an identifier: {}", e),
        }
    }

    async fn build(&self, persona_id: &str, services: Option<&[Service]>) -> Result<Identifier> {
        let alias = format!("{persona_id}-{}", hashing::rand_hex(2));

        let generator = SidetreePayloadGenerator::new(&self.crypto);
        let payload = generator.generate_create_payload(&alias, services)?;

        let suffix = compute_unique_suffix(&payload.registration.suffix_data)?;
        let short_form = match &self.network {
            Some(network) => format!("did:{METHOD_NAME}:{network}:{suffix}"),
            None => format!("did:{METHOD_NAME}:{suffix}"),
        };
        let initial_state = payload.registration.encode()?;
        let did = format!("{short_form}?{INITIAL_STATE_PARAM}={initial_state}");

        // The document a resolver with no ledger access would reconstruct.
        let mut document = IdentifierDocument {
            context: Some(vec![DID_CONTEXT.to_string()]),
            id: did.clone(),
            ..Default::default()
        };
        document.apply_patches(&payload.registration.patch_data.patches);

        let identifier = Identifier {
            did,
            signature_key_ref: format!("{alias}-{SIGNATURE_KEY_REFERENCE}"),
            encryption_key_ref: String::new(),
            recovery_key_ref: format!("{alias}-{RECOVERY_KEY_REFERENCE}"),
            update_commitment: payload.registration.next_update_commitment().to_string(),
            recovery_commitment: payload.registration.next_recovery_commitment().to_string(),
            document,
            alias,
            name: IDENTIFIER_SECRET_KEY_NAME.to_string(),
        };

        self.repository.insert(&identifier).await?;
        tracing::debug!("created identifier {}", short_form);
        Ok(identifier)
    }
}
