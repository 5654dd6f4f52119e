//! Identifier document and its component data structures.

use serde::{Deserialize, Serialize};

use crate::document::service::Service;
use crate::document::verification_method::{KeyPurpose, VerificationMethod};
use crate::error::Err;
use crate::{tracerr, Result};

pub mod patch;
pub mod service;
pub mod verification_method;

/// JSON-LD context for identifier documents.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// The document a DID resolves to: the set of public keys and service
/// endpoints currently bound to the identifier.
/// <https://www.w3.org/TR/did-core/>
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifierDocument {
    /// The JSON-LD context.
    #[serde(rename = "@context", skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
    /// The document's unique identifier: the DID.
    pub id: String,
    /// Public keys bound to the identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<VerificationMethod>>,
    /// Services advertised by the identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_endpoints: Option<Vec<Service>>,
}

impl IdentifierDocument {
    /// Get a key from the document by purpose.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - No key in the document serves the purpose.
    pub fn get_key(&self, purpose: KeyPurpose) -> Result<&VerificationMethod> {
        let found = self.public_keys.as_ref().and_then(|keys| {
            keys.iter().find(|k| k.purposes.as_ref().is_some_and(|p| p.contains(&purpose)))
        });
        match found {
            Some(vm) => Ok(vm),
            None => tracerr!(Err::KeyNotFound, "No key found for purpose {}", purpose),
        }
    }
}
