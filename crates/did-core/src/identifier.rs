//! The persisted record of a locally-owned identifier.

use serde::{Deserialize, Serialize};

use crate::document::IdentifierDocument;

/// A locally-owned identifier: the DID string, the key references needed to
/// operate it, the commitments to its next update and recovery keys and the
/// document it resolves to. Constructed once by the identifier creator and
/// never mutated in place; a key rotation produces a new record.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// The long-form DID string.
    pub did: String,
    /// Short random alias used to namespace this identifier's key references.
    pub alias: String,
    /// Key store reference for the signing key pair.
    pub signature_key_ref: String,
    /// Key store reference for the encryption key pair, if one was generated.
    #[serde(default)]
    pub encryption_key_ref: String,
    /// Key store reference for the recovery key pair.
    pub recovery_key_ref: String,
    /// Commitment to the next update key.
    pub update_commitment: String,
    /// Commitment to the next recovery key.
    pub recovery_commitment: String,
    /// The document the identifier resolves to.
    pub document: IdentifierDocument,
    /// Well-known name the record is stored under in the repository.
    pub name: String,
}
