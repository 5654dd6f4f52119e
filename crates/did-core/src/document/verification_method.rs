//! Verification methods associate public keys with an identifier document.

use serde::{Deserialize, Serialize};

use crate::keys::Jwk;

/// A public key entry in an identifier document or a document patch. Sidetree
/// create operations carry the key together with the purposes it serves, so
/// the purposes travel with the entry rather than as separate relationship
/// lists.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationMethod {
    /// Identifier for the verification method, unique within the document.
    pub id: String,
    /// The type of verification method, registered in a DID specification
    /// registry. <https://www.w3.org/TR/did-spec-registries/>
    #[serde(rename = "type")]
    pub type_: String,
    /// Identifier for the controller of the verification method.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub controller: String,
    /// The public key material of the verification method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<Jwk>,
    /// The purposes the key serves within the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purposes: Option<Vec<KeyPurpose>>,
}

/// Key purpose type.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPurpose {
    #[default]
    /// The authentication verification relationship: how the subject is
    /// expected to be authenticated, such as in a challenge-response protocol.
    Authentication,
    /// The assertionMethod verification relationship: how the subject is
    /// expected to express claims, such as signing a verifiable credential.
    AssertionMethod,
    /// The keyAgreement verification relationship: how an entity can generate
    /// encryption material to transmit confidential information to the subject.
    KeyAgreement,
}

impl std::fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPurpose::Authentication => write!(f, "authentication"),
            KeyPurpose::AssertionMethod => write!(f, "assertionMethod"),
            KeyPurpose::KeyAgreement => write!(f, "keyAgreement"),
        }
    }
}
