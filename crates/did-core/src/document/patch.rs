//! Patching of identifier documents. A Sidetree create operation describes the
//! initial document state as a list of patches; applying them to an empty
//! document reconstructs the document a resolver would return.

use serde::{Deserialize, Serialize};

use crate::document::service::Service;
use crate::document::verification_method::VerificationMethod;
use crate::document::IdentifierDocument;

impl IdentifierDocument {
    /// Apply patches to an identifier document, in order.
    pub fn apply_patches(&mut self, patches: &[Patch]) {
        for p in patches {
            match p.action {
                PatchAction::Replace => {
                    if let Some(doc) = &p.document {
                        self.public_keys = doc.public_keys.clone();
                        self.service_endpoints = doc.service_endpoints.clone();
                    }
                    // Only honour a single replace patch
                    break;
                }
                PatchAction::AddPublicKeys => {
                    if let Some(keys) = &p.public_keys {
                        let mut mine = self.public_keys.clone().unwrap_or_default();
                        mine.extend(keys.iter().cloned());
                        self.public_keys = Some(mine);
                    }
                }
                PatchAction::AddServices => {
                    if let Some(services) = &p.service_endpoints {
                        let mut mine = self.service_endpoints.clone().unwrap_or_default();
                        mine.extend(services.iter().cloned());
                        self.service_endpoints = Some(mine);
                    }
                }
            }
        }
    }
}

/// Types of patches that can describe or update an identifier document.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PatchAction {
    /// Create a new document or replace an entire document.
    #[default]
    #[serde(rename = "replace")]
    Replace,
    /// Add one or more public keys to the document.
    #[serde(rename = "add-public-keys")]
    AddPublicKeys,
    /// Add one or more services to the document.
    #[serde(rename = "add-services")]
    AddServices,
}

impl std::fmt::Display for PatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PatchAction::Replace => write!(f, "replace"),
            PatchAction::AddPublicKeys => write!(f, "add-public-keys"),
            PatchAction::AddServices => write!(f, "add-services"),
        }
    }
}

/// The whole-document state carried by a replace patch.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchDocument {
    /// Public keys the document should contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<VerificationMethod>>,
    /// Services the document should contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_endpoints: Option<Vec<Service>>,
}

/// A single patch.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patch {
    /// The type of patch to apply.
    pub action: PatchAction,
    /// A set of keys and services to construct a whole document. Only used by
    /// replace patches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<PatchDocument>,
    /// Public keys to add. Only used by add-public-keys patches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<VerificationMethod>>,
    /// Services to add. Only used by add-services patches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_endpoints: Option<Vec<Service>>,
}

impl Patch {
    /// A replace patch carrying the full initial document state.
    #[must_use]
    pub fn replace(document: PatchDocument) -> Self {
        Self {
            action: PatchAction::Replace,
            document: Some(document),
            ..Default::default()
        }
    }

    /// An add-public-keys patch.
    #[must_use]
    pub fn add_public_keys(keys: Vec<VerificationMethod>) -> Self {
        Self {
            action: PatchAction::AddPublicKeys,
            public_keys: Some(keys),
            ..Default::default()
        }
    }

    /// An add-services patch.
    #[must_use]
    pub fn add_services(services: Vec<Service>) -> Self {
        Self {
            action: PatchAction::AddServices,
            service_endpoints: Some(services),
            ..Default::default()
        }
    }
}
