//! Resolution seam: turn a DID into the document it identifies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::IdentifierDocument;
use crate::Result;

/// A resolver fetches the identifier document for a DID. Implementations may
/// go to the network or reconstruct the document locally from a self-certifying
/// long-form DID.
#[allow(async_fn_in_trait)]
pub trait Resolver {
    /// Resolve the given DID to its document.
    ///
    /// # Errors
    ///
    /// * `Err::NotFound` - No document exists for the DID.
    /// * `Err::Resolution` - The resolution endpoint returned a failure.
    /// * `Err::Timeout` / `Err::Network` - The endpoint could not be reached.
    async fn resolve(&self, did: &str) -> Result<Resolution>;
}

/// Resolution result envelope.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resolution {
    /// The resolved identifier document.
    pub document: IdentifierDocument,
    /// Information about the driver that performed the resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver_metadata: Option<ResolverMetadata>,
}

/// Information about the resolution driver and timing.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverMetadata {
    /// Identifier of the resolution driver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    /// The driver implementation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// When the document was retrieved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved: Option<DateTime<Utc>>,
    /// How long the resolution took.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}
