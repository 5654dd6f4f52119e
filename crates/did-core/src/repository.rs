//! Storage seam for identifier records. The client treats the repository as a
//! simple key-value lookup keyed by a well-known name and by DID string; the
//! storage engine behind it is an integration concern.

use crate::identifier::Identifier;
use crate::Result;

/// Identifier record storage.
#[allow(async_fn_in_trait)]
pub trait Repository {
    /// Look up an identifier record by its well-known name.
    ///
    /// # Errors
    ///
    /// An error if the underlying store failed; `Ok(None)` if no record exists.
    async fn query_by_name(&self, name: &str) -> Result<Option<Identifier>>;

    /// Look up an identifier record by its DID string.
    ///
    /// # Errors
    ///
    /// An error if the underlying store failed; `Ok(None)` if no record exists.
    async fn query_by_id(&self, did: &str) -> Result<Option<Identifier>>;

    /// Persist an identifier record.
    ///
    /// # Errors
    ///
    /// An error if the record could not be written.
    async fn insert(&self, identifier: &Identifier) -> Result<()>;
}
