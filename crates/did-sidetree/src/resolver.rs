//! Resolver boundary: fetches identifier documents from a remote resolver
//! over HTTP, and reconstructs them locally from self-certifying long-form
//! DIDs.

use std::time::Duration;

use did_core::error::Err;
use did_core::{
    hashing, tracerr, IdentifierDocument, Resolution, Resolver, Result, DID_CONTEXT,
};
use reqwest::StatusCode;
use url::Url;

use crate::payload::{compute_unique_suffix, RegistrationPayload};
use crate::INITIAL_STATE_PARAM;

/// Fetches identifier documents from a remote resolver over HTTP. A long-form
/// DID carries its initial state in the DID string itself, so it resolves even
/// before the operation is anchored.
pub struct HttpResolver {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpResolver {
    /// Create a resolver for the given resolution endpoint.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client.");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }
}

impl Resolver for HttpResolver {
    async fn resolve(&self, did: &str) -> Result<Resolution> {
        let url = match Url::parse(&format!("{}/{}", self.base_url, did)) {
            Ok(url) => url,
            Err(e) => tracerr!(Err::InvalidFormat, "Invalid resolution request: {}", e),
        };
        let res = match self.http_client.get(url).send().await {
            Ok(res) => res,
            Err(e) if e.is_timeout() => {
                tracerr!(Err::Timeout, "Resolution request timed out: {}", e)
            }
            Err(e) => tracerr!(Err::Network, "Failed to call resolution endpoint: {}", e),
        };

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            tracerr!(Err::NotFound, "No document found for {}", did);
        }
        if !status.is_success() {
            tracerr!(
                Err::Resolution {
                    status: status.as_u16(),
                },
                "Resolution failed with status {}",
                status
            );
        }
        match res.json::<Resolution>().await {
            Ok(resolution) => Ok(resolution),
            Err(e) => {
                tracerr!(Err::DeserializationError, "Failed to parse resolution response: {}", e)
            }
        }
    }
}

/// The state embedded in a long-form DID: the reconstructed document and the
/// create-operation payload it came from.
#[derive(Clone, Debug)]
pub struct InitialState {
    /// The document the DID resolves to.
    pub document: IdentifierDocument,
    /// The embedded create-operation payload.
    pub registration: RegistrationPayload,
}

/// Reconstruct the identifier document for a long-form DID without network
/// access. The DID is self-certifying: the unique suffix must match the
/// embedded suffix data and the patch data must match its committed hash.
///
/// # Errors
///
/// * `Err::InvalidFormat` - The DID carries no parseable initial state.
/// * `Err::InvalidHash` - The embedded state does not match its commitments.
pub fn reconstruct_document(did: &str) -> Result<InitialState> {
    let Some((short_form, query)) = did.split_once('?') else {
        tracerr!(Err::InvalidFormat, "Not a long-form DID: {}", did);
    };
    let mut prefix = String::from(INITIAL_STATE_PARAM);
    prefix.push('=');
    let Some(initial_state) = query.strip_prefix(&prefix) else {
        tracerr!(Err::InvalidFormat, "Long-form DID carries no initial state: {}", did);
    };

    let registration = RegistrationPayload::decode(initial_state)?;

    let suffix = compute_unique_suffix(&registration.suffix_data)?;
    if short_form.rsplit(':').next() != Some(suffix.as_str()) {
        tracerr!(Err::InvalidHash, "DID suffix does not match embedded suffix data");
    }
    if hashing::hash_data(&registration.patch_data)? != registration.suffix_data.delta_hash {
        tracerr!(Err::InvalidHash, "Patch data does not match committed delta hash");
    }

    let mut document = IdentifierDocument {
        context: Some(vec![DID_CONTEXT.to_string()]),
        id: did.to_string(),
        ..Default::default()
    };
    document.apply_patches(&registration.patch_data.patches);

    Ok(InitialState {
        document,
        registration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstruct_rejects_short_form() {
        let err = reconstruct_document("did:ion:EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg")
            .expect_err("expected error");
        assert!(err.is(&Err::InvalidFormat));
    }

    #[test]
    fn reconstruct_rejects_foreign_parameter() {
        let err = reconstruct_document("did:ion:EiDyOQbbZAa3aiRzeCkV7LOx3SERjjH93EXoIM3UoN4oWg?other=x")
            .expect_err("expected error");
        assert!(err.is(&Err::InvalidFormat));
    }
}
