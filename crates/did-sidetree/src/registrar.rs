//! Registrar boundary: submits a signed create operation to a Sidetree node's
//! registration endpoint.

use std::sync::Arc;
use std::time::Duration;

use did_core::error::Err;
use did_core::{hashing, tracerr, IdentifierDocument, Result};
use jws::{JwsFormat, JwsHeader, JwsToken};
use keystore::{CryptoOperations, CryptoProvider};
use url::Url;

use crate::payload::RegistrationPayload;
use crate::{CREATE_OPERATION, METHOD_NAME};

/// A registrar submits DID operations to a node that accepts them. No retry is
/// performed internally; retries are a caller policy decision.
#[allow(async_fn_in_trait)]
pub trait Registrar {
    /// Sign and submit a create operation, returning the registered document.
    ///
    /// # Errors
    ///
    /// * `Err::Registration` - The endpoint rejected the operation.
    /// * `Err::Timeout` / `Err::Network` - The endpoint could not be reached.
    async fn register(
        &self,
        payload: &RegistrationPayload,
        signature_key_ref: &str,
    ) -> Result<IdentifierDocument>;

    /// Declare the DID method for this registrar.
    fn method(&self) -> &str;
}

/// Registrar implementation for the Sidetree network.
pub struct SidetreeRegistrar<P>
where
    P: CryptoProvider,
{
    base_url: String,
    /// Reusable HTTP client, configured with an explicit timeout.
    http_client: reqwest::Client,
    crypto: Arc<CryptoOperations<P>>,
}

impl<P> SidetreeRegistrar<P>
where
    P: CryptoProvider,
{
    /// Create a registrar for the given registration endpoint.
    pub fn new(base_url: &str, crypto: Arc<CryptoOperations<P>>, timeout: Duration) -> Self {
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
            base_url: base_url.to_string(),
            http_client,
            crypto,
        }
    }
}

impl<P> Registrar for SidetreeRegistrar<P>
where
    P: CryptoProvider,
{
    async fn register(
        &self,
        payload: &RegistrationPayload,
        signature_key_ref: &str,
    ) -> Result<IdentifierDocument> {
        let content = hashing::canonical_json(payload)?;
        let public = self.crypto.key_store.get_public_key(signature_key_ref)?;

        let token = JwsToken::sign(
            &self.crypto,
            signature_key_ref,
            &content,
            JwsHeader {
                kid: Some(public.kid.clone()),
                operation: Some(CREATE_OPERATION.to_string()),
                ..Default::default()
            },
        )?;
        // check our own envelope before it leaves the process
        if !token.verify(&self.crypto, &public.jwk)? {
            tracerr!(Err::SigningError, "Signed create operation failed self-verification");
        }
        let body = token.serialize(JwsFormat::FlatJson)?;

        let url = match Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(e) => tracerr!(Err::InvalidFormat, "Invalid registration endpoint: {}", e),
        };
        let res = match self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) if e.is_timeout() => {
                tracerr!(Err::Timeout, "Registration request timed out: {}", e)
            }
            Err(e) => tracerr!(Err::Network, "Failed to submit registration request: {}", e),
        };

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracerr!(
                Err::Registration {
                    status: status.as_u16(),
                    body: body.clone(),
                },
                "Registration rejected with status {}: {}",
                status,
                body
            );
        }
        match res.json::<IdentifierDocument>().await {
            Ok(doc) => Ok(doc),
            Err(e) => {
                tracerr!(Err::DeserializationError, "Failed to parse registration response: {}", e)
            }
        }
    }

    fn method(&self) -> &str {
        METHOD_NAME
    }
}
