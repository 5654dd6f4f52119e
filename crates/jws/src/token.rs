//! Signed JWS envelope: protected header, payload and signature.

use base64ct::{Base64UrlUnpadded, Encoding};
use did_core::error::Err;
use did_core::{hashing, tracerr, Jwk, Result};
use keystore::{CryptoOperations, CryptoProvider};
use serde::{Deserialize, Serialize};

/// Serialization formats for a JWS envelope.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JwsFormat {
    /// Dot-joined `protected.payload.signature` triple.
    Compact,
    /// Flattened JSON object with explicit `payload`, `protected` and
    /// `signature` fields.
    FlatJson,
}

/// Protected header of a JWS envelope. Only the fields DID operations need.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct JwsHeader {
    /// Signature algorithm used to sign the JWS. Derived from the signing key
    /// at signing time.
    #[serde(default)]
    pub alg: String,
    /// Key id of the signing key, for the verifier to resolve the public key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// The DID operation this token carries, such as `create`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

// Wire shape of the flat-JSON serialization.
#[derive(Deserialize, Serialize)]
struct FlatJws {
    payload: String,
    protected: String,
    signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<serde_json::Value>,
}

/// A signed JWS envelope. The protected header is retained as the exact
/// base64url segment produced at signing (or parsing) time so the signing
/// input can always be recomputed byte-for-byte.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JwsToken {
    header: JwsHeader,
    protected: String,
    payload: Vec<u8>,
    signature: Vec<u8>,
}

impl JwsToken {
    /// Sign `payload` with the key stored under `key_reference`, merging the
    /// caller-supplied header fields with the `alg` derived from the key.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - No signing key is stored under the name.
    /// * `Err::SigningError` - The provider failed to sign.
    pub fn sign<P>(
        crypto: &CryptoOperations<P>,
        key_reference: &str,
        payload: &[u8],
        mut header: JwsHeader,
    ) -> Result<Self>
    where
        P: CryptoProvider,
    {
        let signing_jwk = match crypto.key_store.get_private_key(key_reference) {
            Ok(key) => key.jwk,
            Err(_) => crypto.key_store.get_by_kid(key_reference)?.jwk,
        };
        header.alg = signing_jwk.infer_algorithm()?.to_string();

        let protected = Base64UrlUnpadded::encode_string(&hashing::canonical_json(&header)?);
        let input = signing_input(&protected, payload);
        let signature = crypto.sign(key_reference, &input)?;

        Ok(Self {
            header,
            protected,
            payload: payload.to_vec(),
            signature,
        })
    }

    /// Serialize the envelope.
    ///
    /// # Errors
    ///
    /// * `Err::SerializationError` - The flat-JSON object could not be built.
    pub fn serialize(&self, format: JwsFormat) -> Result<String> {
        let payload = Base64UrlUnpadded::encode_string(&self.payload);
        let signature = Base64UrlUnpadded::encode_string(&self.signature);
        match format {
            JwsFormat::Compact => Ok(format!("{}.{}.{}", self.protected, payload, signature)),
            JwsFormat::FlatJson => {
                let flat = FlatJws {
                    payload,
                    protected: self.protected.clone(),
                    signature,
                    header: None,
                };
                match serde_json::to_string(&flat) {
                    Ok(s) => Ok(s),
                    Err(e) => tracerr!(Err::SerializationError, "Failed to serialize JWS: {}", e),
                }
            }
        }
    }

    /// Parse an envelope from either serialization format.
    ///
    /// # Errors
    ///
    /// * `Err::MalformedToken` - The input is not structurally a JWS.
    pub fn deserialize(input: &str) -> Result<Self> {
        let input = input.trim();
        let (protected, payload, signature) = if input.starts_with('{') {
            let Ok(flat) = serde_json::from_str::<FlatJws>(input) else {
                tracerr!(Err::MalformedToken, "JWS JSON object is missing required fields");
            };
            (flat.protected, flat.payload, flat.signature)
        } else {
            let parts: Vec<&str> = input.split('.').collect();
            if parts.len() != 3 {
                tracerr!(
                    Err::MalformedToken,
                    "Compact JWS must have 3 segments, got {}",
                    parts.len()
                );
            }
            (parts[0].to_string(), parts[1].to_string(), parts[2].to_string())
        };

        let Ok(header_bytes) = Base64UrlUnpadded::decode_vec(&protected) else {
            tracerr!(Err::MalformedToken, "Protected header is not valid base64url");
        };
        let Ok(header) = serde_json::from_slice::<JwsHeader>(&header_bytes) else {
            tracerr!(Err::MalformedToken, "Protected header is not a JWS header");
        };
        let Ok(payload) = Base64UrlUnpadded::decode_vec(&payload) else {
            tracerr!(Err::MalformedToken, "Payload is not valid base64url");
        };
        let Ok(signature) = Base64UrlUnpadded::decode_vec(&signature) else {
            tracerr!(Err::MalformedToken, "Signature is not valid base64url");
        };

        Ok(Self {
            header,
            protected,
            payload,
            signature,
        })
    }

    /// Verify the signature against the resolved public key. The caller is
    /// responsible for resolving the key from the header's `kid`; the token
    /// does not trust an embedded key. A mismatch returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidKey` / `Err::InvalidFormat` - The key or signature bytes
    ///   could not be interpreted at all.
    pub fn verify<P>(&self, crypto: &CryptoOperations<P>, public_key: &Jwk) -> Result<bool>
    where
        P: CryptoProvider,
    {
        let input = signing_input(&self.protected, &self.payload);
        crypto.verify(public_key, &input, &self.signature)
    }

    /// The decoded payload. Callers deserialize this into their own content
    /// model.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.payload
    }

    /// The protected header.
    #[must_use]
    pub fn header(&self) -> &JwsHeader {
        &self.header
    }
}

// The JWS signing input: base64url(header) || "." || base64url(payload).
fn signing_input(protected: &str, payload: &[u8]) -> Vec<u8> {
    let payload = Base64UrlUnpadded::encode_string(payload);
    [protected.as_bytes(), b".", payload.as_bytes()].concat()
}
