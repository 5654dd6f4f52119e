//! Sidetree create-operation payloads: suffix data, patch data and the
//! commitments that bind an identifier to keys its owner has not yet revealed.

use base64ct::{Base64UrlUnpadded, Encoding};
use did_core::error::Err;
use did_core::{
    hashing, tracerr, Algorithm, Jwk, KeyPurpose, KeyType, Patch, PatchDocument, Result, Service,
    VerificationMethod,
};
use keystore::{CryptoOperations, CryptoProvider};
use serde::{Deserialize, Serialize};

use crate::{RECOVERY_KEY_REFERENCE, SIGNATURE_KEY_REFERENCE, UPDATE_KEY_REFERENCE};

/// Suffix data of a create operation: the content-addressed core of the
/// identifier. Immutable once computed.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuffixData {
    /// Hash of the canonical patch data.
    pub delta_hash: String,
    /// Commitment to the next recovery key.
    pub recovery_commitment: String,
}

/// Patch data of a create operation: the initial document state and the
/// commitment to the next update key. Immutable once computed.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchData {
    /// Commitment to the next update key.
    pub update_commitment: String,
    /// Patches describing the initial document state.
    pub patches: Vec<Patch>,
}

/// The complete create-operation payload submitted to a registrar and embedded
/// in a long-form DID.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationPayload {
    /// The operation's suffix data.
    pub suffix_data: SuffixData,
    /// The operation's patch data.
    pub patch_data: PatchData,
}

impl RegistrationPayload {
    /// Encode the payload as the two dot-joined base64url segments carried by
    /// a long-form DID's initial-state parameter.
    ///
    /// # Errors
    ///
    /// * Serialization error if either structure cannot be canonicalized.
    pub fn encode(&self) -> Result<String> {
        let suffix = Base64UrlUnpadded::encode_string(&hashing::canonical_json(&self.suffix_data)?);
        let patch = Base64UrlUnpadded::encode_string(&hashing::canonical_json(&self.patch_data)?);
        Ok(format!("{suffix}.{patch}"))
    }

    /// Decode a payload from its two-segment encoded form.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidFormat` - The input is not two base64url JSON segments.
    pub fn decode(encoded: &str) -> Result<Self> {
        let Some((suffix, patch)) = encoded.split_once('.') else {
            tracerr!(Err::InvalidFormat, "Initial state must have 2 segments");
        };
        let Ok(suffix_bytes) = Base64UrlUnpadded::decode_vec(suffix) else {
            tracerr!(Err::InvalidFormat, "Suffix data segment is not valid base64url");
        };
        let Ok(patch_bytes) = Base64UrlUnpadded::decode_vec(patch) else {
            tracerr!(Err::InvalidFormat, "Patch data segment is not valid base64url");
        };
        let Ok(suffix_data) = serde_json::from_slice::<SuffixData>(&suffix_bytes) else {
            tracerr!(Err::InvalidFormat, "Suffix data segment is not suffix data");
        };
        let Ok(patch_data) = serde_json::from_slice::<PatchData>(&patch_bytes) else {
            tracerr!(Err::InvalidFormat, "Patch data segment is not patch data");
        };
        Ok(Self {
            suffix_data,
            patch_data,
        })
    }

    /// The commitment to the next update key, for identifier construction.
    #[must_use]
    pub fn next_update_commitment(&self) -> &str {
        &self.patch_data.update_commitment
    }

    /// The commitment to the next recovery key, for identifier construction.
    #[must_use]
    pub fn next_recovery_commitment(&self) -> &str {
        &self.suffix_data.recovery_commitment
    }
}

/// Everything a create operation produces: the payload plus the public halves
/// of the keys it reveals.
#[derive(Clone, Debug)]
pub struct CreatePayload {
    /// The create-operation payload.
    pub registration: RegistrationPayload,
    /// The revealed signing key.
    pub signing_key: Jwk,
    /// The revealed recovery key.
    pub recovery_key: Jwk,
}

/// Compute the content-addressed unique suffix of an identifier. Deterministic:
/// identical suffix data always yields the identical suffix.
///
/// # Errors
///
/// * Serialization error if the suffix data cannot be canonicalized.
pub fn compute_unique_suffix(suffix_data: &SuffixData) -> Result<String> {
    hashing::hash_data(suffix_data)
}

/// Builds create-operation payloads. Generates the operation's four key pairs
/// through [`CryptoOperations`], computes the commitments and assembles the
/// suffix and patch data.
pub struct SidetreePayloadGenerator<'a, P>
where
    P: CryptoProvider,
{
    crypto: &'a CryptoOperations<P>,
}

impl<'a, P> SidetreePayloadGenerator<'a, P>
where
    P: CryptoProvider,
{
    /// Create a generator over the given crypto operations.
    #[must_use]
    pub fn new(crypto: &'a CryptoOperations<P>) -> Self {
        Self { crypto }
    }

    /// Generate the create-operation payload for a new identifier.
    ///
    /// Key generation is all-or-nothing from the caller's perspective: any
    /// failure is wrapped as `Err::PayloadGeneration` and no payload is
    /// returned.
    ///
    /// # Errors
    ///
    /// * `Err::PayloadGeneration` - Wraps any key generation or hashing
    ///   failure.
    pub fn generate_create_payload(
        &self,
        alias: &str,
        services: Option<&[Service]>,
    ) -> Result<CreatePayload> {
        match self.build(alias, services) {
            Ok(payload) => Ok(payload),
            Err(e) => tracerr!(Err::PayloadGeneration, "Failed to generate create payload: {}", e),
        }
    }

    fn build(&self, alias: &str, services: Option<&[Service]>) -> Result<CreatePayload> {
        let signing_ref = format!("{alias}-{SIGNATURE_KEY_REFERENCE}");
        let recovery_ref = format!("{alias}-{RECOVERY_KEY_REFERENCE}");

        let signing_key = self.crypto.generate_key_pair(&signing_ref, KeyType::EllipticCurve)?;
        let recovery_key = self.crypto.generate_key_pair(&recovery_ref, KeyType::EllipticCurve)?;

        // The committed keys stay unrevealed: fresh pairs, distinct from the
        // signing and recovery keys above, to be disclosed by a future update
        // or recovery operation.
        let next_update_key = self
            .crypto
            .generate_key_pair(&format!("{alias}-{UPDATE_KEY_REFERENCE}-next"), KeyType::EllipticCurve)?;
        let next_recovery_key = self
            .crypto
            .generate_key_pair(&format!("{alias}-{RECOVERY_KEY_REFERENCE}-next"), KeyType::EllipticCurve)?;

        let update_commitment = hashing::hash_commitment(&next_update_key)?;
        let recovery_commitment = hashing::hash_commitment(&next_recovery_key)?;

        let algorithm = signing_key.check(&[Algorithm::Secp256k1])?;
        let verification_method = VerificationMethod {
            id: hashing::rand_hex(8),
            type_: algorithm.cryptosuite(),
            public_key_jwk: Some(signing_key.clone()),
            purposes: Some(vec![KeyPurpose::Authentication, KeyPurpose::AssertionMethod]),
            ..Default::default()
        };

        let patch_data = PatchData {
            update_commitment,
            patches: vec![Patch::replace(PatchDocument {
                public_keys: Some(vec![verification_method]),
                service_endpoints: services.map(<[Service]>::to_vec),
            })],
        };

        let suffix_data = SuffixData {
            delta_hash: hashing::hash_data(&patch_data)?,
            recovery_commitment,
        };

        Ok(CreatePayload {
            registration: RegistrationPayload {
                suffix_data,
                patch_data,
            },
            signing_key,
            recovery_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use keystore::Secp256k1Provider;

    use super::*;

    fn generate() -> (CryptoOperations<Secp256k1Provider>, CreatePayload) {
        let crypto = CryptoOperations::new(Secp256k1Provider);
        let payload = SidetreePayloadGenerator::new(&crypto)
            .generate_create_payload("alice-3f2a", None)
            .expect("failed to generate payload");
        (crypto, payload)
    }

    #[test]
    fn payload_reveals_signing_key_only() {
        let (_, payload) = generate();
        let patches = &payload.registration.patch_data.patches;
        assert_eq!(patches.len(), 1);

        let doc = patches[0].document.as_ref().expect("expected document");
        let keys = doc.public_keys.as_ref().expect("expected keys");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].public_key_jwk.as_ref(), Some(&payload.signing_key));
        assert!(!payload.signing_key.is_private());
    }

    #[test]
    fn commitments_never_cover_revealed_keys() {
        let (_, payload) = generate();

        let signing_commitment =
            hashing::hash_commitment(&payload.signing_key).expect("failed to hash");
        let recovery_commitment =
            hashing::hash_commitment(&payload.recovery_key).expect("failed to hash");

        assert_ne!(payload.registration.next_update_commitment(), signing_commitment);
        assert_ne!(payload.registration.next_recovery_commitment(), recovery_commitment);
        assert_ne!(
            payload.registration.next_update_commitment(),
            payload.registration.next_recovery_commitment()
        );
    }

    #[test]
    fn delta_hash_commits_to_patch_data() {
        let (_, payload) = generate();
        let expected =
            hashing::hash_data(&payload.registration.patch_data).expect("failed to hash");
        assert_eq!(payload.registration.suffix_data.delta_hash, expected);
    }

    #[test]
    fn generation_stores_four_pairs() {
        let (crypto, _) = generate();
        let listing = crypto.key_store.list();
        assert_eq!(listing.len(), 4);
        for kids in listing.values() {
            assert_eq!(kids.len(), 2);
        }
        assert!(listing.contains_key("alice-3f2a-sig"));
        assert!(listing.contains_key("alice-3f2a-recovery"));
        assert!(listing.contains_key("alice-3f2a-update-next"));
        assert!(listing.contains_key("alice-3f2a-recovery-next"));
    }

    #[test]
    fn unique_suffix_is_deterministic() {
        let suffix_data = SuffixData {
            delta_hash: "EiBJVTvN2a3rkaSIjTI-necBT76cKAhoGurzHHkAxtOXSg".to_string(),
            recovery_commitment: "EiD6dUn33YPE3aX2Kg3MpGThwZyFCPL6FhUHNNdpSAGxgQ".to_string(),
        };
        let first = compute_unique_suffix(&suffix_data).expect("failed to compute");
        let second = compute_unique_suffix(&suffix_data).expect("failed to compute");
        assert_eq!(first, second);
        hashing::check_hash(&first).expect("suffix is not a valid multihash");

        let other = SuffixData {
            delta_hash: suffix_data.delta_hash.clone(),
            recovery_commitment: "EiAJ6AlLSijF08p3eXDCFv3kTpDKAcFkAIRmv3hASVjzeg".to_string(),
        };
        assert_ne!(first, compute_unique_suffix(&other).expect("failed to compute"));
    }

    #[test]
    fn encode_decode_round_trip() {
        let (_, payload) = generate();
        let encoded = payload.registration.encode().expect("failed to encode");
        assert_eq!(encoded.matches('.').count(), 1);

        let decoded = RegistrationPayload::decode(&encoded).expect("failed to decode");
        assert_eq!(decoded, payload.registration);
    }

    #[test]
    fn decode_rejects_garbage() {
        for input in ["no-segments", "bad.!!", "."] {
            let err = RegistrationPayload::decode(input).expect_err("expected error");
            assert!(err.is(&did_core::error::Err::InvalidFormat), "input: {input}");
        }
    }

    #[test]
    fn services_are_carried_into_patches() {
        let crypto = CryptoOperations::new(Secp256k1Provider);
        let services = vec![Service {
            id: "hub".to_string(),
            type_: "IdentityHub".to_string(),
            service_endpoint: "https://hub.example.com".to_string(),
        }];
        let payload = SidetreePayloadGenerator::new(&crypto)
            .generate_create_payload("bob-91c4", Some(&services))
            .expect("failed to generate payload");

        let doc = payload.registration.patch_data.patches[0]
            .document
            .as_ref()
            .expect("expected document");
        assert_eq!(doc.service_endpoints.as_deref(), Some(&services[..]));
    }
}
