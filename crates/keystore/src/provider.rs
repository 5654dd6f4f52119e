//! Pluggable signing and hashing provider. The default provider generates and
//! signs with secp256k1 keys; a remote KMS can be substituted by implementing
//! [`CryptoProvider`].

use base64ct::{Base64UrlUnpadded, Encoding};
use did_core::error::Err;
use did_core::{hashing, tracerr, Jwk, KeyType, Result};
use ecdsa::signature::{Signer as _, Verifier as _};
use ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::{Secp256k1, SecretKey};
use rand_core::OsRng;

/// A provider generates key pairs and signs, verifies and digests byte
/// buffers. Implementations hold no key material of their own; keys are passed
/// in as JWKs.
pub trait CryptoProvider {
    /// The kind of key this provider produces.
    fn key_type(&self) -> KeyType;

    /// Generate a fresh key pair, returned as `(public, private)` JWKs.
    ///
    /// # Errors
    ///
    /// An error if key generation or JWK conversion failed.
    fn generate(&self) -> Result<(Jwk, Jwk)>;

    /// Sign the message with the given private key.
    ///
    /// # Errors
    ///
    /// * `Err::SigningError` - The key could not sign the message.
    /// * `Err::InvalidKey` - The key material is malformed.
    fn sign(&self, key: &Jwk, msg: &[u8]) -> Result<Vec<u8>>;

    /// Verify a signature over the message with the given public key. A
    /// mismatched signature returns `Ok(false)`; only malformed input errors.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidKey` / `Err::InvalidFormat` - The key or signature bytes
    ///   could not be interpreted at all.
    fn verify(&self, key: &Jwk, msg: &[u8], signature: &[u8]) -> Result<bool>;

    /// Digest the data with the provider's content-addressing hash function.
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        hashing::hash_bytes(data)
    }
}

/// ECDSA provider using the secp256k1 curve (ES256K).
#[derive(Clone, Copy, Debug, Default)]
pub struct Secp256k1Provider;

impl CryptoProvider for Secp256k1Provider {
    fn key_type(&self) -> KeyType {
        KeyType::EllipticCurve
    }

    fn generate(&self) -> Result<(Jwk, Jwk)> {
        let secret = SecretKey::random(&mut OsRng);
        let private: Jwk = serde_json::from_str(&secret.to_jwk_string())?;
        let public: Jwk = serde_json::from_str(&secret.public_key().to_jwk_string())?;
        Ok((public, private))
    }

    fn sign(&self, key: &Jwk, msg: &[u8]) -> Result<Vec<u8>> {
        let Some(d) = &key.d else {
            tracerr!(Err::SigningError, "Signing key carries no secret material");
        };
        let d_bytes = match Base64UrlUnpadded::decode_vec(d) {
            Ok(b) => b,
            Err(e) => tracerr!(Err::InvalidKey, "Invalid secret key encoding: {}", e),
        };
        let signing_key: SigningKey<Secp256k1> = match SigningKey::from_slice(&d_bytes) {
            Ok(k) => k,
            Err(e) => tracerr!(Err::SigningError, "Error forming signing key: {}", e),
        };
        let signature: Signature<Secp256k1> = signing_key.sign(msg);
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, key: &Jwk, msg: &[u8], signature: &[u8]) -> Result<bool> {
        let vk = verifying_key(key)?;
        let sig = match Signature::<Secp256k1>::from_slice(signature) {
            Ok(s) => s,
            Err(e) => tracerr!(Err::InvalidFormat, "Error forming signature from bytes: {}", e),
        };
        Ok(vk.verify(msg, &sig).is_ok())
    }
}

// Reassemble a verifying key from the JWK's SEC1 coordinates.
fn verifying_key(key: &Jwk) -> Result<VerifyingKey<Secp256k1>> {
    let mut sec1 = vec![0x04];
    let mut x = match Base64UrlUnpadded::decode_vec(key.x.as_deref().unwrap_or_default()) {
        Ok(x) => x,
        Err(e) => tracerr!(Err::InvalidKey, "Error decoding x coordinate: {}", e),
    };
    sec1.append(&mut x);
    let mut y = match Base64UrlUnpadded::decode_vec(key.y.as_deref().unwrap_or_default()) {
        Ok(y) => y,
        Err(e) => tracerr!(Err::InvalidKey, "Error decoding y coordinate: {}", e),
    };
    sec1.append(&mut y);
    match VerifyingKey::from_sec1_bytes(&sec1) {
        Ok(vk) => Ok(vk),
        Err(e) => tracerr!(Err::InvalidKey, "Error forming verifying key from coordinates: {}", e),
    }
}
