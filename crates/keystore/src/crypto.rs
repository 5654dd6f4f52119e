//! Crypto operations over the key store: key pair generation, signing and
//! verification with a pluggable provider.

use did_core::error::Err;
use did_core::{tracerr, Jwk, KeyType, Result};

use crate::provider::CryptoProvider;
use crate::store::{InMemoryKeyStore, Key, KeyKind};

/// Generates, stores and uses key material through the configured provider.
/// Key generation and signing are CPU-bound and synchronous; the store
/// serializes concurrent access internally.
pub struct CryptoOperations<P>
where
    P: CryptoProvider,
{
    /// The backing key store.
    pub key_store: InMemoryKeyStore,
    provider: P,
}

impl<P> CryptoOperations<P>
where
    P: CryptoProvider,
{
    /// Create crypto operations around a fresh in-memory key store.
    pub fn new(provider: P) -> Self {
        Self {
            key_store: InMemoryKeyStore::new(),
            provider,
        }
    }

    /// Generate a fresh key pair, store both halves under `reference` and
    /// return the public half.
    ///
    /// # Errors
    ///
    /// * `Err::UnsupportedKeyType` - The provider cannot produce the requested
    ///   key type.
    /// * `Err::DuplicateKeyId` - A different key with the same kid exists.
    pub fn generate_key_pair(&self, reference: &str, key_type: KeyType) -> Result<Jwk> {
        if key_type != self.provider.key_type() {
            tracerr!(Err::UnsupportedKeyType, "Provider cannot produce {} key pairs", key_type);
        }
        let (public, private) = self.provider.generate()?;
        let public_key = Key::new(KeyKind::Public, key_type, public.clone())?;
        let private_key = Key::new(KeyKind::Private, key_type, private)?;
        self.key_store.save(reference, public_key)?;
        self.key_store.save(reference, private_key)?;
        Ok(public)
    }

    /// Sign `data` with the private key stored under the given logical
    /// reference, or, failing that, the given kid.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - Nothing signable is stored under the name.
    /// * `Err::SigningError` - The provider failed to sign.
    pub fn sign(&self, reference_or_kid: &str, data: &[u8]) -> Result<Vec<u8>> {
        let key = self.private_key(reference_or_kid)?;
        self.provider.sign(&key.jwk, data)
    }

    /// Verify a signature over `data` with the given public key. A mismatched
    /// signature returns `Ok(false)`; only malformed input errors.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidKey` / `Err::InvalidFormat` - The key or signature bytes
    ///   could not be interpreted.
    pub fn verify(&self, public_key: &Jwk, data: &[u8], signature: &[u8]) -> Result<bool> {
        self.provider.verify(public_key, data, signature)
    }

    /// Digest data with the provider's content-addressing hash function.
    #[must_use]
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        self.provider.digest(data)
    }

    // Resolve a private key by logical reference first, content-derived kid
    // second.
    fn private_key(&self, reference_or_kid: &str) -> Result<Key> {
        if let Ok(container) = self.key_store.get_by_reference(reference_or_kid) {
            if let Some(key) = container.latest_of(KeyKind::Private) {
                return Ok(key.clone());
            }
        }
        let key = self.key_store.get_by_kid(reference_or_kid)?;
        if key.kind != KeyKind::Private {
            tracerr!(Err::KeyNotFound, "Key {} is not a signing key", reference_or_kid);
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Secp256k1Provider;

    fn crypto() -> CryptoOperations<Secp256k1Provider> {
        CryptoOperations::new(Secp256k1Provider)
    }

    #[test]
    fn generate_stores_both_halves() {
        let crypto = crypto();
        let public = crypto
            .generate_key_pair("persona-sig", KeyType::EllipticCurve)
            .expect("failed to generate");

        let container = crypto.key_store.get_by_reference("persona-sig").expect("no container");
        assert_eq!(container.keys.len(), 2);

        let public_key = crypto.key_store.get_public_key("persona-sig").expect("no public key");
        let private_key = crypto.key_store.get_private_key("persona-sig").expect("no private key");
        assert_eq!(public_key.jwk, public);
        assert_ne!(public_key.kid, private_key.kid);

        // both halves are reachable through the kid index too
        assert_eq!(crypto.key_store.get_by_kid(&public_key.kid).expect("no key").jwk, public);
        assert!(crypto.key_store.get_by_kid(&private_key.kid).expect("no key").jwk.is_private());
    }

    #[test]
    fn unsupported_key_type() {
        let crypto = crypto();
        let err =
            crypto.generate_key_pair("persona-enc", KeyType::Rsa).expect_err("expected error");
        assert!(err.is(&Err::UnsupportedKeyType));
        assert!(crypto.key_store.get_by_reference("persona-enc").is_err());
    }

    #[test]
    fn sign_by_reference_and_by_kid() {
        let crypto = crypto();
        let public =
            crypto.generate_key_pair("persona-sig", KeyType::EllipticCurve).expect("failed");
        let msg = b"signing input";

        let by_ref = crypto.sign("persona-sig", msg).expect("failed to sign");
        assert!(crypto.verify(&public, msg, &by_ref).expect("failed to verify"));

        let kid = crypto.key_store.get_private_key("persona-sig").expect("no key").kid;
        let by_kid = crypto.sign(&kid, msg).expect("failed to sign");
        assert!(crypto.verify(&public, msg, &by_kid).expect("failed to verify"));
    }

    #[test]
    fn sign_with_unknown_reference() {
        let crypto = crypto();
        let err = crypto.sign("missing", b"data").expect_err("expected error");
        assert!(err.is(&Err::KeyNotFound));
    }

    #[test]
    fn signing_with_a_public_kid_is_not_found() {
        let crypto = crypto();
        crypto.generate_key_pair("persona-sig", KeyType::EllipticCurve).expect("failed");
        let kid = crypto.key_store.get_public_key("persona-sig").expect("no key").kid;
        let err = crypto.sign(&kid, b"data").expect_err("expected error");
        assert!(err.is(&Err::KeyNotFound));
    }

    #[test]
    fn digest_is_sha256() {
        let crypto = crypto();
        assert_eq!(crypto.digest(b"data"), did_core::hashing::hash_bytes(b"data"));
    }
}
