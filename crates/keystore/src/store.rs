//! In-memory key store. Keys are addressable two ways: by the logical
//! reference they were saved under and by their content-derived key id. Both
//! indices are kept behind a single lock so they can never be observed
//! half-updated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use did_core::error::Err;
use did_core::{hashing, tracerr, Jwk, KeyType, Result};

/// Which half of a key pair a stored key is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyKind {
    /// The public half.
    Public,
    /// The private half.
    Private,
}

/// A single stored key: one half of a generated pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Key {
    /// Content-derived key id: the base64url multihash of the key's canonical
    /// JSON. The private half hashes its secret material too, so the two
    /// halves of a pair never share a kid.
    pub kid: String,
    /// Which half of the pair this is.
    pub kind: KeyKind,
    /// The kind of key the provider generated.
    pub key_type: KeyType,
    /// The key material.
    pub jwk: Jwk,
}

impl Key {
    /// Wrap key material, deriving its kid.
    ///
    /// # Errors
    ///
    /// * Serialization error if the key cannot be canonicalized for hashing.
    pub fn new(kind: KeyKind, key_type: KeyType, jwk: Jwk) -> Result<Self> {
        let kid = hashing::hash_data(&jwk)?;
        Ok(Self {
            kid,
            kind,
            key_type,
            jwk,
        })
    }
}

/// An ordered sequence of keys sharing a logical reference. Saving under the
/// same reference appends; rotation is modeled as a new entry, never an
/// in-place update.
#[derive(Clone, Debug, Default)]
pub struct KeyContainer {
    /// The keys, in insertion order.
    pub keys: Vec<Key>,
}

impl KeyContainer {
    /// The most recently saved key of the given kind, if any.
    #[must_use]
    pub fn latest_of(&self, kind: KeyKind) -> Option<&Key> {
        self.keys.iter().rev().find(|k| k.kind == kind)
    }
}

#[derive(Default)]
struct Indices {
    containers: HashMap<String, KeyContainer>,
    by_kid: HashMap<String, Key>,
}

/// In-memory key store with two indices over the same key set:
/// `reference → KeyContainer` and `kid → Key`. Performs no I/O and no
/// cryptography.
#[derive(Clone, Default)]
pub struct InMemoryKeyStore {
    indices: Arc<Mutex<Indices>>,
}

impl InMemoryKeyStore {
    /// Create an empty key store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` to the container for `reference`, creating the container
    /// if absent, and index the key by its kid.
    ///
    /// # Errors
    ///
    /// * `Err::DuplicateKeyId` - A different key is already stored under the
    ///   same kid.
    pub fn save(&self, reference: &str, key: Key) -> Result<()> {
        let mut indices = self.indices.lock().expect("lock on key store indices failed");
        if let Some(existing) = indices.by_kid.get(&key.kid) {
            if existing.jwk != key.jwk {
                tracerr!(Err::DuplicateKeyId, "Key id {} maps to different key material", key.kid);
            }
        }
        indices.by_kid.insert(key.kid.clone(), key.clone());
        indices.containers.entry(reference.to_string()).or_default().keys.push(key);
        Ok(())
    }

    /// The key container for a logical reference.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - The reference is unknown.
    pub fn get_by_reference(&self, reference: &str) -> Result<KeyContainer> {
        let indices = self.indices.lock().expect("lock on key store indices failed");
        match indices.containers.get(reference) {
            Some(container) => Ok(container.clone()),
            None => tracerr!(Err::KeyNotFound, "No keys stored under reference {}", reference),
        }
    }

    /// The key with the given key id.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - No key has the kid.
    pub fn get_by_kid(&self, kid: &str) -> Result<Key> {
        let indices = self.indices.lock().expect("lock on key store indices failed");
        match indices.by_kid.get(kid) {
            Some(key) => Ok(key.clone()),
            None => tracerr!(Err::KeyNotFound, "No key stored with kid {}", kid),
        }
    }

    /// The most recently saved public key under a reference.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - The reference is unknown or holds no public key.
    pub fn get_public_key(&self, reference: &str) -> Result<Key> {
        let container = self.get_by_reference(reference)?;
        match container.latest_of(KeyKind::Public) {
            Some(key) => Ok(key.clone()),
            None => tracerr!(Err::KeyNotFound, "No public key stored under reference {}", reference),
        }
    }

    /// The most recently saved private key under a reference.
    ///
    /// # Errors
    ///
    /// * `Err::KeyNotFound` - The reference is unknown or holds no private key.
    pub fn get_private_key(&self, reference: &str) -> Result<Key> {
        let container = self.get_by_reference(reference)?;
        match container.latest_of(KeyKind::Private) {
            Some(key) => Ok(key.clone()),
            None => {
                tracerr!(Err::KeyNotFound, "No private key stored under reference {}", reference)
            }
        }
    }

    /// Snapshot of all stored keys: reference to the kids saved under it, in
    /// insertion order.
    #[must_use]
    pub fn list(&self) -> HashMap<String, Vec<String>> {
        let indices = self.indices.lock().expect("lock on key store indices failed");
        indices
            .containers
            .iter()
            .map(|(r, c)| (r.clone(), c.keys.iter().map(|k| k.kid.clone()).collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwk(x: &str) -> Jwk {
        Jwk {
            kty: "EC".to_string(),
            crv: Some("secp256k1".to_string()),
            x: Some(x.to_string()),
            y: Some("IH_q19UKDu_jkIwtehWU7NiaXk7CaGoD-XRcuuqcgQ0".to_string()),
            ..Default::default()
        }
    }

    fn test_key(kind: KeyKind, x: &str) -> Key {
        Key::new(kind, KeyType::EllipticCurve, test_jwk(x)).expect("failed to wrap key")
    }

    #[test]
    fn save_and_retrieve_by_reference_and_kid() {
        let store = InMemoryKeyStore::new();
        let key = test_key(KeyKind::Public, "XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw");
        store.save("persona-sig", key.clone()).expect("failed to save");

        let container = store.get_by_reference("persona-sig").expect("reference not found");
        assert_eq!(container.keys.len(), 1);
        assert_eq!(container.keys[0], key);

        let by_kid = store.get_by_kid(&key.kid).expect("kid not found");
        assert_eq!(by_kid, key);
    }

    #[test]
    fn halves_of_a_pair_get_distinct_kids() {
        let public = test_key(KeyKind::Public, "XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw");
        let private = Key::new(
            KeyKind::Private,
            KeyType::EllipticCurve,
            Jwk {
                d: Some("CB6W6NKEuI4uiYiyM2CM4YzczOYXdx-ykAe5rlZaB-Q".to_string()),
                ..test_jwk("XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw")
            },
        )
        .expect("failed to wrap key");

        assert_ne!(public.kid, private.kid);

        let store = InMemoryKeyStore::new();
        store.save("persona-sig", public.clone()).expect("failed to save");
        store.save("persona-sig", private.clone()).expect("failed to save");
        assert_eq!(store.get_by_kid(&public.kid).expect("kid not found").jwk, public.jwk);
        assert_eq!(store.get_by_kid(&private.kid).expect("kid not found").jwk, private.jwk);
        assert_eq!(store.get_public_key("persona-sig").expect("no public key"), public);
        assert_eq!(store.get_private_key("persona-sig").expect("no private key"), private);
    }

    #[test]
    fn save_is_additive_in_insertion_order() {
        let store = InMemoryKeyStore::new();
        let first = test_key(KeyKind::Public, "XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw");
        let second = test_key(KeyKind::Public, "smmFWI4qLfWztIzwurLCvjjw7guNZvN99ai2oTXGUtc");
        store.save("rotated", first.clone()).expect("failed to save");
        store.save("rotated", second.clone()).expect("failed to save");
        // identical material appends again, nothing is overwritten
        store.save("rotated", second.clone()).expect("failed to save");

        let container = store.get_by_reference("rotated").expect("reference not found");
        let kids: Vec<&str> = container.keys.iter().map(|k| k.kid.as_str()).collect();
        assert_eq!(kids, vec![&first.kid, &second.kid, &second.kid]);
        assert_eq!(container.latest_of(KeyKind::Public), Some(&second));
    }

    #[test]
    fn duplicate_kid_with_different_material_is_rejected() {
        let store = InMemoryKeyStore::new();
        let key = test_key(KeyKind::Public, "XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw");
        store.save("persona-sig", key.clone()).expect("failed to save");

        let mut imposter = test_key(KeyKind::Public, "smmFWI4qLfWztIzwurLCvjjw7guNZvN99ai2oTXGUtc");
        imposter.kid = key.kid.clone();
        let err = store.save("other", imposter).expect_err("expected error");
        assert!(err.is(&Err::DuplicateKeyId));

        // the failed save left no trace under the other reference
        assert!(store.get_by_reference("other").is_err());
    }

    #[test]
    fn unknown_lookups_fail() {
        let store = InMemoryKeyStore::new();
        assert!(store.get_by_reference("missing").expect_err("expected error").is(&Err::KeyNotFound));
        assert!(store.get_by_kid("missing").expect_err("expected error").is(&Err::KeyNotFound));
    }

    #[test]
    fn list_snapshots_references_and_kids() {
        let store = InMemoryKeyStore::new();
        let a = test_key(KeyKind::Public, "XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw");
        let b = test_key(KeyKind::Public, "smmFWI4qLfWztIzwurLCvjjw7guNZvN99ai2oTXGUtc");
        store.save("one", a.clone()).expect("failed to save");
        store.save("one", b.clone()).expect("failed to save");
        store.save("two", b.clone()).expect("failed to save");

        let listing = store.list();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing["one"], vec![a.kid.clone(), b.kid.clone()]);
        assert_eq!(listing["two"], vec![b.kid]);
    }
}
