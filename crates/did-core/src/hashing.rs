//! Canonical JSON serialization, base64url-encoded multihashing and random
//! reference generation. Every commitment, key id and unique suffix in the
//! client is derived through these functions, so hash inputs are reproducible
//! byte-for-byte across implementations.

use base64ct::{Base64UrlUnpadded, Encoding};
use multihash::Multihash;
use olpc_cjson::CanonicalFormatter;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Err;
use crate::{tracerr, Result};

/// Multihash algorithm code for SHA2-256.
pub const SHA2_256: u64 = 0x12;

/// Serialize the provided data to canonical JSON: deterministic key ordering,
/// no insignificant whitespace.
/// See [JSON Canonicalization Scheme (JCS)](https://identity.foundation/JCS/) for details.
///
/// # Errors
///
/// * Serialization error if the data cannot be serialized.
pub fn canonical_json(data: &impl Serialize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter::new());
    data.serialize(&mut ser)?;
    Ok(buf)
}

/// Transforms the provided data into a base64url-encoded multihash. It creates
/// canonical JSON, multi-hashes it using SHA256, and then base64url-encodes the
/// result. Used for unique suffixes, delta hashes and key id derivation.
///
/// # Errors
///
/// * Serialization error if the data cannot be serialized.
/// * Multi-hash error if the data cannot be hashed.
pub fn hash_data(data: &impl Serialize) -> Result<String> {
    let buf = canonical_json(data)?;
    let multi = multi_hash(&buf, SHA2_256)?;
    Ok(Base64UrlUnpadded::encode_string(&multi))
}

/// Hash a public key into a commitment by hashing the canonical JSON
/// representation and then multi-hashing the hash. The extra digest keeps the
/// committed key unrecoverable until its owner chooses to reveal it.
///
/// # Errors
///
/// * Serialization error if the public key cannot be serialized.
/// * Multi-hash error if the public key cannot be hashed.
pub fn hash_commitment(data: &impl Serialize) -> Result<String> {
    let buf = canonical_json(data)?;
    let hashed = hash_bytes(&buf);
    let multi = multi_hash(&hashed, SHA2_256)?;
    Ok(Base64UrlUnpadded::encode_string(&multi))
}

/// Hashes the provided data using SHA256.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Multi-hashes the provided data, prepending the self-describing
/// `{algorithm code, digest length}` header to the digest.
///
/// # Errors
///
/// * Multi-hash error if the digest cannot be wrapped.
pub fn multi_hash(data: &[u8], code: u64) -> Result<Vec<u8>> {
    let hashed = hash_bytes(data);
    let mhash = Multihash::<64>::wrap(code, &hashed)?;
    Ok(mhash.to_bytes())
}

/// Check the provided string is a valid base64url-encoded multi-hash.
///
/// # Errors
///
/// * `InvalidHash` - The hash is not a valid multi-hash.
pub fn check_hash(hash: &str) -> Result<()> {
    let decoded = Base64UrlUnpadded::decode_vec(hash)?;
    let wrapped = Multihash::<64>::from_bytes(&decoded)?;
    if wrapped.code() != SHA2_256 {
        tracerr!(Err::InvalidHash, "Invalid hash code: {}", wrapped.code());
    }
    Ok(())
}

/// Random hex string generator, used for aliases and key ids.
#[must_use]
pub fn rand_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    let mut rng = StdRng::from_entropy();
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Jwk;

    #[test]
    fn multi_hash_ok() {
        let data = b"Hello, world!";

        let mhash = multi_hash(data, SHA2_256).expect("failed to create multi-hash");
        let wrapped = Multihash::<64>::from_bytes(&mhash).expect("failed to wrap multi-hash");

        let mut sha = Sha256::new();
        sha.update(data);
        let hash = sha.finalize();

        assert_eq!(wrapped.code(), SHA2_256);
        assert_eq!(wrapped.digest(), &hash[..]);
    }

    #[test]
    fn hash_data_deterministic() {
        #[derive(Serialize)]
        struct Msg {
            msg: String,
        }
        let data = Msg {
            msg: "Hello, world!".to_string(),
        };

        let first = hash_data(&data).expect("failed to create multi-hash");
        let second = hash_data(&data).expect("failed to create multi-hash");
        assert_eq!(first, second);

        let decoded = Base64UrlUnpadded::decode_vec(&first).expect("failed to decode hash");
        let wrapped = Multihash::<64>::from_bytes(&decoded).expect("failed to wrap multi-hash");
        assert_eq!(wrapped.code(), SHA2_256);

        // no padding, URL-safe alphabet
        assert!(!first.contains('='));
        assert!(!first.contains('+'));
        assert!(!first.contains('/'));
    }

    #[test]
    fn commitment_differs_from_data_hash() {
        let key = Jwk {
            kty: "EC".to_string(),
            crv: Some("secp256k1".to_string()),
            x: Some("XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw".to_string()),
            y: Some("IH_q19UKDu_jkIwtehWU7NiaXk7CaGoD-XRcuuqcgQ0".to_string()),
            ..Default::default()
        };

        let commitment = hash_commitment(&key).expect("failed to hash commitment");
        let plain = hash_data(&key).expect("failed to hash data");
        assert_ne!(commitment, plain);
        check_hash(&commitment).expect("commitment is not a valid multihash");
    }

    #[test]
    fn check_hash_rejects_garbage() {
        assert!(check_hash("not-a-multihash").is_err());
        // raw base64 of a bare digest is missing the multihash header
        let bare = Base64UrlUnpadded::encode_string(&hash_bytes(b"data"));
        assert!(check_hash(&bare).is_err());
    }

    #[test]
    fn rand_hex_len() {
        let hex = rand_hex(8);
        assert_eq!(hex.len(), 16);
        assert_ne!(hex, rand_hex(8));
    }
}
