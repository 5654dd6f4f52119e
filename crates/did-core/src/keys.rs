//! Cryptographic key types shared by the key store, signer and payload
//! generation.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::{tracerr, Result};

/// Simplified JSON Web Key (JWK) key structure.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Jwk {
    /// Key type.
    pub kty: String,
    /// Cryptographic curve type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// X coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// Y coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Secret key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

impl Jwk {
    /// Attempt to match the key parameters to one of the supported signing
    /// algorithms.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidKey` - The key structure cannot be interpreted to a
    ///   supported format.
    pub fn infer_algorithm(&self) -> Result<Algorithm> {
        match (self.kty.as_str(), self.crv.as_deref()) {
            ("EC", Some("secp256k1")) => Ok(Algorithm::Secp256k1),
            _ => tracerr!(Err::InvalidKey, "Unknown key type and curve combination"),
        }
    }

    /// Check that the structure of the key is valid for one of the specified
    /// signing schemes and return the algorithm type.
    ///
    /// # Errors
    ///
    /// * `Err::InvalidKey` - The key structure is invalid.
    /// * `Err::UnsupportedAlgorithm` - The algorithm inferred from the key
    ///   structure is not included in the set of algorithms to check against.
    pub fn check(&self, schemes: &[Algorithm]) -> Result<Algorithm> {
        let scheme = self.infer_algorithm()?;
        if !schemes.contains(&scheme) {
            tracerr!(Err::UnsupportedAlgorithm, "Unsupported signing algorithm on key");
        }
        match scheme {
            Algorithm::Secp256k1 => {
                self.check_coordinate(self.x.as_deref(), "x")?;
                self.check_coordinate(self.y.as_deref(), "y")?;
            }
        }
        Ok(scheme)
    }

    // A secp256k1 coordinate must be present and decode to exactly 32 bytes.
    fn check_coordinate(&self, coord: Option<&str>, name: &str) -> Result<()> {
        let Some(coord) = coord else {
            tracerr!(Err::InvalidKey, "Missing {} coordinate", name);
        };
        match Base64UrlUnpadded::decode_vec(coord) {
            Ok(raw) => {
                if raw.len() != 32 {
                    tracerr!(
                        Err::InvalidKey,
                        "Invalid {} coordinate length. Expected 32 bytes, got {}",
                        name,
                        raw.len()
                    );
                }
            }
            Err(e) => tracerr!(Err::InvalidKey, "Invalid {} coordinate encoding: {}", name, e),
        }
        Ok(())
    }

    /// The public half of this key: the same key with any secret material
    /// removed.
    #[must_use]
    pub fn to_public(&self) -> Jwk {
        Jwk {
            d: None,
            ..self.clone()
        }
    }

    /// Whether this key carries secret material.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }
}

/// Kinds of key the crypto provider can be asked to generate. Carried over
/// from the WebCrypto model the key store fronts; the default provider only
/// produces elliptic curve keys.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum KeyType {
    /// Elliptic curve key pair.
    EllipticCurve,
    /// RSA key pair.
    Rsa,
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::EllipticCurve => write!(f, "EC"),
            KeyType::Rsa => write!(f, "RSA"),
        }
    }
}

/// Types of key signature algorithm supported by the client.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Algorithm {
    /// ECDSA using the secp256k1 curve.
    Secp256k1,
}

/// Key signature type display label (the JOSE `alg` value).
impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Secp256k1 => write!(f, "ES256K"),
        }
    }
}

impl Algorithm {
    /// Get the verification method type for the specified key signature type.
    #[must_use]
    pub fn cryptosuite(&self) -> String {
        match self {
            Algorithm::Secp256k1 => "EcdsaSecp256k1VerificationKey2019".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_key() -> Jwk {
        Jwk {
            kty: "EC".to_string(),
            crv: Some("secp256k1".to_string()),
            x: Some("XFl4fd9n4qp2Gcc2_oqqUsI3uT63o3Jt0f54DiNOijw".to_string()),
            y: Some("IH_q19UKDu_jkIwtehWU7NiaXk7CaGoD-XRcuuqcgQ0".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn infer_and_check() {
        let key = public_key();
        assert_eq!(key.infer_algorithm().unwrap(), Algorithm::Secp256k1);
        assert_eq!(key.check(&[Algorithm::Secp256k1]).unwrap(), Algorithm::Secp256k1);
        assert_eq!(Algorithm::Secp256k1.to_string(), "ES256K");
    }

    #[test]
    fn check_rejects_bad_coordinate() {
        let mut key = public_key();
        key.y = Some("dG9vLXNob3J0".to_string());
        let err = key.check(&[Algorithm::Secp256k1]).expect_err("expected error");
        assert!(err.is(&Err::InvalidKey));
    }

    #[test]
    fn infer_rejects_unknown_curve() {
        let key = Jwk {
            kty: "OKP".to_string(),
            crv: Some("Ed25519".to_string()),
            ..Default::default()
        };
        assert!(key.infer_algorithm().is_err());
    }

    #[test]
    fn public_half_drops_secret() {
        let key = Jwk {
            d: Some("CB6W6NKEuI4uiYiyM2CM4YzczOYXdx-ykAe5rlZaB-Q".to_string()),
            ..public_key()
        };
        assert!(key.is_private());
        let public = key.to_public();
        assert!(!public.is_private());
        assert_eq!(public.x, key.x);
    }
}
