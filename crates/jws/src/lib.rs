//! JSON Web Signature (JWS) envelopes for DID operations: canonical header
//! construction, ES256K signing, compact and flat-JSON serialization, and
//! verification against a resolved public key.
//! See RFC 7515, <https://datatracker.ietf.org/doc/html/rfc7515>.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod token;

pub use token::{JwsFormat, JwsHeader, JwsToken};
