//! Key material management for the portable DID client: an in-memory key
//! store addressing keys by logical reference and by content-derived key id,
//! and the crypto operations (generate, sign, verify, hash) built on top of a
//! pluggable provider.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod crypto;
mod provider;
mod store;

pub use crypto::CryptoOperations;
pub use provider::{CryptoProvider, Secp256k1Provider};
pub use store::{InMemoryKeyStore, Key, KeyContainer, KeyKind};
