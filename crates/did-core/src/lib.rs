//! # DID Core
//! Shared types, traits and functions for the portable DID client: the error
//! taxonomy, canonical JSON hashing, JWK keys, identifier documents and the
//! repository and resolver seams.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub(crate) mod document;
pub mod error;
pub mod hashing;
pub(crate) mod identifier;
pub(crate) mod keys;
pub(crate) mod repository;
pub(crate) mod resolver;

pub use document::patch::{Patch, PatchAction, PatchDocument};
pub use document::service::Service;
pub use document::verification_method::{KeyPurpose, VerificationMethod};
pub use document::{IdentifierDocument, DID_CONTEXT};
pub use identifier::Identifier;
pub use keys::{Algorithm, Jwk, KeyType};
pub use repository::Repository;
pub use resolver::{Resolution, Resolver, ResolverMetadata};

/// Result type used across the portable DID client.
pub type Result<T, E = error::Error> = core::result::Result<T, E>;
