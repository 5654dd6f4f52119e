//! # Portable DID
//!
//! Client SDK for creating, persisting and publishing Sidetree-based
//! Decentralized Identifiers and exchanging signed tokens built on that
//! identity. The [`IdentityManager`] façade lazily creates or loads the local
//! identifier; the member crates provide the key store, crypto operations,
//! payload generation, JWS engine and registrar/resolver plumbing it is
//! composed from.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod identity;
pub mod test_utils;

pub use did_core::error;
pub use did_core::{
    hashing, Identifier, IdentifierDocument, Jwk, KeyPurpose, KeyType, Patch, PatchAction,
    PatchDocument, Repository, Resolution, Resolver, ResolverMetadata, Result, Service,
    VerificationMethod,
};
pub use did_sidetree::{
    compute_unique_suffix, reconstruct_document, HttpResolver, IdentifierCreator, InitialState,
    PatchData, Registrar, RegistrationPayload, SidetreePayloadGenerator, SidetreeRegistrar,
    SuffixData, IDENTIFIER_SECRET_KEY_NAME, METHOD_NAME,
};
pub use identity::IdentityManager;
pub use jws::{JwsFormat, JwsHeader, JwsToken};
pub use keystore::{
    CryptoOperations, CryptoProvider, InMemoryKeyStore, Key, KeyContainer, KeyKind,
    Secp256k1Provider,
};
