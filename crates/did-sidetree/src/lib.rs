//! Sidetree client plumbing: create-operation payload generation, identifier
//! creation, and the registrar/resolver boundary components that submit and
//! fetch identifier documents.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

mod creator;
mod payload;
mod registrar;
mod resolver;

pub use creator::IdentifierCreator;
pub use payload::{
    compute_unique_suffix, CreatePayload, PatchData, RegistrationPayload, SidetreePayloadGenerator,
    SuffixData,
};
pub use registrar::{Registrar, SidetreeRegistrar};
pub use resolver::{reconstruct_document, HttpResolver, InitialState};

/// DID method this client produces operations for.
pub const METHOD_NAME: &str = "ion";

/// Query parameter carrying the initial state of a long-form DID.
pub const INITIAL_STATE_PARAM: &str = "-ion-initial-state";

/// The operation name carried in the JWS header of a create request.
pub const CREATE_OPERATION: &str = "create";

/// Basename for signing key references.
pub const SIGNATURE_KEY_REFERENCE: &str = "sig";

/// Basename for recovery key references.
pub const RECOVERY_KEY_REFERENCE: &str = "recovery";

/// Basename for update key references.
pub const UPDATE_KEY_REFERENCE: &str = "update";

/// Well-known repository name the local identifier record is stored under.
pub const IDENTIFIER_SECRET_KEY_NAME: &str = "did.main.identifier";
