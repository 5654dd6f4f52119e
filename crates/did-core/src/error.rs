//! # Errors
//!
//! This module defines the error types used across the portable DID client,
//! including for traits that may be implemented in other crates.

use std::fmt::Display;

use thiserror::Error;

/// Simplify creation of errors with tracing.
///
/// # Example
/// ```
/// use did_core::error::Err;
/// use did_core::{tracerr, Result};
///
/// fn with_msg() -> Result<()> {
///     tracerr!(Err::InvalidFormat, "message: {}", "some message")
/// }
///
/// fn no_msg() -> Result<()> {
///     tracerr!(Err::InvalidFormat)
/// }
/// ```
#[macro_export]
macro_rules! tracerr {
    // with context
    ($code:expr, $($msg:tt)*) => {
        {
        use $crate::error::Context as _;
        tracing::error!($($msg)*);
        return Err($code).context(format!($($msg)*));
        }
    };
    // no context
    ($code:expr) => {
        {
        tracing::error!("{}", $code);
        return Err($code.into());
        }
    }
}

/// Public error type for the portable DID client.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(#[from] anyhow::Error);

impl Error {
    /// Serializable form of the error for API responses.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.0.root_cause().to_string(),
            "error_description": self.to_string(),
        })
    }

    /// Returns true if `err` is the typed error held by this error object.
    #[must_use]
    pub fn is(&self, err: &Err) -> bool {
        self.0.downcast_ref::<Err>().map_or(false, |e| e == err)
    }

    /// The typed error held by this error object, if any.
    #[must_use]
    pub fn code(&self) -> Option<&Err> {
        self.0.downcast_ref::<Err>()
    }
}

/// Typed errors for the portable DID client.
#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum Err {
    /// No key was found for the requested key reference or key id.
    #[error("key_not_found")]
    KeyNotFound,

    /// A key with the same key id but different material is already stored.
    #[error("duplicate_key_id")]
    DuplicateKeyId,

    /// The configured crypto provider cannot produce the requested key type.
    #[error("unsupported_key_type")]
    UnsupportedKeyType,

    /// A requested signing algorithm is not supported by the signer or key.
    #[error("unsupported_algorithm")]
    UnsupportedAlgorithm,

    /// Invalid key. The format of the key is incorrect or the cryptographic
    /// algorithm specified by the key is not supported.
    #[error("invalid_key")]
    InvalidKey,

    /// Invalid format. (See context for details.)
    #[error("invalid_format")]
    InvalidFormat,

    /// Hash is not a valid base64url-encoded multihash.
    #[error("invalid_hash")]
    InvalidHash,

    /// Failure to sign a message.
    #[error("signing_error")]
    SigningError,

    /// A JWS envelope could not be parsed. Distinct from a signature mismatch,
    /// which is reported as a boolean verification result.
    #[error("malformed_token")]
    MalformedToken,

    /// Failure to verify a signature where verification could not even be
    /// attempted (malformed input rather than a mismatch).
    #[error("failed_signature_verification")]
    FailedSignatureVerification,

    /// Sidetree create-operation payload generation failed. Wraps the
    /// underlying key generation or hashing failure.
    #[error("payload_generation_error")]
    PayloadGeneration,

    /// Identifier creation failed. Nothing has been persisted.
    #[error("identifier_creator_error")]
    IdentifierCreator,

    /// The registration endpoint rejected the create operation.
    #[error("registration_error: status {status}")]
    Registration {
        /// HTTP status returned by the registrar.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The resolution endpoint returned a protocol failure.
    #[error("resolution_error: status {status}")]
    Resolution {
        /// HTTP status returned by the resolver.
        status: u16,
    },

    /// No record was found for the requested DID or name.
    #[error("not_found")]
    NotFound,

    /// A network call did not complete within the configured timeout.
    #[error("timeout")]
    Timeout,

    /// A network call failed to connect or complete.
    #[error("network_error")]
    Network,

    /// An error occurred trying to serialize data.
    #[error("serialization_error")]
    SerializationError,

    /// An error occurred trying to deserialize data.
    #[error("deserialization_error")]
    DeserializationError,
}

/// Context is used to decorate errors with useful context information.
pub trait Context<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Adds context to the error.
    ///
    /// # Errors
    ///
    /// * Original error with context appended.
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T, E> for core::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(Error(anyhow::Error::from(e).context(context))),
        }
    }
}

impl From<Err> for Error {
    fn from(error: Err) -> Self {
        Error(error.into())
    }
}

impl From<base64ct::Error> for Error {
    fn from(err: base64ct::Error) -> Error {
        Error(err.into())
    }
}

impl From<multihash::Error> for Error {
    fn from(err: multihash::Error) -> Error {
        Error(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error(err.into())
    }
}
