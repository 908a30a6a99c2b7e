use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RsaError {
    #[error("overflow. no keyset for <{p}, {q}>")]
    Overflow { p: u64, q: u64 },

    #[error("no keyset for <{p}, {q}>")]
    NoValidKeyset { p: u64, q: u64 },

    #[error("invalid prime factor `{0}`")]
    InvalidFactor(u64),

    #[error("key file `{path}`: {reason}")]
    KeyFile { path: String, reason: String },

    #[error("cipher stream length {0} is not a multiple of 8 bytes")]
    CipherLength(u64),

    #[error("primes file `{path}`: {reason}")]
    PrimesFile { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RsaError {
    /// Only a modulus overflow can be recovered from by picking another factor.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RsaError::Overflow { .. })
    }

    pub(crate) fn key_file(path: &str, reason: impl ToString) -> Self {
        RsaError::KeyFile { path: path.to_string(), reason: reason.to_string() }
    }

    pub(crate) fn primes_file(path: &str, reason: impl ToString) -> Self {
        RsaError::PrimesFile { path: path.to_string(), reason: reason.to_string() }
    }
}
