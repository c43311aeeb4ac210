//! Error type shared by every issuance step.

use std::path::PathBuf;

use thiserror::Error;

/// Represents errors that can occur while issuing a certificate.
///
/// Every variant is terminal for the issuance run that produced it.
#[derive(Debug, Error, Clone)]
pub enum CertGenError {
    /// The request failed validation before any cryptographic work began.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The operating system random source could not supply entropy.
    #[error("Entropy source failure: {0}")]
    Entropy(String),

    /// Error during RSA key generation.
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// The certificate could not be encoded or signed.
    #[error("Certificate signing error: {0}")]
    CertificateSigning(String),

    /// An output file could not be created, written or restricted.
    #[error("Failed to write {}: {reason}", path.display())]
    ArtifactWrite { path: PathBuf, reason: String },

    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CertGenError {
    pub(crate) fn artifact_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CertGenError::ArtifactWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<der::Error> for CertGenError {
    /// Converts a `der::Error` into a `CertGenError`.
    fn from(err: der::Error) -> Self {
        CertGenError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertGenError {
    fn from(err: rsa::Error) -> Self {
        CertGenError::KeyGeneration(err.to_string())
    }
}

impl From<pem::PemError> for CertGenError {
    fn from(err: pem::PemError) -> Self {
        CertGenError::DecodingError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CertGenError>;
