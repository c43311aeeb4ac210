use std::path::PathBuf;
use std::sync::LazyLock;

use bon::Builder;
use regex::Regex;

use crate::artifact::ArtifactPaths;
use crate::error::{CertGenError, Result};
use crate::key::MIN_RSA_BITS;
use crate::validity::ValidityPeriod;

static VALID_FOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-9]|10)[dDmMyY]$").expect("validity pattern is a valid regex")
});

/// The immutable input to one issuance run.
///
/// # Fields
/// * `host` - DNS name bound into the certificate.
/// * `valid_for` - Validity expression such as `1Y`, `6M` or `30D`.
/// * `rsa_bits` - RSA modulus size, at least 1024.
/// * `self_ca` - Also mark the certificate as its own certificate authority.
/// * `private_key_path` - Private key output; the public key gets `.pub` appended.
/// * `certificate_path` - Certificate output base; `.pem` is appended.
/// * `locality` - Overrides the configured subject locality.
#[derive(Debug, Clone, Builder)]
pub struct CertificateRequest {
    #[builder(into)]
    pub host: String,
    #[builder(into)]
    pub valid_for: String,
    pub rsa_bits: usize,
    #[builder(default)]
    pub self_ca: bool,
    #[builder(into)]
    pub private_key_path: PathBuf,
    #[builder(into)]
    pub certificate_path: PathBuf,
    #[builder(into)]
    pub locality: Option<String>,
}

impl CertificateRequest {
    /// Rejects requests that would fail partway through issuance.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(CertGenError::InvalidRequest("host is required".into()));
        }
        if !self.host.is_ascii() {
            return Err(CertGenError::InvalidRequest(format!(
                "host {:?} must be an ASCII DNS name",
                self.host
            )));
        }
        if !VALID_FOR.is_match(&self.valid_for) {
            return Err(CertGenError::InvalidRequest(format!(
                "valid_for {:?} must be 1-10 followed by d, m or y",
                self.valid_for
            )));
        }
        if self.rsa_bits < MIN_RSA_BITS {
            return Err(CertGenError::InvalidRequest(format!(
                "rsa_bits must be {MIN_RSA_BITS} or higher, got {}",
                self.rsa_bits
            )));
        }
        if self.private_key_path.as_os_str().is_empty() {
            return Err(CertGenError::InvalidRequest("private key path is required".into()));
        }
        if self.certificate_path.as_os_str().is_empty() {
            return Err(CertGenError::InvalidRequest("certificate path is required".into()));
        }
        Ok(())
    }

    pub fn validity_period(&self) -> Result<ValidityPeriod> {
        ValidityPeriod::parse(&self.valid_for)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.private_key_path, &self.certificate_path)
    }
}
