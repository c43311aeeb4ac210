//! # selfcert - Self-Signed RSA Certificate Issuance
//!
//! selfcert issues self-signed X.509 certificates built entirely with rustcrypto
//! libraries. One issuance run generates a fresh RSA key pair, writes it out as
//! PEM, signs a certificate for a single DNS name and writes that out as PEM too.
//!
//! ## Artifacts
//!
//! | Artifact    | Path                | PEM label     |
//! |-------------|---------------------|---------------|
//! | Private key | `{key}`             | `PRIVATE KEY` (PKCS#8) |
//! | Public key  | `{key}.pub`         | `PUBLIC KEY` (SPKI)    |
//! | Certificate | `{cert}.pem`        | `CERTIFICATE`          |
//!
//! Every artifact is left with mode `0744`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use selfcert::{config::Settings, issue::issue_certificate, request::CertificateRequest};
//!
//! let request = CertificateRequest::builder()
//!     .host("example.test")
//!     .valid_for("1Y")
//!     .rsa_bits(2048)
//!     .private_key_path("/tmp/key")
//!     .certificate_path("/tmp/cert")
//!     .build();
//!
//! let issued = issue_certificate(&request, &Settings::default())?;
//! println!("certificate written to {}", issued.certificate_path.display());
//! # Ok::<(), selfcert::issue::IssueFailure>(())
//! ```
//!
//! ### Building a certificate without touching the filesystem
//!
//! ```rust,no_run
//! use selfcert::{
//!     cert::Certificate,
//!     cert::params::{CertificateTemplate, DistinguishedName, Validity},
//!     key::KeyPair,
//!     serial::generate_serial_number,
//!     validity::ValidityPeriod,
//! };
//!
//! # fn main() -> Result<(), selfcert::error::CertGenError> {
//! let key_pair = KeyPair::generate_rsa(2048)?;
//!
//! let template = CertificateTemplate::builder()
//!     .serial_number(generate_serial_number()?)
//!     .subject(DistinguishedName::builder().organization("Example Corp".to_string()).build())
//!     .validity(Validity::starting_now(&ValidityPeriod::parse("30d")?)?)
//!     .dns_names(vec!["example.test".to_string()])
//!     .build();
//!
//! let certificate = Certificate::new_self_signed(&template, &key_pair)?;
//! println!("{}", certificate.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`error::CertGenError`]. The orchestrator wraps
//! the first error of a run in [`issue::IssueFailure`], which also names the
//! [`issue::Stage`] that failed:
//!
//! ```rust
//! use selfcert::{error::CertGenError, validity::ValidityPeriod};
//!
//! match ValidityPeriod::parse("12W") {
//!     Ok(period) => println!("valid for {period}"),
//!     Err(CertGenError::InvalidRequest(msg)) => println!("rejected: {msg}"),
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`request`]: The issuance request and its validation
//! - [`validity`]: Validity expressions and calendar expiry arithmetic
//! - [`serial`]: Random serial numbers
//! - [`key`]: RSA key generation, export and signing
//! - [`cert`]: Certificate templates, extensions, encoding and inspection
//! - [`issuer`]: Certificate signing
//! - [`tbs_certificate`]: Low-level certificate structure
//! - [`pem_utils`], [`artifact`]: PEM framing and artifact files
//! - [`config`]: Subject identity and defaults
//! - [`issue`]: The end-to-end issuance pipeline
//! - [`error`]: Error types

pub mod artifact;
pub mod cert;
pub mod config;
pub mod error;
pub mod issue;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod request;
pub mod serial;
pub mod tbs_certificate;
pub mod validity;
