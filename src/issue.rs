//! One issuance run: keys, certificate and the three PEM artifacts.

use std::fmt;
use std::path::PathBuf;

use der::flagset::FlagSet;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use crate::artifact::{PRIVATE_KEY_LABEL, PUBLIC_KEY_LABEL, write_pem_file};
use crate::cert::extensions::{ExtendedKeyUsageOption, KeyUsages};
use crate::cert::params::{CertificateTemplate, Validity};
use crate::cert::{CERTIFICATE_LABEL, Certificate};
use crate::config::Settings;
use crate::error::CertGenError;
use crate::key::KeyPair;
use crate::request::CertificateRequest;
use crate::serial::generate_serial_number;

/// Pipeline step, used to report where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidateRequest,
    GenerateKeys,
    WritePrivateKey,
    WritePublicKey,
    BuildCertificate,
    WriteCertificate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidateRequest => "request validation",
            Stage::GenerateKeys => "key generation",
            Stage::WritePrivateKey => "private key write",
            Stage::WritePublicKey => "public key write",
            Stage::BuildCertificate => "certificate signing",
            Stage::WriteCertificate => "certificate write",
        };
        f.write_str(name)
    }
}

/// The first error of a run and the stage that raised it.
#[derive(Debug, Clone, Error)]
#[error("{stage} failed")]
pub struct IssueFailure {
    pub stage: Stage,
    #[source]
    pub error: CertGenError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, IssueFailure>;
}

impl<T> AtStage<T> for Result<T, CertGenError> {
    fn at(self, stage: Stage) -> Result<T, IssueFailure> {
        self.map_err(|error| IssueFailure { stage, error })
    }
}

/// What a successful run wrote and signed.
#[derive(Debug, Clone)]
pub struct IssuedArtifacts {
    pub certificate_path: PathBuf,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    pub serial_number: u128,
    pub validity: Validity,
}

/// Runs one issuance transaction for `request`.
///
/// Steps run strictly in order and stop at the first failure. Files written
/// before a failure are left in place; rerunning the same request overwrites
/// them.
#[instrument(skip_all, fields(host = %request.host, valid_for = %request.valid_for, rsa_bits = request.rsa_bits, self_ca = request.self_ca))]
pub fn issue_certificate(
    request: &CertificateRequest,
    settings: &Settings,
) -> Result<IssuedArtifacts, IssueFailure> {
    request.validate().at(Stage::ValidateRequest)?;
    let paths = request.artifact_paths();

    debug!("generating RSA key pair");
    let key = KeyPair::generate_rsa(request.rsa_bits).at(Stage::GenerateKeys)?;

    let private_der = key.private_key_pkcs8_der().at(Stage::WritePrivateKey)?;
    write_pem_file(&paths.private_key, &private_der, PRIVATE_KEY_LABEL)
        .at(Stage::WritePrivateKey)?;

    let public_der = key.public_key_der().at(Stage::WritePublicKey)?;
    write_pem_file(&paths.public_key, &public_der, PUBLIC_KEY_LABEL).at(Stage::WritePublicKey)?;

    let certificate =
        build_certificate(request, settings, &key, OffsetDateTime::now_utc()).at(Stage::BuildCertificate)?;
    let certificate_der = certificate.to_der().at(Stage::BuildCertificate)?;
    let summary = certificate.summary().at(Stage::BuildCertificate)?;
    write_pem_file(&paths.certificate, &certificate_der, CERTIFICATE_LABEL)
        .at(Stage::WriteCertificate)?;

    info!(
        serial = %format_args!("{:x}", summary.serial_number),
        not_after = %summary.validity.not_after,
        "issued self-signed certificate"
    );

    Ok(IssuedArtifacts {
        certificate_path: paths.certificate,
        private_key_path: paths.private_key,
        public_key_path: paths.public_key,
        serial_number: summary.serial_number,
        validity: summary.validity,
    })
}

/// Builds the template for `request` and self-signs it with `key`.
///
/// `now` becomes `notBefore`, truncated to whole seconds.
pub fn build_certificate(
    request: &CertificateRequest,
    settings: &Settings,
    key: &KeyPair,
    now: OffsetDateTime,
) -> Result<Certificate, CertGenError> {
    let period = request.validity_period()?;
    let validity = Validity::starting_at(now, &period)?;
    let serial_number = generate_serial_number()?;

    let mut key_usage: FlagSet<KeyUsages> = KeyUsages::DigitalSignature.into();
    if request.self_ca {
        key_usage |= KeyUsages::KeyCertSign;
    }

    let template = CertificateTemplate::builder()
        .serial_number(serial_number)
        .subject(settings.subject.distinguished_name(request.locality.as_deref()))
        .validity(validity)
        .dns_names(vec![request.host.clone()])
        .key_usage(key_usage)
        .usages(vec![
            ExtendedKeyUsageOption::ClientAuth,
            ExtendedKeyUsageOption::ServerAuth,
        ])
        .is_ca(request.self_ca)
        .build();

    Certificate::new_self_signed(&template, key)
}
