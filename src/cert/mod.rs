pub mod extensions;
pub mod params;

use der::{Decode, Encode};
use der::asn1::AnyRef;
use der::flagset::FlagSet;
use extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage, KeyUsages,
    SubjectAltName, ToAndFromX509Extension,
};
use params::{CertificateTemplate, DistinguishedName, ExtensionParam, Validity};
use x509_cert::certificate::CertificateInner;

use crate::error::{CertGenError, Result};
use crate::issuer::Issuer;
use crate::key::KeyPair;
use crate::pem_utils::{der_to_pem, pem_to_der};
use crate::tbs_certificate::from_x509_time;

/// PEM block label for certificates.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA PKCS#1 v1.5 identifiers carry an explicit NULL parameter (RFC 4055).
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(AnyRef::NULL.into()),
            },
        }
    }
}

/// Represents a signed X.509 certificate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertGenError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into a PEM `CERTIFICATE` block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(der_to_pem(&self.to_der()?, CERTIFICATE_LABEL))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        Ok(Self {
            inner: CertificateInner::from_der(der)?,
        })
    }

    /// Parses the first PEM block of `pem_str`, which must be labelled `CERTIFICATE`.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        Self::from_der(&pem_to_der(pem_str, CERTIFICATE_LABEL)?)
    }

    /// Signs `template` with `key`, using the template's subject as issuer.
    pub fn new_self_signed(template: &CertificateTemplate, key: &KeyPair) -> Result<Self> {
        let self_issuer = SelfIssuer {
            name: template.subject.clone(),
            key,
        };
        self_issuer.issue(template)
    }

    /// Checks the signature against `key`'s public half.
    pub fn verify_signature(&self, key: &KeyPair) -> Result<()> {
        let tbs = self.inner.tbs_certificate.to_der()?;
        key.verify_data(&tbs, self.inner.signature.raw_bytes())
    }

    /// Extracts the fields callers commonly inspect.
    pub fn summary(&self) -> Result<CertificateSummary> {
        let tbs = &self.inner.tbs_certificate;

        let extensions: Vec<ExtensionParam> = tbs
            .extensions
            .iter()
            .flatten()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect();

        let find = |oid| extensions.iter().find(|ext| ext.oid == oid);

        let dns_names = find(SubjectAltName::OID)
            .map(|ext| ext.to_extension::<SubjectAltName>())
            .transpose()?
            .map(|san| san.names)
            .unwrap_or_default();

        let is_ca = find(BasicConstraints::OID)
            .map(|ext| ext.to_extension::<BasicConstraints>())
            .transpose()?
            .is_some_and(|bc| bc.is_ca);

        let key_usage = find(KeyUsage::OID)
            .map(|ext| ext.to_extension::<KeyUsage>())
            .transpose()?
            .map(|ku| ku.0)
            .unwrap_or_default();

        let usages = find(ExtendedKeyUsage::OID)
            .map(|ext| ext.to_extension::<ExtendedKeyUsage>())
            .transpose()?
            .map(|eku| eku.usage)
            .unwrap_or_default();

        let serial_bytes = tbs.serial_number.as_bytes();
        let serial_number = u128::from_be_bytes(
            left_pad::<16>(serial_bytes)
                .ok_or_else(|| CertGenError::DecodingError("serial number exceeds 128 bits".into()))?,
        );

        Ok(CertificateSummary {
            serial_number,
            subject: DistinguishedName::from_x509_name(&tbs.subject)?,
            issuer: DistinguishedName::from_x509_name(&tbs.issuer)?,
            validity: Validity {
                not_before: from_x509_time(&tbs.validity.not_before)?,
                not_after: from_x509_time(&tbs.validity.not_after)?,
            },
            dns_names,
            is_ca,
            key_usage,
            usages,
        })
    }
}

/// Right-aligns `bytes` into an `N`-byte buffer, ignoring leading zero octets.
fn left_pad<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > N {
        return None;
    }
    let mut out = [0u8; N];
    out[N - significant.len()..].copy_from_slice(significant);
    Some(out)
}

/// The parts of an issued certificate that describe what was requested.
#[derive(Debug, Clone)]
pub struct CertificateSummary {
    pub serial_number: u128,
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub dns_names: Vec<String>,
    pub is_ca: bool,
    pub key_usage: FlagSet<KeyUsages>,
    pub usages: Vec<ExtendedKeyUsageOption>,
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: DistinguishedName,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> DistinguishedName {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}
