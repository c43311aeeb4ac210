use der::Encode;
use tracing::debug;
use x509_cert::certificate::CertificateInner;

use crate::cert::Certificate;
use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName, SubjectKeyIdentifier,
};
use crate::cert::params::{CertificateTemplate, DistinguishedName, ExtensionParam};
use crate::error::{CertGenError, Result};
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Issues a certificate for `template`, embedding the issuer's public key
    /// as the subject key.
    ///
    /// Any encoding or signing failure is reported as
    /// [`CertGenError::CertificateSigning`].
    fn issue(&self, template: &CertificateTemplate) -> Result<Certificate> {
        let signing_error = |e: CertGenError| match e {
            CertGenError::InvalidRequest(_) | CertGenError::CertificateSigning(_) => e,
            other => CertGenError::CertificateSigning(other.to_string()),
        };

        let signature_algo = SignatureAlgorithm::Sha256WithRSA;
        let subject_public_key_info = self.signing_key().as_spki().map_err(signing_error)?;

        let extensions = template_extensions(template, &subject_public_key_info)
            .map_err(signing_error)?;

        let tbs_cert = TbsCertificate {
            serial_number: template.serial_number,
            signature_algorithm: signature_algo,
            issuer: self.issuer_name(),
            validity: template.validity,
            subject: template.subject.clone(),
            subject_public_key_info,
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner().map_err(signing_error)?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| CertGenError::CertificateSigning(e.to_string()))?;

        let signature = self.signing_key().sign_data(&tbs_der)?;
        debug!(
            tbs_len = tbs_der.len(),
            signature_len = signature.len(),
            "signed certificate body"
        );

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: signature_algo.into(),
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| CertGenError::CertificateSigning(e.to_string()))?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// Encodes the extensions `template` asks for, followed by its extra extensions.
fn template_extensions(
    template: &CertificateTemplate,
    subject_public_key_info: &x509_cert::spki::SubjectPublicKeyInfoOwned,
) -> Result<Vec<ExtensionParam>> {
    let mut extensions = vec![ExtensionParam::from_extension(
        BasicConstraints {
            is_ca: template.is_ca,
            max_path_length: None,
        },
        true,
    )?];

    if !template.key_usage.is_empty() {
        extensions.push(ExtensionParam::from_extension(
            KeyUsage(template.key_usage),
            true,
        )?);
    }

    if !template.usages.is_empty() {
        extensions.push(ExtensionParam::from_extension(
            ExtendedKeyUsage {
                usage: template.usages.clone(),
            },
            false,
        )?);
    }

    if !template.dns_names.is_empty() {
        // RFC 5280 4.2.1.6: the SAN must be critical when the subject is empty.
        let subject_is_empty = template.subject.as_x509_name()?.0.is_empty();
        extensions.push(ExtensionParam::from_extension(
            SubjectAltName {
                names: template.dns_names.clone(),
            },
            subject_is_empty,
        )?);
    }

    if template.is_ca {
        extensions.push(ExtensionParam::from_extension(
            SubjectKeyIdentifier::from_public_key_bits(
                subject_public_key_info.subject_public_key.raw_bytes(),
            ),
            false,
        )?);
    }

    extensions.extend(template.extensions.iter().cloned());
    Ok(extensions)
}
