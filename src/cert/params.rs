use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::{Any, PrintableStringRef, SetOfVec, Utf8StringRef};
use der::flagset::FlagSet;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::ExtendedKeyUsageOption;
pub use crate::cert::extensions::KeyUsages;
use crate::error::{CertGenError, Result};
use crate::validity::ValidityPeriod;

const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const LOCALITY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
const PROVINCE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
const STREET_ADDRESS: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.9");
const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const ORGANIZATION_UNIT: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Everything needed to sign one certificate, before it is encoded.
///
/// # Fields
/// * `serial_number` - Random serial, below 2^128.
/// * `subject` - Subject name; also the issuer for self-signed output.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `dns_names` - Subject alternative DNS names.
/// * `key_usage` - Key usage bits.
/// * `usages` - Extended key usage purposes.
/// * `is_ca` - Marks the certificate as a certificate authority.
/// * `extensions` - Additional pre-encoded X.509 extensions.
#[derive(Clone, Debug, Builder)]
pub struct CertificateTemplate {
    pub serial_number: u128,
    pub subject: DistinguishedName,
    pub validity: Validity,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default = KeyUsages::DigitalSignature.into())]
    pub key_usage: FlagSet<KeyUsages>,
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default)]
    pub extensions: Vec<ExtensionParam>,
}

/// Distinguished name parameters for building an X.509 certificate.
///
/// Unset attributes are left out of the encoded name entirely.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub locality: Option<String>,
    pub street_address: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 `RDNSequence`.
    ///
    /// Country is encoded as a `PrintableString`, everything else as `UTF8String`.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName> {
        let attributes = [
            (COUNTRY, &self.country),
            (PROVINCE, &self.province),
            (LOCALITY, &self.locality),
            (STREET_ADDRESS, &self.street_address),
            (ORGANIZATION, &self.organization),
            (ORGANIZATION_UNIT, &self.organization_unit),
            (COMMON_NAME, &self.common_name),
        ];

        let rdns = attributes
            .into_iter()
            .filter_map(|(oid, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| single_attribute_rdn(oid, v))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    ///
    /// Attributes this type does not model are skipped.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Result<Self> {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let slot = match attr.oid {
                    COMMON_NAME => &mut dn.common_name,
                    COUNTRY => &mut dn.country,
                    LOCALITY => &mut dn.locality,
                    PROVINCE => &mut dn.province,
                    STREET_ADDRESS => &mut dn.street_address,
                    ORGANIZATION => &mut dn.organization,
                    ORGANIZATION_UNIT => &mut dn.organization_unit,
                    _ => continue,
                };
                *slot = Some(attribute_string(&attr.value)?);
            }
        }

        Ok(dn)
    }
}

fn single_attribute_rdn(oid: ObjectIdentifier, value: &str) -> Result<RelativeDistinguishedName> {
    let value = if oid == COUNTRY {
        Any::encode_from(&PrintableStringRef::new(value)?)?
    } else {
        Any::encode_from(&Utf8StringRef::new(value)?)?
    };
    let set = SetOfVec::try_from(vec![AttributeTypeAndValue { oid, value }])?;
    Ok(RelativeDistinguishedName(set))
}

fn attribute_string(value: &Any) -> Result<String> {
    if let Ok(s) = value.decode_as::<String>() {
        return Ok(s);
    }
    value
        .decode_as::<PrintableStringRef<'_>>()
        .map(|s| s.to_string())
        .map_err(|e| CertGenError::DecodingError(format!("unsupported name attribute: {e}")))
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// A window opening at `start` and closing `period` later.
    ///
    /// `start` is truncated to whole seconds, the resolution of X.509 times,
    /// so the encoded window matches this value exactly.
    pub fn starting_at(start: OffsetDateTime, period: &ValidityPeriod) -> Result<Self> {
        let not_before = start
            .replace_nanosecond(0)
            .map_err(|e| CertGenError::InvalidRequest(e.to_string()))?;
        let not_after = period.expiry_from(not_before)?;
        Ok(Self {
            not_before,
            not_after,
        })
    }

    /// Creates a validity period starting now for the given period.
    pub fn starting_now(period: &ValidityPeriod) -> Result<Self> {
        Self::starting_at(OffsetDateTime::now_utc(), period)
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        let value = extension.to_x509_extension_value()?;
        Ok(Self {
            oid: E::OID,
            critical,
            value,
        })
    }

    /// Decodes an `ExtensionParam` into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }
}
