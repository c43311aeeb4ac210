use crate::error::{CertGenError, Result};

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
///
/// Lines are wrapped at 64 columns and end in `\n`.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Convert a PEM‑encoded string to DER‑encoded bytes, checking the block label.
pub fn pem_to_der(pem_str: &str, expected_label: &str) -> Result<Vec<u8>> {
    let pem = pem::parse(pem_str)?;
    if pem.tag() != expected_label {
        return Err(CertGenError::DecodingError(format!(
            "expected a {expected_label} block, found {}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pem_framing() {
        let der = vec![0x5a; 100];
        let pem = der_to_pem(&der, "PUBLIC KEY");
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(pem.ends_with("-----END PUBLIC KEY-----\n"));
        assert!(!pem.contains('\r'));
        assert!(pem.lines().all(|line| line.len() <= 64));
        assert_eq!(pem_to_der(&pem, "PUBLIC KEY").unwrap(), der);
    }

    #[test]
    fn test_label_mismatch_is_rejected() {
        let pem = der_to_pem(&[1, 2, 3], "PRIVATE KEY");
        assert!(matches!(
            pem_to_der(&pem, "CERTIFICATE"),
            Err(CertGenError::DecodingError(_))
        ));
    }
}
