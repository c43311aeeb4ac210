use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{CertGenError, Result};

/// Draws a certificate serial number uniformly from `[0, 2^128)`.
///
/// Reads straight from the operating system source. A failing source is
/// reported as [`CertGenError::Entropy`] and is not retried.
pub fn generate_serial_number() -> Result<u128> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CertGenError::Entropy(format!("serial number generation: {e}")))?;
    Ok(u128::from_be_bytes(bytes))
}

/// Big-endian bytes of `serial` with leading zero octets removed.
///
/// Zero is kept as a single `0x00` octet.
pub fn serial_to_bytes(serial: u128) -> Vec<u8> {
    let bytes = serial.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    bytes[first..].to_vec()
}
