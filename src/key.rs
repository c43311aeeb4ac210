use pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::pkcs1v15::{Signature as RsaSignature, SigningKey as RsaSigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::{debug, instrument};
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::error::{CertGenError, Result};

/// Smallest RSA modulus accepted for issuance.
pub const MIN_RSA_BITS: usize = 1024;

/// An RSA key pair generated for a single issuance run.
///
/// The private key never leaves the process except through its PKCS#8 PEM
/// artifact.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    ///
    /// Cost grows steeply with `bits`; 4096-bit keys take seconds.
    ///
    /// # Panics
    ///
    /// `rand_core::OsRng` panics if the operating system random source
    /// fails, so an entropy failure here aborts instead of returning
    /// [`CertGenError::Entropy`].
    #[instrument(level = "debug")]
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        if bits < MIN_RSA_BITS {
            return Err(CertGenError::KeyGeneration(format!(
                "RSA key size {bits} is below the minimum of {MIN_RSA_BITS} bits"
            )));
        }

        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)?;
        let public = RsaPublicKey::from(&private);
        debug!(bits, "generated RSA key pair");

        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        use rsa::traits::PublicKeyParts;
        self.public.size() * 8
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// The private key as a PKCS#8 `PrivateKeyInfo` DER document.
    pub fn private_key_pkcs8_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .private
            .to_pkcs8_der()
            .map_err(|e| CertGenError::EncodingError(format!("PKCS#8 private key: {e}")))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// The public key as a DER `SubjectPublicKeyInfo`.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let doc = self
            .public
            .to_public_key_der()
            .map_err(|e| CertGenError::EncodingError(format!("public key info: {e}")))?;
        Ok(doc.as_bytes().to_vec())
    }

    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        SubjectPublicKeyInfoOwned::from_key(self.public.clone())
            .map_err(|e| CertGenError::EncodingError(format!("public key info: {e}")))
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new(*self.private.clone());
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CertGenError::CertificateSigning(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Checks a signature produced by [`KeyPair::sign_data`] against this pair's public key.
    pub fn verify_data(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key: VerifyingKey<Sha256> = VerifyingKey::new(self.public.clone());
        let signature = RsaSignature::try_from(signature)
            .map_err(|e| CertGenError::DecodingError(e.to_string()))?;
        verifying_key
            .verify(data, &signature)
            .map_err(|e| CertGenError::CertificateSigning(format!("signature mismatch: {e}")))
    }
}
