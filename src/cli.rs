use std::path::PathBuf;

use clap::Parser;
use selfcert::config::Settings;
use selfcert::request::CertificateRequest;

/// Generate a self-signed RSA certificate together with its key pair.
///
/// Key files are written with no extension for the private key and `.pub`
/// for the public key; the certificate gets `.pem`. All files are set to 0744.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The DNS name of the system where the certificate will be installed.
    #[arg(short = 'n', long = "hostname")]
    pub host: String,

    /// How long the certificate is valid: 1-10 followed by d, m or y.
    #[arg(short = 'v', long = "valid_for")]
    pub valid_for: String,

    /// Directory and filename of the private key. Do not add an extension.
    #[arg(short = 'k', long = "key_name")]
    pub key_name: PathBuf,

    /// Directory and filename of the certificate. Do not add an extension.
    #[arg(short = 'c', long = "cert_name")]
    pub cert_name: PathBuf,

    /// Make the certificate its own certificate authority.
    #[arg(short = 's', long = "self_CA")]
    pub self_ca: bool,

    /// Size of the RSA key, 1024 or higher. Defaults to the configured size.
    #[arg(short = 'r', long = "rsa_bits")]
    pub rsa_bits: Option<usize>,

    /// Subject locality, overriding the configured one.
    #[arg(short = 'l', long)]
    pub locality: Option<String>,

    /// The config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn into_request(self, settings: &Settings) -> CertificateRequest {
        CertificateRequest::builder()
            .host(self.host)
            .valid_for(self.valid_for)
            .rsa_bits(self.rsa_bits.unwrap_or(settings.default_rsa_bits))
            .self_ca(self.self_ca)
            .private_key_path(self.key_name)
            .certificate_path(self.cert_name)
            .maybe_locality(self.locality)
            .build()
    }
}
