#![allow(dead_code)]

use std::path::Path;

use selfcert::cert::Certificate;
use selfcert::request::CertificateRequest;

/// A request whose artifacts land in `dir` as `key`, `key.pub` and `cert.pem`.
pub fn request_in(dir: &Path, valid_for: &str, self_ca: bool) -> CertificateRequest {
    CertificateRequest::builder()
        .host("example.test")
        .valid_for(valid_for)
        .rsa_bits(1024)
        .self_ca(self_ca)
        .private_key_path(dir.join("key"))
        .certificate_path(dir.join("cert"))
        .build()
}

pub fn read_certificate(path: &Path) -> Certificate {
    let pem = std::fs::read_to_string(path).expect("certificate file is readable");
    Certificate::from_pem(&pem).expect("certificate file holds a CERTIFICATE block")
}
