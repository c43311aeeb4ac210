mod util;

use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::x509::{X509, X509VerifyResult};
use selfcert::config::Settings;
use selfcert::issue::issue_certificate;

#[test]
fn test_openssl_crate_parses_and_verifies_cert() {
    let dir = tempfile::tempdir().unwrap();
    let issued =
        issue_certificate(&util::request_in(dir.path(), "1Y", false), &Settings::default()).unwrap();

    let pem = std::fs::read(&issued.certificate_path).unwrap();
    let x509 = X509::from_pem(&pem).expect("Failed to parse PEM");

    // Version 3 (0-based index)
    assert_eq!(x509.version(), 2);

    let sig_alg = x509.signature_algorithm().object().nid();
    assert_eq!(sig_alg, Nid::SHA256WITHRSAENCRYPTION);

    // Self-signed: the embedded key verifies the signature.
    let public_key = x509.public_key().unwrap();
    assert!(x509.verify(&public_key).unwrap());

    let organization = x509
        .subject_name()
        .entries_by_nid(Nid::ORGANIZATIONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap();
    assert_eq!(organization.to_string(), "STY Holdings Inc");

    let dns_names: Vec<String> = x509
        .subject_alt_names()
        .unwrap()
        .iter()
        .filter_map(|name| name.dnsname().map(str::to_owned))
        .collect();
    assert_eq!(dns_names, vec!["example.test".to_string()]);

    let serial = x509.serial_number().to_bn().unwrap().to_dec_str().unwrap();
    assert_eq!(serial.to_string(), issued.serial_number.to_string());

    let not_after =
        openssl::asn1::Asn1Time::from_unix(issued.validity.not_after.unix_timestamp()).unwrap();
    let diff = x509.not_after().diff(&not_after).unwrap();
    assert_eq!((diff.days, diff.secs), (0, 0));

    let text = String::from_utf8(x509.to_text().unwrap()).unwrap();
    assert!(text.contains("CA:FALSE"), "{text}");
    assert!(text.contains("TLS Web Client Authentication"), "{text}");
    assert!(text.contains("TLS Web Server Authentication"), "{text}");
}

#[test]
fn test_openssl_reads_key_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let issued =
        issue_certificate(&util::request_in(dir.path(), "3M", true), &Settings::default()).unwrap();

    let private_pem = std::fs::read(&issued.private_key_path).unwrap();
    let public_pem = std::fs::read(&issued.public_key_path).unwrap();
    let private = PKey::private_key_from_pem(&private_pem).expect("PKCS#8 private key");
    let public = PKey::public_key_from_pem(&public_pem).expect("SPKI public key");
    assert_eq!(private.bits(), 1024);
    assert!(private.public_eq(&public));

    let x509 = X509::from_pem(&std::fs::read(&issued.certificate_path).unwrap()).unwrap();
    assert!(x509.public_key().unwrap().public_eq(&public));
    assert_eq!(x509.issued(&x509), X509VerifyResult::OK);

    let text = String::from_utf8(x509.to_text().unwrap()).unwrap();
    assert!(text.contains("CA:TRUE"), "{text}");
    assert!(text.contains("Certificate Sign"), "{text}");
    assert!(text.contains("Subject Key Identifier"), "{text}");
}
