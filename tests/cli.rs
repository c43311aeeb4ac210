use std::path::Path;
use std::process::{Command, Output};

/// Runs the binary with an explicit settings file so the host's
/// configuration directory does not leak in.
fn selfcert(dir: &Path, key: &Path, cert: &Path) -> Output {
    let config = dir.join("settings.toml");
    std::fs::write(&config, "default_rsa_bits = 1024\n").unwrap();

    Command::new(env!("CARGO_BIN_EXE_selfcert"))
        .env_remove("RUST_LOG")
        .arg("-n")
        .arg("example.test")
        .args(["-v", "1d", "-r", "1024"])
        .arg("-k")
        .arg(key)
        .arg("-c")
        .arg(cert)
        .arg("--config")
        .arg(&config)
        .output()
        .expect("selfcert binary runs")
}

#[test]
fn prints_artifact_paths_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("key");
    let cert = dir.path().join("cert");

    let output = selfcert(dir.path(), &key, &cert);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("Certificate Info: {}", dir.path().join("cert.pem").display()),
            format!("Private Key File: {}", key.display()),
            format!("Public Key File: {}", dir.path().join("key.pub").display()),
        ]
    );
    assert!(dir.path().join("cert.pem").is_file());
}

#[test]
fn reports_failing_stage_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let key = dir.path().join("missing").join("key");
    let cert = dir.path().join("cert");

    let output = selfcert(dir.path(), &key, &cert);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "{stderr}");
    assert!(
        lines[0].starts_with("error: private key write failed: "),
        "{stderr}"
    );
    assert!(!dir.path().join("cert.pem").exists());
}
