//! Persisting PEM artifacts with fixed permission bits.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{CertGenError, Result};
use crate::pem_utils::der_to_pem;

/// Mode applied to every written artifact: `rwxr--r--`.
pub const ARTIFACT_MODE: u32 = 0o744;

pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

const PUBLIC_KEY_EXTENSION: &str = "pub";
const CERTIFICATE_EXTENSION: &str = "pem";

/// Frames `der` as a PEM block labelled `label`, writes it to `path`
/// (creating or truncating the file) and then restricts the file to
/// [`ARTIFACT_MODE`].
///
/// A failure at any step, including the permission change, is returned as
/// [`CertGenError::ArtifactWrite`].
#[instrument(level = "debug", skip(path, der), fields(path = %path.display(), len = der.len()))]
pub fn write_pem_file(path: &Path, der: &[u8], label: &str) -> Result<()> {
    let pem = der_to_pem(der, label);

    let mut file = File::create(path)
        .map_err(|e| CertGenError::artifact_write(path, format!("unable to create: {e}")))?;
    file.write_all(pem.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| CertGenError::artifact_write(path, format!("unable to write: {e}")))?;
    drop(file);

    set_artifact_permissions(path)?;
    debug!("wrote {label} artifact");
    Ok(())
}

#[cfg(unix)]
fn set_artifact_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(ARTIFACT_MODE)).map_err(|e| {
        CertGenError::artifact_write(path, format!("unable to set permissions to {ARTIFACT_MODE:o}: {e}"))
    })
}

#[cfg(not(unix))]
fn set_artifact_permissions(path: &Path) -> Result<()> {
    debug!(path = %path.display(), "permission bits are not supported on this platform");
    Ok(())
}

/// Appends `.{extension}` to `base` without replacing any existing extension.
fn with_appended_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Where the three artifacts of one issuance run are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub certificate: PathBuf,
}

impl ArtifactPaths {
    /// The private key goes to `key_base` unchanged, the public key to
    /// `key_base.pub` and the certificate to `cert_base.pem`.
    pub fn new(key_base: &Path, cert_base: &Path) -> Self {
        Self {
            private_key: key_base.to_path_buf(),
            public_key: with_appended_extension(key_base, PUBLIC_KEY_EXTENSION),
            certificate: with_appended_extension(cert_base, CERTIFICATE_EXTENSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths_append_extensions() {
        let paths = ArtifactPaths::new(Path::new("/tmp/out/server.v2"), Path::new("/tmp/out/cert"));
        assert_eq!(paths.private_key, PathBuf::from("/tmp/out/server.v2"));
        assert_eq!(paths.public_key, PathBuf::from("/tmp/out/server.v2.pub"));
        assert_eq!(paths.certificate, PathBuf::from("/tmp/out/cert.pem"));
    }

    #[test]
    fn test_write_truncates_and_sets_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact");
        std::fs::write(&path, "stale contents that are much longer than the new block").unwrap();

        write_pem_file(&path, &[1, 2, 3], PUBLIC_KEY_LABEL).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, der_to_pem(&[1, 2, 3], PUBLIC_KEY_LABEL));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, ARTIFACT_MODE);
        }
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("key");
        match write_pem_file(&path, &[0], PRIVATE_KEY_LABEL) {
            Err(CertGenError::ArtifactWrite { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected an artifact write error, got {other:?}"),
        }
    }
}
