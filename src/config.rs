use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cert::params::DistinguishedName;
use crate::error::{CertGenError, Result};

/// Default RSA modulus size when the caller does not ask for one.
pub const DEFAULT_RSA_BITS: usize = 4096;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings shared by every issuance run of a process.
///
/// Passed explicitly into the pipeline; there is no global instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub default_rsa_bits: usize,
    pub subject: SubjectConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_rsa_bits: DEFAULT_RSA_BITS,
            subject: SubjectConfig::default(),
        }
    }
}

/// The organizational identity written into every subject name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubjectConfig {
    pub country: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub province: Option<String>,
    pub locality: Option<String>,
    pub street_address: Option<String>,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            country: Some("US".into()),
            organization: Some("STY Holdings Inc".into()),
            organizational_unit: None,
            province: None,
            locality: Some("California".into()),
            street_address: Some("San Francisco Bay Area".into()),
        }
    }
}

impl SubjectConfig {
    /// The subject name, with `locality` replacing the configured one when given.
    pub fn distinguished_name(&self, locality: Option<&str>) -> DistinguishedName {
        DistinguishedName {
            common_name: None,
            country: self.country.clone(),
            province: self.province.clone(),
            locality: locality.map(str::to_owned).or_else(|| self.locality.clone()),
            street_address: self.street_address.clone(),
            organization: self.organization.clone(),
            organization_unit: self.organizational_unit.clone(),
        }
    }
}

impl Settings {
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| CertGenError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CertGenError::Config(format!("can't read {}: {e}", path.display())))?;
        Self::from_toml(&contents)
            .map_err(|e| CertGenError::Config(format!("can't parse {}: {e}", path.display())))
    }

    /// Resolves settings from, in order: `explicit` (which must exist), the
    /// platform configuration directory, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CertGenError::Config(format!(
                    "can't find file {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading settings");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `config.toml` inside the platform configuration directory, if one exists.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "sty", "selfcert").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
            [subject]
            organization = "Acme Corp"
            locality = "Lisbon"
            "#,
        )
        .unwrap();
        assert_eq!(settings.default_rsa_bits, DEFAULT_RSA_BITS);
        assert_eq!(settings.subject.organization.as_deref(), Some("Acme Corp"));
        assert_eq!(settings.subject.country.as_deref(), Some("US"));
    }

    #[test]
    fn test_locality_override() {
        let subject = SubjectConfig::default();
        assert_eq!(
            subject.distinguished_name(None).locality.as_deref(),
            Some("California")
        );
        assert_eq!(
            subject.distinguished_name(Some("Oregon")).locality.as_deref(),
            Some("Oregon")
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CertGenError::Config(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selfcert.toml");
        fs::write(&path, "default_rsa_bits = 2048\n").unwrap();
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.default_rsa_bits, 2048);
        assert_eq!(settings.subject, SubjectConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(
            Settings::from_toml("default_rsa_bits = \"many\""),
            Err(CertGenError::Config(_))
        ));
    }
}
