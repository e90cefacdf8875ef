//! Read-only lookup tables consulted while rendering group descriptors
//!
//! Two tables, both keyed by a group's `key`: the set of keys served
//! through provider bundles, and the health-check settings for keys that
//! advertise a probe URL. They are explicit values passed into rendering
//! rather than process-wide globals, so tests can render against fixture
//! tables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Health-check settings attached to groups that advertise a probe URL
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthCheckConfig {
    /// Probe URL, e.g. `http://www.gstatic.com/generate_204`
    pub url: String,
    /// Probe interval in seconds
    #[serde(default)]
    pub interval: Option<u64>,
}

/// Provider-group membership and health-check tables
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    provider_groups: HashSet<String>,
    health_checks: HashMap<String, HealthCheckConfig>,
}

impl LookupTables {
    /// Empty tables: no provider groups, no health checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key as served through a provider bundle.
    pub fn with_provider_group(mut self, key: impl Into<String>) -> Self {
        self.provider_groups.insert(key.into());
        self
    }

    /// Attach health-check settings to a key.
    pub fn with_health_check(mut self, key: impl Into<String>, config: HealthCheckConfig) -> Self {
        self.health_checks.insert(key.into(), config);
        self
    }

    /// Whether `key` is served through a provider bundle.
    pub fn is_provider_group(&self, key: &str) -> bool {
        self.provider_groups.contains(key)
    }

    /// Health-check settings for `key`, if any.
    pub fn health_check(&self, key: &str) -> Option<&HealthCheckConfig> {
        self.health_checks.get(key)
    }

    /// Load tables from a TOML file.
    ///
    /// # Errors
    /// Returns error if the file is unreadable or not valid TOML.
    ///
    /// # Example TOML
    /// ```toml
    /// provider-groups = ["hk", "us"]
    ///
    /// [health-check.auto]
    /// url = "http://www.gstatic.com/generate_204"
    /// interval = 300
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        #[derive(Deserialize)]
        struct LookupFile {
            #[serde(default, rename = "provider-groups")]
            provider_groups: Vec<String>,
            #[serde(default, rename = "health-check")]
            health_check: HashMap<String, HealthCheckConfig>,
        }

        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read lookup tables file: {}",
                path.as_ref().display()
            )
        })?;
        let file: LookupFile =
            toml::from_str(&content).with_context(|| "Failed to parse TOML lookup tables")?;

        Ok(Self {
            provider_groups: file.provider_groups.into_iter().collect(),
            health_checks: file.health_check,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_toml() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"
provider-groups = ["hk", "us"]

[health-check.auto]
url = "http://www.gstatic.com/generate_204"
interval = 300

[health-check.video]
url = "https://r1---sn-example.googlevideo.com/generate_204"
"#
        )?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_from_toml() -> Result<()> {
        let file = create_test_toml()?;
        let tables = LookupTables::from_toml(file.path())?;

        assert!(tables.is_provider_group("hk"));
        assert!(tables.is_provider_group("us"));
        assert!(!tables.is_provider_group("auto"));

        let auto = tables.health_check("auto").unwrap();
        assert_eq!(auto.url, "http://www.gstatic.com/generate_204");
        assert_eq!(auto.interval, Some(300));

        let video = tables.health_check("video").unwrap();
        assert_eq!(video.interval, None);

        Ok(())
    }

    #[test]
    fn test_from_toml_missing_file() {
        let result = LookupTables::from_toml("/nonexistent/lookup.toml");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read lookup tables file"));
    }

    #[test]
    fn test_from_toml_invalid_syntax() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "provider-groups = not-a-list")?;
        file.flush()?;

        let result = LookupTables::from_toml(file.path());
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_fixture_builders() {
        let tables = LookupTables::new()
            .with_provider_group("jp")
            .with_health_check(
                "auto",
                HealthCheckConfig {
                    url: "http://probe.example.net/204".to_string(),
                    interval: None,
                },
            );

        assert!(tables.is_provider_group("jp"));
        assert!(tables.health_check("auto").is_some());
        assert!(tables.health_check("jp").is_none());
    }

    #[test]
    fn test_empty_tables() {
        let tables = LookupTables::new();
        assert!(!tables.is_provider_group("hk"));
        assert!(tables.health_check("auto").is_none());
    }
}
