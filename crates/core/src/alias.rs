//! Endpoint aliases
//!
//! An alias names an S3-compatible endpoint together with its credentials.
//! The first segment of an object path (`alias/bucket/key`) selects one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};
use crate::path::is_valid_alias_name;

const DEFAULT_REGION: &str = "us-east-1";

/// How buckets are addressed on the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketLookup {
    #[default]
    Auto,
    Path,
    Dns,
}

impl BucketLookup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Path => "path",
            Self::Dns => "dns",
        }
    }
}

impl fmt::Display for BucketLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketLookup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "path" => Ok(Self::Path),
            "dns" => Ok(Self::Dns),
            other => Err(Error::Config(format!(
                "Invalid bucket lookup '{other}': expected auto, path or dns"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub bucket_lookup: BucketLookup,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Alias {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: default_region(),
            bucket_lookup: BucketLookup::default(),
        }
    }

    /// Check the alias name and that the endpoint is an http(s) URL
    pub fn validate(&self) -> Result<()> {
        if !is_valid_alias_name(&self.name) {
            return Err(Error::Config(format!(
                "Invalid alias name '{}': use letters, digits, '-' or '_'",
                self.name
            )));
        }

        let url = url::Url::parse(&self.endpoint)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::Config(format!(
                "Endpoint must use http or https, found '{scheme}'"
            ))),
        }
    }

    /// Path-style addressing unless DNS lookup was asked for
    pub fn force_path_style(&self) -> bool {
        self.bucket_lookup != BucketLookup::Dns
    }
}

/// Alias table stored in the configuration file
pub struct AliasManager {
    config_manager: ConfigManager,
}

impl AliasManager {
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Use the configuration file located from the environment
    pub fn new() -> Result<Self> {
        ConfigManager::new().map(Self::with_config_manager)
    }

    pub fn list(&self) -> Result<Vec<Alias>> {
        Ok(self.config_manager.load()?.aliases)
    }

    pub fn get(&self, name: &str) -> Result<Alias> {
        self.list()?
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))
    }

    /// Store `alias`, replacing one of the same name
    ///
    /// Returns `true` when an existing alias was replaced.
    pub fn set(&self, alias: Alias) -> Result<bool> {
        alias.validate()?;

        let mut config = self.config_manager.load()?;
        let replaced = match config.aliases.iter_mut().find(|a| a.name == alias.name) {
            Some(slot) => {
                *slot = alias;
                true
            }
            None => {
                config.aliases.push(alias);
                false
            }
        };
        self.config_manager.save(&config)?;
        Ok(replaced)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let index = config
            .aliases
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))?;
        config.aliases.remove(index);
        self.config_manager.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> AliasManager {
        AliasManager::with_config_manager(ConfigManager::with_path(
            dir.path().join("config.toml"),
        ))
    }

    #[test]
    fn test_new_alias_defaults() {
        let alias = Alias::new("local", "http://localhost:9000", "ak", "sk");
        assert_eq!(alias.region, "us-east-1");
        assert_eq!(alias.bucket_lookup, BucketLookup::Auto);
        assert!(alias.force_path_style());
    }

    #[test]
    fn test_bucket_lookup_parse() {
        assert_eq!("dns".parse::<BucketLookup>().unwrap(), BucketLookup::Dns);
        assert_eq!(BucketLookup::Path.to_string(), "path");
        assert!(matches!(
            "virtual".parse::<BucketLookup>().unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_dns_lookup_disables_path_style() {
        let mut alias = Alias::new("aws", "https://s3.amazonaws.com", "ak", "sk");
        alias.bucket_lookup = BucketLookup::Dns;
        assert!(!alias.force_path_style());
    }

    #[test]
    fn test_validate_endpoint_and_name() {
        assert!(Alias::new("ok", "https://s3.amazonaws.com", "a", "b").validate().is_ok());
        assert!(matches!(
            Alias::new("ok", "not a url", "a", "b").validate().unwrap_err(),
            Error::InvalidUrl(_)
        ));
        assert!(matches!(
            Alias::new("ok", "ftp://host", "a", "b").validate().unwrap_err(),
            Error::Config(_)
        ));
        assert!(matches!(
            Alias::new("bad name", "http://host", "a", "b").validate().unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        let replaced = manager
            .set(Alias::new("minio", "http://localhost:9000", "ak", "sk"))
            .unwrap();
        assert!(!replaced);
        assert_eq!(manager.get("minio").unwrap().endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        manager.set(Alias::new("a", "http://one:9000", "k", "s")).unwrap();
        manager.set(Alias::new("b", "http://two:9000", "k", "s")).unwrap();
        assert!(manager.set(Alias::new("a", "http://three:9000", "k", "s")).unwrap());

        let names: Vec<_> = manager
            .list()
            .unwrap()
            .into_iter()
            .map(|a| (a.name, a.endpoint))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), "http://three:9000".to_string()),
                ("b".to_string(), "http://two:9000".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_alias_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        assert!(manager.set(Alias::new("x", "localhost", "a", "b")).is_err());
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        manager.set(Alias::new("gone", "http://host:9000", "a", "b")).unwrap();
        manager.remove("gone").unwrap();
        assert!(matches!(
            manager.get("gone").unwrap_err(),
            Error::AliasNotFound(_)
        ));
        assert!(matches!(
            manager.remove("gone").unwrap_err(),
            Error::AliasNotFound(_)
        ));
    }

    #[test]
    fn test_stored_lookup_is_lowercase() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let mut alias = Alias::new("aws", "https://s3.amazonaws.com", "a", "b");
        alias.bucket_lookup = BucketLookup::Dns;
        manager.set(alias).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(raw.contains("bucket_lookup = \"dns\""));
    }
}
