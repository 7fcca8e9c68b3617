//! Object path parsing
//!
//! Select targets a single object, written as `alias/bucket/key`.

use crate::error::{Error, Result};

/// A parsed remote path pointing to one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    /// Alias name
    pub alias: String,
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

impl ObjectPath {
    pub fn new(
        alias: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.alias, self.bucket, self.key)
    }
}

/// Parse `alias/bucket/key` into an [`ObjectPath`]
///
/// The key may contain further slashes but may not be empty or end in one.
pub fn parse_object_path(path: &str) -> Result<ObjectPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let parts: Vec<&str> = path.splitn(3, '/').collect();
    let [alias, bucket, key] = parts[..] else {
        return Err(Error::InvalidPath(format!(
            "'{path}' is incomplete. Use format: alias/bucket/key"
        )));
    };

    if !is_valid_alias_name(alias) {
        return Err(Error::InvalidPath(format!("Invalid alias name '{alias}'")));
    }

    if bucket.is_empty() {
        return Err(Error::InvalidPath("Bucket name cannot be empty".into()));
    }

    if key.is_empty() || key.ends_with('/') {
        return Err(Error::InvalidPath(format!(
            "'{path}' does not name an object"
        )));
    }

    Ok(ObjectPath::new(alias, bucket, key))
}

/// Check if a string is a valid alias name
pub fn is_valid_alias_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_path() {
        let path = parse_object_path("minio/bucket/users.ndjson").unwrap();
        assert_eq!(path.alias, "minio");
        assert_eq!(path.bucket, "bucket");
        assert_eq!(path.key, "users.ndjson");
    }

    #[test]
    fn test_parse_nested_key() {
        let path = parse_object_path("s3/logs/2024/01/app.ndjson").unwrap();
        assert_eq!(path.bucket, "logs");
        assert_eq!(path.key, "2024/01/app.ndjson");
        assert_eq!(path.to_string(), "s3/logs/2024/01/app.ndjson");
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(matches!(parse_object_path(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_parse_incomplete_path() {
        assert!(parse_object_path("minio").is_err());
        assert!(parse_object_path("minio/bucket").is_err());
        assert!(parse_object_path("minio//key").is_err());
    }

    #[test]
    fn test_parse_directory_key() {
        assert!(parse_object_path("minio/bucket/dir/").is_err());
        assert!(parse_object_path("minio/bucket/").is_err());
    }

    #[test]
    fn test_parse_invalid_alias() {
        let err = parse_object_path("my.alias/bucket/key").unwrap_err();
        assert_eq!(err.to_string(), "Invalid path: Invalid alias name 'my.alias'");
    }

    #[test]
    fn test_alias_names() {
        assert!(is_valid_alias_name("local_minio-2"));
        assert!(!is_valid_alias_name(""));
        assert!(!is_valid_alias_name("a b"));
    }
}
