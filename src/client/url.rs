//! Storage URL parsing and joining
//!
//! A `StorageUrl` is either a plain local path (`./mirror`, `/var/backup`) or
//! a `scheme://host/path` address for a remote backend. Only enough structure
//! is kept to identify a backend, join child paths and print the result; the
//! heavy lifting belongs to the backend behind the URL.

use crate::types::DiffError;
use std::fmt;

/// Parsed storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUrl {
    scheme: Option<String>,
    host: Option<String>,
    path: String,
}

impl StorageUrl {
    /// Parse a raw URL string.
    ///
    /// Anything without a `scheme://` prefix is treated as a local path.
    pub fn parse(raw: &str) -> Result<Self, DiffError> {
        if raw.is_empty() {
            return Err(DiffError::UrlParse {
                url: raw.to_string(),
                reason: "empty URL".to_string(),
            });
        }

        let Some((scheme, rest)) = raw.split_once("://") else {
            return Ok(Self {
                scheme: None,
                host: None,
                path: raw.to_string(),
            });
        };

        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
            return Err(DiffError::UrlParse {
                url: raw.to_string(),
                reason: format!("invalid scheme '{}'", scheme),
            });
        }

        let (host, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        Ok(Self {
            scheme: Some(scheme.to_string()),
            host: Some(host.to_string()),
            path: path.to_string(),
        })
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Path component (for local URLs, the whole thing).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Join a relative child path onto this URL, preserving scheme and host.
    pub fn join(&self, relative: &str) -> StorageUrl {
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            return self.clone();
        }
        let mut path = self.path.trim_end_matches('/').to_string();
        path.push('/');
        path.push_str(relative);
        StorageUrl {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            path,
        }
    }

    /// Last path segment, used to project a file name into a directory.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.path)
    }

    /// The URL rendered with a trailing separator, so a relative key can be
    /// appended to reconstruct a full child URL without re-parsing.
    pub fn delimited(&self) -> String {
        let mut s = self.to_string();
        if !s.ends_with('/') {
            s.push('/');
        }
        s
    }
}

impl fmt::Display for StorageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.scheme, &self.host) {
            (Some(scheme), Some(host)) => write!(f, "{}://{}{}", scheme, host, self.path),
            _ => f.write_str(&self.path),
        }
    }
}
