//! Container image reference resolution
//!
//! Resolves a repository path like
//! `123456789.dkr.ecr.us-east-1.amazonaws.com/app[:tag]` into a fully
//! qualified image reference and its registry host.

/// A container image reference with a fallback tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    default_tag: String,
}

impl ImageRef {
    /// Create a reference with the `latest` fallback tag
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            default_tag: "latest".to_string(),
        }
    }

    /// Replace the fallback tag
    ///
    /// Ignored when the repository path already carries a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tag = tag.into();
        self
    }

    /// Fully qualified image reference
    ///
    /// A tag embedded in the final path segment wins; otherwise the
    /// fallback tag is appended. The check looks only at the segment
    /// after the last `/`, so a registry port (`host:5000/app`) is not
    /// mistaken for a tag.
    pub fn qualified(&self) -> String {
        let last_segment = self
            .repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository);

        if last_segment.contains(':') {
            self.repository.clone()
        } else {
            format!("{}:{}", self.repository, self.default_tag)
        }
    }

    /// Registry host: everything before the first `/`
    ///
    /// A path with no `/` is returned whole; an empty repository yields
    /// an empty host.
    pub fn registry_host(&self) -> &str {
        self.repository
            .split('/')
            .next()
            .unwrap_or(&self.repository)
    }
}
