//! AWS session and credential resolution
//!
//! A [`Session`] holds the region and key pair used for rendering,
//! resolved from the process environment with explicit overrides taking
//! precedence. Renderers never see the session itself; they receive an
//! immutable [`CredentialContext`] snapshot, so a field changing between
//! construction and render cannot leak into the output.

use std::env;

/// Environment variables consulted by [`Session::from_env`].
const REGION_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];
const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// AWS session configuration
///
/// Each field is independently optional; an absent field simply
/// contributes nothing to rendered scripts.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl Session {
    /// Create a session with no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from the process environment
    ///
    /// Reads `AWS_REGION` (falling back to `AWS_DEFAULT_REGION`),
    /// `AWS_ACCESS_KEY_ID`, and `AWS_SECRET_ACCESS_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create a session from an arbitrary variable lookup (useful for testing)
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let region = REGION_VARS.iter().find_map(|name| lookup(name));
        Self {
            region,
            access_key: lookup(ACCESS_KEY_VAR),
            secret_key: lookup(SECRET_KEY_VAR),
        }
    }

    /// Override the region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the access key
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Override the secret key
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }
}

/// Immutable credential snapshot consumed by renderers
///
/// Built once per render call; renderers read it and never write it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialContext {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl CredentialContext {
    /// Snapshot credentials from a session, if one is available
    ///
    /// With no session, all three fields are absent. Fields are copied
    /// verbatim; no validation and no network calls.
    pub fn resolve(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                region: session.region.clone(),
                access_key: session.access_key.clone(),
                secret_key: session.secret_key.clone(),
            },
            None => Self::default(),
        }
    }
}
