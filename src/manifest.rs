//! Fleet manifest parsing
//!
//! A manifest is the declarative, on-disk form of a container-fleet
//! render request, in YAML or JSON:
//!
//! ```yaml
//! image: 123456789.dkr.ecr.us-east-1.amazonaws.com/app
//! os: ubuntu
//! env:
//!   DEBUG: "true"
//! cmd: python main.py
//! ```

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use tracing::debug;

use crate::image::ImageRef;
use crate::os::OsFamily;
use crate::userdata::ContainerFleet;
use crate::UserDataError;

/// Declarative container-fleet render request
#[derive(Debug, Clone, Deserialize)]
pub struct FleetManifest {
    /// Image repository path, e.g. `registry-host/team/app[:tag]`
    pub image: String,

    /// Fallback tag when `image` carries none
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Target OS family
    #[serde(default)]
    pub os: OsFamily,

    /// Container environment variables, document order preserved
    #[serde(default, deserialize_with = "ordered_env")]
    pub env: Vec<(String, String)>,

    /// Command override (empty keeps the image's entrypoint and command)
    #[serde(default)]
    pub cmd: String,

    /// Whether to inject AWS credentials into the container environment
    #[serde(default = "default_true")]
    pub include_aws_env: bool,
}

fn default_tag() -> String {
    "latest".to_string()
}

fn default_true() -> bool {
    true
}

impl FleetManifest {
    /// Parse a manifest from YAML text
    pub fn from_yaml(text: &str) -> Result<Self, UserDataError> {
        let manifest: Self = serde_yaml::from_str(text)?;
        debug!(image = %manifest.image, "parsed fleet manifest");
        Ok(manifest)
    }

    /// Parse a manifest from JSON text
    pub fn from_json(text: &str) -> Result<Self, UserDataError> {
        let manifest: Self = serde_json::from_str(text)?;
        debug!(image = %manifest.image, "parsed fleet manifest");
        Ok(manifest)
    }

    /// Convert into a renderable template
    pub fn into_user_data(self) -> ContainerFleet {
        ContainerFleet::new(ImageRef::new(self.image).with_tag(self.tag))
            .os(self.os)
            .envs(self.env)
            .cmd(self.cmd)
            .include_aws_env(self.include_aws_env)
    }
}

/// Deserialize a mapping into a vector of pairs, keeping document order
///
/// A `HashMap` would scramble the order and with it the rendered flag
/// order, breaking render determinism across loads of the same file.
fn ordered_env<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EnvVisitor;

    impl<'de> Visitor<'de> for EnvVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of environment variable names to values")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, String>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EnvVisitor)
}
