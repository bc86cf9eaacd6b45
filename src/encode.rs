//! User-data payload encoding
//!
//! EC2 accepts user-data base64-encoded, and large payloads are commonly
//! gzip-compressed first to stay under the 16 KiB limit. The rendered
//! script itself is plain text; these helpers shape it for transport.

use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::UserDataError;

/// Transport encoding for a rendered script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// The script text as-is
    #[default]
    Plain,
    /// Base64 of the script bytes
    Base64,
    /// Gzip then base64, for payloads near the size limit
    GzipBase64,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Base64 => "base64",
            Self::GzipBase64 => "gzip",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = UserDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "base64" => Ok(Self::Base64),
            "gzip" => Ok(Self::GzipBase64),
            other => Err(UserDataError::InvalidData(format!(
                "unknown encoding: {other}"
            ))),
        }
    }
}

/// Encode a rendered script for transport
pub fn encode_payload(script: &str, encoding: Encoding) -> Result<String, UserDataError> {
    match encoding {
        Encoding::Plain => Ok(script.to_string()),
        Encoding::Base64 => Ok(base64_encode(script.as_bytes())),
        Encoding::GzipBase64 => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(script.as_bytes())?;
            let compressed = encoder.finish()?;
            Ok(base64_encode(&compressed))
        }
    }
}

fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}
