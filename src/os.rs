//! Operating-system families and their bootstrap command tables
//!
//! Maps an OS family to the package-manager commands that install a
//! container runtime and the AWS CLI on first boot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UserDataError;

/// Operating-system families accepted as render input
///
/// Only the yum and apt families have bootstrap mappings today; the
/// remaining variants are valid input values that fail at render time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    #[default]
    AmazonLinux,
    Debian,
    Ubuntu,
    RedHat,
    SuseLinux,
    Windows,
    Macos,
}

impl OsFamily {
    /// All accepted input values, in declaration order
    pub const ALL: [OsFamily; 7] = [
        OsFamily::AmazonLinux,
        OsFamily::Debian,
        OsFamily::Ubuntu,
        OsFamily::RedHat,
        OsFamily::SuseLinux,
        OsFamily::Windows,
        OsFamily::Macos,
    ];

    /// Name used on the wire, in manifests, and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmazonLinux => "amazon_linux",
            Self::Debian => "debian",
            Self::Ubuntu => "ubuntu",
            Self::RedHat => "red_hat",
            Self::SuseLinux => "suse_linux",
            Self::Windows => "windows",
            Self::Macos => "macos",
        }
    }

    /// The installer family this OS belongs to, if any
    pub fn installer_family(&self) -> Option<InstallerFamily> {
        match self {
            Self::AmazonLinux | Self::RedHat => Some(InstallerFamily::Yum),
            Self::Ubuntu | Self::Debian => Some(InstallerFamily::Apt),
            Self::SuseLinux | Self::Windows | Self::Macos => None,
        }
    }

    /// Commands that install Docker and the AWS CLI for this OS
    ///
    /// Fails with [`UserDataError::UnsupportedOs`] for families without
    /// a bootstrap mapping.
    pub fn bootstrap_commands(&self) -> Result<&'static [&'static str], UserDataError> {
        self.installer_family()
            .map(InstallerFamily::bootstrap_commands)
            .ok_or(UserDataError::UnsupportedOs { os: *self })
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OsFamily {
    type Err = UserDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|os| os.as_str() == s)
            .ok_or_else(|| UserDataError::InvalidData(format!("unknown OS family: {s}")))
    }
}

/// A group of distributions sharing one package-manager syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerFamily {
    Yum,
    Apt,
}

impl InstallerFamily {
    /// Bootstrap commands, one shell command per entry
    ///
    /// The apt group-add is best-effort (`|| true`): the default user
    /// name varies across apt distributions and may not exist, and the
    /// surrounding script runs under `set -e`. The yum branch stays
    /// strict.
    pub fn bootstrap_commands(self) -> &'static [&'static str] {
        match self {
            Self::Yum => &[
                "yum update -y",
                "yum install -y docker aws-cli",
                "service docker start",
                "usermod -a -G docker ec2-user",
            ],
            Self::Apt => &[
                "apt-get update -y",
                "apt-get install -y docker.io awscli",
                "systemctl enable docker",
                "systemctl start docker",
                "usermod -a -G docker ubuntu || true",
            ],
        }
    }
}
