//! EBS volume parameter shaping
//!
//! Converts a compact volume description into the `BlockDeviceMapping`
//! shape the EC2 launch API expects. Pure parameter shaping; the launch
//! call itself belongs to the provisioning collaborator.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Device names assigned to instance volumes, in attachment order
const DEVICE_NAMES: [&str; 5] = ["/dev/xvda", "/dev/xvdb", "/dev/xvdc", "/dev/xvdd", "/dev/xvde"];

/// EBS volume type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeMode {
    #[default]
    Gp3,
    Gp2,
    Standard,
}

/// EBS volume configuration for an instance
///
/// With `id` set, the mapping attaches an existing snapshot and survives
/// instance termination; otherwise a fresh volume of `gib` GiB is created
/// and deleted with the instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_gib")]
    pub gib: u32,
    #[serde(default)]
    pub mode: VolumeMode,
}

fn default_gib() -> u32 {
    8
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            id: None,
            gib: default_gib(),
            mode: VolumeMode::default(),
        }
    }
}

impl Volume {
    /// Shape this volume as a block device mapping for the given device
    pub fn to_block_device_mapping(&self, device_name: &str) -> BlockDeviceMapping {
        let ebs = match &self.id {
            Some(snapshot_id) => EbsSpec {
                snapshot_id: Some(snapshot_id.clone()),
                volume_size: None,
                delete_on_termination: false,
                volume_type: self.mode,
            },
            None => EbsSpec {
                snapshot_id: None,
                volume_size: Some(self.gib),
                delete_on_termination: true,
                volume_type: self.mode,
            },
        };

        BlockDeviceMapping {
            device_name: device_name.to_string(),
            ebs,
        }
    }
}

/// One entry of the EC2 `BlockDeviceMappings` launch parameter
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockDeviceMapping {
    pub device_name: String,
    pub ebs: EbsSpec,
}

/// The `Ebs` member of a block device mapping
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EbsSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_size: Option<u32>,
    pub delete_on_termination: bool,
    pub volume_type: VolumeMode,
}

/// Assign device names to a volume list, in order
///
/// Only `/dev/xvda` through `/dev/xvde` are available; volumes past the
/// fifth are ignored.
pub fn block_device_mappings(volumes: &[Volume]) -> Vec<BlockDeviceMapping> {
    if volumes.len() > DEVICE_NAMES.len() {
        debug!(
            dropped = volumes.len() - DEVICE_NAMES.len(),
            "more volumes than device names; extra volumes ignored"
        );
    }

    volumes
        .iter()
        .zip(DEVICE_NAMES)
        .map(|(volume, device_name)| volume.to_block_device_mapping(device_name))
        .collect()
}
