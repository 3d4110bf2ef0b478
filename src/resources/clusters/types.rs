//! GPU cluster resource types

use crate::variant::InterfaceConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    Active,
    Deleting,
    Error,
    New,
    Resizing,
    #[serde(other)]
    Unknown,
}

/// Storage class of a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeType {
    Standard,
    SsdHiiops,
    SsdLocal,
    SsdLowlatency,
    Cold,
    Ultra,
}

/// Key/value tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub read_only: bool,
}

/// Volume attached to every cluster server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub size: u32,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    #[serde(default, alias = "deleted_on_termination")]
    pub delete_on_termination: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub boot_index: Option<i32>,
    #[serde(default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Settings shared by all servers of a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterServerSettings {
    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,
    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub user_data: Option<String>,
    #[serde(default)]
    pub keypair_name: Option<String>,
}

/// A GPU cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub status: ClusterStatus,
    pub flavor_id: String,
    pub servers_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub servers_ids: Option<Vec<String>>,
    #[serde(default)]
    pub servers_settings: ClusterServerSettings,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Cluster {
    /// Value of a tag, if set
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}
