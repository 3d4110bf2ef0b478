//! Request options for GPU cluster calls
//!
//! Every option struct implements [`Validate`]; the operations refuse to send
//! anything that fails it.

use super::types::VolumeType;
use crate::error::{Error, Result};
use crate::validate::{
    require_exclusive, require_non_empty, require_uuid4, require_uuid4_all, Validate,
};
use crate::variant::{encode_value, InterfaceConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::form_urlencoded;

// ============================================================================
// Create
// ============================================================================

/// Where a new volume gets its content from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    Image,
    Snapshot,
    New,
}

/// Volume created for every server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeOpts {
    pub source: VolumeSource,
    pub boot_index: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub delete_on_termination: bool,
    pub name: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
}

impl VolumeOpts {
    /// Boot volume built from an image
    pub fn from_image(
        name: impl Into<String>,
        image_id: impl Into<String>,
        size: u32,
        volume_type: VolumeType,
    ) -> Self {
        Self {
            source: VolumeSource::Image,
            boot_index: 0,
            delete_on_termination: true,
            name: name.into(),
            size,
            image_id: Some(image_id.into()),
            snapshot_id: None,
            tags: BTreeMap::new(),
            volume_type,
        }
    }
}

impl Validate for VolumeOpts {
    fn validate(&self) -> Result<()> {
        require_non_empty("volume.name", &self.name)?;
        if self.size == 0 {
            return Err(Error::validation("volume.size", "must be positive"));
        }
        if self.image_id.is_some() && self.snapshot_id.is_some() {
            return Err(Error::validation(
                "volume.image_id",
                "cannot be combined with 'snapshot_id'",
            ));
        }
        match self.source {
            VolumeSource::Image => {
                let image_id = self.image_id.as_deref().ok_or_else(|| {
                    Error::validation("volume.image_id", "is required when source is 'image'")
                })?;
                require_uuid4("volume.image_id", image_id)?;
            }
            VolumeSource::Snapshot => {
                let snapshot_id = self.snapshot_id.as_deref().ok_or_else(|| {
                    Error::validation("volume.snapshot_id", "is required when source is 'snapshot'")
                })?;
                require_uuid4("volume.snapshot_id", snapshot_id)?;
            }
            VolumeSource::New => {
                if let Some(id) = self.image_id.as_deref().or(self.snapshot_id.as_deref()) {
                    return Err(Error::validation(
                        "volume.source",
                        format!("'new' volume cannot reference '{id}'"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Login settings for the servers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCredentialsOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keypair_name: Option<String>,
}

/// Settings applied to every server of a new cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettingsOpts {
    pub interfaces: Vec<InterfaceConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_groups: Vec<String>,
    pub volumes: Vec<VolumeOpts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<ServerCredentialsOpts>,
}

impl Validate for ServerSettingsOpts {
    fn validate(&self) -> Result<()> {
        for interface in &self.interfaces {
            encode_value(interface)?;
            match interface {
                InterfaceConfig::Subnet(shape) => {
                    require_non_empty("interface.network_id", &shape.network_id)?;
                    require_non_empty("interface.subnet_id", &shape.subnet_id)?;
                }
                InterfaceConfig::AnySubnet(shape) => {
                    require_non_empty("interface.network_id", &shape.network_id)?;
                }
                InterfaceConfig::External(_) => {}
            }
        }
        for volume in &self.volumes {
            volume.validate()?;
        }
        Ok(())
    }
}

/// Options for creating a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClusterOpts {
    pub name: String,
    pub flavor: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers_count: Option<u32>,
    pub servers_settings: ServerSettingsOpts,
}

impl Validate for CreateClusterOpts {
    fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("flavor", &self.flavor)?;
        if self.servers_count == Some(0) {
            return Err(Error::validation("servers_count", "must be positive"));
        }
        self.servers_settings.validate()
    }
}

// ============================================================================
// Delete
// ============================================================================

/// What to release together with a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteClusterOpts {
    pub all_floating_ips: bool,
    pub all_reserved_fixed_ips: bool,
    pub all_volumes: bool,
    pub floating_ip_ids: Vec<String>,
    pub reserved_fixed_ip_ids: Vec<String>,
    pub volume_ids: Vec<String>,
}

impl DeleteClusterOpts {
    /// Validate and render as a query string, `""` when nothing is set
    pub fn to_query(&self) -> Result<String> {
        self.validate()?;

        let mut query = form_urlencoded::Serializer::new(String::new());
        let flags = [
            ("all_floating_ips", self.all_floating_ips),
            ("all_reserved_fixed_ips", self.all_reserved_fixed_ips),
            ("all_volumes", self.all_volumes),
        ];
        for (name, set) in flags {
            if set {
                query.append_pair(name, "true");
            }
        }
        let lists = [
            ("floating_ip_ids", &self.floating_ip_ids),
            ("reserved_fixed_ip_ids", &self.reserved_fixed_ip_ids),
            ("volume_ids", &self.volume_ids),
        ];
        for (name, ids) in lists {
            if !ids.is_empty() {
                query.append_pair(name, &ids.join(","));
            }
        }

        let query = query.finish();
        if query.is_empty() {
            Ok(query)
        } else {
            Ok(format!("?{query}"))
        }
    }
}

impl Validate for DeleteClusterOpts {
    fn validate(&self) -> Result<()> {
        require_exclusive(
            "all_floating_ips",
            self.all_floating_ips,
            "floating_ip_ids",
            &self.floating_ip_ids,
        )?;
        require_exclusive(
            "all_reserved_fixed_ips",
            self.all_reserved_fixed_ips,
            "reserved_fixed_ip_ids",
            &self.reserved_fixed_ip_ids,
        )?;
        require_exclusive("all_volumes", self.all_volumes, "volume_ids", &self.volume_ids)?;

        require_uuid4_all("floating_ip_ids", &self.floating_ip_ids)?;
        require_uuid4_all("reserved_fixed_ip_ids", &self.reserved_fixed_ip_ids)?;
        require_uuid4_all("volume_ids", &self.volume_ids)
    }
}

// ============================================================================
// Rename / Action
// ============================================================================

/// New name for a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameClusterOpts {
    pub name: String,
}

impl RenameClusterOpts {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for RenameClusterOpts {
    fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)
    }
}

/// Actions a cluster accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterAction {
    Start,
    Stop,
    SoftReboot,
    HardReboot,
    UpdateTags,
    Resize,
}

/// Options for running an action on a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterActionOpts {
    pub action: ClusterAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

impl ClusterActionOpts {
    pub fn new(action: ClusterAction) -> Self {
        Self {
            action,
            servers_count: None,
            tags: None,
        }
    }

    /// Change the number of servers
    pub fn resize(servers_count: u32) -> Self {
        Self {
            servers_count: Some(servers_count),
            ..Self::new(ClusterAction::Resize)
        }
    }

    /// Set tags on the cluster
    pub fn update_tags(tags: BTreeMap<String, String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::new(ClusterAction::UpdateTags)
        }
    }
}

impl Validate for ClusterActionOpts {
    fn validate(&self) -> Result<()> {
        match self.action {
            ClusterAction::Resize => match self.servers_count {
                None => Err(Error::validation("servers_count", "is required for 'resize'")),
                Some(0) => Err(Error::validation("servers_count", "must be positive")),
                Some(_) => Ok(()),
            },
            ClusterAction::UpdateTags => match &self.tags {
                Some(tags) if !tags.is_empty() => Ok(()),
                _ => Err(Error::validation("tags", "is required for 'update_tags'")),
            },
            _ => Ok(()),
        }
    }
}
