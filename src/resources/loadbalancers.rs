//! Load balancers
//!
//! Read-side access to `v1/loadbalancers/{project_id}/{region_id}`.

use crate::client::{CloudClient, ResourceScope, ServiceClient};
use crate::error::Result;
use crate::pagination::{LinkedPage, Pager};
use crate::resources::tasks::{self, Task};
use crate::types::OptionStringExt;
use crate::variant::IpFamily;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;

pub const VERSION: &str = "v1";
pub const RESOURCE: &str = "loadbalancers";

const TASK_RESOURCE_KEY: &str = "loadbalancers";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisioningStatus {
    Active,
    Deleted,
    Error,
    PendingCreate,
    PendingUpdate,
    PendingDelete,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingStatus {
    Online,
    Offline,
    Degraded,
    Error,
    NoMonitor,
    Draining,
    #[serde(other)]
    Unknown,
}

/// How the load balancer reaches its members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferredConnectivity {
    L2,
    L3,
}

/// Reference to another resource by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemId {
    pub id: String,
}

/// Fixed IP of a network port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPortFixedIp {
    pub ip_address: IpAddr,
    pub subnet_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerFlavor {
    pub flavor_id: String,
    pub flavor_name: String,
    #[serde(default)]
    pub ram: Option<u32>,
    #[serde(default)]
    pub vcpus: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub period: u32,
}

/// Log shipping settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    pub enabled: bool,
    #[serde(default)]
    pub topic_name: Option<String>,
    #[serde(default)]
    pub destination_region_id: Option<u64>,
    #[serde(default)]
    pub retention_policy: Option<RetentionPolicy>,
}

/// A load balancer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub provisioning_status: ProvisioningStatus,
    pub operating_status: OperatingStatus,
    #[serde(default, deserialize_with = "blank_ip")]
    pub vip_address: Option<IpAddr>,
    #[serde(default)]
    pub vip_port_id: Option<String>,
    #[serde(default)]
    pub listeners: Vec<ItemId>,
    #[serde(default)]
    pub creator_task_id: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub project_id: u64,
    pub region_id: u64,
    pub region: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub flavor: Option<LoadBalancerFlavor>,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub vrrp_ips: Vec<NetworkPortFixedIp>,
    #[serde(default)]
    pub vip_ip_family: Option<IpFamily>,
    #[serde(default)]
    pub additional_vips: Vec<NetworkPortFixedIp>,
    #[serde(default)]
    pub logging: Option<Logging>,
    #[serde(default)]
    pub preferred_connectivity: Option<PreferredConnectivity>,
}

impl LoadBalancer {
    pub fn is_deleted(&self) -> bool {
        self.provisioning_status == ProvisioningStatus::Deleted
    }
}

/// An absent, `null` or empty address is no address
fn blank_ip<'de, D>(deserializer: D) -> std::result::Result<Option<IpAddr>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .none_if_empty()
        .map(|raw| raw.parse().map_err(D::Error::custom))
        .transpose()
}

/// One page of the load balancer collection
pub type LoadBalancerPage = LinkedPage<LoadBalancer>;

// ============================================================================
// Operations
// ============================================================================

pub fn service(cloud: &CloudClient) -> Result<ServiceClient> {
    cloud.service(VERSION, RESOURCE, ResourceScope::Regional)
}

pub fn list(client: &ServiceClient) -> Result<Pager<LoadBalancerPage>> {
    Ok(client.pager(client.service_url(&[])?))
}

pub async fn list_all(client: &ServiceClient) -> Result<Vec<LoadBalancer>> {
    list(client)?.all_pages().await
}

pub async fn get(client: &ServiceClient, load_balancer_id: &str) -> Result<LoadBalancer> {
    client.get_json(&client.service_url(&[load_balancer_id])?).await
}

/// Id of the load balancer a finished create task produced
pub fn extract_load_balancer_id_from_task(task: &Task) -> Result<String> {
    tasks::extract_created_id(task, TASK_RESOURCE_KEY, "loadbalancer")
}
