//! Regions
//!
//! Regions are global: `v1/regions` with no project or region prefix.

use crate::client::{CloudClient, ResourceScope, ServiceClient};
use crate::error::Result;
use crate::pagination::{LinkedPage, Pager};
use crate::types::naive_timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const VERSION: &str = "v1";
pub const RESOURCE: &str = "regions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionState {
    Active,
    Deleted,
    Deleting,
    DeletionFailed,
    Inactive,
    Maintenance,
    New,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeystoneState {
    New,
    Initialized,
    #[serde(other)]
    Unknown,
}

/// Which keystone endpoint a region talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    Admin,
    Internal,
    Public,
}

/// Identity service backing a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystone {
    pub id: u64,
    pub url: String,
    pub state: KeystoneState,
    #[serde(default)]
    pub keystone_federated_domain_id: Option<String>,
    #[serde(with = "naive_timestamp")]
    pub created_on: NaiveDateTime,
    #[serde(default, skip_serializing)]
    pub admin_password: Option<String>,
}

/// A region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: u64,
    pub display_name: String,
    pub keystone_name: String,
    pub state: RegionState,
    #[serde(default)]
    pub creator_task_id: Option<String>,
    pub endpoint_type: EndpointType,
    #[serde(default)]
    pub external_network_id: Option<String>,
    #[serde(default)]
    pub spice_proxy_url: Option<String>,
    #[serde(with = "naive_timestamp")]
    pub created_on: NaiveDateTime,
    pub keystone_id: u64,
    pub keystone: Keystone,
}

/// One page of the region collection
pub type RegionPage = LinkedPage<Region>;

pub fn service(cloud: &CloudClient) -> Result<ServiceClient> {
    cloud.service(VERSION, RESOURCE, ResourceScope::Global)
}

pub fn list(client: &ServiceClient) -> Result<Pager<RegionPage>> {
    Ok(client.pager(client.service_url(&[])?))
}

pub async fn list_all(client: &ServiceClient) -> Result<Vec<Region>> {
    list(client)?.all_pages().await
}

pub async fn get(client: &ServiceClient, region_id: u64) -> Result<Region> {
    client
        .get_json(&client.service_url(&[&region_id.to_string()])?)
        .await
}
