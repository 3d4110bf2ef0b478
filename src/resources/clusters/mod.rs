//! GPU bare-metal clusters
//!
//! Clusters live under `v3/gpu/baremetal/{project_id}/{region_id}/clusters`.
//! Create, delete and action calls start tasks; use
//! [`extract_cluster_id_from_task`] on the finished create task to learn the
//! new cluster id.

mod opts;
mod types;

pub use opts::{
    ClusterAction, ClusterActionOpts, CreateClusterOpts, DeleteClusterOpts, RenameClusterOpts,
    ServerCredentialsOpts, ServerSettingsOpts, VolumeOpts, VolumeSource,
};
pub use types::{Cluster, ClusterServerSettings, ClusterStatus, Tag, Volume, VolumeType};

use crate::client::{CloudClient, ResourceScope, ServiceClient};
use crate::error::Result;
use crate::pagination::{LinkedPage, Pager};
use crate::resources::tasks::{self, Task, TaskResults};
use crate::validate::build_request_body;
use tracing::{debug, info};

pub const VERSION: &str = "v3";
pub const RESOURCE: &str = "gpu/baremetal";

const CLUSTERS_PATH: &str = "clusters";
const ACTION_PATH: &str = "action";
const TASK_RESOURCE_KEY: &str = "ai_clusters";

/// One page of the cluster collection
pub type ClusterPage = LinkedPage<Cluster>;

/// Service client for clusters in the configured project and region
pub fn service(cloud: &CloudClient) -> Result<ServiceClient> {
    cloud.service(VERSION, RESOURCE, ResourceScope::Regional)
}

pub fn clusters_url(client: &ServiceClient) -> Result<String> {
    client.service_url(&[CLUSTERS_PATH])
}

pub fn cluster_url(client: &ServiceClient, cluster_id: &str) -> Result<String> {
    client.service_url(&[CLUSTERS_PATH, cluster_id])
}

pub fn cluster_action_url(client: &ServiceClient, cluster_id: &str) -> Result<String> {
    client.service_url(&[CLUSTERS_PATH, cluster_id, ACTION_PATH])
}

/// Pager over all clusters
pub fn list(client: &ServiceClient) -> Result<Pager<ClusterPage>> {
    Ok(client.pager(clusters_url(client)?))
}

/// Every cluster, across all pages
pub async fn list_all(client: &ServiceClient) -> Result<Vec<Cluster>> {
    list(client)?.all_pages().await
}

pub async fn get(client: &ServiceClient, cluster_id: &str) -> Result<Cluster> {
    client.get_json(&cluster_url(client, cluster_id)?).await
}

/// Start creating a cluster
pub async fn create(client: &ServiceClient, opts: &CreateClusterOpts) -> Result<TaskResults> {
    let body = build_request_body(opts)?;
    let url = clusters_url(client)?;
    let results: TaskResults = client.post_json(&url, &body).await?;
    info!("Creating GPU cluster '{}' (tasks: {:?})", opts.name, results.tasks);
    Ok(results)
}

/// Start deleting a cluster, optionally releasing attached resources
pub async fn delete(
    client: &ServiceClient,
    cluster_id: &str,
    opts: Option<&DeleteClusterOpts>,
) -> Result<TaskResults> {
    let mut url = cluster_url(client, cluster_id)?;
    if let Some(opts) = opts {
        url.push_str(&opts.to_query()?);
    }
    debug!("Deleting GPU cluster {}", cluster_id);
    client.delete_json(&url).await
}

/// Rename a cluster; answers with the updated cluster
pub async fn rename(
    client: &ServiceClient,
    cluster_id: &str,
    opts: &RenameClusterOpts,
) -> Result<Cluster> {
    let body = build_request_body(opts)?;
    client.patch_json(&cluster_url(client, cluster_id)?, &body).await
}

/// Run an action on a cluster
pub async fn action(
    client: &ServiceClient,
    cluster_id: &str,
    opts: &ClusterActionOpts,
) -> Result<TaskResults> {
    let body = build_request_body(opts)?;
    debug!("Running {:?} on GPU cluster {}", opts.action, cluster_id);
    client.post_json(&cluster_action_url(client, cluster_id)?, &body).await
}

/// Id of the cluster a finished create task produced
pub fn extract_cluster_id_from_task(task: &Task) -> Result<String> {
    tasks::extract_created_id(task, TASK_RESOURCE_KEY, "GPU cluster")
}
