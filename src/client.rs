//! Service clients
//!
//! A [`CloudClient`] holds the configuration and the shared transport.
//! Resource modules ask it for a [`ServiceClient`]: the transport plus the
//! base URL of one resource family, e.g.
//! `{api_url}/v3/gpu/baremetal/{project_id}/{region_id}`.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::extract::extract_one_slice;
use crate::http::{HttpClient, Transport};
use crate::pagination::{LinkedPage, Pager};
use crate::types::JsonValue;
use crate::validate::Validate;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Whether a resource family lives under a project and region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    /// `{api_url}/{version}/{resource}`
    Global,
    /// `{api_url}/{version}/{resource}/{project_id}/{region_id}`
    Regional,
}

/// Entry point: configuration plus a shared transport
#[derive(Clone)]
pub struct CloudClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl CloudClient {
    /// Validate the config and build the default HTTP transport
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.to_http_config())?;
        debug!("Created cloud client for {}", config.api_url);
        Ok(Self {
            config,
            transport: Arc::new(http),
        })
    }

    /// Use a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Service client for a resource family, scoped with the configured ids
    pub fn service(
        &self,
        version: &str,
        resource: &str,
        scope: ResourceScope,
    ) -> Result<ServiceClient> {
        match scope {
            ResourceScope::Global => self.build_service(version, resource, &[]),
            ResourceScope::Regional => {
                let project_id = self
                    .config
                    .project_id
                    .ok_or_else(|| Error::missing_field("project_id"))?;
                let region_id = self
                    .config
                    .region_id
                    .ok_or_else(|| Error::missing_field("region_id"))?;
                self.regional_service(version, resource, project_id, region_id)
            }
        }
    }

    /// Service client for a resource family in an explicit project and region
    pub fn regional_service(
        &self,
        version: &str,
        resource: &str,
        project_id: u64,
        region_id: u64,
    ) -> Result<ServiceClient> {
        let project_id = project_id.to_string();
        let region_id = region_id.to_string();
        self.build_service(version, resource, &[project_id.as_str(), region_id.as_str()])
    }

    fn build_service(&self, version: &str, resource: &str, ids: &[&str]) -> Result<ServiceClient> {
        let mut parts = vec![version];
        parts.extend(resource.split('/').filter(|part| !part.is_empty()));
        parts.extend_from_slice(ids);

        let base = join_segments(&self.config.base_url()?, &parts)?;
        Ok(ServiceClient::new(Arc::clone(&self.transport), base))
    }
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Service Client
// ============================================================================

/// Transport plus the base URL of one resource family
#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    base: Url,
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn Transport>, base: Url) -> Self {
        Self { transport, base }
    }

    /// Base URL of the resource family
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Append path segments to the base URL
    pub fn service_url(&self, parts: &[&str]) -> Result<String> {
        Ok(join_segments(&self.base, parts)?.into())
    }

    /// Start a traversal over a `results`/`links` collection
    pub fn pager<T>(&self, url: impl Into<String>) -> Pager<LinkedPage<T>>
    where
        T: DeserializeOwned + 'static,
    {
        Pager::start(self.transport(), url, LinkedPage::from_response)
    }

    /// GET a single resource
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.transport.get(url).await?;
        extract_one_slice(&response.body)
    }

    /// POST a body and decode the response
    pub async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &JsonValue) -> Result<T> {
        let response = self.transport.post(url, body).await?;
        extract_one_slice(&response.body)
    }

    /// PATCH a body and decode the response
    pub async fn patch_json<T: DeserializeOwned>(&self, url: &str, body: &JsonValue) -> Result<T> {
        let response = self.transport.patch(url, body).await?;
        extract_one_slice(&response.body)
    }

    /// DELETE a resource and decode the response
    pub async fn delete_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.transport.delete(url).await?;
        extract_one_slice(&response.body)
    }
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

fn join_segments(base: &Url, parts: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::config(format!("'{base}' cannot be used as a base URL")))?
        .pop_if_empty()
        .extend(parts);
    Ok(url)
}
