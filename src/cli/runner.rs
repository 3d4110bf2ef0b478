//! CLI runner - executes commands

use crate::cli::commands::{
    Cli, ClusterCommands, Commands, ListArgs, LoadBalancerCommands, OutputFormat, RegionCommands,
    TaskCommands,
};
use crate::client::CloudClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::pagination::{LinkedPage, Page, Pager};
use crate::resources::{clusters, loadbalancers, regions, tasks};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let cloud = CloudClient::from_config(self.load_config()?)?;

        match &self.cli.command {
            Commands::Regions { command } => self.regions(&cloud, command).await,
            Commands::Clusters { command } => self.clusters(&cloud, command).await,
            Commands::Loadbalancers { command } => self.load_balancers(&cloud, command).await,
            Commands::Tasks { command } => self.tasks(&cloud, command).await,
        }
    }

    /// Load configuration from `--config` or the environment, then apply overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::from_env()?,
        };

        if let Some(project_id) = self.cli.project {
            config = config.project(project_id);
        }
        if let Some(region_id) = self.cli.region {
            config = config.region(region_id);
        }
        debug!("Using API at {}", config.api_url);
        Ok(config)
    }

    async fn regions(&self, cloud: &CloudClient, command: &RegionCommands) -> Result<()> {
        let client = regions::service(cloud)?;
        match command {
            RegionCommands::List(args) => self.output_pages(regions::list(&client)?, *args).await,
            RegionCommands::Get { region_id } => {
                self.output(&regions::get(&client, *region_id).await?)
            }
        }
    }

    async fn clusters(&self, cloud: &CloudClient, command: &ClusterCommands) -> Result<()> {
        let client = clusters::service(cloud)?;
        match command {
            ClusterCommands::List(args) => {
                self.output_pages(clusters::list(&client)?, *args).await
            }
            ClusterCommands::Get { cluster_id } => {
                self.output(&clusters::get(&client, cluster_id).await?)
            }
            ClusterCommands::Rename { cluster_id, name } => {
                let opts = clusters::RenameClusterOpts::new(name.as_str());
                self.output(&clusters::rename(&client, cluster_id, &opts).await?)
            }
            ClusterCommands::Delete {
                cluster_id,
                all_floating_ips,
                all_reserved_fixed_ips,
                all_volumes,
                volume_ids,
            } => {
                let opts = clusters::DeleteClusterOpts {
                    all_floating_ips: *all_floating_ips,
                    all_reserved_fixed_ips: *all_reserved_fixed_ips,
                    all_volumes: *all_volumes,
                    volume_ids: volume_ids.clone(),
                    ..Default::default()
                };
                let results = clusters::delete(&client, cluster_id, Some(&opts)).await?;
                self.output(&results)
            }
        }
    }

    async fn load_balancers(
        &self,
        cloud: &CloudClient,
        command: &LoadBalancerCommands,
    ) -> Result<()> {
        let client = loadbalancers::service(cloud)?;
        match command {
            LoadBalancerCommands::List(args) => {
                self.output_pages(loadbalancers::list(&client)?, *args).await
            }
            LoadBalancerCommands::Get { load_balancer_id } => {
                self.output(&loadbalancers::get(&client, load_balancer_id).await?)
            }
        }
    }

    async fn tasks(&self, cloud: &CloudClient, command: &TaskCommands) -> Result<()> {
        let client = tasks::service(cloud)?;
        match command {
            TaskCommands::Get { task_id } => self.output(&tasks::get(&client, task_id).await?),
        }
    }

    /// Print resources page by page as they arrive
    async fn output_pages<T>(&self, mut pager: Pager<LinkedPage<T>>, args: ListArgs) -> Result<()>
    where
        T: DeserializeOwned + Serialize,
    {
        let mut count = 0usize;
        while let Some(page) = pager.next_page().await? {
            for item in page.extract()? {
                self.output(&item)?;
                count += 1;
            }
            if args
                .max_pages
                .is_some_and(|max| pager.pages_fetched() >= max)
            {
                debug!("Stopping after {} pages", pager.pages_fetched());
                break;
            }
        }
        info!(
            "Listed {} resources from {} pages",
            count,
            pager.pages_fetched()
        );
        Ok(())
    }

    /// Output a value in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_file(api_url: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_url: {api_url}\nproject_id: 1\nregion_id: 2\napi_token: t").unwrap();
        file
    }

    fn runner(config: &NamedTempFile, args: &[&str]) -> Runner {
        let path = config.path().to_string_lossy().to_string();
        let mut argv = vec!["gcorecloud", "--config", path.as_str()];
        argv.extend_from_slice(args);
        Runner::new(Cli::parse_from(argv))
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let file = config_file("https://api.example.com/cloud");
        let runner = runner(&file, &["-r", "9", "regions", "list"]);

        let config = runner.load_config().unwrap();
        assert_eq!(config.project_id, Some(1));
        assert_eq!(config.region_id, Some(9));
    }

    #[test]
    fn test_load_config_rejects_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_url: ftp://nowhere").unwrap();
        let runner = runner(&file, &["regions", "list"]);

        assert!(matches!(runner.load_config(), Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_run_lists_regions_across_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/regions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "links": [{"rel": "next", "href": format!("{}/v1/regions/page2", server.uri())}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/regions/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(1)
            .mount(&server)
            .await;

        let file = config_file(&server.uri());
        runner(&file, &["regions", "list"]).run().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_respects_max_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/regions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "links": [{"rel": "next", "href": format!("{}/v1/regions/page2", server.uri())}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/regions/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .expect(0)
            .mount(&server)
            .await;

        let file = config_file(&server.uri());
        runner(&file, &["regions", "list", "--max-pages", "1"])
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/tasks/t-1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let file = config_file(&server.uri());
        let err = runner(&file, &["tasks", "get", "t-1"]).run().await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }
}
