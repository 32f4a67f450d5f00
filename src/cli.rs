use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::{Config, OutputConfig, OutputFormat};
use crate::inventory::InventoryRecord;
use crate::output::{export_inventory, print_inventory_table, PhaseProgress};
use crate::providers::GitLabProvider;

#[derive(Parser)]
#[command(name = "glinventory")]
#[command(author, version, about = "GitLab Project Inventory", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./glinventory.{toml,json,yaml,yml})
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitLab instance base URL
    #[arg(short, long)]
    url: Option<String>,

    /// Report file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Page size for every list request
    #[arg(long)]
    per_page: Option<usize>,

    /// Number of projects enriched at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Count merge requests created within this many days
    #[arg(long)]
    merge_request_days: Option<u32>,

    /// Take the latest commit date from commits within this many years
    #[arg(long)]
    commit_years: Option<u32>,
}

impl Cli {
    /// Loads the config file and lays command-line flags over it.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(token) = &self.token {
            config.gitlab.token = Some(token.clone());
        }
        if let Some(url) = &self.url {
            config.gitlab.base_url = url.clone();
        }
        if let Some(per_page) = self.per_page {
            config.gitlab.per_page = per_page;
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.pretty {
            config.output.pretty = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.inventory.concurrency = concurrency;
        }
        if let Some(days) = self.merge_request_days {
            config.inventory.merge_request_days = days;
        }
        if let Some(years) = self.commit_years {
            config.inventory.commit_years = years;
        }

        config.validate()?;
        Ok(config)
    }

    pub async fn execute(&self) -> Result<()> {
        let config = self.resolve_config()?;

        info!("Collecting inventory from {}", config.gitlab.base_url);

        let token = config.gitlab.token.as_deref().map(Token::from);
        if token.is_none() {
            warn!("No GitLab token provided; member project listing will likely be rejected");
        }

        let provider = GitLabProvider::new(
            &config.gitlab.base_url,
            token,
            config.gitlab.per_page,
            config.inventory.clone(),
        )?;

        let records = provider
            .collect_inventory()
            .await
            .context("Failed to collect GitLab inventory")?;

        write_report(&records, &config.output)
    }
}

/// Writes the report only once every record is in memory, so a failed run
/// never touches an existing report.
fn write_report(records: &[InventoryRecord], output: &OutputConfig) -> Result<()> {
    if output.format == OutputFormat::Table {
        print_inventory_table(records);
        return Ok(());
    }

    let destination = output.path.display().to_string();
    let progress = PhaseProgress::start_phase_3(&destination);

    let file = File::create(&output.path)
        .with_context(|| format!("Failed to create report file: {destination}"))?;
    let mut writer = BufWriter::new(file);
    export_inventory(records, output.format, output.pretty, &mut writer)?;

    progress.finish_phase_3(&destination);
    info!("Inventory has been written to {destination}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("glinventory").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("glinventory.toml");
        std::fs::write(
            &config_path,
            r#"
[gitlab]
token = "from-file"
base-url = "https://file.example.com"

[inventory]
merge-request-days = 14
"#,
        )
        .unwrap();
        let config_arg = config_path.to_str().unwrap();

        let cli = parse(&[
            "--config",
            config_arg,
            "--url",
            "https://flag.example.com",
            "--format",
            "json",
            "-j",
            "4",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.gitlab.base_url, "https://flag.example.com");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.inventory.concurrency, 4);
        assert_eq!(config.inventory.merge_request_days, 14);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let cli = parse(&["--config", missing.to_str().unwrap(), "--per-page", "0"]);
        assert!(cli.resolve_config().is_err());
    }

    #[tokio::test]
    async fn test_failed_run_leaves_existing_report_untouched() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "401 Unauthorized"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.csv");
        std::fs::write(&report, "previous run\n").unwrap();
        let missing = dir.path().join("missing.toml");
        let url = server.url();

        let cli = parse(&[
            "--config",
            missing.to_str().unwrap(),
            "--url",
            url.as_str(),
            "--token",
            "bad-token",
            "--output",
            report.to_str().unwrap(),
        ]);

        let err = cli.execute().await.unwrap_err();
        assert!(format!("{err:#}").contains("401"));
        assert_eq!(std::fs::read_to_string(&report).unwrap(), "previous run\n");
    }

    #[tokio::test]
    async fn test_failed_run_creates_no_report() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.csv");
        let missing = dir.path().join("missing.toml");
        let url = server.url();

        let cli = parse(&[
            "--config",
            missing.to_str().unwrap(),
            "--url",
            url.as_str(),
            "--output",
            report.to_str().unwrap(),
        ]);

        assert!(cli.execute().await.is_err());
        assert!(!report.exists());
    }

    #[tokio::test]
    async fn test_enricher_failure_after_listing_leaves_report_untouched() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_body(
                r#"[{"id": 1, "name": "api", "path_with_namespace": "acme/api",
                     "namespace": {"kind": "group"},
                     "http_url_to_repo": "https://gitlab.example.com/acme/api.git"},
                    {"id": 2, "name": "web", "path_with_namespace": "acme/web",
                     "namespace": {"kind": "group"},
                     "http_url_to_repo": "https://gitlab.example.com/acme/web.git"}]"#,
            )
            .create_async()
            .await;
        let _listing_end = server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_body("[]")
            .create_async()
            .await;

        let mut project_mocks = Vec::new();
        for id in [1, 2] {
            project_mocks.push(
                server
                    .mock("GET", format!("/api/v4/projects/{id}").as_str())
                    .match_query(Matcher::Any)
                    .with_body("{}")
                    .create_async()
                    .await,
            );
            for endpoint in ["merge_requests", "repository/commits", "pipelines"] {
                project_mocks.push(
                    server
                        .mock("GET", format!("/api/v4/projects/{id}/{endpoint}").as_str())
                        .match_query(Matcher::Any)
                        .with_body("[]")
                        .create_async()
                        .await,
                );
            }
        }
        let _first_members = server
            .mock("GET", "/api/v4/projects/1/members/all")
            .match_query(Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;
        let second_members = server
            .mock("GET", "/api/v4/projects/2/members/all")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"message": "500 Internal Server Error"}"#)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.csv");
        std::fs::write(&report, "previous run\n").unwrap();
        let missing = dir.path().join("missing.toml");
        let url = server.url();

        let cli = parse(&[
            "--config",
            missing.to_str().unwrap(),
            "--url",
            url.as_str(),
            "--token",
            "glpat-test",
            "--output",
            report.to_str().unwrap(),
        ]);

        let err = cli.execute().await.unwrap_err();
        assert!(format!("{err:#}").contains("500"));
        second_members.assert_async().await;
        assert_eq!(std::fs::read_to_string(&report).unwrap(), "previous run\n");
    }

    #[tokio::test]
    async fn test_successful_run_writes_csv_report() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_body(
                r#"[{"id": 5, "name": "docs", "path_with_namespace": "jane/docs",
                     "namespace": {"kind": "user"},
                     "http_url_to_repo": "https://gitlab.example.com/jane/docs.git"}]"#,
            )
            .create_async()
            .await;
        let _listing_end = server
            .mock("GET", "/api/v4/projects")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_body("[]")
            .create_async()
            .await;
        let _details = server
            .mock("GET", "/api/v4/projects/5")
            .match_query(Matcher::Any)
            .with_body(r#"{"id": 5, "statistics": {"repository_size": 1310720}}"#)
            .create_async()
            .await;
        let mut sub_resources = Vec::new();
        for endpoint in ["merge_requests", "repository/commits", "pipelines", "members/all"] {
            sub_resources.push(
                server
                    .mock("GET", format!("/api/v4/projects/5/{endpoint}").as_str())
                    .match_query(Matcher::Any)
                    .with_body("[]")
                    .create_async()
                    .await,
            );
        }

        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("inventory.csv");
        let missing = dir.path().join("missing.toml");
        let url = server.url();

        let cli = parse(&[
            "--config",
            missing.to_str().unwrap(),
            "--url",
            url.as_str(),
            "--token",
            "glpat-test",
            "--output",
            report.to_str().unwrap(),
        ]);
        cli.execute().await.unwrap();

        let csv = std::fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Project Full Path,Namespace,"));
        assert_eq!(
            lines[1],
            "jane/docs,user,1.25,https://gitlab.example.com/jane/docs.git,,,0,0,0,0,0,0,0"
        );
    }
}
