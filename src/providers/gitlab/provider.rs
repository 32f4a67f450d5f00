use chrono::{DateTime, Duration, Months, Utc};
use futures::{stream, StreamExt, TryStreamExt};
use log::{debug, info, warn};

use crate::auth::Token;
use crate::config::InventoryConfig;
use crate::error::{InventoryError, Result};
use crate::inventory::{InventoryRecord, NamespaceKind};
use crate::output::PhaseProgress;
use crate::providers::gitlab::client::GitLabClient;

use super::enrichers::{
    latest_commit_date, repository_size_mb, valid_pipeline_count, MemberSummary,
    MergeRequestSummary, ProjectEnrichment,
};
use super::types::GitLabProject;

/// Lower bounds for the time-windowed enrichers, fixed once per run.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentWindow {
    pub merge_requests_created_after: DateTime<Utc>,
    pub commits_since: DateTime<Utc>,
}

impl EnrichmentWindow {
    pub fn ending_at(now: DateTime<Utc>, settings: &InventoryConfig) -> Result<Self> {
        let merge_requests_created_after =
            Duration::try_days(i64::from(settings.merge_request_days))
                .and_then(|window| now.checked_sub_signed(window))
                .ok_or_else(|| {
                    InventoryError::Config(format!(
                        "Merge request window of {} days is out of range",
                        settings.merge_request_days
                    ))
                })?;
        let commits_since = now
            .checked_sub_months(Months::new(settings.commit_years.saturating_mul(12)))
            .ok_or_else(|| {
                InventoryError::Config(format!(
                    "Commit window of {} years is out of range",
                    settings.commit_years
                ))
            })?;

        Ok(Self {
            merge_requests_created_after,
            commits_since,
        })
    }
}

/// GitLab project inventory provider.
///
/// Lists every project the token can see as a member, then runs the
/// enrichers for each project and flattens the results into records that
/// keep the listing order.
pub struct GitLabProvider {
    client: GitLabClient,
    settings: InventoryConfig,
}

impl GitLabProvider {
    /// Creates a new provider against a GitLab instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base URL cannot be constructed or the page
    /// size is zero.
    pub fn new(
        base_url: &str,
        token: Option<Token>,
        per_page: usize,
        settings: InventoryConfig,
    ) -> Result<Self> {
        let client = GitLabClient::new(base_url, token, per_page)?;

        Ok(Self { client, settings })
    }

    /// Runs all enrichers for one project in a fixed order.
    async fn enrich_project(
        &self,
        project_id: u64,
        window: &EnrichmentWindow,
    ) -> Result<ProjectEnrichment> {
        let details = self.client.fetch_project_details(project_id).await?;

        let merge_requests = self
            .client
            .list_merge_requests(project_id, window.merge_requests_created_after)
            .await?;

        let recent_commits = self
            .client
            .list_commits(project_id, Some(window.commits_since))
            .await?;

        let pipelines = self.client.list_pipelines(project_id).await?;

        let total_commit_count = self.client.list_commits(project_id, None).await?.len();

        let members = self.client.list_project_members(project_id).await?;

        Ok(ProjectEnrichment {
            repository_size_mb: repository_size_mb(&details),
            merge_requests: MergeRequestSummary::from_merge_requests(&merge_requests),
            latest_commit_date: latest_commit_date(&recent_commits),
            pipeline_count: valid_pipeline_count(&pipelines),
            total_commit_count,
            members: MemberSummary::from_members(&members),
        })
    }

    /// Collects the inventory for every member project.
    ///
    /// Progress is displayed in two phases: listing projects, then enriching
    /// them. Up to `concurrency` projects are enriched at once, but records
    /// always come back in listing order.
    ///
    /// # Errors
    ///
    /// The first failed request aborts the whole collection; no partial
    /// inventory is returned.
    pub async fn collect_inventory(&self) -> Result<Vec<InventoryRecord>> {
        let window = EnrichmentWindow::ending_at(Utc::now(), &self.settings)?;
        info!("Using GitLab API at {}", self.client.api_url());
        debug!("Enrichment window: {window:?}");

        let progress = PhaseProgress::start_phase_1();

        let projects = self.client.list_member_projects().await?;
        info!("Found {} member projects", projects.len());

        if projects.is_empty() {
            warn!("No projects found for this token");
        }

        let progress = progress.finish_phase_1_start_phase_2(projects.len());

        let records: Vec<InventoryRecord> = stream::iter(projects)
            .map(|project| {
                let window = &window;
                let progress = &progress;
                async move {
                    debug!("Enriching project {}", project.path_with_namespace);
                    let enrichment = self.enrich_project(project.id, window).await?;
                    progress.advance(&project.path_with_namespace);
                    Ok::<_, InventoryError>(assemble_record(project, enrichment))
                }
            })
            .buffered(self.settings.concurrency.max(1))
            .try_collect()
            .await?;

        progress.finish_phase_2(records.len());
        info!("Enriched {} projects", records.len());

        Ok(records)
    }
}

/// Merges a listed project with its enrichment into one report row.
pub fn assemble_record(project: GitLabProject, enrichment: ProjectEnrichment) -> InventoryRecord {
    InventoryRecord {
        id: project.id,
        name: project.name,
        full_path: project.path_with_namespace,
        namespace: NamespaceKind::from_gitlab_kind(&project.namespace.kind),
        repository_size_mb: enrichment.repository_size_mb,
        clone_url: project.http_url_to_repo,
        latest_merge_request_date: enrichment.merge_requests.latest_created_at,
        latest_commit_date: enrichment.latest_commit_date,
        merge_request_count: enrichment.merge_requests.count,
        pipeline_count: enrichment.pipeline_count,
        total_commit_count: enrichment.total_commit_count,
        read_user_count: enrichment.members.read,
        write_user_count: enrichment.members.write,
        admin_user_count: enrichment.members.admin,
        total_user_count: enrichment.members.total,
    }
}
