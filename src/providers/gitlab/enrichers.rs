//! Reductions from raw GitLab sub-resources to the summary fields of an
//! inventory row. Nothing in here performs I/O.

use super::types::{
    GitLabCommit, GitLabMember, GitLabMergeRequest, GitLabPipeline, GitLabProjectDetails,
};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

const READ_ACCESS_LEVEL: u32 = 20;
const WRITE_ACCESS_LEVEL: u32 = 30;
const ADMIN_ACCESS_LEVEL: u32 = 40;

/// Everything the enrichers learned about one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectEnrichment {
    pub repository_size_mb: Option<f64>,
    pub merge_requests: MergeRequestSummary,
    pub latest_commit_date: Option<String>,
    pub pipeline_count: usize,
    pub total_commit_count: usize,
    pub members: MemberSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequestSummary {
    pub count: usize,
    /// `created_at` of the most recently *updated* merge request
    pub latest_created_at: Option<String>,
}

impl MergeRequestSummary {
    /// Expects the list ordered by `updated_at` descending, so the first entry
    /// is the most recently touched one regardless of its creation time.
    pub fn from_merge_requests(merge_requests: &[GitLabMergeRequest]) -> Self {
        Self {
            count: merge_requests.len(),
            latest_created_at: merge_requests.first().map(|mr| mr.created_at.clone()),
        }
    }
}

/// Access-level tiers: read is exactly 20, write exactly 30, admin 40 and
/// above. Other levels only count towards `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberSummary {
    pub read: usize,
    pub write: usize,
    pub admin: usize,
    pub total: usize,
}

impl MemberSummary {
    pub fn from_members(members: &[GitLabMember]) -> Self {
        members.iter().fold(
            Self {
                total: members.len(),
                ..Self::default()
            },
            |mut summary, member| {
                match member.access_level {
                    READ_ACCESS_LEVEL => summary.read += 1,
                    WRITE_ACCESS_LEVEL => summary.write += 1,
                    level if level >= ADMIN_ACCESS_LEVEL => summary.admin += 1,
                    _ => {}
                }
                summary
            },
        )
    }
}

/// Repository size in megabytes, rounded to two decimals with ties to even.
///
/// Missing statistics stay missing rather than becoming zero. A reported
/// size of 0 bytes is still a size and renders as `0.0`, not an empty cell.
pub fn repository_size_mb(details: &GitLabProjectDetails) -> Option<f64> {
    details
        .statistics
        .as_ref()
        .and_then(|stats| stats.repository_size)
        .map(bytes_to_megabytes)
}

#[allow(clippy::cast_precision_loss)]
fn bytes_to_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MEGABYTE * 100.0).round_ties_even() / 100.0
}

/// `committed_date` of the last commit in the (ascending) listing.
///
/// This is the last entry of the last non-empty page, which only matches the
/// newest commit when the server keeps its ordering across pages.
pub fn latest_commit_date(commits: &[GitLabCommit]) -> Option<String> {
    commits.last().map(|commit| commit.committed_date.clone())
}

/// Pipelines whose configuration parsed cleanly.
pub fn valid_pipeline_count(pipelines: &[GitLabPipeline]) -> usize {
    pipelines.iter().filter(|p| p.yaml_errors.is_none()).count()
}
