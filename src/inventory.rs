use serde::{Deserialize, Serialize};
use std::fmt;

/// Column headers of the inventory report, in record field order.
pub const REPORT_HEADER: [&str; 13] = [
    "Project Full Path",
    "Namespace",
    "Repository Size (MB)",
    "Clone URL",
    "Latest Merge Request Date",
    "Latest Commit Date",
    "Merge Request Count",
    "Pipeline Count",
    "Total Commit Count",
    "Read User Count",
    "Write User Count",
    "Admin User Count",
    "Total User Count",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    Group,
    User,
}

impl NamespaceKind {
    /// GitLab only distinguishes groups; every other kind is a user namespace.
    pub fn from_gitlab_kind(kind: &str) -> Self {
        if kind == "group" {
            Self::Group
        } else {
            Self::User
        }
    }
}

impl fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("group"),
            Self::User => f.write_str("user"),
        }
    }
}

/// One row of the inventory: a project's listing fields plus every
/// enricher's summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: u64,
    pub name: String,
    pub full_path: String,
    pub namespace: NamespaceKind,
    pub repository_size_mb: Option<f64>,
    pub clone_url: String,
    pub latest_merge_request_date: Option<String>,
    pub latest_commit_date: Option<String>,
    pub merge_request_count: usize,
    pub pipeline_count: usize,
    pub total_commit_count: usize,
    pub read_user_count: usize,
    pub write_user_count: usize,
    pub admin_user_count: usize,
    pub total_user_count: usize,
}

impl InventoryRecord {
    /// Cells in report order; absent values become empty strings.
    pub fn to_row(&self) -> [String; 13] {
        [
            self.full_path.clone(),
            self.namespace.to_string(),
            self.repository_size_mb
                .map(format_megabytes)
                .unwrap_or_default(),
            self.clone_url.clone(),
            self.latest_merge_request_date.clone().unwrap_or_default(),
            self.latest_commit_date.clone().unwrap_or_default(),
            self.merge_request_count.to_string(),
            self.pipeline_count.to_string(),
            self.total_commit_count.to_string(),
            self.read_user_count.to_string(),
            self.write_user_count.to_string(),
            self.admin_user_count.to_string(),
            self.total_user_count.to_string(),
        ]
    }
}

/// Renders a size with at least one decimal, so whole megabytes read `2.0`.
pub fn format_megabytes(mb: f64) -> String {
    let rendered = mb.to_string();
    if rendered.contains('.') {
        rendered
    } else {
        format!("{rendered}.0")
    }
}
