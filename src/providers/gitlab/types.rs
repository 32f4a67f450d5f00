use serde::Deserialize;

/// A project as returned by `GET /projects`.
///
/// Only the fields the inventory reports are deserialized; everything else in
/// the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabProject {
    /// Numeric project ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// Namespace-qualified path (e.g., "group/subgroup/project")
    pub path_with_namespace: String,
    /// Owning namespace
    pub namespace: GitLabNamespace,
    /// HTTPS clone URL
    pub http_url_to_repo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabNamespace {
    /// "group" or "user"
    pub kind: String,
}

/// `GET /projects/:id?statistics=true`
#[derive(Debug, Clone, Deserialize)]
pub struct GitLabProjectDetails {
    #[serde(default)]
    pub statistics: Option<GitLabProjectStatistics>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabProjectStatistics {
    /// Repository size in bytes
    #[serde(default)]
    pub repository_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabMergeRequest {
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabCommit {
    pub committed_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabPipeline {
    /// Set when the pipeline's `.gitlab-ci.yml` failed to parse
    #[serde(default)]
    pub yaml_errors: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitLabMember {
    /// Numeric permission level; see `MemberSummary` for the tiers
    pub access_level: u32,
}
