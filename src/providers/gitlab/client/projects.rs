use crate::error::Result;
use crate::providers::gitlab::types::{GitLabMember, GitLabProject, GitLabProjectDetails};

use super::core::GitLabClient;

impl GitLabClient {
    /// Every project the token's user is a member of, in server order.
    pub async fn list_member_projects(&self) -> Result<Vec<GitLabProject>> {
        self.fetch_all_pages("projects", &[("membership", "true".to_string())])
            .await
    }

    /// Single project lookup with repository statistics included.
    pub async fn fetch_project_details(&self, project_id: u64) -> Result<GitLabProjectDetails> {
        self.get_json(
            &format!("projects/{project_id}"),
            &[("statistics", "true".to_string())],
        )
        .await
    }

    /// Direct and inherited members of a project.
    pub async fn list_project_members(&self, project_id: u64) -> Result<Vec<GitLabMember>> {
        self.fetch_all_pages(&format!("projects/{project_id}/members/all"), &[])
            .await
    }
}
