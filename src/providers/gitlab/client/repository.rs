use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::providers::gitlab::types::{GitLabCommit, GitLabMergeRequest, GitLabPipeline};

use super::core::GitLabClient;

/// GitLab accepts ISO 8601 with a `Z` suffix for every date filter.
fn iso8601(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

impl GitLabClient {
    /// Merge requests in any state created after `created_after`, most
    /// recently updated first.
    pub async fn list_merge_requests(
        &self,
        project_id: u64,
        created_after: DateTime<Utc>,
    ) -> Result<Vec<GitLabMergeRequest>> {
        self.fetch_all_pages(
            &format!("projects/{project_id}/merge_requests"),
            &[
                ("created_after", iso8601(created_after)),
                ("state", "all".to_string()),
                ("order_by", "updated_at".to_string()),
                ("sort", "desc".to_string()),
            ],
        )
        .await
    }

    /// Commits on the default branch, optionally limited to those after `since`.
    pub async fn list_commits(
        &self,
        project_id: u64,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<GitLabCommit>> {
        let query = match since {
            Some(since) => vec![
                ("since", iso8601(since)),
                ("order_by", "created_at".to_string()),
            ],
            None => Vec::new(),
        };

        self.fetch_all_pages(&format!("projects/{project_id}/repository/commits"), &query)
            .await
    }

    pub async fn list_pipelines(&self, project_id: u64) -> Result<Vec<GitLabPipeline>> {
        self.fetch_all_pages(&format!("projects/{project_id}/pipelines"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    #[test]
    fn test_iso8601_uses_zulu_suffix() {
        let time = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(iso8601(time), "2024-03-05T07:08:09Z");
    }

    #[tokio::test]
    async fn test_merge_requests_query_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/7/merge_requests")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("created_after".into(), "2024-01-01T00:00:00Z".into()),
                Matcher::UrlEncoded("state".into(), "all".into()),
                Matcher::UrlEncoded("order_by".into(), "updated_at".into()),
                Matcher::UrlEncoded("sort".into(), "desc".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), None, 100).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let merge_requests = client.list_merge_requests(7, after).await.unwrap();

        assert!(merge_requests.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unbounded_commits_send_no_date_filter() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/7/repository/commits")
            .match_query(Matcher::Exact("per_page=100&page=1".into()))
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), None, 100).unwrap();
        let commits = client.list_commits(7, None).await.unwrap();

        assert!(commits.is_empty());
        mock.assert_async().await;
    }
}
