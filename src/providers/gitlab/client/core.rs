use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{InventoryError, Result};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Query parameters as passed to `reqwest::RequestBuilder::query`.
pub type Query<'a> = [(&'a str, String)];

#[derive(Debug)]
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
    per_page: usize,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: Option<Token>, per_page: usize) -> Result<Self> {
        if per_page == 0 {
            return Err(InventoryError::Config("Page size must be at least 1".into()));
        }

        let client = Client::builder()
            .user_agent(concat!("glinventory/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InventoryError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Without a trailing slash `join` would replace the last path segment
        // of instances served under a prefix such as https://host/gitlab
        let mut base = base_url.trim_end_matches('/').to_owned();
        base.push('/');

        let api_url = Url::parse(&base)
            .map_err(|e| InventoryError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| InventoryError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
            per_page,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.header(TOKEN_HEADER, token.as_str())
        } else {
            request
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| InventoryError::Config(format!("Invalid endpoint '{path}': {e}")))
    }

    /// Performs one authenticated GET and decodes the JSON body.
    ///
    /// Any non-2xx status is turned into `InventoryError::Api` carrying the
    /// response body, and is never retried.
    pub(super) async fn get_json<T>(&self, path: &str, query: &Query<'_>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("GET {url} {query:?}");

        let response = self
            .auth_request(self.client.get(url.clone()).query(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(InventoryError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Walks a list endpoint page by page until the first empty page.
    ///
    /// Items are returned in server order. There is no upper bound on the
    /// number of pages and no deduplication across pages.
    pub(super) async fn fetch_all_pages<T>(&self, path: &str, query: &Query<'_>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut all_items = Vec::new();
        let mut page = 1usize;

        loop {
            let mut page_query = query.to_vec();
            page_query.push(("per_page", self.per_page.to_string()));
            page_query.push(("page", page.to_string()));

            let items: Vec<T> = self.get_json(path, &page_query).await?;
            if items.is_empty() {
                break;
            }

            debug!("{path}: page {page} returned {} items", items.len());
            all_items.extend(items);
            page += 1;
        }

        Ok(all_items)
    }
}
