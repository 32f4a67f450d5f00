use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file structure for glinventory.
///
/// Every value has a default, so a missing file behaves exactly like an
/// empty one. Command-line flags are applied on top of whatever is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// GitLab connection settings
    #[serde(default)]
    pub gitlab: GitLabConfig,

    /// Report destination and format
    #[serde(default)]
    pub output: OutputConfig,

    /// Enrichment windows and scheduling
    #[serde(default)]
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitLabConfig {
    /// GitLab personal access token
    pub token: Option<String>,

    /// GitLab instance base URL
    #[serde(default = "default_gitlab_base_url")]
    pub base_url: String,

    /// Page size used for every list endpoint
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Report file path (ignored by the table format)
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Report format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Table,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InventoryConfig {
    /// Merge requests created within this many days are counted
    #[serde(default = "default_merge_request_days")]
    pub merge_request_days: u32,

    /// Commits within this many years feed the latest commit date
    #[serde(default = "default_commit_years")]
    pub commit_years: u32,

    /// Number of projects enriched at once (1 means strictly sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_gitlab_base_url(),
            per_page: default_per_page(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::Csv,
            pretty: false,
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            merge_request_days: default_merge_request_days(),
            commit_years: default_commit_years(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_gitlab_base_url() -> String {
    "https://gitlab.com".to_string()
}

fn default_per_page() -> usize {
    100
}

fn default_output_path() -> PathBuf {
    PathBuf::from("gitlab_projects_inventory.csv")
}

fn default_merge_request_days() -> u32 {
    30
}

fn default_commit_years() -> u32 {
    2
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./glinventory.toml
    /// 3. ./glinventory.json
    /// 4. ./glinventory.yaml
    /// 5. ./glinventory.yml
    /// 6. `<user config dir>/glinventory/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if path.exists() {
                return Self::load_from_path(path);
            }
            log::warn!("Config file not found: {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let candidates = [
            "glinventory.toml",
            "glinventory.json",
            "glinventory.yaml",
            "glinventory.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(user_config) =
            dirs::config_dir().map(|dir| dir.join("glinventory").join("config.toml"))
        {
            if user_config.exists() {
                return Self::load_from_path(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.gitlab.per_page == 0 {
            anyhow::bail!("per-page must be at least 1");
        }
        if self.inventory.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        Ok(())
    }
}
