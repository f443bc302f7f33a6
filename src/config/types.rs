use serde::Deserialize;
use std::path::PathBuf;

/// Default number of in-flight requests during a scan
pub const DEFAULT_CONCURRENCY: usize = 32;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for xkcd-ripple
///
/// Every section is optional; missing sections and keys fall back to
/// the public xkcd endpoints and the default scan settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub endpoints: EndpointConfig,
    pub scan: ScanConfig,
    pub download: DownloadConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// Optional URL with information about the client operator
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: "xkcd-ripple".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.client_name, self.client_version, contact),
            None => format!("{}/{}", self.client_name, self.client_version),
        }
    }
}

/// Base URLs of the remote sites
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Comic site, serves `info.0.json` documents
    #[serde(rename = "comic-base-url")]
    pub comic_base_url: String,

    /// What-if site, serves the archive and article pages
    #[serde(rename = "what-if-base-url")]
    pub what_if_base_url: String,

    /// Explainer wiki, only used to build `Comic::wiki_url`
    #[serde(rename = "wiki-base-url")]
    pub wiki_base_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            comic_base_url: "https://xkcd.com/".to_string(),
            what_if_base_url: "https://what-if.xkcd.com/".to_string(),
            wiki_base_url: "https://explainxkcd.com/".to_string(),
        }
    }
}

/// Scan and request behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of concurrent fetches during a scan
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory used when no explicit destination is given
    pub directory: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}
