//! Client facade
//!
//! `XkcdClient` owns the HTTP client and configuration and exposes every
//! operation of the crate:
//! - Single comics and articles (by number, latest, or random)
//! - Sequential range streams
//! - Concurrent search and date lookup
//! - Image download and display
//!
//! Cloning is cheap; clones share the connection pool.

mod fetcher;

pub use fetcher::{build_http_client, fetch_bytes, fetch_json, fetch_page, fetch_text};

use crate::comic::{Comic, ComicSource};
use crate::config::{validate, ClientConfig};
use crate::download;
use crate::image::Image;
use crate::scan::{self, RangeStream, ScanOptions, ScanStream};
use crate::source::Selection;
use crate::whatif::{Article, WhatIfSource};
use crate::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Parsed base URLs of the remote sites
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub comic: Url,
    pub what_if: Url,
    pub wiki: Url,
}

impl Endpoints {
    fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            comic: Url::parse(&config.endpoints.comic_base_url)?,
            what_if: Url::parse(&config.endpoints.what_if_base_url)?,
            wiki: Url::parse(&config.endpoints.wiki_base_url)?,
        })
    }
}

/// Client for xkcd comics and what-if articles
#[derive(Clone)]
pub struct XkcdClient {
    http: Client,
    config: Arc<ClientConfig>,
    endpoints: Arc<Endpoints>,
}

impl XkcdClient {
    /// Creates a client for the public sites with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(XkcdClient)` - Ready to use client
    /// * `Err(XkcdError::Config)` - The configuration failed validation
    /// * `Err(XkcdError::Reqwest)` - The HTTP client could not be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        validate(&config)?;

        let endpoints = Endpoints::from_config(&config)?;
        let http = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.scan.request_timeout_secs),
        )?;

        tracing::debug!(
            "Client ready: comics at {}, what-if at {}",
            endpoints.comic,
            endpoints.what_if
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            endpoints: Arc::new(endpoints),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// The comic source backed by this client
    pub fn comics(&self) -> ComicSource {
        ComicSource::new(self.clone())
    }

    /// The what-if source backed by this client
    pub fn articles(&self) -> WhatIfSource {
        WhatIfSource::new(self.clone())
    }

    /// Scan options using the configured concurrency
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default().with_concurrency(self.config.scan.concurrency)
    }

    pub async fn comic(&self, number: u32) -> Result<Comic> {
        Comic::fetch(self, Selection::Number(number)).await
    }

    pub async fn latest_comic(&self) -> Result<Comic> {
        Comic::fetch(self, Selection::Latest).await
    }

    pub async fn random_comic(&self) -> Result<Comic> {
        Comic::fetch(self, Selection::Random).await
    }

    pub async fn article(&self, number: u32) -> Result<Article> {
        Article::fetch(self, Selection::Number(number)).await
    }

    pub async fn latest_article(&self) -> Result<Article> {
        Article::fetch(self, Selection::Latest).await
    }

    pub async fn random_article(&self) -> Result<Article> {
        Article::fetch(self, Selection::Random).await
    }

    /// Streams comics `start..=end` in order; `end` defaults to the latest
    pub async fn stream_comics(&self, start: u32, end: Option<u32>) -> Result<RangeStream<Comic>> {
        scan::stream_range(Arc::new(self.comics()), start, end).await
    }

    /// Streams articles `start..=end` in order; `end` defaults to the latest
    pub async fn stream_articles(
        &self,
        start: u32,
        end: Option<u32>,
    ) -> Result<RangeStream<Article>> {
        scan::stream_range(Arc::new(self.articles()), start, end).await
    }

    /// Streams comics whose text contains `query`, in completion order
    pub async fn search_comics(&self, query: &str, options: &ScanOptions) -> Result<ScanStream<Comic>> {
        scan::search(Arc::new(self.comics()), query, options).await
    }

    /// Streams articles whose text contains `query`, in completion order
    pub async fn search_articles(
        &self,
        query: &str,
        options: &ScanOptions,
    ) -> Result<ScanStream<Article>> {
        scan::search(Arc::new(self.articles()), query, options).await
    }

    /// Streams the comics published on `date`
    pub async fn comics_from_date(
        &self,
        date: NaiveDate,
        options: &ScanOptions,
    ) -> Result<ScanStream<Comic>> {
        scan::find_by_date(Arc::new(self.comics()), date, options).await
    }

    /// Downloads an image to `destination`, or into the download directory
    ///
    /// Returns the path written.
    pub async fn download_image(&self, image: &Image, destination: Option<&Path>) -> Result<PathBuf> {
        let path = match destination {
            Some(path) => path.to_path_buf(),
            None => download::default_path(&self.config.download.directory, image)?,
        };
        download::download_to(self.http(), image, &path).await?;
        Ok(path)
    }

    /// Downloads an image to the temporary directory and opens it in the platform viewer
    pub async fn show_image(&self, image: &Image) -> Result<PathBuf> {
        let path = download::default_path(&std::env::temp_dir(), image)?;
        download::download_to(self.http(), image, &path).await?;
        download::open_in_viewer(&path).await?;
        Ok(path)
    }
}
