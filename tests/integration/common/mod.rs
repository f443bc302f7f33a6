//! Shared fixtures for the integration tests
//!
//! - `client_for` points a client at a wiremock server
//! - `mount_*` helpers serve comic JSON and what-if pages
//! - `StubSource` is an in-memory comic source with instrumentation

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xkcd_ripple::config::ClientConfig;
use xkcd_ripple::{Comic, EntitySource, Image, XkcdClient, XkcdError};

/// Builds a client whose endpoints all live on the mock server
pub fn client_for(server: &MockServer) -> XkcdClient {
    client_with_download_dir(server, Path::new("."))
}

pub fn client_with_download_dir(server: &MockServer, directory: &Path) -> XkcdClient {
    let mut config = ClientConfig::default();
    config.endpoints.comic_base_url = format!("{}/", server.uri());
    config.endpoints.what_if_base_url = format!("{}/what-if/", server.uri());
    config.scan.concurrency = 4;
    config.scan.request_timeout_secs = 5;
    config.download.directory = directory.to_path_buf();
    XkcdClient::with_config(config).expect("Failed to build client")
}

/// A comic document as served by `info.0.json`
pub fn comic_json(number: u32, date: NaiveDate, title: &str, alt: &str) -> String {
    serde_json::json!({
        "month": date.format("%-m").to_string(),
        "num": number,
        "link": "",
        "year": date.format("%Y").to_string(),
        "news": "",
        "safe_title": title,
        "transcript": format!("[[{} transcript]]", title),
        "alt": alt,
        "img": format!("https://imgs.xkcd.com/comics/comic_{}.png", number),
        "title": title,
        "day": date.format("%-d").to_string(),
    })
    .to_string()
}

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2006, 1, 1).unwrap() + chrono::Duration::days(offset)
}

/// Serves comic `number` at `/{number}/info.0.json`
pub async fn mount_comic(server: &MockServer, number: u32, date: NaiveDate, title: &str, alt: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}/info.0.json", number)))
        .respond_with(ResponseTemplate::new(200).set_body_string(comic_json(number, date, title, alt)))
        .mount(server)
        .await;
}

/// Serves `latest` as the current comic at `/info.0.json`
pub async fn mount_latest_comic(server: &MockServer, latest: u32) {
    Mock::given(method("GET"))
        .and(path("/info.0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(comic_json(
            latest,
            day(latest as i64),
            &format!("Comic {}", latest),
            "",
        )))
        .mount(server)
        .await;
}

/// Serves comics `1..=latest`, one per day, titled "Comic n"
pub async fn mount_comic_range(server: &MockServer, latest: u32) {
    mount_latest_comic(server, latest).await;
    for number in 1..=latest {
        mount_comic(server, number, day(number as i64), &format!("Comic {}", number), "").await;
    }
}

pub fn archive_html(latest: u32) -> String {
    let entries: String = (1..=latest)
        .map(|n| format!(r#"<div class="archive-entry"><a href="/{}/">Article {}</a></div>"#, n, n))
        .collect();
    format!("<html><body>{}</body></html>", entries)
}

pub fn article_html(title: &str, question: &str, author: &str, body: &str) -> String {
    format!(
        r##"<html><body>
<h2 id="title"><a href="#">{}</a></h2>
<article id="entry">
<p id="question">{}</p>
<p id="attribute">-{}</p>
{}
</article>
</body></html>"##,
        title, question, author, body
    )
}

pub async fn mount_archive(server: &MockServer, latest: u32) {
    Mock::given(method("GET"))
        .and(path("/what-if/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_string(archive_html(latest)))
        .mount(server)
        .await;
}

pub async fn mount_article(server: &MockServer, number: u32, html: String) {
    Mock::given(method("GET"))
        .and(path(format!("/what-if/{}", number)))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

pub fn fixture_comic(number: u32, date: NaiveDate, title: &str) -> Comic {
    Comic {
        number,
        title: title.to_string(),
        safe_title: title.to_string(),
        transcript: String::new(),
        date,
        image: Image::new(format!("https://imgs.xkcd.com/comics/comic_{}.png", number), ""),
        url: format!("https://xkcd.com/{}", number),
        wiki_url: format!("https://explainxkcd.com/{}", number),
    }
}

/// In-memory comic source that records how it is used
pub struct StubSource {
    comics: HashMap<u32, Comic>,
    latest: u32,
    failing: HashSet<u32>,
    delays: HashMap<u32, Duration>,
    default_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetches: AtomicUsize,
    latest_calls: AtomicUsize,
}

impl StubSource {
    pub fn new(comics: Vec<Comic>) -> Self {
        let latest = comics.iter().map(|c| c.number).max().unwrap_or(0);
        Self {
            comics: comics.into_iter().map(|c| (c.number, c)).collect(),
            latest,
            failing: HashSet::new(),
            delays: HashMap::new(),
            default_delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
            latest_calls: AtomicUsize::new(0),
        }
    }

    /// One comic per day, titled "Comic n"
    pub fn sequential(count: u32) -> Self {
        Self::new(
            (1..=count)
                .map(|n| fixture_comic(n, day(n as i64), &format!("Comic {}", n)))
                .collect(),
        )
    }

    pub fn with_failing(mut self, numbers: &[u32]) -> Self {
        self.failing.extend(numbers.iter().copied());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn with_delay_for(mut self, number: u32, delay: Duration) -> Self {
        self.delays.insert(number, delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntitySource for StubSource {
    type Entity = Comic;

    async fn fetch_latest(&self) -> Result<u32, XkcdError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.latest)
    }

    async fn fetch_by_id(&self, number: u32) -> Result<Comic, XkcdError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(&number).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let url = format!("stub://{}", number);
        if self.failing.contains(&number) {
            return Err(XkcdError::Status { url, status: 404 });
        }
        self.comics
            .get(&number)
            .cloned()
            .ok_or(XkcdError::Status { url, status: 404 })
    }
}
