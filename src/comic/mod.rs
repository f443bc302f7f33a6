//! xkcd comics
//!
//! `Comic` is the value object; `ComicSource` fetches it from the comic
//! site's JSON interface:
//! - `{base}info.0.json` is the latest comic
//! - `{base}{n}/info.0.json` is comic `n`

mod parser;

pub use parser::{map_comic, ComicDocument, ComicLinks};

use crate::client::{fetch_json, XkcdClient};
use crate::image::Image;
use crate::scan::Searchable;
use crate::source::{fetch_selected, EntitySource, Selection};
use crate::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

/// A single xkcd comic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comic {
    /// The comic's number, as reported by the comic document itself
    pub number: u32,
    pub title: String,
    pub safe_title: String,
    /// Transcript with HTML character references decoded
    pub transcript: String,
    /// Publication date
    pub date: NaiveDate,
    pub image: Image,
    /// Link to the comic page
    pub url: String,
    /// Link to the comic's explainer wiki page
    pub wiki_url: String,
}

impl Comic {
    /// Fetches the comic a selection refers to
    ///
    /// # Errors
    ///
    /// * `XkcdError::Validation` - `Selection::Number(0)`
    /// * `XkcdError::NotFound` - the number is after the latest comic
    /// * fetch errors for transport or decoding failures
    pub async fn fetch(client: &XkcdClient, selection: Selection) -> Result<Self> {
        fetch_selected(&client.comics(), selection).await
    }
}

impl Searchable for Comic {
    fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.safe_title.as_str(),
            self.transcript.as_str(),
            self.image.title.as_str(),
        ]
        .join("\n")
    }
}

/// HTTP source for comics
#[derive(Clone)]
pub struct ComicSource {
    client: XkcdClient,
}

impl ComicSource {
    pub fn new(client: XkcdClient) -> Self {
        Self { client }
    }

    fn document_url(&self, number: Option<u32>) -> Result<Url> {
        let base = &self.client.endpoints().comic;
        let url = match number {
            Some(number) => base.join(&format!("{}/info.0.json", number))?,
            None => base.join("info.0.json")?,
        };
        Ok(url)
    }

    async fn fetch_document(&self, number: Option<u32>) -> Result<(ComicDocument, Url)> {
        let url = self.document_url(number)?;
        let document = fetch_json(self.client.http(), &url).await?;
        Ok((document, url))
    }
}

#[async_trait]
impl EntitySource for ComicSource {
    type Entity = Comic;

    async fn fetch_latest(&self) -> Result<u32> {
        let (document, _) = self.fetch_document(None).await?;
        Ok(document.num)
    }

    async fn fetch_by_id(&self, number: u32) -> Result<Comic> {
        let (document, url) = self.fetch_document(Some(number)).await?;
        let endpoints = self.client.endpoints();
        let links = ComicLinks {
            site: &endpoints.comic,
            wiki: &endpoints.wiki,
        };
        map_comic(document, &links, &url)
    }
}
