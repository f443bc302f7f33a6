//! What-if articles
//!
//! `Article` is the value object; `WhatIfSource` scrapes it from the
//! what-if site:
//! - `{base}archive` lists every article, the last entry being the latest
//! - `{base}{n}` is article `n`

mod parser;

pub use parser::{parse_archive_latest, parse_article};

use crate::client::{fetch_page, fetch_text, XkcdClient};
use crate::image::Image;
use crate::scan::Searchable;
use crate::source::{fetch_selected, EntitySource, Selection};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// A what-if article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub number: u32,
    pub title: String,
    pub question: String,
    /// Who asked the question, `None` when the page carries no attribution
    pub author: Option<String>,
    pub url: String,
    /// Article body in document order
    pub entry: Vec<EntryItem>,
}

/// One piece of an article body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EntryItem {
    Text(String),
    Image(Image),
    Hyperlink(Hyperlink),
    Reference(Reference),
}

/// Hyperlinked text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hyperlink {
    pub text: String,
    pub url: String,
}

impl fmt::Display for Hyperlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A numbered footnote shown on hover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub number: u32,
    pub body: Vec<RefSegment>,
}

/// A piece of a footnote body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RefSegment {
    Text(String),
    Hyperlink(Hyperlink),
}

impl Reference {
    /// Footnote body flattened to plain text
    pub fn text(&self) -> String {
        self.body
            .iter()
            .map(|segment| match segment {
                RefSegment::Text(text) => text.as_str(),
                RefSegment::Hyperlink(link) => link.text.as_str(),
            })
            .collect()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl EntryItem {
    /// The text a reader sees for this item
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Image(image) => image.title.clone(),
            Self::Hyperlink(link) => link.text.clone(),
            Self::Reference(reference) => reference.text(),
        }
    }
}

impl Article {
    /// Fetches the article a selection refers to
    pub async fn fetch(client: &XkcdClient, selection: Selection) -> Result<Self> {
        fetch_selected(&client.articles(), selection).await
    }

    /// Iterates over the images of the article body
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.entry.iter().filter_map(|item| match item {
            EntryItem::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Iterates over the footnotes of the article body
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.entry.iter().filter_map(|item| match item {
            EntryItem::Reference(reference) => Some(reference),
            _ => None,
        })
    }
}

impl Searchable for Article {
    fn searchable_text(&self) -> String {
        let mut text = format!("{}\n{}", self.title, self.question);
        if let Some(author) = &self.author {
            text.push('\n');
            text.push_str(author);
        }
        for item in &self.entry {
            text.push('\n');
            text.push_str(&item.text());
        }
        text
    }
}

/// HTTP source for what-if articles
#[derive(Clone)]
pub struct WhatIfSource {
    client: XkcdClient,
}

impl WhatIfSource {
    pub fn new(client: XkcdClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntitySource for WhatIfSource {
    type Entity = Article;

    async fn fetch_latest(&self) -> Result<u32> {
        let url = self.client.endpoints().what_if.join("archive")?;
        let html = fetch_text(self.client.http(), &url).await?;
        parse_archive_latest(&html, &url)
    }

    async fn fetch_by_id(&self, number: u32) -> Result<Article> {
        let url = self.client.endpoints().what_if.join(&number.to_string())?;
        // Upstream redirects `/{n}` to `/{n}/`; links resolve against the latter
        let (html, page_url) = fetch_page(self.client.http(), &url).await?;
        parse_article(&html, number, &page_url)
    }
}
