//! Mapping of `info.0.json` documents into `Comic`

use crate::comic::Comic;
use crate::image::Image;
use crate::{Result, XkcdError};
use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

/// The comic JSON document as served upstream
///
/// Date parts are strings upstream; `transcript` is HTML-escaped and often empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicDocument {
    pub num: u32,
    pub year: String,
    pub month: String,
    pub day: String,
    pub title: String,
    pub safe_title: String,
    #[serde(default)]
    pub transcript: String,
    pub img: String,
    #[serde(default)]
    pub alt: String,
}

/// Base URLs used to build the derived comic links
#[derive(Debug, Clone)]
pub struct ComicLinks<'a> {
    pub site: &'a Url,
    pub wiki: &'a Url,
}

/// Builds a `Comic` from a decoded document
///
/// # Arguments
///
/// * `document` - The decoded JSON document
/// * `links` - Site and wiki base URLs
/// * `source_url` - The URL the document came from, used in error messages
pub fn map_comic(document: ComicDocument, links: &ComicLinks<'_>, source_url: &Url) -> Result<Comic> {
    let date = parse_date(&document, source_url)?;
    let number = document.num;

    Ok(Comic {
        number,
        title: document.title,
        safe_title: document.safe_title,
        transcript: unescape_html(&document.transcript),
        date,
        image: Image::new(document.img, document.alt),
        url: links.site.join(&number.to_string())?.to_string(),
        wiki_url: links.wiki.join(&number.to_string())?.to_string(),
    })
}

fn parse_date(document: &ComicDocument, source_url: &Url) -> Result<NaiveDate> {
    let parse_err = |message: String| XkcdError::Parse {
        url: source_url.to_string(),
        message,
    };

    let year: i32 = document
        .year
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("invalid year '{}'", document.year)))?;
    let month: u32 = document
        .month
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("invalid month '{}'", document.month)))?;
    let day: u32 = document
        .day
        .trim()
        .parse()
        .map_err(|_| parse_err(format!("invalid day '{}'", document.day)))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| parse_err(format!("invalid date {}-{}-{}", year, month, day)))
}

/// Decodes HTML character references (`&quot;`, `&#39;`, ...)
///
/// Only references are touched; tag-shaped text and line endings are kept.
fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
