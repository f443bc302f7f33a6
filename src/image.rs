//! Image value object shared by comics and what-if articles

use serde::Serialize;
use url::Url;

/// An image referenced by a comic or an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Absolute URL of the image
    pub url: String,

    /// Title (alt) text shown on hover
    pub title: String,

    /// Last segment of the URL path, empty when the path has none
    pub filename: String,
}

impl Image {
    /// Creates an image, deriving the filename from the URL path
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        let url = url.into();
        let filename = filename_from_url(&url);
        Self {
            url,
            title: title.into(),
            filename,
        }
    }
}

/// Extracts the final path segment of a URL
fn filename_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .unwrap_or_default()
}
