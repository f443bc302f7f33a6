//! HTML parser for what-if pages
//!
//! This module handles parsing of:
//! - The archive page, to find the latest article number
//! - Article pages, into title, question, attribution and a typed body
//!
//! Body extraction rules, applied to the children of `<article id="entry">`
//! that carry no `id` attribute:
//! - `<p>`: text runs, `<a href>` links, `span.ref` footnotes and inline
//!   images, recursing through formatting elements such as `<em>`
//! - `<img>`: an image entry
//!
//! Relative `href`/`src` values are resolved against the page URL.

use crate::image::Image;
use crate::whatif::{Article, EntryItem, Hyperlink, RefSegment, Reference};
use crate::{Result, XkcdError};
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Compiles a CSS selector, reporting failures against the page being parsed
fn selector(css: &str, page_url: &Url) -> Result<Selector> {
    Selector::parse(css).map_err(|e| XkcdError::Parse {
        url: page_url.to_string(),
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

/// Extracts the latest article number from the archive page
///
/// The latest article is the last `.archive-entry`; its first link ends
/// with the article number (`/158` or `/158/`).
pub fn parse_archive_latest(html: &str, page_url: &Url) -> Result<u32> {
    let document = Html::parse_document(html);
    let entry_selector = selector(".archive-entry", page_url)?;
    let link_selector = selector("a[href]", page_url)?;

    let href = document
        .select(&entry_selector)
        .last()
        .and_then(|entry| entry.select(&link_selector).next())
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| XkcdError::MissingField {
            url: page_url.to_string(),
            field: "archive-entry",
        })?;

    let tail = href.trim().trim_end_matches('/').rsplit('/').next().unwrap_or("");

    tail.parse().map_err(|_| XkcdError::Parse {
        url: page_url.to_string(),
        message: format!("archive link '{}' does not end with an article number", href),
    })
}

/// Selectors used while walking an article body
struct BodySelectors {
    refnum: Selector,
    refbody: Selector,
}

/// Parses an article page
///
/// # Arguments
///
/// * `html` - The page content
/// * `number` - The requested article number; pages do not embed their own
/// * `page_url` - The page URL, for resolving relative links and error messages
///
/// # Returns
///
/// * `Ok(Article)` - Fully populated article
/// * `Err(XkcdError::MissingField)` - The page lacks the body, title or question
pub fn parse_article(html: &str, number: u32, page_url: &Url) -> Result<Article> {
    let document = Html::parse_document(html);
    let missing = |field: &'static str| XkcdError::MissingField {
        url: page_url.to_string(),
        field,
    };

    let body = first(&document, "article#entry", page_url)?
        .or(first(&document, "article", page_url)?)
        .ok_or_else(|| missing("article"))?;

    let title = first(&document, "h2#title > a", page_url)?
        .or(first(&document, "h2#title", page_url)?)
        .map(collapse_text)
        .ok_or_else(|| missing("title"))?;

    let question = first(&document, "p#question", page_url)?
        .map(collapse_text)
        .ok_or_else(|| missing("question"))?;

    let author = first(&document, "p#attribute", page_url)?
        .map(collapse_text)
        .map(|text| {
            text.trim_start_matches(['-', '\u{2013}', '\u{2014}'])
                .trim()
                .to_string()
        })
        .filter(|text| !text.is_empty());

    let selectors = BodySelectors {
        refnum: selector("span.refnum", page_url)?,
        refbody: selector("span.refbody", page_url)?,
    };

    let mut entry = Vec::new();
    for child in body.children().filter_map(ElementRef::wrap) {
        if child.value().id().is_some() {
            continue;
        }
        match child.value().name() {
            "p" => {
                let mut paragraph = Vec::new();
                walk_inline(child, &mut paragraph, page_url, &selectors);
                entry.extend(paragraph);
            }
            "img" => {
                if let Some(image) = image_from(child, page_url) {
                    entry.push(EntryItem::Image(image));
                }
            }
            _ => {}
        }
    }

    if entry.is_empty() {
        tracing::warn!("Article {} at {} has an empty body", number, page_url);
    }

    Ok(Article {
        number,
        title,
        question,
        author,
        url: page_url.to_string(),
        entry,
    })
}

/// Returns the first element matching `css`
fn first<'a>(document: &'a Html, css: &str, page_url: &Url) -> Result<Option<ElementRef<'a>>> {
    let selector = selector(css, page_url)?;
    Ok(document.select(&selector).next())
}

/// Element text with surrounding whitespace removed
fn collapse_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Walks the inline content of a paragraph
fn walk_inline(
    element: ElementRef<'_>,
    out: &mut Vec<EntryItem>,
    page_url: &Url,
    selectors: &BodySelectors,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                match child.value().name() {
                    "a" => match child.value().attr("href") {
                        Some(href) => out.push(EntryItem::Hyperlink(Hyperlink {
                            text: child.text().collect(),
                            url: resolve_url(page_url, href),
                        })),
                        None => push_text(out, &child.text().collect::<String>()),
                    },
                    "span" if child.value().classes().any(|class| class == "ref") => {
                        match reference_from(child, page_url, selectors) {
                            Some(reference) => out.push(EntryItem::Reference(reference)),
                            None => push_text(out, &child.text().collect::<String>()),
                        }
                    }
                    "img" => {
                        if let Some(image) = image_from(child, page_url) {
                            out.push(EntryItem::Image(image));
                        }
                    }
                    "br" => push_text(out, "\n"),
                    _ => walk_inline(child, out, page_url, selectors),
                }
            }
            _ => {}
        }
    }
}

/// Appends text, merging with a preceding text run
fn push_text(out: &mut Vec<EntryItem>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(EntryItem::Text(previous)) => previous.push_str(text),
        _ => out.push(EntryItem::Text(text.to_string())),
    }
}

/// Parses `span.ref`: `span.refnum` holds "[n]", `span.refbody` the footnote
fn reference_from(
    span: ElementRef<'_>,
    page_url: &Url,
    selectors: &BodySelectors,
) -> Option<Reference> {
    let number = span
        .select(&selectors.refnum)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .parse()
        .ok()?;

    let mut body = Vec::new();
    if let Some(refbody) = span.select(&selectors.refbody).next() {
        walk_reference_body(refbody, &mut body, page_url);
    }

    Some(Reference { number, body })
}

fn walk_reference_body(element: ElementRef<'_>, out: &mut Vec<RefSegment>, page_url: &Url) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_ref_text(out, text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                match (child.value().name(), child.value().attr("href")) {
                    ("a", Some(href)) => out.push(RefSegment::Hyperlink(Hyperlink {
                        text: child.text().collect(),
                        url: resolve_url(page_url, href),
                    })),
                    ("br", _) => push_ref_text(out, "\n"),
                    _ => walk_reference_body(child, out, page_url),
                }
            }
            _ => {}
        }
    }
}

fn push_ref_text(out: &mut Vec<RefSegment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(RefSegment::Text(previous)) => previous.push_str(text),
        _ => out.push(RefSegment::Text(text.to_string())),
    }
}

/// Builds an image from `src` and `title` (falling back to `alt`)
fn image_from(element: ElementRef<'_>, page_url: &Url) -> Option<Image> {
    let src = element.value().attr("src")?;
    let title = element
        .value()
        .attr("title")
        .or_else(|| element.value().attr("alt"))
        .unwrap_or("");
    Some(Image::new(resolve_url(page_url, src), title))
}

/// Resolves a possibly relative link against the page URL
fn resolve_url(page_url: &Url, href: &str) -> String {
    page_url
        .join(href.trim())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}
