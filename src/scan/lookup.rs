//! Search and date lookups built on the scanner

use crate::comic::Comic;
use crate::scan::{scan, PruneHint, ScanOptions, ScanStream, Searchable};
use crate::source::EntitySource;
use crate::{Result, XkcdError};
use chrono::NaiveDate;
use std::sync::Arc;

/// Streams every entity whose text contains `query`, ignoring case
///
/// The latest number is fetched once when the search starts. Entities that
/// fail to fetch or parse are skipped.
///
/// # Errors
///
/// * `XkcdError::Validation` - empty query or zero concurrency, raised
///   before any request is made
/// * fetch errors from resolving the latest number
pub async fn search<S>(
    source: Arc<S>,
    query: &str,
    options: &ScanOptions,
) -> Result<ScanStream<S::Entity>>
where
    S: EntitySource + 'static,
    S::Entity: Searchable,
{
    if query.is_empty() {
        return Err(XkcdError::Validation(
            "search query cannot be empty".to_string(),
        ));
    }
    options.validate()?;

    let latest = source.fetch_latest().await?;
    tracing::info!("Searching numbers 1..={} for '{}'", latest, query);

    let needle: Arc<str> = Arc::from(query.to_lowercase());
    scan(
        latest,
        move |number| search_one(Arc::clone(&source), Arc::clone(&needle), number),
        options,
    )
}

/// Streams the comics published on `date`
///
/// Comics are assumed to be numbered in publication order. When a comic
/// dated after `date` is seen, every higher number is pruned; numbers
/// still in flight at that moment are fetched but cannot match.
pub async fn find_by_date<S>(
    source: Arc<S>,
    date: NaiveDate,
    options: &ScanOptions,
) -> Result<ScanStream<Comic>>
where
    S: EntitySource<Entity = Comic> + 'static,
{
    options.validate()?;

    let latest = source.fetch_latest().await?;
    tracing::info!("Looking up comics dated {} in 1..={}", date, latest);

    let hint = PruneHint::new(latest);
    scan(
        latest,
        move |number| date_one(Arc::clone(&source), hint.clone(), date, number),
        options,
    )
}

async fn search_one<S>(source: Arc<S>, needle: Arc<str>, number: u32) -> Result<Option<S::Entity>>
where
    S: EntitySource,
    S::Entity: Searchable,
{
    let entity = source.fetch_by_id(number).await?;
    Ok(entity.matches_lowercase(&needle).then_some(entity))
}

async fn date_one<S>(
    source: Arc<S>,
    hint: PruneHint,
    date: NaiveDate,
    number: u32,
) -> Result<Option<Comic>>
where
    S: EntitySource<Entity = Comic>,
{
    if hint.should_skip(number) {
        return Ok(None);
    }

    let comic = source.fetch_by_id(number).await?;
    if comic.date > date {
        let bound = comic.number.saturating_sub(1);
        if hint.lower_to(bound) > bound {
            tracing::debug!("Pruning numbers above {}", bound);
        }
        return Ok(None);
    }

    Ok((comic.date == date).then_some(comic))
}
