//! Entity sources and selection of which entity to fetch
//!
//! `EntitySource` is the seam between the scanner/streamer and the network:
//! the HTTP implementations live next to their entity types, and tests plug
//! in in-memory sources.

use crate::{Result, XkcdError};
use async_trait::async_trait;

/// A remote collection of numbered entities
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// The value object produced for one number
    type Entity: Send + 'static;

    /// Returns the highest currently published number
    ///
    /// Implementations must not cache this value; every call asks upstream.
    async fn fetch_latest(&self) -> Result<u32>;

    /// Fetches and maps the entity with the given number
    async fn fetch_by_id(&self, number: u32) -> Result<Self::Entity>;
}

/// Which entity a single-shot fetch should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The most recently published entity
    Latest,
    /// A specific number
    Number(u32),
    /// A number drawn uniformly from `[1, latest]`
    Random,
}

impl Selection {
    /// Builds a selection from an optional number and a random flag
    ///
    /// Supplying both a number and `random = true` is a validation error.
    pub fn from_args(number: Option<u32>, random: bool) -> Result<Self> {
        match (number, random) {
            (Some(_), true) => Err(XkcdError::Validation(
                "a number must not be given when random is requested".to_string(),
            )),
            (Some(number), false) => Ok(Self::Number(number)),
            (None, true) => Ok(Self::Random),
            (None, false) => Ok(Self::Latest),
        }
    }
}

/// Resolves a selection to a concrete number, asking the source for latest
pub async fn resolve_number<S>(source: &S, selection: Selection) -> Result<u32>
where
    S: EntitySource + ?Sized,
{
    if selection == Selection::Number(0) {
        return Err(XkcdError::Validation(
            "numbers start at 1".to_string(),
        ));
    }

    let latest = source.fetch_latest().await?;

    match selection {
        Selection::Latest => Ok(latest),
        Selection::Random => Ok(fastrand::u32(1..=latest.max(1))),
        Selection::Number(number) if number > latest => {
            Err(XkcdError::NotFound { number, latest })
        }
        Selection::Number(number) => Ok(number),
    }
}

/// Fetches the entity a selection refers to
pub async fn fetch_selected<S>(source: &S, selection: Selection) -> Result<S::Entity>
where
    S: EntitySource + ?Sized,
{
    let number = resolve_number(source, selection).await?;
    source.fetch_by_id(number).await
}
