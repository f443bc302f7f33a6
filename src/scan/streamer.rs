//! Sequential range streamer

use crate::source::EntitySource;
use crate::{Result, XkcdError};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

/// Entities in ascending order; fetch errors are yielded in place
pub type RangeStream<T> = BoxStream<'static, Result<T>>;

/// Streams the entities numbered `start..=end`, one fetch at a time
///
/// `end` defaults to the latest published number. Bounds are checked
/// before any entity is fetched:
/// - `start` must be at least 1
/// - `end` must not be below `start`
/// - `end` must not be after the latest number
///
/// A failed fetch is yielded as an `Err` item and the stream moves on to
/// the next number; the consumer decides whether to stop.
pub async fn stream_range<S>(
    source: Arc<S>,
    start: u32,
    end: Option<u32>,
) -> Result<RangeStream<S::Entity>>
where
    S: EntitySource + 'static,
{
    if start < 1 {
        return Err(XkcdError::Validation(format!(
            "range start must be at least 1, got {}",
            start
        )));
    }

    if let Some(end) = end {
        if end < start {
            return Err(XkcdError::Validation(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
    }

    let latest = source.fetch_latest().await?;
    let end = end.unwrap_or(latest);

    if end > latest {
        return Err(XkcdError::Validation(format!(
            "range end {} is after the latest number {}",
            end, latest
        )));
    }

    if end < start {
        return Err(XkcdError::Validation(format!(
            "range start {} is after the latest number {}",
            start, latest
        )));
    }

    tracing::debug!("Streaming {}..={}", start, end);

    let entities = stream::iter(start..=end).then(move |number| {
        let source = Arc::clone(&source);
        async move { source.fetch_by_id(number).await }
    });

    Ok(entities.boxed())
}
