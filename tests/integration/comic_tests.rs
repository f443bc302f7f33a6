//! Integration tests for comics
//!
//! These tests use wiremock to stand in for the comic site's JSON interface.

mod common;

use common::{client_for, day, mount_comic, mount_comic_range, mount_latest_comic};
use futures::StreamExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xkcd_ripple::{Comic, Selection, XkcdError};

#[tokio::test]
async fn test_latest_comic() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 3).await;
    let client = client_for(&server);

    let comic = client.latest_comic().await.expect("latest comic");

    assert_eq!(comic.number, 3);
    assert_eq!(comic.title, "Comic 3");
    assert_eq!(comic.date, day(3));
    assert_eq!(comic.url, format!("{}/3", server.uri()));
    assert!(comic.wiki_url.starts_with("https://explainxkcd.com/"));
    assert_eq!(comic.image.filename, "comic_3.png");
}

#[tokio::test]
async fn test_specific_comic() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 2000).await;
    mount_comic(
        &server,
        353,
        chrono::NaiveDate::from_ymd_opt(2007, 12, 5).unwrap(),
        "Python",
        "I wrote 20 short programs in Python yesterday.",
    )
    .await;
    let client = client_for(&server);

    let comic = client.comic(353).await.expect("comic 353");

    assert_eq!(comic.number, 353);
    assert!(comic.title.contains("Python"));
    assert_eq!(comic.image.title, "I wrote 20 short programs in Python yesterday.");
    assert_eq!(comic.wiki_url, "https://explainxkcd.com/353");
}

#[tokio::test]
async fn test_comic_number_matches_request() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 5).await;
    let client = client_for(&server);

    for number in 1..=5 {
        let comic = client.comic(number).await.unwrap();
        assert_eq!(comic.number, number);
    }
}

#[tokio::test]
async fn test_random_comic_in_range() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 5).await;
    let client = client_for(&server);

    for _ in 0..5 {
        let comic = client.random_comic().await.unwrap();
        assert!((1..=5).contains(&comic.number));
    }
}

#[tokio::test]
async fn test_random_with_number_fails_before_any_request() {
    let server = MockServer::start().await;

    for number in [1, 353, 999_999] {
        let result = Selection::from_args(Some(number), true);
        assert!(matches!(result, Err(XkcdError::Validation(_))));
    }

    let requests = server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_comic_beyond_latest_is_not_found() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 2000).await;
    let client = client_for(&server);

    let result = client.comic(999_999).await;

    assert!(matches!(
        result,
        Err(XkcdError::NotFound {
            number: 999_999,
            latest: 2000
        })
    ));
    // Only the latest lookup went out
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_comic_zero_is_validation_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let result = client.comic(0).await;

    assert!(matches!(result, Err(XkcdError::Validation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_comic_is_fetch_error() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 405).await;
    Mock::given(method("GET"))
        .and(path("/404/info.0.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let error = client.comic(404).await.unwrap_err();

    assert!(matches!(error, XkcdError::Status { status: 404, .. }));
    assert!(error.is_fetch_error());
}

#[tokio::test]
async fn test_malformed_document_is_parse_error() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 10).await;
    Mock::given(method("GET"))
        .and(path("/7/info.0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"num": 7, "title": "half"}"#))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let result = client.comic(7).await;

    assert!(matches!(result, Err(XkcdError::Parse { .. })));
}

#[tokio::test]
async fn test_fetch_is_idempotent() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 3).await;
    let client = client_for(&server);

    let first = Comic::fetch(&client, Selection::Number(2)).await.unwrap();
    let second = Comic::fetch(&client, Selection::Number(2)).await.unwrap();

    assert_eq!(first.number, second.number);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_stream_comics_one_to_two() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 5).await;
    let client = client_for(&server);

    let comics: Vec<Comic> = client
        .stream_comics(1, Some(2))
        .await
        .unwrap()
        .map(|comic| comic.unwrap())
        .collect()
        .await;

    let numbers: Vec<u32> = comics.iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_stream_comics_defaults_to_latest() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 4).await;
    let client = client_for(&server);

    let numbers: Vec<u32> = client
        .stream_comics(3, None)
        .await
        .unwrap()
        .map(|comic| comic.unwrap().number)
        .collect()
        .await;

    assert_eq!(numbers, vec![3, 4]);
}

#[tokio::test]
async fn test_stream_comics_invalid_ranges() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 10).await;
    let client = client_for(&server);

    assert!(matches!(
        client.stream_comics(0, None).await.err(),
        Some(XkcdError::Validation(_))
    ));
    assert!(matches!(
        client.stream_comics(5, Some(4)).await.err(),
        Some(XkcdError::Validation(_))
    ));
    // Checked before the latest lookup
    assert!(server.received_requests().await.unwrap().is_empty());

    assert!(matches!(
        client.stream_comics(1, Some(11)).await.err(),
        Some(XkcdError::Validation(_))
    ));
    assert!(matches!(
        client.stream_comics(11, None).await.err(),
        Some(XkcdError::Validation(_))
    ));
}

#[tokio::test]
async fn test_stream_comics_yields_errors_in_place() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 3).await;
    mount_comic(&server, 1, day(1), "Comic 1", "").await;
    mount_comic(&server, 3, day(3), "Comic 3", "").await;
    let client = client_for(&server);

    let results: Vec<_> = client.stream_comics(1, Some(3)).await.unwrap().collect().await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().number, 1);
    assert!(matches!(results[1], Err(XkcdError::Status { status: 404, .. })));
    assert_eq!(results[2].as_ref().unwrap().number, 3);
}

#[tokio::test]
async fn test_comics_from_date() {
    let server = MockServer::start().await;
    mount_comic_range(&server, 6).await;
    let client = client_for(&server);

    let target = client.comic(1).await.unwrap().date;
    let found: Vec<Comic> = client
        .comics_from_date(target, &client.scan_options())
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].number, 1);
}

#[tokio::test]
async fn test_search_comics() {
    let server = MockServer::start().await;
    mount_latest_comic(&server, 4).await;
    mount_comic(&server, 1, day(1), "Barrel", "").await;
    mount_comic(&server, 2, day(2), "Petit Trees", "").await;
    mount_comic(&server, 3, day(3), "Island", "a python in the sand").await;
    mount_comic(&server, 4, day(4), "Python", "").await;
    let client = client_for(&server);

    let mut numbers: Vec<u32> = client
        .search_comics("PYTHON", &client.scan_options())
        .await
        .unwrap()
        .map(|comic| comic.number)
        .collect()
        .await;
    numbers.sort_unstable();

    assert_eq!(numbers, vec![3, 4]);
}
