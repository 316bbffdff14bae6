//! Integration tests for gtstations

use gtgeo::GeoPoint;
use gtstations::{DirectoryClient, Error, PlaceCache, SelectionMode, StationFinder};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOUR: Duration = Duration::from_secs(3600);

/// Create a mock place catalog: Lyon (near Paris) and Tokyo (far).
fn mock_places_json() -> serde_json::Value {
    json!({
        "data": {
            "list": [
                {"id": "p-lyon", "title": "Lyon", "country": "France", "geo": [4.84, 45.76], "size": 2},
                {"id": "p-tokyo", "title": "Tokyo", "country": "Japan", "geo": [139.69, 35.69], "size": 2}
            ]
        }
    })
}

/// Create a mock channel list from `(station_id, title)` pairs
fn mock_channels_json(stations: &[(&str, &str)]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = stations
        .iter()
        .map(|(id, title)| json!({"page": {"url": format!("/listen/{title}/{id}"), "title": title}}))
        .collect();
    json!({"data": {"content": [{"items": items}]}})
}

fn directory_client(mock_server: &MockServer) -> DirectoryClient {
    DirectoryClient::builder()
        .api_base(mock_server.uri())
        .build()
        .unwrap()
}

// Paris: closer to Lyon than to Tokyo.
fn paris() -> GeoPoint {
    GeoPoint::new(48.85, 2.35)
}

#[tokio::test]
async fn test_fetch_places() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_places_json()))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let places = client.places().await.unwrap();

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].id, "p-lyon");
    assert_eq!(places[0].country, "France");
    assert_eq!(places[0].location().latitude, 45.76);
    assert_eq!(places[0].size, 2);
}

#[tokio::test]
async fn test_place_catalog_is_fetched_once_while_fresh() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_places_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut cache = PlaceCache::new(HOUR);

    let first = cache.ensure_fresh(&client).await.unwrap();
    let second = cache.ensure_fresh(&client).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert!(cache.is_fresh());
}

#[tokio::test]
async fn test_expired_catalog_is_refetched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_places_json()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut cache = PlaceCache::new(Duration::ZERO);

    cache.ensure_fresh(&client).await.unwrap();
    cache.ensure_fresh(&client).await.unwrap();
}

#[tokio::test]
async fn test_stale_catalog_survives_directory_outage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_places_json()))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut cache = PlaceCache::new(Duration::ZERO);
    let first = cache.ensure_fresh(&client).await.unwrap();
    assert_eq!(first.len(), 2);

    // Directory goes down; the expired snapshot keeps serving.
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let second = cache.ensure_fresh(&client).await.unwrap();
    assert_eq!(second.len(), 2);
}

#[tokio::test]
async fn test_cold_start_outage_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut cache = PlaceCache::new(HOUR);

    let err = cache.ensure_fresh(&client).await.unwrap_err();
    assert!(matches!(err, Error::DirectoryUnavailable(_)));
}

#[tokio::test]
async fn test_select_nearest_station() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_places_json()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/p-lyon/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_channels_json(&[
            ("alpha1", "Alpha FM"),
            ("alpha2", "Alpha Deux"),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/p-tokyo/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_channels_json(&[
            ("beta1", "Beta FM"),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/listen/alpha1/channel.mp3"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "http://cdn.example.net/alpha"),
        )
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut finder = StationFinder::new(client, HOUR, 20, SelectionMode::Nearest);

    let station = finder.select(paris()).await.unwrap();

    assert_eq!(station.station_id, "alpha1");
    assert_eq!(station.station_name, "Alpha FM");
    assert_eq!(station.location, "Lyon");
    assert_eq!(station.country, "France");
    assert_eq!(station.stream_url, "http://cdn.example.net/alpha");
}

#[tokio::test]
async fn test_budget_leaves_distant_places_unfetched() {
    let mock_server = MockServer::start().await;

    // Sizes 5 + 10 meet a budget of 12 before the third place.
    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "list": [
                    {"id": "p1", "title": "Near", "country": "A", "geo": [1.0, 1.0], "size": 5},
                    {"id": "p2", "title": "Mid", "country": "B", "geo": [10.0, 10.0], "size": 10},
                    {"id": "p3", "title": "Far", "country": "C", "geo": [60.0, 60.0], "size": 8}
                ]
            }
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/p1/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_channels_json(&[
            ("n1", "Near One"),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/p2/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_channels_json(&[
            ("m1", "Mid One"),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/p3/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_channels_json(&[
            ("f1", "Far One"),
        ])))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/listen/n1/channel.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut finder = StationFinder::new(client, HOUR, 12, SelectionMode::Nearest);

    let station = finder.select(GeoPoint::new(0.0, 0.0)).await.unwrap();
    assert_eq!(station.station_name, "Near One");
}

#[tokio::test]
async fn test_failed_place_is_skipped_but_stays_the_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_places_json()))
        .mount(&mock_server)
        .await;
    // The nearest place's channel list is down.
    Mock::given(method("GET"))
        .and(path("/page/p-lyon/channels"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/p-tokyo/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_channels_json(&[
            ("beta1", "Beta FM"),
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/listen/beta1/channel.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut finder = StationFinder::new(client, HOUR, 20, SelectionMode::Nearest);

    let station = finder.select(paris()).await.unwrap();

    // Station comes from Tokyo, the announced location from the nearest place.
    assert_eq!(station.station_name, "Beta FM");
    assert_eq!(station.location, "Lyon");
    assert_eq!(station.country, "France");
    assert_eq!(
        station.stream_url,
        format!("{}/listen/beta1/channel.mp3", mock_server.uri())
    );
}

#[tokio::test]
async fn test_no_channels_anywhere_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "list": [
                    {"id": "p-only", "title": "Quiet", "geo": [0.0, 0.0], "size": 1}
                ]
            }
        })))
        .mount(&mock_server)
        .await;
    // A payload without any content block counts as a failed place.
    Mock::given(method("GET"))
        .and(path("/page/p-only/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"content": []}})))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut finder = StationFinder::new(client, HOUR, 20, SelectionMode::Random);

    let err = finder.select(GeoPoint::new(0.0, 0.0)).await.unwrap_err();
    assert!(matches!(err, Error::NoChannelsFound { .. }));
}

#[tokio::test]
async fn test_empty_catalog_means_no_places() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"list": []}})))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let mut finder = StationFinder::new(client, HOUR, 20, SelectionMode::Random);

    let err = finder.select(paris()).await.unwrap_err();
    assert!(matches!(err, Error::NoPlacesFound { .. }));
}

#[tokio::test]
async fn test_stream_probe_follows_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/listen/abc/channel.mp3"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "http://cdn.example.net/live"),
        )
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let url = client.resolve_stream_url("abc").await;
    assert_eq!(url, "http://cdn.example.net/live");
}

#[tokio::test]
async fn test_stream_probe_without_redirect_keeps_probed_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/listen/abc/channel.mp3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let url = client.resolve_stream_url("abc").await;
    assert_eq!(url, format!("{}/listen/abc/channel.mp3", mock_server.uri()));
}

#[tokio::test]
async fn test_see_other_is_not_treated_as_a_stream_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/listen/abc/channel.mp3"))
        .respond_with(
            ResponseTemplate::new(303).insert_header("Location", "http://cdn.example.net/other"),
        )
        .mount(&mock_server)
        .await;

    let client = directory_client(&mock_server);
    let url = client.resolve_stream_url("abc").await;
    assert_eq!(url, format!("{}/listen/abc/channel.mp3", mock_server.uri()));
}
