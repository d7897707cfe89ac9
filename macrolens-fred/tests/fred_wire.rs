use std::time::Duration;

use httpmock::prelude::*;
use macrolens_core::connector::{
    CurveProvider, SeriesMetadataProvider, SeriesObservationsProvider, TagDiscoveryProvider,
};
use macrolens_fred::FredConnector;
use macrolens_types::{Frequency, MacrolensError, ObservationsRequest};

fn connector(server: &MockServer) -> FredConnector {
    FredConnector::builder()
        .api_key("test-key")
        .base_url(server.base_url())
        .curve_request_delay(Duration::from_millis(0))
        .build()
}

#[tokio::test]
async fn metadata_parses_frequency_and_units() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/fred/series")
            .query_param("series_id", "CPIAUCSL")
            .query_param("api_key", "test-key")
            .query_param("file_type", "json");
        then.status(200).json_body(serde_json::json!({
            "seriess": [{
                "id": "CPIAUCSL",
                "title": "Consumer Price Index for All Urban Consumers",
                "frequency": "Monthly",
                "frequency_short": "M",
                "units": "Index 1982-1984=100",
                "seasonal_adjustment": "Seasonally Adjusted",
                "last_updated": "2026-08-12 07:44:03-05",
                "popularity": 93
            }]
        }));
    });

    let meta = connector(&server)
        .series_metadata("CPIAUCSL")
        .await
        .unwrap();
    m.assert();
    assert_eq!(meta.id, "CPIAUCSL");
    assert_eq!(meta.native_frequency, Some(Frequency::Monthly));
    assert_eq!(meta.units.as_deref(), Some("Index 1982-1984=100"));
    assert_eq!(meta.popularity, Some(93));
}

#[tokio::test]
async fn observations_pass_through_the_missing_marker() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/fred/series/observations")
            .query_param("series_id", "DGS10")
            .query_param("observation_start", "2026-01-01")
            .query_param("frequency", "m");
        then.status(200).json_body(serde_json::json!({
            "observations": [
                { "date": "2026-01-31", "value": "4.12" },
                { "date": "2026-02-28", "value": "." }
            ]
        }));
    });

    let req = ObservationsRequest {
        series_id: "DGS10".to_string(),
        start: Some(chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
        frequency: Some(Frequency::Monthly),
        ..Default::default()
    };
    let rows = connector(&server).observations(&req).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value.as_deref(), Some("4.12"));
    assert_eq!(rows[1].value.as_deref(), Some("."));
}

#[tokio::test]
async fn unknown_series_maps_to_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fred/series/observations");
        then.status(400).json_body(serde_json::json!({
            "error_code": 400,
            "error_message": "The series does not exist."
        }));
    });

    let req = ObservationsRequest {
        series_id: "NOPE".to_string(),
        ..Default::default()
    };
    let err = connector(&server).observations(&req).await.unwrap_err();
    assert!(matches!(err, MacrolensError::NotFound { .. }));
}

#[tokio::test]
async fn frequency_rejection_stays_a_recognizable_upstream_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fred/series/observations");
        then.status(400).json_body(serde_json::json!({
            "error_code": 400,
            "error_message": "Bad Request. The value for variable frequency is not acceptable."
        }));
    });

    let req = ObservationsRequest {
        series_id: "DGS10".to_string(),
        frequency: Some(Frequency::Weekly),
        ..Default::default()
    };
    let err = connector(&server).observations(&req).await.unwrap_err();
    assert!(err.is_frequency_rejection());
}

#[tokio::test]
async fn missing_credential_fails_before_any_network_call() {
    // No route is mocked: reaching the server at all would surface as an
    // upstream error, not the credential error asserted here.
    let server = MockServer::start();
    let connector = FredConnector::builder().base_url(server.base_url()).build();
    let err = connector.series_metadata("DGS10").await.unwrap_err();
    assert!(matches!(err, MacrolensError::NotConfigured { .. }));
}

#[tokio::test]
async fn curve_skips_unresolvable_tenors() {
    let server = MockServer::start();
    for (id, value) in [("DGS1", "4.8"), ("DGS2", "4.5"), ("DGS5", "4.3")] {
        server.mock(|when, then| {
            when.method(GET)
                .path("/fred/series/observations")
                .query_param("series_id", id)
                .query_param("sort_order", "desc");
            then.status(200).json_body(serde_json::json!({
                "observations": [
                    { "date": "2026-08-28", "value": value },
                ]
            }));
        });
    }
    // DGS10 only has missing markers, DGS30 errors outright
    server.mock(|when, then| {
        when.method(GET)
            .path("/fred/series/observations")
            .query_param("series_id", "DGS10");
        then.status(200).json_body(serde_json::json!({
            "observations": [ { "date": "2026-08-28", "value": "." } ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/fred/series/observations")
            .query_param("series_id", "DGS30");
        then.status(500).body("boom");
    });

    let points = connector(&server).yield_curve().await.unwrap();
    let tenors: Vec<&str> = points.iter().map(|p| p.tenor.as_str()).collect();
    assert_eq!(tenors, vec!["1Y", "2Y", "5Y"]);
    assert!((points[1].value - 4.5).abs() < 1e-9);
}

#[tokio::test]
async fn tag_discovery_round_trips() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/fred/series/tags")
            .query_param("series_id", "UNRATE");
        then.status(200).json_body(serde_json::json!({
            "tags": [
                { "name": "unemployment", "popularity": 80 },
                { "name": "labor", "popularity": 65 }
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/fred/tags/series")
            .query_param("tag_names", "unemployment;labor");
        then.status(200).json_body(serde_json::json!({
            "seriess": [{
                "id": "U6RATE",
                "title": "Total Unemployed Plus Marginal Attachment",
                "popularity": 55,
                "frequency": "Monthly",
                "units": "Percent"
            }]
        }));
    });

    let c = connector(&server);
    let tags = c.series_tags("UNRATE").await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "unemployment");

    let names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();
    let related = c.series_for_tags(&names, 20).await.unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, "U6RATE");
    assert_eq!(related[0].popularity, 55);
}
