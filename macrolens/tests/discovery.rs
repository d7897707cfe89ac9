use std::sync::Arc;

use chrono::NaiveDate;
use macrolens::{Macrolens, MacrolensError};
use macrolens_mock::MockConnector;
use macrolens_types::{RawObservation, RelatedSeries, SeriesMetadata, SeriesTag};

fn tag(name: &str, popularity: i64) -> SeriesTag {
    SeriesTag {
        name: name.to_string(),
        popularity,
    }
}

fn candidate(id: &str, popularity: i64) -> RelatedSeries {
    RelatedSeries {
        id: id.to_string(),
        title: format!("{id} title"),
        popularity,
        frequency: Some("Monthly".to_string()),
        units: Some("Percent".to_string()),
    }
}

#[tokio::test]
async fn related_series_walk_the_tag_graph_and_rank_by_popularity() {
    let mock = MockConnector::builder("mock")
        .with_series_tags(|_| Ok(vec![tag("inflation", 90), tag("prices", 70)]))
        .with_related_tags(|seeds| {
            assert_eq!(seeds, ["inflation", "prices"]);
            Ok(vec![tag("cpi", 85), tag("pce", 60)])
        })
        .with_tag_series(|names, limit| {
            assert_eq!(names, ["cpi", "pce"]);
            assert_eq!(limit, 20);
            Ok(vec![
                candidate("CPIAUCSL", 93),
                candidate("PCEPI", 80),
                candidate("CPILFESL", 88),
                candidate("PCEPI", 80), // duplicate, dropped
            ])
        })
        .build();
    let engine = Macrolens::builder().with_connector(mock).build().unwrap();

    let related = engine.related_series("CPIAUCSL").await;
    let ids: Vec<&str> = related.iter().map(|r| r.id.as_str()).collect();
    // origin filtered out, duplicate collapsed, descending popularity
    assert_eq!(ids, vec!["CPILFESL", "PCEPI"]);
}

#[tokio::test]
async fn empty_tag_expansion_stops_discovery() {
    // No related tags means no candidate query at all; the seeds must not
    // be reused as the candidate filter.
    let mock = MockConnector::builder("mock")
        .with_series_tags(|_| Ok(vec![tag("inflation", 90)]))
        .with_related_tags(|_| Ok(vec![]))
        .with_tag_series(|_, _| Ok(vec![candidate("PCEPI", 80)]))
        .build();
    let engine = Macrolens::builder()
        .with_connector(mock.clone())
        .build()
        .unwrap();

    let related = engine.related_series("CPIAUCSL").await;
    assert!(related.is_empty());
    assert!(
        !mock
            .calls()
            .iter()
            .any(|c| c.ends_with(":series_for_tags"))
    );
}

#[tokio::test]
async fn related_series_degrade_to_empty_on_any_failure() {
    let mock = MockConnector::builder("mock")
        .with_series_tags(|_| Err(MacrolensError::upstream("mock", "tag service down")))
        .build();
    let engine = Macrolens::builder().with_connector(mock).build().unwrap();

    assert!(engine.related_series("UNRATE").await.is_empty());
}

#[tokio::test]
async fn related_series_without_tag_support_are_empty() {
    let mock = MockConnector::builder("mock")
        .returns_observations_ok(vec![])
        .build();
    let engine = Macrolens::builder().with_connector(mock).build().unwrap();

    assert!(engine.related_series("UNRATE").await.is_empty());
}

#[tokio::test]
async fn search_falls_back_to_the_next_provider() {
    let broken = MockConnector::builder("broken")
        .with_search(|_, _| Err(MacrolensError::upstream("broken", "search down")))
        .build();
    let working = MockConnector::builder("working")
        .with_search(|query, _| {
            assert_eq!(query, "unemployment");
            Ok(vec![SeriesMetadata {
                id: "UNRATE".to_string(),
                title: "Unemployment Rate".to_string(),
                ..SeriesMetadata::default()
            }])
        })
        .build();
    let engine = Macrolens::builder()
        .with_connector(broken)
        .with_connector(working)
        .build()
        .unwrap();

    let found = engine.search_series("unemployment", 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "UNRATE");
}

#[tokio::test]
async fn search_aggregates_when_every_provider_fails() {
    let mock = MockConnector::builder("mock")
        .with_search(|_, _| Err(MacrolensError::upstream("mock", "search down")))
        .build();
    let engine = Macrolens::builder().with_connector(mock).build().unwrap();

    let err = engine.search_series("anything", 5).await.unwrap_err();
    assert!(matches!(err, MacrolensError::AllProvidersFailed(_)));
}

#[tokio::test]
async fn overview_drops_failing_indicators() {
    let mock = MockConnector::builder("mock")
        .with_observations(|req| {
            if req.series_id == "DGS10" {
                Err(MacrolensError::not_found("series DGS10"))
            } else {
                Ok(vec![
                    RawObservation {
                        date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
                        value: Some("2.0".to_string()),
                    },
                    RawObservation {
                        date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
                        value: Some("2.1".to_string()),
                    },
                ])
            }
        })
        .build();
    let engine = Macrolens::builder().with_connector(mock).build().unwrap();

    let overview = engine.overview().await.unwrap();
    let ids: Vec<&str> = overview
        .indicators
        .iter()
        .map(|r| r.meta.series_id.as_str())
        .collect();
    assert_eq!(ids.len(), 4);
    assert!(!ids.contains(&"DGS10"));
}

#[tokio::test]
async fn overview_fails_only_when_everything_fails() {
    let mock: Arc<MockConnector> = MockConnector::builder("mock")
        .returns_observations_err(MacrolensError::not_found("nothing here"))
        .build();
    let engine = Macrolens::builder().with_connector(mock).build().unwrap();

    let err = engine.overview().await.unwrap_err();
    assert!(matches!(err, MacrolensError::Unavailable { .. }));
}
