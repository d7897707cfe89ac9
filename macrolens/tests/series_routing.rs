use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use macrolens::{
    Frequency, Macrolens, MacrolensError, SeriesMetadata, SeriesRequest, SubstitutionReason,
};
use macrolens_mock::{MockConnector, call_log};
use macrolens_types::RawObservation;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rows() -> Vec<RawObservation> {
    vec![
        RawObservation {
            date: day(2026, 1, 31),
            value: Some("4.1".to_string()),
        },
        RawObservation {
            date: day(2026, 2, 28),
            value: Some("4.2".to_string()),
        },
        RawObservation {
            date: day(2026, 3, 31),
            value: Some(".".to_string()),
        },
    ]
}

fn engine(connectors: Vec<Arc<macrolens_mock::MockConnector>>) -> Macrolens {
    let mut b = Macrolens::builder();
    for c in connectors {
        b = b.with_connector(c);
    }
    b.build().unwrap()
}

#[tokio::test]
async fn providers_fall_back_in_registration_order() {
    let log = call_log();
    let first = MockConnector::builder("first")
        .with_call_log(log.clone())
        .returns_observations_err(MacrolensError::not_found("series UNRATE"))
        .build();
    let second = MockConnector::builder("second")
        .with_call_log(log.clone())
        .returns_observations_ok(rows())
        .build();

    let report = engine(vec![first, second])
        .series(&SeriesRequest::new("UNRATE"))
        .await
        .unwrap();

    assert_eq!(report.meta.provider, "second");
    let calls = log.lock().unwrap().clone();
    assert_eq!(calls, vec!["first:observations", "second:observations"]);
}

#[tokio::test]
async fn normalization_counts_the_missing_marker() {
    let mock = MockConnector::builder("mock")
        .returns_observations_ok(rows())
        .build();

    let report = engine(vec![mock])
        .series(&SeriesRequest::new("UNRATE"))
        .await
        .unwrap();

    assert_eq!(report.batch.stats.total, 3);
    assert_eq!(report.batch.stats.valid, 2);
    assert_eq!(report.batch.stats.missing, 1);
    assert_eq!(report.batch.observations.len(), 2);
}

#[tokio::test]
async fn legacy_alias_translates_to_its_successor() {
    let mock = MockConnector::builder("mock")
        .returns_observations_ok(rows())
        .build();

    let report = engine(vec![mock.clone()])
        .series(&SeriesRequest::new("cpi"))
        .await
        .unwrap();

    assert_eq!(report.meta.requested_id, "CPI");
    assert_eq!(report.meta.series_id, "CPIAUCSL");
}

#[tokio::test]
async fn fallback_chain_reaches_the_discontinued_identifier() {
    let mock = MockConnector::builder("mock")
        .with_observations(|req| {
            if req.series_id == "DFEDTAR" {
                Ok(vec![RawObservation {
                    date: NaiveDate::from_ymd_opt(2008, 12, 15).unwrap(),
                    value: Some("1.0".to_string()),
                }])
            } else {
                Err(MacrolensError::not_found(format!(
                    "series {}",
                    req.series_id
                )))
            }
        })
        .build();

    let report = engine(vec![mock])
        .series(&SeriesRequest::new("DFEDTAR"))
        .await
        .unwrap();

    assert_eq!(report.meta.series_id, "DFEDTAR");
    assert_eq!(report.meta.requested_id, "DFEDTAR");
}

#[tokio::test]
async fn removed_series_is_refused_before_any_provider_call() {
    let mock = MockConnector::builder("mock")
        .returns_observations_ok(rows())
        .build();

    let err = engine(vec![mock.clone()])
        .series(&SeriesRequest::new("WILL5000IND"))
        .await
        .unwrap_err();

    assert!(matches!(err, MacrolensError::NotAvailable { .. }));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn limited_series_carries_its_caveat() {
    let mock = MockConnector::builder("mock")
        .returns_observations_ok(rows())
        .build();

    let report = engine(vec![mock])
        .series(&SeriesRequest::new("DGS30"))
        .await
        .unwrap();

    let caveat = report.meta.caveat.unwrap();
    assert!(caveat.contains("2002"));
}

#[tokio::test]
async fn native_coarser_than_requested_downgrades_the_frequency() {
    let meta = SeriesMetadata {
        id: "CPIAUCSL".to_string(),
        title: "CPI".to_string(),
        native_frequency: Some(Frequency::Monthly),
        ..SeriesMetadata::default()
    };
    let sent = Arc::new(std::sync::Mutex::new(None));
    let sent_in = sent.clone();
    let mock = MockConnector::builder("mock")
        .returns_metadata_ok(meta)
        .with_observations(move |req| {
            *sent_in.lock().unwrap() = Some(req.frequency);
            Ok(rows())
        })
        .build();

    let report = engine(vec![mock])
        .series(&SeriesRequest {
            series_id: "CPIAUCSL".to_string(),
            frequency: Some(Frequency::Daily),
            ..SeriesRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(*sent.lock().unwrap(), Some(Some(Frequency::Monthly)));
    assert!(report.meta.frequency_substituted);
    assert_eq!(report.meta.frequency, Some(Frequency::Monthly));
}

#[tokio::test]
async fn provider_frequency_rejection_retries_once_without_the_parameter() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_in = attempts.clone();
    let mock = MockConnector::builder("mock")
        .with_observations(move |req| {
            attempts_in.fetch_add(1, Ordering::SeqCst);
            if req.frequency.is_some() {
                Err(MacrolensError::upstream(
                    "mock",
                    "the value for variable frequency is not acceptable",
                ))
            } else {
                Ok(rows())
            }
        })
        .build();

    let report = engine(vec![mock])
        .series(&SeriesRequest {
            series_id: "UNRATE".to_string(),
            frequency: Some(Frequency::Quarterly),
            ..SeriesRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert!(report.meta.frequency_substituted);
    assert_eq!(report.batch.stats.valid, 2);
}

#[tokio::test]
async fn frequency_rejection_is_marked_as_provider_rejected() {
    let mock = MockConnector::builder("mock")
        .with_observations(|req| {
            if req.frequency.is_some() {
                Err(MacrolensError::upstream("mock", "frequency not supported"))
            } else {
                Ok(rows())
            }
        })
        .build();

    // The substitution reason travels through the cached payload, so a second
    // request answered from cache reports the same decision.
    let engine = engine(vec![mock]);
    let req = SeriesRequest {
        series_id: "UNRATE".to_string(),
        frequency: Some(Frequency::Annual),
        ..SeriesRequest::default()
    };
    let first = engine.series(&req).await.unwrap();
    let second = engine.series(&req).await.unwrap();
    assert!(first.meta.frequency_substituted);
    assert!(second.meta.frequency_substituted);
    assert_eq!(first.meta.frequency, None);

    // sanity check on the decision type itself
    let decision = macrolens::FrequencyDecision::honored(Some(Frequency::Annual))
        .rejected_by_provider();
    assert_eq!(decision.reason, Some(SubstitutionReason::ProviderRejected));
}

#[tokio::test]
async fn no_observation_capable_connector_is_not_supported() {
    let mock = MockConnector::builder("mock")
        .with_series_tags(|_| Ok(vec![]))
        .build();

    let err = engine(vec![mock])
        .series(&SeriesRequest::new("UNRATE"))
        .await
        .unwrap_err();

    assert!(matches!(err, MacrolensError::NotSupported { .. }));
}

#[tokio::test]
async fn building_without_connectors_is_rejected() {
    let err = Macrolens::builder().build().unwrap_err();
    assert!(matches!(err, MacrolensError::InvalidArg(_)));
}
