use phoenix_scan::config::{self, AppConfig};
use phoenix_scan::controller_builder;
use phoenix_scan::errors::DomainError;
use scan_core::{ArtifactKind, RouteParams, ScanPhase};

fn fast_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        config::TICK_INTERVAL_VAR => Some("20".into()),
        config::LATENCY_VAR => Some("50".into()),
        config::SEED_VAR => Some("1234".into()),
        _ => None,
    }).unwrap()
}

#[tokio::test(start_paused = true)]
async fn configured_scan_serializes_snapshot_for_presentation() {
    let mut controller = controller_builder(&fast_config()).build();
    let route = controller.submit(ArtifactKind::Url, Some("https://example.com")).unwrap();
    assert_eq!(route.title(), "URL Analysis");
    assert_eq!(RouteParams::from_query(&route.to_query()), route);

    let snap = controller.run_to_completion().await.unwrap();
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["phase"], "complete");
    assert_eq!(json["progress"], 100);
    assert_eq!(json["kind"], "url");
    assert_eq!(json["verdicts"].as_array().map(Vec::len), Some(15));
    assert_eq!(json["artifact"], "aHR0cHM6Ly9leGFtcGxlLmNvbQ==");
}

#[tokio::test(start_paused = true)]
async fn rejected_input_maps_to_validation_error() {
    let mut controller = controller_builder(&fast_config()).build();
    let err = controller.submit(ArtifactKind::Hash, Some("   ")).unwrap_err();
    assert!(matches!(DomainError::from(err), DomainError::Validation(_)));
    assert_eq!(controller.phase(), ScanPhase::Idle);
}
