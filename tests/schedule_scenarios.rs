use azba_feed::{ScheduleEngine, SchedulePipeline, ScheduleRequest, StaticPageSource};
use chrono::{DateTime, TimeZone, Utc};

const FIXTURE: &str = include_str!("fixtures/schedules.html");

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

async fn run(html: &str, now: DateTime<Utc>, zone: Option<&str>) -> serde_json::Value {
    let engine = ScheduleEngine::new(SchedulePipeline::new(StaticPageSource::new(html)));
    let document = engine
        .run(&ScheduleRequest::new(now, zone))
        .await
        .unwrap();
    serde_json::to_value(&document).unwrap()
}

#[tokio::test]
async fn test_single_future_slot() {
    let html = "<p>List of activated zones</p><p>17/11/2025</p><p>R45S3</p><p>0830-1100</p>";
    let json = run(html, utc(2025, 11, 17, 7, 0), None).await;

    let zone = &json["zones"]["R45S3"];
    assert_eq!(
        zone["activations"],
        serde_json::json!([{
            "date": "2025-11-17",
            "start_utc": "2025-11-17T08:30:00Z",
            "end_utc": "2025-11-17T11:00:00Z"
        }])
    );
    assert_eq!(zone["is_active_now"], false);
    assert_eq!(zone["will_be_active"], true);
    assert_eq!(zone["will_be_active_soon"], true);
}

#[tokio::test]
async fn test_three_minutes_before_start() {
    let html = "<p>List of activated zones</p><p>17/11/2025</p><p>R45S3</p><p>0830-1100</p>";
    let json = run(html, utc(2025, 11, 17, 8, 27), None).await;

    let zone = &json["zones"]["R45S3"];
    assert_eq!(zone["is_active_now"], true);
    assert_eq!(zone["will_be_active"], false);
    assert_eq!(zone["will_be_active_soon"], false);
}

#[tokio::test]
async fn test_fixture_page_at_seven() {
    let json = run(FIXTURE, utc(2025, 11, 17, 7, 0), None).await;

    let metadata = &json["metadata"];
    assert_eq!(metadata["interval_start_utc"], "2025-11-17T06:00:00Z");
    assert_eq!(metadata["interval_end_utc"], "2025-11-19T06:00:00Z");
    assert_eq!(metadata["zones_total"], 4);
    assert_eq!(metadata["zones_active_now"], 0);
    assert_eq!(metadata["zones_will_be_active"], 3);
    assert_eq!(metadata["zones_will_be_active_soon"], 2);

    let zones = json["zones"].as_object().unwrap();
    assert!(zones.get("R999").is_none());
    assert_eq!(zones["R45S3"]["activations"].as_array().unwrap().len(), 2);
    assert_eq!(zones["R142A"]["activations"].as_array().unwrap().len(), 2);
    assert!(zones["R45N5.1"]["activations"].as_array().unwrap().is_empty());

    let r149 = &zones["R149E"];
    assert_eq!(r149["activations"][0]["end_utc"], "2025-11-18T00:00:00Z");
    assert_eq!(r149["will_be_active"], true);
    assert_eq!(r149["will_be_active_soon"], false);
}

#[tokio::test]
async fn test_fixture_zone_order_follows_page() {
    let engine = ScheduleEngine::new(SchedulePipeline::new(StaticPageSource::new(FIXTURE)));
    let document = engine
        .run(&ScheduleRequest::new(utc(2025, 11, 17, 7, 0), None))
        .await
        .unwrap();

    let names: Vec<&str> = document.zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["R45S3", "R142A", "R149E", "R45N5.1"]);
}

#[tokio::test]
async fn test_filter_matches_single_zone() {
    let json = run(FIXTURE, utc(2025, 11, 17, 8, 27), Some(" r45s3 ")).await;

    let zones = json["zones"].as_object().unwrap();
    assert_eq!(zones.len(), 1);
    assert!(zones.contains_key("R45S3"));
    assert_eq!(json["metadata"]["zones_total"], 1);
    assert_eq!(json["metadata"]["zones_active_now"], 1);
}

#[tokio::test]
async fn test_filter_without_match_is_empty_not_error() {
    let json = run(FIXTURE, utc(2025, 11, 17, 7, 0), Some("R1")).await;

    assert_eq!(json["zones"], serde_json::json!({}));
    assert_eq!(json["metadata"]["zones_total"], 0);
    assert_eq!(json["metadata"]["zones_will_be_active"], 0);
    assert_eq!(json["metadata"]["interval_start_utc"], "2025-11-17T06:00:00Z");
}

#[tokio::test]
async fn test_counters_match_zone_flags_over_the_day() {
    for hour in 0..24 {
        for filter in [None, Some("R142A"), Some("R999")] {
            let json = run(FIXTURE, utc(2025, 11, 17, hour, 15), filter).await;
            let zones = json["zones"].as_object().unwrap();
            let count = |flag: &str| zones.values().filter(|z| z[flag] == true).count();

            let metadata = &json["metadata"];
            assert_eq!(metadata["zones_total"], zones.len());
            assert_eq!(metadata["zones_active_now"], count("is_active_now"));
            assert_eq!(metadata["zones_will_be_active"], count("will_be_active"));
            assert_eq!(
                metadata["zones_will_be_active_soon"],
                count("will_be_active_soon")
            );
        }
    }
}

#[tokio::test]
async fn test_activations_always_end_after_start() {
    let json = run(FIXTURE, utc(2025, 11, 17, 7, 0), None).await;
    for zone in json["zones"].as_object().unwrap().values() {
        for activation in zone["activations"].as_array().unwrap() {
            let start: DateTime<Utc> = activation["start_utc"].as_str().unwrap().parse().unwrap();
            let end: DateTime<Utc> = activation["end_utc"].as_str().unwrap().parse().unwrap();
            assert!(end > start);
        }
    }
}

#[tokio::test]
async fn test_page_without_marker_fails() {
    let engine = ScheduleEngine::new(SchedulePipeline::new(StaticPageSource::new(
        "<html><body>Service temporairement indisponible</body></html>",
    )));
    let err = engine
        .run(&ScheduleRequest::new(utc(2025, 11, 17, 7, 0), None))
        .await
        .unwrap_err();
    assert!(err.is_fatal_for_request());
}
