//! HTTP API tests
//!
//! Drives the full router with in-memory collaborators:
//! - Date parsing and input rejection
//! - Harvest scheduling and weekly planning
//! - Plan add / list / remove / commit round trips

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use ghp_backend::{
    config::PlanningConfig, create_app, sources::InMemoryCandidateSource,
    stores::InMemoryPlanStore, AppState, Config,
};
use serde_json::{json, Value};
use shared::{CropType, GreenhouseLocation, HarvestCandidate};
use tower::ServiceExt;

// ============================================================================
// Fixtures
// ============================================================================

fn ymd(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

fn batch(id: i64, crop: &str, yield_g: f64, confidence: f64) -> HarvestCandidate {
    HarvestCandidate {
        id,
        crop: CropType::new(crop),
        sub_crop: Some("Butter Crunch".to_string()),
        num_plants: 18,
        predicted_yield_g: yield_g,
        confidence_score: confidence,
        location: GreenhouseLocation {
            house_number: 1,
            x_position: 2,
            y_position: id as i32,
        },
    }
}

fn seeded_source() -> InMemoryCandidateSource {
    InMemoryCandidateSource::new()
        .with_candidate(ymd(21), batch(1, "LETTUCE", 1000.0, 0.9))
        .with_candidate(ymd(21), batch(2, "LETTUCE", 2000.0, 0.85))
        .with_candidate(ymd(21), batch(3, "LETTUCE", 1500.0, 0.95))
        .with_candidate(ymd(21), batch(4, "KALE", 5000.0, 0.9))
        .with_candidate(ymd(21), batch(5, "KALE", 3000.0, 0.95))
        .with_candidate(ymd(21), batch(6, "SPINACH", 800.0, 0.6))
        .with_candidate(ymd(22), batch(7, "ARUGULA", 4200.0, 0.88))
}

fn app() -> Router {
    let state = AppState::new(
        Config::default(),
        Arc::new(seeded_source()),
        Arc::new(InMemoryPlanStore::new()),
    );
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_raw(app, method, uri, body.map(|b| b.to_string())).await
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn plan_item(crop_cycle_id: i64, crop_type: &str, planned_yield_g: f64) -> Value {
    json!({
        "crop_cycle_id": crop_cycle_id,
        "crop_type": crop_type,
        "sub_crop": "Butter Crunch",
        "planned_yield_g": planned_yield_g,
        "confidence_score": 0.9,
        "house_number": 1,
        "location_x": 2,
        "location_y": 3,
    })
}

// ============================================================================
// Health and Input Validation
// ============================================================================

#[tokio::test]
async fn test_health_reports_connected() {
    let app = app();
    for uri in ["/health", "/api/health"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let app = app();
    for uri in [
        "/api/crops/2025-13-40",
        "/api/availability/yesterday",
        "/api/plans/21-07-2025",
        "/api/schedule/weekly?week_start=2025/07/21",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "INVALID_DATE");
    }
}

#[tokio::test]
async fn test_schedule_rejects_out_of_range_confidence() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule/harvest",
        Some(json!({
            "target_date": "2025-07-21",
            "crop_type": "LETTUCE",
            "min_confidence": 1.5,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "min_confidence");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = app();
    let bodies = [
        ("/api/schedule/harvest", r#"{"target_date": "2025-13-01", "crop_type": "KALE"}"#),
        ("/api/schedule/harvest", r#"{"target_date": "2025-07-21", "crop_type": "#),
        ("/api/plans/2025-07-21/add", r#"{"crop_cycle_id": "five"}"#),
        ("/api/plans/2025-07-21/commit", "not json"),
    ];
    for (uri, raw) in bodies {
        let (status, body) = send_raw(&app, Method::POST, uri, Some(raw.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, raw);
        assert_eq!(body["error"]["code"], "INVALID_BODY", "{} {}", uri, raw);
        assert!(body["error"]["message"].is_string());
    }
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test]
async fn test_schedule_harvest_multi_batch() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule/harvest",
        Some(json!({
            "target_date": "2025-07-21",
            "crop_type": "lettuce",
            "target_yield_g": 4000.0,
            "min_confidence": 0.8,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crop_type"], "LETTUCE");
    assert_eq!(body["strategy"], "multi_batch");
    assert_eq!(body["total_predicted_yield_g"], 4500.0);
    let ids: Vec<i64> = body["selected_crops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_schedule_harvest_defaults_pick_single_batch() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule/harvest",
        Some(json!({ "target_date": "2025-07-21", "crop_type": "KALE" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"], "single_batch");
    assert_eq!(body["selected_crops"][0]["id"], 4);
    assert_eq!(body["target_yield_g"], 4000.0);
}

#[tokio::test]
async fn test_weekly_plan_from_saturday() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/schedule/weekly?week_start=2025-07-19&crop_types=KALE,ARUGULA",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["week_start"], "2025-07-19");
    assert_eq!(body["week_end"], "2025-07-23");
    let schedules = body["daily_schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 6);
    assert_eq!(schedules[0]["target_date"], "2025-07-21");
    assert_eq!(schedules[0]["crop_type"], "KALE");
    assert_eq!(schedules[1]["crop_type"], "ARUGULA");
    assert_eq!(schedules[3]["target_date"], "2025-07-22");
    assert_eq!(schedules[3]["selected_crops"][0]["id"], 7);
}

#[tokio::test]
async fn test_multi_week_plan_requires_starts() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/api/schedule/weeks?starts=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/schedule/weeks?starts=2025-07-21,2025-07-28&crop_types=KALE",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["week_start"], "2025-07-28");
}

#[tokio::test]
async fn test_multi_week_plan_caps_week_starts() {
    let app = app();
    let starts = |weeks: u64| {
        (0..weeks)
            .map(|w| {
                ymd(21)
                    .checked_add_days(chrono::Days::new(7 * w))
                    .unwrap()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join(",")
    };

    let uri = format!("/api/schedule/weeks?starts={}&crop_types=KALE", starts(13));
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "starts");

    let uri = format!("/api/schedule/weeks?starts={}&crop_types=KALE", starts(12));
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_omitted_request_values_use_configured_defaults() {
    let config = Config {
        planning: PlanningConfig {
            default_target_yield_g: 2500.0,
            default_min_confidence: 0.95,
            ..PlanningConfig::default()
        },
        ..Config::default()
    };
    let source =
        InMemoryCandidateSource::new().with_candidate(ymd(21), batch(1, "KALE", 5000.0, 0.85));
    let app = create_app(AppState::new(
        config,
        Arc::new(source),
        Arc::new(InMemoryPlanStore::new()),
    ));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule/harvest",
        Some(json!({ "target_date": "2025-07-21", "crop_type": "KALE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["target_yield_g"], 2500.0);
    assert!(body["selected_crops"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/schedule/weekly?week_start=2025-07-21&crop_types=KALE",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["daily_schedules"][0]["target_date"], "2025-07-21");
    assert!(body["daily_schedules"][0]["selected_crops"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/plans/2025-07-21/commit",
        Some(json!({ "crop_type": "KALE" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["added"].as_array().unwrap().is_empty());

    // An explicit floor still overrides the configured one
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/schedule/harvest",
        Some(json!({
            "target_date": "2025-07-21",
            "crop_type": "KALE",
            "min_confidence": 0.8,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected_crops"][0]["id"], 1);
}

// ============================================================================
// Availability
// ============================================================================

#[tokio::test]
async fn test_availability_omits_empty_crop_types() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/availability/2025-07-21", None).await;

    assert_eq!(status, StatusCode::OK);
    let crops: Vec<&str> = body["availability"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["crop"].as_str().unwrap())
        .collect();
    // ARUGULA has nothing on this date
    assert_eq!(crops, vec!["LETTUCE", "SPINACH", "KALE"]);
}

#[tokio::test]
async fn test_available_crops_hide_planned_batches() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/plans/2025-07-21/add",
        Some(plan_item(5, "KALE", 3000.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/api/crops/2025-07-21", None).await;
    assert_eq!(status, StatusCode::OK);
    let kale: Vec<i64> = body["crops"]["KALE"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(kale, vec![4]);
    // SPINACH is below the confidence floor
    assert!(body["crops"].get("SPINACH").is_none());
    assert_eq!(body["summary"]["total_available_crops"], 4);
}

#[tokio::test]
async fn test_candidates_filtered_by_crop_type() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/candidates/2025-07-21?crop_type=spinach", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["candidates"][0]["id"], 6);
}

#[tokio::test]
async fn test_candidates_reject_several_crop_types() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/candidates/2025-07-21?crop_type=KALE,LETTUCE",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "crop_type");
}

// ============================================================================
// Plans
// ============================================================================

#[tokio::test]
async fn test_plan_add_list_remove() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/plans/2025-07-21/add",
        Some(plan_item(1, "lettuce", 1250.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["plan_id"].as_i64().is_some());

    let (status, body) = send(&app, Method::GET, "/api/plans/2025-07-21", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["crop_type"], "LETTUCE");
    assert_eq!(body["summary"]["total_yield_kg"], 1.25);
    assert_eq!(body["summary"]["target_progress"]["LETTUCE"]["progress_percent"], 31.3);

    let (status, _) = send(&app, Method::DELETE, "/api/plans/2025-07-21/remove/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/api/plans/2025-07-21/remove/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_plan_entry_conflicts() {
    let app = app();
    let uri = "/api/plans/2025-07-21/add";

    let (status, _) = send(&app, Method::POST, uri, Some(plan_item(2, "LETTUCE", 2000.0))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, uri, Some(plan_item(2, "LETTUCE", 2000.0))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_ENTRY");

    let (_, body) = send(&app, Method::GET, "/api/plans/2025-07-21", None).await;
    assert_eq!(body["summary"]["total_items"], 1);
}

#[tokio::test]
async fn test_commit_selection_adds_selected_batches() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/plans/2025-07-21/add",
        Some(plan_item(1, "LETTUCE", 1000.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/plans/2025-07-21/commit",
        Some(json!({ "crop_type": "LETTUCE" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["added"].as_array().unwrap().len(), 2);
    assert_eq!(body["skipped"], json!([1]));

    let (_, body) = send(&app, Method::GET, "/api/plans/2025-07-21", None).await;
    assert_eq!(body["summary"]["total_items"], 3);
}
