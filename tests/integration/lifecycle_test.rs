//! Integration tests for the load lifecycle.

mod helpers;

use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use packflow_core::error::ErrorKind;
use packflow_entity::load::{LoadStatus, ReceiptLineInput};
use packflow_entity::site::SiteType;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn at(h: u32, m: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
}

#[tokio::test]
async fn test_load_numbers_are_sequential_per_site_and_date() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let first = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 100, date()))
        .await
        .unwrap();
    let second = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 50, date()))
        .await
        .unwrap();

    assert!(first.load.load_number.ends_with("250601"));
    assert_eq!(
        second.load.load_number,
        format!("{}-2", first.load.load_number)
    );
    assert_eq!(first.load.status, LoadStatus::Scheduled);
}

#[tokio::test]
async fn test_create_rejects_same_origin_and_destination() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let crate_type = app.create_packaging_type().await;

    let err = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, farm, crate_type, 10, date()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_create_rejects_empty_lines_and_unknown_packaging() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let mut no_lines = helpers::basic_load(farm, depot, crate_type, 10, date());
    no_lines.lines.clear();
    let err = app.load_service.create_load(&ctx, no_lines).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let unknown = helpers::basic_load(farm, depot, Uuid::new_v4(), 10, date());
    let err = app.load_service.create_load(&ctx, unknown).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_dispatch_moves_stock_out_of_origin_exactly_once() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 100, date()))
        .await
        .unwrap();

    let dispatched = app
        .load_service
        .dispatch(&ctx, created.load.id, at(10, 0))
        .await
        .unwrap();
    assert_eq!(dispatched.load.status, LoadStatus::Departed);
    assert_eq!(app.on_hand(farm, crate_type).await, -100);

    // A second dispatch must fail and must not decrement again.
    let err = app
        .load_service
        .dispatch(&ctx, created.load.id, at(10, 5))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(app.on_hand(farm, crate_type).await, -100);
}

#[tokio::test]
async fn test_full_receipt_conserves_stock_across_sites() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 120, date()))
        .await
        .unwrap();
    app.load_service
        .dispatch(&ctx, created.load.id, at(9, 0))
        .await
        .unwrap();

    // Omitted lines default to fully received.
    let received = app
        .load_service
        .receive(&ctx, created.load.id, at(15, 0), vec![], None)
        .await
        .unwrap();

    assert_eq!(received.load.status, LoadStatus::Completed);
    assert!(!received.load.has_discrepancy);
    assert_eq!(received.lines[0].quantity_received, Some(120));
    assert_eq!(app.on_hand(farm, crate_type).await, -120);
    assert_eq!(app.on_hand(depot, crate_type).await, 120);

    // The load's ledger trail is one dispatch-out plus one receipt-in.
    let trail = app
        .inventory_service
        .load_movements(created.load.id)
        .await
        .unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[0].signed_quantity(), -120);
    assert_eq!(trail[1].signed_quantity(), 120);
}

#[tokio::test]
async fn test_short_receipt_flags_discrepancy_and_raises_alert() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 100, date()))
        .await
        .unwrap();
    app.load_service
        .dispatch(&ctx, created.load.id, at(9, 0))
        .await
        .unwrap();

    let received = app
        .load_service
        .receive(
            &ctx,
            created.load.id,
            at(15, 0),
            vec![ReceiptLineInput {
                packaging_type_id: crate_type,
                quantity_received: 93,
                quantity_damaged: 2,
                quantity_missing: 7,
                notes: Some("two crates cracked".to_string()),
            }],
            Some("short on arrival".to_string()),
        )
        .await
        .unwrap();

    assert!(received.load.has_discrepancy);
    assert_eq!(received.lines[0].quantity_received, Some(93));
    assert_eq!(received.lines[0].quantity_missing, 7);
    // Only the counted-in units reach the destination.
    assert_eq!(app.on_hand(depot, crate_type).await, 93);
    assert_eq!(app.missing_alerts_for_load(created.load.id).await, 1);
}

#[tokio::test]
async fn test_receive_before_dispatch_is_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 10, date()))
        .await
        .unwrap();

    let err = app
        .load_service
        .receive(&ctx, created.load.id, at(15, 0), vec![], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
    assert_eq!(app.on_hand(depot, crate_type).await, 0);
}

#[tokio::test]
async fn test_farm_departure_requires_recorded_arrival() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 10, date()))
        .await
        .unwrap();

    let err = app
        .load_service
        .confirm_farm_departure(&ctx, created.load.id, at(17, 30))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    // Arrival at 14:37 against the 14:00 default records 37 minutes.
    let load = app
        .load_service
        .confirm_farm_arrival(&ctx, created.load.id, at(14, 37))
        .await
        .unwrap();
    assert_eq!(load.farm_arrival_overtime_minutes, Some(37));
    assert!(load.has_overtime);

    let load = app
        .load_service
        .confirm_farm_departure(&ctx, created.load.id, at(17, 30))
        .await
        .unwrap();
    assert_eq!(load.farm_departure_overtime_minutes, Some(30));

    // Confirmations are one-shot.
    let err = app
        .load_service
        .confirm_farm_arrival(&ctx, created.load.id, at(14, 40))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_terminal_loads_reject_every_mutation() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 10, date()))
        .await
        .unwrap();
    let cancelled = app.load_service.cancel(&ctx, created.load.id).await.unwrap();
    assert_eq!(cancelled.status, LoadStatus::Cancelled);

    let err = app
        .load_service
        .dispatch(&ctx, created.load.id, at(10, 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let err = app.load_service.cancel(&ctx, created.load.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let err = app
        .load_service
        .update_load(&ctx, created.load.id, Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    // Cancellation moved no stock.
    assert_eq!(app.on_hand(farm, crate_type).await, 0);
}

#[tokio::test]
async fn test_delete_only_while_scheduled() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let scheduled = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 10, date()))
        .await
        .unwrap();
    app.load_service.delete(&ctx, scheduled.load.id).await.unwrap();
    let err = app.load_service.get_load(scheduled.load.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let departed = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 10, date()))
        .await
        .unwrap();
    app.load_service
        .dispatch(&ctx, departed.load.id, at(10, 0))
        .await
        .unwrap();
    let err = app.load_service.delete(&ctx, departed.load.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_duplicate_copies_routing_and_lines_only() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let created = app
        .load_service
        .create_load(&ctx, helpers::basic_load(farm, depot, crate_type, 80, date()))
        .await
        .unwrap();
    app.load_service
        .dispatch(&ctx, created.load.id, at(9, 0))
        .await
        .unwrap();
    app.load_service
        .receive(&ctx, created.load.id, at(15, 0), vec![], None)
        .await
        .unwrap();

    let new_date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let copy = app
        .load_service
        .duplicate(&ctx, created.load.id, new_date)
        .await
        .unwrap();

    assert_eq!(copy.load.status, LoadStatus::Scheduled);
    assert_eq!(copy.load.dispatch_date, new_date);
    assert_eq!(copy.load.origin_site_id, farm);
    assert_eq!(copy.load.destination_site_id, depot);
    assert_eq!(copy.lines.len(), 1);
    assert_eq!(copy.lines[0].quantity_dispatched, 80);
    assert_eq!(copy.lines[0].quantity_received, None);
    assert!(copy.load.load_number.ends_with("250602"));
    // Duplication itself moves no stock.
    assert_eq!(app.on_hand(depot, crate_type).await, 80);
}

#[tokio::test]
async fn test_on_time_classification_persisted_at_receipt() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let farm = app.create_site(SiteType::Farm).await;
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let mut data = helpers::basic_load(farm, depot, crate_type, 10, date());
    data.expected_arrival_window_start = Some(at(14, 0));
    data.expected_arrival_window_end = Some(at(16, 0));

    let created = app.load_service.create_load(&ctx, data).await.unwrap();
    app.load_service
        .dispatch(&ctx, created.load.id, at(9, 0))
        .await
        .unwrap();
    let received = app
        .load_service
        .receive(&ctx, created.load.id, at(16, 45), vec![], None)
        .await
        .unwrap();

    assert_eq!(
        received.load.on_time_status,
        Some(packflow_entity::load::OnTimeStatus::Delayed)
    );
    assert_eq!(received.load.actual_arrival_time, Some(at(16, 45)));
}
