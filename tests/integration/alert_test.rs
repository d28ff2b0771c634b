//! Integration tests for stock threshold alerting.

mod helpers;

use packflow_core::error::ErrorKind;
use packflow_entity::alert::AlertSeverity;
use packflow_entity::inventory::MovementType;
use packflow_entity::site::SiteType;
use packflow_service::RecordMovement;

async fn stock(app: &helpers::TestApp, site: uuid::Uuid, pack: uuid::Uuid, quantity: i32) {
    app.inventory_service
        .record_manual(
            &app.ctx(),
            RecordMovement {
                site_id: site,
                packaging_type_id: pack,
                movement_type: MovementType::Purchase,
                quantity,
                quantity_damaged_delta: 0,
                notes: None,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sweep_classifies_critical_and_warning() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let depot = app.create_site(SiteType::Depot).await;
    let low_type = app.create_packaging_type().await;
    let near_type = app.create_packaging_type().await;
    let healthy_type = app.create_packaging_type().await;

    app.create_threshold(depot, low_type, 50).await;
    app.create_threshold(depot, near_type, 50).await;
    app.create_threshold(depot, healthy_type, 50).await;

    stock(&app, depot, low_type, 10).await;
    stock(&app, depot, near_type, 55).await;
    stock(&app, depot, healthy_type, 200).await;

    let raised = app.alert_service.evaluate_thresholds().await.unwrap();

    let low = raised
        .iter()
        .find(|a| a.packaging_type_id == Some(low_type))
        .expect("critical alert");
    assert_eq!(low.severity, AlertSeverity::Critical);

    let near = raised
        .iter()
        .find(|a| a.packaging_type_id == Some(near_type))
        .expect("warning alert");
    assert_eq!(near.severity, AlertSeverity::Warning);

    assert!(!raised.iter().any(|a| a.packaging_type_id == Some(healthy_type)));
}

#[tokio::test]
async fn test_pair_without_inventory_row_reads_as_zero() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;
    app.create_threshold(depot, crate_type, 25).await;

    app.alert_service.evaluate_thresholds().await.unwrap();

    assert_eq!(app.open_low_stock_alerts(depot, crate_type).await, 1);
}

#[tokio::test]
async fn test_repeated_sweeps_do_not_duplicate_open_alerts() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;
    app.create_threshold(depot, crate_type, 50).await;
    stock(&app, depot, crate_type, 5).await;

    app.alert_service.evaluate_thresholds().await.unwrap();
    app.alert_service.evaluate_thresholds().await.unwrap();

    assert_eq!(app.open_low_stock_alerts(depot, crate_type).await, 1);
}

#[tokio::test]
async fn test_acknowledged_alert_allows_a_new_one() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;
    app.create_threshold(depot, crate_type, 50).await;
    stock(&app, depot, crate_type, 5).await;

    let raised = app.alert_service.evaluate_thresholds().await.unwrap();
    let alert = raised
        .iter()
        .find(|a| a.packaging_type_id == Some(crate_type))
        .expect("alert for pair");

    let acknowledged = app.alert_service.acknowledge(&ctx, alert.id).await.unwrap();
    assert!(acknowledged.is_acknowledged);
    assert_eq!(acknowledged.acknowledged_by, Some(ctx.actor_id));
    assert_eq!(app.open_low_stock_alerts(depot, crate_type).await, 0);

    // Acknowledgement is one-shot.
    let err = app.alert_service.acknowledge(&ctx, alert.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // The pair is still breached, so the next sweep raises again.
    app.alert_service.evaluate_thresholds().await.unwrap();
    assert_eq!(app.open_low_stock_alerts(depot, crate_type).await, 1);

    let open = app.alert_service.unacknowledged(100).await.unwrap();
    assert!(
        open.iter()
            .any(|a| a.site_id == Some(depot) && a.packaging_type_id == Some(crate_type))
    );
}
