//! Integration tests for manual inventory ledger entries.

mod helpers;

use packflow_core::error::ErrorKind;
use packflow_entity::inventory::{MovementDirection, MovementType};
use packflow_entity::site::SiteType;
use packflow_service::RecordMovement;
use uuid::Uuid;

#[tokio::test]
async fn test_manual_movements_adjust_on_hand_by_sign() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let purchase = app
        .inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: depot,
                packaging_type_id: crate_type,
                movement_type: MovementType::Purchase,
                quantity: 200,
                quantity_damaged_delta: 0,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(purchase.direction, MovementDirection::In);
    assert_eq!(purchase.quantity, 200);
    assert_eq!(app.on_hand(depot, crate_type).await, 200);

    let disposal = app
        .inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: depot,
                packaging_type_id: crate_type,
                movement_type: MovementType::Disposal,
                quantity: -50,
                quantity_damaged_delta: 0,
                notes: Some("end of life".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(disposal.direction, MovementDirection::Out);
    assert_eq!(disposal.quantity, 50);
    assert_eq!(disposal.signed_quantity(), -50);
    assert_eq!(app.on_hand(depot, crate_type).await, 150);
}

#[tokio::test]
async fn test_negative_on_hand_is_tolerated() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    app.inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: depot,
                packaging_type_id: crate_type,
                movement_type: MovementType::Adjustment,
                quantity: -30,
                quantity_damaged_delta: 0,
                notes: Some("recount".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(app.on_hand(depot, crate_type).await, -30);
}

#[tokio::test]
async fn test_load_driven_types_cannot_be_entered_manually() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    for movement_type in [MovementType::Dispatch, MovementType::Receipt] {
        let err = app
            .inventory_service
            .record_manual(
                &ctx,
                RecordMovement {
                    site_id: depot,
                    packaging_type_id: crate_type,
                    movement_type,
                    quantity: 10,
                    quantity_damaged_delta: 0,
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

#[tokio::test]
async fn test_zero_movement_and_unknown_site_rejected() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    let err = app
        .inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: depot,
                packaging_type_id: crate_type,
                movement_type: MovementType::Adjustment,
                quantity: 0,
                quantity_damaged_delta: 0,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app
        .inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: Uuid::new_v4(),
                packaging_type_id: crate_type,
                movement_type: MovementType::Purchase,
                quantity: 10,
                quantity_damaged_delta: 0,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_damage_and_repair_track_damaged_count() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    // Reclassify 5 units as damaged without changing the total.
    app.inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: depot,
                packaging_type_id: crate_type,
                movement_type: MovementType::Damage,
                quantity: 0,
                quantity_damaged_delta: 5,
                notes: None,
            },
        )
        .await
        .unwrap();

    let row = app
        .inventory_service
        .on_hand(depot, crate_type)
        .await
        .unwrap()
        .expect("inventory row");
    assert_eq!(row.quantity, 0);
    assert_eq!(row.quantity_damaged, 5);

    app.inventory_service
        .record_manual(
            &ctx,
            RecordMovement {
                site_id: depot,
                packaging_type_id: crate_type,
                movement_type: MovementType::Repair,
                quantity: 0,
                quantity_damaged_delta: -3,
                notes: None,
            },
        )
        .await
        .unwrap();

    let row = app
        .inventory_service
        .on_hand(depot, crate_type)
        .await
        .unwrap()
        .expect("inventory row");
    assert_eq!(row.quantity_damaged, 2);
}

#[tokio::test]
async fn test_movement_history_is_newest_first() {
    let Some(app) = helpers::TestApp::try_new().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let ctx = app.ctx();
    let depot = app.create_site(SiteType::Depot).await;
    let crate_type = app.create_packaging_type().await;

    for quantity in [10, -4, 7] {
        app.inventory_service
            .record_manual(
                &ctx,
                RecordMovement {
                    site_id: depot,
                    packaging_type_id: crate_type,
                    movement_type: MovementType::Adjustment,
                    quantity,
                    quantity_damaged_delta: 0,
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    let history = app.inventory_service.movements(depot, 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].signed_quantity(), 7);
    assert_eq!(history[2].signed_quantity(), 10);

    let total: i32 = history.iter().map(|m| m.signed_quantity()).sum();
    assert_eq!(total, app.on_hand(depot, crate_type).await);
}
