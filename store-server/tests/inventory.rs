//! Inventory ledger: receipts, atomic increments, conditional decrements

mod common;

use common::*;
use store_server::InventoryLedger;
use store_server::db::models::{
    InventoryReceipt, InventoryReceiptCreate, InventoryReceiptDetail, OrderStatus, OrderUpdate,
    ReceiptDetailInput,
};
use store_server::utils::ErrorCode;

fn receipt_line(product: &surrealdb::RecordId, amount: i64, import_price: f64) -> ReceiptDetailInput {
    ReceiptDetailInput {
        product: product.to_string(),
        amount,
        import_price,
    }
}

#[tokio::test]
async fn receipt_increments_stock_and_totals() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 2, true, &cat).await;
    let oil = seed_product(&ctx.db, "oil", "P.0002", "Oil", 45000.0, 0, true, &cat).await;
    let admin_id = seed_user(&ctx.db, "admin", 0).await;

    let ledger = InventoryLedger::new(ctx.db.clone());
    let receipt = ledger
        .receive_stock(
            admin_id,
            InventoryReceiptCreate {
                note: Some("weekly restock".into()),
                details: vec![receipt_line(&rice, 10, 12000.0), receipt_line(&oil, 5, 30000.0)],
            },
        )
        .await
        .unwrap();

    assert_eq!(receipt.receipt.code, "I.0001");
    assert_eq!(receipt.receipt.total_money, 10.0 * 12000.0 + 5.0 * 30000.0);
    assert_eq!(receipt.details.len(), 2);
    assert_eq!(product_amount(&ctx.db, &rice).await, 12);
    assert_eq!(product_amount(&ctx.db, &oil).await, 5);

    // Detail rows persist individually and point back at the receipt
    let details: Vec<InventoryReceiptDetail> = ctx
        .db
        .query("SELECT * FROM inventory_receipt_detail WHERE receipt = $r")
        .bind(("r", receipt.receipt.id.clone().unwrap().to_string()))
        .await
        .unwrap()
        .take(0)
        .unwrap();
    assert_eq!(details.len(), 2);
}

#[tokio::test]
async fn unknown_product_rejects_the_whole_receipt() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 2, true, &cat).await;
    let admin_id = seed_user(&ctx.db, "admin", 0).await;

    let ledger = InventoryLedger::new(ctx.db.clone());
    let err = ledger
        .receive_stock(
            admin_id,
            InventoryReceiptCreate {
                note: None,
                details: vec![
                    receipt_line(&rice, 10, 12000.0),
                    ReceiptDetailInput {
                        product: "product:phantom".into(),
                        amount: 3,
                        import_price: 500.0,
                    },
                ],
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationFailed);
    // Atomic rejection: the known line was not applied, nothing persisted
    assert_eq!(product_amount(&ctx.db, &rice).await, 2);
    let receipts: Vec<InventoryReceipt> = ctx
        .db
        .query("SELECT * FROM inventory_receipt")
        .await
        .unwrap()
        .take(0)
        .unwrap();
    assert!(receipts.is_empty());
}

#[tokio::test]
async fn empty_or_nonpositive_lines_are_rejected() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 2, true, &cat).await;
    let admin_id = seed_user(&ctx.db, "admin", 0).await;

    let ledger = InventoryLedger::new(ctx.db.clone());

    let err = ledger
        .receive_stock(admin_id.clone(), InventoryReceiptCreate { note: None, details: vec![] })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    let err = ledger
        .receive_stock(
            admin_id,
            InventoryReceiptCreate {
                note: None,
                details: vec![receipt_line(&rice, 0, 1000.0)],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(product_amount(&ctx.db, &rice).await, 2);
}

#[tokio::test]
async fn decrement_never_goes_below_zero() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 3, true, &cat).await;

    let ledger = InventoryLedger::new(ctx.db.clone());

    let err = ledger.decrement_stock(&rice, 5).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductOutOfStock);
    assert_eq!(product_amount(&ctx.db, &rice).await, 3);

    let updated = ledger.decrement_stock(&rice, 2).await.unwrap();
    assert_eq!(updated.amount, 1);

    let err = ledger.decrement_stock(&rice, 2).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductOutOfStock);
    assert_eq!(product_amount(&ctx.db, &rice).await, 1);
}

#[tokio::test]
async fn restock_then_order_round_trip() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 0, true, &cat).await;
    let admin_id = seed_user(&ctx.db, "admin", 0).await;
    seed_user(&ctx.db, "alice", 0).await;

    InventoryLedger::new(ctx.db.clone())
        .receive_stock(
            admin_id,
            InventoryReceiptCreate {
                note: None,
                details: vec![receipt_line(&rice, 10, 1000.0)],
            },
        )
        .await
        .unwrap();

    // The full batch fits...
    let order = place_order(&ctx.db, &shopper("alice"), vec![cart_line(&rice, 10)]).await;
    order_service(&ctx.db)
        .transition(
            &order.id.unwrap(),
            OrderUpdate { status: OrderStatus::Confirmed, note: None },
        )
        .await
        .unwrap();
    assert_eq!(product_amount(&ctx.db, &rice).await, 0);

    // ...and afterwards even a single unit is over stock
    let err = order_service(&ctx.db)
        .create(
            &shopper("alice"),
            store_server::db::models::OrderCreate {
                products: vec![cart_line(&rice, 1)],
                customer: customer_info(),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn concurrent_confirmations_never_oversell() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 50, true, &cat).await;
    seed_user(&ctx.db, "alice", 0).await;

    // Twenty pending orders of five units each against fifty in stock:
    // at most ten confirmations can ever go through.
    let mut order_ids = Vec::new();
    for _ in 0..20 {
        let order = place_order(&ctx.db, &shopper("alice"), vec![cart_line(&rice, 5)]).await;
        order_ids.push(order.id.unwrap());
    }

    let mut handles = Vec::new();
    for order_id in order_ids {
        let db = ctx.db.clone();
        handles.push(tokio::spawn(async move {
            use rand::Rng;
            let jitter = rand::thread_rng().gen_range(0..5);
            tokio::time::sleep(std::time::Duration::from_millis(jitter)).await;
            order_service(&db)
                .transition(
                    &order_id,
                    OrderUpdate { status: OrderStatus::Confirmed, note: None },
                )
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }

    let remaining = product_amount(&ctx.db, &rice).await;
    assert!(remaining >= 0, "stock must never go negative");
    assert!(successes <= 10, "only ten orders of five fit into fifty units");
    assert_eq!(
        remaining,
        50 - 5 * successes as i64,
        "every confirmed order decremented exactly once"
    );
}

#[tokio::test]
async fn receipt_codes_are_sequential_and_previewable() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "staples", "Staples").await;
    let rice = seed_product(&ctx.db, "rice", "P.0001", "Rice", 18000.0, 0, true, &cat).await;
    let admin_id = seed_user(&ctx.db, "admin", 0).await;

    let ledger = InventoryLedger::new(ctx.db.clone());
    assert_eq!(ledger.next_code().await.unwrap(), "I.0001");

    for expected in ["I.0001", "I.0002"] {
        let receipt = ledger
            .receive_stock(
                admin_id.clone(),
                InventoryReceiptCreate {
                    note: None,
                    details: vec![receipt_line(&rice, 1, 1000.0)],
                },
            )
            .await
            .unwrap();
        assert_eq!(receipt.receipt.code, expected);
    }

    assert_eq!(ledger.next_code().await.unwrap(), "I.0003");
    assert_eq!(ledger.list_receipts().await.unwrap().len(), 2);
}
