//! Recommendation engine: rule ranking, global dedup, popularity padding

mod common;

use common::*;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use store_server::SuggestionEngine;
use store_server::db::models::{AssociationRule, Transaction};

async fn seed_rule(
    db: &Surreal<Db>,
    lift: f64,
    confidence: f64,
    support: f64,
    antecedents: &[&RecordId],
    consequents: &[&RecordId],
) {
    let rule = AssociationRule {
        id: None,
        antecedents: antecedents.iter().map(|r| (*r).clone()).collect(),
        consequents: consequents.iter().map(|r| (*r).clone()).collect(),
        antecedent_support: support,
        consequent_support: support,
        support,
        confidence,
        lift,
    };
    let created: Option<AssociationRule> =
        db.create("association_rule").content(rule).await.unwrap();
    created.unwrap();
}

async fn seed_purchase(db: &Surreal<Db>, products: &[&RecordId]) {
    let row = Transaction {
        id: None,
        order: None,
        product_ids: products.iter().map(|r| (*r).clone()).collect(),
        created_at: None,
    };
    let created: Option<Transaction> = db.create("transaction").content(row).await.unwrap();
    created.unwrap();
}

fn keys(cards: &[store_server::db::models::ProductCard]) -> Vec<String> {
    cards.iter().map(|c| c.id.key().to_string()).collect()
}

#[tokio::test]
async fn rule_order_and_global_dedup_are_deterministic() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "misc", "Misc").await;
    let x = seed_product(&ctx.db, "x", "P.0000", "X", 1000.0, 9, true, &cat).await;
    let a = seed_product(&ctx.db, "a", "P.0001", "A", 1000.0, 9, true, &cat).await;
    let b = seed_product(&ctx.db, "b", "P.0002", "B", 1000.0, 9, true, &cat).await;
    let c = seed_product(&ctx.db, "c", "P.0003", "C", 1000.0, 9, true, &cat).await;

    // R1 outranks R2 on lift; B occurs in both and must be kept only once
    seed_rule(&ctx.db, 2.0, 0.5, 0.1, &[&x], &[&a, &b]).await;
    seed_rule(&ctx.db, 1.5, 0.5, 0.1, &[&x], &[&b, &c]).await;

    let picked = SuggestionEngine::new(ctx.db.clone())
        .suggest(&[x.clone()], 3)
        .await
        .unwrap();
    assert_eq!(keys(&picked), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn ties_fall_back_to_confidence_then_support() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "misc", "Misc").await;
    let x = seed_product(&ctx.db, "x", "P.0000", "X", 1000.0, 9, true, &cat).await;
    let a = seed_product(&ctx.db, "a", "P.0001", "A", 1000.0, 9, true, &cat).await;
    let b = seed_product(&ctx.db, "b", "P.0002", "B", 1000.0, 9, true, &cat).await;
    let c = seed_product(&ctx.db, "c", "P.0003", "C", 1000.0, 9, true, &cat).await;

    // Same lift everywhere: confidence decides between a and b, then
    // support pushes c behind a
    seed_rule(&ctx.db, 1.5, 0.4, 0.3, &[&x], &[&b]).await;
    seed_rule(&ctx.db, 1.5, 0.9, 0.1, &[&x], &[&a]).await;
    seed_rule(&ctx.db, 1.5, 0.9, 0.2, &[&x], &[&c]).await;

    let picked = SuggestionEngine::new(ctx.db.clone())
        .suggest(&[x.clone()], 3)
        .await
        .unwrap();
    assert_eq!(keys(&picked), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn seeds_and_inactive_products_never_appear() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "misc", "Misc").await;
    let x = seed_product(&ctx.db, "x", "P.0000", "X", 1000.0, 9, true, &cat).await;
    let a = seed_product(&ctx.db, "a", "P.0001", "A", 1000.0, 9, true, &cat).await;
    let dead = seed_product(&ctx.db, "dead", "P.0002", "Dead", 1000.0, 9, false, &cat).await;

    seed_rule(&ctx.db, 2.0, 0.5, 0.1, &[&x], &[&x, &dead, &a]).await;

    let picked = SuggestionEngine::new(ctx.db.clone())
        .suggest(&[x.clone()], 12)
        .await
        .unwrap();
    assert_eq!(keys(&picked), vec!["a"]);
}

#[tokio::test]
async fn padding_fills_up_with_popular_products() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "misc", "Misc").await;
    let x = seed_product(&ctx.db, "x", "P.0000", "X", 1000.0, 9, true, &cat).await;
    let a = seed_product(&ctx.db, "a", "P.0001", "A", 1000.0, 9, true, &cat).await;
    let b = seed_product(&ctx.db, "b", "P.0002", "B", 1000.0, 9, true, &cat).await;
    let p1 = seed_product(&ctx.db, "p1", "P.0101", "Pop1", 1000.0, 9, true, &cat).await;
    let p2 = seed_product(&ctx.db, "p2", "P.0102", "Pop2", 1000.0, 9, true, &cat).await;
    let p3 = seed_product(&ctx.db, "p3", "P.0103", "Pop3", 1000.0, 9, true, &cat).await;

    // Two rule-derived results...
    seed_rule(&ctx.db, 2.0, 0.5, 0.1, &[&x], &[&a, &b]).await;

    // ...and a popularity signal: p2 in three purchases, p3 in two, p1 in one
    seed_purchase(&ctx.db, &[&p2, &p3]).await;
    seed_purchase(&ctx.db, &[&p2, &p3]).await;
    seed_purchase(&ctx.db, &[&p2, &p1]).await;

    let picked = SuggestionEngine::new(ctx.db.clone())
        .suggest(&[x.clone()], 5)
        .await
        .unwrap();

    // Rule results first in rule order, then exactly three padded by
    // purchase count descending
    assert_eq!(keys(&picked), vec!["a", "b", "p2", "p3", "p1"]);
}

#[tokio::test]
async fn cold_start_returns_popular_actives_only() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "misc", "Misc").await;
    let a = seed_product(&ctx.db, "a", "P.0001", "A", 1000.0, 9, true, &cat).await;
    let b = seed_product(&ctx.db, "b", "P.0002", "B", 1000.0, 9, true, &cat).await;
    let dead = seed_product(&ctx.db, "dead", "P.0003", "Dead", 1000.0, 9, false, &cat).await;

    seed_purchase(&ctx.db, &[&b, &dead]).await;
    seed_purchase(&ctx.db, &[&b]).await;
    seed_purchase(&ctx.db, &[&a]).await;

    let picked = SuggestionEngine::new(ctx.db.clone()).suggest(&[], 12).await.unwrap();
    assert_eq!(keys(&picked), vec!["b", "a"]);
}

#[tokio::test]
async fn result_is_capped_by_available_actives() {
    let ctx = setup().await;
    let cat = seed_category(&ctx.db, "misc", "Misc").await;
    let x = seed_product(&ctx.db, "x", "P.0000", "X", 1000.0, 9, true, &cat).await;
    seed_product(&ctx.db, "a", "P.0001", "A", 1000.0, 9, true, &cat).await;
    seed_product(&ctx.db, "b", "P.0002", "B", 1000.0, 9, true, &cat).await;

    // Twelve requested, but only two active non-seed products exist
    let picked = SuggestionEngine::new(ctx.db.clone())
        .suggest(&[x.clone()], 12)
        .await
        .unwrap();
    assert_eq!(picked.len(), 2);
}
