// ==========================================
// Seguimiento - consumption aggregator integration tests
// ==========================================


use std::sync::Arc;

use seguimiento::{ConsumptionAggregator, ConsumptionSource, StoreClient};
use test_helpers::{
    d, memory_store, seed_article, seed_asset, seed_assignment, seed_assignment_item, seed_issue,
    seed_issue_item, seed_order_type, seed_request,
};

fn aggregator(store: &Arc<seguimiento::SqliteStore>) -> ConsumptionAggregator {
    ConsumptionAggregator::new(Arc::clone(store) as Arc<dyn StoreClient>)
}

#[tokio::test]
async fn test_ledger_merges_both_sources_date_descending() {
    let store = memory_store();
    seed_request(&store, 500, "2024-03-01", "INTERNAL");
    seed_article(&store, "A-100", "Cemento gris");
    seed_order_type(&store, 1, "Orden interna");

    seed_issue(&store, 10, 500, "2024-03-05", Some(1));
    seed_issue_item(&store, 10, "A-100", 2.0, 50.0, 100.0);
    seed_issue_item(&store, 10, "X-999", 1.0, 10.0, 10.0);
    seed_issue(&store, 11, 500, "2024-03-08", None);
    seed_issue_item(&store, 11, "A-100", 1.0, 50.0, 50.0);

    seed_asset(&store, 7, "Taladro industrial", "2.500,00");
    seed_assignment(&store, 20, 500, "2024-03-08");
    seed_assignment_item(&store, 20, 7, 2.0);

    let records = aggregator(&store).ledger(500).await.unwrap();
    assert_eq!(records.len(), 4);

    // date descending; the 03-08 tie breaks on transaction id descending
    assert_eq!(records[0].transaction_id, 20);
    assert_eq!(records[0].source, ConsumptionSource::Asset);
    assert_eq!(records[1].transaction_id, 11);
    assert_eq!(records[1].source, ConsumptionSource::Consumable);
    assert_eq!(records[2].transaction_date, d("2024-03-05"));
    assert_eq!(records[3].transaction_date, d("2024-03-05"));
}

#[tokio::test]
async fn test_consumable_records_resolve_names_and_order_types() {
    let store = memory_store();
    seed_request(&store, 500, "2024-03-01", "INTERNAL");
    seed_article(&store, "A-100", "Cemento gris");
    seed_order_type(&store, 1, "Orden interna");

    seed_issue(&store, 10, 500, "2024-03-05", Some(1));
    seed_issue_item(&store, 10, "A-100", 2.0, 50.0, 100.0);
    seed_issue_item(&store, 10, "X-999", 1.0, 10.0, 10.0);

    let records = aggregator(&store).ledger(500).await.unwrap();
    assert_eq!(records.len(), 2);

    let resolved = &records[0];
    assert_eq!(resolved.item_code, "A-100");
    assert_eq!(resolved.item_name, "Cemento gris");
    assert_eq!(resolved.quantity, 2.0);
    assert_eq!(resolved.subtotal, 100.0);
    assert_eq!(resolved.order_type.as_deref(), Some("Orden interna"));

    // unresolved code falls back to the raw code as display name
    let unresolved = &records[1];
    assert_eq!(unresolved.item_code, "X-999");
    assert_eq!(unresolved.item_name, "X-999");
    // the header's tag lands on every line item, not just the first
    assert_eq!(unresolved.order_type.as_deref(), Some("Orden interna"));
}

#[tokio::test]
async fn test_asset_records_parse_locale_ambiguous_values() {
    let store = memory_store();
    seed_request(&store, 500, "2024-03-01", "INTERNAL");

    // both locale conventions appear in stored valuations
    seed_asset(&store, 7, "Taladro industrial", "2.500,00");
    seed_asset(&store, 8, "Andamio", "1,234.56");
    seed_assignment(&store, 20, 500, "2024-03-08");
    seed_assignment_item(&store, 20, 7, 2.0);
    seed_assignment_item(&store, 20, 8, 1.0);

    let records = aggregator(&store).ledger(500).await.unwrap();
    assert_eq!(records.len(), 2);

    let taladro = records.iter().find(|r| r.item_code == "7").unwrap();
    assert_eq!(taladro.item_name, "Taladro industrial");
    assert_eq!(taladro.unit_price, 2500.0);
    assert_eq!(taladro.subtotal, 5000.0);
    assert_eq!(taladro.source, ConsumptionSource::Asset);
    assert!(taladro.order_type.is_none());

    let andamio = records.iter().find(|r| r.item_code == "8").unwrap();
    assert_eq!(andamio.unit_price, 1234.56);
}

#[tokio::test]
async fn test_ledger_for_request_without_consumption_is_empty() {
    let store = memory_store();
    seed_request(&store, 500, "2024-03-01", "INTERNAL");

    let records = aggregator(&store).ledger(500).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_ledger_is_scoped_to_one_request() {
    let store = memory_store();
    seed_request(&store, 500, "2024-03-01", "INTERNAL");
    seed_request(&store, 501, "2024-03-01", "EXTERNAL");
    seed_article(&store, "A-100", "Cemento gris");

    seed_issue(&store, 10, 500, "2024-03-05", None);
    seed_issue_item(&store, 10, "A-100", 2.0, 50.0, 100.0);
    seed_issue(&store, 11, 501, "2024-03-05", None);
    seed_issue_item(&store, 11, "A-100", 9.0, 50.0, 450.0);

    let records = aggregator(&store).ledger(500).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_id, 500);
    assert_eq!(records[0].quantity, 2.0);
}
