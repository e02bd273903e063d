use super::*;
use serde_json::json;

#[test]
fn entity_id_accepts_numbers_and_strings() {
    let num: EntityId = serde_json::from_value(json!(42)).unwrap();
    let text: EntityId = serde_json::from_value(json!("ord-7")).unwrap();
    assert_eq!(num, EntityId::Num(42));
    assert_eq!(text, EntityId::Text("ord-7".to_owned()));
    assert_eq!(num.to_string(), "42");
    assert_eq!(text.to_string(), "ord-7");
}

#[test]
fn entity_id_strings_stay_verbatim() {
    assert_eq!(EntityId::from("007"), EntityId::Text("007".to_owned()));
    assert_eq!(EntityId::from("+42".to_owned()).to_string(), "+42");
    assert_eq!(serde_json::to_value(EntityId::from("7")).unwrap(), json!("7"));
    assert_eq!(EntityId::from(7).to_string(), "7");
}

#[test]
fn list_params_keep_unknown_keys_verbatim() {
    let params = ListParams::new().status("pending").page(2).with("sort", "newest");
    assert_eq!(params.get("status"), Some("pending"));
    assert_eq!(
        params.to_query(),
        vec![
            ("page".to_owned(), "2".to_owned()),
            ("sort".to_owned(), "newest".to_owned()),
            ("status".to_owned(), "pending".to_owned()),
        ]
    );
}

#[test]
fn list_params_from_iter() {
    let params: ListParams = [("category", "drinks"), ("search", "")].into_iter().collect();
    assert_eq!(params.get("category"), Some("drinks"));
    assert_eq!(params.get("search"), Some(""));
    assert!(!params.is_empty());
    assert!(ListParams::new().is_empty());
}

#[test]
fn menu_keeps_unknown_fields() {
    let menu: Menu = serde_json::from_value(json!({
        "id": 3,
        "name": "Nasi Goreng",
        "description": null,
        "price": 25000.0,
        "category": "food",
        "image_url": "/static/uploads/nasi.png",
        "is_available": false,
        "created_at": "2025-06-01T10:00:00"
    }))
    .unwrap();
    assert_eq!(menu.id, EntityId::Num(3));
    assert_eq!(menu.name(), Some("Nasi Goreng"));
    assert_eq!(menu.description(), None);
    assert_eq!(menu.is_available(), Some(false));
    assert_eq!(menu.fields.get("created_at"), Some(&json!("2025-06-01T10:00:00")));
}

#[test]
fn menu_missing_fields_are_not_invented() {
    let menu: Menu = serde_json::from_value(json!({ "id": "m-1", "name": "Es Teh" })).unwrap();
    assert_eq!(menu.price(), None);
    assert_eq!(menu.category(), None);
    assert_eq!(menu.is_available(), None);
    assert_eq!(serde_json::to_value(&menu).unwrap(), json!({ "id": "m-1", "name": "Es Teh" }));
}

#[test]
fn menu_draft_omits_unset_fields() {
    let draft = MenuDraft { price: Some(12.5), is_available: Some(true), ..MenuDraft::default() };
    assert_eq!(serde_json::to_value(&draft).unwrap(), json!({ "price": 12.5, "is_available": true }));
}

#[test]
fn order_patch_serializes_status_lowercase() {
    let patch = OrderPatch { status: Some(OrderStatus::Cancelled), ..OrderPatch::default() };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "status": "cancelled" }));
}

#[test]
fn order_status_parses_case_insensitively() {
    assert_eq!("Completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
    assert_eq!(" pending ".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
    assert!("shipped".parse::<OrderStatus>().unwrap_err().contains("shipped"));
}

#[test]
fn order_decodes_items() {
    let order: Order = serde_json::from_value(json!({
        "id": 9,
        "customer_name": "Budi",
        "status": "pending",
        "total_amount": 50000.0,
        "notes": "",
        "order_items": [
            { "id": 1, "menu_id": 3, "menu_name": "Nasi Goreng", "quantity": 2, "price": 25000.0, "subtotal": 50000.0 }
        ]
    }))
    .unwrap();
    let items = order.order_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].menu_id(), Some(EntityId::Num(3)));
    assert_eq!(items[0].quantity(), Some(2));
    assert_eq!(order.status(), Some("pending"));
    assert_eq!(order.notes(), Some(""));
}

#[test]
fn order_with_nulls_and_unknown_fields_round_trips_unchanged() {
    let raw = json!({
        "id": 9,
        "customer_name": null,
        "status": "preparing",
        "table": 4,
        "order_items": [
            { "menu_id": 1, "quantity": 2, "note": "no ice" },
            { "menu_id": null, "quantity": 1, "price": null }
        ]
    });
    let order: Order = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(order.customer_name(), None);
    assert_eq!(order.status(), Some("preparing"));
    assert_eq!(order.total_amount(), None);
    let items = order.order_items();
    assert_eq!(items[0].fields.get("note"), Some(&json!("no ice")));
    assert_eq!(items[0].price(), None);
    assert_eq!(items[1].menu_id(), None);

    assert_eq!(serde_json::to_value(&order).unwrap(), raw);
}

#[test]
fn page_counters_are_optional() {
    let page: OrderPage = serde_json::from_value(json!({ "orders": [], "total": 0 })).unwrap();
    assert_eq!(page.paging.total, Some(0));
    assert_eq!(page.paging.pages, None);
    assert_eq!(serde_json::to_value(&page).unwrap(), json!({ "orders": [], "total": 0 }));
}
