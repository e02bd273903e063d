use super::*;

use reqwest::Method;
use serde_json::json;

use crate::client::test_helpers::{ScriptedTransport, network_err, ok_json, status_err};
use crate::error::TransportError;
use crate::transport::{ApiResponse, RequestBody, ResponseKind};

fn service(responses: Vec<Result<ApiResponse, TransportError>>) -> (Arc<ScriptedTransport>, MenuService) {
    let transport = Arc::new(ScriptedTransport::new(responses));
    (Arc::clone(&transport), MenuService::new(transport))
}

fn menu_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Es Teh",
        "description": "Sweet iced tea",
        "price": 5000.0,
        "category": "drinks",
        "image_url": null,
        "is_available": true
    })
}

#[tokio::test]
async fn list_menus_forwards_filters_verbatim() {
    let (transport, menus) = service(vec![ok_json(json!({
        "menus": [menu_json(1), menu_json(2)],
        "total": 2, "pages": 1, "current_page": 1, "per_page": 10
    }))]);
    let params = ListParams::new().category("drinks").search("teh").page(1).with("sort", "price");

    let page = menus.list_menus(&params).await.unwrap();
    assert_eq!(page.menus.len(), 2);
    assert_eq!(page.paging.total, Some(2));
    assert_eq!(page.menus[0].name(), Some("Es Teh"));

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/menus");
    assert_eq!(request.query, params.to_query());
    assert_eq!(request.response_kind, ResponseKind::Json);
}

#[tokio::test]
async fn get_menu_unwraps_menu_field() {
    let (transport, menus) = service(vec![ok_json(json!({ "menu": menu_json(7) }))]);
    let menu = menus.get_menu(7).await.unwrap();
    assert_eq!(menu.id, EntityId::Num(7));
    assert_eq!(transport.last_request().path, "/menus/7");
}

#[tokio::test]
async fn create_and_update_send_draft() {
    let (transport, menus) = service(vec![
        ok_json(json!({ "message": "Menu created successfully", "menu": menu_json(3) })),
        ok_json(json!({ "message": "Menu updated successfully", "menu": menu_json(3) })),
    ]);
    let draft = MenuDraft {
        name: Some("Es Teh".to_owned()),
        price: Some(5000.0),
        category: Some("drinks".to_owned()),
        ..MenuDraft::default()
    };

    let created = menus.create_menu(&draft).await.unwrap();
    assert_eq!(created.message.as_deref(), Some("Menu created successfully"));
    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(
        requests[0].body,
        Some(RequestBody::Json(json!({ "name": "Es Teh", "price": 5000.0, "category": "drinks" })))
    );

    let patch = MenuDraft { is_available: Some(false), ..MenuDraft::default() };
    menus.update_menu("3", &patch).await.unwrap();
    let request = transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/menus/3");
    assert_eq!(request.body, Some(RequestBody::Json(json!({ "is_available": false }))));
}

#[tokio::test]
async fn delete_menu_hits_item_path() {
    let (transport, menus) = service(vec![ok_json(json!({ "message": "Menu deleted successfully" }))]);
    assert_eq!(menus.delete_menu(9).await.unwrap().message.as_deref(), Some("Menu deleted successfully"));
    let request = transport.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/menus/9");
}

#[tokio::test]
async fn categories_unwraps_list() {
    let (transport, menus) = service(vec![ok_json(json!({ "categories": ["food", "drinks"] }))]);
    assert_eq!(menus.categories().await.unwrap(), vec!["food", "drinks"]);
    assert_eq!(transport.last_request().path, "/menus/categories");
}

#[tokio::test]
async fn upload_image_sends_multipart_image_field() {
    let (transport, menus) = service(vec![ok_json(json!({
        "message": "Image uploaded successfully",
        "image_url": "/static/uploads/teh_abc.png"
    }))]);
    let file = FileUpload::new("teh.png", vec![1, 2, 3]);

    let upload = menus.upload_image(file.clone()).await.unwrap();
    assert_eq!(upload.image_url, "/static/uploads/teh_abc.png");

    let request = transport.last_request();
    assert_eq!(request.path, "/menus/upload-image");
    assert_eq!(request.body, Some(RequestBody::Multipart { field: "image".to_owned(), file }));
}

#[tokio::test]
async fn every_operation_uses_its_fallback_on_network_failure() {
    let (_, menus) = service((0..7).map(|_| network_err()).collect());
    let draft = MenuDraft::default();

    assert_eq!(menus.list_menus(&ListParams::new()).await.unwrap_err().error, FETCH_MENUS_FAILED);
    assert_eq!(menus.get_menu(1).await.unwrap_err().error, FETCH_MENU_FAILED);
    assert_eq!(menus.create_menu(&draft).await.unwrap_err().error, CREATE_MENU_FAILED);
    assert_eq!(menus.update_menu(1, &draft).await.unwrap_err().error, UPDATE_MENU_FAILED);
    assert_eq!(menus.delete_menu(1).await.unwrap_err().error, DELETE_MENU_FAILED);
    assert_eq!(menus.categories().await.unwrap_err().error, FETCH_CATEGORIES_FAILED);
    assert_eq!(
        menus.upload_image(FileUpload::new("x.png", vec![])).await.unwrap_err().error,
        UPLOAD_IMAGE_FAILED
    );
}

#[tokio::test]
async fn every_operation_prefers_server_message() {
    let (_, menus) = service((0..7).map(|_| status_err(400, Some(json!({ "error": "X" })))).collect());
    let draft = MenuDraft::default();

    let errors = vec![
        menus.list_menus(&ListParams::new()).await.unwrap_err(),
        menus.get_menu(1).await.unwrap_err(),
        menus.create_menu(&draft).await.unwrap_err(),
        menus.update_menu(1, &draft).await.unwrap_err(),
        menus.delete_menu(1).await.unwrap_err(),
        menus.categories().await.unwrap_err(),
        menus.upload_image(FileUpload::new("x.gif", vec![])).await.unwrap_err(),
    ];
    for err in errors {
        assert_eq!(serde_json::to_value(&err).unwrap(), json!({ "error": "X" }));
    }
}

#[tokio::test]
async fn malformed_success_body_uses_fallback() {
    let (_, menus) = service(vec![ok_json(json!({ "menus": "not a list" })), ok_json(json!({ "menu": null }))]);
    assert_eq!(menus.list_menus(&ListParams::new()).await.unwrap_err().error, FETCH_MENUS_FAILED);
    assert_eq!(menus.get_menu(1).await.unwrap_err().error, FETCH_MENU_FAILED);
}
