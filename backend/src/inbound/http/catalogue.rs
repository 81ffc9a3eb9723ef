//! Read-only catalogue HTTP handlers.
//!
//! ```text
//! GET /api/items
//! GET /api/items/{item_id}
//! ```

use actix_web::{get, web};

use crate::domain::{ApiResult, Error, Item, ItemId};

use super::state::HttpState;
use super::validation::parse_id;

/// List every catalogue item.
#[utoipa::path(
    get,
    path = "/api/items",
    responses(
        (status = 200, description = "Catalogue items", body = [Item]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listItems",
    security([])
)]
#[get("/items")]
pub async fn list_items(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Item>>> {
    Ok(web::Json(state.catalogue.list_items().await?))
}

/// Fetch one catalogue item.
#[utoipa::path(
    get,
    path = "/api/items/{item_id}",
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Catalogue item", body = Item),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 404, description = "Item not found", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "getItem",
    security([])
)]
#[get("/items/{item_id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Item>> {
    let item_id: ItemId = parse_id(&path.into_inner(), "item_id")?;
    Ok(web::Json(state.catalogue.find_item(&item_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::domain::ports::MockCatalogueQuery;
    use crate::inbound::http::test_utils::StateBuilder;

    async fn get(catalogue: MockCatalogueQuery, uri: &str) -> (StatusCode, Value) {
        let state = StateBuilder::default().catalogue(catalogue).build();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(list_items).service(get_item)),
        )
        .await;
        let response = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = response.status();
        (status, test::read_body_json(response).await)
    }

    #[actix_web::test]
    async fn list_items_serialises_every_item() {
        let item = Item::try_new("Item 1", Some("Description 1".into()), None).expect("valid");
        let mut catalogue = MockCatalogueQuery::new();
        let listed = item.clone();
        catalogue
            .expect_list_items()
            .returning(move || Ok(vec![listed.clone()]));

        let (status, body) = get(catalogue, "/api/items").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], json!(item.id.to_string()));
        assert_eq!(body[0]["name"], json!("Item 1"));
        assert_eq!(body[0]["description"], json!("Description 1"));
        assert_eq!(body[0]["image_url"], Value::Null);
    }

    #[actix_web::test]
    async fn unknown_items_are_not_found() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue
            .expect_find_item()
            .returning(|_| Err(Error::not_found("Item not found")));

        let (status, body) = get(catalogue, &format!("/api/items/{}", ItemId::random())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Item not found"));
    }

    #[actix_web::test]
    async fn malformed_item_ids_are_rejected_before_the_port() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue.expect_find_item().times(0);

        let (status, body) = get(catalogue, "/api/items/42").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!("item_id"));
    }
}
