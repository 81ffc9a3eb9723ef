//! Review HTTP handlers.
//!
//! ```text
//! GET    /api/items/{item_id}/reviews
//! GET    /api/items/{item_id}/reviews/{review_id}
//! POST   /api/items/{item_id}/reviews              (gated)
//! GET    /api/reviews/me                           (gated)
//! PUT    /api/users/{user_id}/reviews/{review_id}  (gated)
//! DELETE /api/users/{user_id}/reviews/{review_id}  (gated)
//! ```
//!
//! The `{user_id}` segment is kept for route compatibility only. Ownership is
//! always decided by the identity the gate resolved.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, AuthoredReview, Error, ItemId, Review, ReviewContent, ReviewId};

use super::identity_gate::{CurrentUser, RequireIdentity};
use super::state::HttpState;
use super::validation::{map_review_validation_error, missing_field_error, parse_id};

/// Review body for create and update. Any `item_id` field is ignored; the
/// item always comes from the path or the stored row.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReviewRequest {
    #[schema(example = "Great product!")]
    pub content: Option<String>,
    #[schema(example = 5)]
    pub rating: Option<i32>,
}

fn parse_review_request(payload: ReviewRequest) -> Result<ReviewContent, Error> {
    let content = payload
        .content
        .ok_or_else(|| missing_field_error("content"))?;
    let rating = payload.rating.ok_or_else(|| missing_field_error("rating"))?;
    ReviewContent::try_from_parts(&content, rating).map_err(map_review_validation_error)
}

/// List the reviews of an item.
#[utoipa::path(
    get,
    path = "/api/items/{item_id}/reviews",
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Reviews of the item", body = [Review]),
        (status = 400, description = "Invalid identifier", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listItemReviews",
    security([])
)]
#[get("/items/{item_id}/reviews")]
pub async fn list_item_reviews(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Review>>> {
    let item_id: ItemId = parse_id(&path.into_inner(), "item_id")?;
    Ok(web::Json(state.reviews_query.reviews_for_item(&item_id).await?))
}

/// Fetch one review of an item.
#[utoipa::path(
    get,
    path = "/api/items/{item_id}/reviews/{review_id}",
    params(
        ("item_id" = String, Path, description = "Item identifier"),
        ("review_id" = String, Path, description = "Review identifier")
    ),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Review not found", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "getItemReview",
    security([])
)]
#[get("/items/{item_id}/reviews/{review_id}")]
pub async fn get_item_review(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Review>> {
    let (item_id, review_id) = path.into_inner();
    let item_id: ItemId = parse_id(&item_id, "item_id")?;
    let review_id: ReviewId = parse_id(&review_id, "review_id")?;
    Ok(web::Json(
        state.reviews_query.review_for_item(&item_id, &review_id).await?,
    ))
}

/// Review an item as the current user.
#[utoipa::path(
    post,
    path = "/api/items/{item_id}/reviews",
    params(("item_id" = String, Path, description = "Item identifier")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Item not found", body = Error),
        (status = 409, description = "Item already reviewed by this user", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/items/{item_id}/reviews", wrap = "RequireIdentity")]
pub async fn create_review(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<HttpResponse> {
    let item_id: ItemId = parse_id(&path.into_inner(), "item_id")?;
    let content = parse_review_request(payload.into_inner())?;
    let review = state
        .reviews
        .create_review(user.id(), &item_id, content)
        .await?;
    Ok(HttpResponse::Created().json(review))
}

/// List the current user's reviews with their username.
#[utoipa::path(
    get,
    path = "/api/reviews/me",
    responses(
        (status = 200, description = "Reviews by the current user", body = [AuthoredReview]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listMyReviews"
)]
#[get("/reviews/me", wrap = "RequireIdentity")]
pub async fn my_reviews(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<AuthoredReview>>> {
    Ok(web::Json(state.reviews_query.reviews_by(user.id()).await?))
}

/// Replace the current user's review.
///
/// The response carries a new review id; the old id stops resolving.
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/reviews/{review_id}",
    params(
        ("user_id" = String, Path, description = "Ignored; ownership follows the token"),
        ("review_id" = String, Path, description = "Review identifier")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Replacement review", body = Review),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Review not found or not owned", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[put("/users/{user_id}/reviews/{review_id}", wrap = "RequireIdentity")]
pub async fn update_review(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<Review>> {
    let (_, review_id) = path.into_inner();
    let review_id: ReviewId = parse_id(&review_id, "review_id")?;
    let content = parse_review_request(payload.into_inner())?;
    let review = state
        .reviews
        .update_review(user.id(), &review_id, content)
        .await?;
    Ok(web::Json(review))
}

/// Delete the current user's review and its comments.
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/reviews/{review_id}",
    params(
        ("user_id" = String, Path, description = "Ignored; ownership follows the token"),
        ("review_id" = String, Path, description = "Review identifier")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Review not found or not owned", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/users/{user_id}/reviews/{review_id}", wrap = "RequireIdentity")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (_, review_id) = path.into_inner();
    let review_id: ReviewId = parse_id(&review_id, "review_id")?;
    state.reviews.delete_review(user.id(), &review_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{MockReviewsCommand, MockReviewsQuery};
    use crate::domain::{ErrorCode, Rating, User, UserId};
    use crate::inbound::http::test_utils::{StateBuilder, TEST_TOKEN, resolver_for, user_named};

    async fn send(state: HttpState, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api")
                    .service(list_item_reviews)
                    .service(get_item_review)
                    .service(create_review)
                    .service(my_reviews)
                    .service(update_review)
                    .service(delete_review),
            ),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    fn review_by(user: &User, item_id: ItemId) -> Review {
        Review::create(
            *user.id(),
            item_id,
            ReviewContent::try_new("Great product!", Rating::try_from(5).expect("rating"))
                .expect("content"),
        )
    }

    #[actix_web::test]
    async fn parse_review_request_requires_both_fields() {
        let err = parse_review_request(ReviewRequest {
            content: Some("Great".into()),
            rating: None,
        })
        .expect_err("missing rating");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("rating")));
    }

    #[actix_web::test]
    async fn create_uses_the_path_item_and_the_resolved_author() {
        let alice = user_named("alice");
        let item_id = ItemId::random();
        let created = review_by(&alice, item_id);
        let author = *alice.id();
        let mut reviews = MockReviewsCommand::new();
        let returned = created.clone();
        reviews
            .expect_create_review()
            .withf(move |actor, item, content| {
                actor.as_uuid() == author.as_uuid()
                    && item.as_uuid() == item_id.as_uuid()
                    && content.rating().get() == 5
            })
            .times(1)
            .returning(move |_, _, _| Ok(returned.clone()));
        let state = StateBuilder::default()
            .identity(resolver_for(alice))
            .reviews(reviews)
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri(&format!("/api/items/{item_id}/reviews"))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(json!({
                    "content": "Great product!",
                    "rating": 5,
                    "item_id": ItemId::random().to_string(),
                })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], json!(created.id.to_string()));
        assert_eq!(body["item_id"], json!(item_id.to_string()));
        assert_eq!(body["user_id"], json!(author.to_string()));
    }

    #[actix_web::test]
    async fn create_without_token_never_reaches_the_port() {
        let mut reviews = MockReviewsCommand::new();
        reviews.expect_create_review().times(0);
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("alice")))
            .reviews(reviews)
            .build();

        let (status, _) = send(
            state,
            test::TestRequest::post()
                .uri(&format!("/api/items/{}/reviews", ItemId::random()))
                .set_json(json!({"content": "Great", "rating": 5})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(json!({"content": "Great", "rating": 9}), "rating")]
    #[case(json!({"content": "  ", "rating": 3}), "content")]
    #[actix_web::test]
    async fn invalid_review_bodies_are_rejected(#[case] payload: Value, #[case] field: &str) {
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("alice")))
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri(&format!("/api/items/{}/reviews", ItemId::random()))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!(field));
    }

    #[actix_web::test]
    async fn duplicate_reviews_conflict() {
        let mut reviews = MockReviewsCommand::new();
        reviews
            .expect_create_review()
            .returning(|_, _, _| Err(Error::duplicate_review()));
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("alice")))
            .reviews(reviews)
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri(&format!("/api/items/{}/reviews", ItemId::random()))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(json!({"content": "Again", "rating": 4})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["details"]["code"], json!("duplicate_review"));
    }

    #[actix_web::test]
    async fn update_ignores_the_user_id_segment() {
        let bob = user_named("bob");
        let bob_id = *bob.id();
        let review_id = ReviewId::random();
        let mut reviews = MockReviewsCommand::new();
        reviews
            .expect_update_review()
            .withf(move |actor, id, _| {
                actor.as_uuid() == bob_id.as_uuid() && id.as_uuid() == review_id.as_uuid()
            })
            .times(1)
            .returning(|_, _, _| Err(Error::not_found_or_forbidden("Review")));
        let state = StateBuilder::default()
            .identity(resolver_for(bob))
            .reviews(reviews)
            .build();

        let someone_else = UserId::random();
        let (status, body) = send(
            state,
            test::TestRequest::put()
                .uri(&format!("/api/users/{someone_else}/reviews/{review_id}"))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(json!({"content": "Hacked", "rating": 1})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Review not found or unauthorized"));
    }

    #[actix_web::test]
    async fn delete_returns_no_content() {
        let alice = user_named("alice");
        let mut reviews = MockReviewsCommand::new();
        reviews
            .expect_delete_review()
            .times(1)
            .returning(|_, _| Ok(()));
        let state = StateBuilder::default()
            .identity(resolver_for(alice.clone()))
            .reviews(reviews)
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::delete()
                .uri(&format!(
                    "/api/users/{}/reviews/{}",
                    alice.id(),
                    ReviewId::random()
                ))
                .insert_header((AUTHORIZATION, TEST_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
    }

    #[actix_web::test]
    async fn my_reviews_include_the_username() {
        let alice = user_named("alice");
        let authored = AuthoredReview {
            review: review_by(&alice, ItemId::random()),
            username: alice.username().clone(),
        };
        let mut query = MockReviewsQuery::new();
        query
            .expect_reviews_by()
            .returning(move |_| Ok(vec![authored.clone()]));
        let state = StateBuilder::default()
            .identity(resolver_for(alice))
            .reviews_query(query)
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::get()
                .uri("/api/reviews/me")
                .insert_header((AUTHORIZATION, TEST_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["username"], json!("alice"));
        assert_eq!(body[0]["rating"], json!(5));
    }

    #[actix_web::test]
    async fn public_listing_needs_no_token() {
        let mut query = MockReviewsQuery::new();
        query.expect_reviews_for_item().returning(|_| Ok(Vec::new()));
        let state = StateBuilder::default().reviews_query(query).build();

        let (status, body) = send(
            state,
            test::TestRequest::get().uri(&format!("/api/items/{}/reviews", ItemId::random())),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
