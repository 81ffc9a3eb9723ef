//! Comment HTTP handlers.
//!
//! ```text
//! GET    /api/items/{item_id}/reviews/{review_id}/comments
//! POST   /api/items/{item_id}/reviews/{review_id}/comments  (gated)
//! GET    /api/comments/me                                   (gated)
//! PUT    /api/users/{user_id}/comments/{comment_id}         (gated)
//! DELETE /api/users/{user_id}/comments/{comment_id}         (gated)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, AuthoredComment, Comment, CommentContent, CommentId, Error, ItemId, ReviewId,
};

use super::identity_gate::{CurrentUser, RequireIdentity};
use super::state::HttpState;
use super::validation::{map_comment_validation_error, missing_field_error, parse_id};

/// Comment body for create and update. Any `review_id` field is ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentRequest {
    #[schema(example = "I agree!")]
    pub content: Option<String>,
}

fn parse_comment_request(payload: CommentRequest) -> Result<CommentContent, Error> {
    let content = payload
        .content
        .ok_or_else(|| missing_field_error("content"))?;
    CommentContent::try_new(content).map_err(map_comment_validation_error)
}

fn parse_review_path(path: (String, String)) -> Result<(ItemId, ReviewId), Error> {
    let (item_id, review_id) = path;
    Ok((
        parse_id(&item_id, "item_id")?,
        parse_id(&review_id, "review_id")?,
    ))
}

/// List the comments on a review.
#[utoipa::path(
    get,
    path = "/api/items/{item_id}/reviews/{review_id}/comments",
    params(
        ("item_id" = String, Path, description = "Item identifier"),
        ("review_id" = String, Path, description = "Review identifier")
    ),
    responses(
        (status = 200, description = "Comments on the review", body = [Comment]),
        (status = 404, description = "Review not found under this item", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listReviewComments",
    security([])
)]
#[get("/items/{item_id}/reviews/{review_id}/comments")]
pub async fn list_review_comments(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<Comment>>> {
    let (item_id, review_id) = parse_review_path(path.into_inner())?;
    Ok(web::Json(
        state
            .comments_query
            .comments_for_review(&item_id, &review_id)
            .await?,
    ))
}

/// Comment on a review as the current user.
#[utoipa::path(
    post,
    path = "/api/items/{item_id}/reviews/{review_id}/comments",
    params(
        ("item_id" = String, Path, description = "Item identifier"),
        ("review_id" = String, Path, description = "Review identifier")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Review not found under this item", body = Error)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post(
    "/items/{item_id}/reviews/{review_id}/comments",
    wrap = "RequireIdentity"
)]
pub async fn create_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let (item_id, review_id) = parse_review_path(path.into_inner())?;
    let content = parse_comment_request(payload.into_inner())?;
    let comment = state
        .comments
        .create_comment(user.id(), &item_id, &review_id, content)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// List the current user's comments with their username.
#[utoipa::path(
    get,
    path = "/api/comments/me",
    responses(
        (status = 200, description = "Comments by the current user", body = [AuthoredComment]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listMyComments"
)]
#[get("/comments/me", wrap = "RequireIdentity")]
pub async fn my_comments(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<AuthoredComment>>> {
    Ok(web::Json(state.comments_query.comments_by(user.id()).await?))
}

/// Replace the current user's comment. The response carries a new id.
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/comments/{comment_id}",
    params(
        ("user_id" = String, Path, description = "Ignored; ownership follows the token"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Replacement comment", body = Comment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Comment not found or not owned", body = Error)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/users/{user_id}/comments/{comment_id}", wrap = "RequireIdentity")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<Comment>> {
    let (_, comment_id) = path.into_inner();
    let comment_id: CommentId = parse_id(&comment_id, "comment_id")?;
    let content = parse_comment_request(payload.into_inner())?;
    let comment = state
        .comments
        .update_comment(user.id(), &comment_id, content)
        .await?;
    Ok(web::Json(comment))
}

/// Delete the current user's comment.
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/comments/{comment_id}",
    params(
        ("user_id" = String, Path, description = "Ignored; ownership follows the token"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Comment not found or not owned", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/users/{user_id}/comments/{comment_id}", wrap = "RequireIdentity")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (_, comment_id) = path.into_inner();
    let comment_id: CommentId = parse_id(&comment_id, "comment_id")?;
    state.comments.delete_comment(user.id(), &comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::domain::ports::{MockCommentsCommand, MockCommentsQuery};
    use crate::domain::UserId;
    use crate::inbound::http::test_utils::{StateBuilder, TEST_TOKEN, resolver_for, user_named};

    async fn send(state: HttpState, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/api")
                    .service(list_review_comments)
                    .service(create_comment)
                    .service(my_comments)
                    .service(update_comment)
                    .service(delete_comment),
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

    fn comment_by(author: UserId, review_id: ReviewId) -> Comment {
        Comment::create(
            author,
            review_id,
            CommentContent::try_new("I agree!").expect("content"),
        )
    }

    #[actix_web::test]
    async fn create_returns_the_new_comment() {
        let bob = user_named("bob");
        let (item_id, review_id) = (ItemId::random(), ReviewId::random());
        let created = comment_by(*bob.id(), review_id);
        let returned = created.clone();
        let mut comments = MockCommentsCommand::new();
        comments
            .expect_create_comment()
            .withf(move |_, item, review, _| {
                item.as_uuid() == item_id.as_uuid() && review.as_uuid() == review_id.as_uuid()
            })
            .times(1)
            .returning(move |_, _, _, _| Ok(returned.clone()));
        let state = StateBuilder::default()
            .identity(resolver_for(bob))
            .comments(comments)
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri(&format!("/api/items/{item_id}/reviews/{review_id}/comments"))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(json!({"content": "I agree!"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], json!(created.id.to_string()));
        assert_eq!(body["review_id"], json!(review_id.to_string()));
    }

    #[actix_web::test]
    async fn blank_comments_are_rejected() {
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("bob")))
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::post()
                .uri(&format!(
                    "/api/items/{}/reviews/{}/comments",
                    ItemId::random(),
                    ReviewId::random()
                ))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(json!({"content": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!("content"));
    }

    #[actix_web::test]
    async fn foreign_comment_updates_are_not_found() {
        let mut comments = MockCommentsCommand::new();
        comments
            .expect_update_comment()
            .returning(|_, _, _| Err(Error::not_found_or_forbidden("Comment")));
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("alice")))
            .comments(comments)
            .build();

        let (status, body) = send(
            state,
            test::TestRequest::put()
                .uri(&format!(
                    "/api/users/{}/comments/{}",
                    UserId::random(),
                    CommentId::random()
                ))
                .insert_header((AUTHORIZATION, TEST_TOKEN))
                .set_json(json!({"content": "Hacked"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Comment not found or unauthorized"));
    }

    #[actix_web::test]
    async fn delete_returns_no_content() {
        let mut comments = MockCommentsCommand::new();
        comments
            .expect_delete_comment()
            .times(1)
            .returning(|_, _| Ok(()));
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("bob")))
            .comments(comments)
            .build();

        let (status, _) = send(
            state,
            test::TestRequest::delete()
                .uri(&format!(
                    "/api/users/{}/comments/{}",
                    UserId::random(),
                    CommentId::random()
                ))
                .insert_header((AUTHORIZATION, TEST_TOKEN)),
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn listing_comments_is_public() {
        let review_id = ReviewId::random();
        let listed = vec![comment_by(UserId::random(), review_id)];
        let mut query = MockCommentsQuery::new();
        query
            .expect_comments_for_review()
            .returning(move |_, _| Ok(listed.clone()));
        let state = StateBuilder::default().comments_query(query).build();

        let (status, body) = send(
            state,
            test::TestRequest::get().uri(&format!(
                "/api/items/{}/reviews/{review_id}/comments",
                ItemId::random()
            )),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["content"], json!("I agree!"));
    }

    #[actix_web::test]
    async fn my_comments_require_a_token() {
        let mut query = MockCommentsQuery::new();
        query.expect_comments_by().times(0);
        let state = StateBuilder::default()
            .identity(resolver_for(user_named("bob")))
            .comments_query(query)
            .build();

        let (status, _) = send(state, test::TestRequest::get().uri("/api/comments/me")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
