//! HTTP handlers for the Users and Purchases APIs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    CreatedResponse, MessageResponse, UuidPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestQueryResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use domain_products::Product;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, PurchaseRequest, PurchasedProductsPage, PurchasesQuery, UpdateUser, User,
    UserPage, UserQuery, UserSortField,
};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        get_user_by_email,
        update_user,
        delete_user,
        list_purchased_products,
    ),
    components(
        schemas(
            User, CreateUser, UpdateUser, UserPage, UserSortField, PurchasedProductsPage,
            Product, CreatedResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            ConflictResponse,
            BadRequestValidationResponse,
            BadRequestQueryResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(add_purchase, remove_purchase),
    components(
        schemas(PurchaseRequest, MessageResponse),
        responses(NotFoundResponse, ServiceUnavailableResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Purchases", description = "Purchase membership endpoints")
    )
)]
pub struct PurchasesApiDoc;

/// Users router; nest it under `/users`
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/email/{email}", get(get_user_by_email))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/{id}/purchases", get(list_purchased_products))
        .with_state(shared_service)
}

/// Purchases router; nest it under `/purchases`
pub fn purchases_router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(add_purchase).delete(remove_purchase))
        .with_state(shared_service)
}

/// List users with pagination, sorting and filters
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(UserQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedQuery(query): ValidatedQuery<UserQuery>,
) -> UserResult<Json<UserPage>> {
    Ok(Json(service.list_users(query).await?))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(user.id))))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<User>> {
    Ok(Json(service.get_user(id).await?))
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_email<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(email): Path<String>,
) -> UserResult<Json<User>> {
    Ok(Json(service.get_user_by_email(&email).await?))
}

/// Update the supplied fields of a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<User>> {
    Ok(Json(service.update_user(id, input).await?))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<MessageResponse>> {
    if !service.delete_user(id).await? {
        return Err(UserError::NotFound(id));
    }
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Products the user has purchased
#[utoipa::path(
    get,
    path = "/{id}/purchases",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        PurchasesQuery
    ),
    responses(
        (status = 200, description = "One page of purchased products", body = PurchasedProductsPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_purchased_products<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedQuery(query): ValidatedQuery<PurchasesQuery>,
) -> UserResult<Json<PurchasedProductsPage>> {
    Ok(Json(service.purchased_products(id, query).await?))
}

/// Record that a user bought a product
#[utoipa::path(
    post,
    path = "",
    tag = "Purchases",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase recorded", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_purchase<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(request): ValidatedJson<PurchaseRequest>,
) -> UserResult<Json<MessageResponse>> {
    service.add_purchase(request).await?;
    Ok(Json(MessageResponse::new("Product added to purchases")))
}

/// Remove a product from a user's purchases
#[utoipa::path(
    delete,
    path = "",
    tag = "Purchases",
    request_body = PurchaseRequest,
    responses(
        (status = 200, description = "Purchase removed", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_purchase<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(request): ValidatedJson<PurchaseRequest>,
) -> UserResult<Json<MessageResponse>> {
    service.remove_purchase(request).await?;
    Ok(Json(MessageResponse::new("Product removed from purchases")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserDocument;
    use crate::repository::MockUserRepository;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn sample_user() -> User {
        UserDocument::new(CreateUser {
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            status: true,
            is_active: true,
            is_staff: false,
            is_superuser: false,
        })
        .into()
    }

    #[tokio::test]
    async fn test_create_user_returns_201() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists_by_email().returning(|_| Ok(false));
        mock_repo
            .expect_create()
            .returning(|input| Ok(UserDocument::new(input).into()));

        let response = router(UserService::new(mock_repo))
            .oneshot(json_request(
                "POST",
                "/",
                json!({ "email": "ada@example.com", "name": "Ada" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: CreatedResponse = json_body(response.into_body()).await;
        assert!(!body.id.is_nil());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_is_409() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists_by_email().returning(|_| Ok(true));

        let response = router(UserService::new(mock_repo))
            .oneshot(json_request(
                "POST",
                "/",
                json!({ "email": "ada@example.com", "name": "Ada" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_create_user_invalid_email_is_400() {
        let response = router(UserService::new(MockUserRepository::new()))
            .oneshot(json_request(
                "POST",
                "/",
                json!({ "email": "not-an-email", "name": "Ada" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let user = sample_user();
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_email()
            .withf(|email| email == "ada@example.com")
            .returning(move |_| Ok(Some(user.clone())));

        let response = router(UserService::new(mock_repo))
            .oneshot(
                Request::get("/email/ada@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: User = json_body(response.into_body()).await;
        assert_eq!(body.name, "Ada");
    }

    #[tokio::test]
    async fn test_list_users_parses_flag_filters() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_count()
            .withf(|filter| filter.is_staff == Some(true) && filter.is_active.is_none())
            .returning(|_| Ok(3));
        mock_repo
            .expect_list()
            .withf(|_, page| {
                page.sort_document(None) == Some(mongodb::bson::doc! { "email": -1 })
            })
            .returning(|_, _| Ok(vec![]));

        let response = router(UserService::new(mock_repo))
            .oneshot(
                Request::get("/?is_staff=true&sort_by=email&sort_order=desc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page: UserPage = json_body(response.into_body()).await;
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn test_list_purchases_rejects_unknown_sort_key() {
        let response = router(UserService::new(MockUserRepository::new()))
            .oneshot(
                Request::get(format!("/{}/purchases?sort_by=email", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_purchases_returns_items_page() {
        let mut user = sample_user();
        user.purchased_products = vec![Uuid::now_v7()];
        let id = user.id;

        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo.expect_purchased_products().returning(|_, page| {
            Ok(PurchasedProductsPage {
                total: 1,
                ..PurchasedProductsPage::empty(&page)
            })
        });

        let response = router(UserService::new(mock_repo))
            .oneshot(
                Request::get(format!("/{}/purchases?page=1&limit=5", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["limit"], 5);
        assert!(body["items"].is_array());
    }

    #[tokio::test]
    async fn test_add_purchase_is_idempotent() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_add_purchase()
            .times(2)
            .returning(|_, _| Ok(true));

        let app = purchases_router(UserService::new(mock_repo));
        let body = json!({ "user_id": Uuid::now_v7(), "product_id": Uuid::now_v7() });

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/", body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let message: MessageResponse = json_body(response.into_body()).await;
            assert_eq!(message.message, "Product added to purchases");
        }
    }

    #[tokio::test]
    async fn test_remove_purchase_for_missing_user_is_404() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_remove_purchase()
            .returning(|_, _| Ok(false));

        let response = purchases_router(UserService::new(mock_repo))
            .oneshot(json_request(
                "DELETE",
                "/",
                json!({ "user_id": Uuid::now_v7(), "product_id": Uuid::now_v7() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
