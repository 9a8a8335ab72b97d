//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    CreatedResponse, MessageResponse, UuidPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestQueryResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, Product, ProductPage, ProductQuery, ProductSortField, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, CreateProduct, UpdateProduct, ProductPage, ProductSortField,
            CreatedResponse, MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestQueryResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints")
    )
)]
pub struct ApiDoc;

/// Products router; nest it under `/products`
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products with pagination, sorting and filters
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedQuery(query): ValidatedQuery<ProductQuery>,
) -> ProductResult<Json<ProductPage>> {
    let page = service.list_products(query).await?;
    Ok(Json(page))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = CreatedResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(product.id))))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Update the supplied fields of a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<MessageResponse>> {
    if !service.delete_product(id).await? {
        return Err(ProductError::NotFound(id));
    }
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductDocument;
    use crate::repository::MockProductRepository;
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

    fn app(mock_repo: MockProductRepository) -> Router {
        router(ProductService::new(mock_repo))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn lamp(input: CreateProduct) -> Product {
        ProductDocument::new(input).into()
    }

    #[tokio::test]
    async fn test_create_product_returns_201_with_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .returning(|input| Ok(lamp(input)));

        let response = app(mock_repo)
            .oneshot(post_json(
                "/",
                json!({
                    "name": "Desk Lamp",
                    "description": "Adjustable arm",
                    "cost_price": 25.00,
                    "quantity": 100,
                    "supplier_id": Uuid::now_v7()
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = json_body(response.into_body()).await;
        assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_create_product_rejects_non_positive_cost() {
        let response = app(MockProductRepository::new())
            .oneshot(post_json(
                "/",
                json!({
                    "name": "Desk Lamp",
                    "cost_price": 0,
                    "quantity": 1,
                    "supplier_id": Uuid::now_v7()
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_product_includes_computed_price() {
        let product = lamp(CreateProduct {
            name: "Desk Lamp".to_string(),
            description: String::new(),
            cost_price: 25.00,
            profit_margin: Some(0.20),
            quantity: 100,
            supplier_id: Uuid::now_v7(),
        });
        let id = product.id;

        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));

        let response = app(mock_repo)
            .oneshot(
                Request::get(format!("/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["id"], id.to_string());
        assert!((body["price"].as_f64().unwrap() - 30.00).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_get_product_with_malformed_id_is_404() {
        let response = app(MockProductRepository::new())
            .oneshot(Request::get("/not-an-id").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_products_parses_query() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_count().returning(|_| Ok(42));
        mock_repo
            .expect_list()
            .withf(|filter, page| {
                filter.cost_price.min == Some(10.0)
                    && filter.cost_price.max == Some(20.0)
                    && page.page() == 2
                    && page.limit() == 5
            })
            .returning(|_, _| Ok(vec![]));

        let response = app(mock_repo)
            .oneshot(
                Request::get("/?page=2&limit=5&min_price=10&max_price=20&sort_by=cost_price&sort_order=desc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page: ProductPage = json_body(response.into_body()).await;
        assert_eq!(page.total, 42);
        assert_eq!((page.page, page.limit), (2, 5));
        assert!(page.products.is_empty());
    }

    #[tokio::test]
    async fn test_list_products_rejects_bad_pagination() {
        for uri in [
            "/?page=0",
            "/?page=18446744073709551615",
            "/?limit=0",
            "/?limit=101",
            "/?page=abc",
            "/?sort_by=price",
        ] {
            let response = app(MockProductRepository::new())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_update_missing_product_is_404() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .returning(|id, _| Err(ProductError::NotFound(id)));

        let response = app(mock_repo)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/{}", Uuid::now_v7()))
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "name": "X" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_product_maps_false_to_404() {
        let mut mock_repo = MockProductRepository::new();
        let mut deleted = false;
        mock_repo.expect_delete().times(2).returning(move |_| {
            let first = !deleted;
            deleted = true;
            Ok(first)
        });

        let app = app(mock_repo);
        let id = Uuid::now_v7();

        let response = app
            .clone()
            .oneshot(Request::delete(format!("/{}", id)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: MessageResponse = json_body(response.into_body()).await;
        assert_eq!(body.message, "Product deleted successfully");

        let response = app
            .oneshot(Request::delete(format!("/{}", id)).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_unavailable_is_503() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|_| Err(ProductError::StoreUnavailable("server selection timeout".into())));

        let response = app(mock_repo)
            .oneshot(
                Request::get(format!("/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
