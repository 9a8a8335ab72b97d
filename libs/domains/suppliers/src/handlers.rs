//! HTTP handlers for Suppliers API

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

use crate::error::{SupplierError, SupplierResult};
use crate::models::{
    CreateSupplier, Supplier, SupplierPage, SupplierQuery, SupplierSortField, UpdateSupplier,
};
use crate::repository::SupplierRepository;
use crate::service::SupplierService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_suppliers,
        create_supplier,
        get_supplier,
        update_supplier,
        delete_supplier,
    ),
    components(
        schemas(
            Supplier, CreateSupplier, UpdateSupplier, SupplierPage, SupplierSortField,
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
        (name = "Suppliers", description = "Supplier management endpoints")
    )
)]
pub struct ApiDoc;

pub fn router<R: SupplierRepository + 'static>(service: SupplierService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .with_state(shared_service)
}

/// List suppliers
#[utoipa::path(
    get,
    path = "",
    tag = "Suppliers",
    params(SupplierQuery),
    responses(
        (status = 200, description = "One page of suppliers", body = SupplierPage),
        (status = 400, response = BadRequestQueryResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_suppliers<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ValidatedQuery(query): ValidatedQuery<SupplierQuery>,
) -> SupplierResult<Json<SupplierPage>> {
    Ok(Json(service.list_suppliers(query).await?))
}

/// Create a new supplier
#[utoipa::path(
    post,
    path = "",
    tag = "Suppliers",
    request_body = CreateSupplier,
    responses(
        (status = 201, description = "Supplier created", body = CreatedResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateSupplier>,
) -> SupplierResult<impl IntoResponse> {
    let supplier = service.create_supplier(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse::new(supplier.id))))
}

/// Get a supplier by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Suppliers",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier found", body = Supplier),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    UuidPath(id): UuidPath,
) -> SupplierResult<Json<Supplier>> {
    Ok(Json(service.get_supplier(id).await?))
}

/// Update a supplier
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Suppliers",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    request_body = UpdateSupplier,
    responses(
        (status = 200, description = "Supplier updated", body = Supplier),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateSupplier>,
) -> SupplierResult<Json<Supplier>> {
    Ok(Json(service.update_supplier(id, input).await?))
}

/// Delete a supplier
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Suppliers",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    UuidPath(id): UuidPath,
) -> SupplierResult<Json<MessageResponse>> {
    if !service.delete_supplier(id).await? {
        return Err(SupplierError::NotFound(id));
    }
    Ok(Json(MessageResponse::new("Supplier deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SupplierDocument;
    use crate::repository::MockSupplierRepository;
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

    #[tokio::test]
    async fn test_create_supplier_returns_201() {
        let mut mock_repo = MockSupplierRepository::new();
        mock_repo
            .expect_create()
            .returning(|input| Ok(SupplierDocument::new(input).into()));

        let response = router(SupplierService::new(mock_repo))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "Acme", "contact_email": "sales@acme.example" })
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: CreatedResponse = json_body(response.into_body()).await;
        assert!(!body.id.is_nil());
    }

    #[tokio::test]
    async fn test_create_supplier_rejects_bad_email() {
        let response = router(SupplierService::new(MockSupplierRepository::new()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "Acme", "contact_email": "nope" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response.into_body()).await;
        assert!(body["details"]["contact_email"].is_array());
    }

    #[tokio::test]
    async fn test_list_suppliers_filters_by_name() {
        let mut mock_repo = MockSupplierRepository::new();
        mock_repo
            .expect_count()
            .withf(|filter| filter.name.as_deref() == Some("Acme"))
            .returning(|_| Ok(0));
        mock_repo.expect_list().returning(|_, _| Ok(vec![]));

        let response = router(SupplierService::new(mock_repo))
            .oneshot(Request::get("/?name=Acme").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let page: SupplierPage = json_body(response.into_body()).await;
        assert_eq!((page.total, page.page, page.limit), (0, 1, 10));
    }

    #[tokio::test]
    async fn test_delete_missing_supplier_is_404() {
        let mut mock_repo = MockSupplierRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let response = router(SupplierService::new(mock_repo))
            .oneshot(
                Request::delete(format!("/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
