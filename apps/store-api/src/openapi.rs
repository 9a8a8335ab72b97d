//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store API",
        version = "0.1.0",
        description = "Products, users, suppliers and purchases over MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/products", api = domain_products::ApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/purchases", api = domain_users::PurchasesApiDoc),
        (path = "/api/suppliers", api = domain_suppliers::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints"),
        (name = "Users", description = "User management endpoints"),
        (name = "Purchases", description = "Purchase membership endpoints"),
        (name = "Suppliers", description = "Supplier management endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_nests_every_domain() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/products",
            "/api/products/{id}",
            "/api/users/{id}/purchases",
            "/api/users/email/{email}",
            "/api/purchases",
            "/api/suppliers/{id}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }
}
