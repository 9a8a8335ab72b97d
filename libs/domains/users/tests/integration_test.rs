//! Integration tests for the Users domain
//!
//! Real MongoDB via testcontainers. Covers the unique email index, purchase
//! set semantics and the purchased-products join.
//!
//! Run with `cargo test -p domain_users -- --ignored`.

use domain_products::{
    CreateProduct, MongoProductRepository, Product, ProductRepository, ProductSortField,
};
use domain_users::*;
use ::mongodb::Database;
use pagination::{PageRequest, SortOrder};
use test_utils::{TestDataBuilder, TestMongo, assertions::*};
use uuid::Uuid;

fn new_user(builder: &TestDataBuilder, local: &str) -> CreateUser {
    CreateUser {
        email: builder.email(local),
        name: builder.name("user", local),
        status: true,
        is_active: true,
        is_staff: false,
        is_superuser: false,
    }
}

async fn product(db: &Database, name: String, cost_price: f64) -> Product {
    MongoProductRepository::new(db)
        .create(CreateProduct {
            name,
            description: String::new(),
            cost_price,
            profit_margin: None,
            quantity: 1,
            supplier_id: Uuid::now_v7(),
        })
        .await
        .unwrap()
}

async fn repository(db: &Database) -> MongoUserRepository {
    let repo = MongoUserRepository::new(db);
    repo.init_indexes().await.unwrap();
    repo
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_email_rejected_by_index() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("users_duplicate_email");
    let repo = repository(&mongo.database(&builder.database_name())).await;

    repo.create(new_user(&builder, "ada")).await.unwrap();
    let result = repo.create(new_user(&builder, "ada")).await;

    assert!(
        matches!(result, Err(UserError::DuplicateEmail(_))),
        "Expected DuplicateEmail error, got {:?}",
        result
    );
    assert!(repo.exists_by_email(&builder.email("ada")).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_add_purchase_twice_equals_once() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("users_add_twice");
    let db = mongo.database(&builder.database_name());
    let repo = repository(&db).await;

    let user = repo.create(new_user(&builder, "ada")).await.unwrap();
    let lamp = product(&db, builder.name("product", "lamp"), 25.0).await;

    assert!(repo.add_purchase(user.id, lamp.id).await.unwrap());
    assert!(repo.add_purchase(user.id, lamp.id).await.unwrap());

    let stored = assert_some(repo.get_by_id(user.id).await.unwrap(), "user should exist");
    assert_eq!(stored.purchased_products, vec![lamp.id]);

    assert!(repo.remove_purchase(user.id, lamp.id).await.unwrap());
    assert!(repo.remove_purchase(user.id, lamp.id).await.unwrap());
    assert!(!repo.add_purchase(Uuid::now_v7(), lamp.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_join_drops_deleted_products() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("users_join_dangling");
    let db = mongo.database(&builder.database_name());
    let repo = repository(&db).await;
    let products = MongoProductRepository::new(&db);

    let user = repo.create(new_user(&builder, "ada")).await.unwrap();
    let a = product(&db, builder.name("product", "a"), 25.0).await;
    let b = product(&db, builder.name("product", "b"), 10.0).await;
    repo.add_purchase(user.id, a.id).await.unwrap();
    repo.add_purchase(user.id, b.id).await.unwrap();

    assert!(products.delete(b.id).await.unwrap());

    let page = repo
        .purchased_products(user.id, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_uuid_eq(page.items[0].id, a.id, "remaining purchase");
    assert_close(page.items[0].price, 30.0, "price");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_join_sorts_and_windows() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("users_join_window");
    let db = mongo.database(&builder.database_name());
    let repo = repository(&db).await;

    let user = repo.create(new_user(&builder, "ada")).await.unwrap();
    for (suffix, cost) in [("a", 5.0), ("b", 15.0), ("c", 10.0)] {
        let p = product(&db, builder.name("product", suffix), cost).await;
        repo.add_purchase(user.id, p.id).await.unwrap();
    }

    let page = PageRequest::new(1, 2)
        .unwrap()
        .with_sort(ProductSortField::CostPrice.to_string(), SortOrder::Desc);
    let result = repo.purchased_products(user.id, page).await.unwrap();

    assert_eq!(result.total, 3, "total counts every joined purchase");
    let costs: Vec<f64> = result.items.iter().map(|p| p.cost_price).collect();
    assert_eq!(costs, vec![15.0, 10.0]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_does_not_drop_purchases() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("users_update_keeps_purchases");
    let db = mongo.database(&builder.database_name());
    let repo = repository(&db).await;

    let user = repo.create(new_user(&builder, "ada")).await.unwrap();
    let lamp = product(&db, builder.name("product", "lamp"), 25.0).await;
    repo.add_purchase(user.id, lamp.id).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                name: Some("X".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "X");
    assert_eq!(updated.email, user.email);
    assert!(updated.updated_at > user.updated_at);
    assert_eq!(updated.purchased_products, vec![lamp.id]);
}
