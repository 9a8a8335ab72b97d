//! Users Domain
//!
//! Users and their purchases. A purchase is not a record of its own: it is
//! the presence of a product id in the user's `purchased_products` set.
//! Listing purchases joins that set against the products collection in a
//! single aggregation.
//!
//! Two routers are exposed: [`handlers::router`] for `/users` and
//! [`handlers::purchases_router`] for `/purchases`.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, PurchasesApiDoc};
pub use models::{
    CreateUser, PurchaseRequest, PurchasedProductsPage, PurchasesQuery, UpdateUser, User,
    UserDocument, UserFilter, UserPage, UserQuery, UserSortField,
};
pub use self::mongodb::{
    MongoUserRepository, USERS_COLLECTION, parse_purchased_products, purchased_products_pipeline,
};
pub use repository::UserRepository;
pub use service::UserService;
