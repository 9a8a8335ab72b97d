//! Shared test utilities for the store domains
//!
//! - `TestMongo`: disposable MongoDB container (feature: "mongo")
//! - `TestDataBuilder`: per-test ids, names, emails and database names
//! - `assertions`: assertion helpers with readable failure messages
//!
//! Store-backed tests start Docker containers, so they are marked
//! `#[ignore]` and run with `cargo test -- --ignored`.
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!     let db = mongo.database(&builder.database_name());
//!     let email = builder.email("buyer");
//! }
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Deterministic test data keyed by a seed.
///
/// Two builders created from the same test name produce the same values, so
/// failures reproduce; different test names do not collide.
#[derive(Debug, Clone, Copy)]
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from a hash of the test name
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Stable id for `label` within this test, e.g. `builder.id("supplier")`
    pub fn id(&self, label: &str) -> Uuid {
        let mut hasher = DefaultHasher::new();
        (self.seed, label).hash(&mut hasher);

        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.seed.to_be_bytes());
        bytes[8..].copy_from_slice(&hasher.finish().to_be_bytes());
        Uuid::from_bytes(bytes)
    }

    /// `test-<kind>-<seed>-<label>`, e.g. `builder.name("product", "lamp")`
    pub fn name(&self, kind: &str, label: &str) -> String {
        format!("test-{}-{}-{}", kind, self.seed, label)
    }

    /// Unique, syntactically valid email address
    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@example.com", local, self.seed)
    }

    /// Database name private to this test (MongoDB limits names to 63 bytes)
    pub fn database_name(&self) -> String {
        format!("test_{:x}", self.seed)
    }
}

pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Unwrap `value`, failing with `context` when it is `None`
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Float equality within 1e-9, for derived prices
    pub fn assert_close(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{}: expected {}, got {}",
            context,
            expected,
            actual
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_test_name_same_data() {
        let a = TestDataBuilder::from_test_name("products_list");
        let b = TestDataBuilder::from_test_name("products_list");

        assert_eq!(a.id("supplier"), b.id("supplier"));
        assert_eq!(a.database_name(), b.database_name());
        assert_eq!(a.name("product", "lamp"), b.name("product", "lamp"));
    }

    #[test]
    fn test_labels_and_tests_do_not_collide() {
        let a = TestDataBuilder::from_test_name("users_join");
        let b = TestDataBuilder::from_test_name("users_update");

        assert_ne!(a.id("supplier"), a.id("other"));
        assert_ne!(a.id("supplier"), b.id("supplier"));
        assert_ne!(a.database_name(), b.database_name());
    }

    #[test]
    fn test_email_shape() {
        let builder = TestDataBuilder::new(7);
        assert_eq!(builder.email("buyer"), "buyer-7@example.com");
        assert_eq!(builder.database_name(), "test_7");
    }

    #[test]
    #[should_panic(expected = "price")]
    fn test_assert_close_reports_context() {
        assertions::assert_close(30.0, 31.0, "price");
    }
}
