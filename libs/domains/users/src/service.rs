use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, PurchaseRequest, PurchasedProductsPage, PurchasesQuery, UpdateUser, User,
    UserPage, UserQuery,
};
use crate::repository::UserRepository;

/// Service layer for user and purchase business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a user; the email must not be taken
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        if self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> UserResult<User> {
        self.repository
            .get_by_email(email)
            .await?
            .ok_or_else(|| UserError::EmailNotFound(email.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, query: UserQuery) -> UserResult<UserPage> {
        let (filter, page) = query.into_parts()?;

        let total = self.repository.count(filter.clone()).await?;
        let users = self.repository.list(filter, page.clone()).await?;

        Ok(UserPage {
            total,
            page: page.page(),
            limit: page.limit(),
            users,
        })
    }

    /// Update a user; changing the email checks it is not taken
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        if let Some(ref new_email) = input.email {
            let current = self.get_user(id).await?;
            if *new_email != current.email && self.repository.exists_by_email(new_email).await? {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        self.repository.update(id, input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<bool> {
        self.repository.delete(id).await
    }

    /// Record a purchase; repeating it changes nothing
    #[instrument(skip(self))]
    pub async fn add_purchase(&self, request: PurchaseRequest) -> UserResult<()> {
        if !self
            .repository
            .add_purchase(request.user_id, request.product_id)
            .await?
        {
            return Err(UserError::NotFound(request.user_id));
        }

        tracing::info!(
            user_id = %request.user_id,
            product_id = %request.product_id,
            "Purchase recorded"
        );
        Ok(())
    }

    /// Forget a purchase; removing an absent one changes nothing
    #[instrument(skip(self))]
    pub async fn remove_purchase(&self, request: PurchaseRequest) -> UserResult<()> {
        if !self
            .repository
            .remove_purchase(request.user_id, request.product_id)
            .await?
        {
            return Err(UserError::NotFound(request.user_id));
        }

        tracing::info!(
            user_id = %request.user_id,
            product_id = %request.product_id,
            "Purchase removed"
        );
        Ok(())
    }

    /// Page of products the user bought.
    ///
    /// An unknown user or an empty purchase set gives an empty page without
    /// running the join.
    #[instrument(skip(self))]
    pub async fn purchased_products(
        &self,
        user_id: Uuid,
        query: PurchasesQuery,
    ) -> UserResult<PurchasedProductsPage> {
        let page = query.into_page()?;

        match self.repository.get_by_id(user_id).await? {
            Some(user) if !user.purchased_products.is_empty() => {
                self.repository.purchased_products(user_id, page).await
            }
            _ => Ok(PurchasedProductsPage::empty(&page)),
        }
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
