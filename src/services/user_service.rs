use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::User,
    models::dto::request::CreateUserRequest,
    repositories::UserRepository,
};

/// Identity provisioning. No passwords or sessions live here; tokens are
/// minted by the identity provider, this service only keeps the records the
/// engine resolves players against.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<User> {
        request.validate()?;
        self.repository.create(User::from_request(request)).await
    }

    pub async fn user_by_username(&self, username: &str) -> AppResult<User> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }
}
