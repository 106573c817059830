//! User registration and profile management.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User};
use crate::repositories::UserRepository;
use crate::services::non_blank;

/// Business rules for users on top of a [`UserRepository`].
///
/// Cloning only bumps the repository's reference count.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Registers a user. A missing name falls back to the email.
    ///
    /// # Arguments
    /// * `name` - Display name, optional
    /// * `email` - Contact email, required and unique
    ///
    /// # Returns
    /// The stored user, or `Duplicate` when the email is taken
    pub async fn create_user(&self, name: Option<String>, email: Option<String>) -> AppResult<User> {
        let email = non_blank(email).ok_or_else(|| AppError::bad_request("Email is required."))?;

        if self.repo.find_by_email(&email).await?.is_some() {
            tracing::debug!(email = %email, "Rejected signup with taken email");
            return Err(AppError::duplicate("users", "email", email));
        }

        let name = name.unwrap_or_else(|| email.clone());
        let user = self.repo.create(NewUser { name, email }).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// Gets a user by id.
    ///
    /// # Returns
    /// The user if found, or `NotFound` error
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", id, "User not found."))
    }

    /// Lists all users ordered by id.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    /// Applies the non-blank fields that differ from the stored values.
    ///
    /// # Arguments
    /// * `id` - The user's id
    /// * `patch` - Optional name and email; blank values are ignored
    ///
    /// # Returns
    /// The updated user, or the current one unchanged when nothing differs.
    /// An email held by another user yields `Duplicate`.
    pub async fn update_user(&self, id: i64, patch: UpdateUser) -> AppResult<User> {
        if patch.is_empty() {
            return Err(AppError::bad_request("No fields to update provided."));
        }
        let user = self.get_user(id).await?;

        let mut changes = UpdateUser::default();
        if let Some(name) = non_blank(patch.name).filter(|n| *n != user.name) {
            changes.name = Some(name);
        }
        if let Some(email) = non_blank(patch.email).filter(|e| *e != user.email) {
            if let Some(holder) = self.repo.find_by_email(&email).await? {
                if holder.id != id {
                    return Err(AppError::duplicate("users", "email", email));
                }
            }
            changes.email = Some(email);
        }

        if changes.is_empty() {
            return Ok(user);
        }
        let updated = self.repo.update(id, changes).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    /// Removes a user. Unknown ids are a bad request, not a 404.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        if id == 0 {
            return Err(AppError::bad_request("Id can't be 0"));
        }
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::bad_request("User doesn't exist"));
        }
        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
