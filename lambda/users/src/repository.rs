//! User operations on top of a [`UserStore`].
//!
//! Each operation is a single linear sequence: decode, validate, one lookup
//! at most, one write. Nothing is retried.

use lambda_http::tracing::debug;

use crate::error::{Malformed, UserError};
use crate::record::{from_item, to_item};
use crate::store::{PutCondition, StoreError, UserStore};
use crate::user::User;
use crate::validators::is_email_valid;

pub struct UserRepository<S> {
    store: S,
}

impl<S: UserStore> UserRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Point lookup. A missing record is `Ok(None)`, not an error.
    pub async fn fetch_user(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!(email, "fetching user");
        let item = self
            .store
            .get_item(email)
            .await
            .map_err(UserError::FetchFailed)?;

        item.map(|item| from_item(&item))
            .transpose()
            .map_err(|e| UserError::UnmarshalFailed(Malformed::Record(e)))
    }

    pub async fn fetch_all_users(&self) -> Result<Vec<User>, UserError> {
        let items = self.store.scan().await.map_err(UserError::FetchFailed)?;

        items
            .iter()
            .map(from_item::<User>)
            .collect::<Result<Vec<User>, _>>()
            .map_err(|e| UserError::UnmarshalFailed(Malformed::Record(e)))
    }

    pub async fn create_user(&self, body: &[u8]) -> Result<User, UserError> {
        let user: User = serde_json::from_slice(body).map_err(UserError::InvalidUserData)?;

        if !is_email_valid(&user.email) {
            return Err(UserError::InvalidEmail);
        }

        if self.fetch_user(&user.email).await?.is_some() {
            return Err(UserError::UserAlreadyExists);
        }

        let item = to_item(&user).map_err(UserError::MarshalFailed)?;

        // The conditional put catches a create that raced past the lookup.
        match self.store.put_item(item, PutCondition::IfAbsent).await {
            Ok(()) => Ok(user),
            Err(StoreError::ConditionFailed) => Err(UserError::UserAlreadyExists),
            Err(e) => Err(UserError::PutFailed(e)),
        }
    }

    /// Full overwrite of an existing user, keyed by the body's email.
    pub async fn update_user(&self, body: &[u8]) -> Result<User, UserError> {
        let user: User = serde_json::from_slice(body)
            .map_err(|e| UserError::UnmarshalFailed(Malformed::Body(e)))?;

        if !is_email_valid(&user.email) {
            return Err(UserError::InvalidEmail);
        }

        if self.fetch_user(&user.email).await?.is_none() {
            return Err(UserError::UserDoesNotExist);
        }

        let item = to_item(&user).map_err(UserError::MarshalFailed)?;

        match self.store.put_item(item, PutCondition::IfPresent).await {
            Ok(()) => Ok(user),
            Err(StoreError::ConditionFailed) => Err(UserError::UserDoesNotExist),
            Err(e) => Err(UserError::UpdateFailed(e)),
        }
    }

    pub async fn delete_user(&self, email: &str) -> Result<(), UserError> {
        self.store
            .delete_item(email)
            .await
            .map_err(UserError::DeleteFailed)
    }
}
