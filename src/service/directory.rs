//! User lookup seam.
//!
//! Handlers read users through [`UserDirectory`] so a real store can be
//! injected later without touching the adapter. The shipped
//! [`StaticUserDirectory`] serves fixed placeholder data.

use serde::Serialize;
use thiserror::Error;

use crate::error::HandlerError;

/// A user record as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
}

/// Failure reported by a directory backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),

    #[error("user directory lookup failed: {0}")]
    Lookup(String),
}

impl From<DirectoryError> for HandlerError {
    fn from(err: DirectoryError) -> Self {
        HandlerError::new(err.to_string())
    }
}

/// Synchronous user lookup.
pub trait UserDirectory: Send + Sync {
    /// Ids of every known user.
    fn list_user_ids(&self) -> Result<Vec<String>, DirectoryError>;

    /// A single user, or `None` if the id is unknown.
    fn find_user(&self, user_id: &str) -> Result<Option<User>, DirectoryError>;
}

/// Placeholder directory: a fixed id list, and any id resolves to a
/// synthesized user.
#[derive(Debug, Clone)]
pub struct StaticUserDirectory {
    ids: Vec<String>,
}

impl StaticUserDirectory {
    pub fn new(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticUserDirectory {
    fn default() -> Self {
        Self::new(["123", "456"])
    }
}

impl UserDirectory for StaticUserDirectory {
    fn list_user_ids(&self) -> Result<Vec<String>, DirectoryError> {
        Ok(self.ids.clone())
    }

    fn find_user(&self, user_id: &str) -> Result<Option<User>, DirectoryError> {
        Ok(Some(User {
            user_id: user_id.to_string(),
            name: format!("User {}", user_id),
        }))
    }
}
