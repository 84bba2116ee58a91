//! The registry credential entity.

use crate::error::{RegvaultError, Result};
use serde::{Deserialize, Serialize};

/// Credentials a repository's pipeline uses to pull from an image registry.
///
/// Optional fields use the empty string for "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Store-assigned identifier. `None` until the registry is created.
    #[serde(default)]
    pub id: Option<i64>,
    pub repo_id: i64,
    pub address: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
}

impl Registry {
    /// Create an unsaved registry for a repository and address.
    pub fn new(repo_id: i64, address: impl Into<String>) -> Self {
        Self {
            repo_id,
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Check the fields the store requires.
    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(RegvaultError::validation(
                "address",
                "registry address must not be empty",
            ));
        }
        Ok(())
    }

    /// Copy with `password` and `token` cleared.
    pub fn redacted(&self) -> Self {
        Self {
            password: String::new(),
            token: String::new(),
            ..self.clone()
        }
    }
}
