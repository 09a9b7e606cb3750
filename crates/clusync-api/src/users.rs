// Local user and identity mapping endpoints

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;
use crate::models::{User, UserSpec};

#[derive(Serialize)]
struct NewUser<'a> {
    #[serde(flatten)]
    spec: &'a UserSpec,
    password: &'a str,
}

#[derive(Serialize)]
struct UserUpdate<'a> {
    id: &'a str,
    #[serde(flatten)]
    spec: &'a UserSpec,
}

impl ClusterClient {
    /// `GET /v1/users/`
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        let url = self.endpoint(&["v1", "users", ""])?;
        self.get(url).await
    }

    /// Create a local user with an initial password.
    ///
    /// `POST /v1/users/`
    pub async fn add_user(&self, spec: &UserSpec, password: &SecretString) -> Result<User, Error> {
        let url = self.endpoint(&["v1", "users", ""])?;
        debug!(name = %spec.name, "adding user");
        let body = NewUser {
            spec,
            password: password.expose_secret(),
        };
        self.post(url, &body).await
    }

    /// Replace a user's attributes. The password is left untouched.
    ///
    /// `PUT /v1/users/{id}`
    pub async fn modify_user(&self, id: &str, spec: &UserSpec) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "users", id])?;
        debug!(id, name = %spec.name, "modifying user");
        self.put_no_response(url, &UserUpdate { id, spec }).await
    }

    /// User-defined identity mappings, carried as an opaque document.
    ///
    /// `GET /v1/auth/user-defined-mappings/`
    pub async fn get_user_mappings(&self) -> Result<Value, Error> {
        let url = self.endpoint(&["v1", "auth", "user-defined-mappings", ""])?;
        self.get(url).await
    }

    /// `PUT /v1/auth/user-defined-mappings/`
    pub async fn set_user_mappings(&self, mappings: &Value) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "auth", "user-defined-mappings", ""])?;
        debug!("replacing user-defined mappings");
        self.put_no_response(url, mappings).await
    }
}
