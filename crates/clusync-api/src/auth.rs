// Session authentication
//
// The cluster issues a bearer token from `POST /v1/session/login`; the
// token is held by the client and attached to every later request.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::ClusterClient;
use crate::error::Error;

#[derive(Deserialize)]
struct LoginResponse {
    bearer_token: String,
}

impl ClusterClient {
    /// Authenticate with username/password and store the session token.
    ///
    /// `POST /v1/session/login` with `{"username": "...", "password": "..."}`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.endpoint(&["v1", "session", "login"])?;
        debug!(username, "logging in at {url}");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            self.clear_bearer_token();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let login: LoginResponse = resp.json().await.map_err(|e| Error::Authentication {
            message: format!("login response carried no bearer token: {e}"),
        })?;
        self.set_bearer_token(SecretString::from(login.bearer_token));

        debug!("login successful");
        Ok(())
    }
}
