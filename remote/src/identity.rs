//! Email/password accounts over the identity REST API.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use votegate_identity::{IdentityError, IdentityStore};
use votegate_types::{Credential, Identity};

use crate::{HttpClient, RemoteError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
}

/// `POST {base}/accounts:signUp` and `POST {base}/accounts:signInWithPassword`.
///
/// The account's `localId` is used as the [`Identity`].
pub struct RestIdentityStore {
    client: HttpClient,
    api_key: String,
}

impl RestIdentityStore {
    pub fn new(client: HttpClient, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    async fn call(&self, action: &str, credential: &Credential) -> Result<Identity, RemoteError> {
        let mut request = self
            .client
            .request(Method::POST, &format!("accounts:{action}"))
            .json(&PasswordRequest {
                email: &credential.email,
                password: &credential.password,
                return_secure_token: true,
            });
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())]);
        }
        let response = self.client.send(request).await?;
        let account: AccountResponse = HttpClient::json(response).await?;
        Identity::new(account.local_id).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl IdentityStore for RestIdentityStore {
    fn name(&self) -> &str {
        "rest-identity"
    }

    async fn authenticate(&self, credential: &Credential) -> Result<Identity, IdentityError> {
        Ok(self.call("signInWithPassword", credential).await?)
    }

    async fn create_identity(&self, credential: &Credential) -> Result<Identity, IdentityError> {
        let identity = self.call("signUp", credential).await?;
        tracing::info!(%identity, "identity created");
        Ok(identity)
    }
}
