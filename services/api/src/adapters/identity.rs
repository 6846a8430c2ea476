//! services/api/src/adapters/identity.rs
//!
//! This module contains the identity-provider adapter, the concrete
//! implementation of the `IdentityProvider` port against the managed
//! platform's Identity Toolkit REST API.

use async_trait::async_trait;
use serde_json::{json, Value};

use achameupet_core::ports::{AuthIdentity, IdentityProvider, PortError, PortResult};

const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

/// An identity adapter backed by the Identity Toolkit REST API. Token
/// verification and sign-up use the browser API key; claim updates require
/// the server-side bearer token.
#[derive(Clone)]
pub struct PlatformIdentity {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    project_id: String,
    token: Option<String>,
}

impl PlatformIdentity {
    pub fn new(
        client: reqwest::Client,
        project_id: &str,
        api_key: &str,
        token: Option<String>,
    ) -> Self {
        Self::with_endpoint(client, project_id, api_key, token, DEFAULT_ENDPOINT)
    }

    /// Points the adapter at a different endpoint (a local emulator).
    pub fn with_endpoint(
        client: reqwest::Client,
        project_id: &str,
        api_key: &str,
        token: Option<String>,
        endpoint: &str,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
            token,
        }
    }

    async fn post(&self, url: &str, body: Value, context: &str) -> PortResult<Value> {
        let mut req = self.client.post(url).json(&body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("{context}: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PortError::Unavailable(format!("{context}: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Unavailable(format!("{context}: {status} {body}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| PortError::Unavailable(format!("{context}: bad response body: {e}")))
    }

    /// Identity-toolkit errors carry a machine-readable `error.message` code.
    fn error_code(body: &str) -> Option<String> {
        serde_json::from_str::<Value>(body)
            .ok()?
            .get("error")?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

#[async_trait]
impl IdentityProvider for PlatformIdentity {
    async fn verify_token(&self, token: &str) -> PortResult<AuthIdentity> {
        let url = format!("{}/accounts:lookup?key={}", self.endpoint, self.api_key);
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "idToken": token }))
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("token lookup: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PortError::Unavailable(format!("token lookup: {e}")))?;
        if !status.is_success() {
            // The toolkit rejects bad and expired tokens with a 400.
            let code = Self::error_code(&body).unwrap_or_else(|| status.to_string());
            return Err(PortError::InvalidToken(code));
        }

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| PortError::Unavailable(format!("token lookup: bad response body: {e}")))?;
        let account = payload
            .get("users")
            .and_then(Value::as_array)
            .and_then(|users| users.first())
            .ok_or_else(|| PortError::InvalidToken("token matches no account".to_string()))?;

        let subject_id = account
            .get("localId")
            .and_then(Value::as_str)
            .ok_or_else(|| PortError::InvalidToken("account has no subject id".to_string()))?
            .to_string();

        // Custom claims are stored as a serialized JSON object.
        let claims = account
            .get("customAttributes")
            .and_then(Value::as_str)
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();

        let phone = claims
            .get("whatsapp")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| {
                account
                    .get("phoneNumber")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });

        Ok(AuthIdentity {
            subject_id,
            display_name: account
                .get("displayName")
                .and_then(Value::as_str)
                .map(str::to_string),
            phone,
            claims,
        })
    }

    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        photo_url: Option<&str>,
    ) -> PortResult<String> {
        let url = format!("{}/accounts:signUp?key={}", self.endpoint, self.api_key);
        let mut body = json!({
            "email": email,
            "password": password,
            "displayName": display_name,
            "returnSecureToken": false,
        });
        if let Some(photo) = photo_url {
            body["photoUrl"] = json!(photo);
        }

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unavailable(format!("sign up: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PortError::Unavailable(format!("sign up: {e}")))?;
        if !status.is_success() {
            return match Self::error_code(&text).as_deref() {
                Some("EMAIL_EXISTS") => Err(PortError::EmailInUse(email.to_string())),
                Some(code) => Err(PortError::Unavailable(format!("sign up: {code}"))),
                None => Err(PortError::Unavailable(format!("sign up: {status} {text}"))),
            };
        }

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| PortError::Unavailable(format!("sign up: bad response body: {e}")))?;
        payload
            .get("localId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PortError::Unavailable("sign up: no subject id returned".to_string()))
    }

    async fn set_claims(&self, subject_id: &str, claims: Value) -> PortResult<()> {
        let url = format!(
            "{}/projects/{}/accounts:update",
            self.endpoint, self.project_id
        );
        let body = json!({
            "localId": subject_id,
            "customAttributes": claims.to_string(),
        });
        self.post(&url, body, &format!("set claims for {subject_id}"))
            .await?;
        Ok(())
    }
}
