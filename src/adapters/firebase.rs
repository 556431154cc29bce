use crate::domain::model::AuthUser;
use crate::domain::ports::{AuthBackend, AuthError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    id_token: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Firebase Identity Toolkit REST API 的驗證後端
pub struct FirebaseAuthBackend {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl FirebaseAuthBackend {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/v1/accounts:{}", self.endpoint, method);
        tracing::debug!("Auth request: accounts:{}", method);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !status.is_success() {
            // 錯誤格式：{"error": {"code": 400, "message": "EMAIL_EXISTS"}}
            return Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => AuthError::Backend {
                    code: envelope.error.message.clone(),
                    message: envelope.error.message,
                },
                Err(_) => AuthError::Backend {
                    code: status.as_u16().to_string(),
                    message: text,
                },
            });
        }

        serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))
    }

    async fn lookup(&self, id_token: &str) -> Result<LookupUser, AuthError> {
        let response: LookupResponse = self.call("lookup", &LookupRequest { id_token }).await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::Decode("lookup returned no users".to_string()))
    }
}

#[async_trait]
impl AuthBackend for FirebaseAuthBackend {
    async fn create_account(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let token: TokenResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        Ok(AuthUser {
            uid: token.local_id,
            email: if token.email.is_empty() {
                email.to_string()
            } else {
                token.email
            },
            email_verified: false,
            id_token: token.id_token,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let token: TokenResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        // signInWithPassword 不回傳驗證狀態
        let user = self.lookup(&token.id_token).await?;
        Ok(AuthUser {
            uid: user.local_id,
            email: user.email,
            email_verified: user.email_verified,
            id_token: token.id_token,
        })
    }

    async fn send_verification_email(&self, user: &AuthUser) -> Result<(), AuthError> {
        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "VERIFY_EMAIL",
                    id_token: &user.id_token,
                },
            )
            .await?;
        tracing::info!("Verification email sent to {}", user.email);
        Ok(())
    }

    async fn reload_user(&self, user: &AuthUser) -> Result<AuthUser, AuthError> {
        let fresh = self.lookup(&user.id_token).await?;
        Ok(AuthUser {
            uid: fresh.local_id,
            email: fresh.email,
            email_verified: fresh.email_verified,
            id_token: user.id_token.clone(),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // REST API 沒有伺服器端登出，只需丟棄 token
        Ok(())
    }
}
