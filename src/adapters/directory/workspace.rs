//! Workspace directory adapter.
//!
//! Implements `DirectoryProvisioner` against a Google-Workspace-style admin
//! API: a refresh-token grant for a service token, then a JSON `POST` to the
//! users endpoint with that token as bearer auth.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::identity::AccessToken;
use crate::ports::{DirectoryAccount, DirectoryError, DirectoryProvisioner};

/// Default refresh-token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default account-creation endpoint.
pub const DEFAULT_USERS_URL: &str = "https://admin.googleapis.com/admin/directory/v1/users";

/// Configuration for the workspace directory adapter.
#[derive(Debug, Clone)]
pub struct WorkspaceDirectoryConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    pub token_url: String,
    pub users_url: String,
    /// Upper bound for each outbound request. Defaults to 15 seconds.
    pub timeout: Duration,
}

impl WorkspaceDirectoryConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        refresh_token: SecretString,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            refresh_token,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            users_url: DEFAULT_USERS_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_endpoints(mut self, token_url: impl Into<String>, users_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.users_url = users_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ServiceTokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountName<'a> {
    given_name: &'a str,
    family_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountPayload<'a> {
    primary_email: &'a str,
    password: &'a str,
    recovery_email: &'a str,
    name: AccountName<'a>,
}

impl<'a> From<&'a DirectoryAccount> for CreateAccountPayload<'a> {
    fn from(account: &'a DirectoryAccount) -> Self {
        Self {
            primary_email: &account.primary_email,
            password: account.password.expose_secret(),
            recovery_email: &account.recovery_email,
            name: AccountName {
                given_name: &account.given_name,
                family_name: &account.family_name,
            },
        }
    }
}

/// Directory provisioner backed by the workspace admin API.
pub struct WorkspaceDirectoryProvisioner {
    config: WorkspaceDirectoryConfig,
    http_client: reqwest::Client,
}

impl WorkspaceDirectoryProvisioner {
    pub fn new(config: WorkspaceDirectoryConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl DirectoryProvisioner for WorkspaceDirectoryProvisioner {
    async fn obtain_service_token(&self) -> Result<AccessToken, DirectoryError> {
        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("refresh_token", self.config.refresh_token.expose_secret()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Service token request failed: {}", e);
                DirectoryError::ServiceToken {
                    status: None,
                    detail: e.to_string(),
                }
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(status, detail = %detail, "Service token endpoint returned an error");
            return Err(DirectoryError::ServiceToken {
                status: Some(status),
                detail,
            });
        }

        let body: ServiceTokenResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse service token response: {}", e);
            DirectoryError::ServiceToken {
                status: Some(status),
                detail: format!("malformed token response: {e}"),
            }
        })?;

        match body.access_token {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(
                token,
                body.token_type.unwrap_or_else(|| "Bearer".to_string()),
            )),
            _ => {
                tracing::error!("Service token response has no access_token");
                Err(DirectoryError::ServiceToken {
                    status: Some(status),
                    detail: "access_token missing".to_string(),
                })
            }
        }
    }

    async fn create_account(
        &self,
        service_token: &AccessToken,
        account: &DirectoryAccount,
    ) -> Result<(), DirectoryError> {
        tracing::debug!(primary_email = %account.primary_email, "Creating directory account");

        let response = self
            .http_client
            .post(&self.config.users_url)
            .bearer_auth(service_token.expose())
            .json(&CreateAccountPayload::from(account))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Account creation request failed: {}", e);
                DirectoryError::AccountCreation {
                    status: None,
                    detail: e.to_string(),
                }
            })?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        tracing::error!(
            status,
            detail = %detail,
            primary_email = %account.primary_email,
            "Directory rejected account creation"
        );
        Err(DirectoryError::AccountCreation {
            status: Some(status),
            detail,
        })
    }
}

impl std::fmt::Debug for WorkspaceDirectoryProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceDirectoryProvisioner")
            .field("client_id", &self.config.client_id)
            .field("users_url", &self.config.users_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provisioner_for(server: &MockServer) -> WorkspaceDirectoryProvisioner {
        let config = WorkspaceDirectoryConfig::new(
            "dir-client",
            SecretString::new("dir-secret".to_string()),
            SecretString::new("refresh-1".to_string()),
        )
        .with_endpoints(
            format!("{}/token", server.uri()),
            format!("{}/admin/directory/v1/users", server.uri()),
        )
        .with_timeout(Duration::from_secs(2));
        WorkspaceDirectoryProvisioner::new(config).unwrap()
    }

    fn account() -> DirectoryAccount {
        DirectoryAccount {
            primary_email: "john.doe@students.polyu.edu.rs".to_string(),
            recovery_email: "john@example.com".to_string(),
            given_name: "John".to_string(),
            family_name: "Doe".to_string(),
            password: SecretString::new("aB3$efgh1JkL".to_string()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Service token
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn service_token_uses_refresh_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .and(body_string_contains("client_id=dir-client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "svc-1",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = provisioner_for(&server).obtain_service_token().await.unwrap();
        assert_eq!(token.expose(), "svc-1");
    }

    #[tokio::test]
    async fn service_token_without_access_token_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 10})))
            .mount(&server)
            .await;

        let err = provisioner_for(&server)
            .obtain_service_token()
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::ServiceToken { status: Some(200), .. }));
    }

    #[tokio::test]
    async fn service_token_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let err = provisioner_for(&server)
            .obtain_service_token()
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DirectoryError::ServiceToken {
                status: Some(400),
                detail: "invalid_grant".to_string()
            }
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Account creation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn create_account_posts_payload_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/directory/v1/users"))
            .and(header("authorization", "Bearer svc-1"))
            .and(body_json(json!({
                "primaryEmail": "john.doe@students.polyu.edu.rs",
                "password": "aB3$efgh1JkL",
                "recoveryEmail": "john@example.com",
                "name": {"givenName": "John", "familyName": "Doe"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = provisioner_for(&server)
            .create_account(&AccessToken::bearer("svc-1"), &account())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_account_accepts_any_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/directory/v1/users"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let result = provisioner_for(&server)
            .create_account(&AccessToken::bearer("svc-1"), &account())
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn create_account_conflict_is_provisioning_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/directory/v1/users"))
            .respond_with(ResponseTemplate::new(409).set_body_string("Entity already exists."))
            .expect(1)
            .mount(&server)
            .await;

        let err = provisioner_for(&server)
            .create_account(&AccessToken::bearer("svc-1"), &account())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DirectoryError::AccountCreation {
                status: Some(409),
                detail: "Entity already exists.".to_string()
            }
        );
    }
}
