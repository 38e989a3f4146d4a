//! The remote template store contract and its HTTP implementation.

use crate::error::GatewayError;
use async_trait::async_trait;
use rxpad_core::{PrescriptionTemplate, StoredTemplate};
use rxpad_uuid::UserUuid;

/// HTTP client timeout for template store requests.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Fallback when the server gives no usable error message.
const GENERIC_FAILURE: &str = "Something went wrong while saving the prescription template";

/// The narrow remote-store contract the builder needs.
///
/// `update` targets "the" current user's template implicitly; the store
/// holds at most one per user, so no id is required.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn list(&self) -> Result<Vec<StoredTemplate>, GatewayError>;
    async fn create(&self, template: &PrescriptionTemplate)
        -> Result<StoredTemplate, GatewayError>;
    async fn update(&self, template: &PrescriptionTemplate)
        -> Result<StoredTemplate, GatewayError>;
    async fn delete(&self, template_id: &str) -> Result<(), GatewayError>;
}

/// `reqwest`-backed template store client.
///
/// The current user's identity travels as the `x-user-id` header; where it
/// comes from (session, token exchange) is an external collaborator's
/// business and opaque here.
#[derive(Debug)]
pub struct HttpTemplateStore {
    http_client: reqwest::Client,
    base_url: String,
    user_id: UserUuid,
}

impl HttpTemplateStore {
    /// Creates a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidInput` for an unparsable URL or a
    /// non-http(s) scheme, and `GatewayError::Network` if the underlying
    /// client cannot be built.
    pub fn new(base_url: &str, user_id: UserUuid) -> Result<Self, GatewayError> {
        let cleaned_url = base_url.trim_end_matches('/');

        let parsed = reqwest::Url::parse(cleaned_url).map_err(|e| {
            GatewayError::InvalidInput(format!("invalid store URL '{}': {}", cleaned_url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidInput(format!(
                "store URL must use http or https, got: {}",
                parsed.scheme()
            )));
        }

        let http_client = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: cleaned_url.to_string(),
            user_id,
        })
    }

    fn templates_url(&self) -> String {
        format!("{}/templates", self.base_url)
    }

    /// Pulls a display message out of an error body.
    ///
    /// The store answers errors with `{"message": "..."}`; anything else
    /// falls back to the generic failure text.
    fn extract_message(body: &str) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value["message"].as_str().map(str::to_owned))
            .filter(|message| !message.trim().is_empty())
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message =
            Self::extract_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());

        match status {
            reqwest::StatusCode::NOT_FOUND => Err(GatewayError::NotFound(message)),
            _ => Err(GatewayError::Server(message)),
        }
    }
}

#[async_trait]
impl TemplateStore for HttpTemplateStore {
    async fn list(&self) -> Result<Vec<StoredTemplate>, GatewayError> {
        let response = self
            .http_client
            .get(self.templates_url())
            .header("x-user-id", self.user_id.to_string())
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn create(
        &self,
        template: &PrescriptionTemplate,
    ) -> Result<StoredTemplate, GatewayError> {
        let response = self
            .http_client
            .post(self.templates_url())
            .header("x-user-id", self.user_id.to_string())
            .json(template)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn update(
        &self,
        template: &PrescriptionTemplate,
    ) -> Result<StoredTemplate, GatewayError> {
        let response = self
            .http_client
            .put(self.templates_url())
            .header("x-user-id", self.user_id.to_string())
            .json(template)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn delete(&self, template_id: &str) -> Result<(), GatewayError> {
        let response = self
            .http_client
            .delete(format!("{}/{}", self.templates_url(), template_id))
            .header("x-user-id", self.user_id.to_string())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message =
            Self::extract_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());

        match status {
            reqwest::StatusCode::NOT_FOUND => Err(GatewayError::NotFound(message)),
            _ => Err(GatewayError::Server(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_accepts_http_urls() {
        assert!(HttpTemplateStore::new("http://localhost:3000", UserUuid::new()).is_ok());
        assert!(HttpTemplateStore::new("https://api.clinic.example/", UserUuid::new()).is_ok());
    }

    #[test]
    fn test_client_creation_rejects_bad_urls() {
        assert!(HttpTemplateStore::new("not-a-url", UserUuid::new()).is_err());
        assert!(HttpTemplateStore::new("ftp://localhost:3000", UserUuid::new()).is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = HttpTemplateStore::new("http://localhost:3000/", UserUuid::new()).unwrap();
        assert_eq!(store.templates_url(), "http://localhost:3000/templates");
    }

    #[test]
    fn test_extract_message_prefers_server_text() {
        let body = r#"{"message": "colour must be hex"}"#;
        assert_eq!(
            HttpTemplateStore::extract_message(body).as_deref(),
            Some("colour must be hex")
        );
    }

    #[test]
    fn test_extract_message_ignores_unusable_bodies() {
        assert_eq!(HttpTemplateStore::extract_message("<html>boom</html>"), None);
        assert_eq!(HttpTemplateStore::extract_message(r#"{"message": ""}"#), None);
        assert_eq!(HttpTemplateStore::extract_message(r#"{"error": "x"}"#), None);
    }
}
