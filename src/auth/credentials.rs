/// External credential check
///
/// Login delegates the question "does this principal exist" to an
/// identity service. Every failure on that path answers "no".

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

/// Boundary to the identity lookup service
pub trait CredentialCheck {
    fn username_exists(&self, username: &str) -> impl Future<Output = bool>;
}

#[derive(Deserialize)]
struct ExistsResponse {
    #[serde(default)]
    exists: bool,
}

/// Credential check backed by `GET <endpoint>?username=<s>`
#[derive(Clone)]
pub struct HttpCredentialCheck {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpCredentialCheck {
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CredentialCheck for HttpCredentialCheck {
    async fn username_exists(&self, username: &str) -> bool {
        let response = match self
            .http_client
            .get(&self.endpoint)
            .query(&[("username", username)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Credential service unreachable");
                return false;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(status = %response.status(), "Credential service rejected lookup");
            return false;
        }

        match response.json::<ExistsResponse>().await {
            Ok(body) => body.exists,
            Err(e) => {
                tracing::warn!(error = %e, "Credential service returned an unreadable body");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exists_defaults_to_false() {
        let body: ExistsResponse = serde_json::from_str("{}").unwrap();
        assert!(!body.exists);

        let body: ExistsResponse = serde_json::from_str(r#"{"exists": true}"#).unwrap();
        assert!(body.exists);
    }

    #[tokio::test]
    async fn test_unreachable_service_fails_closed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let check = HttpCredentialCheck::new(
            format!("http://127.0.0.1:{}/users/exists", port),
            Duration::from_millis(500),
        )
        .unwrap();

        assert!(!check.username_exists("alice").await);
    }
}
