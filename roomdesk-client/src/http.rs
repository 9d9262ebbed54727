use reqwest::{Method, RequestBuilder};
use roomdesk_core::{ClientError, ClientResult, Session};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error;

/// Whether a call needs the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Public,
    Bearer,
}

/// Thin JSON client over the hotel REST API. Cheap to clone; clones share
/// the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, session: Arc<Session>) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fails fast, before any request is issued, when nobody is signed in.
    pub async fn require_token(&self) -> ClientResult<String> {
        match self.session.token().await {
            Some(token) => Ok(token.into_inner()),
            None => Err(ClientError::AuthRequired("User is not authenticated".to_string())),
        }
    }

    async fn builder(&self, method: Method, path: &str, auth: Auth) -> ClientResult<RequestBuilder> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, %method, path, "API request");

        let mut req = self
            .client
            .request(method, self.url(path))
            .header("X-Request-Id", request_id.to_string());
        if auth == Auth::Bearer {
            let token = self.require_token().await?;
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn execute(&self, req: RequestBuilder) -> ClientResult<String> {
        let response = req.send().await.map_err(error::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(error::from_transport)?;

        if !status.is_success() {
            let err = error::from_status(status, &body);
            warn!("API request failed with status {}: {}", status, err);
            return Err(err);
        }
        Ok(body)
    }

    /// Send a request and decode the JSON response.
    pub async fn call<T, B>(&self, method: Method, path: &str, auth: Auth, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut req = self.builder(method, path, auth).await?;
        if let Some(body) = body {
            req = req.json(body);
        }
        let text = self.execute(req).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("Failed to parse response: {}", e)))
    }

    /// Send a request whose response body is irrelevant beyond its status.
    pub async fn call_unit<B>(&self, method: Method, path: &str, auth: Auth, body: Option<&B>) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let mut req = self.builder(method, path, auth).await?;
        if let Some(body) = body {
            req = req.json(body);
        }
        self.execute(req).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> ClientResult<T> {
        self.call::<T, ()>(Method::GET, path, auth, None).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, auth: Auth, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.builder(Method::GET, path, auth).await?.query(query);
        let text = self.execute(req).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("Failed to parse response: {}", e)))
    }
}

/// `{"message": "..."}` acknowledgement bodies.
#[derive(Debug, Default, serde::Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn message_or(self, fallback: &str) -> String {
        self.message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomdesk_core::MemoryStorage;

    fn client(base_url: &str) -> ApiClient {
        let session = Arc::new(Session::new(Arc::new(MemoryStorage::new())));
        ApiClient::new(base_url, Duration::from_secs(1), session).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:3000/");
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.url("/bookings"), "http://localhost:3000/bookings");
        assert_eq!(api.url("hotels/3"), "http://localhost:3000/hotels/3");
    }

    #[tokio::test]
    async fn test_bearer_call_fails_fast_without_token() {
        // Nothing listens here; reaching the network would be a Transport error.
        let api = client("http://127.0.0.1:9");
        let err = api.get::<serde_json::Value>("/bookings", Auth::Bearer).await.unwrap_err();
        assert!(err.is_auth_required());
    }

    #[test]
    fn test_ack_fallback() {
        assert_eq!(Ack::default().message_or("Done"), "Done");
        let ack = Ack { message: Some("Added".to_string()) };
        assert_eq!(ack.message_or("Done"), "Added");
    }
}
