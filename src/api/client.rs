//! Typed JSON-over-HTTP client for the ERP backend.

use std::fmt::Display;

use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::config::ApiConfig;
use super::error::ApiError;
use super::resource::Resource;
use super::session::Session;

/// Client for the backend's per-entity REST resources.
///
/// Every request carries the session's bearer token. A 401 clears the token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Client with an in-memory session, logged in if the config carries a token.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let session = Session::in_memory();
        if let Some(token) = &config.token {
            session.login(token.clone());
        }
        Self::with_session(config, session)
    }

    pub fn with_session(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `GET /api/{resource}`
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        let body = self.send(self.http.get(self.url(resource, None))).await?;
        decode(&body)
    }

    /// `GET /api/{resource}/{id}`
    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: impl Display,
    ) -> Result<T, ApiError> {
        let url = self.url(resource, Some(&id.to_string()));
        let body = self.send(self.http.get(url)).await?;
        decode(&body)
    }

    /// `POST /api/{resource}`
    pub async fn create<B, T>(&self, resource: Resource, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send(self.http.post(self.url(resource, None)).json(payload))
            .await?;
        decode(&body)
    }

    /// `PUT /api/{resource}/{id}`
    pub async fn update<B, T>(
        &self,
        resource: Resource,
        id: impl Display,
        payload: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(resource, Some(&id.to_string()));
        let body = self.send(self.http.put(url).json(payload)).await?;
        decode(&body)
    }

    /// `DELETE /api/{resource}/{id}`
    pub async fn delete(&self, resource: Resource, id: impl Display) -> Result<(), ApiError> {
        let url = self.url(resource, Some(&id.to_string()));
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    fn url(&self, resource: Resource, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}{}/{}", self.base_url, resource.path(), id),
            None => format!("{}{}", self.base_url, resource.path()),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%url, "backend rejected token, clearing session");
            self.session.logout();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), %body, "backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: backend_message(&body),
            });
        }

        tracing::debug!(%url, status = status.as_u16(), "backend request ok");
        Ok(body)
    }
}

/// Decode a body that is either the value itself or wrapped as `{"data": ...}`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("data") && !map.contains_key("id") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

/// The backend's `message` (or `error`) field, else the raw body.
fn backend_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error", "detail"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
