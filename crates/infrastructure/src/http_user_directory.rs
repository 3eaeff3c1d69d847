use async_trait::async_trait;
use caseline_application::UserDirectory;
use caseline_core::{AppError, AppResult};
use caseline_domain::UserAccount;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

/// User directory backed by the remote data API.
///
/// Records are decoded leniently; malformed override values arrive as empty
/// lists rather than failing the request.
#[derive(Clone)]
pub struct HttpUserDirectory {
    http_client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpUserDirectory {
    /// Creates a directory client for `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url, api_token: Option<String>) -> Self {
        Self {
            http_client,
            base_url,
            api_token,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "data API url '{}' cannot carry path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http_client.request(method, url);
        match self.api_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_write(&self, url: Url, body: Value) -> AppResult<()> {
        let response = self
            .request(reqwest::Method::PUT, url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|error| transport_error(&url, &error))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!(
                "data API has no resource at '{}'",
                url.path()
            ))),
            status => Err(unexpected_status(&url, status, response).await),
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<Option<UserAccount>> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self
            .request(reqwest::Method::POST, url.clone())
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|error| transport_error(&url, &error))?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .json::<Value>()
                    .await
                    .map_err(|error| transport_error(&url, &error))?;
                decode_account(body).map(Some)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(username = %username, "data API rejected credentials");
                Ok(None)
            }
            status => Err(unexpected_status(&url, status, response).await),
        }
    }

    async fn find_user(&self, user_id: &str) -> AppResult<Option<UserAccount>> {
        let url = self.endpoint(&["users", user_id])?;
        let response = self
            .request(reqwest::Method::GET, url.clone())
            .send()
            .await
            .map_err(|error| transport_error(&url, &error))?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .json::<Value>()
                    .await
                    .map_err(|error| transport_error(&url, &error))?;
                decode_account(body).map(Some)
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(unexpected_status(&url, status, response).await),
        }
    }

    async fn save_permission_overrides(
        &self,
        user_id: &str,
        overrides: &[String],
    ) -> AppResult<()> {
        let url = self.endpoint(&["users", user_id, "permission-overrides"])?;
        self.send_write(url, json!({ "permissionOverrides": overrides }))
            .await
    }

    async fn save_role(&self, user_id: &str, role: &str) -> AppResult<()> {
        let url = self.endpoint(&["users", user_id, "role"])?;
        self.send_write(url, json!({ "role": role })).await
    }
}

/// Decodes a user record, accepting both a bare record and one wrapped in a
/// `user` envelope.
fn decode_account(body: Value) -> AppResult<UserAccount> {
    let record = match body {
        Value::Object(mut object) if object.contains_key("user") => {
            object.remove("user").unwrap_or_default()
        }
        other => other,
    };

    serde_json::from_value(record)
        .map_err(|error| AppError::Internal(format!("data API returned invalid user: {error}")))
}

fn transport_error(url: &Url, error: &reqwest::Error) -> AppError {
    AppError::Internal(format!("data API request to '{}' failed: {error}", url.path()))
}

async fn unexpected_status(
    url: &Url,
    status: StatusCode,
    response: reqwest::Response,
) -> AppError {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
    AppError::Internal(format!(
        "data API request to '{}' failed with status {status}: {body}",
        url.path()
    ))
}
