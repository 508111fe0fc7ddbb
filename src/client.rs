use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{ContentDraft, ContentPiece, NewContentPiece, StatusChange};

const COLLECTION_PATH: &str = "api/content";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error! status: {status}{}", message_suffix(.message))]
    Http { status: u16, message: Option<String> },
    #[error("failed to reach content API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid content API response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid content API URL: {0}")]
    InvalidUrl(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// CRUD operations against the content collection.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<ContentPiece>>;

    async fn create(&self, piece: &NewContentPiece) -> ApiResult<ContentPiece>;

    async fn update(&self, id: i64, draft: &ContentDraft) -> ApiResult<ContentPiece>;

    async fn patch_status(&self, id: i64, status: &str) -> ApiResult<ContentPiece>;

    async fn get_by_id(&self, id: i64) -> ApiResult<ContentPiece>;

    async fn remove(&self, id: i64) -> ApiResult<()>;
}

#[derive(Clone)]
pub struct ContentClient {
    http: Client,
    base_url: Url,
}

impl fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// How much of a non-2xx body to keep for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorBody {
    Discard,
    Capture,
}

impl ContentClient {
    pub fn new(base_url: Url, timeout: Duration) -> ApiResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("content-planner/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let base_url = cfg.base_url()?;
        Ok(Self::new(base_url, cfg.timeout())?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, id: Option<i64>, suffix: Option<&str>) -> ApiResult<Url> {
        let mut path = COLLECTION_PATH.to_string();
        if let Some(id) = id {
            path.push_str(&format!("/{id}"));
        }
        if let Some(suffix) = suffix {
            path.push('/');
            path.push_str(suffix);
        }
        self.base_url
            .join(&path)
            .map_err(|err| ApiError::InvalidUrl(format!("{path}: {err}")))
    }

    /// Build a request with the JSON content type every call carries.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> ApiResult<reqwest::Request> {
        let mut builder = self
            .http
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.build().map_err(ApiError::Transport)
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        on_error: ErrorBody,
    ) -> ApiResult<Response> {
        let request = self.build_request(method, url, body)?;
        debug!(method=%request.method(), url=%request.url(), "sending content request");

        let res = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let message = match on_error {
                ErrorBody::Capture => res
                    .text()
                    .await
                    .ok()
                    .map(|body| body.trim().to_string())
                    .filter(|body| !body.is_empty()),
                ErrorBody::Discard => None,
            };
            warn!(status = status.as_u16(), ?message, "content API returned an error");
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(res)
    }

    async fn execute_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        on_error: ErrorBody,
    ) -> ApiResult<T> {
        let res = self.execute(method, url, body, on_error).await?;
        let text = res.text().await.map_err(ApiError::Transport)?;
        serde_json::from_str(&text).map_err(ApiError::Decode)
    }

    pub async fn list(&self) -> ApiResult<Vec<ContentPiece>> {
        let url = self.endpoint(None, None)?;
        self.execute_json(Method::GET, url, None::<&()>, ErrorBody::Discard)
            .await
    }

    pub async fn create(&self, piece: &NewContentPiece) -> ApiResult<ContentPiece> {
        let url = self.endpoint(None, None)?;
        self.execute_json(Method::POST, url, Some(piece), ErrorBody::Discard)
            .await
    }

    pub async fn update(&self, id: i64, draft: &ContentDraft) -> ApiResult<ContentPiece> {
        let url = self.endpoint(Some(id), None)?;
        let body = draft.clone().into_update(id);
        self.execute_json(Method::PUT, url, Some(&body), ErrorBody::Capture)
            .await
    }

    pub async fn patch_status(&self, id: i64, status: &str) -> ApiResult<ContentPiece> {
        let url = self.endpoint(Some(id), Some("status"))?;
        let body = StatusChange {
            status: status.to_string(),
        };
        self.execute_json(Method::PATCH, url, Some(&body), ErrorBody::Discard)
            .await
    }

    pub async fn get_by_id(&self, id: i64) -> ApiResult<ContentPiece> {
        let url = self.endpoint(Some(id), None)?;
        self.execute_json(Method::GET, url, None::<&()>, ErrorBody::Discard)
            .await
    }

    pub async fn remove(&self, id: i64) -> ApiResult<()> {
        let url = self.endpoint(Some(id), None)?;
        self.execute(Method::DELETE, url, None::<&()>, ErrorBody::Discard)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ContentApi for ContentClient {
    async fn list(&self) -> ApiResult<Vec<ContentPiece>> {
        ContentClient::list(self).await
    }

    async fn create(&self, piece: &NewContentPiece) -> ApiResult<ContentPiece> {
        ContentClient::create(self, piece).await
    }

    async fn update(&self, id: i64, draft: &ContentDraft) -> ApiResult<ContentPiece> {
        ContentClient::update(self, id, draft).await
    }

    async fn patch_status(&self, id: i64, status: &str) -> ApiResult<ContentPiece> {
        ContentClient::patch_status(self, id, status).await
    }

    async fn get_by_id(&self, id: i64) -> ApiResult<ContentPiece> {
        ContentClient::get_by_id(self, id).await
    }

    async fn remove(&self, id: i64) -> ApiResult<()> {
        ContentClient::remove(self, id).await
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
