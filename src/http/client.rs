//! HTTP client for the Linda API.
//!
//! Every call goes through the same pipeline:
//!
//! 1. `authorize`: default headers, bearer credential, per-call overrides
//! 2. the transport ([`HttpClient`])
//! 3. `classify`: unwrap the envelope and act on the business code
//!
//! | code      | outcome                                                       |
//! |-----------|---------------------------------------------------------------|
//! | `600500`  | `Err(ApiError::Business)` carrying `msg` (or "System error")  |
//! | `600502`  | notify, clear the credential, go to the entry route, then `Ok` |
//! | otherwise | `Ok(envelope)`                                                |

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::envelope::{ApiResponse, BUSINESS_ERROR_CODE, SESSION_EXPIRED_CODE};
use super::request::RequestConfig;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, ENTRY_ROUTE};
use crate::notifications::{Notification, Notifier};
use crate::traits::{set_header, CredentialsProvider, HttpClient, Method, Request, Response};

/// Client for the Linda HTTP API.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialsProvider>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    defaults: RequestConfig,
    loading_tx: watch::Sender<usize>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (loading_tx, _) = watch::channel(0);
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            transport,
            credentials,
            notifier,
            navigator,
            defaults: RequestConfig::new().timeout(config.request_timeout),
            loading_tx,
        }
    }

    /// Layer `defaults` over the built-in request defaults.
    pub fn with_defaults(mut self, defaults: RequestConfig) -> Self {
        self.defaults = self.defaults.merge(Some(&defaults));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of calls with `loading` set that are still in flight.
    pub fn loading(&self) -> watch::Receiver<usize> {
        self.loading_tx.subscribe()
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::Get, path, None, config).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        config: Option<RequestConfig>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(ApiError::Encode)?;
        self.request(Method::Post, path, Some(body), config).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        config: Option<RequestConfig>,
    ) -> Result<ApiResponse<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(body).map_err(ApiError::Encode)?;
        self.request(Method::Put, path, Some(body), config).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        config: Option<RequestConfig>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.request(Method::Delete, path, None, config).await
    }

    /// Issue a call with a pre-encoded JSON body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        config: Option<RequestConfig>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let config = self.defaults.merge(config.as_ref());
        let request = self.authorize(method, path, body, &config).await;
        let _loading = config
            .is_loading()
            .then(|| LoadingGuard::enter(&self.loading_tx));

        debug!("{} {}", request.method.as_str(), request.url);
        let outcome = match self.transport.execute(request).await {
            Ok(response) => self.classify(response).await,
            Err(e) => Err(ApiError::Transport(e)),
        };

        match outcome.and_then(|envelope| envelope.decode().map_err(ApiError::Decode)) {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                if config.is_silent() {
                    debug!("{} {} failed: {}", method.as_str(), path, e);
                } else {
                    warn!("{} {} failed: {}", method.as_str(), path, e);
                }
                Err(e)
            }
        }
    }

    async fn authorize(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        config: &RequestConfig,
    ) -> Request {
        let mut request = Request::new(method, self.url_for(path));
        set_header(&mut request.headers, "Content-Type", "application/json");
        if let Some(token) = self.credentials.token().await {
            set_header(&mut request.headers, "Authorization", format!("Bearer {}", token));
        }
        for (name, value) in &config.headers {
            set_header(&mut request.headers, name.as_str(), value.as_str());
        }
        request.body = body;
        request.timeout = config.timeout;
        request
    }

    async fn classify(&self, response: Response) -> Result<ApiResponse<Value>, ApiError> {
        let envelope: ApiResponse<Value> = match response.json() {
            Ok(envelope) => envelope,
            Err(e) if response.is_success() => return Err(ApiError::Decode(e)),
            Err(_) => {
                return Err(ApiError::Status {
                    status: response.status,
                    body: response.text_lossy(),
                })
            }
        };

        match envelope.code {
            BUSINESS_ERROR_CODE => Err(ApiError::Business {
                code: envelope.code,
                message: envelope.message_or_default().to_string(),
            }),
            SESSION_EXPIRED_CODE => {
                self.expire_session().await;
                Ok(envelope)
            }
            _ => Ok(envelope),
        }
    }

    async fn expire_session(&self) {
        info!("Session expired, signing out");
        self.notifier.notify(Notification::session_expired());
        if let Err(e) = self.credentials.clear().await {
            warn!("Failed to clear expired credential: {}", e);
        }
        self.navigator.navigate(ENTRY_ROUTE);
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Holds one slot of the loading counter for the life of a call.
struct LoadingGuard<'a> {
    counter: &'a watch::Sender<usize>,
}

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a watch::Sender<usize>) -> Self {
        counter.send_modify(|n| *n += 1);
        Self { counter }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.send_modify(|n| *n = n.saturating_sub(1));
    }
}
