use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::infrastructure::api_error::{ApiError, extract_detail};
use crate::infrastructure::interceptor::ResponseInterceptor;
use crate::infrastructure::transport::{RawResponse, RequestConfig, Transport};

/// Decoded successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// API client shared by every store action.
///
/// Non-2xx responses are routed through the installed
/// [`ResponseInterceptor`] before being returned.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    interceptor: Arc<RwLock<Option<Arc<dyn ResponseInterceptor>>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("transport", &self.transport)
            .field("has_interceptor", &self.interceptor.read().is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            interceptor: Arc::new(RwLock::new(None)),
        }
    }

    /// Install the global response interceptor, replacing any previous one.
    pub fn set_interceptor(&self, interceptor: Arc<dyn ResponseInterceptor>) {
        *self.interceptor.write() = Some(interceptor);
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Execute a request, applying the response policy to failures.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestConfig,
    ) -> Result<ApiResponse<T>, ApiError> {
        match self.dispatch(request).await {
            Ok((raw, request)) => decode(raw, request),
            Err(error @ ApiError::Status { .. }) => {
                let interceptor = self.interceptor.read().clone();
                match interceptor {
                    Some(interceptor) => Err(interceptor.on_error(self, error).await),
                    None => Err(error),
                }
            }
            Err(error) => Err(error),
        }
    }

    /// Replay a request taken from an [`ApiError`]. Its `retried` flag is
    /// honoured, so a second 401 is passed through unhandled.
    pub async fn resend<T: DeserializeOwned>(
        &self,
        request: RequestConfig,
    ) -> Result<ApiResponse<T>, ApiError> {
        debug!(
            "[ApiClient] Resending {} {} (retried: {})",
            request.method, request.path, request.retried
        );
        self.execute(request).await
    }

    /// Send without consulting the interceptor. Non-2xx statuses come back
    /// as [`ApiError::Status`].
    pub async fn dispatch(
        &self,
        request: RequestConfig,
    ) -> Result<(RawResponse, RequestConfig), ApiError> {
        let raw = match self.transport.send(&request).await {
            Ok(raw) => raw,
            Err(source) => {
                warn!(
                    "[ApiClient] {} {} transport failure: {}",
                    request.method, request.path, source
                );
                return Err(ApiError::Transport { source, request });
            }
        };

        if raw.is_success() {
            debug!(
                "[ApiClient] {} {} -> {}",
                request.method, request.path, raw.status
            );
            Ok((raw, request))
        } else {
            let detail = extract_detail(raw.status, &raw.body);
            debug!(
                "[ApiClient] {} {} -> {} ({})",
                request.method, request.path, raw.status, detail
            );
            Err(ApiError::Status {
                status: raw.status,
                detail,
                request,
            })
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiError> {
        self.execute(RequestConfig::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        let body = encode(path, body)?;
        self.execute(RequestConfig::post(path).with_json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        let body = encode(path, body)?;
        self.execute(RequestConfig::put(path).with_json(body)).await
    }

    /// POST `application/x-www-form-urlencoded` fields.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
    ) -> Result<ApiResponse<T>, ApiError> {
        self.execute(RequestConfig::post(path).with_form(fields))
            .await
    }
}

fn encode<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|source| ApiError::Encode {
        path: path.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(
    raw: RawResponse,
    request: RequestConfig,
) -> Result<ApiResponse<T>, ApiError> {
    // Empty bodies (204, bare 201) decode as JSON null.
    let body: &[u8] = if raw.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &raw.body
    };
    match serde_json::from_slice(body) {
        Ok(data) => Ok(ApiResponse {
            status: raw.status,
            data,
        }),
        Err(source) => {
            warn!(
                "[ApiClient] {} {} returned an undecodable body: {}",
                request.method, request.path, source
            );
            Err(ApiError::Decode {
                status: raw.status,
                source,
                request,
            })
        }
    }
}
