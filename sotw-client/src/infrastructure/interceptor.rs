use async_trait::async_trait;

use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_error::ApiError;

/// Global hook applied to every non-2xx response before the calling action
/// sees it.
///
/// Returning [`ApiError::Intercepted`] tells the caller the failure has been
/// dealt with; returning the error unchanged leaves it to local handling.
/// The client is passed in so the hook can issue its own requests through
/// [`ApiClient::dispatch`] without re-entering itself.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync + std::fmt::Debug {
    async fn on_error(&self, client: &ApiClient, error: ApiError) -> ApiError;
}
