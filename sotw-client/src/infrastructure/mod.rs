pub mod api_client;
pub mod api_error;
pub mod constants;
pub mod interceptor;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use api_client::{ApiClient, ApiResponse};
pub use api_error::ApiError;
pub use interceptor::ResponseInterceptor;
pub use transport::{
    RawResponse, RequestBody, RequestConfig, ReqwestTransport, Transport, TransportError,
};
