//! Song of the Week client library.
//!
//! Session, group, period and results stores; the navigation guard
//! pipeline; the group-then-period fetch cascade; and the API client with
//! its global response policy. The `sotw-client` binary in `src/main.rs`
//! drives these from the command line.

pub mod app;
pub mod cascade;
pub mod domains;
pub mod infrastructure;
pub mod navigation;

pub use app::{App, AppError, AppSnapshot, AppState, Visit};
pub use cascade::{CascadeReport, FetchCascade};
pub use domains::{ActionError, Fetch};
pub use infrastructure::{ApiClient, ApiError, RequestConfig};
pub use navigation::{NavigationError, NavigationOutcome, Navigator};
