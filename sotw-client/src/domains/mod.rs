//! Domain stores and their actions.
//!
//! Each store owns one observable slice of application state. Reads are
//! public getters; writes are crate-private and only reachable through the
//! matching manager.

pub mod errors;
pub mod group;
pub mod period;
pub mod results;
pub mod session;
pub mod store;

pub use errors::{ActionError, ActionResult, Fetch};
pub use group::{GroupManager, GroupStore};
pub use period::{PeriodError, PeriodManager, PeriodOutcome, PeriodState, PeriodStore};
pub use results::{ResultsManager, ResultsOutcome, ResultsState, ResultsStore};
pub use session::{Session, SessionManager, SessionStore};
