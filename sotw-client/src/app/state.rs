use serde::Serialize;
use sotw_model::{Sotw, User};

use crate::domains::group::GroupStore;
use crate::domains::period::{PeriodState, PeriodStore};
use crate::domains::results::{ResultsState, ResultsStore};
use crate::domains::session::SessionStore;

/// Every store the client owns. Cloning shares the same slots.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionStore,
    pub group: GroupStore,
    pub period: PeriodStore,
    pub results: ResultsStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State around an existing session store, e.g. one seeded with
    /// [`SessionStore::authenticated`].
    pub fn with_session(session: SessionStore) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            user: self.session.user(),
            group: self.group.current(),
            period: self.period.current(),
            results: self.results.current(),
        }
    }
}

/// Point-in-time copy of all stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub user: Option<User>,
    pub group: Option<Sotw>,
    pub period: PeriodState,
    pub results: ResultsState,
}
