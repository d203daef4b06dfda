//! Group, then period (or results) load sequence run on entering a group
//! route.
//!
//! Each step awaits the previous one; the period request is only issued
//! after the group has been committed to its store. Nothing here cancels an
//! in-flight sequence, so a slow cascade for one group can finish after a
//! newer one and overwrite its data.

use log::{debug, info};
use serde::Serialize;
use sotw_model::SotwId;

use crate::domains::errors::Fetch;
use crate::domains::group::GroupManager;
use crate::domains::period::{PeriodManager, PeriodOutcome};
use crate::domains::results::{ResultsManager, ResultsOutcome};

/// What a cascade did. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum CascadeReport {
    GroupUnavailable {
        id: SotwId,
        status: Option<u16>,
    },
    PeriodUnavailable {
        id: SotwId,
        status: Option<u16>,
    },
    Loaded {
        id: SotwId,
        period: PeriodOutcome,
    },
    ResultsUnavailable {
        id: SotwId,
        week_num: u32,
        status: Option<u16>,
    },
    ResultsLoaded {
        id: SotwId,
        week_num: u32,
        results: ResultsOutcome,
    },
}

#[derive(Debug, Clone)]
pub struct FetchCascade {
    groups: GroupManager,
    periods: PeriodManager,
    results: ResultsManager,
}

impl FetchCascade {
    pub fn new(groups: GroupManager, periods: PeriodManager, results: ResultsManager) -> Self {
        Self {
            groups,
            periods,
            results,
        }
    }

    /// Load the group, then its current period.
    pub async fn enter_group(&self, id: SotwId) -> CascadeReport {
        debug!("[Cascade] Entering sotw {}", id);
        if let Fetch::Failed { status } = self.groups.fetch(id).await {
            info!("[Cascade] sotw {} unavailable; skipping period", id);
            return CascadeReport::GroupUnavailable { id, status };
        }

        match self.periods.fetch_current(id).await {
            Fetch::Loaded(period) => CascadeReport::Loaded { id, period },
            Fetch::Failed { status } => CascadeReport::PeriodUnavailable { id, status },
        }
    }

    /// Load the group, then the results of one of its weeks.
    pub async fn enter_results(&self, id: SotwId, week_num: u32) -> CascadeReport {
        debug!("[Cascade] Entering results of sotw {} week {}", id, week_num);
        if let Fetch::Failed { status } = self.groups.fetch(id).await {
            info!("[Cascade] sotw {} unavailable; skipping results", id);
            return CascadeReport::GroupUnavailable { id, status };
        }

        match self.results.load(id, week_num).await {
            Fetch::Loaded(results) => CascadeReport::ResultsLoaded {
                id,
                week_num,
                results,
            },
            Fetch::Failed { status } => CascadeReport::ResultsUnavailable {
                id,
                week_num,
                status,
            },
        }
    }
}
