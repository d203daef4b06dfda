use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use sotw_model::{Results, ResultsPayload, ResultsPending, SotwId};
use tokio::sync::watch;

use crate::domains::errors::Fetch;
use crate::domains::store::Slot;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::constants::endpoints;

/// Either released results or the pending notice, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultsState {
    pub results: Option<Results>,
    pub pending: Option<ResultsPending>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsOutcome {
    Ready,
    Pending {
        message: String,
        release_at: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ResultsStore {
    slot: Slot<ResultsState>,
}

impl ResultsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ResultsState {
        self.slot.current()
    }

    pub fn results(&self) -> Option<Results> {
        self.slot.with(|state| state.results.clone())
    }

    pub fn pending(&self) -> Option<ResultsPending> {
        self.slot.with(|state| state.pending.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultsState> {
        self.slot.subscribe()
    }

    pub(crate) fn apply(&self, payload: ResultsPayload) -> ResultsOutcome {
        match payload {
            ResultsPayload::Ready(results) => {
                self.slot.replace(ResultsState {
                    results: Some(results),
                    pending: None,
                });
                ResultsOutcome::Ready
            }
            ResultsPayload::Pending(pending) => {
                // release_time is in milliseconds
                let outcome = ResultsOutcome::Pending {
                    message: pending.message.clone(),
                    release_at: DateTime::from_timestamp_millis(pending.release_time),
                };
                self.slot.replace(ResultsState {
                    results: None,
                    pending: Some(pending),
                });
                outcome
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultsManager {
    api: ApiClient,
    store: ResultsStore,
}

impl ResultsManager {
    pub fn new(api: ApiClient, store: ResultsStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &ResultsStore {
        &self.store
    }

    /// Read path: load a week's results or its pending notice.
    pub async fn load(&self, id: SotwId, week_num: u32) -> Fetch<ResultsOutcome> {
        match self
            .api
            .get::<ResultsPayload>(&endpoints::results::for_week(id, week_num))
            .await
        {
            Ok(response) => {
                let outcome = self.store.apply(response.data);
                debug!("[Results] sotw {} week {} -> {:?}", id, week_num, outcome);
                Fetch::Loaded(outcome)
            }
            Err(err) => {
                warn!(
                    "[Results] Failed to load results for sotw {} week {}: {}",
                    id, week_num, err
                );
                Fetch::failed(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{StubTransport, fixtures};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_pending_then_ready() {
        let stub = StubTransport::new();
        stub.reply_json(
            "GET",
            "results/4/2",
            200,
            json!({
                "message": "Results are not released yet",
                "release_time": 1_700_000_000_000_i64
            }),
        );
        stub.reply_json("GET", "results/4/2", 200, fixtures::results_json(4, 2));
        let results =
            ResultsManager::new(ApiClient::new(Arc::new(stub)), ResultsStore::new());

        let Fetch::Loaded(ResultsOutcome::Pending { release_at, .. }) =
            results.load(SotwId(4), 2).await
        else {
            panic!("expected pending results");
        };
        assert_eq!(release_at.map(|at| at.timestamp()), Some(1_700_000_000));
        assert!(results.store().results().is_none());

        assert_eq!(
            results.load(SotwId(4), 2).await,
            Fetch::Loaded(ResultsOutcome::Ready)
        );
        assert!(results.store().pending().is_none());
        assert_eq!(
            results.store().results().unwrap().first_place_songs().unwrap(),
            vec!["Song A".to_string()]
        );
    }
}
