//! Current period (week) of the active group, with its soft-error channel.

use log::{debug, info, warn};
use serde::Serialize;
use sotw_model::{PeriodPayload, SotwId, SurveyResponse, Week};
use tokio::sync::watch;

use crate::domains::errors::{ActionResult, Fetch};
use crate::domains::store::Slot;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::constants::endpoints;

/// Business-rule message delivered in place of a usable week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodError {
    pub message: String,
}

/// After any successful load exactly one of `week` and `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodState {
    pub week: Option<Week>,
    pub error: Option<PeriodError>,
}

/// What a successful period load left in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PeriodOutcome {
    Open { week_num: u32 },
    Blocked { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct PeriodStore {
    slot: Slot<PeriodState>,
}

impl PeriodStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PeriodState {
        self.slot.current()
    }

    pub fn week(&self) -> Option<Week> {
        self.slot.with(|state| state.week.clone())
    }

    pub fn error(&self) -> Option<PeriodError> {
        self.slot.with(|state| state.error.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<PeriodState> {
        self.slot.subscribe()
    }

    /// Commit a decoded period response in a single update.
    pub(crate) fn apply(&self, payload: PeriodPayload) -> PeriodOutcome {
        let (state, outcome) = match payload {
            PeriodPayload::Week(week) => {
                let outcome = PeriodOutcome::Open {
                    week_num: week.week_num,
                };
                (
                    PeriodState {
                        week: Some(week),
                        error: None,
                    },
                    outcome,
                )
            }
            PeriodPayload::Envelope(envelope) => {
                if let Some(week) = &envelope.week {
                    debug!(
                        "[Period] Dropping week {} carried by envelope ({:?})",
                        week.week_num, envelope.status
                    );
                }
                let outcome = PeriodOutcome::Blocked {
                    message: envelope.message.clone(),
                };
                (
                    PeriodState {
                        week: None,
                        error: Some(PeriodError {
                            message: envelope.message,
                        }),
                    },
                    outcome,
                )
            }
        };
        self.slot.replace(state);
        outcome
    }

    pub(crate) fn set_week(&self, week: Week) {
        self.slot.replace(PeriodState {
            week: Some(week),
            error: None,
        });
    }
}

#[derive(Debug, Clone)]
pub struct PeriodManager {
    api: ApiClient,
    store: PeriodStore,
}

impl PeriodManager {
    pub fn new(api: ApiClient, store: PeriodStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &PeriodStore {
        &self.store
    }

    /// Read path: load the group's current week. Failures, including an
    /// undecodable body, leave the store untouched.
    pub async fn fetch_current(&self, id: SotwId) -> Fetch<PeriodOutcome> {
        match self
            .api
            .get::<PeriodPayload>(&endpoints::sotw::current_week(id))
            .await
        {
            Ok(response) => {
                let outcome = self.store.apply(response.data);
                debug!("[Period] sotw {} -> {:?}", id, outcome);
                Fetch::Loaded(outcome)
            }
            Err(err) => {
                warn!("[Period] Failed to load current week of sotw {}: {}", id, err);
                Fetch::failed(&err)
            }
        }
    }

    /// Write path: submit this user's survey response. The server answers
    /// with the updated week, which replaces the stored one.
    pub async fn submit_response(
        &self,
        id: SotwId,
        week_num: u32,
        response: &SurveyResponse,
    ) -> ActionResult<Week> {
        let reply = self
            .api
            .post::<_, Week>(&endpoints::response::submit(id, week_num), response)
            .await?;
        info!("[Period] Submitted response for sotw {} week {}", id, week_num);
        self.store.set_week(reply.data.clone());
        Ok(reply.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{StubTransport, fixtures};
    use sotw_model::{EnvelopeStatus, PeriodEnvelope};
    use std::sync::Arc;

    #[test]
    fn test_envelope_clears_week_even_when_present() {
        let store = PeriodStore::new();
        store.set_week(serde_json::from_value(fixtures::week_json(1, 2)).unwrap());

        let outcome = store.apply(PeriodPayload::Envelope(PeriodEnvelope {
            status: EnvelopeStatus::Code(406),
            message: "Need three players".into(),
            week: serde_json::from_value(fixtures::week_json(1, 3)).unwrap(),
        }));

        assert_eq!(
            outcome,
            PeriodOutcome::Blocked {
                message: "Need three players".into()
            }
        );
        assert!(store.week().is_none());
        assert_eq!(store.error().unwrap().message, "Need three players");
    }

    #[tokio::test]
    async fn test_undecodable_body_leaves_store() {
        let stub = StubTransport::new();
        stub.reply("GET", "sotw/1/current_week", 200, b"\"maintenance\"".to_vec());
        let periods = PeriodManager::new(ApiClient::new(Arc::new(stub)), PeriodStore::new());

        let fetch = periods.fetch_current(SotwId(1)).await;
        assert_eq!(fetch, Fetch::Failed { status: Some(200) });
        assert_eq!(periods.store().current(), PeriodState::default());
    }

    #[tokio::test]
    async fn test_submit_response_replaces_period() {
        let stub = StubTransport::new();
        stub.reply_json("POST", "response/1/0", 200, fixtures::week_json(1, 0));
        let periods = PeriodManager::new(ApiClient::new(Arc::new(stub)), PeriodStore::new());
        periods.store().apply(PeriodPayload::Envelope(PeriodEnvelope {
            status: EnvelopeStatus::Label("closed".into()),
            message: "Survey not open".into(),
            week: None,
        }));

        let week = periods
            .submit_response(SotwId(1), 0, &SurveyResponse::nomination("spotify:track:1"))
            .await
            .unwrap();

        assert_eq!(week.week_num, 0);
        assert_eq!(periods.store().week(), Some(week));
        assert!(periods.store().error().is_none());
    }
}
