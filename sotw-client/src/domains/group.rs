//! Active group (Sotw) state and group-scoped actions.

use log::{info, warn};
use sotw_model::{Sotw, SotwCreate, SotwId, SotwInfo, SotwInvite, SotwUpdate};
use tokio::sync::watch;

use crate::domains::errors::{ActionResult, Fetch};
use crate::domains::session::SessionManager;
use crate::domains::store::Slot;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::constants::endpoints;

/// Holds at most one group; selecting another replaces it entirely.
#[derive(Debug, Clone, Default)]
pub struct GroupStore {
    slot: Slot<Option<Sotw>>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Sotw> {
        self.slot.current()
    }

    pub fn id(&self) -> Option<SotwId> {
        self.slot.with(|group| group.as_ref().map(|sotw| sotw.id))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Sotw>> {
        self.slot.subscribe()
    }

    pub(crate) fn set(&self, sotw: Sotw) {
        self.slot.replace(Some(sotw));
    }
}

#[derive(Debug, Clone)]
pub struct GroupManager {
    api: ApiClient,
    store: GroupStore,
    session: SessionManager,
}

impl GroupManager {
    pub fn new(api: ApiClient, store: GroupStore, session: SessionManager) -> Self {
        Self {
            api,
            store,
            session,
        }
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    /// Read path: load a group into the store. On failure the store keeps
    /// whatever it held before.
    pub async fn fetch(&self, id: SotwId) -> Fetch<Sotw> {
        match self.api.get::<Sotw>(&endpoints::sotw::by_id(id)).await {
            Ok(response) => {
                self.store.set(response.data.clone());
                Fetch::Loaded(response.data)
            }
            Err(err) => {
                warn!("[Group] Failed to load sotw {}: {}", id, err);
                Fetch::failed(&err)
            }
        }
    }

    /// Create a group, then refresh the current user so the creator's
    /// membership list includes it.
    pub async fn create(&self, form: &SotwCreate) -> ActionResult<Sotw> {
        let response = self
            .api
            .post::<_, Sotw>(endpoints::sotw::CREATE, form)
            .await?;
        info!("[Group] Created sotw {} ({})", response.data.id, response.data.name);
        self.store.set(response.data.clone());
        // The server enrolls the creator; pick up the new membership.
        self.session.get_current_user().await;
        Ok(response.data)
    }

    pub async fn update(&self, id: SotwId, update: &SotwUpdate) -> ActionResult<Sotw> {
        let response = self
            .api
            .put::<_, Sotw>(&endpoints::sotw::by_id(id), update)
            .await?;
        self.store.set(response.data.clone());
        Ok(response.data)
    }

    /// Read path: issue a shareable invite link.
    pub async fn issue_invite(&self, id: SotwId) -> Fetch<SotwInvite> {
        match self
            .api
            .get::<SotwInvite>(&endpoints::sotw::invite(id))
            .await
        {
            Ok(response) => Fetch::Loaded(response.data),
            Err(err) => {
                warn!("[Group] Failed to issue invite for sotw {}: {}", id, err);
                Fetch::failed(&err)
            }
        }
    }

    /// Resolve an invite share token. An invalid token answers 403, which
    /// is returned here rather than redirected.
    pub async fn pending_invite(&self, share_token: &str) -> ActionResult<SotwInfo> {
        let response = self
            .api
            .get::<SotwInfo>(&endpoints::sotw::pending_invite(share_token))
            .await?;
        Ok(response.data)
    }

    /// Join through an invite, then refresh the current user so the
    /// membership list includes the joined group.
    pub async fn join_invite(&self, share_token: &str) -> ActionResult<Sotw> {
        let response = self
            .api
            .get::<Sotw>(&endpoints::sotw::join_invite(share_token))
            .await?;
        info!("[Group] Joined sotw {}", response.data.id);
        self.store.set(response.data.clone());
        self.session.get_current_user().await;
        Ok(response.data)
    }
}
