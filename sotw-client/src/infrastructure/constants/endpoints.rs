//! API endpoint paths.
//!
//! Paths are relative to the configured API root (`{base}/api/v1/` by
//! default) and therefore carry no leading slash.

/// Authentication endpoints
pub mod auth {
    pub const REGISTER: &str = "auth/register";
    pub const LOGIN: &str = "auth/login";
    pub const LOGOUT: &str = "auth/logout";
    pub const CURRENT_USER: &str = "auth/current_user";
    /// Password reset request and confirmation share this prefix; a 404
    /// here reaches the caller instead of the not-found view.
    pub const RESET_PASSWORD: &str = "auth/reset-password";
    pub const SPOTIFY_CLIENT_ID: &str = "auth/spotify-client-id";
    pub const SPOTIFY_ACCESS_TOKEN: &str = "auth/spotify-access-token";

    pub fn verify(token: &str) -> String {
        format!("auth/verify/{token}")
    }

    pub fn reset_password(token: &str) -> String {
        format!("{RESET_PASSWORD}/{token}")
    }
}

/// User endpoints
pub mod user {
    use sotw_model::UserId;

    pub fn by_id(id: UserId) -> String {
        format!("user/{id}")
    }
}

/// Group endpoints
pub mod sotw {
    use sotw_model::SotwId;

    pub const CREATE: &str = "sotw/";
    /// A 403 under this prefix reaches the caller instead of the forbidden view.
    pub const PENDING_INVITE_PREFIX: &str = "sotw/invite/pending/";

    pub fn by_id(id: SotwId) -> String {
        format!("sotw/{id}")
    }

    pub fn current_week(id: SotwId) -> String {
        format!("sotw/{id}/current_week")
    }

    pub fn invite(id: SotwId) -> String {
        format!("sotw/{id}/invite")
    }

    pub fn pending_invite(share_token: &str) -> String {
        format!("{PENDING_INVITE_PREFIX}{share_token}")
    }

    pub fn join_invite(share_token: &str) -> String {
        format!("sotw/invite/join/{share_token}")
    }
}

/// Weekly response endpoints
pub mod response {
    use sotw_model::SotwId;

    pub fn submit(id: SotwId, week_num: u32) -> String {
        format!("response/{id}/{week_num}")
    }
}

/// Results endpoints
pub mod results {
    use sotw_model::SotwId;

    pub fn for_week(id: SotwId, week_num: u32) -> String {
        format!("results/{id}/{week_num}")
    }
}
