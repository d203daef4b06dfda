use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{SotwId, UserId};

/// One song-of-the-week group (a recurring survey competition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sotw {
    pub id: SotwId,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub playlist_link: Option<String>,
    #[serde(default)]
    pub master_playlist_link: Option<String>,
    #[serde(default)]
    pub soty_playlist_link: Option<String>,
    #[serde(default)]
    pub share_id: Option<String>,
    #[serde(default, alias = "memberList")]
    pub user_list: Vec<MemberRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload for creating a new group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SotwCreate {
    pub name: String,
    pub survey_datetime: DateTime<Utc>,
    pub results_datetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SotwUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_link: Option<String>,
}

/// Shareable invite link issued for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SotwInvite {
    pub url: String,
}

/// Minimal group info resolved from an invite share token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SotwInfo {
    pub id: SotwId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub already_in: bool,
}
