use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Weekly survey submission.
///
/// Week zero only nominates the next song; later weeks also pick two
/// favourites and guess who submitted which song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub next_song: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_song_1: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_song_2: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_user_songs: Vec<SongMatch>,
}

impl SurveyResponse {
    pub fn nomination(next_song: impl Into<String>) -> Self {
        Self {
            next_song: next_song.into(),
            picked_song_1: None,
            picked_song_2: None,
            matched_user_songs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongMatch {
    pub song_id: i64,
    pub user_id: UserId,
}
