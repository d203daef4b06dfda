use serde::{Deserialize, Serialize};

use crate::ids::{SotwId, UserId};

/// One scheduled round ("week") of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub id: String,
    pub week_num: u32,
    #[serde(default)]
    pub playlist_link: String,
    pub sotw_id: SotwId,
    /// Millisecond timestamp of the next results release.
    #[serde(default)]
    pub next_results_release: Option<f64>,
    #[serde(default)]
    pub survey: String,
    #[serde(default = "default_is_current")]
    pub is_current: bool,
    #[serde(default)]
    pub responses: Vec<ResponseRef>,
}

fn default_is_current() -> bool {
    true
}

/// Responses are sent either as bare ids or as summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseRef {
    Id(i64),
    Summary {
        #[serde(default)]
        id: Option<i64>,
        submitter_id: UserId,
    },
}

/// Envelope status is a label (`"closed"`) or an HTTP-like code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeStatus {
    Code(u16),
    Label(String),
}

/// Business-rule envelope: a successful response that carries a message
/// explaining why no usable week is available (e.g. survey not open yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEnvelope {
    pub status: EnvelopeStatus,
    pub message: String,
    #[serde(default)]
    pub week: Option<Week>,
}

/// Decoded body of the current-week endpoint.
///
/// The envelope variant is tried first; a bare week never carries both
/// `status` and `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodPayload {
    Envelope(PeriodEnvelope),
    Week(Week),
}
