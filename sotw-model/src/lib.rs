//! Wire data models shared by the Song of the Week client crates.
//!
//! Everything here mirrors the JSON the survey API sends and accepts. The
//! polymorphic payloads ([`PeriodPayload`], [`ResultsPayload`]) are decoded
//! into tagged unions so callers never handle an untyped blob.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod prelude;
pub mod response;
pub mod results;
pub mod sotw;
pub mod user;
pub mod week;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::{SotwId, UserId};
pub use response::{SongMatch, SurveyResponse};
pub use results::{GuessingRecord, Results, ResultsPayload, ResultsPending, SongTally};
pub use sotw::{MemberRef, Sotw, SotwCreate, SotwInfo, SotwInvite, SotwUpdate};
pub use user::{
    LoginCredentials, Membership, PasswordReset, PasswordResetRequest, RegisterForm,
    SpotifyAuthPayload, User, UserPlaylist, UserUpdate,
};
pub use week::{EnvelopeStatus, PeriodEnvelope, PeriodPayload, ResponseRef, Week};
