//! Glob-importable set of the types most client code touches.

pub use crate::ids::{SotwId, UserId};
pub use crate::results::{Results, ResultsPayload, ResultsPending};
pub use crate::sotw::{Sotw, SotwCreate, SotwInfo, SotwInvite, SotwUpdate};
pub use crate::user::{LoginCredentials, RegisterForm, User, UserUpdate};
pub use crate::week::{PeriodEnvelope, PeriodPayload, Week};
