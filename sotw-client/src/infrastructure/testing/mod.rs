//! Test doubles for the client infrastructure.

pub mod fixtures;
pub mod stub_transport;

pub use stub_transport::{CallEvent, StubTransport};
