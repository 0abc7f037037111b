//! # Sessions
//!
//! Per-user interaction state: one [`SessionContext`] (and so one ledger)
//! per session, tracked by a [`SessionRegistry`].

pub mod context;
pub mod errors;
pub mod input;
pub mod registry;

pub use context::SessionContext;
pub use errors::{InputError, SessionError, SessionResult};
pub use input::{ExperienceInput, InputBounds};
pub use registry::{SessionHandle, SessionRegistry, SinkPolicy, SinkScope};
