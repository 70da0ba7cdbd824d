//! # Models
//!
//! Data carried through a provisioning run.
//!
//! - [`profile`] - seed, draft and hashed record for one profile
//! - [`outcome`] - per-task outcome and per-run report

pub mod outcome;
pub mod profile;

pub use outcome::{RunReport, TaskOutcome};
pub use profile::{MissingField, ProfileDraft, ProfileId, ProfileRecord, ProfileSeed};
