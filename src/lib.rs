//! Weekly technician incentive tracking for a home-services team.
//!
//! The heart of the crate is the [`incentives`] module: pure bonus math with a
//! compliance gate, a gamification pass deriving streaks and badges from stored
//! weeks, repository seams with in-memory implementations, and an axum router
//! plus a CSV history importer layered on top. [`config`], [`telemetry`], and
//! [`error`] carry the runtime scaffolding used by the binary.

pub mod config;
pub mod error;
pub mod incentives;
pub mod telemetry;
