//! Procedure sequencing over the tool-tissue interaction layer.
//!
//! A procedure is an ordered list of levels, each holding steps bound to
//! one target body or stitch graph. The state machine advances exactly
//! once per qualifying physical event, despite contacts being reported
//! every simulation step and events possibly arriving multiple times per
//! step:
//!
//! - [`ProcedureStep`] / [`Level`] - the gated units of the sequence
//! - [`Procedure`] - the event-driven state machine and checklist
//!   projection
//! - [`Session`] - the fixed-step harness wiring world, controllers,
//!   events, and machine in order
//!
//! # Event Flow
//!
//! ```text
//! solver contacts ──> controllers ──> InteractionEvent queue
//!                                          │
//!                     Procedure <──drain───┘   (late in the same step)
//!                        │
//!                        └──> checklist projection, LevelAdvanced,
//!                             ProcedureFinished
//! ```
//!
//! Completion is edge-exact: an event matching an already-complete step is
//! absorbed, and a cut step completes only when its whole graph reports
//! zero remaining stitches, not on every per-stitch event.

#![doc(html_root_url = "https://docs.rs/surg-procedure/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod machine;
mod session;
mod step;

pub use machine::Procedure;
pub use session::Session;
pub use step::{ChecklistItem, Level, ProcedureStep, StepKind, StepSetup, StepTarget};
