//! Tool controllers: grasp, clip, and cut over deformable bodies.
//!
//! Each controller owns its per-tool state (grasp sets, clip states, the
//! attempt flag) and is driven from the fixed-step physics callback after
//! the solver has produced the step's contact list:
//!
//! - [`GraspController`] - accumulates touched particles into per-body
//!   grasp sets while intent is held and binds them to the tool transform
//! - [`ClipController`] - one-shot clip application to a body's named clip
//!   group, with spawned clip instances following the group's mean pose
//! - [`Cutter`] - removes qualifying stitches from a target graph under
//!   one of two policies ([`CutPolicy::SingleShot`], [`CutPolicy::Continuous`])
//!
//! # Attempt Semantics
//!
//! An *attempt* is one continuous press of an intent flag. Controllers are
//! driven every step while intent is held, so every per-attempt effect is
//! guarded by an attempt flag: a clip applies at most once per attempt, a
//! single-shot cut fires at most once per attempt, and a grasp or
//! single-shot cut that touches nothing cancels its own intent at the end
//! of the step - the next press is a brand-new attempt.
//!
//! No controller retries on its own; cancellation is flag-driven and
//! synchronous.

#![doc(html_root_url = "https://docs.rs/surg-interact/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod clip;
mod cut;
mod grasp;

pub use clip::{ClipController, ClipInstance};
pub use cut::{CutPolicy, CutVolume, Cutter};
pub use grasp::{GraspController, GraspPhase};
