//! Solver-facing world state for the tool-tissue interaction layer.
//!
//! The deformable solver itself (integration, constraint solving) is an
//! external collaborator; this crate is the registry of everything it
//! exposes to the interaction layer, refreshed once per fixed step:
//!
//! - [`SoftBody`] - particles, named particle groups, per-particle poses
//! - [`StitchGraph`] - the removable constraint edges of a stitcher
//! - [`Attachment`] - a particle group bound to a tool transform
//! - [`World`] - the registry, the per-step contact frame, and the
//!   one-shot solver startup gate
//!
//! # Step Protocol
//!
//! ```text
//! solver step ──> World::begin_step(contacts)
//!             ──> controllers read bodies/groups/graphs, write attachments
//!             ──> solver observes attachment + graph generations, resyncs
//! ```
//!
//! The world is mutated only from the fixed-step callback; there is no
//! interior mutability and no locking anywhere in this crate.

#![doc(html_root_url = "https://docs.rs/surg-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod soft_body;
mod stitch;
mod world;

pub use soft_body::{SoftBody, SoftParticle, CLIP_GROUP};
pub use stitch::{Stitch, StitchGraph};
pub use world::{Attachment, World};
