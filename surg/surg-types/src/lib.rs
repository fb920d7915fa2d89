//! Core types for surgical tool-tissue interaction.
//!
//! This crate provides the foundational types for the interaction layer of a
//! surgical procedure trainer:
//!
//! - [`BodyId`], [`GraphId`], [`ColliderId`], [`ToolId`] - identifiers
//! - [`ParticleRef`] - a (body, local particle index) pair
//! - [`Pose`] - position + orientation of tools and attachment targets
//! - [`Contact`] - one step's solver contact against a tool collider
//! - [`InteractionEvent`] / [`EventQueue`] - completion event plumbing
//! - [`InteractionConfig`] - thresholds and epsilons
//! - [`SurgError`] - the shared error enum
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no behavior beyond construction,
//! projection, and validation. They're the common language between:
//!
//! - The deformable solver boundary (contacts, particle ownership)
//! - Tool interaction controllers (grasp, clip, cut)
//! - The procedure state machine and its checklist projection
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero engine dependencies**. It can be used
//! in headless tests, tooling, and any host engine binding.
//!
//! # Example
//!
//! ```
//! use surg_types::{BodyId, ParticleRef};
//!
//! let body = BodyId::new(3);
//! let touched = ParticleRef::new(body, 17);
//! assert_eq!(touched.body, body);
//! assert_eq!(touched.local, 17);
//! ```

#![doc(html_root_url = "https://docs.rs/surg-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod config;
mod contact;
mod error;
mod event;
mod ids;
mod pose;

pub use config::InteractionConfig;
pub use contact::{Contact, ContactPrimitive};
pub use error::SurgError;
pub use event::{EventQueue, InteractionEvent};
pub use ids::{BodyId, ColliderId, GraphId, ParticleRef, ToolId};
pub use pose::Pose;

// Re-export math types for convenience
pub use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

/// Result type for interaction-layer operations.
pub type Result<T> = std::result::Result<T, SurgError>;
