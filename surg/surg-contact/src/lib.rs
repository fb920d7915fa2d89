//! Contact resolution between tool colliders and deformable particles.
//!
//! The deformable solver reports contacts as (surface primitive, collider)
//! pairs; this crate translates one step's contact list into per-body,
//! per-particle touches for a given tool collider:
//!
//! - [`ParticleOwnership`] - global solver index -> (body, local index)
//! - [`SimplexTable`] - simplex index -> contiguous particle range
//! - [`resolve_contacts`] - the pure per-step query
//! - [`closest_point_on_segment`] - the segment primitive shared with the
//!   cutting volume test
//!
//! # Resolution Pipeline
//!
//! ```text
//! contact list ──filter collider──> near contacts
//!              ──expand simplices──> global particle indices
//!              ──ownership table──> (body, local index) pairs
//! ```
//!
//! Expansion matters: with surface collision active the solver reports one
//! coarse simplex per touch, and resolving only the proxy would hide which
//! exact particles the tool touched. Every particle of the simplex range is
//! reported individually.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use surg_contact::{resolve_contacts, ParticleOwnership};
//! use surg_types::{BodyId, ColliderId, Contact};
//!
//! let mut ownership = ParticleOwnership::new();
//! ownership.register(10, BodyId::new(0), 0);
//! ownership.register(11, BodyId::new(0), 1);
//!
//! let jaw = ColliderId::new(7);
//! let contacts = [Contact::particle(11, jaw, 0.002, Point3::origin())];
//!
//! let touched = resolve_contacts(&contacts, jaw, &ownership, None, 0.01);
//! assert_eq!(touched.len(), 1);
//! assert_eq!(touched[0].local, 1);
//! ```

#![doc(html_root_url = "https://docs.rs/surg-contact/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

mod geometry;
mod ownership;
mod resolver;
mod simplex;

pub use geometry::closest_point_on_segment;
pub use ownership::ParticleOwnership;
pub use resolver::resolve_contacts;
pub use simplex::SimplexTable;
