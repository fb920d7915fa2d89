//! Solver contact reports.
//!
//! The deformable solver reports, once per fixed step, every near-contact
//! between a surface primitive on the deformable side and a collider on the
//! tool side. Contacts are valid only for the step they were reported in;
//! [`crate::EventQueue`] and downstream state carry nothing across steps.

use nalgebra::Point3;

use crate::ColliderId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The deformable-side primitive of a contact.
///
/// With point collision the solver reports the global particle index
/// directly. With surface collision it reports a simplex - a coarse proxy
/// covering a contiguous range of particles - which the resolver expands so
/// the proxy cannot hide which exact particles were touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ContactPrimitive {
    /// A single global solver particle index.
    Particle(usize),
    /// A simplex index into the solver's simplex-range table.
    Simplex(usize),
}

/// One solver contact against a tool collider, valid for the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contact {
    /// The deformable-side surface primitive.
    pub primitive: ContactPrimitive,
    /// The tool-side collider.
    pub collider: ColliderId,
    /// Signed distance; negative means penetrating.
    pub distance: f64,
    /// Contact point in solver coordinates.
    pub point: Point3<f64>,
}

impl Contact {
    /// Create a contact against a single particle.
    #[must_use]
    pub const fn particle(
        global_index: usize,
        collider: ColliderId,
        distance: f64,
        point: Point3<f64>,
    ) -> Self {
        Self {
            primitive: ContactPrimitive::Particle(global_index),
            collider,
            distance,
            point,
        }
    }

    /// Create a contact against a surface simplex.
    #[must_use]
    pub const fn simplex(
        simplex_index: usize,
        collider: ColliderId,
        distance: f64,
        point: Point3<f64>,
    ) -> Self {
        Self {
            primitive: ContactPrimitive::Simplex(simplex_index),
            collider,
            distance,
            point,
        }
    }
}
