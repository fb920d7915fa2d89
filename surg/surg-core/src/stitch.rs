//! Stitch graphs (stitchers): removable constraint edges between particles.

use surg_types::ParticleRef;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A removable constraint edge linking two particles, used to model a
/// suture or attachment line. The pair is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stitch {
    /// One endpoint.
    pub a: ParticleRef,
    /// The other endpoint.
    pub b: ParticleRef,
}

impl Stitch {
    /// Create a stitch between two particles.
    #[must_use]
    pub const fn new(a: ParticleRef, b: ParticleRef) -> Self {
        Self { a, b }
    }
}

/// The ordered stitch collection of one stitcher.
///
/// Removal goes through [`StitchGraph::remove`], which preserves the order
/// of the remaining stitches and marks the graph dirty;
/// [`StitchGraph::push_to_solver`] publishes the change by bumping the
/// generation the solver binding watches.
#[derive(Debug, Clone)]
pub struct StitchGraph {
    name: String,
    stitches: Vec<Stitch>,
    dirty: bool,
    generation: u64,
}

impl StitchGraph {
    /// Create a graph from its initial stitches.
    #[must_use]
    pub fn new(name: impl Into<String>, stitches: Vec<Stitch>) -> Self {
        Self {
            name: name.into(),
            stitches,
            dirty: false,
            generation: 0,
        }
    }

    /// Name of this graph.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stitches in order.
    #[must_use]
    pub fn stitches(&self) -> &[Stitch] {
        &self.stitches
    }

    /// Number of stitches remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stitches.len()
    }

    /// Whether every stitch has been removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }

    /// Remove the stitch at `index`, preserving the order of the rest.
    ///
    /// Returns the removed stitch, or `None` for an out-of-range index.
    /// Each successful removal decreases the count by exactly one and marks
    /// the graph dirty until the next [`push_to_solver`](Self::push_to_solver).
    pub fn remove(&mut self, index: usize) -> Option<Stitch> {
        if index >= self.stitches.len() {
            return None;
        }
        let removed = self.stitches.remove(index);
        self.dirty = true;
        Some(removed)
    }

    /// Publish pending removals to the solver.
    ///
    /// Bumps the generation counter the solver binding observes and clears
    /// the dirty flag. Calling with no pending change is a no-op.
    pub fn push_to_solver(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.generation += 1;
        }
    }

    /// Whether removals are pending a solver push.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of solver pushes so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
