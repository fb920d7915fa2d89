//! Identifier newtypes for the interaction layer.
//!
//! Each identity in the system gets its own newtype so a graph index can
//! never be passed where a body index is expected. Global solver particle
//! indices stay plain `usize` - they are array offsets into solver storage,
//! not identities this layer owns.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a deformable body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Unique identifier for an edge-graph (stitcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphId(pub u64);

impl GraphId {
    /// Create a new graph ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for GraphId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graph({})", self.0)
    }
}

/// Unique identifier for a tool collider.
///
/// Contacts report which collider they touched; each tool queries the
/// resolver with its own collider identity and ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColliderId(pub u64);

impl ColliderId {
    /// Create a new collider ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ColliderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ColliderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Collider({})", self.0)
    }
}

/// Unique identifier for a tool instance.
///
/// Attachments are keyed per tool so one tool releasing its grasp never
/// detaches what another tool holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToolId(pub u64);

impl ToolId {
    /// Create a new tool ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for ToolId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tool({})", self.0)
    }
}

/// A particle addressed by its owning body and local index.
///
/// Contact resolution translates global solver indices into these pairs;
/// everything downstream (grasp sets, clip groups, stitch endpoints) works
/// in body-local terms. Local indices are unique and stable for the body's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleRef {
    /// The owning deformable body.
    pub body: BodyId,
    /// Particle index local to the owning body.
    pub local: usize,
}

impl ParticleRef {
    /// Create a new particle reference.
    #[must_use]
    pub const fn new(body: BodyId, local: usize) -> Self {
        Self { body, local }
    }
}

impl std::fmt::Display for ParticleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.body, self.local)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        assert_eq!(BodyId::new(7).raw(), 7);
        assert_eq!(GraphId::from(9).raw(), 9);
        assert_eq!(ColliderId::new(1).raw(), 1);
        assert_eq!(ToolId::new(2).raw(), 2);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(BodyId::new(3).to_string(), "Body(3)");
        assert_eq!(GraphId::new(4).to_string(), "Graph(4)");
        assert_eq!(ParticleRef::new(BodyId::new(3), 12).to_string(), "Body(3)[12]");
    }

    #[test]
    fn test_particle_ref_equality() {
        let a = ParticleRef::new(BodyId::new(1), 5);
        let b = ParticleRef::new(BodyId::new(1), 5);
        let c = ParticleRef::new(BodyId::new(2), 5);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
