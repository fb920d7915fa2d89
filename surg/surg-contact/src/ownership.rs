//! Global particle ownership table.

use hashbrown::HashMap;

use surg_types::{BodyId, ParticleRef};

/// Many-to-one lookup from global solver particle index to the owning
/// (body, local index) pair.
///
/// Built once after the solver finishes its own startup; the solver never
/// reassigns a live particle, so entries are stable until a body is removed.
#[derive(Debug, Clone, Default)]
pub struct ParticleOwnership {
    owners: HashMap<usize, ParticleRef>,
}

impl ParticleOwnership {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a global index as owned by `body` at `local`.
    ///
    /// Double registration of a global index is a data error: the first
    /// owner wins, a warning is logged, and `false` is returned.
    pub fn register(&mut self, global: usize, body: BodyId, local: usize) -> bool {
        match self.owners.entry(global) {
            hashbrown::hash_map::Entry::Occupied(existing) => {
                tracing::warn!(
                    "global particle {global} already owned by {}, ignoring re-registration by {body}",
                    existing.get().body,
                );
                false
            }
            hashbrown::hash_map::Entry::Vacant(slot) => {
                slot.insert(ParticleRef::new(body, local));
                true
            }
        }
    }

    /// Remove every entry owned by `body` (body despawned).
    pub fn unregister_body(&mut self, body: BodyId) {
        self.owners.retain(|_, owner| owner.body != body);
    }

    /// Look up the owner of a global index.
    ///
    /// Returns `None` for indices owned by no deformable body (rigid
    /// proxies, freed particles).
    #[must_use]
    pub fn lookup(&self, global: usize) -> Option<ParticleRef> {
        self.owners.get(&global).copied()
    }

    /// Number of registered particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
