//! The world registry: everything the external solver exposes per step.

use hashbrown::HashMap;
use nalgebra::{Point3, UnitQuaternion};

use surg_contact::{ParticleOwnership, SimplexTable};
use surg_types::{BodyId, Contact, GraphId, ParticleRef, Pose, Result, SurgError, ToolId};

use crate::{SoftBody, StitchGraph};

/// A particle group bound to a tool transform.
///
/// The grasp controller rebuilds the group to exactly its current grasp set
/// on every attachment request; re-attachment replaces, never accumulates.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Local particle indices of the attached group.
    pub particles: Vec<usize>,
    /// The tool transform the group is bound to.
    pub target: Pose,
}

/// Registry of solver-visible state: bodies, stitch graphs, the particle
/// ownership table, the per-step contact frame, and tool attachments.
///
/// # Startup Gate
///
/// The solver signals the end of its own startup exactly once through
/// [`World::finish_startup`]; consumers that build lookup tables call
/// [`World::require_ready`] once during their initialization and fail fast
/// with [`SurgError::SolverNotReady`] instead of polling.
#[derive(Debug, Default)]
pub struct World {
    bodies: HashMap<BodyId, SoftBody>,
    body_names: HashMap<String, BodyId>,
    graphs: HashMap<GraphId, StitchGraph>,
    graph_names: HashMap<String, GraphId>,
    ownership: ParticleOwnership,
    simplices: Option<SimplexTable>,
    contacts: Vec<Contact>,
    attachments: HashMap<(ToolId, BodyId), Attachment>,
    next_body_id: u64,
    next_graph_id: u64,
    ready: bool,
}

impl World {
    /// Create an empty world. The startup gate begins closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Startup gate
    // ------------------------------------------------------------------

    /// Mark the solver's own startup as complete.
    pub fn finish_startup(&mut self) {
        self.ready = true;
    }

    /// Whether the solver has completed startup.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Fail fast when the solver has not completed startup.
    ///
    /// # Errors
    ///
    /// Returns [`SurgError::SolverNotReady`] before
    /// [`finish_startup`](Self::finish_startup) has been called.
    pub fn require_ready(&self) -> Result<()> {
        if self.ready {
            Ok(())
        } else {
            Err(SurgError::SolverNotReady)
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Add a body, registering its particles in the ownership table.
    ///
    /// Global indices already owned by another body are data errors; the
    /// first owner wins (warned inside the ownership table).
    pub fn add_body(&mut self, body: SoftBody) -> BodyId {
        let id = BodyId::new(self.next_body_id);
        self.next_body_id += 1;

        for (local, particle) in body.particles().iter().enumerate() {
            self.ownership.register(particle.solver_index, id, local);
        }
        self.body_names.insert(body.name().to_owned(), id);
        self.bodies.insert(id, body);
        id
    }

    /// Add a stitch graph.
    pub fn add_graph(&mut self, graph: StitchGraph) -> GraphId {
        let id = GraphId::new(self.next_graph_id);
        self.next_graph_id += 1;

        self.graph_names.insert(graph.name().to_owned(), id);
        self.graphs.insert(id, graph);
        id
    }

    /// Remove a body and its ownership entries.
    pub fn remove_body(&mut self, id: BodyId) -> Option<SoftBody> {
        let body = self.bodies.remove(&id)?;
        self.body_names.remove(body.name());
        self.ownership.unregister_body(id);
        self.attachments.retain(|&(_, b), _| b != id);
        Some(body)
    }

    /// Install the simplex-range table (surface collision active).
    pub fn set_simplex_table(&mut self, table: SimplexTable) {
        self.simplices = Some(table);
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// A body by ID.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&SoftBody> {
        self.bodies.get(&id)
    }

    /// Mutable access to a body by ID.
    #[must_use]
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut SoftBody> {
        self.bodies.get_mut(&id)
    }

    /// A body ID by name.
    #[must_use]
    pub fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.body_names.get(name).copied()
    }

    /// A graph by ID.
    #[must_use]
    pub fn graph(&self, id: GraphId) -> Option<&StitchGraph> {
        self.graphs.get(&id)
    }

    /// Mutable access to a graph by ID.
    #[must_use]
    pub fn graph_mut(&mut self, id: GraphId) -> Option<&mut StitchGraph> {
        self.graphs.get_mut(&id)
    }

    /// A graph ID by name.
    #[must_use]
    pub fn graph_by_name(&self, name: &str) -> Option<GraphId> {
        self.graph_names.get(name).copied()
    }

    /// Number of registered bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The global particle ownership table.
    #[must_use]
    pub const fn ownership(&self) -> &ParticleOwnership {
        &self.ownership
    }

    /// The simplex-range table, when surface collision is active.
    #[must_use]
    pub fn simplex_table(&self) -> Option<&SimplexTable> {
        self.simplices.as_ref()
    }

    /// Position of a particle, resolved through its owning body.
    #[must_use]
    pub fn particle_position(&self, particle: ParticleRef) -> Option<Point3<f64>> {
        self.bodies.get(&particle.body)?.position(particle.local)
    }

    /// Orientation of a particle, resolved through its owning body.
    #[must_use]
    pub fn particle_orientation(&self, particle: ParticleRef) -> Option<UnitQuaternion<f64>> {
        self.bodies.get(&particle.body)?.orientation(particle.local)
    }

    // ------------------------------------------------------------------
    // Per-step contact frame
    // ------------------------------------------------------------------

    /// Install this step's contact list, discarding the previous one.
    ///
    /// Contacts are valid only for the step they were reported in.
    pub fn begin_step(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    /// This step's contacts.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    // ------------------------------------------------------------------
    // Attachments
    // ------------------------------------------------------------------

    /// Bind a particle group on `body` to `target` for `tool`.
    ///
    /// Replaces any existing group for the (tool, body) pair. Returns
    /// `false` without attaching when the body is unknown or does not
    /// support attachments; the caller treats that as "feature absent".
    pub fn attach(
        &mut self,
        tool: ToolId,
        body: BodyId,
        particles: Vec<usize>,
        target: Pose,
    ) -> bool {
        let supported = self
            .bodies
            .get(&body)
            .is_some_and(SoftBody::supports_attachment);
        if !supported {
            return false;
        }
        self.attachments
            .insert((tool, body), Attachment { particles, target });
        true
    }

    /// Remove every attachment held by `tool`.
    pub fn detach_all(&mut self, tool: ToolId) {
        self.attachments.retain(|&(t, _), _| t != tool);
    }

    /// The attachment `tool` holds on `body`, if any.
    #[must_use]
    pub fn attachment(&self, tool: ToolId, body: BodyId) -> Option<&Attachment> {
        self.attachments.get(&(tool, body))
    }

    /// Whether `tool` currently holds any attachment.
    #[must_use]
    pub fn has_attachments(&self, tool: ToolId) -> bool {
        self.attachments.keys().any(|&(t, _)| t == tool)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::SoftParticle;

    fn small_body(name: &str, first_global: usize) -> SoftBody {
        SoftBody::new(
            name,
            vec![
                SoftParticle::at(first_global, Point3::new(0.0, 0.0, 0.0)),
                SoftParticle::at(first_global + 1, Point3::new(0.1, 0.0, 0.0)),
            ],
        )
        .with_attachment_support()
    }

    #[test]
    fn test_startup_gate() {
        let mut world = World::new();
        assert_eq!(world.require_ready(), Err(SurgError::SolverNotReady));

        world.finish_startup();
        assert!(world.require_ready().is_ok());
        assert!(world.is_ready());
    }

    #[test]
    fn test_add_body_registers_ownership() {
        let mut world = World::new();
        let id = world.add_body(small_body("duct", 10));

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.body_by_name("duct"), Some(id));
        assert_eq!(
            world.ownership().lookup(11),
            Some(ParticleRef::new(id, 1))
        );
        assert_eq!(
            world.particle_position(ParticleRef::new(id, 1)),
            Some(Point3::new(0.1, 0.0, 0.0))
        );
    }

    #[test]
    fn test_remove_body_clears_ownership_and_attachments() {
        let mut world = World::new();
        let id = world.add_body(small_body("duct", 10));
        let tool = ToolId::new(0);
        assert!(world.attach(tool, id, vec![0], Pose::identity()));

        world.remove_body(id);
        assert_eq!(world.ownership().lookup(10), None);
        assert!(world.attachment(tool, id).is_none());
        assert_eq!(world.body_by_name("duct"), None);
    }

    #[test]
    fn test_attach_replaces_group() {
        let mut world = World::new();
        let id = world.add_body(small_body("duct", 10));
        let tool = ToolId::new(3);

        assert!(world.attach(tool, id, vec![0], Pose::identity()));
        assert!(world.attach(tool, id, vec![0, 1], Pose::identity()));

        let attachment = world.attachment(tool, id).unwrap();
        assert_eq!(attachment.particles, vec![0, 1]);
    }

    #[test]
    fn test_attach_requires_capability() {
        let mut world = World::new();
        let plain = SoftBody::new(
            "liver",
            vec![SoftParticle::at(50, Point3::origin())],
        );
        let id = world.add_body(plain);

        assert!(!world.attach(ToolId::new(0), id, vec![0], Pose::identity()));
        assert!(world.attachment(ToolId::new(0), id).is_none());
    }

    #[test]
    fn test_detach_all_is_per_tool() {
        let mut world = World::new();
        let id = world.add_body(small_body("duct", 10));
        let grasper = ToolId::new(1);
        let other = ToolId::new(2);

        world.attach(grasper, id, vec![0], Pose::identity());
        world.attach(other, id, vec![1], Pose::identity());

        world.detach_all(grasper);
        assert!(!world.has_attachments(grasper));
        assert!(world.has_attachments(other));
    }

    #[test]
    fn test_begin_step_replaces_contacts() {
        let mut world = World::new();
        world.begin_step(vec![Contact::particle(
            0,
            surg_types::ColliderId::new(1),
            0.0,
            Point3::origin(),
        )]);
        assert_eq!(world.contacts().len(), 1);

        world.begin_step(Vec::new());
        assert!(world.contacts().is_empty());
    }
}
