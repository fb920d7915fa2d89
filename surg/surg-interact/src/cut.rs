//! Cutting: remove qualifying stitches from a target graph.

use nalgebra::{Point3, Vector3};

use surg_contact::closest_point_on_segment;
use surg_core::{Stitch, World};
use surg_types::{EventQueue, GraphId, InteractionConfig, InteractionEvent, Pose};

/// How the cutter consumes qualifying stitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutPolicy {
    /// One batch per attempt: every stitch qualifying this step is removed
    /// together, then the attempt is spent until intent is re-pressed.
    #[default]
    SingleShot,
    /// At most one stitch per step, for as long as intent stays held.
    Continuous,
}

/// The cutting volume: an oriented box fixed to the blade.
///
/// Purely a query volume (the trigger-collider analogue): it never appears
/// in the solver's contact list. A stitch qualifies when the closest point
/// on its endpoint segment to the volume center lies within the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutVolume {
    pose: Pose,
    half_extents: Vector3<f64>,
}

impl CutVolume {
    /// Create a volume from its pose and half-extents.
    #[must_use]
    pub const fn new(pose: Pose, half_extents: Vector3<f64>) -> Self {
        Self { pose, half_extents }
    }

    /// Center of the volume in solver coordinates.
    #[must_use]
    pub const fn center(&self) -> Point3<f64> {
        self.pose.position
    }

    /// Kinematic input: move the volume with the blade.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Whether a point lies within the volume bounds.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        let local = self.pose.inverse_transform_point(point);
        local.x.abs() <= self.half_extents.x
            && local.y.abs() <= self.half_extents.y
            && local.z.abs() <= self.half_extents.z
    }
}

/// Per-tool cutter over a target stitch graph.
///
/// [`cut`](Self::cut) is invoked once per fixed simulation step while the
/// blade exists; its only observable effects are stitch removal, the
/// [`InteractionEvent::StitchCut`] events, and the attempt flag.
#[derive(Debug)]
pub struct Cutter {
    volume: CutVolume,
    policy: CutPolicy,
    target: Option<GraphId>,
    intent: bool,
    cut_this_attempt: bool,
    warned_missing_graph: bool,
}

impl Cutter {
    /// Create a cutter with the given blade volume and policy.
    #[must_use]
    pub const fn new(volume: CutVolume, policy: CutPolicy) -> Self {
        Self {
            volume,
            policy,
            target: None,
            intent: false,
            cut_this_attempt: false,
            warned_missing_graph: false,
        }
    }

    /// Whether intent is currently held.
    #[must_use]
    pub const fn intent(&self) -> bool {
        self.intent
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> CutPolicy {
        self.policy
    }

    /// Switch policy (the procedure layer selects it per step kind).
    pub fn set_policy(&mut self, policy: CutPolicy) {
        self.policy = policy;
    }

    /// Retarget the cutter at a different graph.
    pub fn set_target(&mut self, target: Option<GraphId>) {
        self.target = target;
        self.warned_missing_graph = false;
    }

    /// The targeted graph, if any.
    #[must_use]
    pub const fn target(&self) -> Option<GraphId> {
        self.target
    }

    /// Kinematic input: move the cutting volume with the blade.
    pub fn set_volume_pose(&mut self, pose: Pose) {
        self.volume.set_pose(pose);
    }

    /// Set or release cut intent. Releasing clears the attempt flag.
    pub fn set_intent(&mut self, intent: bool) {
        self.intent = intent;
        if !intent {
            self.cut_this_attempt = false;
        }
    }

    /// Per-step cut pass.
    pub fn cut(&mut self, world: &mut World, config: &InteractionConfig, events: &mut EventQueue) {
        if !self.intent {
            return;
        }
        let Some(target) = self.target else {
            return;
        };
        if world.graph(target).is_none() {
            if !self.warned_missing_graph {
                tracing::warn!("cut target {target} is not registered; step degraded");
                self.warned_missing_graph = true;
            }
            return;
        }

        match self.policy {
            CutPolicy::SingleShot => self.cut_single_shot(world, config, events, target),
            CutPolicy::Continuous => self.cut_continuous(world, config, events, target),
        }
    }

    /// One batch per attempt: scan every stitch, queue all qualifiers,
    /// remove them in descending index order so earlier removals don't
    /// shift pending indices, then publish once. An attempt that matches
    /// nothing cancels its own intent.
    fn cut_single_shot(
        &mut self,
        world: &mut World,
        config: &InteractionConfig,
        events: &mut EventQueue,
        target: GraphId,
    ) {
        if self.cut_this_attempt {
            return;
        }

        let mut queued = Vec::new();
        if let Some(graph) = world.graph(target) {
            for (index, stitch) in graph.stitches().iter().enumerate() {
                if self.qualifies(world, stitch, config) {
                    queued.push(index);
                    self.cut_this_attempt = true;
                    events.push(InteractionEvent::StitchCut(target));
                }
            }
        }

        if queued.is_empty() {
            self.intent = false;
            return;
        }

        if let Some(graph) = world.graph_mut(target) {
            for &index in queued.iter().rev() {
                graph.remove(index);
            }
            graph.push_to_solver();
        }
        events.push(InteractionEvent::StitchCut(target));
    }

    /// At most one stitch per step: the first qualifier is removed and
    /// published immediately, the rest wait for later steps.
    fn cut_continuous(
        &mut self,
        world: &mut World,
        config: &InteractionConfig,
        events: &mut EventQueue,
        target: GraphId,
    ) {
        let mut found = None;
        if let Some(graph) = world.graph(target) {
            for (index, stitch) in graph.stitches().iter().enumerate() {
                if self.qualifies(world, stitch, config) {
                    found = Some(index);
                    break;
                }
            }
        }

        let Some(index) = found else {
            return;
        };
        if let Some(graph) = world.graph_mut(target) {
            graph.remove(index);
            graph.push_to_solver();
        }
        self.cut_this_attempt = true;
        events.push(InteractionEvent::StitchCut(target));
    }

    fn qualifies(&self, world: &World, stitch: &Stitch, config: &InteractionConfig) -> bool {
        let (Some(a), Some(b)) = (
            world.particle_position(stitch.a),
            world.particle_position(stitch.b),
        ) else {
            return false;
        };
        let closest =
            closest_point_on_segment(&a, &b, &self.volume.center(), config.segment_epsilon_sq);
        self.volume.contains(&closest)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use surg_core::{SoftBody, SoftParticle, StitchGraph};
    use surg_types::ParticleRef;

    /// Two parallel particle rows along X with `count` vertical stitches
    /// between them, spaced 0.1 apart, rows at y = 0 and y = 0.1.
    fn stitched_world(count: usize) -> (World, GraphId) {
        let mut world = World::new();
        let top = world.add_body(SoftBody::new(
            "duct_top",
            (0..count)
                .map(|i| SoftParticle::at(i, Point3::new(0.1 * i as f64, 0.1, 0.0)))
                .collect(),
        ));
        let bottom = world.add_body(SoftBody::new(
            "duct_bottom",
            (0..count)
                .map(|i| SoftParticle::at(count + i, Point3::new(0.1 * i as f64, 0.0, 0.0)))
                .collect(),
        ));
        let stitches = (0..count)
            .map(|i| Stitch::new(ParticleRef::new(top, i), ParticleRef::new(bottom, i)))
            .collect();
        let graph = world.add_graph(StitchGraph::new("suture_line", stitches));
        world.finish_startup();
        (world, graph)
    }

    /// A blade volume wide enough to cover stitches `[from, to]` (by X).
    fn blade_over(from: usize, to: usize) -> CutVolume {
        let x0 = 0.1 * from as f64;
        let x1 = 0.1 * to as f64;
        let center = Point3::new((x0 + x1) / 2.0, 0.05, 0.0);
        CutVolume::new(
            Pose::from_position(center),
            Vector3::new((x1 - x0) / 2.0 + 0.01, 0.2, 0.2),
        )
    }

    fn far_blade() -> CutVolume {
        CutVolume::new(
            Pose::from_position(Point3::new(10.0, 10.0, 10.0)),
            Vector3::new(0.1, 0.1, 0.1),
        )
    }

    #[test]
    fn test_volume_containment() {
        let volume = blade_over(0, 2);
        assert!(volume.contains(&Point3::new(0.1, 0.05, 0.0)));
        assert!(!volume.contains(&Point3::new(0.1, 0.05, 0.5)));
    }

    #[test]
    fn test_single_shot_removes_all_qualifiers_in_one_attempt() {
        let (mut world, graph) = stitched_world(5);
        let mut cutter = Cutter::new(blade_over(1, 3), CutPolicy::SingleShot);
        cutter.set_target(Some(graph));
        let mut events = EventQueue::new();

        cutter.set_intent(true);
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);

        let remaining = world.graph(graph).unwrap();
        assert_eq!(remaining.len(), 2);
        // Stitches 0 and 4 survive; removal in descending order never
        // shifted the queued indices.
        assert_eq!(remaining.stitches()[0].a.local, 0);
        assert_eq!(remaining.stitches()[1].a.local, 4);
        assert_eq!(remaining.generation(), 1);

        // One event per queued stitch plus the trailing batch event.
        let fired: Vec<_> = events.drain().collect();
        assert_eq!(fired.len(), 4);
        assert!(fired
            .iter()
            .all(|e| *e == InteractionEvent::StitchCut(graph)));
    }

    #[test]
    fn test_single_shot_is_spent_until_repress() {
        let (mut world, graph) = stitched_world(3);
        let mut cutter = Cutter::new(blade_over(0, 0), CutPolicy::SingleShot);
        cutter.set_target(Some(graph));
        let mut events = EventQueue::new();

        cutter.set_intent(true);
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);
        assert_eq!(world.graph(graph).unwrap().len(), 2);

        // Holding intent across further steps cuts nothing more.
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);
        assert_eq!(world.graph(graph).unwrap().len(), 2);

        // Re-press over the next stitch: a fresh attempt cuts again.
        cutter.set_intent(false);
        cutter.set_intent(true);
        cutter.set_volume_pose(Pose::from_position(Point3::new(0.1, 0.05, 0.0)));
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);
        assert_eq!(world.graph(graph).unwrap().len(), 1);
    }

    #[test]
    fn test_single_shot_empty_attempt_cancels_intent() {
        let (mut world, graph) = stitched_world(3);
        let mut cutter = Cutter::new(far_blade(), CutPolicy::SingleShot);
        cutter.set_target(Some(graph));
        let mut events = EventQueue::new();

        cutter.set_intent(true);
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);

        assert!(!cutter.intent());
        assert!(events.is_empty());
        assert_eq!(world.graph(graph).unwrap().len(), 3);
    }

    #[test]
    fn test_continuous_removes_one_per_step() {
        let (mut world, graph) = stitched_world(3);
        let mut cutter = Cutter::new(blade_over(0, 2), CutPolicy::Continuous);
        cutter.set_target(Some(graph));
        let mut events = EventQueue::new();

        cutter.set_intent(true);
        for expected_remaining in [2, 1, 0] {
            cutter.cut(&mut world, &InteractionConfig::default(), &mut events);
            assert_eq!(world.graph(graph).unwrap().len(), expected_remaining);
        }
        assert!(cutter.intent());
        assert_eq!(events.len(), 3);

        // Nothing left: further steps are no-ops.
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);
        assert_eq!(events.len(), 3);
        assert_eq!(world.graph(graph).unwrap().generation(), 3);
    }

    #[test]
    fn test_no_target_is_noop() {
        let (mut world, graph) = stitched_world(2);
        let mut cutter = Cutter::new(blade_over(0, 1), CutPolicy::SingleShot);
        let mut events = EventQueue::new();

        cutter.set_intent(true);
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);

        assert_eq!(world.graph(graph).unwrap().len(), 2);
        assert!(events.is_empty());
    }

    #[test]
    fn test_degenerate_stitch_uses_endpoint() {
        let mut world = World::new();
        let body = world.add_body(SoftBody::new(
            "knot",
            vec![SoftParticle::at(0, Point3::new(0.0, 0.0, 0.0))],
        ));
        let graph = world.add_graph(StitchGraph::new(
            "degenerate",
            vec![Stitch::new(
                ParticleRef::new(body, 0),
                ParticleRef::new(body, 0),
            )],
        ));
        world.finish_startup();

        let mut cutter = Cutter::new(
            CutVolume::new(Pose::identity(), Vector3::new(0.1, 0.1, 0.1)),
            CutPolicy::Continuous,
        );
        cutter.set_target(Some(graph));
        let mut events = EventQueue::new();

        cutter.set_intent(true);
        cutter.cut(&mut world, &InteractionConfig::default(), &mut events);

        assert!(world.graph(graph).unwrap().is_empty());
        assert_eq!(events.len(), 1);
    }
}
