//! Grasping: accumulate touched particles and bind them to the tool.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use surg_contact::resolve_contacts;
use surg_core::World;
use surg_types::{BodyId, ColliderId, InteractionConfig, Pose, ToolId};

/// Grasp lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraspPhase {
    /// No intent held, nothing grasped.
    Idle,
    /// Intent held, still accumulating touched particles.
    Attempting,
    /// At least one body has a non-empty grasp set and is attached.
    Holding,
}

/// Per-tool grasp controller.
///
/// While intent is held and nothing is grasped yet, every step's contacts
/// are resolved and the touched local indices are unioned into per-body
/// grasp sets (inserting an already-present index is a no-op). As soon as
/// any body's set is non-empty, that body's attachment group is rebuilt to
/// exactly the set contents and bound to the tool transform; repeated
/// attachment replaces the group, never accumulates.
///
/// A late-step check runs after the main resolution pass of the same step:
/// if intent is held but nothing was grasped, intent is forced false - a
/// grasp attempt that touched nothing cancels itself, and every trigger
/// press is a fresh attempt.
#[derive(Debug)]
pub struct GraspController {
    tool: ToolId,
    collider: ColliderId,
    tool_pose: Pose,
    intent: bool,
    phase: GraspPhase,
    grasped: HashMap<BodyId, BTreeSet<usize>>,
}

impl GraspController {
    /// Create a controller for a tool and its jaw collider.
    #[must_use]
    pub fn new(tool: ToolId, collider: ColliderId) -> Self {
        Self {
            tool,
            collider,
            tool_pose: Pose::identity(),
            intent: false,
            phase: GraspPhase::Idle,
            grasped: HashMap::new(),
        }
    }

    /// The tool this controller belongs to.
    #[must_use]
    pub const fn tool(&self) -> ToolId {
        self.tool
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> GraspPhase {
        self.phase
    }

    /// Whether intent is currently held.
    #[must_use]
    pub const fn intent(&self) -> bool {
        self.intent
    }

    /// Whether the tool is holding an attached grasp.
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.phase == GraspPhase::Holding
    }

    /// Kinematic input: the tool transform attachments bind to.
    pub fn set_tool_pose(&mut self, pose: Pose) {
        self.tool_pose = pose;
    }

    /// The grasp set accumulated on a body, if any.
    #[must_use]
    pub fn grasped(&self, body: BodyId) -> Option<&BTreeSet<usize>> {
        self.grasped.get(&body)
    }

    /// Set or release grasp intent.
    ///
    /// Releasing detaches every attachment this tool holds and clears all
    /// grasp sets; the in-flight attempt ends synchronously.
    pub fn set_intent(&mut self, intent: bool, world: &mut World) {
        if intent {
            if self.phase == GraspPhase::Idle {
                self.phase = GraspPhase::Attempting;
            }
            self.intent = true;
        } else {
            world.detach_all(self.tool);
            self.grasped.clear();
            self.phase = GraspPhase::Idle;
            self.intent = false;
        }
    }

    /// Main per-step pass: resolve contacts, accumulate grasp sets, attach.
    ///
    /// Runs inside the fixed-step callback, after the solver has produced
    /// this step's contact list.
    pub fn step(&mut self, world: &mut World, config: &InteractionConfig) {
        if !self.intent || self.phase == GraspPhase::Holding {
            return;
        }
        self.phase = GraspPhase::Attempting;

        let touched = resolve_contacts(
            world.contacts(),
            self.collider,
            world.ownership(),
            world.simplex_table(),
            config.contact_distance,
        );
        for particle in touched {
            self.grasped
                .entry(particle.body)
                .or_default()
                .insert(particle.local);
        }

        if self.grasped.values().any(|set| !set.is_empty()) {
            for (&body, set) in &self.grasped {
                if set.is_empty() {
                    continue;
                }
                // Bodies without attachment support are skipped silently:
                // the grasp set still counts as a successful attempt.
                world.attach(self.tool, body, set.iter().copied().collect(), self.tool_pose);
            }
            self.phase = GraspPhase::Holding;
        }
    }

    /// Late per-step pass: auto-cancel an attempt that touched nothing.
    ///
    /// Must run after [`step`](Self::step) of the *same* simulation step so
    /// the decision sees this step's fully-accumulated state.
    pub fn late_step(&mut self) {
        if self.intent
            && self.phase == GraspPhase::Attempting
            && self.grasped.values().all(BTreeSet::is_empty)
        {
            self.intent = false;
            self.phase = GraspPhase::Idle;
        }
    }
}
