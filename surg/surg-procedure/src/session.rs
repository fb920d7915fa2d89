//! The fixed-step session harness.

use surg_core::World;
use surg_interact::{ClipController, CutPolicy, Cutter, GraspController};
use surg_types::{Contact, EventQueue, InteractionConfig, InteractionEvent, Pose, Result};

use crate::step::{ChecklistItem, StepKind, StepSetup, StepTarget};
use crate::Procedure;

/// Owns the world, one controller of each kind, the event queue, and the
/// procedure machine, and runs them in the required per-step order.
///
/// Everything happens inside [`fixed_step`](Session::fixed_step), strictly
/// after the solver has produced the step's contact list:
///
/// 1. install the contacts,
/// 2. main interaction pass (grasp, clip, cut),
/// 3. clip instance pose-following,
/// 4. late pass (grasp auto-cancel, which must see this step's fully
///    accumulated state),
/// 5. drain completion events into the procedure machine,
/// 6. re-apply the active step's controller configuration when it changed.
///
/// Construction checks the solver's startup gate once and fails fast; there
/// is no polling loop anywhere.
#[derive(Debug)]
pub struct Session {
    world: World,
    config: InteractionConfig,
    grasp: GraspController,
    clip: ClipController,
    cutter: Cutter,
    procedure: Procedure,
    events: EventQueue,
    notifications: Vec<InteractionEvent>,
    active: Option<StepSetup>,
}

impl Session {
    /// Assemble a session over a ready world.
    ///
    /// # Errors
    ///
    /// - [`surg_types::SurgError::SolverNotReady`] when the solver's
    ///   startup gate is still closed
    /// - [`surg_types::SurgError::InvalidConfig`] for bad thresholds
    pub fn new(
        world: World,
        config: InteractionConfig,
        grasp: GraspController,
        clip: ClipController,
        cutter: Cutter,
        procedure: Procedure,
    ) -> Result<Self> {
        world.require_ready()?;
        config.validate()?;

        let mut session = Self {
            world,
            config,
            grasp,
            clip,
            cutter,
            procedure,
            events: EventQueue::new(),
            notifications: Vec::new(),
            active: None,
        };
        session.apply_active_setup();
        Ok(session)
    }

    /// Run one fixed simulation step with the solver's contact list.
    pub fn fixed_step(&mut self, contacts: Vec<Contact>) {
        self.world.begin_step(contacts);

        // Main interaction pass.
        self.grasp.step(&mut self.world, &self.config);
        if self.active_kind() == Some(StepKind::Clip) {
            self.clip.step(&self.world, &self.config, &mut self.events);
        }
        self.cutter.cut(&mut self.world, &self.config, &mut self.events);

        // Spawned clips track their groups every step.
        self.clip.follow(&self.world);

        // Late pass: the auto-cancel decision sees this step's state.
        self.grasp.late_step();

        self.pump_events();
    }

    // ------------------------------------------------------------------
    // Tool-input surface
    // ------------------------------------------------------------------

    /// Set or release grasp intent.
    pub fn set_grasp_intent(&mut self, intent: bool) {
        self.grasp.set_intent(intent, &mut self.world);
    }

    /// Set or release clip intent.
    pub fn set_clip_intent(&mut self, intent: bool) {
        self.clip.set_intent(intent);
    }

    /// Set or release cut intent.
    pub fn set_cut_intent(&mut self, intent: bool) {
        self.cutter.set_intent(intent);
    }

    /// Kinematic input: the grasper's tool transform.
    pub fn set_grasp_pose(&mut self, pose: Pose) {
        self.grasp.set_tool_pose(pose);
    }

    /// Kinematic input: the blade's cutting-volume transform.
    pub fn set_blade_pose(&mut self, pose: Pose) {
        self.cutter.set_volume_pose(pose);
    }

    /// Externally complete a terminal action step by name (e.g. the
    /// extraction trigger zone reporting).
    pub fn complete_action_step(&mut self, name: &str) -> bool {
        let found = self.procedure.complete_action(name, &mut self.events);
        self.pump_events();
        found
    }

    // ------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------

    /// The checklist projection for UI rendering.
    #[must_use]
    pub fn checklist(&self) -> Vec<ChecklistItem> {
        self.procedure.checklist()
    }

    /// Whether the whole procedure has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.procedure.is_finished()
    }

    /// Take the `LevelAdvanced` / `ProcedureFinished` notifications raised
    /// since the last call, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.notifications)
    }

    /// The world registry.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for the solver's per-step state push.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The grasp controller.
    #[must_use]
    pub const fn grasp(&self) -> &GraspController {
        &self.grasp
    }

    /// The clip controller.
    #[must_use]
    pub const fn clip(&self) -> &ClipController {
        &self.clip
    }

    /// The cutter.
    #[must_use]
    pub const fn cutter(&self) -> &Cutter {
        &self.cutter
    }

    /// The procedure machine.
    #[must_use]
    pub const fn procedure(&self) -> &Procedure {
        &self.procedure
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn active_kind(&self) -> Option<StepKind> {
        self.active.map(|setup| setup.kind)
    }

    /// Drain completion events into the procedure machine. Events the
    /// machine itself raised (`LevelAdvanced`, `ProcedureFinished`) are
    /// routed to the notification buffer for the UI layer; they are pushed
    /// onto the same queue mid-drain, so the loop runs until it is empty.
    fn pump_events(&mut self) {
        while let Some(event) = self.events.pop() {
            match event {
                InteractionEvent::Clipped(_) | InteractionEvent::StitchCut(_) => {
                    self.procedure
                        .handle_event(&event, &self.world, &mut self.events);
                }
                InteractionEvent::LevelAdvanced(_) | InteractionEvent::ProcedureFinished => {
                    self.notifications.push(event);
                }
            }
        }
        self.apply_active_setup();
    }

    /// Re-configure the controllers for the active step when it changed:
    /// the cutter is targeted and given its policy for cut steps and
    /// disarmed otherwise; the clip controller is stepped only during clip
    /// steps.
    fn apply_active_setup(&mut self) {
        let setup = self.procedure.active_setup();
        if setup == self.active {
            return;
        }
        self.active = setup;

        match setup {
            Some(StepSetup {
                kind: StepKind::Cut,
                target: StepTarget::Graph(graph),
            }) => {
                self.cutter.set_policy(CutPolicy::SingleShot);
                self.cutter.set_target(Some(graph));
            }
            Some(StepSetup {
                kind: StepKind::ContinuousCut,
                target: StepTarget::Graph(graph),
            }) => {
                self.cutter.set_policy(CutPolicy::Continuous);
                self.cutter.set_target(Some(graph));
            }
            _ => {
                self.cutter.set_target(None);
            }
        }
        tracing::debug!("active step setup changed: {setup:?}");
    }
}
