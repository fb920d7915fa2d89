//! The procedure state machine.

use surg_core::{StitchGraph, World};
use surg_types::{EventQueue, InteractionEvent, Result, SurgError};

use crate::step::{ChecklistItem, Level, ProcedureStep, StepKind, StepSetup, StepTarget};

/// Event-driven procedure sequencer.
///
/// The level index lives in `[0, N)` and is monotonically non-decreasing;
/// `index == N` is terminal. Completion listeners scan levels linearly for
/// the first incomplete step matching the event payload, so re-entrant
/// events and events for already-complete steps are absorbed without
/// duplicate advancement.
///
/// Every step target is validated against the world at construction:
/// a missing body or graph is a fatal configuration error.
#[derive(Debug)]
pub struct Procedure {
    levels: Vec<Level>,
    current: usize,
    revision: u64,
}

impl Procedure {
    /// Build a procedure, failing fast on configuration errors.
    ///
    /// # Errors
    ///
    /// - [`SurgError::EmptyProcedure`] / [`SurgError::EmptyLevel`] for a
    ///   sequence with nothing to do
    /// - [`SurgError::InvalidBodyId`] / [`SurgError::InvalidGraphId`] when
    ///   a step targets a body or graph the world does not hold
    pub fn new(levels: Vec<Level>, world: &World) -> Result<Self> {
        if levels.is_empty() {
            return Err(SurgError::EmptyProcedure);
        }
        for (index, level) in levels.iter().enumerate() {
            if level.steps().is_empty() {
                return Err(SurgError::EmptyLevel { index });
            }
            for step in level.steps() {
                match step.target() {
                    StepTarget::Body(id) => {
                        if world.body(id).is_none() {
                            return Err(SurgError::InvalidBodyId(id.raw()));
                        }
                    }
                    StepTarget::Graph(id) => {
                        if world.graph(id).is_none() {
                            return Err(SurgError::InvalidGraphId(id.raw()));
                        }
                    }
                }
            }
        }
        Ok(Self {
            levels,
            current: 0,
            revision: 0,
        })
    }

    /// Current level index; equals the level count once finished.
    #[must_use]
    pub const fn current_level(&self) -> usize {
        self.current
    }

    /// Whether every level is complete.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.levels.len()
    }

    /// Monotonic counter bumped on every state change; the UI layer polls
    /// it to decide when to re-render the checklist.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// The current level's active step configuration, if not finished.
    #[must_use]
    pub fn active_setup(&self) -> Option<StepSetup> {
        let step = self.levels.get(self.current)?.active_step()?;
        Some(StepSetup {
            kind: step.kind(),
            target: step.target(),
        })
    }

    /// The checklist projection: every step in order with its completion
    /// flag.
    #[must_use]
    pub fn checklist(&self) -> Vec<ChecklistItem> {
        self.levels
            .iter()
            .flat_map(Level::steps)
            .map(|step| ChecklistItem {
                name: step.name().to_owned(),
                description: step.description().to_owned(),
                completed: step.is_completed(),
            })
            .collect()
    }

    /// Completion listener for interaction events.
    ///
    /// `Clipped(body)` completes the first incomplete clip step targeting
    /// that body. `StitchCut(graph)` completes the first incomplete cut
    /// step targeting that graph, but only once the graph reports zero
    /// remaining stitches - cut events fire per stitch, completion
    /// requires the whole graph emptied. Other events are ignored.
    pub fn handle_event(
        &mut self,
        event: &InteractionEvent,
        world: &World,
        events: &mut EventQueue,
    ) {
        match *event {
            InteractionEvent::Clipped(body) => {
                self.complete_first(events, |step| {
                    step.kind() == StepKind::Clip && step.target() == StepTarget::Body(body)
                });
            }
            InteractionEvent::StitchCut(graph) => {
                let emptied = world.graph(graph).is_some_and(StitchGraph::is_empty);
                if emptied {
                    self.complete_first(events, |step| {
                        matches!(step.kind(), StepKind::Cut | StepKind::ContinuousCut)
                            && step.target() == StepTarget::Graph(graph)
                    });
                }
            }
            InteractionEvent::LevelAdvanced(_) | InteractionEvent::ProcedureFinished => {}
        }
    }

    /// Externally complete a terminal action step by name.
    ///
    /// Returns whether a matching incomplete [`StepKind::Extract`] step was
    /// found.
    pub fn complete_action(&mut self, name: &str, events: &mut EventQueue) -> bool {
        self.complete_first(events, |step| {
            step.kind() == StepKind::Extract && step.name() == name
        })
    }

    /// Rewind the level index to 0.
    ///
    /// Completed-step flags are deliberately left in place (spawned clips
    /// and removed stitches are physical state this machine does not own);
    /// the index stays at 0 until an incomplete step completes, then
    /// advancement skips straight through the already-complete levels.
    pub fn reset_level(&mut self) {
        self.current = 0;
        self.revision += 1;
    }

    /// Rewind to level 0 and clear every completion flag, for callers that
    /// also reload the scene.
    pub fn reset_full(&mut self) {
        for level in &mut self.levels {
            for step in level.steps_mut() {
                step.clear_completed();
            }
        }
        self.current = 0;
        self.revision += 1;
    }

    fn complete_first<F>(&mut self, events: &mut EventQueue, matches: F) -> bool
    where
        F: Fn(&ProcedureStep) -> bool,
    {
        let found = self.levels.iter().enumerate().find_map(|(li, level)| {
            level
                .steps()
                .iter()
                .position(|step| !step.is_completed() && matches(step))
                .map(|si| (li, si))
        });
        let Some((level, index)) = found else {
            return false;
        };

        let step = &mut self.levels[level].steps_mut()[index];
        step.mark_completed();
        tracing::debug!("step \"{}\" completed", step.name());
        self.revision += 1;
        self.advance_through_complete_levels(events);
        true
    }

    /// Advance while the current level is fully complete; push
    /// `LevelAdvanced` per level entered and `ProcedureFinished` once on
    /// reaching the terminal index.
    fn advance_through_complete_levels(&mut self, events: &mut EventQueue) {
        while !self.is_finished() && self.levels[self.current].is_complete() {
            self.current += 1;
            self.revision += 1;
            if self.is_finished() {
                events.push(InteractionEvent::ProcedureFinished);
            } else {
                events.push(InteractionEvent::LevelAdvanced(self.current));
            }
        }
    }
}
