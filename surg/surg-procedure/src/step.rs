//! Procedure steps, levels, and the checklist projection.

use surg_types::{BodyId, GraphId};

/// What kind of interaction completes a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// A clip applied to the target body's clip group.
    Clip,
    /// The target graph emptied by a single-shot cut.
    Cut,
    /// The target graph emptied by continuous cutting.
    ContinuousCut,
    /// A terminal action reported by an external collaborator (e.g. the
    /// specimen extraction trigger).
    Extract,
}

/// What a step acts on: a body or a stitch graph, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTarget {
    /// A deformable body.
    Body(BodyId),
    /// An edge-graph (stitcher).
    Graph(GraphId),
}

/// The active step's controller configuration, applied on level entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSetup {
    /// Which controller kind is enabled.
    pub kind: StepKind,
    /// What the enabled controller acts on.
    pub target: StepTarget,
}

/// One gated unit of the surgical sequence.
#[derive(Debug, Clone)]
pub struct ProcedureStep {
    name: String,
    description: String,
    kind: StepKind,
    target: StepTarget,
    completed: bool,
}

impl ProcedureStep {
    /// A clip step targeting a body.
    #[must_use]
    pub fn clip(name: impl Into<String>, description: impl Into<String>, body: BodyId) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: StepKind::Clip,
            target: StepTarget::Body(body),
            completed: false,
        }
    }

    /// A single-shot cut step targeting a graph.
    #[must_use]
    pub fn cut(name: impl Into<String>, description: impl Into<String>, graph: GraphId) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: StepKind::Cut,
            target: StepTarget::Graph(graph),
            completed: false,
        }
    }

    /// A continuous-cut step targeting a graph.
    #[must_use]
    pub fn continuous_cut(
        name: impl Into<String>,
        description: impl Into<String>,
        graph: GraphId,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: StepKind::ContinuousCut,
            target: StepTarget::Graph(graph),
            completed: false,
        }
    }

    /// A terminal action step targeting a body.
    #[must_use]
    pub fn extract(name: impl Into<String>, description: impl Into<String>, body: BodyId) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: StepKind::Extract,
            target: StepTarget::Body(body),
            completed: false,
        }
    }

    /// Step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description for the checklist.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// What kind of interaction completes this step.
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        self.kind
    }

    /// The step's target.
    #[must_use]
    pub const fn target(&self) -> StepTarget {
        self.target
    }

    /// Whether the step has completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub(crate) fn clear_completed(&mut self) {
        self.completed = false;
    }
}

/// An ordered group of steps; complete when all of them are.
#[derive(Debug, Clone)]
pub struct Level {
    steps: Vec<ProcedureStep>,
}

impl Level {
    /// Create a level from its steps.
    #[must_use]
    pub fn new(steps: Vec<ProcedureStep>) -> Self {
        Self { steps }
    }

    /// A level holding a single step.
    #[must_use]
    pub fn single(step: ProcedureStep) -> Self {
        Self { steps: vec![step] }
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ProcedureStep] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [ProcedureStep] {
        &mut self.steps
    }

    /// Whether every step is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(ProcedureStep::is_completed)
    }

    /// The first incomplete step, if any.
    #[must_use]
    pub fn active_step(&self) -> Option<&ProcedureStep> {
        self.steps.iter().find(|step| !step.is_completed())
    }
}

/// One row of the checklist projection handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Step name.
    pub name: String,
    /// Step description.
    pub description: String,
    /// Whether the step has completed.
    pub completed: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_step_constructors() {
        let step = ProcedureStep::clip("clip_duct", "Apply a clip to the duct", BodyId::new(1));
        assert_eq!(step.kind(), StepKind::Clip);
        assert_eq!(step.target(), StepTarget::Body(BodyId::new(1)));
        assert!(!step.is_completed());

        let step = ProcedureStep::continuous_cut("sever", "Cut the suture line", GraphId::new(0));
        assert_eq!(step.kind(), StepKind::ContinuousCut);
        assert_eq!(step.target(), StepTarget::Graph(GraphId::new(0)));
    }

    #[test]
    fn test_level_completion() {
        let mut level = Level::new(vec![
            ProcedureStep::clip("a", "", BodyId::new(0)),
            ProcedureStep::clip("b", "", BodyId::new(1)),
        ]);
        assert!(!level.is_complete());
        assert_eq!(level.active_step().unwrap().name(), "a");

        level.steps_mut()[0].mark_completed();
        assert_eq!(level.active_step().unwrap().name(), "b");

        level.steps_mut()[1].mark_completed();
        assert!(level.is_complete());
        assert!(level.active_step().is_none());
    }
}
