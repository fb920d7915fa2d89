//! Completion events and the single-threaded event queue.
//!
//! Controllers push events as physical effects land; the procedure machine
//! drains them strictly after the main interaction pass of the same step.
//! Making the queue an explicit value (rather than engine-side callbacks)
//! lets tests drive the machine with synthetic events and no live solver.

use std::collections::VecDeque;

use crate::{BodyId, GraphId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A completion event raised by the interaction layer.
///
/// Grasp completion deliberately has no event: it is observable through
/// attachment state, and the procedure machine never gates on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InteractionEvent {
    /// A clip was applied to the body's clip group.
    Clipped(BodyId),
    /// A stitch was removed from the graph; fires once per stitch, plus a
    /// trailing event after a single-shot batch is pushed to the solver.
    StitchCut(GraphId),
    /// The procedure advanced to the given level index.
    LevelAdvanced(usize),
    /// Every level is complete; fires exactly once.
    ProcedureFinished,
}

impl std::fmt::Display for InteractionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clipped(body) => write!(f, "clipped {body}"),
            Self::StitchCut(graph) => write!(f, "stitch cut on {graph}"),
            Self::LevelAdvanced(index) => write!(f, "advanced to level {index}"),
            Self::ProcedureFinished => write!(f, "procedure finished"),
        }
    }
}

/// Single-threaded FIFO of interaction events.
///
/// # Example
///
/// ```
/// use surg_types::{BodyId, EventQueue, InteractionEvent};
///
/// let mut queue = EventQueue::new();
/// queue.push(InteractionEvent::Clipped(BodyId::new(1)));
/// assert_eq!(queue.pop(), Some(InteractionEvent::Clipped(BodyId::new(1))));
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InteractionEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event onto the back of the queue.
    pub fn push(&mut self, event: InteractionEvent) {
        self.events.push_back(event);
    }

    /// Pop the oldest event, if any.
    pub fn pop(&mut self) -> Option<InteractionEvent> {
        self.events.pop_front()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain every queued event in FIFO order.
    pub fn drain(&mut self) -> impl Iterator<Item = InteractionEvent> + '_ {
        self.events.drain(..)
    }
}
