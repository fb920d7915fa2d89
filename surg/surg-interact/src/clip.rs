//! Clip application: one-shot per body, with pose-following clip visuals.

use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Quaternion};

use surg_contact::resolve_contacts;
use surg_core::{World, CLIP_GROUP};
use surg_types::{BodyId, ColliderId, EventQueue, InteractionConfig, InteractionEvent};

/// A spawned clip, living in the solver's coordinate space.
///
/// Its position is re-set to the clip group's current mean position every
/// step, and its rotation is advanced by the incremental delta between the
/// previous and current mean group orientation. The rotation is kept as a
/// raw (possibly non-unit) quaternion: group orientation means are
/// component-wise and unnormalized, and the deltas composed from them are
/// reproduced as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInstance {
    body: BodyId,
    position: Point3<f64>,
    rotation: Quaternion<f64>,
    prev_mean: Quaternion<f64>,
}

impl ClipInstance {
    /// The body this clip was applied to.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// Current position in solver coordinates.
    #[must_use]
    pub const fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Current rotation in solver coordinates.
    #[must_use]
    pub const fn rotation(&self) -> Quaternion<f64> {
        self.rotation
    }
}

/// Per-tool clip applier.
///
/// The membership list is fixed before the attempt lifecycle begins; each
/// listed body gets a one-shot clip state that transitions false -> true at
/// most once for the controller's lifetime (until externally reset through
/// [`reset_body`](Self::reset_body)). Runtime additions go through
/// [`clip_state_mut`](Self::clip_state_mut), not the membership list.
#[derive(Debug)]
pub struct ClipController {
    collider: ColliderId,
    clip_state: HashMap<BodyId, bool>,
    intent: bool,
    clipped_this_attempt: bool,
    instances: Vec<ClipInstance>,
    warned_missing_group: HashSet<BodyId>,
}

impl ClipController {
    /// Create a controller for a clip-applier collider acting on `bodies`.
    ///
    /// A body listed twice is a data error: warned and deduplicated.
    #[must_use]
    pub fn new(collider: ColliderId, bodies: &[BodyId]) -> Self {
        let mut clip_state = HashMap::new();
        for &body in bodies {
            if clip_state.insert(body, false).is_some() {
                tracing::warn!("body {body} registered twice as a clip target");
            }
        }
        Self {
            collider,
            clip_state,
            intent: false,
            clipped_this_attempt: false,
            instances: Vec::new(),
            warned_missing_group: HashSet::new(),
        }
    }

    /// Whether intent is currently held.
    #[must_use]
    pub const fn intent(&self) -> bool {
        self.intent
    }

    /// Clip state of a body: `Some(true)` once clipped, `None` if the body
    /// is not a clip target.
    #[must_use]
    pub fn is_clipped(&self, body: BodyId) -> Option<bool> {
        self.clip_state.get(&body).copied()
    }

    /// Direct access to the clip-state mapping (runtime target additions).
    pub fn clip_state_mut(&mut self) -> &mut HashMap<BodyId, bool> {
        &mut self.clip_state
    }

    /// Spawned clip instances, oldest first.
    #[must_use]
    pub fn instances(&self) -> &[ClipInstance] {
        &self.instances
    }

    /// Externally reset a body's clip state to unclipped.
    ///
    /// Spawned instances are not despawned; they keep following their
    /// group.
    pub fn reset_body(&mut self, body: BodyId) {
        if let Some(state) = self.clip_state.get_mut(&body) {
            *state = false;
        }
    }

    /// Set or release clip intent.
    ///
    /// Releasing clears only the attempt flag; per-body clip state
    /// persists.
    pub fn set_intent(&mut self, intent: bool) {
        self.intent = intent;
        if !intent {
            self.clipped_this_attempt = false;
        }
    }

    /// Main per-step pass: resolve contacts and apply at most one clip.
    ///
    /// For each resolved particle whose body is an unclipped target and
    /// whose local index lies in the body's clip group, one clip instance
    /// is spawned at the group's time-of-spawn mean pose, the body's clip
    /// state flips true, and `Clipped(body)` is raised. Only the first
    /// qualifying match per attempt is acted on; the remaining contacts
    /// are still drained.
    pub fn step(&mut self, world: &World, config: &InteractionConfig, events: &mut EventQueue) {
        if !self.intent || self.clipped_this_attempt {
            return;
        }

        let touched = resolve_contacts(
            world.contacts(),
            self.collider,
            world.ownership(),
            world.simplex_table(),
            config.contact_distance,
        );

        for particle in touched {
            if self.clipped_this_attempt {
                continue;
            }
            let Some(&already) = self.clip_state.get(&particle.body) else {
                continue;
            };
            if already {
                continue;
            }
            let Some(body) = world.body(particle.body) else {
                continue;
            };
            if body.group(CLIP_GROUP).is_none() {
                if self.warned_missing_group.insert(particle.body) {
                    tracing::warn!(
                        "body \"{}\" has no particle group \"{CLIP_GROUP}\"; it cannot be clipped",
                        body.name()
                    );
                }
                continue;
            }
            if !body.group_contains(CLIP_GROUP, particle.local) {
                continue;
            }
            let (Some(position), Some(mean)) = (
                body.group_mean_position(CLIP_GROUP),
                body.group_mean_orientation(CLIP_GROUP),
            ) else {
                continue;
            };

            self.instances.push(ClipInstance {
                body: particle.body,
                position,
                rotation: mean,
                prev_mean: mean,
            });
            self.clip_state.insert(particle.body, true);
            self.clipped_this_attempt = true;
            events.push(InteractionEvent::Clipped(particle.body));
            tracing::debug!("clipped {} at {position:?}", particle.body);
        }
    }

    /// Every-step pose following for live clip instances.
    ///
    /// Position snaps to the group's current mean; rotation advances by
    /// `delta = inverse(previous mean) * current mean` composed onto the
    /// existing rotation, so a rigid clip tracks a deforming surface
    /// without inheriting absolute orientation drift. A non-invertible
    /// mean leaves the rotation unchanged for the step.
    pub fn follow(&mut self, world: &World) {
        for instance in &mut self.instances {
            let Some(body) = world.body(instance.body) else {
                continue;
            };
            let (Some(position), Some(mean)) = (
                body.group_mean_position(CLIP_GROUP),
                body.group_mean_orientation(CLIP_GROUP),
            ) else {
                continue;
            };

            instance.position = position;
            if let Some(inverse_prev) = instance.prev_mean.try_inverse() {
                let delta = inverse_prev * mean;
                instance.rotation = delta * instance.rotation;
            }
            instance.prev_mean = mean;
        }
    }
}
