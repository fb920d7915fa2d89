//! Deformable bodies as the solver exposes them.

use hashbrown::HashMap;
use nalgebra::{Point3, Quaternion, UnitQuaternion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the particle group a clip applier may act on.
pub const CLIP_GROUP: &str = "ClipGroup";

/// One particle of a deformable body.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftParticle {
    /// Global solver index, unique across all bodies.
    pub solver_index: usize,
    /// Position in solver coordinates.
    pub position: Point3<f64>,
    /// Orientation in solver coordinates.
    pub orientation: UnitQuaternion<f64>,
}

impl SoftParticle {
    /// Create a particle with identity orientation.
    #[must_use]
    pub fn at(solver_index: usize, position: Point3<f64>) -> Self {
        Self {
            solver_index,
            position,
            orientation: UnitQuaternion::identity(),
        }
    }
}

/// A deformable body: an ordered particle collection plus named particle
/// groups.
///
/// Local particle indices are positions in the particle vector; they are
/// unique and stable for the body's lifetime. Group members are local
/// indices.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use surg_core::{SoftBody, SoftParticle, CLIP_GROUP};
///
/// let body = SoftBody::new(
///     "cystic_duct",
///     vec![
///         SoftParticle::at(0, Point3::new(0.0, 0.0, 0.0)),
///         SoftParticle::at(1, Point3::new(0.1, 0.0, 0.0)),
///     ],
/// )
/// .with_group(CLIP_GROUP, vec![0, 1])
/// .with_attachment_support();
///
/// assert_eq!(body.group(CLIP_GROUP), Some(&[0usize, 1][..]));
/// ```
#[derive(Debug, Clone)]
pub struct SoftBody {
    name: String,
    particles: Vec<SoftParticle>,
    groups: HashMap<String, Vec<usize>>,
    supports_attachment: bool,
}

impl SoftBody {
    /// Create a body from its particles.
    #[must_use]
    pub fn new(name: impl Into<String>, particles: Vec<SoftParticle>) -> Self {
        Self {
            name: name.into(),
            particles,
            groups: HashMap::new(),
            supports_attachment: false,
        }
    }

    /// Add a named particle group of local indices.
    ///
    /// Out-of-range members are a data error: each is warned about and
    /// dropped, and the group keeps the rest.
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, members: Vec<usize>) -> Self {
        let name = name.into();
        let count = self.particles.len();
        let (valid, invalid): (Vec<usize>, Vec<usize>) =
            members.into_iter().partition(|&local| local < count);
        for local in invalid {
            tracing::warn!(
                "group \"{name}\" on body \"{}\" references local index {local} out of range {count}",
                self.name
            );
        }
        self.groups.insert(name, valid);
        self
    }

    /// Mark this body as supporting particle attachments.
    ///
    /// Bodies without attachment support are silently skipped by the grasp
    /// controller (feature absent, not an error).
    #[must_use]
    pub const fn with_attachment_support(mut self) -> Self {
        self.supports_attachment = true;
        self
    }

    /// Name of this body.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of particles.
    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// The body's particles in local-index order.
    #[must_use]
    pub fn particles(&self) -> &[SoftParticle] {
        &self.particles
    }

    /// Position of a particle by local index.
    #[must_use]
    pub fn position(&self, local: usize) -> Option<Point3<f64>> {
        self.particles.get(local).map(|p| p.position)
    }

    /// Orientation of a particle by local index.
    #[must_use]
    pub fn orientation(&self, local: usize) -> Option<UnitQuaternion<f64>> {
        self.particles.get(local).map(|p| p.orientation)
    }

    /// Overwrite a particle's pose (the solver's per-step state push).
    pub fn set_particle_pose(
        &mut self,
        local: usize,
        position: Point3<f64>,
        orientation: UnitQuaternion<f64>,
    ) {
        if let Some(particle) = self.particles.get_mut(local) {
            particle.position = position;
            particle.orientation = orientation;
        }
    }

    /// Whether this body supports particle attachments.
    #[must_use]
    pub const fn supports_attachment(&self) -> bool {
        self.supports_attachment
    }

    /// Members of a named group, or `None` if the group is absent.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[usize]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Whether a local index belongs to a named group.
    #[must_use]
    pub fn group_contains(&self, name: &str, local: usize) -> bool {
        self.group(name).is_some_and(|members| members.contains(&local))
    }

    /// Arithmetic mean of a group's member positions.
    ///
    /// Returns `None` for a missing or empty group so callers never divide
    /// by zero.
    #[must_use]
    pub fn group_mean_position(&self, name: &str) -> Option<Point3<f64>> {
        let members = self.group(name)?;
        if members.is_empty() {
            return None;
        }
        let mut sum = Point3::origin().coords;
        for &local in members {
            sum += self.particles.get(local)?.position.coords;
        }
        Some(Point3::from(sum / members.len() as f64))
    }

    /// Component-wise mean of a group's member orientations.
    ///
    /// This is not a spherical mean and the result is not normalized; the
    /// raw quaternion is returned as-is. Acceptable only for small angular
    /// spread, which holds for the compact clip-target groups this is used
    /// on. Returns `None` for a missing or empty group.
    #[must_use]
    pub fn group_mean_orientation(&self, name: &str) -> Option<Quaternion<f64>> {
        let members = self.group(name)?;
        if members.is_empty() {
            return None;
        }
        let mut w = 0.0;
        let mut i = 0.0;
        let mut j = 0.0;
        let mut k = 0.0;
        for &local in members {
            let q = self.particles.get(local)?.orientation;
            let coords = q.quaternion().coords;
            i += coords.x;
            j += coords.y;
            k += coords.z;
            w += coords.w;
        }
        let n = members.len() as f64;
        Some(Quaternion::new(w / n, i / n, j / n, k / n))
    }
}
