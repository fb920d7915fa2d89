//! The per-step contact resolution query.

use smallvec::SmallVec;

use surg_types::{ColliderId, Contact, ContactPrimitive, ParticleRef};

use crate::{ParticleOwnership, SimplexTable};

/// Resolve one step's contact list into (body, local particle) touches for
/// a single tool collider.
///
/// For every contact on `collider` whose signed distance is below
/// `contact_distance`, the deformable-side primitive is translated through
/// the ownership table. A simplex primitive expands into every particle of
/// its range, each reported individually, so the coarse surface proxy never
/// hides which exact particles were touched.
///
/// Pure query: no side effects, results are valid only for the current
/// simulation step. Contacts on other colliders, contacts beyond the
/// threshold, and particles owned by no deformable body are skipped.
#[must_use]
pub fn resolve_contacts(
    contacts: &[Contact],
    collider: ColliderId,
    ownership: &ParticleOwnership,
    simplices: Option<&SimplexTable>,
    contact_distance: f64,
) -> Vec<ParticleRef> {
    let mut touched = Vec::new();

    for contact in contacts {
        if contact.collider != collider || contact.distance >= contact_distance {
            continue;
        }

        let globals: SmallVec<[usize; 4]> = match contact.primitive {
            ContactPrimitive::Particle(global) => SmallVec::from_slice(&[global]),
            ContactPrimitive::Simplex(simplex) => match simplices {
                Some(table) => SmallVec::from_slice(table.particles(simplex)),
                None => {
                    tracing::warn!(
                        "contact references simplex {simplex} but no simplex table is installed"
                    );
                    continue;
                }
            },
        };

        for global in globals {
            if let Some(owner) = ownership.lookup(global) {
                touched.push(owner);
            }
        }
    }

    touched
}
