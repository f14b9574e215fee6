use serde::{Deserialize, Serialize};

use crate::collision::Contact;
use crate::dynamics::RigidBody;
use crate::math::{Real, Vec3};

pub const DEFAULT_RESTITUTION: Real = 0.5;

/// Penetration tolerated without positional correction
const PENETRATION_SLOP: Real = 0.005;
/// Share of the remaining penetration removed per response
const CORRECTION_FRACTION: Real = 0.8;

/// How bodies react to a detected collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CollisionResponse {
    /// Negates the first body's linear momentum. Kept for parity with older
    /// scenes; it ignores the contact normal and the second body entirely.
    Reflect,
    /// Classical normal impulse with a restitution coefficient in `[0, 1]`,
    /// followed by a positional push that removes most of the penetration.
    Impulse { restitution: Real },
}

impl Default for CollisionResponse {
    fn default() -> Self {
        CollisionResponse::Impulse {
            restitution: DEFAULT_RESTITUTION,
        }
    }
}

impl CollisionResponse {
    /// Impulse response with the restitution clamped to `[0, 1]`
    pub fn impulse(restitution: Real) -> Self {
        CollisionResponse::Impulse {
            restitution: restitution.clamp(0.0, 1.0),
        }
    }
}

/// Applies `response` to a colliding pair. Returns whether any momentum changed.
///
/// `body_a` and `body_b` must be the bodies named by `contact`, in that order.
pub fn resolve(
    response: CollisionResponse,
    contact: &Contact,
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
) -> bool {
    if !contact.result.colliding {
        return false;
    }

    match response {
        CollisionResponse::Reflect => {
            if !body_a.is_dynamic() {
                return false;
            }
            body_a.linear_momentum = -body_a.linear_momentum;
            true
        }
        CollisionResponse::Impulse { restitution } => {
            let bounced = apply_normal_impulse(restitution.clamp(0.0, 1.0), contact, body_a, body_b);
            let pushed = correct_penetration(contact, body_a, body_b);
            bounced || pushed
        }
    }
}

fn apply_normal_impulse(
    restitution: Real,
    contact: &Contact,
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
) -> bool {
    let normal = contact.result.normal;
    let point = contact.result.point;
    let r_a = point - body_a.position();
    let r_b = point - body_b.position();

    let relative = body_b.velocity_at_point(point) - body_a.velocity_at_point(point);
    let approach = relative.dot(&normal);
    // Already separating along the normal
    if approach >= 0.0 {
        return false;
    }

    let k = effective_mass_inverse(body_a, body_b, &r_a.cross(&normal), &r_b.cross(&normal));
    if k <= 0.0 {
        return false;
    }

    let j = -(1.0 + restitution) * approach / k;
    let impulse = normal * j;
    body_a.apply_contact_impulse(-impulse, point);
    body_b.apply_contact_impulse(impulse, point);
    true
}

/// Moves the bodies apart along the normal in proportion to their inverse masses.
fn correct_penetration(contact: &Contact, body_a: &mut RigidBody, body_b: &mut RigidBody) -> bool {
    let inverse_mass_sum = body_a.inverse_mass() + body_b.inverse_mass();
    let excess = contact.result.depth - PENETRATION_SLOP;
    if inverse_mass_sum <= 0.0 || excess <= 0.0 {
        return false;
    }

    let correction = contact.result.normal * (CORRECTION_FRACTION * excess / inverse_mass_sum);
    body_a.transform.position -= correction * body_a.inverse_mass();
    body_b.transform.position += correction * body_b.inverse_mass();
    true
}

// 1/m_a + 1/m_b + (ra x n) . Ia^-1 (ra x n) + (rb x n) . Ib^-1 (rb x n)
fn effective_mass_inverse(
    body_a: &RigidBody,
    body_b: &RigidBody,
    rn_a: &Vec3,
    rn_b: &Vec3,
) -> Real {
    body_a.inverse_mass()
        + body_b.inverse_mass()
        + rn_a.dot(&(body_a.inverse_inertia_world() * rn_a))
        + rn_b.dot(&(body_b.inverse_inertia_world() * rn_b))
}
