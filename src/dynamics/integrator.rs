use crate::math::{is_unit, pure_quaternion, similarity, Quat, Real};

use super::rigid_body::RigidBody;

/// Integrates one step of momentum-based rigid body motion.
///
/// Order matters and is part of the observable behaviour:
/// 1. pending timed impulses are drained into the impulse accumulators;
/// 2. impulses and `force * dt` / `torque * dt` are added to momentum;
/// 3. velocities are derived from the new momenta using the world inverse
///    inertia of the renormalized orientation;
/// 4. position advances by `v * dt`, orientation by a first-order quaternion
///    update, blended as `normalize(dq + 0.5 * q)`;
/// 5. all accumulators are cleared.
///
/// Kinematic and static bodies only have their accumulators cleared.
pub fn integrate(body: &mut RigidBody, dt: Real) {
    if !body.is_dynamic() {
        body.timed_impulses.clear();
        body.clear_accumulators();
        return;
    }

    drain_timed_impulses(body, dt);

    body.linear_momentum += body.impulse;
    body.linear_momentum += body.force * dt;

    body.angular_momentum += body.angular_impulse;
    body.angular_momentum += body.torque * dt;

    let linear_velocity = body.linear_momentum * body.inverse_mass;

    let q = Quat::new_normalize(body.transform.orientation.into_inner());
    let rotation = q.to_rotation_matrix().into_inner();
    let inverse_inertia = similarity(&rotation, &body.body_inertia_inverse);
    let angular_velocity = inverse_inertia * body.angular_momentum;

    // dq is orthogonal to q, so the blend below never has zero norm
    let orientation_delta = (pure_quaternion(angular_velocity) * q.into_inner()) * (0.5 * dt);

    body.transform.position += linear_velocity * dt;
    body.transform.orientation = Quat::new_normalize(orientation_delta + q.into_inner() * 0.5);
    debug_assert!(is_unit(body.transform.orientation.quaternion()));

    body.clear_accumulators();
}

/// Moves up to `dt` seconds of each queued timed impulse into the impulse
/// accumulators. Entries that still have time left are requeued in order.
fn drain_timed_impulses(body: &mut RigidBody, dt: Real) {
    if body.timed_impulses.is_empty() {
        return;
    }

    let orientation = body.transform.orientation;
    for _ in 0..body.timed_impulses.len() {
        let Some(mut entry) = body.timed_impulses.pop_front() else {
            break;
        };

        let used = entry.consume(dt);
        let linear = entry.force() * used;
        let lever = orientation * entry.local_point();
        body.impulse += linear;
        body.angular_impulse += lever.cross(&linear);

        if !entry.is_expired() {
            body.timed_impulses.push_back(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{BodyLayer, TimedImpulse};
    use crate::geometry::Shape;
    use crate::math::{Transform, Vec3};
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn sphere_body(mass: Real) -> RigidBody {
        let shape = Arc::new(Shape::sphere(1.0).unwrap());
        RigidBody::new(shape, mass, BodyLayer::Dynamic, Transform::identity()).unwrap()
    }

    #[test]
    fn test_force_integrates_over_dt() {
        let mut body = sphere_body(1.0);
        body.add_force(Vec3::new(0.0, -9.8, 0.0));
        integrate(&mut body, 0.1);

        assert_relative_eq!(body.linear_momentum(), Vec3::new(0.0, -0.98, 0.0), epsilon = 1e-12);
        assert_relative_eq!(body.position(), Vec3::new(0.0, -0.098, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_impulse_is_not_scaled() {
        let mut body = sphere_body(2.0);
        body.add_impulse(Vec3::new(4.0, 0.0, 0.0));
        integrate(&mut body, 0.5);

        assert_eq!(body.linear_momentum(), Vec3::new(4.0, 0.0, 0.0));
        // v = P / m = 2
        assert_relative_eq!(body.position(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_accumulators_cleared() {
        let mut body = sphere_body(1.0);
        body.add_force(Vec3::x());
        body.add_torque(Vec3::y());
        body.add_impulse(Vec3::z());
        body.add_angular_impulse(Vec3::x());
        integrate(&mut body, 0.01);

        assert_eq!(body.force(), Vec3::zeros());
        assert_eq!(body.torque(), Vec3::zeros());
        assert_eq!(body.impulse(), Vec3::zeros());
        assert_eq!(body.angular_impulse(), Vec3::zeros());
    }

    #[test]
    fn test_orientation_blend() {
        let mut body = sphere_body(1.0);
        // Sphere inertia 0.4, so L = 0.4 spins at 1 rad/s about Z
        body.add_angular_impulse(Vec3::new(0.0, 0.0, 0.4));
        integrate(&mut body, 0.1);

        // normalize(0.5 * (1 + dt * w) q) turns by 2 * atan(|w| dt)
        let expected = 2.0 * (0.1_f64).atan();
        assert_relative_eq!(body.orientation().angle(), expected, epsilon = 1e-12);
        assert_relative_eq!(body.orientation().axis().unwrap().into_inner(), Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_static_body_not_integrated() {
        let shape = Arc::new(Shape::sphere(1.0).unwrap());
        let mut body = RigidBody::new(shape, 1.0, BodyLayer::Static, Transform::identity()).unwrap();
        body.add_force(Vec3::new(0.0, -9.8, 0.0));
        body.add_impulse(Vec3::x());
        integrate(&mut body, 1.0);

        assert_eq!(body.position(), Vec3::zeros());
        assert_eq!(body.linear_momentum(), Vec3::zeros());
        assert_eq!(body.force(), Vec3::zeros());
    }

    #[test]
    fn test_timed_impulse_spread_over_steps() {
        let mut body = sphere_body(1.0);
        body.add_timed_impulse(TimedImpulse::at_center(0.25, Vec3::new(2.0, 0.0, 0.0)).unwrap());

        integrate(&mut body, 0.1);
        assert_relative_eq!(body.linear_momentum().x, 0.2, epsilon = 1e-12);
        assert_eq!(body.timed_impulses().count(), 1);

        integrate(&mut body, 0.1);
        integrate(&mut body, 0.1);
        assert_relative_eq!(body.linear_momentum().x, 0.5, epsilon = 1e-12);
        assert_eq!(body.timed_impulses().count(), 0);

        integrate(&mut body, 0.1);
        assert_relative_eq!(body.linear_momentum().x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_timed_impulse_off_centre_spins() {
        let mut body = sphere_body(1.0);
        let push = TimedImpulse::new(1.0, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        body.add_timed_impulse(push);
        integrate(&mut body, 0.5);

        assert_relative_eq!(body.angular_momentum(), Vec3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_timed_impulses_keep_order() {
        let mut body = sphere_body(1.0);
        let short = TimedImpulse::at_center(0.05, Vec3::x()).unwrap();
        let long = TimedImpulse::at_center(1.0, Vec3::y()).unwrap();
        let medium = TimedImpulse::at_center(0.5, Vec3::z()).unwrap();
        body.add_timed_impulse(short);
        body.add_timed_impulse(long);
        body.add_timed_impulse(medium);

        integrate(&mut body, 0.1);
        let forces: Vec<Vec3> = body.timed_impulses().map(|t| t.force()).collect();
        assert_eq!(forces, vec![Vec3::y(), Vec3::z()]);
    }

    fn vec3() -> impl Strategy<Value = Vec3> {
        (-50.0..50.0, -50.0..50.0, -50.0..50.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_orientation_stays_unit(
            spins in prop::collection::vec((vec3(), 0.0001..0.5f64), 1..40),
        ) {
            let shape = Arc::new(Shape::cuboid(Vec3::new(0.5, 1.0, 1.5)).unwrap());
            let mut body = RigidBody::new(shape, 3.0, BodyLayer::Dynamic, Transform::identity()).unwrap();
            for (torque, dt) in spins {
                body.add_torque(torque);
                integrate(&mut body, dt);
                prop_assert!(is_unit(body.orientation().quaternion()));
            }
        }

        #[test]
        fn prop_accumulators_reset(
            force in vec3(),
            torque in vec3(),
            impulse in vec3(),
            angular in vec3(),
            dt in 0.0001..1.0f64,
        ) {
            let mut body = sphere_body(1.5);
            body.add_force(force);
            body.add_torque(torque);
            body.add_impulse(impulse);
            body.add_angular_impulse(angular);
            integrate(&mut body, dt);

            prop_assert_eq!(body.force(), Vec3::zeros());
            prop_assert_eq!(body.torque(), Vec3::zeros());
            prop_assert_eq!(body.impulse(), Vec3::zeros());
            prop_assert_eq!(body.angular_impulse(), Vec3::zeros());
        }

        #[test]
        fn prop_impulse_matches_force_over_dt(j in vec3(), dt in 0.001..1.0f64) {
            let mut by_impulse = sphere_body(2.0);
            by_impulse.add_impulse(j);
            integrate(&mut by_impulse, dt);

            let mut by_force = sphere_body(2.0);
            by_force.add_force(j / dt);
            integrate(&mut by_force, dt);

            let diff = (by_impulse.linear_momentum() - by_force.linear_momentum()).norm();
            prop_assert!(diff <= 1e-9 * (1.0 + j.norm()));
        }
    }
}
