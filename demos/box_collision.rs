//! Oriented boxes: overlap queries and a tumbling box landing on a floor.
//!
//! Run with: cargo run --example box_collision

use std::error::Error;
use std::f64::consts::FRAC_PI_4;
use std::sync::Arc;

use rigidsim::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    let cube = Arc::new(Shape::cuboid(Vec3::repeat(1.0))?);
    let config = WorldConfig::default().with_global_force(Vec3::new(0.0, -9.8, 0.0));
    let mut world = World::new(config);

    let ground = Arc::new(Shape::plane(Vec3::new(20.0, 0.0, 20.0))?);
    let floor = world.create_body(ground, 0.0, BodyLayer::Static)?;
    let left = world.create_body_at(
        cube.clone(),
        1.0,
        BodyLayer::Kinematic,
        Vec3::new(-3.0, 1.0, 0.0),
        Quat::identity(),
    )?;
    let diamond = world.create_body_at(
        cube.clone(),
        1.0,
        BodyLayer::Kinematic,
        Vec3::new(-0.8, 1.0, 0.0),
        Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_4),
    )?;

    // Axis-aligned bounds would call these touching; the corner is what reaches
    info!(
        overlap = world.is_colliding(left, diamond)?,
        "unit cube vs 45 degree cube, centres 2.2 apart"
    );

    let tumbler = world.create_body_at(
        cube,
        2.0,
        BodyLayer::Dynamic,
        Vec3::new(4.0, 4.0, 0.0),
        Quat::from_euler_angles(0.3, 0.0, 0.5),
    )?;
    world.set_angular_velocity(tumbler, Vec3::new(0.0, 0.0, 1.5));
    let push = TimedImpulse::new(0.5, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0))?;
    world.add_timed_impulse(tumbler, push);

    let dt = 1.0 / 60.0;
    for i in 0..180 {
        world.update(dt)?;
        if i % 20 == 0 {
            let state = world.info(tumbler);
            info!(
                t = %format!("{:.2}", world.time()),
                y = %format!("{:.3}", state.position.y),
                on_floor = world.is_colliding(tumbler, floor)?,
                "tumbler"
            );
        }
    }

    let bytes = world
        .body(tumbler)
        .map(RigidBody::to_bytes)
        .ok_or(PhysicsError::InvalidHandle(tumbler))?;
    info!(len = bytes.len(), "encoded final tumbler state");
    Ok(())
}
