//! A ball dropped onto a static floor.
//!
//! Run with: cargo run --example free_fall
//! Set `RUST_LOG=rigidsim=trace` to see every sub-step and collision.

use std::error::Error;
use std::sync::Arc;

use rigidsim::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_target(false)
        .init();

    let config = WorldConfig::default()
        .with_global_force(Vec3::new(0.0, -9.8, 0.0))
        .with_response(CollisionResponse::impulse(0.6));
    let mut world = World::new(config);

    let floor = Arc::new(Shape::plane(Vec3::new(20.0, 0.0, 20.0))?);
    world.create_body(floor, 0.0, BodyLayer::Static)?;

    let ball = world.create_body_at(
        Arc::new(Shape::sphere(0.5)?),
        1.0,
        BodyLayer::Dynamic,
        Vec3::new(0.0, 5.0, 0.0),
        Quat::identity(),
    )?;

    let dt = 1.0 / 60.0;
    let total_time = 4.0;
    let steps = (total_time / dt) as usize;
    info!(total_time, steps, "simulating");

    for i in 0..steps {
        world.update(dt)?;

        // Every half second
        if i % 30 == 0 {
            let state = world.info(ball);
            info!(
                t = %format!("{:.2}", world.time()),
                y = %format!("{:.3}", state.position.y),
                vy = %format!("{:.3}", state.linear_velocity.y),
                contacts = world.contacts().len(),
                "ball"
            );
        }
    }

    let state = world.info(ball);
    info!(y = state.position.y, "final height (resting height is the radius, 0.5)");
    Ok(())
}
