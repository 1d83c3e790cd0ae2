//! Shared setup helpers for pushpull benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench probe
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench probe -- probe_grid

use anyhow::{ensure, Context};
use glam::Vec3;
use pushpull::{
    Collider, FirstPersonActor, InputState, InteractionConfig, Key, Phase, PlayerInteraction,
    PushPull, RigidBody, Transform,
};

/// Time step used when driving scenes.
pub const FIXED_DT: f32 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Basic scenes
// ---------------------------------------------------------------------------

/// Spawn a floor and `n` box obstacles scattered on a grid around the origin.
pub fn setup_clutter_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    spawn_floor(&mut world);

    let cols = (n as f32).sqrt().ceil().max(1.0) as usize;
    for i in 0..n {
        let x = (i % cols) as f32 * 3.0 - cols as f32 * 1.5;
        let z = (i / cols) as f32 * 3.0 + 4.0;
        let yaw = (i * 37 % 360) as f32;
        world.spawn((
            Transform::from_position(Vec3::new(x, 0.5, z)).with_yaw_degrees(yaw),
            Collider::cuboid(Vec3::new(0.5, 0.5, 0.5)),
            RigidBody::new_static(),
        ));
    }
    world
}

/// Spawn a large static floor whose top face is at y = 0.
pub fn spawn_floor(world: &mut hecs::World) -> hecs::Entity {
    world.spawn((
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
        Collider::cuboid(Vec3::new(500.0, 0.5, 500.0)),
        RigidBody::new_static(),
    ))
}

/// Spawn a unit crate at `position`.
pub fn spawn_crate(world: &mut hecs::World, position: Vec3) -> hecs::Entity {
    world.spawn((
        Transform::from_position(position),
        Collider::cuboid(Vec3::splat(0.5)),
        RigidBody::new_dynamic(),
    ))
}

// ---------------------------------------------------------------------------
// Interaction scenes
// ---------------------------------------------------------------------------

/// A scene where the actor already holds a crate and the forward key is down.
pub struct PushScene {
    pub world: hecs::World,
    pub actor: FirstPersonActor,
    pub push_pull: PushPull,
    pub input: InputState,
}

/// Build a cluttered world, walk the actor up to a crate and grab it.
pub fn setup_push_scene(obstacles: usize, grid_size: u32) -> anyhow::Result<PushScene> {
    let mut world = setup_clutter_world(obstacles);
    spawn_crate(&mut world, Vec3::new(0.0, 0.5, 1.3));

    let mut config = InteractionConfig::default();
    config.push.grid_size = grid_size;
    config.ground.grid_size = grid_size;
    let mut push_pull = PushPull::new(
        config,
        PlayerInteraction::default()
            .grab_poll_frames(1)
            .grab_move_time(0.0),
    )
    .context("building push/pull controller")?;

    let mut actor = FirstPersonActor::new(Vec3::new(0.0, 0.5, 0.0), 0.5);
    let mut input = InputState::new();

    push_pull.tick(&mut world, &mut actor, &input, FIXED_DT);
    input.press(Key::E);
    push_pull.tick(&mut world, &mut actor, &input, FIXED_DT);
    input.end_frame();
    input.release(Key::E);
    input.press(Key::W);
    push_pull.tick(&mut world, &mut actor, &input, FIXED_DT);
    input.end_frame();

    ensure!(
        push_pull.phase() == Phase::Pushing,
        "scene did not reach Pushing, got {}",
        push_pull.phase()
    );

    Ok(PushScene {
        world,
        actor,
        push_pull,
        input,
    })
}

/// Run `frames` fixed ticks of pushing.
pub fn run_push(scene: &mut PushScene, frames: usize) {
    for _ in 0..frames {
        scene.push_pull.fixed_tick(
            &mut scene.world,
            &mut scene.actor,
            &scene.input,
            FIXED_DT,
        );
    }
}
