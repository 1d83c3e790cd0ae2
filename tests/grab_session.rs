//! Walk up to a crate, grab it, push it, and let go, driven through the
//! engine loop the way a host would.

use pushpull::glam::Vec3;
use pushpull::{
    Actor, App, Collider, Engine, Event, FirstPersonActor, FrameContext, GameLoopConfig,
    InputState, InteractionConfig, Key, Overlay, Phase, PlayerInteraction, PushPull, RigidBody,
    Transform,
};

struct Player {
    actor: FirstPersonActor,
    push_pull: PushPull,
}

impl App for Player {
    fn update(&mut self, world: &mut pushpull::hecs::World, ctx: &FrameContext) {
        self.push_pull
            .tick(world, &mut self.actor, ctx.input, ctx.delta_time as f32);
    }

    fn fixed_update(&mut self, world: &mut pushpull::hecs::World, input: &InputState, dt: f32) {
        self.push_pull.fixed_tick(world, &mut self.actor, input, dt);
    }
}

const FRAME: f64 = 1.0 / 60.0;

/// Crate on a floor whose far edge is at `floor_end` along +Z.
fn setup(floor_end: f32) -> (Engine<Player>, pushpull::hecs::Entity) {
    let mut world = pushpull::hecs::World::new();
    world.spawn((
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
        Collider::cuboid(Vec3::new(5.0, 0.5, floor_end)),
        RigidBody::new_static(),
    ));
    // Face at z = 0.8, 0.3 beyond the start of the range probe.
    let target = world.spawn((
        Transform::from_position(Vec3::new(0.0, 0.5, 1.3)),
        Collider::cuboid(Vec3::splat(0.5)),
        RigidBody {
            use_gravity: false,
            ..RigidBody::new_dynamic()
        },
    ));

    let push_pull = PushPull::new(
        InteractionConfig::default(),
        PlayerInteraction::default()
            .grab_distance(0.5)
            .grab_move_time(0.5)
            .grab_text("Press E to grab"),
    )
    .unwrap();
    let player = Player {
        actor: FirstPersonActor::new(Vec3::new(0.0, 0.5, 0.0), 0.5),
        push_pull,
    };
    let config = GameLoopConfig {
        fixed_timestep: FRAME,
        max_substeps: 4,
    };
    (Engine::with_world(config, player, world), target)
}

fn run(engine: &mut Engine<Player>, seconds: f64) {
    let frames = (seconds / FRAME).round() as usize;
    for _ in 0..frames {
        engine.frame(FRAME, &[]);
    }
}

#[test]
fn test_grab_push_release() {
    let (mut engine, target) = setup(50.0);
    let overlay = Overlay::new();

    run(&mut engine, 0.1);
    let push_pull = &engine.app().push_pull;
    assert_eq!(push_pull.phase(), Phase::InRange);
    assert_eq!(push_pull.target(), Some(target));
    assert_eq!(overlay.prompt(push_pull), Some("Press E to grab"));

    engine.frame(FRAME, &[Event::key_press(Key::E)]);
    engine.frame(FRAME, &[Event::key_release(Key::E)]);
    assert_eq!(engine.app().push_pull.phase(), Phase::MovingToGrab);
    assert_eq!(overlay.prompt(&engine.app().push_pull), None);

    run(&mut engine, 0.55);
    let player = engine.app();
    assert_eq!(player.push_pull.phase(), Phase::Holding);
    assert!((player.actor.motor.max_forward_speed - 3.0).abs() < 1e-5);
    assert!((player.actor.position().z - 0.05).abs() < 1e-4);
    assert!(!player.actor.motor.can_control);

    let before = engine
        .world()
        .get::<&Transform>(target)
        .unwrap()
        .position;
    engine.frame(FRAME, &[Event::key_press(Key::W)]);
    run(&mut engine, 0.5);
    engine.frame(FRAME, &[Event::key_release(Key::W)]);

    let after = engine.world().get::<&Transform>(target).unwrap().position;
    assert!(after.z > before.z + 1.0);
    assert!((after.y - before.y).abs() < 1e-6);
    let offset = after - engine.app().actor.position();
    assert!((offset.z - 1.25).abs() < 1e-3);
    assert_eq!(engine.app().push_pull.phase(), Phase::Holding);

    engine.frame(FRAME, &[Event::key_press(Key::E)]);
    engine.frame(FRAME, &[Event::key_release(Key::E)]);
    let player = engine.app();
    assert!(!player.push_pull.is_grabbing());
    assert!((player.actor.motor.max_forward_speed - 6.0).abs() < 1e-5);
    assert!(player.actor.motor.jumping_enabled);
    assert!(player.actor.motor.can_control);
    assert!(!engine
        .world()
        .get::<&RigidBody>(target)
        .unwrap()
        .is_kinematic());
}

#[test]
fn test_pushing_off_a_ledge_drops_the_crate() {
    let (mut engine, target) = setup(2.0);
    run(&mut engine, 0.1);
    engine.frame(FRAME, &[Event::key_press(Key::E)]);
    engine.frame(FRAME, &[Event::key_release(Key::E)]);
    run(&mut engine, 0.55);
    assert_eq!(engine.app().push_pull.phase(), Phase::Holding);

    engine.frame(FRAME, &[Event::key_press(Key::W)]);
    run(&mut engine, 2.0);

    let player = engine.app();
    assert!(!player.push_pull.is_grabbing());
    assert!((player.actor.motor.max_forward_speed - 6.0).abs() < 1e-5);
    let body = engine.world().get::<&RigidBody>(target).unwrap();
    assert!(body.use_gravity);
    assert!(!body.is_kinematic());
}
