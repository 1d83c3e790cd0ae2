//! Headless walkthrough: approach a crate, grab it, push it toward a wall,
//! pull it back and let go.
//!
//! Run with `RUST_LOG=debug` to see every phase change.

use anyhow::{ensure, Context};
use glam::Vec3;
use pushpull::{
    Actor, App, Collider, Engine, Event, FirstPersonActor, FrameContext, GameLoopConfig,
    InputState, InteractionConfig, Key, LayerMask, Overlay, Phase, PlayerInteraction, PushPull,
    RigidBody, Transform, Viewport,
};

const FRAME: f64 = 1.0 / 60.0;
const GRABBABLE: LayerMask = LayerMask::layer(3);

/// Scripted keys: seconds from the start, key name, pressed or released.
const SCRIPT: &[(f64, &str, bool)] = &[
    (0.3, "e", true),
    (0.4, "e", false),
    (1.2, "w", true),
    (3.2, "w", false),
    (3.5, "s", true),
    (4.0, "s", false),
    (4.5, "e", true),
    (4.6, "e", false),
];
const DURATION: f64 = 5.0;

fn scripted_events() -> anyhow::Result<Vec<(f64, Event)>> {
    SCRIPT
        .iter()
        .map(|&(at, name, pressed)| {
            let key: Key = name
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("scripted key at {at}s"))?;
            let event = if pressed {
                Event::key_press(key)
            } else {
                Event::key_release(key)
            };
            Ok((at, event))
        })
        .collect()
}

struct DemoApp {
    actor: FirstPersonActor,
    push_pull: PushPull,
    overlay: Overlay,
    last_phase: Phase,
}

impl DemoApp {
    fn new() -> anyhow::Result<Self> {
        let push_pull = PushPull::new(
            InteractionConfig::default().y_break_threshold(0.25),
            PlayerInteraction::default()
                .grab_layers(GRABBABLE)
                .grab_text("Press E to grab"),
        )
        .context("configuring push/pull")?;

        Ok(Self {
            actor: FirstPersonActor::new(Vec3::new(0.0, 0.5, 0.0), 0.5),
            push_pull,
            overlay: Overlay::new().show_debug(true),
            last_phase: Phase::Idle,
        })
    }
}

impl App for DemoApp {
    fn init(&mut self, world: &mut hecs::World) {
        // Floor
        world.spawn((
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            Collider::cuboid(Vec3::new(20.0, 0.5, 20.0)),
            RigidBody::new_static(),
        ));

        // Crate, turned so the actor meets its back face
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.5, 1.3)).with_yaw_degrees(180.0),
            Collider::cuboid(Vec3::new(0.5, 0.5, 0.5)).with_layers(GRABBABLE),
            RigidBody::new_dynamic(),
        ));

        // Wall the push runs into
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 1.0, 5.0)),
            Collider::cuboid(Vec3::new(3.0, 1.0, 0.2)),
            RigidBody::new_static(),
        ));
    }

    fn update(&mut self, world: &mut hecs::World, ctx: &FrameContext) {
        self.push_pull
            .tick(world, &mut self.actor, ctx.input, ctx.delta_time as f32);
        self.actor.update(
            ctx.input,
            &self.push_pull.interaction().key_bindings,
            ctx.delta_time as f32,
        );

        if let Some(prompt) = self.overlay.prompt(&self.push_pull) {
            log::trace!("prompt: {prompt}");
        }
        let phase = self.push_pull.phase();
        if phase != self.last_phase {
            log::info!(
                "t={:.2}s actor z={:.2}\n{}",
                ctx.elapsed_time,
                self.actor.position().z,
                self.overlay.debug_text(&self.push_pull)
            );
            self.last_phase = phase;
        }
    }

    fn fixed_update(&mut self, world: &mut hecs::World, input: &InputState, dt: f32) {
        self.push_pull.fixed_tick(world, &mut self.actor, input, dt);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let script = scripted_events()?;
    let app = DemoApp::new()?;
    let mut engine = Engine::new(GameLoopConfig::default(), app);

    let mut elapsed = 0.0;
    while elapsed < DURATION {
        let events: Vec<Event> = script
            .iter()
            .filter(|(at, _)| *at >= elapsed && *at < elapsed + FRAME)
            .map(|(_, event)| event.clone())
            .collect();
        engine.frame(FRAME, &events);
        elapsed += FRAME;
    }

    let crate_z = engine
        .world()
        .query::<(&Transform, &Collider)>()
        .iter()
        .find(|(_, (_, collider))| collider.layers.intersects(GRABBABLE))
        .map(|(_, (transform, _))| transform.position.z)
        .context("crate missing from the world")?;

    let prompt = Overlay::new().prompt_rect(Viewport::new(1280, 720));
    log::info!(
        "finished: crate at z={crate_z:.2}, prompt drawn at ({}, {})",
        prompt.x,
        prompt.y
    );
    ensure!(crate_z > 1.3, "the crate never moved");
    ensure!(
        !engine.app().push_pull.is_grabbing(),
        "the demo should end with the crate released"
    );
    Ok(())
}
