//! Headless game loop with a fixed-timestep accumulator.
//!
//! Each [`Engine::frame`] folds the frame's events into the input state, runs
//! `App::fixed_update` at fixed intervals, then `App::update` once.

use crate::input::{Event, InputState};

/// Game loop configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameLoopConfig {
    /// Fixed timestep for physics (seconds). Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum physics substeps per frame. Default: 4.
    pub max_substeps: u32,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

/// Accumulates frame time and hands out fixed steps.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    config: GameLoopConfig,
    accumulator: f64,
}

impl FixedStepper {
    pub fn new(config: GameLoopConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
        }
    }

    pub fn config(&self) -> &GameLoopConfig {
        &self.config
    }

    /// Time carried over to the next frame.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add `delta_time` and return how many fixed steps to run now.
    pub fn advance(&mut self, delta_time: f64) -> u32 {
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }
        substeps
    }
}

/// Per-frame context passed to [`App::update`].
pub struct FrameContext<'a> {
    /// Time since last frame (seconds).
    pub delta_time: f64,
    /// Fixed timestep interval (seconds).
    pub fixed_delta_time: f64,
    /// Time since the engine started (seconds).
    pub elapsed_time: f64,
    pub input: &'a InputState,
}

/// Application driven by an [`Engine`].
pub trait App {
    /// Called once before the first frame.
    fn init(&mut self, _world: &mut hecs::World) {}

    /// Called each frame (variable timestep).
    fn update(&mut self, world: &mut hecs::World, ctx: &FrameContext);

    /// Called at fixed timestep intervals. Optional.
    fn fixed_update(&mut self, _world: &mut hecs::World, _input: &InputState, _dt: f32) {}
}

/// Owns the world, the input state and the app.
pub struct Engine<A: App> {
    app: A,
    world: hecs::World,
    input: InputState,
    stepper: FixedStepper,
    elapsed_time: f64,
    initialized: bool,
}

impl<A: App> Engine<A> {
    pub fn new(config: GameLoopConfig, app: A) -> Self {
        Self::with_world(config, app, hecs::World::new())
    }

    /// Start from an already populated world.
    pub fn with_world(config: GameLoopConfig, app: A, world: hecs::World) -> Self {
        Self {
            app,
            world,
            input: InputState::new(),
            stepper: FixedStepper::new(config),
            elapsed_time: 0.0,
            initialized: false,
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Direct access for hosts that set keys instead of sending events.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Run one frame: fixed steps first, then the variable update.
    pub fn frame(&mut self, delta_time: f64, events: &[Event]) {
        if !self.initialized {
            self.app.init(&mut self.world);
            self.initialized = true;
        }

        self.input.handle_events(events);
        self.elapsed_time += delta_time;

        let fixed_dt = self.stepper.config().fixed_timestep;
        for _ in 0..self.stepper.advance(delta_time) {
            self.app
                .fixed_update(&mut self.world, &self.input, fixed_dt as f32);
        }

        let ctx = FrameContext {
            delta_time,
            fixed_delta_time: fixed_dt,
            elapsed_time: self.elapsed_time,
            input: &self.input,
        };
        self.app.update(&mut self.world, &ctx);

        self.input.end_frame();
    }
}
