//! Pushpull
//!
//! Push/pull interaction for a first-person actor: walk up to a box, grab
//! it, and push or pull it along the floor.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **geometry** - Oriented box corners and cardinal push directions
//! 2. **physics** - Layer masks, rays and scene queries over a `hecs::World`
//! 3. **probe** - Grids of parallel rays for obstacle and ground checks
//! 4. **actor** - The `Actor` contract, speed override and a reference actor
//! 5. **session** - State of one grab
//! 6. **interaction** - The `PushPull` state machine (`tick` / `fixed_tick`)
//! 7. **config** - Validated interaction settings and per-target overrides
//! 8. **ecs** - Components stored on targets and obstacles
//! 9. **input** - Keys, events and the per-tick input snapshot
//! 10. **overlay** - Prompt text and debug lines
//! 11. **engine** - Headless game loop with a fixed-timestep accumulator

pub mod actor;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod overlay;
pub mod physics;
pub mod probe;
pub mod session;

// Re-export commonly used types
pub use actor::{Actor, CollisionFlags, FirstPersonActor, MotorSettings, SpeedOverride};

pub use config::{
    GrabGeometryConfig, GroundRaycasting, InteractionConfig, PlayerInteraction, PushRaycasting,
};

pub use ecs::prelude::*;

pub use engine::{App, Engine, FixedStepper, FrameContext, GameLoopConfig};

pub use error::ConfigError;

pub use geometry::{
    compute_oriented_box_vertices, resolve_cardinal_direction, BoxCorner, CardinalDirection,
    OrientedBoxVertices,
};

pub use input::{Event, InputState, Key, KeyBindings};

pub use interaction::{Phase, PushPull};

pub use overlay::{Overlay, Rect, TextBuilder, Viewport};

pub use physics::{LayerMask, Ray, RayCaster, RayHit, SceneQuery};

pub use probe::{ProbeGrid, ProbeOutcome};

pub use session::{GrabSession, TargetSnapshot};

// Re-export glam and hecs for convenience
pub use glam;
pub use hecs;
