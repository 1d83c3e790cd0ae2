//! Entity Component System integration with hecs.
//!
//! Grabbable targets, obstacles and floors are plain entities carrying a
//! [`Transform`](components::Transform), a [`Collider`](components::Collider)
//! and optionally a [`RigidBody`](components::RigidBody).

pub mod components;

pub mod prelude {
    pub use super::components::*;
    pub use crate::config::GrabGeometryConfig;
}
