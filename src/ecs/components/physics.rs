//! Physics components for ECS entities.

use glam::Vec3;

use crate::physics::LayerMask;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RigidBodyType {
    /// Affected by forces and collisions.
    Dynamic,
    /// Immovable.
    Static,
    /// Position controlled by user, but affects dynamic bodies.
    Kinematic,
}

/// Rigid body component.
///
/// Only the simulation mode is driven by the interaction; integrating
/// velocities is left to whatever physics the host runs.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidBody {
    pub body_type: RigidBodyType,
    /// Whether gravity acts on the body while it is dynamic.
    pub use_gravity: bool,
}

impl RigidBody {
    /// Create a new dynamic rigid body under gravity.
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            use_gravity: true,
        }
    }

    /// Create a new static rigid body.
    pub fn new_static() -> Self {
        Self {
            body_type: RigidBodyType::Static,
            use_gravity: false,
        }
    }

    pub fn is_kinematic(&self) -> bool {
        self.body_type == RigidBodyType::Kinematic
    }

    /// Toggle between kinematic and dynamic. Static bodies are left alone.
    pub fn set_kinematic(&mut self, kinematic: bool) {
        match (self.body_type, kinematic) {
            (RigidBodyType::Static, _) => {}
            (_, true) => self.body_type = RigidBodyType::Kinematic,
            (_, false) => self.body_type = RigidBodyType::Dynamic,
        }
    }
}

/// Collider shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColliderShape {
    Sphere { radius: f32 },
    /// Axis-aligned in local space.
    Box { half_extents: Vec3 },
}

/// Collision detection component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collider {
    pub shape: ColliderShape,
    /// Offset from the entity's transform origin.
    pub offset: Vec3,
    /// Layers this collider belongs to; ray filters test against it.
    pub layers: LayerMask,
}

impl Collider {
    /// Box collider on the default layer.
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box { half_extents },
            offset: Vec3::ZERO,
            layers: LayerMask::DEFAULT,
        }
    }

    /// Sphere collider on the default layer.
    pub fn ball(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            offset: Vec3::ZERO,
            layers: LayerMask::DEFAULT,
        }
    }

    /// Move the collider onto the given layers.
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Local half extents if this is a box collider.
    pub fn box_half_extents(&self) -> Option<Vec3> {
        match self.shape {
            ColliderShape::Box { half_extents } => Some(half_extents),
            ColliderShape::Sphere { .. } => None,
        }
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::ball(0.5)
    }
}
