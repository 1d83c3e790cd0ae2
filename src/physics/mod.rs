//! Scene queries against the colliders stored in a `hecs::World`.
//!
//! # Architecture
//!
//! 1. [`LayerMask`] - which layers a collider is on and which a query sees
//! 2. [`Ray`] / [`RayHit`] - query input and output
//! 3. [`collider`] - per-shape bounds and ray intersection
//! 4. [`RayCaster`] - the seam the probe grid casts through
//! 5. [`SceneQuery`] - `RayCaster` over every `(Transform, Collider)` entity

pub mod collider;
pub mod layer;
pub mod ray;

use glam::{Mat4, Vec3};

use crate::ecs::components::physics::Collider;
use crate::ecs::components::transform::Transform;

pub use self::layer::LayerMask;
pub use self::ray::{Ray, RayHit};

/// Anything that can answer "what does this ray hit first?".
pub trait RayCaster {
    /// Nearest hit within `max_distance` on a collider whose layers
    /// intersect `filter`.
    fn cast_ray(&self, ray: &Ray, max_distance: f32, filter: LayerMask) -> Option<RayHit>;
}

/// Ray queries over a borrowed world.
pub struct SceneQuery<'w> {
    world: &'w hecs::World,
    exclude: Option<hecs::Entity>,
}

impl<'w> SceneQuery<'w> {
    pub fn new(world: &'w hecs::World) -> Self {
        Self {
            world,
            exclude: None,
        }
    }

    /// Skip `entity` in every query.
    pub fn excluding(mut self, entity: hecs::Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

impl RayCaster for SceneQuery<'_> {
    fn cast_ray(&self, ray: &Ray, max_distance: f32, filter: LayerMask) -> Option<RayHit> {
        if ray.direction == Vec3::ZERO || max_distance < 0.0 {
            return None;
        }

        let mut nearest: Option<RayHit> = None;
        for (entity, (transform, collider)) in
            self.world.query::<(&Transform, &Collider)>().iter()
        {
            if Some(entity) == self.exclude || !collider.layers.intersects(filter) {
                continue;
            }

            let mut mat = transform.to_matrix();
            if collider.offset != Vec3::ZERO {
                mat *= Mat4::from_translation(collider.offset);
            }

            let limit = nearest.map_or(max_distance, |hit| hit.distance);
            if !collider.shape.compute_aabb(mat).segment_overlaps(ray, limit) {
                continue;
            }

            if let Some(distance) = collider.shape.ray_cast(ray, limit, mat) {
                nearest = Some(RayHit {
                    entity,
                    distance,
                    point: ray.at(distance),
                });
            }
        }
        nearest
    }
}
