//! Collider shape queries: world bounds and ray intersection.

use glam::{Mat4, Vec3};

use super::ray::Ray;
use crate::ecs::components::physics::ColliderShape;

/// Axis-aligned bounding box used to reject rays cheaply.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsAabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl PhysicsAabb {
    /// Whether the ray segment `[0, max_distance]` can touch this box.
    #[inline]
    pub fn segment_overlaps(&self, ray: &Ray, max_distance: f32) -> bool {
        match slab_interval(ray.origin, ray.direction, self.min, self.max) {
            Some((t_enter, t_exit)) => t_exit >= 0.0 && t_enter <= max_distance,
            None => false,
        }
    }
}

impl ColliderShape {
    /// Compute the world-space AABB for this shape.
    #[inline]
    pub fn compute_aabb(&self, mat: Mat4) -> PhysicsAabb {
        match self {
            ColliderShape::Sphere { radius } => {
                let center = mat.transform_point3(Vec3::ZERO);
                let world_radius = *radius * max_axis_scale(mat);
                PhysicsAabb {
                    min: center - Vec3::splat(world_radius),
                    max: center + Vec3::splat(world_radius),
                }
            }
            ColliderShape::Box { half_extents } => aabb_from_extents(*half_extents, mat),
        }
    }

    /// Distance along `ray` at which it enters this shape, if within
    /// `max_distance`.
    ///
    /// A ray whose origin is inside the shape misses it. A ray starting on
    /// the surface hits at distance 0 when it heads into the interior, and
    /// misses when it heads out or slides along a face.
    pub fn ray_cast(&self, ray: &Ray, max_distance: f32, mat: Mat4) -> Option<f32> {
        let t = match self {
            ColliderShape::Box { half_extents } => {
                let inv = mat.inverse();
                let local_origin = inv.transform_point3(ray.origin);
                // Not normalized: keeps `t` in world units.
                let local_dir = inv.transform_vector3(ray.direction);
                let depth = |p: Vec3| (p.abs() - *half_extents).max_element();
                if depth(local_origin) < -SURFACE_EPSILON {
                    return None;
                }
                let (t_enter, t_exit) =
                    slab_interval(local_origin, local_dir, -*half_extents, *half_extents)?;
                if t_enter > 0.0 {
                    t_enter
                } else {
                    let midpoint = local_origin + local_dir * (t_exit * 0.5);
                    if t_exit <= 0.0 || depth(midpoint) >= -SURFACE_EPSILON {
                        return None;
                    }
                    0.0
                }
            }
            ColliderShape::Sphere { radius } => {
                let center = mat.transform_point3(Vec3::ZERO);
                let r = *radius * max_axis_scale(mat);
                let oc = ray.origin - center;
                let c = oc.length_squared() - r * r;
                if c < 0.0 {
                    return None;
                }
                let b = oc.dot(ray.direction);
                let disc = b * b - c;
                if disc < 0.0 {
                    return None;
                }
                let t = -b - disc.sqrt();
                if t < 0.0 {
                    return None;
                }
                t
            }
        };

        (t <= max_distance).then_some(t)
    }
}

/// Origins this close to a box face count as lying on it.
const SURFACE_EPSILON: f32 = 1e-5;

/// Entry/exit parameters of a line against an axis-aligned slab box.
/// Returns `None` when the line misses the box entirely.
#[inline]
fn slab_interval(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<(f32, f32)> {
    let inv = |d: f32| {
        if d.abs() > f32::EPSILON {
            1.0 / d
        } else {
            f32::MAX
        }
    };
    let inv_dir = Vec3::new(inv(direction.x), inv(direction.y), inv(direction.z));

    let t1 = (min - origin) * inv_dir;
    let t2 = (max - origin) * inv_dir;

    let t_enter = t1.min(t2).max_element();
    let t_exit = t1.max(t2).min_element();

    (t_exit >= t_enter).then_some((t_enter, t_exit))
}

fn max_axis_scale(mat: Mat4) -> f32 {
    let scale_x = mat.x_axis.truncate().length();
    let scale_y = mat.y_axis.truncate().length();
    let scale_z = mat.z_axis.truncate().length();
    scale_x.max(scale_y).max(scale_z)
}

/// Compute world-space AABB from local half-extents and a transform matrix.
#[inline]
fn aabb_from_extents(half_extents: Vec3, mat: Mat4) -> PhysicsAabb {
    let center = mat.transform_point3(Vec3::ZERO);

    // For each world axis, compute the extent by projecting the local box axes
    let abs_col0 = mat.x_axis.truncate().abs();
    let abs_col1 = mat.y_axis.truncate().abs();
    let abs_col2 = mat.z_axis.truncate().abs();

    let extent = abs_col0 * half_extents.x + abs_col1 * half_extents.y + abs_col2 * half_extents.z;

    PhysicsAabb {
        min: center - extent,
        max: center + extent,
    }
}
