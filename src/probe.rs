//! Probe grids: N×N parallel rays approximating "is this face clear?".
//!
//! One [`ProbeGrid`] type serves three checks. The push check casts from the
//! face the target is heading toward. The pull check is the same check with
//! the heading reversed. The ground check casts down from the underside.

use glam::Vec3;

use crate::config::{InteractionConfig, MIN_GRID_SIZE};
use crate::geometry::{BoxCorner, CardinalDirection, OrientedBoxVertices};
use crate::physics::{LayerMask, Ray, RayCaster};

/// Result of casting a probe grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Clear,
    Blocked,
}

impl ProbeOutcome {
    pub fn is_clear(self) -> bool {
        self == ProbeOutcome::Clear
    }

    pub fn is_blocked(self) -> bool {
        self == ProbeOutcome::Blocked
    }
}

/// A rectangle of ray origins plus the ray they all cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeGrid {
    /// Origin of ray (0, 0).
    pub start: Vec3,
    /// Unit axis along which `width` is measured.
    pub horizontal_axis: Vec3,
    /// Unit axis along which `height` is measured.
    pub vertical_axis: Vec3,
    pub width: f32,
    pub height: f32,
    /// Rays per side. Must be at least 2; configuration validation
    /// guarantees this for grids built from an [`InteractionConfig`].
    pub grid_size: u32,
    /// Unit direction every ray travels.
    pub direction: Vec3,
    pub stop_distance: f32,
    pub filter: LayerMask,
}

impl ProbeGrid {
    /// Grid over the face the target moves toward when travelling along
    /// `heading`, inset by skin width on every side.
    pub fn motion_face(
        vertices: &OrientedBoxVertices,
        heading: CardinalDirection,
        heading_vector: Vec3,
        config: &InteractionConfig,
    ) -> Self {
        let skin = config.skin_width;
        let (start_corner, end_corner) = match heading {
            CardinalDirection::TargetForward => {
                (BoxCorner::LowerForwardLeft, BoxCorner::LowerForwardRight)
            }
            CardinalDirection::TargetBack => (BoxCorner::LowerBackRight, BoxCorner::LowerBackLeft),
            CardinalDirection::TargetRight => {
                (BoxCorner::LowerForwardRight, BoxCorner::LowerBackRight)
            }
            CardinalDirection::TargetLeft => {
                (BoxCorner::LowerBackLeft, BoxCorner::LowerForwardLeft)
            }
        };

        let edge = vertices.corner(end_corner) - vertices.corner(start_corner);
        let vertical = vertices.vertical_edge();
        let horizontal_axis = edge.normalize_or_zero();
        let vertical_axis = vertical.normalize_or_zero();

        Self {
            start: vertices.corner(start_corner)
                + horizontal_axis * skin
                + vertical_axis * skin,
            horizontal_axis,
            vertical_axis,
            width: (edge.length() - skin * 2.0).max(0.0),
            height: (vertical.length() - skin * 2.0).max(0.0),
            grid_size: config.push.grid_size,
            direction: heading_vector.normalize_or_zero(),
            stop_distance: config.push.stop_distance,
            filter: config.push.stop_layers,
        }
    }

    /// Grid over the underside, lifted by skin width, casting straight down.
    pub fn underside(vertices: &OrientedBoxVertices, config: &InteractionConfig) -> Self {
        let origin = vertices.corner(BoxCorner::LowerBackLeft);
        let across = vertices.corner(BoxCorner::LowerBackRight) - origin;
        let along = vertices.corner(BoxCorner::LowerForwardLeft) - origin;

        Self {
            start: origin + Vec3::Y * config.skin_width,
            horizontal_axis: across.normalize_or_zero(),
            vertical_axis: along.normalize_or_zero(),
            width: across.length(),
            height: along.length(),
            grid_size: config.ground.grid_size,
            direction: Vec3::NEG_Y,
            stop_distance: config.ground.check_distance,
            filter: config.ground.ground_layers,
        }
    }

    /// Ray origins, column by column.
    pub fn origins(&self) -> impl Iterator<Item = Vec3> + '_ {
        let n = self.grid_size;
        debug_assert!(n >= MIN_GRID_SIZE, "probe grid needs at least 2 rays per side");
        let steps = (n - 1) as f32;
        let dh = self.width / steps;
        let dv = self.height / steps;
        (0..n).flat_map(move |i| {
            (0..n).map(move |j| {
                self.start
                    + self.horizontal_axis * (dh * i as f32)
                    + self.vertical_axis * (dv * j as f32)
            })
        })
    }

    /// Cast every ray, stopping at the first hit.
    pub fn cast(&self, caster: &dyn RayCaster) -> ProbeOutcome {
        let blocked = self.origins().any(|origin| {
            caster
                .cast_ray(
                    &Ray::new(origin, self.direction),
                    self.stop_distance,
                    self.filter,
                )
                .is_some()
        });

        if blocked {
            ProbeOutcome::Blocked
        } else {
            ProbeOutcome::Clear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Collider, Transform};
    use crate::geometry::compute_oriented_box_vertices;
    use crate::physics::{RayHit, SceneQuery};
    use std::cell::{Cell, RefCell};

    /// Counts rays and hits only the rays listed by index.
    struct ScriptedCaster {
        calls: Cell<u32>,
        hit_on: Option<u32>,
        rays: RefCell<Vec<Ray>>,
    }

    impl ScriptedCaster {
        fn new(hit_on: Option<u32>) -> Self {
            Self {
                calls: Cell::new(0),
                hit_on,
                rays: RefCell::new(Vec::new()),
            }
        }
    }

    impl RayCaster for ScriptedCaster {
        fn cast_ray(&self, ray: &Ray, max_distance: f32, _filter: LayerMask) -> Option<RayHit> {
            let index = self.calls.get();
            self.calls.set(index + 1);
            self.rays.borrow_mut().push(*ray);
            if Some(index) == self.hit_on {
                let mut world = hecs::World::new();
                Some(RayHit {
                    entity: world.spawn(()),
                    distance: max_distance,
                    point: ray.at(max_distance),
                })
            } else {
                None
            }
        }
    }

    fn unit_box() -> OrientedBoxVertices {
        compute_oriented_box_vertices(
            &Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
            Vec3::splat(0.5),
        )
    }

    #[test]
    fn test_clear_grid_casts_n_squared_rays() {
        for n in 2..=10 {
            let config = InteractionConfig::default().push(crate::config::PushRaycasting {
                grid_size: n,
                ..Default::default()
            });
            let grid = ProbeGrid::motion_face(
                &unit_box(),
                CardinalDirection::TargetForward,
                Vec3::Z,
                &config,
            );
            let caster = ScriptedCaster::new(None);
            assert_eq!(grid.cast(&caster), ProbeOutcome::Clear);
            assert_eq!(caster.calls.get(), n * n);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "at least 2 rays")]
    fn test_single_ray_grid_is_rejected() {
        let mut grid = ProbeGrid::underside(&unit_box(), &InteractionConfig::default());
        grid.grid_size = 1;
        let _ = grid.origins().count();
    }

    #[test]
    fn test_any_hit_blocks_and_stops_early() {
        let config = InteractionConfig::default().push(crate::config::PushRaycasting {
            grid_size: 4,
            ..Default::default()
        });
        let grid = ProbeGrid::motion_face(
            &unit_box(),
            CardinalDirection::TargetForward,
            Vec3::Z,
            &config,
        );
        let caster = ScriptedCaster::new(Some(5));
        assert_eq!(grid.cast(&caster), ProbeOutcome::Blocked);
        assert_eq!(caster.calls.get(), 6);
    }

    #[test]
    fn test_forward_face_layout() {
        let config = InteractionConfig::default();
        let grid = ProbeGrid::motion_face(
            &unit_box(),
            CardinalDirection::TargetForward,
            Vec3::Z,
            &config,
        );
        let eps = 1e-5;
        assert!((grid.start - Vec3::new(-0.45, 0.05, 0.5)).length() < eps);
        assert!((grid.width - 0.9).abs() < eps);
        assert!((grid.height - 0.9).abs() < eps);

        let caster = ScriptedCaster::new(None);
        grid.cast(&caster);
        let rays = caster.rays.borrow();
        assert_eq!(rays.len(), 4);
        assert!((rays[3].origin - Vec3::new(0.45, 0.95, 0.5)).length() < eps);
        assert!(rays.iter().all(|r| (r.direction - Vec3::Z).length() < eps));
    }

    #[test]
    fn test_each_heading_uses_its_own_face() {
        let config = InteractionConfig::default();
        let vertices = unit_box();
        let cases = [
            (CardinalDirection::TargetForward, Vec3::Z),
            (CardinalDirection::TargetBack, Vec3::NEG_Z),
            (CardinalDirection::TargetRight, Vec3::X),
            (CardinalDirection::TargetLeft, Vec3::NEG_X),
        ];
        for (heading, normal) in cases {
            let grid = ProbeGrid::motion_face(&vertices, heading, normal, &config);
            for origin in grid.origins() {
                // Every origin sits on the face plane, inside the skin inset.
                assert!((origin.dot(normal) - 0.5).abs() < 1e-5, "{heading}");
                let lateral = origin - normal * origin.dot(normal);
                assert!(lateral.x.abs() <= 0.45 + 1e-5 && lateral.z.abs() <= 0.45 + 1e-5);
                assert!(origin.y >= 0.05 - 1e-5 && origin.y <= 0.95 + 1e-5);
            }
        }
    }

    #[test]
    fn test_underside_layout() {
        let config = InteractionConfig::default();
        let grid = ProbeGrid::underside(&unit_box(), &config);
        let eps = 1e-5;
        assert!((grid.start - Vec3::new(-0.5, 0.05, -0.5)).length() < eps);
        assert!((grid.width - 1.0).abs() < eps);
        assert!((grid.height - 1.0).abs() < eps);
        assert_eq!(grid.direction, Vec3::NEG_Y);
    }

    #[test]
    fn test_scene_wall_blocks_push() {
        let mut world = hecs::World::new();
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.5, 0.55)),
            Collider::cuboid(Vec3::new(2.0, 1.0, 0.01)),
        ));
        let config = InteractionConfig::default();
        let vertices = unit_box();

        let query = SceneQuery::new(&world);
        let push =
            ProbeGrid::motion_face(&vertices, CardinalDirection::TargetForward, Vec3::Z, &config);
        assert!(push.cast(&query).is_blocked());

        let pull =
            ProbeGrid::motion_face(&vertices, CardinalDirection::TargetBack, Vec3::NEG_Z, &config);
        assert!(pull.cast(&query).is_clear());
    }

    #[test]
    fn test_flush_wall_blocks_with_zero_skin() {
        let mut world = hecs::World::new();
        // Front face at z = 0.5, touching the box.
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.5, 0.75)),
            Collider::cuboid(Vec3::new(2.0, 1.0, 0.25)),
        ));
        let config = InteractionConfig::default().skin_width(0.0);
        let grid = ProbeGrid::motion_face(
            &unit_box(),
            CardinalDirection::TargetForward,
            Vec3::Z,
            &config,
        );
        assert!(grid.cast(&SceneQuery::new(&world)).is_blocked());
    }

    #[test]
    fn test_resting_box_is_grounded_with_zero_skin() {
        let mut world = hecs::World::new();
        world.spawn((
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            Collider::cuboid(Vec3::new(10.0, 0.5, 10.0)),
        ));
        let config = InteractionConfig::default().skin_width(0.0);
        let query = SceneQuery::new(&world);
        assert!(ProbeGrid::underside(&unit_box(), &config).cast(&query).is_blocked());

        // The bottom row of the push face slides along the floor.
        let push = ProbeGrid::motion_face(
            &unit_box(),
            CardinalDirection::TargetForward,
            Vec3::Z,
            &config,
        );
        assert!(push.cast(&query).is_clear());
    }

    #[test]
    fn test_scene_wall_beyond_stop_distance_is_clear() {
        let mut world = hecs::World::new();
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.5, 0.7)),
            Collider::cuboid(Vec3::new(2.0, 1.0, 0.01)),
        ));
        let grid = ProbeGrid::motion_face(
            &unit_box(),
            CardinalDirection::TargetForward,
            Vec3::Z,
            &InteractionConfig::default(),
        );
        assert!(grid.cast(&SceneQuery::new(&world)).is_clear());
    }

    #[test]
    fn test_ground_probe_ignores_own_collider() {
        let mut world = hecs::World::new();
        world.spawn((
            Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
            Collider::cuboid(Vec3::splat(0.5)),
        ));
        let grid = ProbeGrid::underside(&unit_box(), &InteractionConfig::default());
        assert!(grid.cast(&SceneQuery::new(&world)).is_clear());

        world.spawn((
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            Collider::cuboid(Vec3::new(10.0, 0.5, 10.0)),
        ));
        assert!(grid.cast(&SceneQuery::new(&world)).is_blocked());
    }

    #[test]
    fn test_filter_excludes_layers() {
        let mut world = hecs::World::new();
        world.spawn((
            Transform::from_position(Vec3::new(0.0, -0.5, 0.0)),
            Collider::cuboid(Vec3::new(10.0, 0.5, 10.0)).with_layers(LayerMask::layer(3)),
        ));
        let mut config = InteractionConfig::default();
        config.ground.ground_layers = LayerMask::layer(4);
        let grid = ProbeGrid::underside(&unit_box(), &config);
        assert!(grid.cast(&SceneQuery::new(&world)).is_clear());
    }
}
