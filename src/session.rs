//! State of one grab, from the grab press until release.

use glam::{Quat, Vec3};

use crate::actor::{MotorSettings, SpeedOverride};
use crate::config::InteractionConfig;
use crate::ecs::components::{Collider, Transform};
use crate::geometry::{compute_oriented_box_vertices, CardinalDirection, OrientedBoxVertices};

/// What the interaction reads from a target entity each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub transform: Transform,
    /// Local half extents of the target's box collider.
    pub half_extents: Vec3,
}

impl TargetSnapshot {
    /// Read a target from the world. `None` if the entity is gone or has no
    /// box collider.
    pub fn read(world: &hecs::World, entity: hecs::Entity) -> Option<Self> {
        let transform = *world.get::<&Transform>(entity).ok()?;
        let half_extents = world.get::<&Collider>(entity).ok()?.box_half_extents()?;
        Some(Self {
            transform,
            half_extents,
        })
    }

    pub fn vertices(&self) -> OrientedBoxVertices {
        compute_oriented_box_vertices(&self.transform, self.half_extents)
    }
}

/// Linear move of the actor to its stand-off point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    pub start: Vec3,
    pub end: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl Approach {
    /// Advance by `delta_time`; returns where the actor should be now and
    /// whether the move is over.
    pub fn advance(&mut self, delta_time: f32) -> (Vec3, bool) {
        self.elapsed += delta_time;
        if self.elapsed >= self.duration {
            (self.end, true)
        } else {
            let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
            (self.start.lerp(self.end, t), false)
        }
    }
}

/// Everything known about the held target.
#[derive(Debug)]
pub struct GrabSession {
    target: hecs::Entity,
    direction: CardinalDirection,
    vertices: OrientedBoxVertices,
    last_position: Vec3,
    last_rotation: Quat,
    local_offset: Vec3,
    config: InteractionConfig,
    approach: Option<Approach>,
    speed_override: Option<SpeedOverride>,
}

impl GrabSession {
    pub fn new(
        target: hecs::Entity,
        direction: CardinalDirection,
        snapshot: &TargetSnapshot,
        config: InteractionConfig,
    ) -> Self {
        Self {
            target,
            direction,
            vertices: snapshot.vertices(),
            last_position: snapshot.transform.position,
            last_rotation: snapshot.transform.rotation,
            local_offset: Vec3::ZERO,
            config,
            approach: None,
            speed_override: None,
        }
    }

    pub fn target(&self) -> hecs::Entity {
        self.target
    }

    pub fn direction(&self) -> CardinalDirection {
        self.direction
    }

    pub fn vertices(&self) -> &OrientedBoxVertices {
        &self.vertices
    }

    /// Target position minus actor position, captured when the hold began.
    pub fn local_offset(&self) -> Vec3 {
        self.local_offset
    }

    /// Configuration in force for this grab.
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn approach_mut(&mut self) -> Option<&mut Approach> {
        self.approach.as_mut()
    }

    pub fn set_approach(&mut self, approach: Approach) {
        self.approach = Some(approach);
    }

    /// Recompute the corner cache if the target moved or turned since it was
    /// last observed. Returns true when the cache changed.
    pub fn refresh(&mut self, snapshot: &TargetSnapshot) -> bool {
        let t = &snapshot.transform;
        if t.position == self.last_position && t.rotation == self.last_rotation {
            return false;
        }
        self.vertices = snapshot.vertices();
        self.last_position = t.position;
        self.last_rotation = t.rotation;
        true
    }

    /// Finish the approach: record the offset, take the resolved config, and
    /// slow the actor down. Returns false if the hold had already begun.
    pub fn begin_hold(
        &mut self,
        actor_position: Vec3,
        snapshot: &TargetSnapshot,
        config: InteractionConfig,
        motor: &mut MotorSettings,
    ) -> bool {
        if self.speed_override.is_some() {
            return false;
        }
        self.approach = None;
        self.local_offset = snapshot.transform.position - actor_position;
        self.vertices = snapshot.vertices();
        self.last_position = snapshot.transform.position;
        self.last_rotation = snapshot.transform.rotation;
        self.config = config;
        self.speed_override = Some(SpeedOverride::apply(motor, &self.config));
        true
    }

    /// Undo the speed penalty if one was applied. Consumes the session so
    /// nothing can restore twice.
    pub fn end(self, motor: &mut MotorSettings) {
        if let Some(token) = self.speed_override {
            token.restore(motor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxCorner;

    fn snapshot_at(position: Vec3) -> TargetSnapshot {
        TargetSnapshot {
            transform: Transform::from_position(position),
            half_extents: Vec3::splat(0.5),
        }
    }

    #[test]
    fn test_read_requires_box_collider() {
        let mut world = hecs::World::new();
        let boxed = world.spawn((Transform::identity(), Collider::cuboid(Vec3::ONE)));
        let ball = world.spawn((Transform::identity(), Collider::ball(1.0)));
        let bare = world.spawn((Transform::identity(),));

        assert!(TargetSnapshot::read(&world, boxed).is_some());
        assert!(TargetSnapshot::read(&world, ball).is_none());
        assert!(TargetSnapshot::read(&world, bare).is_none());

        world.despawn(boxed).unwrap();
        assert!(TargetSnapshot::read(&world, boxed).is_none());
    }

    #[test]
    fn test_refresh_only_on_change() {
        let mut world = hecs::World::new();
        let entity = world.spawn(());
        let snap = snapshot_at(Vec3::ZERO);
        let mut session = GrabSession::new(
            entity,
            CardinalDirection::TargetForward,
            &snap,
            InteractionConfig::default(),
        );
        assert!(!session.refresh(&snap));

        let moved = snapshot_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(session.refresh(&moved));
        let lbl = session.vertices().corner(BoxCorner::LowerBackLeft);
        assert!((lbl - Vec3::new(0.5, -0.5, -0.5)).length() < 1e-5);

        let turned = TargetSnapshot {
            transform: moved.transform.with_yaw_degrees(10.0),
            ..moved
        };
        assert!(session.refresh(&turned));
        assert!(!session.refresh(&turned));
    }

    #[test]
    fn test_hold_applies_override_once() {
        let mut world = hecs::World::new();
        let entity = world.spawn(());
        let snap = snapshot_at(Vec3::new(0.0, 0.5, 2.0));
        let mut session = GrabSession::new(
            entity,
            CardinalDirection::TargetForward,
            &snap,
            InteractionConfig::default(),
        );
        let mut motor = MotorSettings::default();
        let config = InteractionConfig::default().move_speed_percent(0.25);

        assert!(session.begin_hold(Vec3::ZERO, &snap, config, &mut motor));
        assert!(!session.begin_hold(Vec3::ZERO, &snap, config, &mut motor));
        assert!((motor.max_forward_speed - 1.5).abs() < 1e-5);
        assert_eq!(session.local_offset(), Vec3::new(0.0, 0.5, 2.0));

        session.end(&mut motor);
        assert!((motor.max_forward_speed - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_end_without_hold_leaves_motor_alone() {
        let mut world = hecs::World::new();
        let entity = world.spawn(());
        let session = GrabSession::new(
            entity,
            CardinalDirection::TargetLeft,
            &snapshot_at(Vec3::ZERO),
            InteractionConfig::default(),
        );
        let mut motor = MotorSettings::default();
        session.end(&mut motor);
        assert_eq!(motor, MotorSettings::default());
    }

    #[test]
    fn test_approach_interpolates_then_snaps() {
        let mut approach = Approach {
            start: Vec3::ZERO,
            end: Vec3::new(2.0, 0.0, 0.0),
            elapsed: 0.0,
            duration: 0.5,
        };
        let (p, done) = approach.advance(0.25);
        assert!(!done);
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        let (p, done) = approach.advance(0.3);
        assert!(done);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
    }
}
