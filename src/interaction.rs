//! The push/pull state machine.
//!
//! [`PushPull::tick`] runs once per frame: it polls for a target in range,
//! reacts to the grab key, walks the actor into position and picks between
//! holding, pushing and pulling. [`PushPull::fixed_tick`] runs at the fixed
//! physics rate and moves the actor and target together while pushing or
//! pulling.

use std::fmt;

use glam::Vec3;
use tracing::{debug, info};

use crate::actor::Actor;
use crate::config::{GrabGeometryConfig, InteractionConfig, PlayerInteraction};
use crate::ecs::components::{RigidBody, Transform};
use crate::error::ConfigError;
use crate::geometry::{resolve_cardinal_direction, CardinalDirection};
use crate::input::InputState;
use crate::physics::{Ray, RayCaster, SceneQuery};
use crate::probe::ProbeGrid;
use crate::session::{Approach, GrabSession, TargetSnapshot};

/// Where the interaction is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A grabbable target is in front of the actor.
    InRange,
    /// The actor is walking to its stand-off point.
    MovingToGrab,
    Holding,
    Pushing,
    Pulling,
}

impl Phase {
    /// Any phase from the grab press until release.
    pub fn is_grabbing(self) -> bool {
        matches!(
            self,
            Phase::MovingToGrab | Phase::Holding | Phase::Pushing | Phase::Pulling
        )
    }

    /// The hold has begun and the target follows the actor.
    pub fn is_holding(self) -> bool {
        matches!(self, Phase::Holding | Phase::Pushing | Phase::Pulling)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::InRange => "InRange",
            Phase::MovingToGrab => "MovingToGrab",
            Phase::Holding => "Holding",
            Phase::Pushing => "Pushing",
            Phase::Pulling => "Pulling",
        };
        f.write_str(name)
    }
}

/// Push/pull controller for one actor.
#[derive(Debug)]
pub struct PushPull {
    defaults: InteractionConfig,
    interaction: PlayerInteraction,
    phase: Phase,
    candidate: Option<(hecs::Entity, CardinalDirection)>,
    poll_counter: u32,
    session: Option<GrabSession>,
}

impl PushPull {
    /// Validate both configurations and start idle.
    pub fn new(
        defaults: InteractionConfig,
        interaction: PlayerInteraction,
    ) -> Result<Self, ConfigError> {
        defaults.validate()?;
        interaction.validate()?;
        Ok(Self {
            defaults,
            interaction,
            phase: Phase::Idle,
            candidate: None,
            poll_counter: 0,
            session: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_in_range(&self) -> bool {
        self.phase == Phase::InRange
    }

    pub fn is_grabbing(&self) -> bool {
        self.phase.is_grabbing()
    }

    /// Direction of the current grab, or of the target in range.
    pub fn direction(&self) -> Option<CardinalDirection> {
        self.session
            .as_ref()
            .map(GrabSession::direction)
            .or(self.candidate.map(|(_, direction)| direction))
    }

    /// The grabbed target, or the one in range.
    pub fn target(&self) -> Option<hecs::Entity> {
        self.session
            .as_ref()
            .map(GrabSession::target)
            .or(self.candidate.map(|(entity, _)| entity))
    }

    pub fn session(&self) -> Option<&GrabSession> {
        self.session.as_ref()
    }

    pub fn interaction(&self) -> &PlayerInteraction {
        &self.interaction
    }

    pub fn defaults(&self) -> &InteractionConfig {
        &self.defaults
    }

    /// Swap the actor's interaction settings, for example to lock an axis
    /// mid-hold. Face flags are read on every tick, so the change applies
    /// to the current grab. Invalid settings are rejected and the old ones
    /// kept.
    pub fn set_interaction(&mut self, interaction: PlayerInteraction) -> Result<(), ConfigError> {
        interaction.validate()?;
        self.interaction = interaction;
        self.poll_counter = 0;
        Ok(())
    }

    /// Per-frame update.
    pub fn tick<A: Actor + ?Sized>(
        &mut self,
        world: &mut hecs::World,
        actor: &mut A,
        input: &InputState,
        delta_time: f32,
    ) {
        if let Some(session) = &self.session {
            if TargetSnapshot::read(world, session.target()).is_none() {
                self.abandon(actor);
            }
        }

        if self.phase == Phase::MovingToGrab {
            self.advance_approach(world, actor, delta_time);
        }

        if !self.phase.is_grabbing() && actor.is_grounded() {
            self.poll_counter += 1;
            if self.poll_counter % self.interaction.grab_poll_frames == 0 {
                self.check_range(world, actor);
                self.poll_counter = 0;
            }
        }

        if !(self.phase == Phase::InRange || self.phase.is_grabbing()) {
            return;
        }

        if input.was_pressed(self.interaction.key_bindings.grab) {
            if self.phase.is_grabbing() {
                self.release(world, actor);
            } else {
                self.begin_grab(world, actor);
            }
            return;
        }

        if self.phase.is_holding() {
            self.update_hold(world, actor, input);
        }
    }

    /// Fixed-rate update: ground check, obstacle check, then motion.
    pub fn fixed_tick<A: Actor + ?Sized>(
        &mut self,
        world: &mut hecs::World,
        actor: &mut A,
        input: &InputState,
        delta_time: f32,
    ) {
        if !matches!(self.phase, Phase::Pushing | Phase::Pulling) {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let target = session.target();
        let Some(snapshot) = TargetSnapshot::read(world, target) else {
            self.abandon(actor);
            return;
        };
        session.refresh(&snapshot);
        let config = *session.config();

        let ground = ProbeGrid::underside(session.vertices(), &config)
            .cast(&SceneQuery::new(world).excluding(target));
        if ground.is_clear() {
            if let Ok(mut body) = world.get::<&mut RigidBody>(target) {
                body.set_kinematic(false);
                body.use_gravity = true;
            }
            info!(?target, "target lost the ground, dropping it");
            self.release(world, actor);
            return;
        }

        let direction = session.direction();
        let heading = if self.phase == Phase::Pushing {
            direction
        } else {
            direction.opposite()
        };
        let grid = ProbeGrid::motion_face(
            session.vertices(),
            heading,
            heading.world_vector(&snapshot.transform),
            &config,
        );
        if grid
            .cast(&SceneQuery::new(world).excluding(target))
            .is_blocked()
        {
            return;
        }

        let offset = session.local_offset();
        let velocity = direction.world_vector(&snapshot.transform)
            * input.vertical(&self.interaction.key_bindings)
            * actor.motor().max_forward_speed;
        actor.move_by(velocity * delta_time);

        let actor_position = actor.position();
        if let Ok(mut transform) = world.get::<&mut Transform>(target) {
            transform.position = Vec3::new(
                actor_position.x + offset.x,
                transform.position.y,
                actor_position.z + offset.z,
            );
        }
    }

    /// Let go of the target and give control back to the actor.
    pub fn release<A: Actor + ?Sized>(&mut self, world: &hecs::World, actor: &mut A) {
        if let Some(session) = self.session.take() {
            let target = session.target();
            session.end(actor.motor_mut());
            if let Ok(mut body) = world.get::<&mut RigidBody>(target) {
                body.set_kinematic(false);
            }
            info!(?target, "released target");
        }
        actor.motor_mut().can_control = true;
        self.candidate = None;
        self.set_phase(Phase::Idle);
    }

    fn abandon<A: Actor + ?Sized>(&mut self, actor: &mut A) {
        if let Some(session) = self.session.take() {
            debug!(target = ?session.target(), "grab target disappeared");
            session.end(actor.motor_mut());
        }
        actor.motor_mut().can_control = true;
        self.candidate = None;
        self.set_phase(Phase::Idle);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "phase change");
            self.phase = phase;
        }
    }

    fn face_allowed(&self, direction: CardinalDirection) -> bool {
        let i = &self.interaction;
        match direction {
            CardinalDirection::TargetForward => i.can_grab_back,
            CardinalDirection::TargetBack => i.can_grab_front,
            CardinalDirection::TargetRight => i.can_grab_left,
            CardinalDirection::TargetLeft => i.can_grab_right,
        }
    }

    fn movement_permitted(&self, direction: CardinalDirection) -> bool {
        let i = &self.interaction;
        if direction.is_longitudinal() {
            i.can_grab_front || i.can_grab_back
        } else {
            i.can_grab_right || i.can_grab_left
        }
    }

    fn check_range<A: Actor + ?Sized>(&mut self, world: &hecs::World, actor: &A) {
        let forward = actor.forward();
        let ray = Ray::new(actor.position() + forward * actor.radius(), forward);
        let hit = SceneQuery::new(world).cast_ray(
            &ray,
            self.interaction.grab_distance,
            self.interaction.grab_layers,
        );

        let found = hit.and_then(|hit| {
            let snapshot = TargetSnapshot::read(world, hit.entity)?;
            let t = &snapshot.transform;
            let direction = resolve_cardinal_direction(forward, t.forward(), t.right());
            self.face_allowed(direction).then_some((hit.entity, direction))
        });

        self.candidate = found;
        self.set_phase(if found.is_some() {
            Phase::InRange
        } else {
            Phase::Idle
        });
    }

    fn begin_grab<A: Actor + ?Sized>(&mut self, world: &hecs::World, actor: &mut A) {
        let Some((target, _)) = self.candidate.take() else {
            return;
        };
        let Some(snapshot) = TargetSnapshot::read(world, target) else {
            debug!(?target, "target in range disappeared before the grab");
            self.set_phase(Phase::Idle);
            return;
        };

        let t = &snapshot.transform;
        let direction = resolve_cardinal_direction(actor.forward(), t.forward(), t.right());
        let mut session = GrabSession::new(target, direction, &snapshot, self.defaults);

        let vertices = session.vertices();
        let half_extent = if direction.is_longitudinal() {
            vertices.depth()
        } else {
            vertices.width()
        } * 0.5;
        let standoff = t.position
            - direction.world_vector(t)
                * (half_extent + actor.radius() * 0.5 + self.interaction.grab_distance);
        let start = actor.position();

        session.set_approach(Approach {
            start,
            end: Vec3::new(standoff.x, start.y, standoff.z),
            elapsed: 0.0,
            duration: self.interaction.grab_move_time,
        });
        actor.motor_mut().can_control = false;
        self.session = Some(session);
        info!(?target, %direction, "grabbing target");
        self.set_phase(Phase::MovingToGrab);

        if self.interaction.grab_move_time <= 0.0 {
            self.advance_approach(world, actor, 0.0);
        }
    }

    fn advance_approach<A: Actor + ?Sized>(
        &mut self,
        world: &hecs::World,
        actor: &mut A,
        delta_time: f32,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(approach) = session.approach_mut() else {
            return;
        };
        let (position, done) = approach.advance(delta_time);
        let current = actor.position();
        actor.move_by(position - current);
        if !done {
            return;
        }

        let target = session.target();
        let Some(snapshot) = TargetSnapshot::read(world, target) else {
            self.abandon(actor);
            return;
        };
        if let Ok(mut body) = world.get::<&mut RigidBody>(target) {
            body.set_kinematic(true);
        }
        let config = world
            .get::<&GrabGeometryConfig>(target)
            .map(|geometry| *geometry.parameters())
            .unwrap_or(self.defaults);

        let actor_position = actor.position();
        session.begin_hold(actor_position, &snapshot, config, actor.motor_mut());
        debug!(?target, offset = ?session.local_offset(), "holding target");
        self.set_phase(Phase::Holding);
    }

    fn update_hold<A: Actor + ?Sized>(
        &mut self,
        world: &hecs::World,
        actor: &mut A,
        input: &InputState,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(snapshot) = TargetSnapshot::read(world, session.target()) else {
            self.abandon(actor);
            return;
        };

        let drift = ((snapshot.transform.position.y - actor.position().y)
            - session.local_offset().y)
            .abs();
        if drift > session.config().y_break_threshold {
            debug!(drift, "target drifted vertically, releasing");
            self.release(world, actor);
            return;
        }
        let direction = session.direction();
        if direction
            .world_vector(&snapshot.transform)
            .dot(actor.forward())
            < 0.0
        {
            debug!("actor turned away from target, releasing");
            self.release(world, actor);
            return;
        }

        session.refresh(&snapshot);

        let bindings = &self.interaction.key_bindings;
        let permitted = self.movement_permitted(direction);
        let next = if permitted && input.any_held(&bindings.forward) {
            Phase::Pushing
        } else if permitted && input.any_held(&bindings.back) {
            Phase::Pulling
        } else if input.any_pressed(&bindings.left) || input.any_pressed(&bindings.right) {
            self.release(world, actor);
            return;
        } else {
            Phase::Holding
        };
        self.set_phase(next);
    }
}
