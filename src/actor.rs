//! The character that grabs things.
//!
//! The interaction only talks to the host's character through [`Actor`].
//! [`FirstPersonActor`] is a small reference implementation with WASD
//! movement and mouse look, used by the demo and the tests.

use std::ops::BitOr;

use glam::{Quat, Vec3};

use crate::config::InteractionConfig;
use crate::input::{InputState, Key, KeyBindings};

/// Sides on which a move was stopped by something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionFlags(u8);

impl CollisionFlags {
    pub const NONE: CollisionFlags = CollisionFlags(0);
    pub const SIDES: CollisionFlags = CollisionFlags(1);
    pub const ABOVE: CollisionFlags = CollisionFlags(1 << 1);
    pub const BELOW: CollisionFlags = CollisionFlags(1 << 2);

    pub fn contains(self, other: CollisionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CollisionFlags {
    type Output = CollisionFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        CollisionFlags(self.0 | rhs.0)
    }
}

/// Tunable locomotion fields the interaction slows down while holding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorSettings {
    pub max_forward_speed: f32,
    pub max_sideways_speed: f32,
    pub max_backwards_speed: f32,
    pub mouse_sensitivity_x: f32,
    pub mouse_sensitivity_y: f32,
    pub jumping_enabled: bool,
    /// When false the host's own locomotion must not move the actor.
    pub can_control: bool,
}

impl Default for MotorSettings {
    fn default() -> Self {
        Self {
            max_forward_speed: 6.0,
            max_sideways_speed: 6.0,
            max_backwards_speed: 6.0,
            mouse_sensitivity_x: 0.002,
            mouse_sensitivity_y: 0.002,
            jumping_enabled: true,
            can_control: true,
        }
    }
}

/// What the interaction needs from the host's character.
pub trait Actor {
    fn position(&self) -> Vec3;
    /// Unit forward vector.
    fn forward(&self) -> Vec3;
    /// Unit right vector.
    fn right(&self) -> Vec3;
    fn is_grounded(&self) -> bool;
    /// Radius of the character's collision capsule.
    fn radius(&self) -> f32;
    fn motor(&self) -> &MotorSettings;
    fn motor_mut(&mut self) -> &mut MotorSettings;
    /// Move by `delta`, resolving collisions the host's way.
    fn move_by(&mut self, delta: Vec3) -> CollisionFlags;
}

/// Proof that a speed penalty is applied to an actor's motor.
///
/// Applying returns the token; restoring consumes it. The token is neither
/// `Clone` nor `Copy`, so one restore always pairs with one apply.
#[derive(Debug, PartialEq)]
#[must_use = "dropping the override leaves the actor slowed down"]
pub struct SpeedOverride {
    move_percent: f32,
    mouse_percent: f32,
}

impl SpeedOverride {
    /// Scale speeds and sensitivities down and turn jumping off.
    pub fn apply(motor: &mut MotorSettings, config: &InteractionConfig) -> Self {
        let move_percent = config.move_speed_percent;
        let mouse_percent = config.mouse_speed_percent;

        motor.max_forward_speed *= move_percent;
        motor.max_sideways_speed *= move_percent;
        motor.max_backwards_speed *= move_percent;

        motor.mouse_sensitivity_x *= mouse_percent;
        motor.mouse_sensitivity_y *= mouse_percent;

        motor.jumping_enabled = false;

        Self {
            move_percent,
            mouse_percent,
        }
    }

    /// Undo exactly what [`SpeedOverride::apply`] did.
    pub fn restore(self, motor: &mut MotorSettings) {
        motor.max_forward_speed /= self.move_percent;
        motor.max_sideways_speed /= self.move_percent;
        motor.max_backwards_speed /= self.move_percent;

        motor.mouse_sensitivity_x /= self.mouse_percent;
        motor.mouse_sensitivity_y /= self.mouse_percent;

        motor.jumping_enabled = true;
    }
}

/// First-person character standing on a flat floor.
#[derive(Debug, Clone)]
pub struct FirstPersonActor {
    pub position: Vec3,
    pub radius: f32,
    pub motor: MotorSettings,
    /// Height of the floor plane the actor stands on.
    pub ground_height: f32,
    pub jump_speed: f32,
    pub gravity: f32,

    // Heading in radians
    yaw: f32,
    vertical_velocity: f32,
}

impl FirstPersonActor {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            motor: MotorSettings::default(),
            ground_height: position.y,
            jump_speed: 5.0,
            gravity: 9.81,
            yaw: 0.0,
            vertical_velocity: 0.0,
        }
    }

    /// Face along the world XZ direction given by `yaw` (radians, 0 = +Z).
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    /// Own locomotion: mouse turning always, WASD and jumping when allowed.
    ///
    /// Only horizontal mouse motion is used; the actor has no pitch.
    pub fn update(&mut self, input: &InputState, bindings: &KeyBindings, delta_time: f32) {
        let (dx, _) = input.mouse_delta();
        self.yaw += dx * self.motor.mouse_sensitivity_x;

        if self.motor.can_control {
            let vertical = input.vertical(bindings);
            let horizontal = input.horizontal(bindings);

            let forward_speed = if vertical >= 0.0 {
                self.motor.max_forward_speed
            } else {
                self.motor.max_backwards_speed
            };
            let velocity = self.forward() * vertical * forward_speed
                + self.right() * horizontal * self.motor.max_sideways_speed;
            self.move_by(velocity * delta_time);

            if self.motor.jumping_enabled && self.is_grounded() && input.was_pressed(Key::Space)
            {
                self.vertical_velocity = self.jump_speed;
            }
        }

        if self.vertical_velocity != 0.0 || !self.is_grounded() {
            self.vertical_velocity -= self.gravity * delta_time;
            let flags = self.move_by(Vec3::Y * self.vertical_velocity * delta_time);
            if flags.contains(CollisionFlags::BELOW) {
                self.vertical_velocity = 0.0;
            }
        }
    }
}

impl Actor for FirstPersonActor {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::Z
    }

    fn right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }

    fn is_grounded(&self) -> bool {
        self.position.y <= self.ground_height + 1e-4
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn motor(&self) -> &MotorSettings {
        &self.motor
    }

    fn motor_mut(&mut self) -> &mut MotorSettings {
        &mut self.motor
    }

    fn move_by(&mut self, delta: Vec3) -> CollisionFlags {
        self.position += delta;
        if self.position.y < self.ground_height {
            self.position.y = self.ground_height;
            CollisionFlags::BELOW
        } else {
            CollisionFlags::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_roundtrip_restores_exactly() {
        let mut motor = MotorSettings {
            max_forward_speed: 7.3,
            max_sideways_speed: 4.1,
            max_backwards_speed: 2.9,
            mouse_sensitivity_x: 0.7,
            mouse_sensitivity_y: 0.3,
            jumping_enabled: true,
            can_control: true,
        };
        let original = motor;
        let config = InteractionConfig::new()
            .move_speed_percent(0.37)
            .mouse_speed_percent(0.2);

        let token = SpeedOverride::apply(&mut motor, &config);
        assert!((motor.max_forward_speed - 7.3 * 0.37).abs() < 1e-5);
        assert!((motor.mouse_sensitivity_y - 0.06).abs() < 1e-6);
        assert!(!motor.jumping_enabled);

        token.restore(&mut motor);
        let eps = 1e-5;
        assert!((motor.max_forward_speed - original.max_forward_speed).abs() < eps);
        assert!((motor.max_sideways_speed - original.max_sideways_speed).abs() < eps);
        assert!((motor.max_backwards_speed - original.max_backwards_speed).abs() < eps);
        assert!((motor.mouse_sensitivity_x - original.mouse_sensitivity_x).abs() < eps);
        assert!((motor.mouse_sensitivity_y - original.mouse_sensitivity_y).abs() < eps);
        assert!(motor.jumping_enabled);
    }

    #[test]
    fn test_actor_basis() {
        let actor = FirstPersonActor::new(Vec3::ZERO, 0.5).with_yaw(std::f32::consts::FRAC_PI_2);
        assert!((actor.forward() - Vec3::X).length() < 1e-5);
        assert!((actor.right() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_locomotion_respects_can_control() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.press(Key::W);

        let mut actor = FirstPersonActor::new(Vec3::ZERO, 0.5);
        actor.update(&input, &bindings, 0.5);
        assert!((actor.position.z - 3.0).abs() < 1e-5);

        actor.motor.can_control = false;
        actor.update(&input, &bindings, 0.5);
        assert!((actor.position.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_jump_needs_permission() {
        let bindings = KeyBindings::default();
        let mut input = InputState::new();
        input.press(Key::Space);

        let mut actor = FirstPersonActor::new(Vec3::ZERO, 0.5);
        actor.motor.jumping_enabled = false;
        actor.update(&input, &bindings, 0.1);
        assert!(actor.is_grounded());

        actor.motor.jumping_enabled = true;
        actor.update(&input, &bindings, 0.1);
        assert!(!actor.is_grounded());
        assert!(actor.position.y > 0.0);
    }

    #[test]
    fn test_floor_clamps_moves() {
        let mut actor = FirstPersonActor::new(Vec3::new(0.0, 1.0, 0.0), 0.5);
        let flags = actor.move_by(Vec3::new(0.0, -2.0, 0.0));
        assert!(flags.contains(CollisionFlags::BELOW));
        assert_eq!(actor.position.y, 1.0);
        assert!(actor.move_by(Vec3::X).is_empty());
    }
}
