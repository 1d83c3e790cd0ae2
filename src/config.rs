//! Interaction parameters and their validation.
//!
//! Built the same way as the engine's other settings structs: `Default`
//! carries sensible values, chainable setters adjust them, and `validate`
//! must pass before the values reach a probe.

use crate::error::ConfigError;
use crate::input::KeyBindings;
use crate::physics::LayerMask;

/// Smallest probe grid: one ray at each end of an edge.
pub const MIN_GRID_SIZE: u32 = 2;
/// Largest probe grid per side.
pub const MAX_GRID_SIZE: u32 = 10;

/// Probe grid cast from the face the target is moving toward.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PushRaycasting {
    /// Rays per side; the grid casts `grid_size²` rays.
    pub grid_size: u32,
    /// How far ahead of the face an obstacle stops the motion.
    pub stop_distance: f32,
    /// Layers that block pushing and pulling.
    pub stop_layers: LayerMask,
}

impl Default for PushRaycasting {
    fn default() -> Self {
        Self {
            grid_size: 2,
            stop_distance: 0.1,
            stop_layers: LayerMask::ALL,
        }
    }
}

/// Probe grid cast down from the target's underside.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundRaycasting {
    /// Rays per side; the grid casts `grid_size²` rays.
    pub grid_size: u32,
    /// How far below the underside ground must be.
    pub check_distance: f32,
    /// Layers that count as ground.
    pub ground_layers: LayerMask,
}

impl Default for GroundRaycasting {
    fn default() -> Self {
        Self {
            grid_size: 2,
            check_distance: 0.1,
            ground_layers: LayerMask::ALL,
        }
    }
}

/// How the held object moves and is checked.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionConfig {
    /// Fraction of the actor's move speeds kept while holding.
    pub move_speed_percent: f32,
    /// Fraction of the actor's mouse sensitivity kept while holding.
    pub mouse_speed_percent: f32,
    /// Margin kept between probe rays and the collider's edges.
    pub skin_width: f32,
    /// Vertical drift of the target that breaks the grab.
    pub y_break_threshold: f32,
    pub push: PushRaycasting,
    pub ground: GroundRaycasting,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            move_speed_percent: 0.5,
            mouse_speed_percent: 0.2,
            skin_width: 0.05,
            y_break_threshold: 0.2,
            push: PushRaycasting::default(),
            ground: GroundRaycasting::default(),
        }
    }
}

impl InteractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_speed_percent(mut self, percent: f32) -> Self {
        self.move_speed_percent = percent;
        self
    }

    pub fn mouse_speed_percent(mut self, percent: f32) -> Self {
        self.mouse_speed_percent = percent;
        self
    }

    pub fn skin_width(mut self, skin_width: f32) -> Self {
        self.skin_width = skin_width;
        self
    }

    pub fn y_break_threshold(mut self, threshold: f32) -> Self {
        self.y_break_threshold = threshold;
        self
    }

    pub fn push(mut self, push: PushRaycasting) -> Self {
        self.push = push;
        self
    }

    pub fn ground(mut self, ground: GroundRaycasting) -> Self {
        self.ground = ground;
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        percent("move_speed_percent", self.move_speed_percent)?;
        percent("mouse_speed_percent", self.mouse_speed_percent)?;
        non_negative("skin_width", self.skin_width)?;
        positive("y_break_threshold", self.y_break_threshold)?;
        grid_size("push.grid_size", self.push.grid_size)?;
        non_negative("push.stop_distance", self.push.stop_distance)?;
        grid_size("ground.grid_size", self.ground.grid_size)?;
        non_negative("ground.check_distance", self.ground.check_distance)?;
        Ok(())
    }
}

/// Per-target replacement for the default [`InteractionConfig`].
///
/// Attach it to a target entity. While that target is held it replaces the
/// default completely. Construction validates, so an invalid override cannot
/// be attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabGeometryConfig {
    parameters: InteractionConfig,
}

impl GrabGeometryConfig {
    pub fn new(parameters: InteractionConfig) -> Result<Self, ConfigError> {
        parameters.validate()?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &InteractionConfig {
        &self.parameters
    }
}

/// How the actor finds and takes hold of targets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerInteraction {
    pub can_grab_front: bool,
    pub can_grab_back: bool,
    pub can_grab_right: bool,
    pub can_grab_left: bool,
    pub key_bindings: KeyBindings,
    /// Length of the range probe, and the gap kept when lining up.
    pub grab_distance: f32,
    /// Seconds spent moving the actor into position after a grab.
    pub grab_move_time: f32,
    /// Ticks between range probes.
    pub grab_poll_frames: u32,
    /// Layers holding grabbable objects.
    pub grab_layers: LayerMask,
    /// Prompt shown while a target is in range.
    pub grab_text: String,
}

impl Default for PlayerInteraction {
    fn default() -> Self {
        Self {
            can_grab_front: true,
            can_grab_back: true,
            can_grab_right: true,
            can_grab_left: true,
            key_bindings: KeyBindings::default(),
            grab_distance: 0.5,
            grab_move_time: 0.5,
            grab_poll_frames: 3,
            grab_layers: LayerMask::ALL,
            grab_text: String::new(),
        }
    }
}

impl PlayerInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all four face permissions (front, back, right, left).
    pub fn faces(mut self, front: bool, back: bool, right: bool, left: bool) -> Self {
        self.can_grab_front = front;
        self.can_grab_back = back;
        self.can_grab_right = right;
        self.can_grab_left = left;
        self
    }

    pub fn key_bindings(mut self, bindings: KeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    pub fn grab_distance(mut self, distance: f32) -> Self {
        self.grab_distance = distance;
        self
    }

    pub fn grab_move_time(mut self, seconds: f32) -> Self {
        self.grab_move_time = seconds;
        self
    }

    pub fn grab_poll_frames(mut self, frames: u32) -> Self {
        self.grab_poll_frames = frames;
        self
    }

    pub fn grab_layers(mut self, layers: LayerMask) -> Self {
        self.grab_layers = layers;
        self
    }

    pub fn grab_text(mut self, text: impl Into<String>) -> Self {
        self.grab_text = text.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("grab_distance", self.grab_distance)?;
        non_negative("grab_move_time", self.grab_move_time)?;
        if self.grab_poll_frames == 0 {
            return Err(ConfigError::ZeroPollFrames);
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

fn percent(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::PercentOutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn grid_size(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::GridSizeOutOfRange {
            field,
            value,
            min: MIN_GRID_SIZE,
            max: MAX_GRID_SIZE,
        })
    }
}
