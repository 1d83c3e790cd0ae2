//! Keyboard input for the interaction.
//!
//! Hosts either feed [`Event`]s (or winit keys, with the `window` feature)
//! into an [`InputState`], or set keys on it directly. The state machine
//! reads one snapshot per tick.

use std::collections::HashSet;

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Special keys
    Escape,
    Tab,
    Space,
    Enter,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,

    // Modifier keys
    Shift,
    Control,
    Alt,
}

impl Key {
    fn from_char(c: char) -> Option<Self> {
        let key = match c.to_ascii_lowercase() {
            'a' => Key::A,
            'b' => Key::B,
            'c' => Key::C,
            'd' => Key::D,
            'e' => Key::E,
            'f' => Key::F,
            'g' => Key::G,
            'h' => Key::H,
            'i' => Key::I,
            'j' => Key::J,
            'k' => Key::K,
            'l' => Key::L,
            'm' => Key::M,
            'n' => Key::N,
            'o' => Key::O,
            'p' => Key::P,
            'q' => Key::Q,
            'r' => Key::R,
            's' => Key::S,
            't' => Key::T,
            'u' => Key::U,
            'v' => Key::V,
            'w' => Key::W,
            'x' => Key::X,
            'y' => Key::Y,
            'z' => Key::Z,
            _ => return None,
        };
        Some(key)
    }

    /// Convert from winit key.
    #[cfg(feature = "window")]
    pub fn from_winit(key: &winit::keyboard::Key) -> Option<Self> {
        use winit::keyboard::{Key as WKey, NamedKey};

        match key {
            WKey::Character(c) => Self::from_char(c.chars().next()?),
            WKey::Named(named) => match named {
                NamedKey::Escape => Some(Key::Escape),
                NamedKey::Tab => Some(Key::Tab),
                NamedKey::Space => Some(Key::Space),
                NamedKey::Enter => Some(Key::Enter),
                NamedKey::ArrowLeft => Some(Key::Left),
                NamedKey::ArrowRight => Some(Key::Right),
                NamedKey::ArrowUp => Some(Key::Up),
                NamedKey::ArrowDown => Some(Key::Down),
                NamedKey::Shift => Some(Key::Shift),
                NamedKey::Control => Some(Key::Control),
                NamedKey::Alt => Some(Key::Alt),
                _ => None,
            },
            _ => None,
        }
    }
}

impl std::str::FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(key) = Key::from_char(c) {
                return Ok(key);
            }
        }
        match s.to_ascii_lowercase().as_str() {
            "escape" | "esc" => Ok(Key::Escape),
            "tab" => Ok(Key::Tab),
            "space" => Ok(Key::Space),
            "enter" | "return" => Ok(Key::Enter),
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "shift" => Ok(Key::Shift),
            "control" | "ctrl" => Ok(Key::Control),
            "alt" => Ok(Key::Alt),
            _ => Err(format!("unknown key: {s}")),
        }
    }
}

/// Input event.
#[derive(Debug, Clone)]
pub enum Event {
    /// Key pressed.
    KeyPress { key: Key, handled: bool },

    /// Key released.
    KeyRelease { key: Key, handled: bool },

    /// Mouse moved.
    MouseMotion { delta: (f32, f32), handled: bool },
}

impl Event {
    pub fn key_press(key: Key) -> Self {
        Event::KeyPress {
            key,
            handled: false,
        }
    }

    pub fn key_release(key: Key) -> Self {
        Event::KeyRelease {
            key,
            handled: false,
        }
    }

    /// Check if the event has been handled.
    pub fn is_handled(&self) -> bool {
        match self {
            Event::KeyPress { handled, .. } => *handled,
            Event::KeyRelease { handled, .. } => *handled,
            Event::MouseMotion { handled, .. } => *handled,
        }
    }

    /// Mark the event as handled.
    pub fn set_handled(&mut self) {
        match self {
            Event::KeyPress { handled, .. } => *handled = true,
            Event::KeyRelease { handled, .. } => *handled = true,
            Event::MouseMotion { handled, .. } => *handled = true,
        }
    }
}

/// Which keys drive the interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyBindings {
    pub grab: Key,
    pub forward: Vec<Key>,
    pub back: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            grab: Key::E,
            forward: vec![Key::W, Key::Up],
            back: vec![Key::S, Key::Down],
            left: vec![Key::A, Key::Left],
            right: vec![Key::D, Key::Right],
        }
    }
}

impl KeyBindings {
    pub fn grab(mut self, key: Key) -> Self {
        self.grab = key;
        self
    }
}

/// Keyboard and mouse state for one tick.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    released: HashSet<Key>,
    mouse_delta: (f32, f32),
    /// Analog forward/back value that overrides the keys when set.
    vertical_axis: Option<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget per-tick edges. Call once the tick has consumed the input.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.released.clear();
        self.mouse_delta = (0.0, 0.0);
    }

    /// Fold unhandled events into the state. Events are left unhandled so
    /// other consumers still see them.
    pub fn handle_events(&mut self, events: &[Event]) {
        for event in events.iter().filter(|e| !e.is_handled()) {
            match event {
                Event::KeyPress { key, .. } => self.press(*key),
                Event::KeyRelease { key, .. } => self.release(*key),
                Event::MouseMotion { delta, .. } => {
                    self.mouse_delta.0 += delta.0;
                    self.mouse_delta.1 += delta.1;
                }
            }
        }
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    pub fn set_vertical_axis(&mut self, value: Option<f32>) {
        self.vertical_axis = value.map(|v| v.clamp(-1.0, 1.0));
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Pressed during this tick.
    pub fn was_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    pub fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.is_held(*k))
    }

    pub fn any_pressed(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.was_pressed(*k))
    }

    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Forward/back axis in [-1, 1].
    pub fn vertical(&self, bindings: &KeyBindings) -> f32 {
        if let Some(value) = self.vertical_axis {
            return value;
        }
        let mut value = 0.0;
        if self.any_held(&bindings.forward) {
            value += 1.0;
        }
        if self.any_held(&bindings.back) {
            value -= 1.0;
        }
        value
    }

    /// Left/right axis in [-1, 1].
    pub fn horizontal(&self, bindings: &KeyBindings) -> f32 {
        let mut value = 0.0;
        if self.any_held(&bindings.right) {
            value += 1.0;
        }
        if self.any_held(&bindings.left) {
            value -= 1.0;
        }
        value
    }
}
