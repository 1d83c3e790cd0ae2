//! Text the host draws on screen: the grab prompt and debug lines.
//!
//! Nothing here renders. Hosts take the strings and rectangles and draw them
//! with whatever UI they have.

use crate::interaction::PushPull;

/// Screen area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Axis-aligned screen rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Helper for building multi-line text.
#[derive(Debug, Default)]
pub struct TextBuilder {
    lines: Vec<String>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line of text.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }

    /// Build the final text string.
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

/// Decides what to show for one [`PushPull`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub show_debug: bool,
    pub prompt_width: f32,
    pub prompt_height: f32,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            show_debug: false,
            prompt_width: 200.0,
            prompt_height: 30.0,
        }
    }
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_debug(mut self, show: bool) -> Self {
        self.show_debug = show;
        self
    }

    /// The grab prompt, while a target is in range and nothing is held.
    pub fn prompt<'a>(&self, push_pull: &'a PushPull) -> Option<&'a str> {
        (push_pull.is_in_range() && !push_pull.is_grabbing())
            .then(|| push_pull.interaction().grab_text.as_str())
    }

    /// Rectangle for the prompt, centred in `viewport`.
    pub fn prompt_rect(&self, viewport: Viewport) -> Rect {
        Rect {
            x: viewport.x as f32 + (viewport.width as f32 - self.prompt_width) * 0.5,
            y: viewport.y as f32 + (viewport.height as f32 - self.prompt_height) * 0.5,
            width: self.prompt_width,
            height: self.prompt_height,
        }
    }

    /// Debug lines, empty unless `show_debug` is set.
    pub fn debug_lines(&self, push_pull: &PushPull) -> Vec<String> {
        if !self.show_debug {
            return Vec::new();
        }
        vec![
            format!("Is In Range = {}", push_pull.is_in_range()),
            format!("Is Grabbing = {}", push_pull.is_grabbing()),
            format!("State = {}", push_pull.phase()),
            format!(
                "Push Dir = {}",
                push_pull.direction().unwrap_or_default()
            ),
        ]
    }

    /// Debug lines joined for a single text block.
    pub fn debug_text(&self, push_pull: &PushPull) -> String {
        self.debug_lines(push_pull)
            .into_iter()
            .fold(TextBuilder::new(), TextBuilder::line)
            .build()
    }
}
