use crate::debug_draw::Color;
use glam::Vec2;

pub const HUD_SLOTS: usize = 25;

const TEXT_X: f32 = 11.0;
const FIRST_LINE_Y: f32 = 40.0;
const LINE_SPACING: f32 = 20.0;
const FPS_SHADOW: Color = Color::new(0.0, 0.0, 0.0, 1.0);
const FPS_COLOR: Color = Color::new(1.0, 1.0, 0.0, 1.0);
const TEXT_COLOR: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Positioned text ready for the overlay painter, in pixels from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct HudLabel {
    pub position: Vec2,
    pub text: String,
    pub color: Color,
}

/// Fixed, index-addressed lines drawn top to bottom.
#[derive(Debug, Clone)]
pub struct HudText {
    lines: [String; HUD_SLOTS],
}

impl Default for HudText {
    fn default() -> Self {
        Self { lines: std::array::from_fn(|_| String::new()) }
    }
}

impl HudText {
    /// Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, text: impl Into<String>) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text.into();
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Non-empty lines at their slot positions, preceded by the frame rate drawn twice with
    /// a one pixel offset.
    pub fn layout(&self, fps: u32) -> Vec<HudLabel> {
        let fps_text = format!("fps: {fps}");
        let mut labels = vec![
            HudLabel { position: Vec2::new(TEXT_X, 6.0), text: fps_text.clone(), color: FPS_SHADOW },
            HudLabel { position: Vec2::new(TEXT_X + 1.0, 7.0), text: fps_text, color: FPS_COLOR },
        ];
        labels.extend(self.lines.iter().enumerate().filter(|(_, line)| !line.is_empty()).map(|(i, line)| {
            HudLabel {
                position: Vec2::new(TEXT_X, FIRST_LINE_Y + LINE_SPACING * i as f32),
                text: line.clone(),
                color: TEXT_COLOR,
            }
        }));
        labels
    }
}

/// Frames presented per wall-clock second.
#[derive(Debug, Clone, Default)]
pub struct FrameRateCounter {
    frames: u32,
    elapsed: f32,
    rate: u32,
}

impl FrameRateCounter {
    pub fn tick(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed > 1.0 {
            self.rate = self.frames;
            self.frames = 0;
            self.elapsed -= 1.0;
        }
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }
}
