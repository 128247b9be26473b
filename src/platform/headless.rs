use anyhow::Result;
use crossterm::event::KeyEvent;
use glam::Vec2;
use ratatui::style::Color;
use std::collections::VecDeque;
use std::time::Duration;

use super::{Platform, Texture};

/// A single draw call as issued by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Texture {
        texture: Texture,
        position: Vec2,
        rotation: f32,
    },
    Rect {
        position: Vec2,
        size: Vec2,
        color: Color,
    },
    Text {
        text: String,
        position: Vec2,
        size: u16,
        color: Color,
    },
}

/// Platform without a screen: keys come from a script, one batch per frame,
/// and every presented frame is kept for inspection.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    script: VecDeque<Vec<KeyEvent>>,
    pending_keys: VecDeque<KeyEvent>,
    drawing: Vec<DrawCall>,
    pub frames: Vec<Vec<DrawCall>>,
    pub rates: Vec<u32>,
    pub sleeps: Vec<Duration>,
    pub frames_waited: usize,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue key batches; batch `n` is delivered during the `n`th frame.
    pub fn with_script(script: impl IntoIterator<Item = Vec<KeyEvent>>) -> Self {
        let mut script: VecDeque<Vec<KeyEvent>> = script.into_iter().collect();
        let pending_keys = script.pop_front().unwrap_or_default().into();
        Self {
            script,
            pending_keys,
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> Option<&[DrawCall]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Texture draws of the most recent frame
    pub fn textures(&self) -> Vec<(Texture, Vec2, f32)> {
        self.last_frame()
            .unwrap_or_default()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Texture {
                    texture,
                    position,
                    rotation,
                } => Some((*texture, *position, *rotation)),
                _ => None,
            })
            .collect()
    }

    /// Text drawn in any presented frame
    pub fn texts(&self) -> Vec<String> {
        self.frames
            .iter()
            .flatten()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Platform for HeadlessPlatform {
    fn poll_next_key_event(&mut self) -> Result<Option<KeyEvent>> {
        Ok(self.pending_keys.pop_front())
    }

    fn begin_frame(&mut self) {}

    fn clear(&mut self, color: Color) {
        self.drawing.clear();
        self.drawing.push(DrawCall::Clear(color));
    }

    fn draw_textured_rect(&mut self, texture: Texture, position: Vec2, rotation_degrees: f32) {
        self.drawing.push(DrawCall::Texture {
            texture,
            position,
            rotation: rotation_degrees,
        });
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.drawing.push(DrawCall::Rect {
            position,
            size,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: u16, color: Color) {
        self.drawing.push(DrawCall::Text {
            text: text.to_owned(),
            position,
            size,
            color,
        });
    }

    fn end_frame(&mut self) -> Result<()> {
        self.frames.push(self.drawing.clone());
        Ok(())
    }

    fn set_target_rate(&mut self, ticks_per_second: u32) {
        self.rates.push(ticks_per_second);
    }

    async fn wait_next_frame(&mut self) {
        self.frames_waited += 1;
        self.pending_keys = self.script.pop_front().unwrap_or_default().into();
    }

    async fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_keys_arrive_one_batch_per_frame() {
        let mut platform = HeadlessPlatform::with_script([
            vec![key(KeyCode::Up), key(KeyCode::Left)],
            vec![],
            vec![key(KeyCode::Down)],
        ]);

        assert_eq!(platform.poll_next_key_event().unwrap(), Some(key(KeyCode::Up)));
        assert_eq!(platform.poll_next_key_event().unwrap(), Some(key(KeyCode::Left)));
        assert_eq!(platform.poll_next_key_event().unwrap(), None);

        platform.wait_next_frame().await;
        assert_eq!(platform.poll_next_key_event().unwrap(), None);

        platform.wait_next_frame().await;
        assert_eq!(platform.poll_next_key_event().unwrap(), Some(key(KeyCode::Down)));
        assert_eq!(platform.frames_waited, 2);
    }

    #[test]
    fn test_frames_without_clear_keep_previous_drawing() {
        let mut platform = HeadlessPlatform::new();

        platform.begin_frame();
        platform.clear(Color::Black);
        platform.draw_text("Score: 2", Vec2::splat(5.0), 20, Color::White);
        platform.end_frame().unwrap();

        platform.begin_frame();
        platform.draw_text("GAME OVER!", Vec2::ZERO, 40, Color::White);
        platform.end_frame().unwrap();

        assert_eq!(platform.frames.len(), 2);
        assert_eq!(platform.frames[1].len(), 3);
        assert_eq!(platform.texts(), vec!["Score: 2", "Score: 2", "GAME OVER!"]);
    }
}
